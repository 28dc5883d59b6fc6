//! On-foot player movement.

use engine_core::{Entity, Locomotion, Player, Transform, Vec3, World};
use input::InputState;

use crate::mobility::MovementModifiers;

const GRAVITY: f32 = 20.0;
const SPRINT_MULTIPLIER: f32 = 1.6;
const TURN_SENSITIVITY: f32 = 0.003;

pub fn spawn_player(world: &mut World, position: Vec3) -> Entity {
    world.spawn((Player, Transform::from_position(position), Locomotion::default()))
}

/// Walk, turn and jump every player whose locomotion is enabled. Seated
/// players are moved by their vehicle instead.
pub fn update_player(
    world: &mut World,
    input: &InputState,
    modifiers: &MovementModifiers,
    dt: f32,
    sample_terrain_y: impl Fn(f32, f32) -> f32,
) {
    let mouse = input.mouse_delta();
    let movement = input.get_movement_input();

    for (_, (transform, locomotion, _)) in
        world.query_mut::<(&mut Transform, &mut Locomotion, &Player)>()
    {
        if !locomotion.enabled {
            continue;
        }

        transform.rotate_y(-mouse.x * TURN_SENSITIVITY);

        let mut speed = locomotion.walk_speed * modifiers.speed_multiplier();
        if input.is_sprinting() {
            speed *= SPRINT_MULTIPLIER;
        }
        let wish = transform.flat_forward() * movement.y + transform.right() * movement.x;
        locomotion.velocity.x = wish.x * speed;
        locomotion.velocity.z = wish.z * speed;

        let ground = sample_terrain_y(transform.position.x, transform.position.z);
        let grounded = transform.position.y <= ground + 1e-3;
        if grounded {
            transform.position.y = ground;
            locomotion.velocity.y = 0.0;
            if input.is_jump_pressed() {
                locomotion.velocity.y = locomotion.jump_speed * modifiers.jump_multiplier();
            }
        } else {
            locomotion.velocity.y -= GRAVITY * dt;
        }

        transform.position += locomotion.velocity * dt;

        // Snap to the surface of whatever ground is now underfoot
        let ground = sample_terrain_y(transform.position.x, transform.position.z);
        if transform.position.y < ground {
            transform.position.y = ground;
            locomotion.velocity.y = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::{ElementState, KeyCode};

    fn flat(_x: f32, _z: f32) -> f32 {
        0.0
    }

    #[test]
    fn walking_speed_follows_modifiers() {
        let mut world = World::new();
        let player = spawn_player(&mut world, Vec3::ZERO);
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);

        let mut mods = MovementModifiers::new();
        mods.apply("speedzone_test", 2.0, 1.0);
        update_player(&mut world, &input, &mods, 0.5, flat);

        let t = *world.get::<&Transform>(player).unwrap();
        // forward is -Z; 6 * 2 * 0.5
        assert!((t.position - Vec3::new(0.0, 0.0, -6.0)).length() < 1e-4);
    }

    #[test]
    fn jump_is_scaled_and_lands_on_terrain() {
        let mut world = World::new();
        let player = spawn_player(&mut world, Vec3::new(0.0, 1.0, 0.0));
        let mut input = InputState::new();
        let mut mods = MovementModifiers::new();
        mods.apply("equipment_jump_pack", 1.0, 1.5);

        let raised = |_x: f32, _z: f32| 1.0;
        input.process_keyboard(KeyCode::Space, ElementState::Pressed);
        update_player(&mut world, &input, &mods, 0.01, raised);
        assert!((world.get::<&Locomotion>(player).unwrap().velocity.y - 12.0).abs() < 1e-4);

        input.begin_frame();
        for _ in 0..300 {
            update_player(&mut world, &input, &mods, 0.01, raised);
        }
        assert_eq!(world.get::<&Transform>(player).unwrap().position.y, 1.0);
    }

    #[test]
    fn hovering_just_above_ground_settles_onto_it() {
        let mut world = World::new();
        let player = spawn_player(&mut world, Vec3::new(0.0, 2.0005, 0.0));
        let input = InputState::new();
        update_player(&mut world, &input, &MovementModifiers::new(), 0.01, |_x: f32, _z: f32| 2.0);
        assert_eq!(world.get::<&Transform>(player).unwrap().position.y, 2.0);
    }

    #[test]
    fn disabled_locomotion_is_left_alone() {
        let mut world = World::new();
        let player = spawn_player(&mut world, Vec3::new(0.0, 5.0, 0.0));
        world.get::<&mut Locomotion>(player).unwrap().enabled = false;
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        update_player(&mut world, &input, &MovementModifiers::new(), 0.1, flat);
        assert_eq!(world.get::<&Transform>(player).unwrap().position, Vec3::new(0.0, 5.0, 0.0));
    }
}
