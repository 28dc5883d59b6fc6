//! Seating actors on vehicles through the ECS.

use engine_core::{Entity, Locomotion, Quat, Seated, Transform, Vec3, World};
use hover::{ActorRig, VehicleId};

/// [`ActorRig`] over the hecs world for one vehicle.
pub struct SeatRig<'w> {
    world: &'w mut World,
    vehicle: VehicleId,
}

impl<'w> SeatRig<'w> {
    pub fn new(world: &'w mut World, vehicle: VehicleId) -> Self {
        Self { world, vehicle }
    }
}

impl ActorRig for SeatRig<'_> {
    type Actor = Entity;

    fn attach_actor(&mut self, actor: Entity, local_offset: Vec3) {
        let seat = Seated {
            vehicle: self.vehicle.raw(),
            local_offset,
        };
        if self.world.insert_one(actor, seat).is_err() {
            log::debug!("Cannot seat {:?}: no such entity", actor);
        }
    }

    fn detach_actor(&mut self, actor: Entity) {
        // Already unseated is fine
        let _ = self.world.remove_one::<Seated>(actor);
    }

    fn set_locomotion_enabled(&mut self, actor: Entity, enabled: bool) {
        if let Ok(mut locomotion) = self.world.get::<&mut Locomotion>(actor) {
            locomotion.enabled = enabled;
            locomotion.velocity = Vec3::ZERO;
        }
    }

    fn set_actor_position(&mut self, actor: Entity, position: Vec3) {
        if let Ok(mut transform) = self.world.get::<&mut Transform>(actor) {
            transform.position = position;
        }
    }

    fn is_actor_alive(&self, actor: Entity) -> bool {
        self.world.contains(actor)
    }
}

/// Carry seated actors along with their vehicle. Actors keep the vehicle's
/// yaw but stay upright.
pub fn follow_vehicle(world: &mut World, vehicle: VehicleId, frame: &Transform) {
    let yaw = hover::attitude::yaw_of(frame.rotation);
    for (_, (transform, seat)) in world.query_mut::<(&mut Transform, &Seated)>() {
        if seat.vehicle != vehicle.raw() {
            continue;
        }
        transform.position = frame.transform_point(seat.local_offset);
        transform.rotation = Quat::from_rotation_y(yaw);
    }
}
