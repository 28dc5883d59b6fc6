//! Rapier binding for the hover controller.

use engine_core::{Quat, Vec3};
use hover::{ForceMode, GroundQuery, VehicleBody};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;

use crate::PhysicsWorld;

/// One vehicle body inside a [`PhysicsWorld`], borrowed for a tick.
pub struct RapierVehicle<'w> {
    world: &'w mut PhysicsWorld,
    handle: RigidBodyHandle,
}

impl<'w> RapierVehicle<'w> {
    /// `None` if the body no longer exists.
    pub fn new(world: &'w mut PhysicsWorld, handle: RigidBodyHandle) -> Option<Self> {
        world.rigid_body_set.contains(handle).then_some(Self { world, handle })
    }

    pub fn handle(&self) -> RigidBodyHandle {
        self.handle
    }

    fn body(&self) -> &RigidBody {
        &self.world.rigid_body_set[self.handle]
    }

    fn body_mut(&mut self) -> &mut RigidBody {
        &mut self.world.rigid_body_set[self.handle]
    }
}

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

impl VehicleBody for RapierVehicle<'_> {
    fn position(&self) -> Vec3 {
        to_vec3(self.body().translation())
    }

    fn set_position(&mut self, position: Vec3) {
        self.body_mut().set_translation(to_vector(position), true);
    }

    fn linear_velocity(&self) -> Vec3 {
        to_vec3(self.body().linvel())
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.body_mut().set_linvel(to_vector(velocity), true);
    }

    fn orientation(&self) -> Quat {
        let rot = self.body().rotation();
        Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w)
    }

    fn set_orientation(&mut self, orientation: Quat) {
        let q = orientation.normalize();
        let rotation = UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z));
        self.body_mut().set_rotation(rotation, true);
    }

    fn apply_force(&mut self, force: Vec3, mode: ForceMode) {
        let dt = self.world.timestep();
        let body = self.body_mut();
        match mode {
            ForceMode::Force => body.add_force(to_vector(force), true),
            ForceMode::Acceleration => {
                let mass = body.mass();
                if mass > 0.0 {
                    body.add_force(to_vector(force * mass), true);
                } else {
                    // mass properties are only settled by the first step
                    let v = body.linvel() + to_vector(force * dt);
                    body.set_linvel(v, true);
                }
            }
        }
    }
}

impl GroundQuery for RapierVehicle<'_> {
    fn ground_height(&self, origin: Vec3, max_distance: f32) -> Option<f32> {
        self.world.ground_height(origin, max_distance, Some(self.handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hover::{HoverController, HoverInput, HoverTuning};

    #[test]
    fn vehicle_settles_over_ground_plane() {
        let tuning = HoverTuning::default();
        let dt = 0.02;
        let mut world = PhysicsWorld::new();
        world.set_timestep(dt);
        world.add_ground_plane();
        let body = world.add_hover_body(Vec3::new(0.0, 4.0, 0.0), Vec3::new(0.8, 0.3, 1.2), &tuning);
        world.update_query_pipeline();

        let mut controller: HoverController<u32> = HoverController::new(tuning);
        for _ in 0..300 {
            if let Some(mut vehicle) = RapierVehicle::new(&mut world, body.rigid_body) {
                controller.tick(dt, &mut vehicle, &HoverInput::default());
            }
            world.step();
        }

        let height = world.get_body_transform(body.rigid_body).unwrap().position.y;
        assert!(
            (height - tuning.default_hover_height).abs() < 0.15,
            "settled at {}",
            height
        );
    }

    #[test]
    fn probes_ignore_the_vehicle_itself() {
        let tuning = HoverTuning::default();
        let mut world = PhysicsWorld::new();
        world.add_ground_plane();
        let body = world.add_hover_body(Vec3::new(0.0, 2.0, 0.0), Vec3::new(1.0, 0.3, 1.0), &tuning);
        world.update_query_pipeline();

        let vehicle = RapierVehicle::new(&mut world, body.rigid_body).unwrap();
        let h = vehicle.ground_height(Vec3::new(0.0, 2.0, 0.0), 10.0).unwrap();
        assert!(h.abs() < 1e-4);
    }

    #[test]
    fn missing_body_yields_no_binding() {
        let tuning = HoverTuning::default();
        let mut world = PhysicsWorld::new();
        let body = world.add_hover_body(Vec3::ZERO, Vec3::ONE, &tuning);
        world.remove_body(body.rigid_body);
        assert!(RapierVehicle::new(&mut world, body.rigid_body).is_none());
    }
}
