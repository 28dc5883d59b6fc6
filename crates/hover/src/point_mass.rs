//! Physics-free vehicle body: a point mass with linear drag over a height
//! function. Good enough to run the controller headless.

use glam::{Quat, Vec3};

use crate::env::{ForceMode, GroundQuery, VehicleBody};

/// Point mass integrated with semi-implicit Euler.
#[derive(Debug, Clone)]
pub struct PointMassBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub orientation: Quat,
    pub mass: f32,
    /// Linear drag: velocity loses `drag * dt` of itself per step.
    pub drag: f32,
    /// Gravity the body feels on its own. Hover bodies normally carry none.
    pub gravity: Vec3,
    /// Acceleration accumulated for the current step.
    accel: Vec3,
}

impl PointMassBody {
    pub fn new(position: Vec3, mass: f32, drag: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            mass,
            drag,
            gravity: Vec3::ZERO,
            accel: Vec3::ZERO,
        }
    }

    /// Acceleration queued for the next [`integrate`](Self::integrate).
    pub fn pending_acceleration(&self) -> Vec3 {
        self.accel
    }

    /// Advance one step and clear the accumulated forces.
    pub fn integrate(&mut self, dt: f32) {
        self.velocity += (self.accel + self.gravity) * dt;
        self.velocity *= (1.0 - self.drag * dt).max(0.0);
        self.position += self.velocity * dt;
        self.accel = Vec3::ZERO;
    }
}

impl VehicleBody for PointMassBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn linear_velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn orientation(&self) -> Quat {
        self.orientation
    }

    fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    fn apply_force(&mut self, force: Vec3, mode: ForceMode) {
        match mode {
            ForceMode::Acceleration => self.accel += force,
            ForceMode::Force => {
                if self.mass > 0.0 {
                    self.accel += force / self.mass;
                }
            }
        }
    }
}

/// A point-mass body flying over terrain described by `height(x, z)`.
/// `None` from the height function is a hole with no floor.
pub struct PointMassVehicle<F> {
    pub body: PointMassBody,
    height: F,
}

impl<F: Fn(f32, f32) -> Option<f32>> PointMassVehicle<F> {
    pub fn new(body: PointMassBody, height: F) -> Self {
        Self { body, height }
    }

    pub fn integrate(&mut self, dt: f32) {
        self.body.integrate(dt);
    }
}

impl<F> VehicleBody for PointMassVehicle<F> {
    fn position(&self) -> Vec3 {
        self.body.position()
    }

    fn set_position(&mut self, position: Vec3) {
        self.body.set_position(position);
    }

    fn linear_velocity(&self) -> Vec3 {
        self.body.linear_velocity()
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.body.set_linear_velocity(velocity);
    }

    fn orientation(&self) -> Quat {
        self.body.orientation()
    }

    fn set_orientation(&mut self, orientation: Quat) {
        self.body.set_orientation(orientation);
    }

    fn apply_force(&mut self, force: Vec3, mode: ForceMode) {
        self.body.apply_force(force, mode);
    }
}

impl<F: Fn(f32, f32) -> Option<f32>> GroundQuery for PointMassVehicle<F> {
    fn ground_height(&self, origin: Vec3, max_distance: f32) -> Option<f32> {
        let height = (self.height)(origin.x, origin.z)?;
        let depth = origin.y - height;
        (0.0..=max_distance).contains(&depth).then_some(height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acceleration_ignores_mass_and_force_divides_by_it() {
        let mut body = PointMassBody::new(Vec3::ZERO, 10.0, 0.0);
        body.apply_force(Vec3::Y * 2.0, ForceMode::Acceleration);
        body.apply_force(Vec3::Y * 30.0, ForceMode::Force);
        assert_eq!(body.pending_acceleration(), Vec3::Y * 5.0);
        body.integrate(0.5);
        assert_eq!(body.velocity, Vec3::Y * 2.5);
        assert_eq!(body.pending_acceleration(), Vec3::ZERO);
    }

    #[test]
    fn ground_probe_respects_range_and_holes() {
        let vehicle = PointMassVehicle::new(PointMassBody::new(Vec3::ZERO, 1.0, 0.0), |x: f32, _z: f32| {
            (x < 10.0).then_some(1.0)
        });
        assert_eq!(vehicle.ground_height(Vec3::new(0.0, 3.0, 0.0), 4.0), Some(1.0));
        assert_eq!(vehicle.ground_height(Vec3::new(0.0, 6.0, 0.0), 4.0), None);
        assert_eq!(vehicle.ground_height(Vec3::new(0.0, 0.5, 0.0), 4.0), None);
        assert_eq!(vehicle.ground_height(Vec3::new(20.0, 3.0, 0.0), 4.0), None);
    }
}
