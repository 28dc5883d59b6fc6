//! Capabilities the controller needs from its host: a rigid body, a ground
//! probe and something that can seat an actor.

use glam::{Quat, Vec3};

/// How a force passed to [`VehicleBody::apply_force`] is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceMode {
    /// Newtons; the integrator divides by mass.
    Force,
    /// Units/s²; mass is ignored.
    Acceleration,
}

/// Direct access to the vehicle's rigid body for the current step.
pub trait VehicleBody {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn linear_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, velocity: Vec3);
    fn orientation(&self) -> Quat;
    fn set_orientation(&mut self, orientation: Quat);
    /// Accumulate a force for the current step only.
    fn apply_force(&mut self, force: Vec3, mode: ForceMode);
}

/// Downward probe against world geometry.
pub trait GroundQuery {
    /// World Y of the first surface straight below `origin`, if one lies within
    /// `max_distance`. Implementors must ignore the vehicle's own collider.
    fn ground_height(&self, origin: Vec3, max_distance: f32) -> Option<f32>;
}

/// Everything a tick needs in one borrow.
pub trait HoverEnvironment: VehicleBody + GroundQuery {}

impl<T: VehicleBody + GroundQuery + ?Sized> HoverEnvironment for T {}

/// Parents actors to the vehicle and toggles their own movement.
pub trait ActorRig {
    /// Non-owning actor handle.
    type Actor: Copy + Eq + std::fmt::Debug;

    /// Parent `actor` to the vehicle frame at `local_offset`.
    fn attach_actor(&mut self, actor: Self::Actor, local_offset: Vec3);
    fn detach_actor(&mut self, actor: Self::Actor);
    fn set_locomotion_enabled(&mut self, actor: Self::Actor, enabled: bool);
    fn set_actor_position(&mut self, actor: Self::Actor, position: Vec3);
    fn is_actor_alive(&self, actor: Self::Actor) -> bool;
}
