//! Common ECS components used across the engine.

use glam::Vec3;

/// Tag component for the player entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Player;

/// On-foot movement for actors that walk on their own.
#[derive(Debug, Clone, Copy)]
pub struct Locomotion {
    /// When false something else (a vehicle seat) drives the transform.
    pub enabled: bool,
    /// Walking speed before modifiers.
    pub walk_speed: f32,
    /// Jump impulse before modifiers.
    pub jump_speed: f32,
    /// Current velocity.
    pub velocity: Vec3,
}

impl Locomotion {
    pub fn new(walk_speed: f32, jump_speed: f32) -> Self {
        Self {
            enabled: true,
            walk_speed,
            jump_speed,
            velocity: Vec3::ZERO,
        }
    }
}

impl Default for Locomotion {
    fn default() -> Self {
        Self::new(6.0, 8.0)
    }
}

/// Marks an actor parented to a vehicle frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seated {
    /// Raw id of the vehicle carrying the actor.
    pub vehicle: u32,
    /// Seat position in the vehicle's local frame.
    pub local_offset: Vec3,
}
