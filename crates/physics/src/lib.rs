//! Physics system using Rapier3D for hoverpod.

pub mod collision;
pub mod physics_world;
pub mod raycast;
pub mod vehicle;

pub use collision::*;
pub use physics_world::*;
pub use raycast::*;
pub use vehicle::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

// Re-export common Rapier types
pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};
