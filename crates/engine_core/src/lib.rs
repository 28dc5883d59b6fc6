//! Core engine types shared by the hoverpod crates.
//!
//! This crate provides the foundational types used across all systems:
//! - Transform and heading helpers
//! - Fixed-step time management
//! - Actor components for the ECS

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
pub use hecs::{Entity, World};
