//! Hover vehicle flight control.
//!
//! This crate provides:
//! - [`HoverController`]: height hold, flight and rider handling for one vehicle
//! - the host capabilities it drives ([`VehicleBody`], [`GroundQuery`], [`ActorRig`])
//! - [`VehicleRegistry`] for the application's summoned vehicles
//! - [`PointMassVehicle`] for running the controller without a physics engine

pub mod attitude;
pub mod controller;
pub mod env;
pub mod input;
pub mod point_mass;
pub mod registry;
pub mod tuning;

pub use controller::{HoverController, HoverTelemetry, MountState};
pub use env::{ActorRig, ForceMode, GroundQuery, HoverEnvironment, VehicleBody};
pub use input::HoverInput;
pub use point_mass::{PointMassBody, PointMassVehicle};
pub use registry::{RegistryError, VehicleEntry, VehicleId, VehicleRegistry};
pub use tuning::HoverTuning;
