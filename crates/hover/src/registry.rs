//! Registry of summoned vehicles, owned by the application.

use std::collections::BTreeMap;
use std::fmt;

use crate::controller::HoverController;

/// Stable id handed out on summon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VehicleId(u32);

impl VehicleId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vehicle#{}", self.0)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{0} is already summoned; dismiss it first")]
    AlreadyActive(VehicleId),
    #[error("no summoned vehicle with id {0}")]
    UnknownVehicle(VehicleId),
}

/// One summoned vehicle: its controller and the host's body handle.
#[derive(Debug)]
pub struct VehicleEntry<A, H> {
    pub controller: HoverController<A>,
    pub body: H,
}

/// Summoned vehicles keyed by id. Limits how many may exist at once
/// (one by default).
#[derive(Debug)]
pub struct VehicleRegistry<A, H> {
    vehicles: BTreeMap<VehicleId, VehicleEntry<A, H>>,
    next_id: u32,
    max_active: usize,
}

impl<A, H> Default for VehicleRegistry<A, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, H> VehicleRegistry<A, H> {
    pub fn new() -> Self {
        Self::with_capacity_limit(1)
    }

    pub fn with_capacity_limit(max_active: usize) -> Self {
        Self {
            vehicles: BTreeMap::new(),
            next_id: 1,
            max_active: max_active.max(1),
        }
    }

    /// Register a freshly spawned vehicle.
    pub fn summon(
        &mut self,
        controller: HoverController<A>,
        body: H,
    ) -> Result<VehicleId, RegistryError> {
        if self.vehicles.len() >= self.max_active {
            if let Some(&existing) = self.vehicles.keys().next() {
                return Err(RegistryError::AlreadyActive(existing));
            }
        }
        let id = VehicleId(self.next_id);
        self.next_id += 1;
        self.vehicles.insert(id, VehicleEntry { controller, body });
        log::info!("Summoned {}", id);
        Ok(id)
    }

    /// Remove a vehicle. The caller releases the returned controller (so any
    /// rider is dismounted) before destroying the body.
    pub fn dismiss(&mut self, id: VehicleId) -> Result<VehicleEntry<A, H>, RegistryError> {
        let entry = self
            .vehicles
            .remove(&id)
            .ok_or(RegistryError::UnknownVehicle(id))?;
        log::info!("Dismissed {}", id);
        Ok(entry)
    }

    /// The oldest summoned vehicle.
    pub fn active(&self) -> Option<VehicleId> {
        self.vehicles.keys().next().copied()
    }

    pub fn get(&self, id: VehicleId) -> Option<&VehicleEntry<A, H>> {
        self.vehicles.get(&id)
    }

    pub fn get_mut(&mut self, id: VehicleId) -> Option<&mut VehicleEntry<A, H>> {
        self.vehicles.get_mut(&id)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (VehicleId, &mut VehicleEntry<A, H>)> {
        self.vehicles.iter_mut().map(|(id, entry)| (*id, entry))
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HoverTuning;

    fn controller() -> HoverController<u32> {
        HoverController::new(HoverTuning::default())
    }

    #[test]
    fn second_summon_is_rejected_while_one_is_active() {
        let mut registry: VehicleRegistry<u32, &str> = VehicleRegistry::new();
        let first = registry.summon(controller(), "pod-a").unwrap();
        assert_eq!(registry.active(), Some(first));
        assert_eq!(
            registry.summon(controller(), "pod-b").unwrap_err(),
            RegistryError::AlreadyActive(first)
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn dismiss_frees_the_slot_and_ids_are_not_reused() {
        let mut registry: VehicleRegistry<u32, &str> = VehicleRegistry::new();
        let first = registry.summon(controller(), "pod-a").unwrap();
        let entry = registry.dismiss(first).unwrap();
        assert_eq!(entry.body, "pod-a");
        assert!(registry.is_empty());
        assert_eq!(
            registry.dismiss(first).unwrap_err(),
            RegistryError::UnknownVehicle(first)
        );

        let second = registry.summon(controller(), "pod-b").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn capacity_limit_allows_several_vehicles() {
        let mut registry: VehicleRegistry<u32, u8> = VehicleRegistry::with_capacity_limit(2);
        registry.summon(controller(), 1).unwrap();
        registry.summon(controller(), 2).unwrap();
        assert!(registry.summon(controller(), 3).is_err());
        assert_eq!(registry.iter_mut().count(), 2);
    }
}
