//! Spherical speed-boost zones polled against the player each frame.

use std::collections::BTreeMap;

use glam::Vec3;

use crate::mobility::MovementModifiers;

#[derive(Debug, Clone)]
pub struct SpeedZone {
    pub id: String,
    pub position: Vec3,
    pub radius: f32,
    pub multiplier: f32,
    pub player_inside: bool,
}

impl SpeedZone {
    fn modifier_key(&self) -> String {
        modifier_key(&self.id)
    }
}

fn modifier_key(id: &str) -> String {
    format!("speedzone_{}", id)
}

/// Edge reported by [`SpeedZones::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneEvent {
    Entered(String),
    Exited(String),
}

#[derive(Debug, Default)]
pub struct SpeedZones {
    zones: BTreeMap<String, SpeedZone>,
}

impl SpeedZones {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a zone. Replacing a zone the player is inside swaps
    /// its modifier for the new multiplier right away.
    pub fn create(
        &mut self,
        id: impl Into<String>,
        position: Vec3,
        radius: f32,
        multiplier: f32,
        modifiers: &mut MovementModifiers,
    ) {
        let zone = SpeedZone {
            id: id.into(),
            position,
            radius: radius.max(0.0),
            multiplier,
            player_inside: false,
        };
        let player_inside = self.zones.get(&zone.id).is_some_and(|z| z.player_inside);
        if player_inside {
            modifiers.apply(zone.modifier_key(), multiplier, 1.0);
        }
        log::debug!("Created speed zone {} at {:?}", zone.id, position);
        self.zones.insert(zone.id.clone(), SpeedZone { player_inside, ..zone });
    }

    /// Remove a zone, dropping its modifier if the player is inside.
    pub fn remove(&mut self, id: &str, modifiers: &mut MovementModifiers) -> bool {
        match self.zones.remove(id) {
            Some(zone) => {
                if zone.player_inside {
                    modifiers.remove(&zone.modifier_key());
                }
                log::debug!("Removed speed zone {}", id);
                true
            }
            None => false,
        }
    }

    /// Remove every zone.
    pub fn clear(&mut self, modifiers: &mut MovementModifiers) {
        let ids: Vec<String> = self.zones.keys().cloned().collect();
        for id in ids {
            self.remove(&id, modifiers);
        }
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Proximity poll. Applies the zone modifier on entry and removes it on exit.
    pub fn update(&mut self, player_position: Vec3, modifiers: &mut MovementModifiers) -> Vec<ZoneEvent> {
        let mut events = Vec::new();
        for zone in self.zones.values_mut() {
            let inside = player_position.distance(zone.position) <= zone.radius;
            if inside && !zone.player_inside {
                zone.player_inside = true;
                modifiers.apply(zone.modifier_key(), zone.multiplier, 1.0);
                log::debug!("Entered speed zone {}", zone.id);
                events.push(ZoneEvent::Entered(zone.id.clone()));
            } else if !inside && zone.player_inside {
                zone.player_inside = false;
                modifiers.remove(&zone.modifier_key());
                log::debug!("Exited speed zone {}", zone.id);
                events.push(ZoneEvent::Exited(zone.id.clone()));
            }
        }
        events
    }
}
