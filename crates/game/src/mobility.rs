//! Movement modifiers and mobility equipment.

use std::collections::BTreeMap;

/// One named multiplier pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modifier {
    pub speed: f32,
    pub jump: f32,
}

/// Keyed stack of speed/jump multipliers. Re-applying a key replaces it.
#[derive(Debug, Default, Clone)]
pub struct MovementModifiers {
    entries: BTreeMap<String, Modifier>,
}

impl MovementModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, key: impl Into<String>, speed: f32, jump: f32) {
        let key = key.into();
        log::debug!("Modifier {} applied (speed x{}, jump x{})", key, speed, jump);
        self.entries.insert(key, Modifier { speed, jump });
    }

    /// Returns false if `key` was not applied.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            log::debug!("Modifier {} removed", key);
        }
        removed
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Product of every speed multiplier.
    pub fn speed_multiplier(&self) -> f32 {
        self.entries.values().map(|m| m.speed).product()
    }

    /// Product of every jump multiplier.
    pub fn jump_multiplier(&self) -> f32 {
        self.entries.values().map(|m| m.jump).product()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equipment {
    SpeedBoots,
    JumpPack,
}

impl Equipment {
    pub const ALL: [Equipment; 2] = [Equipment::SpeedBoots, Equipment::JumpPack];

    pub fn name(self) -> &'static str {
        match self {
            Equipment::SpeedBoots => "Speed Boots",
            Equipment::JumpPack => "Jump Pack",
        }
    }

    fn modifier_key(self) -> &'static str {
        match self {
            Equipment::SpeedBoots => "equipment_speed_boots",
            Equipment::JumpPack => "equipment_jump_pack",
        }
    }

    fn multipliers(self) -> Modifier {
        match self {
            Equipment::SpeedBoots => Modifier { speed: 1.25, jump: 1.0 },
            Equipment::JumpPack => Modifier { speed: 1.0, jump: 1.5 },
        }
    }

    pub fn equip(self, modifiers: &mut MovementModifiers) {
        let m = self.multipliers();
        modifiers.apply(self.modifier_key(), m.speed, m.jump);
        log::info!("Equipped {}", self.name());
    }

    pub fn unequip(self, modifiers: &mut MovementModifiers) {
        if modifiers.remove(self.modifier_key()) {
            log::info!("Unequipped {}", self.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipliers_are_the_product_of_entries() {
        let mut mods = MovementModifiers::new();
        assert_eq!(mods.speed_multiplier(), 1.0);
        mods.apply("a", 1.5, 1.0);
        mods.apply("b", 2.0, 1.2);
        assert!((mods.speed_multiplier() - 3.0).abs() < 1e-6);
        assert!((mods.jump_multiplier() - 1.2).abs() < 1e-6);

        // same key replaces rather than stacks
        mods.apply("a", 1.1, 1.0);
        assert!((mods.speed_multiplier() - 2.2).abs() < 1e-6);

        assert!(mods.remove("b"));
        assert!(!mods.remove("b"));
        assert!((mods.speed_multiplier() - 1.1).abs() < 1e-6);
    }

    #[test]
    fn equipment_applies_and_removes_its_effect() {
        let mut mods = MovementModifiers::new();
        for item in Equipment::ALL {
            item.equip(&mut mods);
        }
        assert!((mods.speed_multiplier() - 1.25).abs() < 1e-6);
        assert!((mods.jump_multiplier() - 1.5).abs() < 1e-6);

        Equipment::SpeedBoots.unequip(&mut mods);
        assert_eq!(mods.speed_multiplier(), 1.0);
        assert!((mods.jump_multiplier() - 1.5).abs() < 1e-6);
        assert_eq!(mods.len(), 1);
    }
}
