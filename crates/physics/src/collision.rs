//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for different entity types.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static environment (terrain, platforms)
    Environment = 1 << 0,
    /// Player character
    Player = 1 << 1,
    /// Hover vehicles
    Vehicle = 1 << 2,
}

impl CollisionGroup {
    fn bits(self) -> Group {
        Group::from_bits_retain(self as u32)
    }

    /// Create a collision group for environment.
    pub fn environment() -> InteractionGroups {
        InteractionGroups::new(Self::Environment.bits(), Group::ALL)
    }

    /// Vehicles bump into terrain and the player, never into other vehicles.
    pub fn vehicle() -> InteractionGroups {
        InteractionGroups::new(
            Self::Vehicle.bits(),
            Self::Environment.bits() | Self::Player.bits(),
        )
    }

    /// Filter for probes that should only see world geometry.
    pub fn environment_probe() -> InteractionGroups {
        InteractionGroups::new(Group::ALL, Self::Environment.bits())
    }
}

/// Links a game object to its physics handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsBody {
    pub rigid_body: RigidBodyHandle,
    pub collider: Option<ColliderHandle>,
}

impl PhysicsBody {
    pub fn with_collider(rigid_body: RigidBodyHandle, collider: ColliderHandle) -> Self {
        Self {
            rigid_body,
            collider: Some(collider),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_sees_environment_but_not_vehicles() {
        let probe = CollisionGroup::environment_probe();
        assert!(probe.test(CollisionGroup::environment()));
        assert!(!probe.test(CollisionGroup::vehicle()));
        assert!(CollisionGroup::vehicle().test(CollisionGroup::environment()));
    }
}
