//! Raycasting for ground probes and queries.

use crate::collision::CollisionGroup;
use crate::PhysicsWorld;
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

impl PhysicsWorld {
    /// Cast a ray against whatever `filter` lets through.
    pub fn raycast_filtered(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(collider, intersection)| {
                let point = ray.point_at(intersection.time_of_impact);
                RaycastHit {
                    collider,
                    distance: intersection.time_of_impact,
                    point: Vec3::new(point.x, point.y, point.z),
                    normal: Vec3::new(
                        intersection.normal.x,
                        intersection.normal.y,
                        intersection.normal.z,
                    ),
                }
            })
    }

    /// World Y of the environment surface straight below `origin`, within
    /// `max_distance`. `exclude` skips a body's own colliders.
    pub fn ground_height(
        &self,
        origin: Vec3,
        max_distance: f32,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<f32> {
        let mut filter = QueryFilter::default().groups(CollisionGroup::environment_probe());
        if let Some(body) = exclude {
            filter = filter.exclude_rigid_body(body);
        }
        self.raycast_filtered(origin, Vec3::NEG_Y, max_distance, filter)
            .map(|hit| hit.point.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_height_finds_plane_within_reach() {
        let mut world = PhysicsWorld::new();
        world.add_ground_plane();
        world.update_query_pipeline();

        let h = world.ground_height(Vec3::new(3.0, 5.0, -2.0), 10.0, None);
        assert!(h.is_some_and(|h| h.abs() < 1e-4));
        assert!(world.ground_height(Vec3::new(3.0, 5.0, -2.0), 4.0, None).is_none());
    }

    #[test]
    fn ground_height_reads_raised_platform() {
        let mut world = PhysicsWorld::new();
        world.add_platform(Vec3::new(0.0, 1.0, 0.0), Vec3::new(5.0, 1.0, 5.0));
        world.update_query_pipeline();

        let h = world.ground_height(Vec3::new(0.0, 6.0, 0.0), 10.0, None).unwrap();
        assert!((h - 2.0).abs() < 1e-4);
        assert!(world.ground_height(Vec3::new(20.0, 6.0, 0.0), 10.0, None).is_none());
    }

    #[test]
    fn ground_height_reads_heightfield() {
        let mut world = PhysicsWorld::new();
        assert!(world.add_terrain_heightfield(&[0.0; 3], 2, 10.0).is_none());
        // plane tilted along X: y = x / 4 + 2.5
        let heights: Vec<f32> = (0..9).map(|i| [1.25, 2.5, 3.75][i % 3]).collect();
        world.add_terrain_heightfield(&heights, 3, 10.0).unwrap();
        world.update_query_pipeline();

        let h = world.ground_height(Vec3::new(2.0, 10.0, 1.0), 20.0, None).unwrap();
        assert!((h - 3.0).abs() < 1e-3, "h = {}", h);
    }
}
