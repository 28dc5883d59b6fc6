//! Physics world management with Rapier3D.

use crate::collision::{CollisionGroup, PhysicsBody};
use engine_core::{Quat, Transform, Vec3};
use hover::HoverTuning;
use rapier3d::prelude::*;

/// Main physics world containing all simulation state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with default gravity.
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, -9.81, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Match the integrator step to the fixed update rate.
    pub fn set_timestep(&mut self, dt: f32) {
        if dt > 0.0 {
            self.integration_parameters.dt = dt;
        }
    }

    pub fn timestep(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Step the physics simulation. User forces only last for the step they
    /// were applied in.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        for (_, body) in self.rigid_body_set.iter_mut() {
            if body.user_force().norm_squared() > 0.0 {
                body.reset_forces(false);
            }
        }
    }

    /// Update query pipeline for raycasting.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Spawn a hover vehicle body: dynamic, rotation locked, no gravity of its
    /// own. The hover controller supplies every vertical force.
    pub fn add_hover_body(
        &mut self,
        position: Vec3,
        half_extents: Vec3,
        tuning: &HoverTuning,
    ) -> PhysicsBody {
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y, position.z])
            .gravity_scale(0.0)
            .linear_damping(tuning.drag)
            .lock_rotations()
            .ccd_enabled(true)
            .build();
        let handle = self.rigid_body_set.insert(rigid_body);

        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .mass(tuning.mass)
            .collision_groups(CollisionGroup::vehicle())
            .build();
        let collider =
            self.collider_set
                .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        log::debug!("Hover body {:?} at {:?}", handle, position);
        PhysicsBody::with_collider(handle, collider)
    }

    /// Add a ground plane collider (flat Y=0 half-space).
    pub fn add_ground_plane(&mut self) -> ColliderHandle {
        let collider = ColliderBuilder::halfspace(Vector::y_axis())
            .collision_groups(CollisionGroup::environment())
            .build();
        self.collider_set.insert(collider)
    }

    /// Fixed box collider centred at `center` (platforms, rocks).
    pub fn add_platform(&mut self, center: Vec3, half_extents: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![center.x, center.y, center.z])
            .collision_groups(CollisionGroup::environment())
            .build();
        self.collider_set.insert(collider)
    }

    /// Square heightfield centred on the origin, spanning `-size/2..size/2`
    /// in X and Z. `heights` is row-major (`z * resolution + x`) in world Y.
    /// Returns `None` if the grid is degenerate or the slice is short.
    pub fn add_terrain_heightfield(
        &mut self,
        heights: &[f32],
        resolution: usize,
        size: f32,
    ) -> Option<ColliderHandle> {
        if resolution < 2 || heights.len() < resolution * resolution {
            log::warn!(
                "Rejecting heightfield: {} samples for a {}x{} grid",
                heights.len(),
                resolution,
                resolution
            );
            return None;
        }

        log::debug!("Terrain heightfield {}x{} over {} units", resolution, resolution, size);
        let heights = DMatrix::from_fn(resolution, resolution, |z, x| heights[z * resolution + x]);
        let collider = ColliderBuilder::heightfield(heights, vector![size, 1.0, size])
            .collision_groups(CollisionGroup::environment())
            .build();
        Some(self.collider_set.insert(collider))
    }

    /// Get the transform of a rigid body.
    pub fn get_body_transform(&self, handle: RigidBodyHandle) -> Option<Transform> {
        let body = self.rigid_body_set.get(handle)?;
        let pos = body.translation();
        let rot = body.rotation();
        Some(Transform::from_position_rotation(
            Vec3::new(pos.x, pos.y, pos.z),
            Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w),
        ))
    }

    /// Remove a rigid body and its colliders.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }
}
