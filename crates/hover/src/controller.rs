//! Hover flight controller.
//!
//! Runs once per fixed physics step. Height is held by a PID-style law against
//! the mean of five downward ground probes; horizontal flight tracks a desired
//! velocity built from the input axes; orientation is assigned absolutely
//! every tick from a heading plus a velocity-derived tilt.

use glam::{Quat, Vec3};

use crate::attitude::{
    approach_heading, compose, heading_of, level_toward_upright, tilt_for_velocity, view_basis,
    yaw_basis, yaw_of,
};
use crate::env::{ActorRig, ForceMode, GroundQuery, HoverEnvironment, VehicleBody};
use crate::input::HoverInput;
use crate::tuning::HoverTuning;

/// Rider attachment state. Mounted always carries its rider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountState<A> {
    Idle,
    Mounted { rider: A },
}

/// What one tick computed, for logging and inspection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HoverTelemetry {
    /// Mean ground height, or `None` when every probe missed.
    pub ground_height: Option<f32>,
    /// Setpoint minus measured clearance (0 while no ground is found).
    pub height_error: f32,
    /// Vertical acceleration commanded this tick.
    pub vertical_accel: f32,
    /// Horizontal acceleration commanded this tick.
    pub horizontal_accel: Vec3,
    pub pitch: f32,
    pub roll: f32,
}

/// Controller for one hover vehicle.
///
/// `A` is the host's actor handle. The controller never owns the actor and
/// never outlives the registry entry that holds it.
#[derive(Debug, Clone)]
pub struct HoverController<A> {
    tuning: HoverTuning,
    target_height: f32,
    smoothed_height: f32,
    integral: f32,
    heading: f32,
    mount: MountState<A>,
    ground_contact: bool,
}

impl<A: Copy + Eq + std::fmt::Debug> HoverController<A> {
    pub fn new(tuning: HoverTuning) -> Self {
        let tuning = tuning.sanitized();
        let height = tuning.default_hover_height;
        Self {
            tuning,
            target_height: height,
            smoothed_height: height,
            integral: 0.0,
            heading: 0.0,
            mount: MountState::Idle,
            ground_contact: true,
        }
    }

    /// Start facing `heading` (radians about +Y).
    pub fn with_heading(mut self, heading: f32) -> Self {
        self.heading = crate::attitude::wrap_angle(heading);
        self
    }

    pub fn tuning(&self) -> &HoverTuning {
        &self.tuning
    }

    pub fn target_height(&self) -> f32 {
        self.target_height
    }

    /// Move the setpoint directly. The smoothed setpoint follows over time.
    pub fn set_target_height(&mut self, height: f32) {
        self.target_height = self.tuning.clamp_height(height);
    }

    pub fn smoothed_target_height(&self) -> f32 {
        self.smoothed_height
    }

    pub fn integral_error(&self) -> f32 {
        self.integral
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn mount_state(&self) -> MountState<A> {
        self.mount
    }

    pub fn rider(&self) -> Option<A> {
        match self.mount {
            MountState::Idle => None,
            MountState::Mounted { rider } => Some(rider),
        }
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self.mount, MountState::Mounted { .. })
    }

    /// Whether the last tick found ground under the vehicle.
    pub fn has_ground_contact(&self) -> bool {
        self.ground_contact
    }

    fn seat_offset(&self) -> Vec3 {
        Vec3::from_array(self.tuning.seat_offset)
    }

    /// Seat `actor` on the vehicle. Returns `false` if someone is already
    /// seated or the actor no longer exists.
    pub fn mount<R>(&mut self, actor: A, rig: &mut R) -> bool
    where
        R: ActorRig<Actor = A> + ?Sized,
    {
        if let MountState::Mounted { rider } = self.mount {
            log::debug!("Mount ignored: vehicle already carries {:?}", rider);
            return false;
        }
        if !rig.is_actor_alive(actor) {
            log::debug!("Mount ignored: {:?} does not exist", actor);
            return false;
        }

        rig.set_locomotion_enabled(actor, false);
        rig.attach_actor(actor, self.seat_offset());
        self.integral = 0.0;
        self.mount = MountState::Mounted { rider: actor };
        log::info!("Mounted {:?}", actor);
        true
    }

    /// Put the rider back on the ground beside the vehicle. Returns `false`
    /// when nobody is seated.
    pub fn dismount<E, R>(&mut self, env: &E, rig: &mut R) -> bool
    where
        E: HoverEnvironment + ?Sized,
        R: ActorRig<Actor = A> + ?Sized,
    {
        let MountState::Mounted { rider } = self.mount else {
            log::debug!("Dismount ignored: vehicle is idle");
            return false;
        };

        rig.detach_actor(rider);

        let (_, right) = yaw_basis(self.heading);
        let mut spot = env.position() + right * self.tuning.dismount_offset;
        let reach = self.target_height * self.tuning.probe_depth_factor + 1.0;
        if let Some(ground) = env.ground_height(spot + Vec3::Y, reach) {
            spot.y = ground;
        }

        rig.set_actor_position(rider, spot);
        rig.set_locomotion_enabled(rider, true);
        self.mount = MountState::Idle;
        log::info!("Dismounted {:?} at {:?}", rider, spot);
        true
    }

    /// Teleport an idle vehicle in front of the player. Rejected while mounted.
    pub fn recall_to_player<B>(
        &mut self,
        body: &mut B,
        actor_position: Vec3,
        actor_forward: Vec3,
    ) -> bool
    where
        B: VehicleBody + ?Sized,
    {
        if let MountState::Mounted { rider } = self.mount {
            log::debug!("Recall ignored: vehicle is carrying {:?}", rider);
            return false;
        }

        let heading = heading_of(actor_forward).unwrap_or(self.heading);
        let (forward, _) = yaw_basis(heading);
        let position =
            actor_position + forward * self.tuning.recall_distance + Vec3::Y * self.target_height;

        body.set_position(position);
        body.set_linear_velocity(Vec3::ZERO);
        body.set_orientation(Quat::from_rotation_y(heading));
        self.heading = heading;
        self.integral = 0.0;
        self.smoothed_height = self.target_height;
        log::info!("Recalled vehicle to {:?}", position);
        true
    }

    /// Teardown. Forces a dismount if someone is seated; a rider that no longer
    /// exists is just forgotten. Returns the rider that was seated, if any.
    pub fn release<E, R>(&mut self, env: &E, rig: &mut R) -> Option<A>
    where
        E: HoverEnvironment + ?Sized,
        R: ActorRig<Actor = A> + ?Sized,
    {
        let rider = self.rider()?;
        if rig.is_actor_alive(rider) {
            self.dismount(env, rig);
        } else {
            log::warn!("Rider {:?} vanished while seated; clearing seat", rider);
            self.mount = MountState::Idle;
        }
        Some(rider)
    }

    /// One fixed physics step.
    pub fn tick<E>(&mut self, dt: f32, env: &mut E, input: &HoverInput) -> HoverTelemetry
    where
        E: HoverEnvironment + ?Sized,
    {
        if !(dt > 0.0) || !dt.is_finite() {
            return HoverTelemetry::default();
        }

        let mounted = self.is_mounted();
        if mounted {
            self.adjust_setpoint(dt, input);
        }

        let mut telemetry = self.hold_height(dt, env);

        if mounted {
            let direction = self.drive(dt, env, input, &mut telemetry);
            self.orient(dt, env, direction, &mut telemetry);
        } else {
            let t = (self.tuning.level_rate * dt).min(1.0);
            let leveled = level_toward_upright(env.orientation(), t);
            self.heading = yaw_of(leveled);
            env.set_orientation(leveled);
        }

        telemetry
    }

    fn adjust_setpoint(&mut self, dt: f32, input: &HoverInput) {
        let step = self.tuning.height_adjust_rate * dt;
        if input.ascend {
            self.target_height = self.tuning.clamp_height(self.target_height + step);
        }
        if input.descend {
            self.target_height = self.tuning.clamp_height(self.target_height - step);
        }
    }

    /// Mean height of the five probes that hit, if any did.
    fn sample_ground<G>(&self, ground: &G, position: Vec3, orientation: Quat) -> Option<f32>
    where
        G: GroundQuery + ?Sized,
    {
        let spread = self.tuning.sample_spread;
        let offsets = [
            Vec3::ZERO,
            Vec3::X * spread,
            Vec3::NEG_X * spread,
            Vec3::Z * spread,
            Vec3::NEG_Z * spread,
        ];
        let reach = self.target_height * self.tuning.probe_depth_factor;

        let (sum, hits) = offsets
            .iter()
            .filter_map(|offset| ground.ground_height(position + orientation * *offset, reach))
            .fold((0.0_f32, 0_u32), |(sum, hits), h| (sum + h, hits + 1));

        (hits > 0).then(|| sum / hits as f32)
    }

    fn hold_height<E>(&mut self, dt: f32, env: &mut E) -> HoverTelemetry
    where
        E: HoverEnvironment + ?Sized,
    {
        let blend = (self.tuning.height_smoothing * dt).min(1.0);
        self.smoothed_height += (self.target_height - self.smoothed_height) * blend;

        let position = env.position();
        let orientation = env.orientation();
        let ground = self.sample_ground(&*env, position, orientation);

        let Some(ground_height) = ground else {
            if self.ground_contact {
                log::debug!("Lost ground below {:?}; descending", position);
            }
            self.ground_contact = false;
            self.integral = 0.0;
            let accel = -self.tuning.fallback_descent.abs();
            env.apply_force(Vec3::Y * accel, ForceMode::Acceleration);
            return HoverTelemetry {
                vertical_accel: accel,
                ..Default::default()
            };
        };

        if !self.ground_contact {
            log::debug!("Ground regained at height {:.2}", ground_height);
        }
        self.ground_contact = true;

        let error = self.smoothed_height - (position.y - ground_height);
        let limit = self.tuning.integral_limit;
        self.integral = (self.integral + error * dt).clamp(-limit, limit);

        let vertical_velocity = env.linear_velocity().y;
        let accel = error * self.tuning.kp + self.integral * self.tuning.ki
            - vertical_velocity * self.tuning.kd;
        env.apply_force(Vec3::Y * accel, ForceMode::Acceleration);

        HoverTelemetry {
            ground_height: Some(ground_height),
            height_error: error,
            vertical_accel: accel,
            ..Default::default()
        }
    }

    /// Track the velocity the axes ask for. Returns the desired world direction.
    ///
    /// The step toward the desired velocity never overshoots it, so the
    /// integrated horizontal speed stays under the cap at any `dt`.
    fn drive<E>(
        &mut self,
        dt: f32,
        env: &mut E,
        input: &HoverInput,
        telemetry: &mut HoverTelemetry,
    ) -> Vec3
    where
        E: HoverEnvironment + ?Sized,
    {
        let (strafe, forward) = input.axes();
        let (basis_forward, basis_right) = input
            .view_forward
            .and_then(view_basis)
            .unwrap_or_else(|| yaw_basis(self.heading));
        let direction = (basis_forward * forward + basis_right * strafe).clamp_length_max(1.0);

        let speed = self.tuning.speed;
        let velocity = env.linear_velocity();
        let horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
        let capped = horizontal.clamp_length_max(speed);
        if capped != horizontal {
            env.set_linear_velocity(Vec3::new(capped.x, velocity.y, capped.z));
        }

        let gain = self.tuning.accel_gain.min(1.0 / dt);
        let accel = (direction * speed - capped) * gain;
        env.apply_force(accel, ForceMode::Acceleration);
        telemetry.horizontal_accel = accel;
        direction
    }

    fn orient<E>(&mut self, dt: f32, env: &mut E, direction: Vec3, telemetry: &mut HoverTelemetry)
    where
        E: HoverEnvironment + ?Sized,
    {
        if let Some(target) = heading_of(direction) {
            let t = (self.tuning.turn_rate * dt).min(1.0);
            self.heading = approach_heading(self.heading, target, t);
        }

        let (pitch, roll) = tilt_for_velocity(
            env.linear_velocity(),
            self.heading,
            self.tuning.speed,
            self.tuning.max_pitch(),
            self.tuning.max_roll(),
        );
        env.set_orientation(compose(self.heading, pitch, roll));
        telemetry.pitch = pitch;
        telemetry.roll = roll;
    }
}
