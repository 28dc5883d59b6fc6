//! Hover tuning: gains, limits and rates for the flight controller.
//!
//! The defaults are starting points for acceleration-mode forces on a body that
//! carries no gravity of its own. A different integrator needs re-tuning.

use serde::{Deserialize, Serialize};

/// Tuning for one [`HoverController`](crate::HoverController).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverTuning {
    /// Hover height a freshly summoned vehicle aims for.
    pub default_hover_height: f32,
    /// Lowest setpoint reachable with the descend input.
    pub min_hover_height: f32,
    /// Highest setpoint reachable with the ascend input.
    pub max_hover_height: f32,
    /// Setpoint change per second while ascend/descend is held.
    pub height_adjust_rate: f32,
    /// Low-pass rate for the setpoint (1 / time constant).
    pub height_smoothing: f32,

    /// Proportional gain on height error.
    pub kp: f32,
    /// Integral gain.
    pub ki: f32,
    /// Damping gain on measured vertical velocity.
    pub kd: f32,
    /// Integral accumulator bound (symmetric).
    pub integral_limit: f32,

    /// Offset of the four outer ground samples from the vehicle center.
    pub sample_spread: f32,
    /// Ground probes reach this many hover heights below the vehicle.
    pub probe_depth_factor: f32,
    /// Downward acceleration applied when no ground is found.
    pub fallback_descent: f32,

    /// Top horizontal speed (units/s).
    pub speed: f32,
    /// Acceleration per unit of velocity deficit. Limited to `1 / dt` so a
    /// single step never overshoots the desired velocity.
    pub accel_gain: f32,
    /// Heading interpolation rate (1/s).
    pub turn_rate: f32,
    /// Maximum cosmetic pitch in degrees. Roll is limited to half of it.
    pub max_tilt_degrees: f32,
    /// Rate at which an idle vehicle levels out (1/s).
    pub level_rate: f32,

    /// Rider seat, in the vehicle's local frame.
    pub seat_offset: [f32; 3],
    /// Lateral distance from the vehicle where a dismounting rider is placed.
    pub dismount_offset: f32,
    /// Distance in front of the player where a recalled vehicle appears.
    pub recall_distance: f32,

    /// Body mass handed to the physics backend.
    pub mass: f32,
    /// Linear drag handed to the physics backend.
    pub drag: f32,
}

impl Default for HoverTuning {
    fn default() -> Self {
        Self {
            default_hover_height: 2.0,
            min_hover_height: 0.5,
            max_hover_height: 12.0,
            height_adjust_rate: 4.0,
            height_smoothing: 3.0,
            kp: 80.0,
            ki: 5.0,
            kd: 25.0,
            integral_limit: 5.0,
            sample_spread: 0.5,
            probe_depth_factor: 4.0,
            fallback_descent: 9.81,
            speed: 15.0,
            accel_gain: 5.0,
            turn_rate: 5.0,
            max_tilt_degrees: 8.0,
            level_rate: 2.0,
            seat_offset: [0.0, 0.6, 0.0],
            dismount_offset: 2.0,
            recall_distance: 3.0,
            mass: 100.0,
            drag: 1.0,
        }
    }
}

impl HoverTuning {
    /// Clamp a setpoint into the adjustable range.
    pub fn clamp_height(&self, height: f32) -> f32 {
        height.clamp(self.min_hover_height, self.max_hover_height)
    }

    /// Maximum pitch in radians.
    pub fn max_pitch(&self) -> f32 {
        self.max_tilt_degrees.to_radians()
    }

    /// Maximum roll in radians.
    pub fn max_roll(&self) -> f32 {
        self.max_pitch() * 0.5
    }

    /// Fix up values a hand-edited config could get wrong.
    pub fn sanitized(mut self) -> Self {
        if self.min_hover_height > self.max_hover_height {
            std::mem::swap(&mut self.min_hover_height, &mut self.max_hover_height);
        }
        self.default_hover_height = self.clamp_height(self.default_hover_height);
        self.integral_limit = self.integral_limit.abs();
        self.speed = self.speed.max(0.0);
        self.probe_depth_factor = self.probe_depth_factor.max(1.0);
        self.mass = self.mass.max(f32::EPSILON);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tuning_matches_reference_gains() {
        let t = HoverTuning::default();
        assert_eq!((t.kp, t.ki, t.kd), (80.0, 5.0, 25.0));
        assert_eq!(t.integral_limit, 5.0);
        assert_eq!(t.speed, 15.0);
        assert!((t.max_roll() - 4.0_f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn sanitized_swaps_inverted_range_and_clamps_default() {
        let t = HoverTuning {
            min_hover_height: 10.0,
            max_hover_height: 1.0,
            default_hover_height: 50.0,
            integral_limit: -3.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(t.min_hover_height, 1.0);
        assert_eq!(t.max_hover_height, 10.0);
        assert_eq!(t.default_hover_height, 10.0);
        assert_eq!(t.integral_limit, 3.0);
    }
}
