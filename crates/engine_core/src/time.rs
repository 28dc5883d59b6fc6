//! Time management for the simulation loop.

use std::time::Duration;

/// Frame timing plus a fixed-step accumulator for physics.
///
/// The loop feeds it frame durations through [`Time::advance`]; the headless
/// runner uses synthetic durations so runs are reproducible.
#[derive(Debug)]
pub struct Time {
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Fixed timestep for physics (default 50 Hz).
    fixed_timestep: Duration,
    /// Accumulated time for fixed updates.
    accumulator: Duration,
    /// Fixed steps consumed so far.
    fixed_steps: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        Self {
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            fixed_timestep: Duration::from_secs_f64(1.0 / 50.0),
            accumulator: Duration::ZERO,
            fixed_steps: 0,
        }
    }

    /// Start a new frame that lasted `delta`.
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
        self.accumulator += delta;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Fixed steps run since start.
    pub fn fixed_steps(&self) -> u64 {
        self.fixed_steps
    }

    /// Get the fixed timestep in seconds.
    pub fn fixed_timestep_seconds(&self) -> f32 {
        self.fixed_timestep.as_secs_f32()
    }

    /// Check if a fixed update should run and consume the time.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            self.fixed_steps += 1;
            true
        } else {
            false
        }
    }

    /// Set the fixed timestep rate in Hz. Rates that are not positive, or so
    /// high the step rounds to zero, are ignored.
    pub fn set_fixed_rate(&mut self, hz: f64) {
        let step = (hz > 0.0)
            .then(|| Duration::try_from_secs_f64(1.0 / hz).ok())
            .flatten()
            .filter(|step| !step.is_zero());
        match step {
            Some(step) => self.fixed_timestep = step,
            None => log::warn!("Ignoring fixed rate {} Hz", hz),
        }
    }
}
