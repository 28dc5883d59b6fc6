//! Per-tick control sample.

use glam::Vec3;

/// Latest control input for one vehicle. The host keeps the most recent sample
/// between physics ticks; nothing is queued.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HoverInput {
    /// Left/right axis in [-1, 1].
    pub strafe: f32,
    /// Back/forward axis in [-1, 1].
    pub forward: f32,
    /// Raise the setpoint while held.
    pub ascend: bool,
    /// Lower the setpoint while held.
    pub descend: bool,
    /// Camera look direction. When absent the vehicle's own heading is used.
    pub view_forward: Option<Vec3>,
}

impl HoverInput {
    pub fn new(strafe: f32, forward: f32) -> Self {
        Self {
            strafe,
            forward,
            ..Default::default()
        }
    }

    pub fn with_view(mut self, view_forward: Vec3) -> Self {
        self.view_forward = Some(view_forward);
        self
    }

    /// Axes clamped to their valid range.
    pub fn axes(&self) -> (f32, f32) {
        (
            sanitize_axis(self.strafe),
            sanitize_axis(self.forward),
        )
    }

    pub fn has_movement(&self) -> bool {
        let (x, y) = self.axes();
        x != 0.0 || y != 0.0
    }
}

fn sanitize_axis(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_are_clamped_and_nan_is_zero() {
        let input = HoverInput::new(3.0, f32::NAN);
        assert_eq!(input.axes(), (1.0, 0.0));
        assert!(input.has_movement());
        assert!(!HoverInput::default().has_movement());
    }
}
