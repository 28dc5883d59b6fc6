//! Key bindings for flying a hover vehicle.

use glam::Vec3;
use hover::HoverInput;

use crate::{InputState, KeyCode};

/// One-shot vehicle requests read from key edges. The game handles these;
/// the controller only ever sees [`HoverInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleCommand {
    /// Summon a vehicle, or dismiss the active one.
    ToggleSummon,
    /// Mount the active vehicle, or dismount it.
    ToggleMount,
    /// Bring the idle vehicle to the player.
    Recall,
}

/// Keys used while flying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverBindings {
    pub forward: KeyCode,
    pub back: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub ascend: KeyCode,
    pub descend: KeyCode,
    pub mount: KeyCode,
    pub recall: KeyCode,
    pub summon: KeyCode,
}

impl Default for HoverBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            back: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            ascend: KeyCode::Space,
            descend: KeyCode::ControlLeft,
            mount: KeyCode::KeyF,
            recall: KeyCode::KeyR,
            summon: KeyCode::KeyV,
        }
    }
}

impl HoverBindings {
    /// Continuous control sample for this frame.
    pub fn sample(&self, input: &InputState, view_forward: Option<Vec3>) -> HoverInput {
        HoverInput {
            strafe: input.axis(self.left, self.right),
            forward: input.axis(self.back, self.forward),
            ascend: input.is_key_held(self.ascend),
            descend: input.is_key_held(self.descend),
            view_forward,
        }
    }

    /// Vehicle requests pressed this frame, in a fixed order.
    pub fn commands(&self, input: &InputState) -> Vec<VehicleCommand> {
        [
            (self.summon, VehicleCommand::ToggleSummon),
            (self.mount, VehicleCommand::ToggleMount),
            (self.recall, VehicleCommand::Recall),
        ]
        .into_iter()
        .filter(|(key, _)| input.is_key_pressed(*key))
        .map(|(_, command)| command)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementState;

    #[test]
    fn sample_maps_keys_to_axes_and_flags() {
        let bindings = HoverBindings::default();
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyA, ElementState::Pressed);
        input.process_keyboard(KeyCode::Space, ElementState::Pressed);

        let sample = bindings.sample(&input, Some(Vec3::X));
        assert_eq!(sample.forward, 1.0);
        assert_eq!(sample.strafe, -1.0);
        assert!(sample.ascend);
        assert!(!sample.descend);
        assert_eq!(sample.view_forward, Some(Vec3::X));
    }

    #[test]
    fn commands_fire_once_per_press() {
        let bindings = HoverBindings::default();
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyF, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyV, ElementState::Pressed);
        assert_eq!(
            bindings.commands(&input),
            vec![VehicleCommand::ToggleSummon, VehicleCommand::ToggleMount]
        );

        input.begin_frame();
        assert!(bindings.commands(&input).is_empty());
    }
}
