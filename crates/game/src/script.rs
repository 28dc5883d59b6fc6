//! Scripted input for headless sessions.
//!
//! A timeline of key events replaces a human at the keyboard: summon, mount,
//! fly a leg with some random steering, climb, dismount, walk off, recall and
//! dismiss. Everything is seeded so the same seed replays the same flight.

use input::{ElementState, InputState, KeyCode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptAction {
    Press(KeyCode),
    Release(KeyCode),
    /// Press for a single frame.
    Tap(KeyCode),
    /// Toggle random mouse steering.
    Wander(bool),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptStep {
    /// Session time in seconds.
    pub at: f32,
    pub action: ScriptAction,
}

impl ScriptStep {
    const fn new(at: f32, action: ScriptAction) -> Self {
        Self { at, action }
    }
}

pub struct Script {
    steps: Vec<ScriptStep>,
    cursor: usize,
    pending_release: Vec<KeyCode>,
    wander: bool,
    rng: StdRng,
}

impl Script {
    pub fn new(mut steps: Vec<ScriptStep>, seed: u64) -> Self {
        steps.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self {
            steps,
            cursor: 0,
            pending_release: Vec::new(),
            wander: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The demo flight.
    pub fn demo(seed: u64) -> Self {
        use ScriptAction::*;
        let steps = vec![
            ScriptStep::new(0.5, Tap(KeyCode::KeyV)),
            ScriptStep::new(1.5, Tap(KeyCode::KeyF)),
            ScriptStep::new(2.0, Press(KeyCode::KeyW)),
            ScriptStep::new(2.5, Wander(true)),
            ScriptStep::new(3.0, Press(KeyCode::Space)),
            ScriptStep::new(4.0, Release(KeyCode::Space)),
            ScriptStep::new(4.5, Press(KeyCode::KeyD)),
            ScriptStep::new(5.0, Release(KeyCode::KeyD)),
            ScriptStep::new(5.5, Wander(false)),
            ScriptStep::new(5.5, Press(KeyCode::ControlLeft)),
            ScriptStep::new(6.5, Release(KeyCode::ControlLeft)),
            ScriptStep::new(7.0, Release(KeyCode::KeyW)),
            ScriptStep::new(9.0, Tap(KeyCode::KeyF)),
            ScriptStep::new(10.0, Press(KeyCode::KeyS)),
            ScriptStep::new(13.0, Release(KeyCode::KeyS)),
            ScriptStep::new(13.5, Tap(KeyCode::Space)),
            ScriptStep::new(15.0, Tap(KeyCode::KeyR)),
            ScriptStep::new(16.0, Tap(KeyCode::KeyF)),
            ScriptStep::new(17.0, Press(KeyCode::KeyW)),
            ScriptStep::new(19.0, Release(KeyCode::KeyW)),
            ScriptStep::new(22.0, Tap(KeyCode::KeyV)),
        ];
        Self::new(steps, seed)
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.steps.len() && self.pending_release.is_empty()
    }

    /// Feed every event due by `elapsed` into `input`.
    pub fn apply(&mut self, elapsed: f32, input: &mut InputState) {
        for key in self.pending_release.drain(..) {
            input.process_keyboard(key, ElementState::Released);
        }

        while let Some(step) = self.steps.get(self.cursor) {
            if step.at > elapsed {
                break;
            }
            log::debug!("t={:.2}s {:?}", elapsed, step.action);
            match step.action {
                ScriptAction::Press(key) => input.process_keyboard(key, ElementState::Pressed),
                ScriptAction::Release(key) => input.process_keyboard(key, ElementState::Released),
                ScriptAction::Tap(key) => {
                    input.process_keyboard(key, ElementState::Pressed);
                    self.pending_release.push(key);
                }
                ScriptAction::Wander(on) => self.wander = on,
            }
            self.cursor += 1;
        }

        if self.wander {
            let dx = self.rng.gen_range(-40.0..40.0);
            input.process_mouse_motion((dx, 0.0));
        }
    }
}
