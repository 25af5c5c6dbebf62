use accutrace_scene::MovementInput;
use std::collections::HashSet;
use winit::keyboard::KeyCode;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
    Quit,
    ToggleCapture,
    Screenshot,
    DumpCamera,
    NextScene,
}

impl Action {
    /// Held every tick, as opposed to firing once per key press.
    pub fn is_continuous(self) -> bool {
        !matches!(
            self,
            Action::Quit
                | Action::ToggleCapture
                | Action::Screenshot
                | Action::DumpCamera
                | Action::NextScene
        )
    }
}

pub const KEY_BINDINGS: [(KeyCode, Action); 15] = [
    (KeyCode::KeyW, Action::Forward),
    (KeyCode::KeyS, Action::Back),
    (KeyCode::KeyA, Action::Left),
    (KeyCode::KeyD, Action::Right),
    (KeyCode::Space, Action::Up),
    (KeyCode::ShiftLeft, Action::Down),
    (KeyCode::ArrowUp, Action::PitchUp),
    (KeyCode::ArrowDown, Action::PitchDown),
    (KeyCode::ArrowLeft, Action::YawLeft),
    (KeyCode::ArrowRight, Action::YawRight),
    (KeyCode::Escape, Action::Quit),
    (KeyCode::KeyF, Action::ToggleCapture),
    (KeyCode::KeyP, Action::Screenshot),
    (KeyCode::KeyC, Action::DumpCamera),
    (KeyCode::Tab, Action::NextScene),
];

pub fn action_for_key(code: KeyCode) -> Option<Action> {
    KEY_BINDINGS
        .iter()
        .find(|(key, _)| *key == code)
        .map(|&(_, action)| action)
}

/// Keys currently held plus one-shot actions pressed since the last drain.
#[derive(Debug, Default)]
pub struct KeyboardState {
    held:    HashSet<Action>,
    pressed: Vec<Action>,
}

impl KeyboardState {
    pub fn handle_key(&mut self, code: KeyCode, pressed: bool, repeat: bool) {
        let Some(action) = action_for_key(code) else {
            return;
        };
        if action.is_continuous() {
            if pressed {
                self.held.insert(action);
            } else {
                self.held.remove(&action);
            }
        } else if pressed && !repeat {
            self.pressed.push(action);
        }
    }

    /// Forgets held keys, e.g. when the window loses focus and releases go unseen.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn movement(&self) -> MovementInput {
        let held = |action| self.held.contains(&action);
        MovementInput {
            forward:    held(Action::Forward),
            back:       held(Action::Back),
            left:       held(Action::Left),
            right:      held(Action::Right),
            up:         held(Action::Up),
            down:       held(Action::Down),
            pitch_up:   held(Action::PitchUp),
            pitch_down: held(Action::PitchDown),
            yaw_left:   held(Action::YawLeft),
            yaw_right:  held(Action::YawRight),
        }
    }

    /// One-shot actions in press order. They stay queued until cleared, so a
    /// frame that could not be presented does not lose them.
    pub fn pressed(&self) -> &[Action] {
        &self.pressed
    }

    pub fn clear_pressed(&mut self) {
        self.pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_documented_key_is_bound() {
        let expected = [
            (KeyCode::KeyW, Action::Forward),
            (KeyCode::KeyA, Action::Left),
            (KeyCode::KeyS, Action::Back),
            (KeyCode::KeyD, Action::Right),
            (KeyCode::Space, Action::Up),
            (KeyCode::ShiftLeft, Action::Down),
            (KeyCode::ArrowUp, Action::PitchUp),
            (KeyCode::ArrowDown, Action::PitchDown),
            (KeyCode::ArrowLeft, Action::YawLeft),
            (KeyCode::ArrowRight, Action::YawRight),
            (KeyCode::Escape, Action::Quit),
            (KeyCode::KeyF, Action::ToggleCapture),
            (KeyCode::KeyP, Action::Screenshot),
            (KeyCode::KeyC, Action::DumpCamera),
            (KeyCode::Tab, Action::NextScene),
        ];
        for (key, action) in expected {
            assert_eq!(action_for_key(key), Some(action), "{:?}", key);
        }
        assert_eq!(action_for_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn held_keys_drive_movement_until_released() {
        let mut keyboard = KeyboardState::default();
        keyboard.handle_key(KeyCode::KeyW, true, false);
        keyboard.handle_key(KeyCode::ArrowLeft, true, false);
        let movement = keyboard.movement();
        assert!(movement.forward && movement.yaw_left);
        assert!(!movement.back);

        keyboard.handle_key(KeyCode::KeyW, false, false);
        assert!(!keyboard.movement().forward);
        keyboard.release_all();
        assert!(!keyboard.movement().any());
    }

    #[test]
    fn one_shot_actions_fire_once_per_press() {
        let mut keyboard = KeyboardState::default();
        keyboard.handle_key(KeyCode::KeyP, true, false);
        keyboard.handle_key(KeyCode::KeyP, true, true);
        keyboard.handle_key(KeyCode::KeyP, false, false);
        keyboard.handle_key(KeyCode::KeyF, true, false);
        assert_eq!(keyboard.pressed(), [Action::Screenshot, Action::ToggleCapture]);
        keyboard.clear_pressed();
        assert!(keyboard.pressed().is_empty());
        assert!(!keyboard.movement().any());
    }

    #[test]
    fn pressed_actions_wait_for_a_presented_frame() {
        let mut keyboard = KeyboardState::default();
        keyboard.handle_key(KeyCode::Tab, true, false);
        keyboard.handle_key(KeyCode::Tab, false, false);

        // frame skipped: nothing is cleared, later presses queue behind
        keyboard.handle_key(KeyCode::KeyC, true, false);
        assert_eq!(keyboard.pressed(), [Action::NextScene, Action::DumpCamera]);

        keyboard.clear_pressed();
        keyboard.handle_key(KeyCode::KeyP, true, false);
        assert_eq!(keyboard.pressed(), [Action::Screenshot]);
    }
}
