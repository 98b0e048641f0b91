//! Keyboard to controller mapping

use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use nees_shared::ControllerState;

use super::keycode_serde::{deserialize_keycode, serialize_keycode};

/// One key per controller button, stored by key name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardMapping {
    #[serde(
        serialize_with = "serialize_keycode",
        deserialize_with = "deserialize_keycode"
    )]
    pub a: KeyCode,
    #[serde(
        serialize_with = "serialize_keycode",
        deserialize_with = "deserialize_keycode"
    )]
    pub b: KeyCode,
    #[serde(
        serialize_with = "serialize_keycode",
        deserialize_with = "deserialize_keycode"
    )]
    pub select: KeyCode,
    #[serde(
        serialize_with = "serialize_keycode",
        deserialize_with = "deserialize_keycode"
    )]
    pub start: KeyCode,
    #[serde(
        serialize_with = "serialize_keycode",
        deserialize_with = "deserialize_keycode"
    )]
    pub up: KeyCode,
    #[serde(
        serialize_with = "serialize_keycode",
        deserialize_with = "deserialize_keycode"
    )]
    pub down: KeyCode,
    #[serde(
        serialize_with = "serialize_keycode",
        deserialize_with = "deserialize_keycode"
    )]
    pub left: KeyCode,
    #[serde(
        serialize_with = "serialize_keycode",
        deserialize_with = "deserialize_keycode"
    )]
    pub right: KeyCode,
}

impl KeyboardMapping {
    /// L/K for A/B, I/O for Select/Start, arrow keys for the D-pad
    pub fn player_one() -> Self {
        Self {
            a: KeyCode::KeyL,
            b: KeyCode::KeyK,
            select: KeyCode::KeyI,
            start: KeyCode::KeyO,
            up: KeyCode::ArrowUp,
            down: KeyCode::ArrowDown,
            left: KeyCode::ArrowLeft,
            right: KeyCode::ArrowRight,
        }
    }

    /// S/A for A/B, Q/W for Select/Start, TFGH for the D-pad
    pub fn player_two() -> Self {
        Self {
            a: KeyCode::KeyS,
            b: KeyCode::KeyA,
            select: KeyCode::KeyQ,
            start: KeyCode::KeyW,
            up: KeyCode::KeyT,
            down: KeyCode::KeyG,
            left: KeyCode::KeyF,
            right: KeyCode::KeyH,
        }
    }

    /// Key bound to each button, in bit order
    pub fn bindings(&self) -> [(ControllerState, KeyCode); 8] {
        [
            (ControllerState::A, self.a),
            (ControllerState::B, self.b),
            (ControllerState::SELECT, self.select),
            (ControllerState::START, self.start),
            (ControllerState::UP, self.up),
            (ControllerState::DOWN, self.down),
            (ControllerState::LEFT, self.left),
            (ControllerState::RIGHT, self.right),
        ]
    }

    /// Buttons held according to `is_pressed`
    pub fn read(&self, is_pressed: impl Fn(KeyCode) -> bool) -> ControllerState {
        self.bindings()
            .into_iter()
            .filter(|&(_, key)| is_pressed(key))
            .fold(ControllerState::empty(), |state, (button, _)| state | button)
    }
}

impl Default for KeyboardMapping {
    fn default() -> Self {
        Self::player_one()
    }
}
