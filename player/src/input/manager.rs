//! Input manager handling keyboard and gamepad

use gilrs::{Axis, Button, Gilrs};
use hashbrown::HashMap;
use tracing::{info, warn};
use winit::keyboard::KeyCode;

use nees_core::InputSource;
use nees_shared::{ControllerState, MAX_PLAYERS};

use super::InputConfig;

/// Samples keyboard and gamepads into one [`ControllerState`] per player.
///
/// Keyboard and gamepad input for the same player are combined.
pub struct InputManager {
    /// Gilrs context for gamepad handling (None if initialization failed)
    gilrs: Option<Gilrs>,

    /// Current keyboard state (key -> pressed)
    keyboard_state: HashMap<KeyCode, bool>,

    config: InputConfig,

    /// Gamepad ID to player slot mapping
    gamepad_to_player: HashMap<gilrs::GamepadId, usize>,
}

impl InputManager {
    pub fn new(config: InputConfig) -> Self {
        let gilrs = match Gilrs::new() {
            Ok(g) => Some(g),
            Err(e) => {
                warn!(
                    "Failed to initialize gamepad support: {}. Gamepads will not be available.",
                    e
                );
                None
            }
        };

        Self {
            gilrs,
            keyboard_state: HashMap::new(),
            config,
            gamepad_to_player: HashMap::new(),
        }
    }

    /// Update keyboard state
    pub fn update_keyboard(&mut self, key: KeyCode, pressed: bool) {
        self.keyboard_state.insert(key, pressed);
    }

    /// Release every key, e.g. when the window loses focus
    pub fn clear_keyboard(&mut self) {
        self.keyboard_state.clear();
    }

    /// Handle gamepad connect and disconnect events
    fn poll_gamepad_events(&mut self) {
        let Some(gilrs) = self.gilrs.as_mut() else {
            return;
        };
        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event())
            .map(|e| (e.id, e.event))
            .collect();

        for (id, event) in events {
            match event {
                gilrs::EventType::Connected => {
                    if let Some(slot) = self.find_free_player_slot() {
                        self.gamepad_to_player.insert(id, slot);
                        info!("Gamepad {} connected as player {}", id, slot + 1);
                    } else {
                        warn!("Gamepad {} connected but no free player slots", id);
                    }
                }
                gilrs::EventType::Disconnected => {
                    if let Some(slot) = self.gamepad_to_player.remove(&id) {
                        info!("Gamepad {} (player {}) disconnected", id, slot + 1);
                    }
                }
                _ => {}
            }
        }
    }

    fn find_free_player_slot(&self) -> Option<usize> {
        (0..MAX_PLAYERS).find(|&slot| !self.gamepad_to_player.values().any(|&s| s == slot))
    }

    /// Current state for every player
    pub fn states(&self) -> [ControllerState; MAX_PLAYERS] {
        let mut states = [ControllerState::empty(); MAX_PLAYERS];
        let is_pressed = |key: KeyCode| self.keyboard_state.get(&key).copied().unwrap_or(false);

        for (player, mapping) in self.config.keyboards.iter_enabled() {
            states[player] |= mapping.read(is_pressed);
        }

        if let Some(gilrs) = &self.gilrs {
            for (&id, &player) in &self.gamepad_to_player {
                let gamepad = gilrs.gamepad(id);
                let stick = (gamepad.value(Axis::LeftStickX), gamepad.value(Axis::LeftStickY));
                states[player] |= gamepad_state(
                    |button| gamepad.is_pressed(button),
                    stick,
                    self.config.stick_deadzone,
                );
            }
        }

        states
    }
}

impl InputSource for InputManager {
    fn poll(&mut self) -> [ControllerState; MAX_PLAYERS] {
        self.poll_gamepad_events();
        self.states()
    }
}

/// Map a gamepad to controller buttons.
///
/// South is A and West is B. The left stick acts as a D-pad once it moves
/// past `threshold` (stick Y is positive up).
pub fn gamepad_state(
    is_pressed: impl Fn(Button) -> bool,
    stick: (f32, f32),
    threshold: f32,
) -> ControllerState {
    let (x, y) = stick;
    ControllerState::empty()
        .with(ControllerState::A, is_pressed(Button::South))
        .with(ControllerState::B, is_pressed(Button::West))
        .with(ControllerState::SELECT, is_pressed(Button::Select))
        .with(ControllerState::START, is_pressed(Button::Start))
        .with(
            ControllerState::UP,
            is_pressed(Button::DPadUp) || y > threshold,
        )
        .with(
            ControllerState::DOWN,
            is_pressed(Button::DPadDown) || y < -threshold,
        )
        .with(
            ControllerState::LEFT,
            is_pressed(Button::DPadLeft) || x < -threshold,
        )
        .with(
            ControllerState::RIGHT,
            is_pressed(Button::DPadRight) || x > threshold,
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_buttons() {
        let state = gamepad_state(|b| matches!(b, Button::South | Button::Start), (0.0, 0.0), 0.5);
        assert_eq!(state, ControllerState::A | ControllerState::START);

        let state = gamepad_state(|b| b == Button::West, (0.0, 0.0), 0.5);
        assert_eq!(state, ControllerState::B);
    }

    #[test]
    fn test_stick_past_threshold_is_dpad() {
        let none = |_: Button| false;
        assert_eq!(gamepad_state(none, (0.4, -0.4), 0.5), ControllerState::empty());
        assert_eq!(
            gamepad_state(none, (0.6, 0.9), 0.5),
            ControllerState::RIGHT | ControllerState::UP
        );
        assert_eq!(
            gamepad_state(none, (-0.6, -0.6), 0.5),
            ControllerState::LEFT | ControllerState::DOWN
        );
    }

    #[test]
    fn test_dpad_buttons() {
        let state = gamepad_state(|b| b == Button::DPadLeft, (0.0, 0.0), 0.5);
        assert_eq!(state, ControllerState::LEFT);
    }

    #[test]
    fn test_keyboard_players_are_separate() {
        let mut manager = InputManager {
            gilrs: None,
            keyboard_state: HashMap::new(),
            config: InputConfig::default(),
            gamepad_to_player: HashMap::new(),
        };
        manager.update_keyboard(KeyCode::KeyL, true);
        manager.update_keyboard(KeyCode::KeyW, true);
        manager.update_keyboard(KeyCode::KeyK, true);
        manager.update_keyboard(KeyCode::KeyK, false);

        let [p1, p2] = manager.poll();
        assert_eq!(p1, ControllerState::A);
        assert_eq!(p2, ControllerState::START);

        manager.clear_keyboard();
        assert_eq!(manager.poll(), [ControllerState::empty(); MAX_PLAYERS]);
    }
}
