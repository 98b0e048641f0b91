//! Input handling for keyboard and gamepad

mod keyboard_mapping;
pub(crate) mod keycode_serde;
mod manager;

pub use keyboard_mapping::KeyboardMapping;
pub use manager::{InputManager, gamepad_state};

use serde::{Deserialize, Serialize};

use nees_shared::MAX_PLAYERS;

/// Keyboard mappings for both player slots; `None` disables the keyboard
/// for that player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardsConfig {
    #[serde(
        default = "default_keyboard_p1",
        skip_serializing_if = "Option::is_none"
    )]
    pub p1: Option<KeyboardMapping>,
    #[serde(
        default = "default_keyboard_p2",
        skip_serializing_if = "Option::is_none"
    )]
    pub p2: Option<KeyboardMapping>,
}

fn default_keyboard_p1() -> Option<KeyboardMapping> {
    Some(KeyboardMapping::player_one())
}
fn default_keyboard_p2() -> Option<KeyboardMapping> {
    Some(KeyboardMapping::player_two())
}

impl Default for KeyboardsConfig {
    fn default() -> Self {
        Self {
            p1: default_keyboard_p1(),
            p2: default_keyboard_p2(),
        }
    }
}

impl KeyboardsConfig {
    /// Mapping for a player (0-1)
    pub fn get(&self, player: usize) -> Option<&KeyboardMapping> {
        match player {
            0 => self.p1.as_ref(),
            1 => self.p2.as_ref(),
            _ => None,
        }
    }

    /// Iterate over all (player_index, mapping) pairs for enabled players
    pub fn iter_enabled(&self) -> impl Iterator<Item = (usize, &KeyboardMapping)> {
        (0..MAX_PLAYERS).filter_map(|player| self.get(player).map(|m| (player, m)))
    }
}

/// Input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Keyboard mappings per player slot
    #[serde(default)]
    pub keyboards: KeyboardsConfig,

    /// Stick deflection that counts as a D-pad press (0.0-1.0)
    #[serde(default = "default_deadzone")]
    pub stick_deadzone: f32,
}

fn default_deadzone() -> f32 {
    0.5
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            keyboards: KeyboardsConfig::default(),
            stick_deadzone: default_deadzone(),
        }
    }
}
