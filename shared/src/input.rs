//! Controller button state shared between input sampling and engines.

use bitflags::bitflags;

/// Number of controller ports the pipeline feeds.
pub const MAX_PLAYERS: usize = 2;

bitflags! {
    /// Buttons held on one standard controller.
    ///
    /// One bit per button, in the order the engine latches them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControllerState: u8 {
        const A = 1 << 0;
        const B = 1 << 1;
        const SELECT = 1 << 2;
        const START = 1 << 3;
        const UP = 1 << 4;
        const DOWN = 1 << 5;
        const LEFT = 1 << 6;
        const RIGHT = 1 << 7;
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::empty()
    }
}

impl ControllerState {
    /// Set or clear `button` depending on `pressed`.
    pub fn with(mut self, button: ControllerState, pressed: bool) -> Self {
        self.set(button, pressed);
        self
    }

    /// Raw mask as handed to the engine.
    pub fn mask(self) -> u8 {
        self.bits()
    }
}
