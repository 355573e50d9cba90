//! Platform-agnostic input state.
//!
//! Window adapters translate their events into [`Key`], [`MouseButton`] and
//! pointer positions and inject them here. The render context owns one
//! [`Input`] and the FPS camera reads it.

use std::collections::HashSet;

use crate::math::Vec2f;

/// Physical keys the toolkit distinguishes.
#[rustfmt::skip]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    Key0, Key1, Key2, Key3, Key4, Key5, Key6, Key7, Key8, Key9,

    Space,
    Enter,
    Escape,
    Backspace,
    Tab,

    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

/// Mouse button enumeration
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Held keys and buttons plus pointer motion.
///
/// Pointer motion accumulates between reads; [`Input::take_pointer_delta`]
/// returns the accumulated motion and resets it.
#[derive(Debug, Clone, Default)]
pub struct Input {
    pressed_keys: HashSet<Key>,
    pressed_mouse: HashSet<MouseButton>,

    pointer_position: Vec2f,
    pointer_delta: Vec2f,
    has_pointer: bool,

    quit_requested: bool,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Injection (called by window adapters) ==========

    pub fn inject_key(&mut self, key: Key, state: ButtonState) {
        match state {
            ButtonState::Pressed => {
                self.pressed_keys.insert(key);
            }
            ButtonState::Released => {
                self.pressed_keys.remove(&key);
            }
        }
    }

    pub fn inject_mouse_button(&mut self, button: MouseButton, state: ButtonState) {
        match state {
            ButtonState::Pressed => {
                self.pressed_mouse.insert(button);
            }
            ButtonState::Released => {
                self.pressed_mouse.remove(&button);
            }
        }
    }

    /// Absolute pointer position. The first position seen produces no motion.
    pub fn inject_pointer_position(&mut self, x: f32, y: f32) {
        let new_pos = Vec2f::new(x, y);
        if self.has_pointer {
            self.pointer_delta += new_pos - self.pointer_position;
        }
        self.pointer_position = new_pos;
        self.has_pointer = true;
    }

    /// Relative pointer motion, for platforms that report it directly.
    pub fn inject_pointer_motion(&mut self, dx: f32, dy: f32) {
        self.pointer_delta += Vec2f::new(dx, dy);
    }

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    // ========== Queries ==========

    #[must_use]
    pub fn is_key_down(&self, key: Key) -> bool {
        self.pressed_keys.contains(&key)
    }

    #[must_use]
    pub fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.pressed_mouse.contains(&button)
    }

    #[must_use]
    pub fn pointer_position(&self) -> Vec2f {
        self.pointer_position
    }

    /// Accumulated motion without consuming it.
    #[must_use]
    pub fn pointer_delta(&self) -> Vec2f {
        self.pointer_delta
    }

    /// Returns the motion accumulated since the last call and resets it.
    pub fn take_pointer_delta(&mut self) -> Vec2f {
        std::mem::take(&mut self.pointer_delta)
    }

    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_table_tracks_press_and_release() {
        let mut input = Input::new();
        input.inject_key(Key::W, ButtonState::Pressed);
        assert!(input.is_key_down(Key::W));
        input.inject_key(Key::W, ButtonState::Released);
        assert!(!input.is_key_down(Key::W));
    }

    #[test]
    fn pointer_delta_is_taken_once() {
        let mut input = Input::new();
        input.inject_pointer_position(10.0, 10.0);
        input.inject_pointer_position(15.0, 7.0);
        input.inject_pointer_motion(1.0, 1.0);

        assert_eq!(input.take_pointer_delta(), Vec2f::new(6.0, -2.0));
        assert_eq!(input.take_pointer_delta(), Vec2f::ZERO);
        assert_eq!(input.pointer_position(), Vec2f::new(15.0, 7.0));
    }
}
