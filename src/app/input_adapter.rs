//! Winit input adapter.
//!
//! Translates winit window events into the platform-agnostic [`Input`] state.

use winit::event::{DeviceEvent, ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::app::input::{ButtonState, Input, Key, MouseButton};

/// Expands `Code => Key` pairs into a `KeyCode` match that yields `None`
/// for every code the toolkit does not track.
macro_rules! key_codes {
    ($code:expr; $($winit:ident => $key:ident),* $(,)?) => {
        match $code {
            $(KeyCode::$winit => Some(Key::$key),)*
            _ => None,
        }
    };
}

/// Maps a physical key to the toolkit's key set. Unidentified keys and keys
/// outside that set map to `None`.
#[rustfmt::skip]
#[must_use]
pub fn translate_key(physical_key: PhysicalKey) -> Option<Key> {
    let PhysicalKey::Code(code) = physical_key else {
        return None;
    };

    key_codes!(code;
        KeyA => A, KeyB => B, KeyC => C, KeyD => D, KeyE => E, KeyF => F, KeyG => G,
        KeyH => H, KeyI => I, KeyJ => J, KeyK => K, KeyL => L, KeyM => M, KeyN => N,
        KeyO => O, KeyP => P, KeyQ => Q, KeyR => R, KeyS => S, KeyT => T, KeyU => U,
        KeyV => V, KeyW => W, KeyX => X, KeyY => Y, KeyZ => Z,

        Digit0 => Key0, Digit1 => Key1, Digit2 => Key2, Digit3 => Key3, Digit4 => Key4,
        Digit5 => Key5, Digit6 => Key6, Digit7 => Key7, Digit8 => Key8, Digit9 => Key9,

        Space => Space, Enter => Enter, Escape => Escape, Backspace => Backspace, Tab => Tab,

        ShiftLeft => ShiftLeft, ShiftRight => ShiftRight,
        ControlLeft => ControlLeft, ControlRight => ControlRight,
        AltLeft => AltLeft, AltRight => AltRight,

        ArrowUp => ArrowUp, ArrowDown => ArrowDown, ArrowLeft => ArrowLeft, ArrowRight => ArrowRight,
    )
}

#[must_use]
pub fn translate_mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(id) => MouseButton::Other(id),
    }
}

#[must_use]
pub fn translate_element_state(state: ElementState) -> ButtonState {
    match state {
        ElementState::Pressed => ButtonState::Pressed,
        ElementState::Released => ButtonState::Released,
    }
}

/// Feeds one window event into `input`. Resizes are not handled here; the
/// render context picks the size up from its surface on every present.
pub fn process_window_event(input: &mut Input, event: &WindowEvent) {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            if let Some(key) = translate_key(event.physical_key) {
                input.inject_key(key, translate_element_state(event.state));
            }
        }

        WindowEvent::CursorMoved { position, .. } => {
            input.inject_pointer_position(position.x as f32, position.y as f32);
        }

        WindowEvent::MouseInput { state, button, .. } => {
            input.inject_mouse_button(
                translate_mouse_button(*button),
                translate_element_state(*state),
            );
        }

        WindowEvent::CloseRequested => input.request_quit(),

        _ => {}
    }
}

/// Feeds raw device motion (relative, unaccelerated) into `input`.
///
/// Cursor positions from [`process_window_event`] already accumulate motion;
/// feed one source or the other, not both.
pub fn process_device_event(input: &mut Input, event: &DeviceEvent) {
    if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
        input.inject_pointer_motion(*dx as f32, *dy as f32);
    }
}
