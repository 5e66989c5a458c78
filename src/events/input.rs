//! Platform input events.
//!
//! The platform translates raw window input into [`InputEvent`] values that
//! are pushed through the layer responder chain. Key and button codes reuse
//! raylib's enums.

use raylib::prelude::{KeyboardKey, MouseButton};

/// Press or release edge of a key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Press,
    Release,
}

/// Input delivered to [`Layer::handle_event`](crate::layers::Layer::handle_event).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to screen coordinates `(x, y)`.
    MouseMove { x: f32, y: f32 },
    /// Mouse button edge.
    MouseButton {
        state: ButtonState,
        button: MouseButton,
    },
    /// Keyboard edge.
    Key {
        state: ButtonState,
        code: KeyboardKey,
    },
}

impl InputEvent {
    pub fn key_press(code: KeyboardKey) -> Self {
        InputEvent::Key {
            state: ButtonState::Press,
            code,
        }
    }

    pub fn key_release(code: KeyboardKey) -> Self {
        InputEvent::Key {
            state: ButtonState::Release,
            code,
        }
    }

    pub fn mouse_press(button: MouseButton) -> Self {
        InputEvent::MouseButton {
            state: ButtonState::Press,
            button,
        }
    }

    pub fn mouse_move(x: f32, y: f32) -> Self {
        InputEvent::MouseMove { x, y }
    }

    /// Key code if this is a key press.
    pub fn pressed_key(&self) -> Option<KeyboardKey> {
        match self {
            InputEvent::Key {
                state: ButtonState::Press,
                code,
            } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressed_key_only_for_presses() {
        assert_eq!(
            InputEvent::key_press(KeyboardKey::KEY_ESCAPE).pressed_key(),
            Some(KeyboardKey::KEY_ESCAPE)
        );
        assert_eq!(
            InputEvent::key_release(KeyboardKey::KEY_ESCAPE).pressed_key(),
            None
        );
        assert_eq!(InputEvent::mouse_move(1.0, 2.0).pressed_key(), None);
    }
}
