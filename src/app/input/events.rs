//! Semantic input events

use crate::sim::Key;
use winit::keyboard::KeyCode as WK;

/// Semantic input events generated from raw state changes
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Mouse click at screen position
    Click {
        button: MouseButton,
        /// Screen position in logical pixels
        pos: [f32; 2],
        /// Which viewport was clicked (if any)
        viewport: Option<ViewportId>,
    },

    /// Mouse hover over position
    Hover {
        /// Current hover position
        pos: [f32; 2],
        /// Viewport being hovered (if any)
        viewport: Option<ViewportId>,
    },

    /// Key press event (auto-repeat is filtered out by the collector)
    KeyPress {
        key: Key,
        modifiers: super::state::Modifiers,
    },
}

/// Mouse button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Viewport identifier for hit testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewportId(pub u32);

/// Translates a physical winit key into a game key
///
/// Keys the game never reacts to map to `None`.
pub fn game_key(code: WK) -> Option<Key> {
    let key = match code {
        WK::Escape => Key::Escape,
        WK::Enter | WK::NumpadEnter => Key::Enter,
        WK::Space => Key::Space,
        WK::Tab => Key::Tab,
        WK::Backspace => Key::Backspace,
        WK::Delete => Key::Delete,

        WK::ArrowUp => Key::Up,
        WK::ArrowDown => Key::Down,
        WK::ArrowLeft => Key::Left,
        WK::ArrowRight => Key::Right,

        WK::Comma => Key::Comma,
        WK::Period => Key::Period,
        WK::BracketLeft => Key::BracketLeft,
        WK::BracketRight => Key::BracketRight,
        WK::Minus | WK::NumpadSubtract => Key::Minus,

        WK::Digit0 | WK::Numpad0 => Key::Digit(0),
        WK::Digit1 | WK::Numpad1 => Key::Digit(1),
        WK::Digit2 | WK::Numpad2 => Key::Digit(2),
        WK::Digit3 | WK::Numpad3 => Key::Digit(3),
        WK::Digit4 | WK::Numpad4 => Key::Digit(4),
        WK::Digit5 | WK::Numpad5 => Key::Digit(5),
        WK::Digit6 | WK::Numpad6 => Key::Digit(6),
        WK::Digit7 | WK::Numpad7 => Key::Digit(7),
        WK::Digit8 | WK::Numpad8 => Key::Digit(8),
        WK::Digit9 | WK::Numpad9 => Key::Digit(9),

        WK::KeyA => Key::letter('a'),
        WK::KeyB => Key::letter('b'),
        WK::KeyC => Key::letter('c'),
        WK::KeyD => Key::letter('d'),
        WK::KeyE => Key::letter('e'),
        WK::KeyF => Key::letter('f'),
        WK::KeyG => Key::letter('g'),
        WK::KeyH => Key::letter('h'),
        WK::KeyI => Key::letter('i'),
        WK::KeyJ => Key::letter('j'),
        WK::KeyK => Key::letter('k'),
        WK::KeyL => Key::letter('l'),
        WK::KeyM => Key::letter('m'),
        WK::KeyN => Key::letter('n'),
        WK::KeyO => Key::letter('o'),
        WK::KeyP => Key::letter('p'),
        WK::KeyQ => Key::letter('q'),
        WK::KeyR => Key::letter('r'),
        WK::KeyS => Key::letter('s'),
        WK::KeyT => Key::letter('t'),
        WK::KeyU => Key::letter('u'),
        WK::KeyV => Key::letter('v'),
        WK::KeyW => Key::letter('w'),
        WK::KeyX => Key::letter('x'),
        WK::KeyY => Key::letter('y'),
        WK::KeyZ => Key::letter('z'),

        _ => return None,
    };
    Some(key)
}
