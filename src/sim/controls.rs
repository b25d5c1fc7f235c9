//! Logical keys understood by the tactics simulation
//!
//! The simulation never sees platform key codes. The app layer translates
//! winit keys into this small vocabulary so the battle logic stays testable
//! without a window.

/// A key press the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Comma,
    Period,
    BracketLeft,
    BracketRight,
    Minus,
    /// Top-row or keypad digit, 0-9
    Digit(u8),
    /// Lower-case ASCII letter
    Letter(char),
}

impl Key {
    /// Builds a letter key, normalising to lower case
    pub fn letter(c: char) -> Self {
        Key::Letter(c.to_ascii_lowercase())
    }

    /// Returns true if this is the given letter (case-insensitive)
    pub fn is_letter(self, c: char) -> bool {
        matches!(self, Key::Letter(l) if l == c.to_ascii_lowercase())
    }

    /// Returns true for Enter or Space, the two "confirm" keys
    pub fn is_confirm(self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }

    /// Returns the digit character for digit keys
    pub fn digit_char(self) -> Option<char> {
        match self {
            Key::Digit(d) if d <= 9 => char::from_digit(d as u32, 10),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_is_case_insensitive() {
        assert_eq!(Key::letter('Q'), Key::Letter('q'));
        assert!(Key::letter('e').is_letter('E'));
        assert!(!Key::letter('e').is_letter('q'));
    }

    #[test]
    fn test_digit_char() {
        assert_eq!(Key::Digit(7).digit_char(), Some('7'));
        assert_eq!(Key::Digit(12).digit_char(), None);
        assert_eq!(Key::Minus.digit_char(), None);
    }
}
