//! Tactical cursor

use super::grid::{Direction, GridPosition};
use super::level::Level;

/// Grid cursor bounded by the level it is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    columns: i32,
    rows: i32,
    position: GridPosition,
}

impl Cursor {
    pub fn new(level: &Level) -> Self {
        let mut cursor = Self {
            columns: 0,
            rows: 0,
            position: GridPosition::new(0, 0),
        };
        cursor.attach(level);
        cursor
    }

    /// Adopts the bounds of `level` and jumps to its start tile
    pub fn attach(&mut self, level: &Level) {
        self.columns = level.columns();
        self.rows = level.rows();
        self.position = level.start();
    }

    pub fn position(&self) -> GridPosition {
        self.position
    }

    fn contains(&self, pos: GridPosition) -> bool {
        pos.col >= 0 && pos.col < self.columns && pos.row >= 0 && pos.row < self.rows
    }

    /// Jumps to `pos`. Positions outside the grid are ignored.
    pub fn move_to(&mut self, pos: GridPosition) {
        if self.contains(pos) {
            self.position = pos;
        }
    }

    /// Moves one cell; returns false without moving at the grid edge
    pub fn step(&mut self, direction: Direction) -> bool {
        let next = self.position.step(direction);
        if !self.contains(next) {
            return false;
        }
        self.position = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> Level {
        Level::parse(&["#####", "#S.G#", "#####"], 32).unwrap()
    }

    #[test]
    fn test_attach_starts_on_start_tile() {
        let cursor = Cursor::new(&level());
        assert_eq!(cursor.position(), GridPosition::new(1, 1));
    }

    #[test]
    fn test_step_is_bounded() {
        let mut cursor = Cursor::new(&level());
        assert!(cursor.step(Direction::Up));
        assert!(!cursor.step(Direction::Up));
        assert_eq!(cursor.position(), GridPosition::new(1, 0));

        assert!(cursor.step(Direction::Left));
        assert!(!cursor.step(Direction::Left));
        assert_eq!(cursor.position(), GridPosition::new(0, 0));
    }

    #[test]
    fn test_move_to_ignores_outside() {
        let mut cursor = Cursor::new(&level());
        cursor.move_to(GridPosition::new(4, 2));
        assert_eq!(cursor.position(), GridPosition::new(4, 2));
        cursor.move_to(GridPosition::new(5, 2));
        assert_eq!(cursor.position(), GridPosition::new(4, 2));
    }
}
