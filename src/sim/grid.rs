//! Grid coordinates and cardinal directions

use super::controls::Key;
use std::cmp::Ordering;

/// A cell on the level grid
///
/// Columns grow to the east, rows grow to the south. Ordering is row-major
/// so sorted collections read like the level text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPosition {
    pub col: i32,
    pub row: i32,
}

impl GridPosition {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Returns the neighbouring cell in the given direction
    pub fn step(self, direction: Direction) -> Self {
        Self::new(self.col + direction.dx(), self.row + direction.dy())
    }

    /// Returns the four orthogonal neighbours
    pub fn neighbors(self) -> impl Iterator<Item = GridPosition> {
        Direction::ALL.into_iter().map(move |d| self.step(d))
    }

    /// Manhattan distance to another cell
    pub fn manhattan(self, other: GridPosition) -> u32 {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }
}

impl Ord for GridPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| self.col.cmp(&other.col))
    }
}

impl PartialOrd for GridPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for GridPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Cardinal direction on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn dx(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Up | Direction::Down => 0,
        }
    }

    pub fn dy(self) -> i32 {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
            Direction::Left | Direction::Right => 0,
        }
    }

    /// Maps WASD and arrow keys to a direction
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Up | Key::Letter('w') => Some(Direction::Up),
            Key::Down | Key::Letter('s') => Some(Direction::Down),
            Key::Left | Key::Letter('a') => Some(Direction::Left),
            Key::Right | Key::Letter('d') => Some(Direction::Right),
            _ => None,
        }
    }
}
