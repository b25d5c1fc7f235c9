//! Parsed arena layout

use std::collections::HashSet;

use pathfinding::prelude::bfs_reach;

use super::grid::GridPosition;
use super::tile::TileType;

/// Errors raised while building a level
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    #[error("level layout requires at least one row")]
    EmptyLayout,

    #[error("inconsistent level width at row {row}")]
    RaggedRow { row: usize },

    #[error("level must define both a start (S) and an exit (G)")]
    MissingStartOrExit,

    #[error("arena dimensions must be odd, got {width}x{height}")]
    EvenDimensions { width: i32, height: i32 },

    #[error("arena {width}x{height} exceeds the {max} tile limit per side")]
    TooLarge { width: i32, height: i32, max: i32 },
}

/// An immutable grid of tiles with its start, exit and spawn zones
#[derive(Debug, Clone)]
pub struct Level {
    tiles: Vec<TileType>,
    columns: i32,
    rows: i32,
    tile_size: u32,
    start: GridPosition,
    exit: GridPosition,
    player_spawn_tiles: Vec<GridPosition>,
    enemy_spawn_tiles: Vec<GridPosition>,
}

impl Level {
    /// Parses a layout of symbol rows
    ///
    /// Every row must have the same length as the first one. When a layout
    /// contains several `S` or `G` tiles, the last one in row-major order
    /// wins.
    pub fn parse<S: AsRef<str>>(layout: &[S], tile_size: u32) -> Result<Self, LevelError> {
        let first = layout.first().ok_or(LevelError::EmptyLayout)?;
        let columns = first.as_ref().chars().count();

        let mut tiles = Vec::with_capacity(columns * layout.len());
        let mut start = None;
        let mut exit = None;
        let mut player_spawn_tiles = Vec::new();
        let mut enemy_spawn_tiles = Vec::new();

        for (row, line) in layout.iter().enumerate() {
            let line = line.as_ref();
            if line.chars().count() != columns {
                return Err(LevelError::RaggedRow { row });
            }
            for (col, symbol) in line.chars().enumerate() {
                let tile = TileType::from_symbol(symbol);
                let pos = GridPosition::new(col as i32, row as i32);
                match tile {
                    TileType::Start => start = Some(pos),
                    TileType::Exit => exit = Some(pos),
                    TileType::PlayerSpawn => player_spawn_tiles.push(pos),
                    TileType::EnemySpawn => enemy_spawn_tiles.push(pos),
                    _ => {}
                }
                tiles.push(tile);
            }
        }

        let (Some(start), Some(exit)) = (start, exit) else {
            return Err(LevelError::MissingStartOrExit);
        };

        Ok(Self {
            tiles,
            columns: columns as i32,
            rows: layout.len() as i32,
            tile_size,
            start,
            exit,
            player_spawn_tiles,
            enemy_spawn_tiles,
        })
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Tile edge length in pixels, used by the view layer
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn start(&self) -> GridPosition {
        self.start
    }

    pub fn exit(&self) -> GridPosition {
        self.exit
    }

    pub fn player_spawn_tiles(&self) -> &[GridPosition] {
        &self.player_spawn_tiles
    }

    pub fn enemy_spawn_tiles(&self) -> &[GridPosition] {
        &self.enemy_spawn_tiles
    }

    pub fn is_inside(&self, pos: GridPosition) -> bool {
        pos.col >= 0 && pos.col < self.columns && pos.row >= 0 && pos.row < self.rows
    }

    /// Returns the tile at a position. Anything outside the grid is a wall.
    pub fn tile_at(&self, pos: GridPosition) -> TileType {
        if !self.is_inside(pos) {
            return TileType::Wall;
        }
        self.tiles[(pos.row * self.columns + pos.col) as usize]
    }

    pub fn is_walkable(&self, pos: GridPosition) -> bool {
        !self.tile_at(pos).blocks_movement()
    }

    /// Every walkable tile connected to `origin` by orthogonal steps
    pub fn reachable_from(&self, origin: GridPosition) -> HashSet<GridPosition> {
        bfs_reach(origin, |pos| {
            pos.neighbors()
                .filter(|n| self.is_walkable(*n))
                .collect::<Vec<_>>()
        })
        .collect()
    }

    /// Iterates every cell with its tile in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (GridPosition, TileType)> + '_ {
        self.tiles.iter().enumerate().map(|(i, tile)| {
            let i = i as i32;
            (GridPosition::new(i % self.columns, i / self.columns), *tile)
        })
    }

    /// Renders the level back into symbol rows
    pub fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.columns as usize)
            .map(|row| row.iter().map(|t| t.symbol()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: [&str; 5] = ["#######", "#S.PX.#", "#..#.E#", "#P...G#", "#######"];

    #[test]
    fn test_parse_records_landmarks() {
        let level = Level::parse(&LAYOUT, 32).unwrap();
        assert_eq!(level.columns(), 7);
        assert_eq!(level.rows(), 5);
        assert_eq!(level.start(), GridPosition::new(1, 1));
        assert_eq!(level.exit(), GridPosition::new(5, 3));
        assert_eq!(
            level.player_spawn_tiles(),
            &[GridPosition::new(3, 1), GridPosition::new(1, 3)]
        );
        assert_eq!(level.enemy_spawn_tiles(), &[GridPosition::new(5, 2)]);
        assert_eq!(level.tile_size(), 32);
    }

    #[test]
    fn test_outside_reads_as_wall() {
        let level = Level::parse(&LAYOUT, 32).unwrap();
        assert_eq!(level.tile_at(GridPosition::new(-1, 2)), TileType::Wall);
        assert_eq!(level.tile_at(GridPosition::new(7, 0)), TileType::Wall);
        assert!(!level.is_walkable(GridPosition::new(3, 2)));
        assert!(level.is_walkable(GridPosition::new(4, 1)));
        assert_eq!(level.tile_at(GridPosition::new(4, 1)), TileType::Hazard);
    }

    #[test]
    fn test_parse_errors() {
        let empty: [&str; 0] = [];
        assert_eq!(Level::parse(&empty, 32).unwrap_err(), LevelError::EmptyLayout);
        assert_eq!(
            Level::parse(&["#S#", "#G"], 32).unwrap_err(),
            LevelError::RaggedRow { row: 1 }
        );
        assert_eq!(
            Level::parse(&["#S.#"], 32).unwrap_err(),
            LevelError::MissingStartOrExit
        );
    }

    #[test]
    fn test_to_rows_round_trips_layout() {
        let level = Level::parse(&LAYOUT, 32).unwrap();
        assert_eq!(level.to_rows(), LAYOUT.to_vec());
    }

    #[test]
    fn test_cells_are_row_major() {
        let level = Level::parse(&LAYOUT, 32).unwrap();
        let cells: Vec<_> = level.cells().take(8).collect();
        assert_eq!(cells[7], (GridPosition::new(0, 1), TileType::Wall));
        assert_eq!(cells[1].0, GridPosition::new(1, 0));
    }
}
