//! Procedural arena generation
//!
//! Produces open arenas with scattered obstacles and hazards while keeping a
//! clear walkway between the start and the exit.

use super::grid::GridPosition;
use super::level::{Level, LevelError};
use super::settings::{LevelSettings, MAX_DIMENSION};
use super::tile::TileType;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

const SPAWN_BLOCK: i32 = 2;

/// Seeded arena generator
pub struct LevelGenerator {
    width: i32,
    height: i32,
    tile_size: u32,
    hazard_chance: f32,
    rng: StdRng,
}

impl LevelGenerator {
    /// Creates a generator. Both dimensions must be odd so the border walls
    /// frame the interior evenly, and at most [`MAX_DIMENSION`].
    pub fn new(
        width: i32,
        height: i32,
        tile_size: u32,
        hazard_chance: f32,
        seed: i64,
    ) -> Result<Self, LevelError> {
        if width % 2 == 0 || height % 2 == 0 || width < 3 || height < 3 {
            return Err(LevelError::EvenDimensions { width, height });
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(LevelError::TooLarge {
                width,
                height,
                max: MAX_DIMENSION,
            });
        }
        Ok(Self {
            width,
            height,
            tile_size,
            hazard_chance,
            rng: StdRng::seed_from_u64(seed as u64),
        })
    }

    pub fn from_settings(settings: &LevelSettings) -> Result<Self, LevelError> {
        Self::new(
            settings.width(),
            settings.height(),
            settings.tile_size() as u32,
            settings.hazard_density(),
            settings.seed(),
        )
    }

    /// Generates a level, consuming the generator's random stream
    pub fn generate(mut self) -> Result<Level, LevelError> {
        let mut grid = Grid::bordered(self.width, self.height);

        let start = GridPosition::new(1, (self.height / 2).max(1));
        let exit = GridPosition::new(self.width - 2, self.rng.random_range(1..self.height - 1));

        self.carve_guided_path(&mut grid, start, exit);
        self.place_obstacles(&mut grid);
        self.sprinkle_hazards(&mut grid);
        self.carve_spawn_block(&mut grid, start, TileType::PlayerSpawn, 1);
        self.carve_spawn_block(&mut grid, exit, TileType::EnemySpawn, -1);

        grid.set(start, TileType::Start);
        grid.set(exit, TileType::Exit);

        debug!(
            width = self.width,
            height = self.height,
            ?start,
            ?exit,
            "Generated arena"
        );
        Level::parse(&grid.to_rows(), self.tile_size)
    }

    fn carve_guided_path(&mut self, grid: &mut Grid, start: GridPosition, exit: GridPosition) {
        let mut pos = start;
        grid.mark_walkway(pos);

        while pos != exit {
            let horizontal = if pos.col == exit.col {
                false
            } else if pos.row == exit.row {
                true
            } else {
                self.rng.random_bool(0.5)
            };

            if horizontal {
                pos.col += (exit.col - pos.col).signum();
            } else {
                pos.row += (exit.row - pos.row).signum();
            }

            if !grid.is_interior(pos) {
                break;
            }
            grid.mark_walkway(pos);
            grid.set(pos, TileType::Floor);
        }
    }

    fn place_obstacles(&mut self, grid: &mut Grid) {
        let area = self.width * self.height;

        let clusters = (area / 150).max(3);
        for _ in 0..clusters {
            let cluster_width = self.rng.random_range(2..5);
            let cluster_height = self.rng.random_range(2..5);
            // Tiny arenas leave no room for a full cluster; pin it to the
            // first interior cell and let the border clip it.
            let col = self
                .rng
                .random_range(1..(self.width - cluster_width - 1).max(2));
            let row = self
                .rng
                .random_range(1..(self.height - cluster_height - 1).max(2));
            for y in row..(row + cluster_height).min(self.height - 1) {
                for x in col..(col + cluster_width).min(self.width - 1) {
                    grid.set_unless_walkway(GridPosition::new(x, y), TileType::Wall);
                }
            }
        }

        let pillars = (area / 120).max(5);
        for _ in 0..pillars {
            let col = self.rng.random_range(1..self.width - 1);
            let row = self.rng.random_range(1..self.height - 1);
            grid.set_unless_walkway(GridPosition::new(col, row), TileType::Wall);
        }
    }

    fn sprinkle_hazards(&mut self, grid: &mut Grid) {
        for row in 1..self.height - 1 {
            for col in 1..self.width - 1 {
                let pos = GridPosition::new(col, row);
                if grid.is_walkway(pos) {
                    continue;
                }
                if grid.get(pos) == TileType::Floor && self.rng.random::<f32>() < self.hazard_chance {
                    grid.set(pos, TileType::Hazard);
                }
            }
        }
    }

    /// Writes a 2x2 spawn block beside `anchor`, east of it for a positive
    /// direction and west for a negative one, clamped to the interior.
    fn carve_spawn_block(
        &self,
        grid: &mut Grid,
        anchor: GridPosition,
        tile: TileType,
        direction: i32,
    ) {
        let desired_col = if direction > 0 {
            anchor.col + 1
        } else {
            anchor.col - SPAWN_BLOCK
        };
        let start_col = clamp_interior(desired_col, SPAWN_BLOCK, self.width);
        let start_row = clamp_interior(anchor.row - SPAWN_BLOCK / 2, SPAWN_BLOCK, self.height);
        for row in start_row..start_row + SPAWN_BLOCK {
            for col in start_col..start_col + SPAWN_BLOCK {
                grid.set(GridPosition::new(col, row), tile);
            }
        }
    }
}

fn clamp_interior(desired: i32, span: i32, extent: i32) -> i32 {
    let min = 1;
    let max = if span >= extent { min } else { (extent - span - 1).max(min) };
    desired.clamp(min, max)
}

/// Scratch grid used while generating
struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<TileType>,
    walkway: Vec<bool>,
}

impl Grid {
    fn bordered(width: i32, height: i32) -> Self {
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for row in 0..height {
            for col in 0..width {
                let border = row == 0 || col == 0 || row == height - 1 || col == width - 1;
                tiles.push(if border { TileType::Wall } else { TileType::Floor });
            }
        }
        Self {
            width,
            height,
            walkway: vec![false; tiles.len()],
            tiles,
        }
    }

    fn index(&self, pos: GridPosition) -> Option<usize> {
        let inside = pos.col >= 0 && pos.col < self.width && pos.row >= 0 && pos.row < self.height;
        inside.then(|| (pos.row * self.width + pos.col) as usize)
    }

    fn is_interior(&self, pos: GridPosition) -> bool {
        pos.col > 0 && pos.col < self.width - 1 && pos.row > 0 && pos.row < self.height - 1
    }

    fn get(&self, pos: GridPosition) -> TileType {
        self.index(pos)
            .map(|i| self.tiles[i])
            .unwrap_or(TileType::Wall)
    }

    fn set(&mut self, pos: GridPosition, tile: TileType) {
        if let Some(i) = self.index(pos) {
            self.tiles[i] = tile;
        }
    }

    fn set_unless_walkway(&mut self, pos: GridPosition, tile: TileType) {
        if !self.is_walkway(pos) {
            self.set(pos, tile);
        }
    }

    fn mark_walkway(&mut self, pos: GridPosition) {
        if let Some(i) = self.index(pos) {
            self.walkway[i] = true;
        }
    }

    fn is_walkway(&self, pos: GridPosition) -> bool {
        self.index(pos).is_some_and(|i| self.walkway[i])
    }

    fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|t| t.symbol()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_even_dimensions() {
        assert!(matches!(
            LevelGenerator::new(10, 9, 32, 0.1, 1),
            Err(LevelError::EvenDimensions { width: 10, height: 9 })
        ));
    }

    #[test]
    fn test_rejects_oversized_arenas() {
        assert!(matches!(
            LevelGenerator::new(60_001, 60_001, 32, 0.1, 1),
            Err(LevelError::TooLarge { max: MAX_DIMENSION, .. })
        ));
        let level = LevelGenerator::new(MAX_DIMENSION, 5, 16, 0.1, 1)
            .unwrap()
            .generate()
            .unwrap();
        assert_eq!(level.columns(), MAX_DIMENSION);
    }

    #[test]
    fn test_narrowest_settings_keep_both_spawn_blocks() {
        for seed in 0..200 {
            let settings = LevelSettings::new(5, 5, 32, 0.1, seed, true);
            let level = LevelGenerator::from_settings(&settings)
                .unwrap()
                .generate()
                .unwrap();
            assert_eq!(level.player_spawn_tiles().len(), 4, "seed {seed}");
            assert_eq!(level.enemy_spawn_tiles().len(), 4, "seed {seed}");
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = LevelGenerator::new(25, 19, 48, 0.08, 1234)
            .unwrap()
            .generate()
            .unwrap();
        let b = LevelGenerator::new(25, 19, 48, 0.08, 1234)
            .unwrap()
            .generate()
            .unwrap();
        assert_eq!(a.to_rows(), b.to_rows());
    }

    #[test]
    fn test_border_is_walled() {
        let level = LevelGenerator::new(21, 15, 48, 0.2, 99)
            .unwrap()
            .generate()
            .unwrap();
        for (pos, tile) in level.cells() {
            let border = pos.col == 0
                || pos.row == 0
                || pos.col == level.columns() - 1
                || pos.row == level.rows() - 1;
            if border {
                assert_eq!(tile, TileType::Wall, "border cell {pos} is open");
            }
        }
    }

    #[test]
    fn test_start_and_exit_placement() {
        let level = LevelGenerator::new(25, 19, 48, 0.08, 5)
            .unwrap()
            .generate()
            .unwrap();
        assert_eq!(level.start(), GridPosition::new(1, 9));
        assert_eq!(level.exit().col, 23);
        assert!((1..18).contains(&level.exit().row));
    }

    #[test]
    fn test_spawn_blocks_are_two_by_two() {
        let level = LevelGenerator::new(25, 19, 48, 0.08, 77)
            .unwrap()
            .generate()
            .unwrap();
        assert_eq!(level.player_spawn_tiles().len(), 4);
        assert_eq!(level.enemy_spawn_tiles().len(), 4);
        assert!(level.player_spawn_tiles().iter().all(|p| p.col == 2 || p.col == 3));
        assert!(level.enemy_spawn_tiles().iter().all(|p| p.col == 21 || p.col == 22));
    }

    #[test]
    fn test_exit_and_spawns_reachable_across_seeds() {
        for seed in [0_i64, 1, 2, 17, -5, 4242, i64::MAX] {
            let level = LevelGenerator::new(25, 19, 48, 0.3, seed)
                .unwrap()
                .generate()
                .unwrap();
            let reachable = level.reachable_from(level.start());
            assert!(reachable.contains(&level.exit()), "seed {seed}: exit cut off");
            for spawn in level
                .player_spawn_tiles()
                .iter()
                .chain(level.enemy_spawn_tiles())
            {
                assert!(reachable.contains(spawn), "seed {seed}: spawn {spawn} cut off");
            }
        }
    }

    #[test]
    fn test_smallest_arena_generates() {
        for seed in 0..20 {
            let level = LevelGenerator::new(5, 5, 16, 0.6, seed)
                .unwrap()
                .generate()
                .unwrap();
            assert_eq!(level.columns(), 5);
            assert_eq!(level.rows(), 5);
        }
    }
}
