//! Movement range preview
//!
//! Shortest-path distances from a unit to every tile it can reach this turn.
//! Walls, tiles outside the level and tiles held by other units block
//! movement.

use super::grid::GridPosition;
use super::level::Level;
use super::unit::Unit;
use pathfinding::prelude::dijkstra_all;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct MovementPreview {
    origin: GridPosition,
    distances: HashMap<GridPosition, u32>,
    max_distance: u32,
}

impl MovementPreview {
    /// Computes the reachable area of `selected`
    ///
    /// Returns `None` when the unit is not on the board or `max_distance` is
    /// zero. Every placed unit in `friendlies` other than `selected` (matched
    /// by id) and every placed unit in `enemies` blocks its tile.
    pub fn calculate(
        level: &Level,
        selected: &Unit,
        friendlies: &[Unit],
        enemies: &[Unit],
        max_distance: u32,
    ) -> Option<Self> {
        let origin = selected.position()?;
        if max_distance == 0 {
            return None;
        }

        let blocked: HashSet<GridPosition> = friendlies
            .iter()
            .filter(|u| u.id() != selected.id())
            .chain(enemies)
            .filter_map(Unit::position)
            .collect();

        let parents = dijkstra_all(&origin, |pos| {
            pos.neighbors()
                .filter(|n| level.is_inside(*n) && level.is_walkable(*n) && !blocked.contains(n))
                .map(|n| (n, 1_u32))
                .collect::<Vec<_>>()
        });

        let mut distances: HashMap<GridPosition, u32> = parents
            .into_iter()
            .filter(|(pos, (_, cost))| *cost <= max_distance && *pos != origin)
            .map(|(pos, (_, cost))| (pos, cost))
            .collect();
        distances.insert(origin, 0);

        Some(Self {
            origin,
            distances,
            max_distance,
        })
    }

    pub fn origin(&self) -> GridPosition {
        self.origin
    }

    pub fn is_reachable(&self, pos: GridPosition) -> bool {
        self.distances.contains_key(&pos)
    }

    /// Step count to `pos`, or `None` when it is out of range
    pub fn distance_to(&self, pos: GridPosition) -> Option<u32> {
        self.distances.get(&pos).copied()
    }

    /// All reachable tiles, origin included, in row-major order
    pub fn reachable_tiles(&self) -> Vec<GridPosition> {
        let mut tiles: Vec<_> = self.distances.keys().copied().collect();
        tiles.sort();
        tiles
    }

    pub fn max_distance(&self) -> u32 {
        self.max_distance
    }
}
