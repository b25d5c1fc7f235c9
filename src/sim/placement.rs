//! Deployment of a squad onto spawn tiles

use super::grid::GridPosition;
use super::squad::Squad;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementResult {
    /// Nothing was placed
    Invalid,
    /// A unit was placed and more remain
    Placed,
    /// The last unit was placed, or no free spawn tile is left
    Completed,
}

#[derive(Debug, Clone, Default)]
pub struct PlacementController {
    spawn_tiles: HashSet<GridPosition>,
}

impl PlacementController {
    pub fn new(spawn_tiles: &[GridPosition]) -> Self {
        Self {
            spawn_tiles: spawn_tiles.iter().copied().collect(),
        }
    }

    pub fn is_spawn_tile(&self, pos: GridPosition) -> bool {
        self.spawn_tiles.contains(&pos)
    }

    /// Places the squad's next unplaced unit on `target`
    ///
    /// The target must be a free spawn tile. Deployment completes once every
    /// unit is placed or every spawn tile is taken; units left over stay off
    /// the board.
    pub fn attempt_placement(&self, target: GridPosition, squad: &mut Squad) -> PlacementResult {
        if !self.is_spawn_tile(target) || squad.unit_at(target).is_some() {
            return PlacementResult::Invalid;
        }
        let Some(index) = squad.next_unplaced_index() else {
            return PlacementResult::Invalid;
        };

        let unit = &mut squad.units_mut()[index];
        unit.place_at(target);
        debug!(unit = unit.id(), %target, "Unit deployed");

        if squad.all_units_placed() || !self.has_free_spawn_tile(squad) {
            PlacementResult::Completed
        } else {
            PlacementResult::Placed
        }
    }

    pub fn has_free_spawn_tile(&self, squad: &Squad) -> bool {
        self.spawn_tiles
            .iter()
            .any(|tile| squad.unit_at(*tile).is_none())
    }

    pub fn remaining_units(&self, squad: &Squad) -> usize {
        squad.units().iter().filter(|u| !u.is_placed()).count()
    }

    pub fn all_units_placed(&self, squad: &Squad) -> bool {
        squad.all_units_placed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::unit::UnitFaction;

    fn spawns() -> Vec<GridPosition> {
        vec![GridPosition::new(2, 2), GridPosition::new(3, 2)]
    }

    #[test]
    fn test_no_spawn_tiles_is_invalid() {
        let controller = PlacementController::new(&[]);
        let mut squad = Squad::create(UnitFaction::Player, 1);
        assert_eq!(
            controller.attempt_placement(GridPosition::new(2, 2), &mut squad),
            PlacementResult::Invalid
        );
    }

    #[test]
    fn test_off_spawn_is_invalid() {
        let controller = PlacementController::new(&spawns());
        let mut squad = Squad::create(UnitFaction::Player, 2);
        assert_eq!(
            controller.attempt_placement(GridPosition::new(1, 1), &mut squad),
            PlacementResult::Invalid
        );
        assert_eq!(controller.remaining_units(&squad), 2);
    }

    #[test]
    fn test_places_until_completed() {
        let controller = PlacementController::new(&spawns());
        let mut squad = Squad::create(UnitFaction::Player, 2);

        assert_eq!(
            controller.attempt_placement(GridPosition::new(2, 2), &mut squad),
            PlacementResult::Placed
        );
        assert_eq!(controller.remaining_units(&squad), 1);

        // Occupied tile
        assert_eq!(
            controller.attempt_placement(GridPosition::new(2, 2), &mut squad),
            PlacementResult::Invalid
        );

        assert_eq!(
            controller.attempt_placement(GridPosition::new(3, 2), &mut squad),
            PlacementResult::Completed
        );
        assert!(controller.all_units_placed(&squad));
        assert_eq!(squad.units()[1].position(), Some(GridPosition::new(3, 2)));
    }

    #[test]
    fn test_completes_when_spawn_tiles_run_out() {
        let controller = PlacementController::new(&spawns());
        let mut squad = Squad::create(UnitFaction::Player, 4);

        controller.attempt_placement(GridPosition::new(2, 2), &mut squad);
        assert!(controller.has_free_spawn_tile(&squad));
        assert_eq!(
            controller.attempt_placement(GridPosition::new(3, 2), &mut squad),
            PlacementResult::Completed
        );
        assert!(!controller.has_free_spawn_tile(&squad));
        assert_eq!(controller.remaining_units(&squad), 2);
    }

    #[test]
    fn test_no_units_left_is_invalid() {
        let controller = PlacementController::new(&[
            GridPosition::new(2, 2),
            GridPosition::new(3, 2),
            GridPosition::new(4, 2),
        ]);
        let mut squad = Squad::create(UnitFaction::Player, 1);
        controller.attempt_placement(GridPosition::new(2, 2), &mut squad);
        assert_eq!(
            controller.attempt_placement(GridPosition::new(4, 2), &mut squad),
            PlacementResult::Invalid
        );
    }
}
