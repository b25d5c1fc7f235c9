//! A faction's list of units

use super::grid::GridPosition;
use super::unit::{Unit, UnitFaction};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SquadError {
    #[error("unit {unit_id} belongs to {found:?}, squad is {expected:?}")]
    FactionMismatch {
        unit_id: String,
        expected: UnitFaction,
        found: UnitFaction,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Squad {
    faction: UnitFaction,
    units: Vec<Unit>,
}

impl Squad {
    /// Builds a squad, rejecting units from another faction
    pub fn new(faction: UnitFaction, units: Vec<Unit>) -> Result<Self, SquadError> {
        if let Some(unit) = units.iter().find(|u| u.faction() != faction) {
            return Err(SquadError::FactionMismatch {
                unit_id: unit.id().to_string(),
                expected: faction,
                found: unit.faction(),
            });
        }
        Ok(Self { faction, units })
    }

    /// Creates `count` fresh units named `{faction}-1`, `{faction}-2`, ...
    pub fn create(faction: UnitFaction, count: usize) -> Self {
        let units = (1..=count)
            .map(|i| Unit::new(format!("{}-{}", faction.id_prefix(), i), faction))
            .collect();
        Self { faction, units }
    }

    pub fn faction(&self) -> UnitFaction {
        self.faction
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut [Unit] {
        &mut self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn next_unplaced_index(&self) -> Option<usize> {
        self.units.iter().position(|u| !u.is_placed())
    }

    pub fn next_unplaced(&self) -> Option<&Unit> {
        self.next_unplaced_index().map(|i| &self.units[i])
    }

    pub fn all_units_placed(&self) -> bool {
        self.next_unplaced_index().is_none()
    }

    pub fn clear_placements(&mut self) {
        for unit in &mut self.units {
            unit.clear_placement();
        }
    }

    /// Index of the placed unit standing on `pos`
    pub fn unit_index_at(&self, pos: GridPosition) -> Option<usize> {
        self.units.iter().position(|u| u.is_at(pos))
    }

    pub fn unit_at(&self, pos: GridPosition) -> Option<&Unit> {
        self.unit_index_at(pos).map(|i| &self.units[i])
    }

    /// True when every placed unit has used its move
    pub fn all_placed_units_moved(&self) -> bool {
        self.units
            .iter()
            .filter(|u| u.is_placed())
            .all(|u| u.has_moved_this_turn())
    }

    pub fn reset_movement_flags(&mut self) {
        for unit in &mut self.units {
            unit.set_moved_this_turn(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_names_units() {
        let squad = Squad::create(UnitFaction::Enemy, 3);
        let ids: Vec<_> = squad.units().iter().map(|u| u.id()).collect();
        assert_eq!(ids, vec!["enemy-1", "enemy-2", "enemy-3"]);
        assert_eq!(squad.faction(), UnitFaction::Enemy);
    }

    #[test]
    fn test_rejects_faction_mismatch() {
        let units = vec![
            Unit::new("player-1", UnitFaction::Player),
            Unit::new("enemy-1", UnitFaction::Enemy),
        ];
        let err = Squad::new(UnitFaction::Player, units).unwrap_err();
        assert_eq!(
            err,
            SquadError::FactionMismatch {
                unit_id: "enemy-1".to_string(),
                expected: UnitFaction::Player,
                found: UnitFaction::Enemy,
            }
        );
    }

    #[test]
    fn test_placement_tracking() {
        let mut squad = Squad::create(UnitFaction::Player, 2);
        assert_eq!(squad.next_unplaced().map(|u| u.id()), Some("player-1"));

        squad.units_mut()[0].place_at(GridPosition::new(1, 1));
        assert_eq!(squad.next_unplaced_index(), Some(1));
        assert_eq!(squad.unit_index_at(GridPosition::new(1, 1)), Some(0));
        assert!(!squad.all_units_placed());

        squad.units_mut()[1].place_at(GridPosition::new(2, 1));
        assert!(squad.all_units_placed());

        squad.clear_placements();
        assert_eq!(squad.next_unplaced_index(), Some(0));
    }

    #[test]
    fn test_movement_flags_ignore_unplaced() {
        let mut squad = Squad::create(UnitFaction::Player, 2);
        squad.units_mut()[0].place_at(GridPosition::new(1, 1));
        assert!(!squad.all_placed_units_moved());

        squad.units_mut()[0].set_moved_this_turn(true);
        assert!(squad.all_placed_units_moved());

        squad.reset_movement_flags();
        assert!(!squad.units()[0].has_moved_this_turn());
    }
}
