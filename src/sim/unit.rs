//! Battle units

use super::grid::GridPosition;
use super::weapon::{self, Weapon};
use enum_map::Enum;
use serde::{Deserialize, Serialize};

const DEFAULT_HP: u32 = 30;
const DEFAULT_SP: u32 = 10;

/// Side a unit fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum UnitFaction {
    Player,
    Enemy,
}

impl UnitFaction {
    /// Lower-case name used to build unit ids
    pub fn id_prefix(self) -> &'static str {
        match self {
            UnitFaction::Player => "player",
            UnitFaction::Enemy => "enemy",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    id: String,
    faction: UnitFaction,
    position: Option<GridPosition>,
    moved_this_turn: bool,
    max_hp: u32,
    max_sp: u32,
    hp: u32,
    sp: u32,
    weapon: Weapon,
}

impl Unit {
    pub fn new(id: impl Into<String>, faction: UnitFaction) -> Self {
        Self::with_stats(id, faction, DEFAULT_HP, DEFAULT_SP)
    }

    /// Creates a unit with explicit pools. HP is at least 1.
    pub fn with_stats(id: impl Into<String>, faction: UnitFaction, max_hp: u32, max_sp: u32) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            id: id.into(),
            faction,
            position: None,
            moved_this_turn: false,
            max_hp,
            max_sp,
            hp: max_hp,
            sp: max_sp,
            weapon: weapon::for_faction(faction),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn faction(&self) -> UnitFaction {
        self.faction
    }

    pub fn position(&self) -> Option<GridPosition> {
        self.position
    }

    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }

    pub fn is_at(&self, pos: GridPosition) -> bool {
        self.position == Some(pos)
    }

    pub fn place_at(&mut self, pos: GridPosition) {
        self.position = Some(pos);
    }

    pub fn clear_placement(&mut self) {
        self.position = None;
    }

    pub fn has_moved_this_turn(&self) -> bool {
        self.moved_this_turn
    }

    pub fn set_moved_this_turn(&mut self, moved: bool) {
        self.moved_this_turn = moved;
    }

    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    pub fn equip_weapon(&mut self, weapon: Weapon) {
        self.weapon = weapon;
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn sp(&self) -> u32 {
        self.sp
    }

    pub fn max_sp(&self) -> u32 {
        self.max_sp
    }

    /// Human-readable name derived from the id: `player-1` becomes `Player 1`
    pub fn display_name(&self) -> String {
        self.id
            .split('-')
            .filter(|segment| !segment.is_empty())
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn capitalize(segment: &str) -> String {
    let lower = segment.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::weapon::{AEGIS_LANCE, PULSE_PISTOL};

    #[test]
    fn test_defaults() {
        let unit = Unit::new("enemy-2", UnitFaction::Enemy);
        assert_eq!(unit.hp(), 30);
        assert_eq!(unit.max_sp(), 10);
        assert_eq!(unit.weapon(), &PULSE_PISTOL);
        assert!(!unit.is_placed());
        assert!(!unit.has_moved_this_turn());
    }

    #[test]
    fn test_stats_floor() {
        let unit = Unit::with_stats("x", UnitFaction::Player, 0, 0);
        assert_eq!(unit.max_hp(), 1);
        assert_eq!(unit.hp(), 1);
        assert_eq!(unit.sp(), 0);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Unit::new("player-1", UnitFaction::Player).display_name(), "Player 1");
        assert_eq!(
            Unit::new("ENEMY--scout-3", UnitFaction::Enemy).display_name(),
            "Enemy Scout 3"
        );
        assert_eq!(Unit::new("", UnitFaction::Enemy).display_name(), "");
    }

    #[test]
    fn test_placement_and_equip() {
        let mut unit = Unit::new("enemy-1", UnitFaction::Enemy);
        unit.place_at(GridPosition::new(4, 2));
        assert!(unit.is_at(GridPosition::new(4, 2)));
        unit.equip_weapon(AEGIS_LANCE);
        assert_eq!(unit.weapon().display_name, "Aegis Lance");
        unit.clear_placement();
        assert_eq!(unit.position(), None);
    }
}
