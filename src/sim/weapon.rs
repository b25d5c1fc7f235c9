//! Weapon catalog
//!
//! Weapons are static data. Units hold a copy of the `Weapon` value, which
//! only carries `&'static` references into the catalog below.

use super::unit::UnitFaction;

/// Rock-paper-scissors affinity of a weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponTag {
    Rock,
    Paper,
    Scissors,
}

impl WeaponTag {
    pub fn symbol(self) -> char {
        match self {
            WeaponTag::Rock => 'R',
            WeaponTag::Paper => 'P',
            WeaponTag::Scissors => 'S',
        }
    }
}

/// Area shape of a skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillPattern {
    SingleTarget,
    Cone,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponSkill {
    pub id: &'static str,
    pub display_name: &'static str,
    pub pattern: SkillPattern,
    pub range: u32,
    pub width: u32,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weapon {
    pub id: &'static str,
    pub display_name: &'static str,
    pub tag: WeaponTag,
    pub damage: u32,
    pub defense: u32,
    pub description: &'static str,
    pub skills: &'static [WeaponSkill],
}

impl Weapon {
    /// One-line summary used by menus, e.g. `[R] - Aegis Lance   DMG 8 / DEF 5`
    pub fn summary(&self) -> String {
        format!(
            "[{}] - {}   DMG {} / DEF {}",
            self.tag.symbol(),
            self.display_name,
            self.damage,
            self.defense
        )
    }

    /// Compact label used in the party roster
    pub fn roster_label(&self) -> String {
        format!(
            "[{}] {} DMG {} DEF {}",
            self.tag.symbol(),
            self.display_name,
            self.damage,
            self.defense
        )
    }
}

pub const AEGIS_LANCE: Weapon = Weapon {
    id: "player-lance",
    display_name: "Aegis Lance",
    tag: WeaponTag::Rock,
    damage: 8,
    defense: 5,
    description: "Reach weapon that trades speed for a sturdy guard.",
    skills: &[
        WeaponSkill {
            id: "lance-thrust",
            display_name: "Focused Thrust",
            pattern: SkillPattern::SingleTarget,
            range: 3,
            width: 1,
            description: "Stab a single tile up to 3 spaces away.",
        },
        WeaponSkill {
            id: "lance-sweep",
            display_name: "Shield Sweep",
            pattern: SkillPattern::Cone,
            range: 2,
            width: 2,
            description: "Push foes in a short cone while dealing light damage.",
        },
    ],
};

pub const PULSE_PISTOL: Weapon = Weapon {
    id: "enemy-pistol",
    display_name: "Pulse Pistol",
    tag: WeaponTag::Scissors,
    damage: 6,
    defense: 3,
    description: "Ranged sidearm with a piercing burst mode.",
    skills: &[
        WeaponSkill {
            id: "pistol-shot",
            display_name: "Pulse Shot",
            pattern: SkillPattern::SingleTarget,
            range: 4,
            width: 1,
            description: "Single target ranged shot.",
        },
        WeaponSkill {
            id: "pistol-burst",
            display_name: "Line Burst",
            pattern: SkillPattern::Line,
            range: 3,
            width: 1,
            description: "Fires a piercing beam through aligned tiles.",
        },
    ],
};

/// Every weapon a unit can equip, in menu order
pub fn catalog() -> &'static [Weapon] {
    const CATALOG: &[Weapon] = &[AEGIS_LANCE, PULSE_PISTOL];
    CATALOG
}

/// Default weapon for a faction
pub fn for_faction(faction: UnitFaction) -> Weapon {
    match faction {
        UnitFaction::Player => AEGIS_LANCE,
        UnitFaction::Enemy => PULSE_PISTOL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order() {
        let ids: Vec<_> = catalog().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec!["player-lance", "enemy-pistol"]);
    }

    #[test]
    fn test_faction_defaults() {
        assert_eq!(for_faction(UnitFaction::Player), AEGIS_LANCE);
        assert_eq!(for_faction(UnitFaction::Enemy), PULSE_PISTOL);
    }

    #[test]
    fn test_summary_format() {
        assert_eq!(AEGIS_LANCE.summary(), "[R] - Aegis Lance   DMG 8 / DEF 5");
        assert_eq!(PULSE_PISTOL.roster_label(), "[S] Pulse Pistol DMG 6 DEF 3");
    }

    #[test]
    fn test_skills() {
        let burst = PULSE_PISTOL
            .skills
            .iter()
            .find(|s| s.id == "pistol-burst")
            .unwrap();
        assert_eq!(burst.pattern, SkillPattern::Line);
        assert_eq!(burst.range, 3);
        assert_eq!(AEGIS_LANCE.skills[1].width, 2);
    }
}
