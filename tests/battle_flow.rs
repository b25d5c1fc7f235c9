//! Integration tests driving a whole battle turn through key presses

use std::collections::HashSet;

use hazard_run::sim::{
    BattlePhase, GridPosition, Key, LevelSettings, TacticsSimulation, UiMode, UnitFaction,
};

fn session(seed: i64) -> TacticsSimulation {
    TacticsSimulation::new(LevelSettings::new(25, 19, 48, 0.08, seed, true))
        .expect("arena should generate")
}

/// Config, roster, loadouts, briefing and deployment
fn deploy(sim: &mut TacticsSimulation) {
    sim.handle_key(Key::Enter);
    assert_eq!(sim.ui_mode(), UiMode::PartyMenu);
    sim.handle_key(Key::Letter('p'));

    while sim.ui_mode() == UiMode::WeaponMenu {
        sim.handle_key(Key::Enter);
    }
    assert_eq!(sim.ui_mode(), UiMode::Playing);
    assert!(sim.banner_visible());
    sim.handle_key(Key::Enter);

    let spawns = sim.level().player_spawn_tiles().to_vec();
    for spawn in spawns.iter().take(sim.squad(UnitFaction::Player).len()) {
        assert!(sim.focus_tile(*spawn));
        sim.handle_key(Key::Enter);
    }
    assert_eq!(sim.phase(), BattlePhase::Active);
}

/// Selects the unit standing on `from` and sends it as far as it can go
fn move_unit(sim: &mut TacticsSimulation, from: GridPosition) -> GridPosition {
    assert!(sim.focus_tile(from));
    sim.handle_key(Key::Enter);
    let preview = sim.movement_preview().expect("selected unit has a preview");
    let target = preview
        .reachable_tiles()
        .into_iter()
        .filter(|&tile| tile != preview.origin())
        .max_by_key(|&tile| preview.distance_to(tile))
        .expect("unit should have room to move");

    assert!(sim.focus_tile(target));
    sim.handle_key(Key::Enter);
    target
}

fn positions(sim: &TacticsSimulation, faction: UnitFaction) -> Vec<GridPosition> {
    sim.squad(faction)
        .units()
        .iter()
        .filter_map(|u| u.position())
        .collect()
}

#[test]
fn test_deployment_keeps_every_unit_on_spawn_tiles() {
    let mut sim = session(7);
    deploy(&mut sim);

    for pos in positions(&sim, UnitFaction::Player) {
        assert!(sim.is_spawn_tile(pos), "{pos} is not a spawn tile");
    }
    for unit in sim.squad(UnitFaction::Player).units() {
        assert!(sim.has_assigned_loadout(unit.id()));
    }
}

#[test]
fn test_full_turn_hands_over_to_enemy_and_back() {
    let mut sim = session(2024);
    deploy(&mut sim);
    let enemies_before = positions(&sim, UnitFaction::Enemy);

    let starts = positions(&sim, UnitFaction::Player);
    for (i, start) in starts.iter().enumerate() {
        let target = move_unit(&mut sim, *start);
        assert_eq!(
            sim.squad(UnitFaction::Player).units()[i].position(),
            Some(target)
        );
        if i + 1 < starts.len() {
            assert!(sim.squad(UnitFaction::Player).units()[i].has_moved_this_turn());
        }
    }

    assert_eq!(
        sim.message(),
        "Enemy units repositioned. Player phase refreshed."
    );
    assert_eq!(sim.turn(), 2);
    assert!(
        sim.squad(UnitFaction::Player)
            .units()
            .iter()
            .all(|u| !u.has_moved_this_turn())
    );
    assert_ne!(positions(&sim, UnitFaction::Enemy), enemies_before);

    // Nobody shares a tile or stands on a wall
    let all: Vec<_> = positions(&sim, UnitFaction::Player)
        .into_iter()
        .chain(positions(&sim, UnitFaction::Enemy))
        .collect();
    let unique: HashSet<_> = all.iter().copied().collect();
    assert_eq!(unique.len(), all.len());
    assert!(all.iter().all(|&pos| sim.level().is_walkable(pos)));
}

#[test]
fn test_moved_unit_cannot_be_reselected() {
    let mut sim = session(2024);
    deploy(&mut sim);

    let start = positions(&sim, UnitFaction::Player)[0];
    let target = move_unit(&mut sim, start);
    assert!(sim.focus_tile(target));
    sim.handle_key(Key::Enter);
    assert_eq!(sim.message(), "Player 1 already moved this turn.");
    assert!(sim.selected_unit().is_none());

    // Q/E skips the unit that already acted
    sim.handle_key(Key::Letter('e'));
    assert_eq!(sim.selected_unit().map(|u| u.id()), Some("player-2"));
}

#[test]
fn test_enemy_turn_is_reproducible_for_a_seed() {
    let play = || {
        let mut sim = session(99);
        deploy(&mut sim);
        for start in positions(&sim, UnitFaction::Player) {
            move_unit(&mut sim, start);
        }
        positions(&sim, UnitFaction::Enemy)
    };
    assert_eq!(play(), play());
}

#[test]
fn test_config_rebuild_restarts_deployment() {
    let mut sim = session(5);
    deploy(&mut sim);
    let revision = sim.level_revision();

    sim.handle_key(Key::Tab);
    assert_eq!(sim.ui_mode(), UiMode::Config);
    sim.handle_key(Key::Left);
    sim.handle_key(Key::Enter);

    assert_eq!(sim.level_revision(), revision + 1);
    assert_eq!(sim.level().columns(), 23);
    assert_eq!(sim.phase(), BattlePhase::Placement);
    assert_eq!(sim.ui_mode(), UiMode::PartyMenu);
    assert!(positions(&sim, UnitFaction::Player).is_empty());
}

#[test]
fn test_narrow_arenas_finish_deployment() {
    for (width, height) in [(5, 5), (7, 7), (7, 9)] {
        for seed in 0..40 {
            let settings = LevelSettings::new(width, height, 32, 0.1, seed, true);
            let mut sim = TacticsSimulation::new(settings).expect("arena should generate");
            deploy(&mut sim);
            assert_eq!(
                positions(&sim, UnitFaction::Player).len(),
                sim.squad(UnitFaction::Player).len(),
                "{width}x{height} seed {seed}"
            );
        }
    }
}
