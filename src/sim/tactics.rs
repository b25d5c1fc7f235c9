//! Squad tactics session
//!
//! Owns the arena, both squads and every piece of menu state. The flow is:
//! config mode, party roster, one weapon loadout per player unit, deployment
//! briefing, placement on the blue spawn tiles, then alternating turns where
//! each placed player unit moves once before the enemy squad repositions.
//!
//! All input arrives through [`TacticsSimulation::handle_key`] and
//! [`TacticsSimulation::focus_tile`]; the view layer only reads state back.

use super::Simulation;
use super::controls::Key;
use super::cursor::Cursor;
use super::generator::LevelGenerator;
use super::grid::{Direction, GridPosition};
use super::level::{Level, LevelError};
use super::menu::{MenuError, WeaponMenu};
use super::movement::MovementPreview;
use super::placement::{PlacementController, PlacementResult};
use super::settings::LevelSettings;
use super::squad::Squad;
use super::unit::{Unit, UnitFaction};
use super::weapon::{self, Weapon};
use enum_map::{EnumMap, enum_map};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::any::Any;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Name the tactics simulation is registered under in the [`World`](super::World)
pub const TACTICS_SIM_NAME: &str = "tactics";

pub const OBJECTIVE_TEXT: &str =
    "Reach the exit (G) without touching hazards (X). WASD / Arrow keys move. Press R to restart.";
pub const BRIEFING_HINT: &str = "Press Enter to dismiss the tactical briefing.";

pub const PLAYER_SQUAD_SIZE: usize = 4;
pub const ENEMY_SQUAD_SIZE: usize = 4;
pub const MOVEMENT_RANGE: u32 = 4;

const HAZARD_STEP: f32 = 0.01;
const DIMENSION_STEP: i32 = 2;
const TILE_SIZE_STEP: i32 = 2;

const MSG_CONFIG: &str = "Config mode: adjust parameters then press Enter to apply.";
const MSG_BRIEFING: &str = "Press Enter to acknowledge the briefing, then deploy your squad.";
const MSG_PARTY: &str = "Party roster: press P/Tab to close, Enter to continue.";
const MSG_PICK_UNIT: &str = "Move the cursor onto a friendly unit and press Enter to select it.";
const MSG_BAD_SPAWN: &str = "Select an empty blue spawn tile and press Enter to deploy.";
const MSG_ENEMY_TURN: &str = "Enemy units repositioned. Player phase refreshed.";
const MSG_OUT_OF_RANGE: &str = "Cannot move there — tile not in range.";

/// Which screen currently owns the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Config,
    Playing,
    PartyMenu,
    WeaponMenu,
}

/// Errors raised while setting up a session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Level(#[from] LevelError),

    #[error(transparent)]
    Menu(#[from] MenuError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    Placement,
    Active,
}

pub struct TacticsSimulation {
    current_settings: LevelSettings,
    editing_settings: LevelSettings,
    seed_input: String,
    level: Level,
    cursor: Cursor,
    squads: EnumMap<UnitFaction, Squad>,
    placement: PlacementController,
    movement_preview: Option<MovementPreview>,
    weapon_menu: WeaponMenu,
    equipped_weapon: Weapon,
    party_reviewed: bool,
    loadout_chosen: bool,
    loadout_target: Option<usize>,
    assigned_loadouts: HashSet<String>,
    phase: BattlePhase,
    banner_visible: bool,
    selected_unit: Option<usize>,
    last_selected: Option<usize>,
    message: String,
    message_before_menu: String,
    ui_mode: UiMode,
    enemy_rng: StdRng,
    quit_requested: bool,
    level_revision: u64,
    turn: u32,
}

impl TacticsSimulation {
    /// Generates the first arena and opens config mode
    pub fn new(settings: LevelSettings) -> Result<Self, SessionError> {
        let level = LevelGenerator::from_settings(&settings)?.generate()?;
        let cursor = Cursor::new(&level);
        let weapon_menu = WeaponMenu::new(weapon::catalog())?;
        let equipped_weapon = *weapon_menu.selected();

        let mut sim = Self {
            current_settings: settings,
            editing_settings: settings,
            seed_input: String::new(),
            level,
            cursor,
            squads: fresh_squads(),
            placement: PlacementController::default(),
            movement_preview: None,
            weapon_menu,
            equipped_weapon,
            party_reviewed: false,
            loadout_chosen: false,
            loadout_target: None,
            assigned_loadouts: HashSet::new(),
            phase: BattlePhase::Placement,
            banner_visible: true,
            selected_unit: None,
            last_selected: None,
            message: OBJECTIVE_TEXT.to_string(),
            message_before_menu: OBJECTIVE_TEXT.to_string(),
            ui_mode: UiMode::Config,
            enemy_rng: StdRng::seed_from_u64(settings.seed() as u64),
            quit_requested: false,
            level_revision: 1,
            turn: 1,
        };
        sim.initialize_battle_state();
        sim.ensure_menus_for_placement();
        sim.enter_config_mode();

        info!(
            width = settings.width(),
            height = settings.height(),
            seed = settings.seed(),
            "Tactics session ready"
        );
        Ok(sim)
    }

    // ========================================================================
    // Read access for the view layer
    // ========================================================================

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn squad(&self, faction: UnitFaction) -> &Squad {
        &self.squads[faction]
    }

    pub fn movement_preview(&self) -> Option<&MovementPreview> {
        self.movement_preview.as_ref()
    }

    pub fn selected_unit(&self) -> Option<&Unit> {
        self.selected_unit
            .and_then(|i| self.squads[UnitFaction::Player].units().get(i))
    }

    pub fn weapon_menu(&self) -> &WeaponMenu {
        &self.weapon_menu
    }

    pub fn equipped_weapon(&self) -> &Weapon {
        &self.equipped_weapon
    }

    /// Unit the weapon menu is currently assigning to
    pub fn loadout_target(&self) -> Option<&Unit> {
        self.loadout_target
            .and_then(|i| self.squads[UnitFaction::Player].units().get(i))
    }

    pub fn has_assigned_loadout(&self, unit_id: &str) -> bool {
        self.assigned_loadouts.contains(unit_id)
    }

    pub fn current_settings(&self) -> &LevelSettings {
        &self.current_settings
    }

    pub fn editing_settings(&self) -> &LevelSettings {
        &self.editing_settings
    }

    pub fn seed_input(&self) -> &str {
        &self.seed_input
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn ui_mode(&self) -> UiMode {
        self.ui_mode
    }

    pub fn banner_visible(&self) -> bool {
        self.banner_visible
    }

    /// True while the deployment briefing covers the board
    pub fn shows_briefing(&self) -> bool {
        self.banner_visible && self.phase == BattlePhase::Placement
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Incremented every time a new arena is generated
    pub fn level_revision(&self) -> u64 {
        self.level_revision
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_spawn_tile(&self, pos: GridPosition) -> bool {
        self.placement.is_spawn_tile(pos)
    }

    /// HUD line describing the weapon of the unit in focus
    pub fn loadout_summary(&self) -> String {
        let unit = self.loadout_preview_unit();
        let weapon = unit.map(|u| u.weapon()).unwrap_or(&self.equipped_weapon);
        let suffix = unit
            .map(|u| format!(" for {}", u.display_name()))
            .unwrap_or_default();
        format!(
            "Loadout{}: [{}] - {}  DMG {} / DEF {} (V to change)",
            suffix,
            weapon.tag.symbol(),
            weapon.display_name,
            weapon.damage,
            weapon.defense
        )
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Routes a key press to whichever screen owns the keyboard
    pub fn handle_key(&mut self, key: Key) {
        match self.ui_mode {
            UiMode::PartyMenu => return self.handle_party_menu_key(key),
            UiMode::WeaponMenu => return self.handle_weapon_menu_key(key),
            _ => {}
        }
        if key == Key::Escape {
            info!("Quit requested");
            self.quit_requested = true;
            return;
        }
        if self.ui_mode == UiMode::Config {
            return self.handle_config_key(key);
        }

        match key {
            Key::Letter('p') => return self.open_party_menu(),
            Key::Letter('v') => return self.open_weapon_menu(),
            Key::Tab | Key::Letter('m') => return self.enter_config_mode(),
            Key::Letter('r') => return self.restart_battle(),
            _ => {}
        }

        if self.phase == BattlePhase::Placement {
            return self.handle_placement_input(key);
        }
        if self.handle_unit_selection_key(key) || self.handle_unit_action_key(key) {
            return;
        }
        if let Some(direction) = Direction::from_key(key) {
            self.cursor.step(direction);
        }
    }

    /// Moves the cursor straight to a tile, e.g. after a mouse click
    ///
    /// Ignored while a menu or config mode is open. Returns true when the
    /// cursor ends up on `pos`.
    pub fn focus_tile(&mut self, pos: GridPosition) -> bool {
        if self.ui_mode != UiMode::Playing {
            return false;
        }
        self.cursor.move_to(pos);
        self.cursor.position() == pos
    }

    fn handle_party_menu_key(&mut self, key: Key) {
        let closes = matches!(key, Key::Escape | Key::Tab | Key::Enter | Key::Space)
            || key.is_letter('m')
            || key.is_letter('p');
        if closes {
            self.exit_party_menu();
        }
    }

    fn handle_weapon_menu_key(&mut self, key: Key) {
        match key {
            Key::Escape | Key::Tab | Key::Letter('m') | Key::Letter('v') => self.exit_weapon_menu(),
            Key::Up | Key::Letter('w') => self.weapon_menu.move_selection(-1),
            Key::Down | Key::Letter('s') => self.weapon_menu.move_selection(1),
            Key::Enter | Key::Space => {
                self.equip_selection();
                self.exit_weapon_menu();
            }
            _ => {}
        }
    }

    fn equip_selection(&mut self) {
        let selection = *self.weapon_menu.selected();
        self.equipped_weapon = selection;

        let target = self
            .loadout_target
            .take()
            .and_then(|i| self.squads[UnitFaction::Player].units_mut().get_mut(i));
        match target {
            Some(unit) => {
                unit.equip_weapon(selection);
                let name = unit.display_name();
                let id = unit.id().to_string();
                debug!(unit = %id, weapon = selection.id, "Loadout assigned");
                self.assigned_loadouts.insert(id);
                self.message = format!("Equipped [{}] for {}.", selection.display_name, name);
            }
            None => {
                self.message = format!(
                    "Equipped [{}] [{}].",
                    selection.display_name,
                    selection.tag.symbol()
                );
            }
        }
    }

    fn handle_config_key(&mut self, key: Key) {
        let before = self.editing_settings;
        match key {
            Key::Tab | Key::Letter('m') => return self.exit_config_without_apply(),
            Key::Enter => return self.apply_config_changes(),
            Key::Left => self.edit(|s| s.with_width_delta(-DIMENSION_STEP)),
            Key::Right => self.edit(|s| s.with_width_delta(DIMENSION_STEP)),
            Key::Down => self.edit(|s| s.with_height_delta(-DIMENSION_STEP)),
            Key::Up => self.edit(|s| s.with_height_delta(DIMENSION_STEP)),
            Key::Comma => self.edit(|s| s.with_tile_size_delta(-TILE_SIZE_STEP)),
            Key::Period => self.edit(|s| s.with_tile_size_delta(TILE_SIZE_STEP)),
            Key::BracketLeft => self.edit(|s| s.with_hazard_delta(-HAZARD_STEP)),
            Key::BracketRight => self.edit(|s| s.with_hazard_delta(HAZARD_STEP)),
            Key::Letter('n') => {
                self.edit(LevelSettings::with_random_seed);
                self.seed_input.clear();
            }
            Key::Letter('l') => {
                let locked = self.editing_settings.lock_seed();
                self.edit(|s| s.with_seed_lock(!locked));
            }
            Key::Backspace => {
                self.seed_input.pop();
            }
            Key::Delete => self.seed_input.clear(),
            other => self.append_seed_character(other),
        }
        if before != self.editing_settings {
            debug!(settings = ?self.editing_settings, "Config edited");
        }
    }

    fn edit(&mut self, change: impl FnOnce(LevelSettings) -> LevelSettings) {
        self.editing_settings = change(self.editing_settings);
    }

    fn append_seed_character(&mut self, key: Key) {
        if let Some(digit) = key.digit_char() {
            self.seed_input.push(digit);
        } else if key == Key::Minus && self.seed_input.is_empty() {
            self.seed_input.push('-');
        }
    }

    fn handle_placement_input(&mut self, key: Key) {
        if let Some(direction) = Direction::from_key(key) {
            self.cursor.step(direction);
            return;
        }
        if !key.is_confirm() {
            return;
        }
        if self.banner_visible {
            self.banner_visible = false;
            self.message = format!(
                "Place {} units on blue tiles.",
                self.placement
                    .remaining_units(&self.squads[UnitFaction::Player])
            );
            return;
        }

        let target = self.cursor.position();
        let result = self
            .placement
            .attempt_placement(target, &mut self.squads[UnitFaction::Player]);
        match result {
            PlacementResult::Invalid => self.message = MSG_BAD_SPAWN.to_string(),
            PlacementResult::Placed => {
                self.message = format!(
                    "Unit deployed. {} remaining.",
                    self.placement
                        .remaining_units(&self.squads[UnitFaction::Player])
                );
            }
            PlacementResult::Completed => {
                self.message = "All units deployed! Engage when ready.".to_string();
                self.enter_active_phase();
            }
        }
    }

    fn handle_unit_selection_key(&mut self, key: Key) -> bool {
        if self.squads[UnitFaction::Player].is_empty() {
            return false;
        }
        match key {
            Key::Letter('q') => self.select_next_unit(-1),
            Key::Letter('e') => self.select_next_unit(1),
            _ => return false,
        }
        true
    }

    fn handle_unit_action_key(&mut self, key: Key) -> bool {
        if !key.is_confirm() {
            return false;
        }
        if self.select_unit_at_cursor() {
            return true;
        }
        if self.selected_unit.is_some() && self.attempt_unit_move() {
            return true;
        }
        self.message = MSG_PICK_UNIT.to_string();
        true
    }

    // ========================================================================
    // Mode transitions
    // ========================================================================

    fn enter_config_mode(&mut self) {
        self.ui_mode = UiMode::Config;
        self.editing_settings = self.current_settings;
        self.seed_input.clear();
        self.message = MSG_CONFIG.to_string();
    }

    fn exit_config_without_apply(&mut self) {
        self.seed_input.clear();
        self.message = match self.phase {
            BattlePhase::Placement => MSG_BRIEFING.to_string(),
            BattlePhase::Active => OBJECTIVE_TEXT.to_string(),
        };
        self.ensure_menus_for_placement();
    }

    fn apply_config_changes(&mut self) {
        if !self.seed_input.is_empty() {
            match self.seed_input.parse::<i64>() {
                Ok(seed) => self.edit(|s| s.with_seed(seed)),
                Err(err) => warn!(input = %self.seed_input, %err, "Ignoring invalid seed input"),
            }
            self.seed_input.clear();
        }
        let previous = self.current_settings;
        self.current_settings = self.editing_settings;
        if let Err(err) = self.load_new_level() {
            warn!(%err, "Arena generation failed; keeping previous arena");
            self.current_settings = previous;
            self.editing_settings = previous;
            self.message = format!("Arena generation failed: {err}");
            return;
        }
        self.ensure_menus_for_placement();
    }

    fn open_party_menu(&mut self) {
        if self.ui_mode != UiMode::PartyMenu {
            self.ui_mode = UiMode::PartyMenu;
            self.message_before_menu = std::mem::replace(&mut self.message, MSG_PARTY.to_string());
        }
    }

    fn exit_party_menu(&mut self) {
        self.ui_mode = UiMode::Playing;
        self.party_reviewed = true;
        if self.message.starts_with("Party roster") {
            self.message = self.message_before_menu.clone();
        }
        self.ensure_menus_for_placement();
    }

    fn open_weapon_menu(&mut self) {
        if self.phase == BattlePhase::Placement && !self.party_reviewed {
            return self.open_party_menu();
        }
        self.loadout_target = self.determine_next_loadout_target();
        if self.ui_mode != UiMode::WeaponMenu {
            self.ui_mode = UiMode::WeaponMenu;
            let hint = self
                .loadout_target()
                .map(|u| format!(" (assigning {})", u.display_name()))
                .unwrap_or_default();
            let prompt = format!("Weapon menu{hint}: Up/Down to move, Enter equips, V/Tab closes.");
            self.message_before_menu = std::mem::replace(&mut self.message, prompt);
        }
    }

    fn exit_weapon_menu(&mut self) {
        self.ui_mode = UiMode::Playing;
        self.loadout_chosen = self.loadouts_complete();
        if !self.loadout_chosen {
            return self.ensure_menus_for_placement();
        }
        if self.message.starts_with("Weapon menu") {
            self.message = self.message_before_menu.clone();
        }
    }

    /// Re-opens whichever menu still blocks deployment
    fn ensure_menus_for_placement(&mut self) {
        if self.phase != BattlePhase::Placement {
            self.ui_mode = UiMode::Playing;
        } else if !self.party_reviewed {
            self.open_party_menu();
        } else if !self.loadout_chosen {
            self.open_weapon_menu();
        } else {
            self.ui_mode = UiMode::Playing;
        }
    }

    fn enter_active_phase(&mut self) {
        self.phase = BattlePhase::Active;
        self.banner_visible = false;
        self.message = "All units deployed! Use Q and E to choose who moves next.".to_string();
        info!("All units deployed; battle active");
        self.select_unit(0, true);
    }

    // ========================================================================
    // Loadouts
    // ========================================================================

    fn determine_next_loadout_target(&self) -> Option<usize> {
        let squad = &self.squads[UnitFaction::Player];
        let placed = |i: usize| squad.units().get(i).is_some_and(Unit::is_placed);

        if let Some(i) = self.last_selected.filter(|&i| placed(i)) {
            return Some(i);
        }
        if let Some(i) = self.selected_unit.filter(|&i| placed(i)) {
            return Some(i);
        }
        if let Some(i) = squad.next_unplaced_index()
            && !self.assigned_loadouts.contains(squad.units()[i].id())
        {
            return Some(i);
        }
        squad
            .units()
            .iter()
            .position(|u| !self.assigned_loadouts.contains(u.id()))
            .or_else(|| (!squad.is_empty()).then_some(0))
    }

    fn loadouts_complete(&self) -> bool {
        let squad = &self.squads[UnitFaction::Player];
        !squad.is_empty()
            && squad
                .units()
                .iter()
                .all(|u| self.assigned_loadouts.contains(u.id()))
    }

    fn loadout_preview_unit(&self) -> Option<&Unit> {
        let squad = &self.squads[UnitFaction::Player];
        if self.phase == BattlePhase::Active
            && let Some(unit) = self.selected_unit()
        {
            return Some(unit);
        }
        squad.next_unplaced().or_else(|| squad.units().first())
    }

    // ========================================================================
    // Selection and movement
    // ========================================================================

    /// Cycles to the next placed unit that can still move this turn
    fn select_next_unit(&mut self, delta: i32) {
        let squad = &self.squads[UnitFaction::Player];
        let size = squad.len() as i32;
        if size == 0 {
            self.selected_unit = None;
            return;
        }
        let start = self.selected_unit.unwrap_or(0) as i32;
        let candidate = (1..=size)
            .map(|step| (start + delta * step).rem_euclid(size) as usize)
            .find(|&i| {
                let unit = &squad.units()[i];
                unit.is_placed() && !unit.has_moved_this_turn()
            });
        if let Some(index) = candidate {
            self.select_unit(index, true);
        }
    }

    fn select_unit(&mut self, index: usize, sync_cursor: bool) {
        let Some(unit) = self.squads[UnitFaction::Player].units().get(index) else {
            self.selected_unit = None;
            self.movement_preview = None;
            self.message = "No unit available to control.".to_string();
            return;
        };
        let Some(position) = unit.position() else {
            self.selected_unit = None;
            self.movement_preview = None;
            self.message = "Unit not deployed.".to_string();
            return;
        };
        let name = unit.display_name();
        if unit.has_moved_this_turn() {
            self.message = format!("{name} already moved this turn.");
            return;
        }

        self.selected_unit = Some(index);
        if sync_cursor {
            self.cursor.move_to(position);
        }
        let player = &self.squads[UnitFaction::Player];
        self.movement_preview = MovementPreview::calculate(
            &self.level,
            &player.units()[index],
            player.units(),
            self.squads[UnitFaction::Enemy].units(),
            MOVEMENT_RANGE,
        );
        self.last_selected = Some(index);
        self.message = format!("Selected {name} - press Q/E to cycle units.");
    }

    fn select_unit_at_cursor(&mut self) -> bool {
        let focus = self.cursor.position();
        match self.squads[UnitFaction::Player].unit_index_at(focus) {
            Some(index) => {
                self.select_unit(index, false);
                true
            }
            None => false,
        }
    }

    fn attempt_unit_move(&mut self) -> bool {
        let (Some(index), Some(preview)) = (self.selected_unit, &self.movement_preview) else {
            return false;
        };
        let target = self.cursor.position();
        if !preview.is_reachable(target) {
            self.message = MSG_OUT_OF_RANGE.to_string();
            return true;
        }

        let Some(unit) = self.squads[UnitFaction::Player].units_mut().get_mut(index) else {
            self.message = "Unit not available for movement.".to_string();
            return true;
        };
        if !unit.is_placed() {
            self.message = "Unit not available for movement.".to_string();
            return true;
        }
        if unit.has_moved_this_turn() {
            self.message = format!("{} already moved this turn.", unit.display_name());
            return true;
        }

        unit.place_at(target);
        unit.set_moved_this_turn(true);
        info!(unit = unit.id(), %target, "Unit moved");
        self.message = format!(
            "{} moved to ({},{}).",
            unit.display_name(),
            target.col,
            target.row
        );
        self.selected_unit = None;
        self.movement_preview = None;

        if self.squads[UnitFaction::Player].all_placed_units_moved() {
            self.execute_enemy_turn();
            self.squads[UnitFaction::Player].reset_movement_flags();
            self.turn += 1;
            self.message = MSG_ENEMY_TURN.to_string();
        }
        true
    }

    /// Every placed enemy moves to a random tile inside its own range
    fn execute_enemy_turn(&mut self) {
        for index in 0..self.squads[UnitFaction::Enemy].len() {
            let enemies = &self.squads[UnitFaction::Enemy];
            let enemy = &enemies.units()[index];
            let Some(preview) = MovementPreview::calculate(
                &self.level,
                enemy,
                enemies.units(),
                self.squads[UnitFaction::Player].units(),
                MOVEMENT_RANGE,
            ) else {
                continue;
            };

            let origin = preview.origin();
            let tiles: Vec<_> = preview
                .reachable_tiles()
                .into_iter()
                .filter(|&tile| tile != origin)
                .collect();
            if tiles.is_empty() {
                continue;
            }
            let target = tiles[self.enemy_rng.random_range(0..tiles.len())];
            let enemy = &mut self.squads[UnitFaction::Enemy].units_mut()[index];
            debug!(unit = enemy.id(), from = %origin, to = %target, "Enemy repositioned");
            enemy.place_at(target);
        }
        self.message = "Enemy units repositioned.".to_string();
        self.squads[UnitFaction::Enemy].reset_movement_flags();
        info!(turn = self.turn, "Enemy turn finished");
    }

    // ========================================================================
    // Arena lifecycle
    // ========================================================================

    fn load_new_level(&mut self) -> Result<(), LevelError> {
        let settings = self.current_settings;
        self.level = LevelGenerator::from_settings(&settings)?.generate()?;
        self.cursor.attach(&self.level);
        self.level_revision += 1;
        self.initialize_battle_state();
        self.editing_settings = settings;
        info!(
            width = settings.width(),
            height = settings.height(),
            tile_size = settings.tile_size(),
            hazard = settings.hazard_density(),
            seed = settings.seed(),
            locked = settings.lock_seed(),
            "Arena generated"
        );
        self.ensure_menus_for_placement();
        Ok(())
    }

    /// Restarts the battle on the current arena
    pub fn restart_battle(&mut self) {
        self.cursor.attach(&self.level);
        self.initialize_battle_state();
        info!("Battle restarted");
        self.ensure_menus_for_placement();
    }

    fn initialize_battle_state(&mut self) {
        self.phase = BattlePhase::Placement;
        self.selected_unit = None;
        self.movement_preview = None;
        self.loadout_target = None;
        self.party_reviewed = false;
        self.loadout_chosen = false;
        self.assigned_loadouts.clear();
        self.last_selected = None;
        self.squads = fresh_squads();
        self.banner_visible = true;
        self.turn = 1;
        self.enemy_rng = StdRng::seed_from_u64(self.current_settings.seed() as u64);
        self.placement = PlacementController::new(self.level.player_spawn_tiles());
        self.place_enemy_squad();

        let focus = self
            .level
            .player_spawn_tiles()
            .first()
            .copied()
            .unwrap_or(self.level.start());
        self.cursor.move_to(focus);
        self.message = MSG_BRIEFING.to_string();
    }

    fn place_enemy_squad(&mut self) {
        let mut tiles = self.level.enemy_spawn_tiles().to_vec();
        if tiles.is_empty() {
            tiles.push(self.level.exit());
        }
        for (i, enemy) in self.squads[UnitFaction::Enemy]
            .units_mut()
            .iter_mut()
            .enumerate()
        {
            enemy.place_at(tiles[i % tiles.len()]);
        }
    }
}

fn fresh_squads() -> EnumMap<UnitFaction, Squad> {
    enum_map! {
        UnitFaction::Player => Squad::create(UnitFaction::Player, PLAYER_SQUAD_SIZE),
        UnitFaction::Enemy => Squad::create(UnitFaction::Enemy, ENEMY_SQUAD_SIZE),
    }
}

impl Simulation for TacticsSimulation {
    fn tick(&mut self, _delta_time: f32) {
        // Turn-based; state only changes on input.
    }

    fn reset(&mut self) {
        self.restart_battle();
    }

    fn name(&self) -> &str {
        TACTICS_SIM_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> LevelSettings {
        LevelSettings::new(25, 19, 48, 0.08, 2024, true)
    }

    fn sim() -> TacticsSimulation {
        TacticsSimulation::new(settings()).unwrap()
    }

    /// Applies config, reviews the roster and assigns every loadout
    fn through_menus(sim: &mut TacticsSimulation) {
        sim.handle_key(Key::Enter);
        assert_eq!(sim.ui_mode(), UiMode::PartyMenu);
        sim.handle_key(Key::Enter);
        for _ in 0..PLAYER_SQUAD_SIZE {
            assert_eq!(sim.ui_mode(), UiMode::WeaponMenu);
            sim.handle_key(Key::Enter);
        }
        assert_eq!(sim.ui_mode(), UiMode::Playing);
    }

    #[test]
    fn test_starts_in_config_mode() {
        let sim = sim();
        assert_eq!(sim.ui_mode(), UiMode::Config);
        assert_eq!(sim.phase(), BattlePhase::Placement);
        assert_eq!(sim.message(), MSG_CONFIG);
        assert_eq!(sim.name(), "tactics");
        assert_eq!(sim.squad(UnitFaction::Enemy).units().len(), ENEMY_SQUAD_SIZE);
        assert!(sim.squad(UnitFaction::Enemy).all_units_placed());
    }

    #[test]
    fn test_config_edits_and_apply() {
        let mut sim = sim();
        let revision = sim.level_revision();
        sim.handle_key(Key::Right);
        sim.handle_key(Key::Up);
        sim.handle_key(Key::Period);
        sim.handle_key(Key::BracketRight);
        assert_eq!(sim.editing_settings().width(), 27);
        assert_eq!(sim.editing_settings().height(), 21);
        assert_eq!(sim.editing_settings().tile_size(), 50);
        // Not applied yet
        assert_eq!(sim.level().columns(), 25);

        sim.handle_key(Key::Enter);
        assert_eq!(sim.level().columns(), 27);
        assert_eq!(sim.level().rows(), 21);
        assert_eq!(sim.level().tile_size(), 50);
        assert_eq!(sim.level_revision(), revision + 1);
        assert_eq!(sim.ui_mode(), UiMode::PartyMenu);
        assert_eq!(sim.message(), MSG_PARTY);
    }

    #[test]
    fn test_seed_input() {
        let mut sim = sim();
        sim.handle_key(Key::Minus);
        sim.handle_key(Key::Digit(4));
        sim.handle_key(Key::Minus);
        sim.handle_key(Key::Digit(2));
        sim.handle_key(Key::Digit(9));
        assert_eq!(sim.seed_input(), "-429");
        sim.handle_key(Key::Backspace);
        assert_eq!(sim.seed_input(), "-42");

        sim.handle_key(Key::Enter);
        assert_eq!(sim.current_settings().seed(), -42);
        assert!(sim.current_settings().lock_seed());
        assert_eq!(sim.seed_input(), "");
    }

    #[test]
    fn test_seed_lock_and_random_seed() {
        let mut sim = sim();
        sim.handle_key(Key::Digit(1));
        sim.handle_key(Key::Letter('n'));
        assert_eq!(sim.seed_input(), "");
        assert!(!sim.editing_settings().lock_seed());
        sim.handle_key(Key::Letter('l'));
        assert!(sim.editing_settings().lock_seed());
        sim.handle_key(Key::Digit(5));
        sim.handle_key(Key::Delete);
        assert_eq!(sim.seed_input(), "");
    }

    #[test]
    fn test_config_cancel_opens_roster() {
        let mut sim = sim();
        sim.handle_key(Key::Right);
        sim.handle_key(Key::Tab);
        assert_eq!(sim.ui_mode(), UiMode::PartyMenu);
        assert_eq!(sim.level().columns(), 25);
        sim.handle_key(Key::Escape);
        assert_eq!(sim.ui_mode(), UiMode::WeaponMenu);
        assert!(!sim.quit_requested());
    }

    #[test]
    fn test_escape_quits_outside_menus() {
        let mut sim = sim();
        sim.handle_key(Key::Escape);
        assert!(sim.quit_requested());
    }

    #[test]
    fn test_loadouts_assigned_in_order() {
        let mut sim = sim();
        sim.handle_key(Key::Enter);
        sim.handle_key(Key::Enter);
        assert_eq!(sim.loadout_target().map(|u| u.id()), Some("player-1"));
        assert!(sim.message().starts_with("Weapon menu (assigning Player 1)"));

        sim.handle_key(Key::Down);
        sim.handle_key(Key::Enter);
        assert_eq!(
            sim.squad(UnitFaction::Player).units()[0].weapon().id,
            "enemy-pistol"
        );
        assert!(sim.has_assigned_loadout("player-1"));
        assert_eq!(sim.loadout_target().map(|u| u.id()), Some("player-2"));

        for _ in 1..PLAYER_SQUAD_SIZE {
            sim.handle_key(Key::Enter);
        }
        assert_eq!(sim.ui_mode(), UiMode::Playing);
        assert_eq!(sim.message(), "Equipped [Pulse Pistol] for Player 4.");
        assert!(sim.shows_briefing());
        assert_eq!(
            sim.loadout_summary(),
            "Loadout for Player 1: [S] - Pulse Pistol  DMG 6 / DEF 3 (V to change)"
        );
    }

    #[test]
    fn test_weapon_menu_cannot_be_skipped() {
        let mut sim = sim();
        sim.handle_key(Key::Enter);
        sim.handle_key(Key::Enter);
        sim.handle_key(Key::Escape);
        assert_eq!(sim.ui_mode(), UiMode::WeaponMenu);
    }

    #[test]
    fn test_briefing_then_placement() {
        let mut sim = sim();
        through_menus(&mut sim);

        sim.handle_key(Key::Space);
        assert!(!sim.banner_visible());
        assert_eq!(sim.message(), "Place 4 units on blue tiles.");

        // Cursor starts on the first spawn tile
        let first = sim.level().player_spawn_tiles()[0];
        assert_eq!(sim.cursor().position(), first);
        sim.handle_key(Key::Enter);
        assert_eq!(sim.message(), "Unit deployed. 3 remaining.");

        sim.handle_key(Key::Enter);
        assert_eq!(sim.message(), MSG_BAD_SPAWN);
    }

    #[test]
    fn test_full_deployment_enters_active_phase() {
        let mut sim = sim();
        through_menus(&mut sim);
        sim.handle_key(Key::Enter);

        let spawns = sim.level().player_spawn_tiles().to_vec();
        for spawn in spawns {
            sim.cursor.move_to(spawn);
            sim.handle_key(Key::Enter);
        }
        assert_eq!(sim.phase(), BattlePhase::Active);
        assert_eq!(sim.selected_unit().map(|u| u.id()), Some("player-1"));
        assert_eq!(sim.message(), "Selected Player 1 - press Q/E to cycle units.");
        assert!(sim.movement_preview().is_some());

        sim.handle_key(Key::Letter('e'));
        assert_eq!(sim.selected_unit().map(|u| u.id()), Some("player-2"));
        sim.handle_key(Key::Letter('q'));
        sim.handle_key(Key::Letter('q'));
        assert_eq!(sim.selected_unit().map(|u| u.id()), Some("player-4"));
    }

    #[test]
    fn test_out_of_range_move_is_rejected() {
        let mut sim = sim();
        through_menus(&mut sim);
        sim.handle_key(Key::Enter);
        for spawn in sim.level().player_spawn_tiles().to_vec() {
            sim.cursor.move_to(spawn);
            sim.handle_key(Key::Enter);
        }
        assert!(sim.focus_tile(sim.level().exit()));
        sim.handle_key(Key::Enter);
        assert_eq!(sim.message(), "Cannot move there — tile not in range.");
    }

    #[test]
    fn test_restart_keeps_arena() {
        let mut sim = sim();
        through_menus(&mut sim);
        let rows = sim.level().to_rows();
        let revision = sim.level_revision();
        sim.handle_key(Key::Enter);
        sim.handle_key(Key::Enter);

        sim.handle_key(Key::Letter('r'));
        assert_eq!(sim.level().to_rows(), rows);
        assert_eq!(sim.level_revision(), revision);
        assert_eq!(sim.ui_mode(), UiMode::PartyMenu);
        assert!(!sim.squad(UnitFaction::Player).units()[0].is_placed());
    }

    #[test]
    fn test_focus_tile_ignored_in_menus() {
        let mut sim = sim();
        let before = sim.cursor().position();
        assert!(!sim.focus_tile(GridPosition::new(3, 3)));
        assert_eq!(sim.cursor().position(), before);
    }
}
