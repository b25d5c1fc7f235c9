//! egui overlays drawn over the board image
//!
//! The HUD bar is always visible. At most one panel sits on top of it: the
//! config overlay, party roster, weapon loadout menu or the deployment
//! briefing, depending on the current [`UiMode`].

use egui::{Align2, Color32, Context, Frame, Id, Margin, Pos2, Rect, RichText, Stroke, Ui};

use super::geometry::HUD_HEIGHT;
use crate::sim::tactics::{BRIEFING_HINT, OBJECTIVE_TEXT};
use crate::sim::{TacticsSimulation, UiMode, UnitFaction};

const SEED_PLACEHOLDER: &str = "<type digits / '-' to override>";

/// Converts a `0..=1` RGB triple into an opaque egui colour
fn rgb(r: f32, g: f32, b: f32) -> Color32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgb(channel(r), channel(g), channel(b))
}

/// Draws the HUD and whichever panel the simulation currently shows
///
/// `board_rect` is where the board texture is displayed on screen and
/// `scale` is its display size over its native size.
pub fn show(ctx: &Context, board_rect: Rect, scale: f32, tactics: &TacticsSimulation) {
    hud_bar(ctx, board_rect, scale, tactics);

    match tactics.ui_mode() {
        UiMode::Config => config_overlay(ctx, board_rect, tactics),
        UiMode::PartyMenu => party_menu(ctx, board_rect, tactics),
        UiMode::WeaponMenu => weapon_menu(ctx, board_rect, tactics),
        UiMode::Playing if tactics.shows_briefing() => briefing_banner(ctx, board_rect),
        UiMode::Playing => {}
    }
}

// ============================================================================
// TEXT
// ============================================================================

/// Lines of the HUD bar, top to bottom
pub fn hud_lines(tactics: &TacticsSimulation) -> Vec<String> {
    let mut lines = if tactics.shows_briefing() {
        vec![BRIEFING_HINT.to_string()]
    } else {
        vec![OBJECTIVE_TEXT.to_string(), tactics.message().to_string()]
    };
    lines.push(tactics.loadout_summary());
    lines
}

/// Label/value rows of the config overlay
pub fn config_rows(tactics: &TacticsSimulation) -> Vec<(&'static str, String)> {
    let settings = tactics.editing_settings();
    let seed_mode = if settings.lock_seed() {
        "locked"
    } else {
        "auto-refresh"
    };
    let seed_input = if tactics.seed_input().is_empty() {
        SEED_PLACEHOLDER.to_string()
    } else {
        tactics.seed_input().to_string()
    };

    vec![
        ("Width (Left/Right)", format!("{} tiles", settings.width())),
        ("Height (Up/Down)", format!("{} tiles", settings.height())),
        ("Tile size (,/.)", format!("{} px", settings.tile_size())),
        (
            "Hazard ([/])",
            format!("{}%", (settings.hazard_density() * 100.0).round() as i32),
        ),
        ("Seed value", format!("{} ({})", settings.seed(), seed_mode)),
        ("Seed input", seed_input),
    ]
}

/// One line per player unit for the party roster
pub fn roster_rows(tactics: &TacticsSimulation) -> Vec<String> {
    tactics
        .squad(UnitFaction::Player)
        .units()
        .iter()
        .map(|unit| {
            format!(
                "{}   HP {}/{}   SP {}/{}   Weapon {}",
                unit.display_name(),
                unit.hp(),
                unit.max_hp(),
                unit.sp(),
                unit.max_sp(),
                unit.weapon().roster_label()
            )
        })
        .collect()
}

/// Which unit the weapon menu equips, as shown in its header
pub fn assignment_line(tactics: &TacticsSimulation) -> String {
    match tactics.loadout_target() {
        Some(unit) => format!("Assigning to {} - press Enter to equip.", unit.display_name()),
        None => "No weapon assigned yet — pick a unit before choosing a loadout.".to_string(),
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Centred panel inside the board, `top_fraction` of its height down
///
/// Horizontal room is `board width - margin`, capped at `max_width`.
pub fn panel_rect(
    board_rect: Rect,
    max_width: f32,
    margin: f32,
    top_fraction: f32,
    min_top: f32,
) -> Rect {
    let width = (board_rect.width() - margin).min(max_width).max(0.0);
    let left = board_rect.left() + (board_rect.width() - width) / 2.0;
    let top = board_rect.top() + (board_rect.height() * top_fraction).max(min_top);
    Rect::from_min_size(Pos2::new(left, top), egui::vec2(width, 0.0))
}

fn panel(ctx: &Context, id: &str, rect: Rect, outline: Color32, add_contents: impl FnOnce(&mut Ui)) {
    egui::Area::new(Id::new(id))
        .fixed_pos(rect.min)
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            Frame::new()
                .fill(Color32::from_black_alpha(209))
                .stroke(Stroke::new(1.0, outline))
                .inner_margin(Margin::symmetric(28, 20))
                .show(ui, |ui| {
                    ui.set_width((rect.width() - 56.0).max(0.0));
                    add_contents(ui);
                });
        });
}

// ============================================================================
// OVERLAYS
// ============================================================================

fn hud_bar(ctx: &Context, board_rect: Rect, scale: f32, tactics: &TacticsSimulation) {
    let height = HUD_HEIGHT * scale;
    let bar = Rect::from_min_size(board_rect.min, egui::vec2(board_rect.width(), height));
    ctx.layer_painter(egui::LayerId::new(egui::Order::Middle, Id::new("hud_bar")))
        .rect_filled(bar, 0.0, Color32::from_black_alpha(166));

    let lines = hud_lines(tactics);
    let colors = if tactics.shows_briefing() {
        vec![rgb(0.95, 0.88, 0.72), rgb(0.82, 0.92, 0.98)]
    } else {
        vec![Color32::WHITE, rgb(0.85, 0.95, 1.0), rgb(0.82, 0.92, 0.98)]
    };

    egui::Area::new(Id::new("hud_text"))
        .fixed_pos(board_rect.min + egui::vec2(12.0, 4.0))
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            ui.spacing_mut().item_spacing.y = 2.0;
            for (line, color) in lines.iter().zip(colors) {
                ui.label(RichText::new(line).color(color).size(13.0));
            }
        });
}

fn config_overlay(ctx: &Context, board_rect: Rect, tactics: &TacticsSimulation) {
    ctx.layer_painter(egui::LayerId::new(egui::Order::Middle, Id::new("config_shade")))
        .rect_filled(board_rect, 0.0, Color32::from_black_alpha(204));

    let rows = config_rows(tactics);
    egui::Area::new(Id::new("config_overlay"))
        .fixed_pos(board_rect.min + egui::vec2(24.0, 48.0))
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(
                RichText::new("CONFIG MODE - Enter to apply, Tab/M to cancel")
                    .color(rgb(1.0, 0.95, 0.75))
                    .strong(),
            );
            ui.add_space(12.0);

            egui::Grid::new("config_rows")
                .num_columns(2)
                .min_col_width(260.0)
                .spacing([0.0, 8.0])
                .show(ui, |ui| {
                    for (label, value) in &rows {
                        ui.label(RichText::new(format!("{}:", label)).color(rgb(0.84, 0.9, 1.0)));
                        ui.label(RichText::new(value).color(rgb(0.95, 0.95, 0.9)));
                        ui.end_row();
                    }
                });

            ui.add_space(10.0);
            ui.label(
                RichText::new("[N] random seed    [L] toggle lock").color(rgb(0.82, 0.88, 0.92)),
            );
            ui.label(
                RichText::new("Press R in-game to restart, Tab to reopen this menu anytime.")
                    .color(rgb(0.8, 0.8, 0.8)),
            );
        });
}

fn party_menu(ctx: &Context, board_rect: Rect, tactics: &TacticsSimulation) {
    let rect = panel_rect(board_rect, 620.0, 120.0, 0.18, 32.0);
    panel(ctx, "party_menu", rect, rgb(0.35, 0.9, 0.65), |ui| {
        ui.label(
            RichText::new("PARTY ROSTER")
                .color(rgb(0.9, 0.98, 0.86))
                .size(16.0)
                .strong(),
        );
        ui.label(
            RichText::new("Review squad stats before deployment. P/Tab closes, Enter continues.")
                .color(rgb(0.82, 0.9, 0.96)),
        );
        ui.add_space(8.0);

        for (i, row) in roster_rows(tactics).into_iter().enumerate() {
            let stripe = if i % 2 == 0 {
                Color32::from_rgba_unmultiplied(51, 166, 115, 51)
            } else {
                Color32::TRANSPARENT
            };
            Frame::new()
                .fill(stripe)
                .inner_margin(Margin::symmetric(4, 3))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(RichText::new(row).color(rgb(0.9, 0.95, 0.92)));
                });
        }
    });
}

fn weapon_menu(ctx: &Context, board_rect: Rect, tactics: &TacticsSimulation) {
    let rect = panel_rect(board_rect, 640.0, 120.0, 0.18, 32.0);
    let menu = tactics.weapon_menu();
    panel(ctx, "weapon_menu", rect, rgb(0.35, 0.75, 1.0), |ui| {
        ui.label(
            RichText::new("WEAPON LOADOUT")
                .color(rgb(0.95, 0.88, 0.72))
                .size(16.0)
                .strong(),
        );
        ui.label(
            RichText::new("Up/Down: move cursor    Enter: equip    V/Tab: close")
                .color(rgb(0.82, 0.9, 0.96)),
        );
        ui.label(RichText::new(assignment_line(tactics)).color(rgb(0.78, 0.88, 1.0)));
        ui.add_space(8.0);

        for (i, weapon) in menu.weapons().iter().enumerate() {
            let selected = i == menu.selected_index();
            let fill = if selected {
                Color32::from_rgba_unmultiplied(51, 140, 230, 64)
            } else {
                Color32::TRANSPARENT
            };
            Frame::new()
                .fill(fill)
                .inner_margin(Margin::symmetric(4, 3))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    let marker = if selected { ">" } else { " " };
                    let color = if selected {
                        rgb(0.98, 0.98, 1.0)
                    } else {
                        rgb(0.9, 0.9, 0.94)
                    };
                    ui.label(
                        RichText::new(format!("{} {}", marker, weapon.summary()))
                            .color(color)
                            .monospace(),
                    );
                    if !weapon.description.trim().is_empty() {
                        ui.label(
                            RichText::new(format!("  {}", weapon.description))
                                .color(rgb(0.6, 0.75, 0.92))
                                .size(11.0),
                        );
                    }
                });
        }

        ui.add_space(8.0);
        ui.label(
            RichText::new(format!("Equipped: {}", tactics.equipped_weapon().summary()))
                .color(rgb(0.88, 0.95, 0.98)),
        );
    });
}

fn briefing_banner(ctx: &Context, board_rect: Rect) {
    let rect = panel_rect(board_rect, 760.0, 80.0, 0.3, 0.0);
    panel(ctx, "briefing_banner", rect, Color32::TRANSPARENT, |ui| {
        ui.label(
            RichText::new("ISOMETRIC SRPG DEPLOYMENT")
                .color(rgb(0.95, 0.88, 0.72))
                .size(18.0)
                .strong(),
        );
        ui.add_space(6.0);
        ui.label(
            RichText::new(
                "Drag the cursor across luminous blue tiles and press Enter to drop each unit.",
            )
            .color(rgb(0.85, 0.9, 1.0)),
        );
        ui.label(
            RichText::new(
                "Four operatives must be placed before we can advance on the enemy squad.",
            )
            .color(rgb(0.82, 0.92, 0.88)),
        );
        ui.add_space(8.0);
        ui.label(RichText::new("Tips:").color(rgb(0.92, 0.6, 0.6)).strong());
        for tip in [
            "- WASD / Arrow keys shift the tactical cursor",
            "- Enter confirms placement on an unoccupied spawn tile",
        ] {
            ui.label(RichText::new(tip).color(rgb(0.9, 0.85, 1.0)));
        }
    });
}

/// Centre label shown while the tactics simulation is missing
pub fn show_unavailable(ctx: &Context, rect: Rect) {
    ctx.layer_painter(egui::LayerId::new(egui::Order::Foreground, Id::new("no_battle")))
        .text(
            rect.center(),
            Align2::CENTER_CENTER,
            "No battle loaded",
            egui::FontId::proportional(18.0),
            Color32::GRAY,
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Key, LevelSettings};

    fn session() -> TacticsSimulation {
        TacticsSimulation::new(LevelSettings::new(25, 19, 48, 0.08, 1337, true)).unwrap()
    }

    #[test]
    fn test_config_rows_show_editing_values() {
        let tactics = session();
        let rows = config_rows(&tactics);
        assert_eq!(rows[0], ("Width (Left/Right)", "25 tiles".to_string()));
        assert_eq!(rows[2], ("Tile size (,/.)", "48 px".to_string()));
        assert_eq!(rows[3].1, "8%");
        assert_eq!(rows[4].1, "1337 (locked)");
        assert_eq!(rows[5].1, SEED_PLACEHOLDER);
    }

    #[test]
    fn test_typed_seed_replaces_placeholder() {
        let mut tactics = session();
        tactics.handle_key(Key::Minus);
        tactics.handle_key(Key::Digit(4));
        assert_eq!(config_rows(&tactics)[5].1, "-4");
    }

    #[test]
    fn test_roster_lists_every_player_unit() {
        let tactics = session();
        let rows = roster_rows(&tactics);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.contains("HP ") && r.contains("Weapon [")));
    }

    #[test]
    fn test_hud_lines_end_with_loadout() {
        let tactics = session();
        let lines = hud_lines(&tactics);
        assert!(lines.last().is_some_and(|l| l.starts_with("Loadout")));
        if tactics.shows_briefing() {
            assert_eq!(lines[0], BRIEFING_HINT);
        } else {
            assert_eq!(lines[0], OBJECTIVE_TEXT);
        }
    }

    #[test]
    fn test_panel_is_centred_and_capped() {
        let board = Rect::from_min_size(Pos2::new(100.0, 0.0), egui::vec2(1000.0, 500.0));
        let rect = panel_rect(board, 620.0, 120.0, 0.18, 32.0);
        assert_eq!(rect.width(), 620.0);
        assert_eq!(rect.left(), 100.0 + 190.0);
        assert_eq!(rect.top(), 90.0);

        let narrow = Rect::from_min_size(Pos2::ZERO, egui::vec2(300.0, 100.0));
        let rect = panel_rect(narrow, 620.0, 120.0, 0.18, 32.0);
        assert_eq!(rect.width(), 180.0);
        assert_eq!(rect.top(), 32.0);
    }

    #[test]
    fn test_assignment_line_without_target() {
        let tactics = session();
        assert!(tactics.loadout_target().is_none());
        assert_eq!(
            assignment_line(&tactics),
            "No weapon assigned yet — pick a unit before choosing a loadout."
        );
    }
}
