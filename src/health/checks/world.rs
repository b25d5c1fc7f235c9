//! Game world/simulation health check

use crate::health::check::{CheckResult, SystemCheck};
use crate::sim::{Key, LevelSettings, TacticsSimulation, UiMode, World};

/// Checks that the world hosts and ticks a tactics session
pub struct WorldCheck {
    settings: LevelSettings,
}

impl WorldCheck {
    pub fn new() -> Self {
        Self {
            settings: LevelSettings::new(15, 11, 32, 0.08, 2024, true),
        }
    }
}

impl Default for WorldCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for WorldCheck {
    fn name(&self) -> &'static str {
        "World/Simulation"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates world ticking with the tactics session registered")
    }

    fn check(&self) -> CheckResult {
        let mut details = Vec::new();

        let mut world = World::new();
        match TacticsSimulation::new(self.settings) {
            Ok(tactics) => world.add_simulation(Box::new(tactics)),
            Err(e) => {
                return CheckResult::fail("Tactics session failed to start")
                    .with_details(format!("  ✗ {}", e));
            }
        }
        details.push("  ✓ World initialized with tactics session".to_string());

        if world.tick_count() != 0 || world.sim_time() != 0.0 {
            details.push("  ✗ Fresh world should start at tick 0".to_string());
            return CheckResult::fail("World initialization failed")
                .with_details(details.join("\n"));
        }

        // Test tick functionality
        world.tick(0.016); // ~60 FPS
        if world.tick_count() != 1 {
            details.push("  ✗ Tick count should increment".to_string());
            return CheckResult::fail("World tick failed").with_details(details.join("\n"));
        }
        details.push(format!("  ✓ After tick: count={}", world.tick_count()));

        // Test pause functionality
        world.pause();
        world.tick(0.016);
        if !world.is_paused() || world.tick_count() != 1 {
            details.push("  ✗ Paused world should not tick".to_string());
            return CheckResult::fail("World pause failed").with_details(details.join("\n"));
        }
        details.push("  ✓ Pause state: working".to_string());

        // Test time scale
        world.resume();
        world.set_time_scale(2.0);
        if world.time_scale() != 2.0 {
            details.push("  ✗ Time scale failed".to_string());
            return CheckResult::fail("World time scale failed").with_details(details.join("\n"));
        }
        details.push("  ✓ Time scale: working".to_string());

        // Applying the config screen hands the keyboard to the battle
        let Some(tactics) = world.tactics_mut() else {
            details.push("  ✗ Tactics session not found by name".to_string());
            return CheckResult::fail("Tactics lookup failed").with_details(details.join("\n"));
        };
        let revision = tactics.level_revision();
        tactics.handle_key(Key::Enter);
        if tactics.ui_mode() == UiMode::Config {
            details.push("  ✗ Enter should leave config mode".to_string());
            return CheckResult::fail("Config apply failed").with_details(details.join("\n"));
        }
        details.push(format!(
            "  ✓ Config applied: mode {:?}, arena revision {} -> {}",
            tactics.ui_mode(),
            revision,
            tactics.level_revision()
        ));

        CheckResult::pass("All world systems operational").with_details(details.join("\n"))
    }
}
