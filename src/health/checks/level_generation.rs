//! Arena generation health check

use crate::health::check::{CheckResult, CheckStatus, Findings, SystemCheck};
use crate::sim::generator::LevelGenerator;
use crate::sim::LevelSettings;

/// Seeds covering both signs and the extremes of the seed range
const DEFAULT_SEEDS: [i64; 6] = [0, 1, 1337, -42, i64::MIN, i64::MAX];

/// Generates arenas across several seeds and validates their invariants
///
/// Every arena must have odd dimensions, an exit reachable from the start
/// and every spawn tile reachable as well.
pub struct LevelGenerationCheck {
    settings: LevelSettings,
    seeds: Vec<i64>,
}

impl LevelGenerationCheck {
    pub fn new() -> Self {
        Self {
            settings: LevelSettings::new(25, 19, 48, 0.3, 0, true),
            seeds: DEFAULT_SEEDS.to_vec(),
        }
    }

    /// Checks arenas built from `settings` with each of `seeds`
    pub fn with_seeds(settings: LevelSettings, seeds: Vec<i64>) -> Self {
        Self { settings, seeds }
    }

    fn check_seed(&self, seed: i64) -> Result<String, String> {
        let settings = self.settings.with_seed(seed);
        let level = LevelGenerator::from_settings(&settings)
            .and_then(|generator| generator.generate())
            .map_err(|e| format!("seed {}: {}", seed, e))?;

        if level.columns() % 2 == 0 || level.rows() % 2 == 0 {
            return Err(format!(
                "seed {}: even dimensions {}x{}",
                seed,
                level.columns(),
                level.rows()
            ));
        }

        let reachable = level.reachable_from(level.start());
        if !reachable.contains(&level.exit()) {
            return Err(format!("seed {}: exit unreachable from start", seed));
        }
        let cut_off = level
            .player_spawn_tiles()
            .iter()
            .chain(level.enemy_spawn_tiles())
            .filter(|spawn| !reachable.contains(spawn))
            .count();
        if cut_off > 0 {
            return Err(format!("seed {}: {} spawn tiles unreachable", seed, cut_off));
        }

        Ok(format!(
            "seed {}: {}x{}, {} reachable tiles",
            seed,
            level.columns(),
            level.rows(),
            reachable.len()
        ))
    }
}

impl Default for LevelGenerationCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for LevelGenerationCheck {
    fn name(&self) -> &'static str {
        "Level Generation"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates arena generation, connectivity and spawn zones")
    }

    fn check(&self) -> CheckResult {
        if self.seeds.is_empty() {
            return CheckResult::warn("No seeds to check");
        }

        let mut findings = Findings::new();
        for &seed in &self.seeds {
            match self.check_seed(seed) {
                Ok(line) => findings.pass(line),
                Err(line) => findings.fail(line),
            }
        }

        let total = findings.len();
        let failures = findings.count(CheckStatus::Fail);
        findings.finish(
            format!("{} arenas generated", total),
            format!("{} arenas generated", total),
            format!("{} of {} arenas invalid", failures, total),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::CheckStatus;

    #[test]
    fn test_default_seeds_pass() {
        let result = LevelGenerationCheck::new().check();
        assert_eq!(result.status, CheckStatus::Pass, "{:?}", result.details);
    }

    #[test]
    fn test_no_seeds_warns() {
        let settings = LevelSettings::new(11, 9, 32, 0.1, 0, true);
        let result = LevelGenerationCheck::with_seeds(settings, Vec::new()).check();
        assert_eq!(result.status, CheckStatus::Warn);
    }
}
