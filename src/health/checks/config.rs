//! Configuration system health check

use crate::app::AppConfig;
use crate::health::check::{CheckResult, Findings, SystemCheck};

/// Checks that configuration can be loaded for all profiles
pub struct ConfigCheck {
    profiles: Vec<&'static str>,
}

impl ConfigCheck {
    /// Creates a new config check with default profiles
    pub fn new() -> Self {
        Self {
            profiles: vec!["debug", "release"],
        }
    }

    /// Creates a config check with custom profiles
    pub fn with_profiles(profiles: Vec<&'static str>) -> Self {
        Self { profiles }
    }
}

impl Default for ConfigCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for ConfigCheck {
    fn name(&self) -> &'static str {
        "Configuration"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates window and arena configuration from files and environment")
    }

    fn check(&self) -> CheckResult {
        let mut findings = Findings::new();

        // Test loading each profile
        for profile in &self.profiles {
            match AppConfig::load(profile) {
                Ok(config) => {
                    let level = &config.level;
                    findings.pass(format!(
                        "Profile '{}': window {}x{}, arena {}x{} @ {} px, hazard {:.2}, seed {}",
                        profile,
                        config.window.width,
                        config.window.height,
                        level.width,
                        level.height,
                        level.tile_size,
                        level.hazard_density,
                        level
                            .seed
                            .map_or_else(|| "random".to_string(), |s| s.to_string())
                    ));
                }
                Err(e) => {
                    findings.fail(format!("Profile '{}': failed to load - {}", profile, e));
                }
            }
        }

        // Test loading from environment
        match AppConfig::load_from_env() {
            Ok(config) => {
                findings.pass(format!(
                    "Environment config: profile '{}' loaded",
                    config.profile
                ));
            }
            Err(e) => {
                findings.warn(format!("Environment config: {}", e));
            }
        }

        findings.finish(
            format!("{} profiles validated", self.profiles.len()),
            "Config loaded with warnings",
            "Failed to load one or more config profiles",
        )
    }
}
