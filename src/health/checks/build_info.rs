//! Build information health check

use crate::build_info;
use crate::health::check::{CheckResult, SystemCheck};

/// Host families the game has a renderer backend for
const SUPPORTED_OS: [&str; 3] = ["linux", "windows", "darwin"];

/// Checks that build metadata is present and the target is supported
///
/// The target triple stands in for a native platform probe: a build for an
/// OS without a wgpu backend passes with a warning.
pub struct BuildInfoCheck;

impl BuildInfoCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BuildInfoCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// Platform label for a target triple, e.g. `linux-x86_64`
pub fn platform_label(triple: &str) -> Option<String> {
    let mut parts = triple.split('-');
    let arch = parts.next().filter(|a| !a.is_empty())?;
    let os = parts.find(|p| SUPPORTED_OS.contains(p))?;
    let os = if os == "darwin" { "macos" } else { os };
    Some(format!("{}-{}", os, arch))
}

impl SystemCheck for BuildInfoCheck {
    fn name(&self) -> &'static str {
        "Build Info"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates build metadata and target platform")
    }

    fn check(&self) -> CheckResult {
        let mut details = vec![
            format!("  Version: {}", build_info::version_string()),
            format!(
                "  Git: {}@{} (dirty: {})",
                build_info::GIT_BRANCH,
                build_info::git_sha_short(),
                build_info::is_git_dirty()
            ),
            format!("  Build time: {}", build_info::BUILD_TIMESTAMP),
            format!(
                "  Rustc: {} ({})",
                build_info::RUSTC_SEMVER,
                build_info::RUSTC_CHANNEL
            ),
            format!("  Opt level: {}", build_info::CARGO_OPT_LEVEL),
        ];

        match platform_label(build_info::CARGO_TARGET_TRIPLE) {
            Some(platform) => {
                details.push(format!(
                    "  Target: {} ({})",
                    build_info::CARGO_TARGET_TRIPLE,
                    platform
                ));
                CheckResult::pass(format!("Built for {}", platform)).with_details(details.join("\n"))
            }
            None => {
                details.push(format!(
                    "  Target: {} (unrecognised platform)",
                    build_info::CARGO_TARGET_TRIPLE
                ));
                CheckResult::warn("Unrecognised target platform").with_details(details.join("\n"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_labels() {
        assert_eq!(
            platform_label("x86_64-unknown-linux-gnu").as_deref(),
            Some("linux-x86_64")
        );
        assert_eq!(
            platform_label("aarch64-apple-darwin").as_deref(),
            Some("macos-aarch64")
        );
        assert_eq!(
            platform_label("x86_64-pc-windows-msvc").as_deref(),
            Some("windows-x86_64")
        );
        assert_eq!(platform_label("wasm32-unknown-unknown"), None);
        assert_eq!(platform_label(""), None);
    }
}
