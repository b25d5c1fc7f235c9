//! Build-time information
//!
//! Metadata captured by the build script: timestamp, cargo target, compiler
//! and, when the crate is built from a git checkout, the commit it came from.

/// Build timestamp (when the binary was compiled)
pub const BUILD_TIMESTAMP: &str = env!("VERGEN_BUILD_TIMESTAMP");

/// Cargo optimization level (0, 1, 2, 3, s, z)
pub const CARGO_OPT_LEVEL: &str = env!("VERGEN_CARGO_OPT_LEVEL");

/// Target triple (e.g., x86_64-unknown-linux-gnu, x86_64-apple-darwin)
pub const CARGO_TARGET_TRIPLE: &str = env!("VERGEN_CARGO_TARGET_TRIPLE");

/// Rust compiler version (e.g., 1.75.0)
pub const RUSTC_SEMVER: &str = env!("VERGEN_RUSTC_SEMVER");

/// Rust channel (stable, beta, or nightly)
pub const RUSTC_CHANNEL: &str = env!("VERGEN_RUSTC_CHANNEL");

const UNKNOWN: &str = "unknown";

/// Full commit SHA, or "unknown" outside a git checkout
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => UNKNOWN,
};

pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => UNKNOWN,
};

pub const GIT_COMMIT_TIMESTAMP: &str = match option_env!("VERGEN_GIT_COMMIT_TIMESTAMP") {
    Some(ts) => ts,
    None => UNKNOWN,
};

const GIT_DIRTY: &str = match option_env!("VERGEN_GIT_DIRTY") {
    Some(dirty) => dirty,
    None => "false",
};

/// First seven characters of the commit SHA
pub fn git_sha_short() -> &'static str {
    GIT_SHA.get(..7).unwrap_or(GIT_SHA)
}

/// Whether the working tree had uncommitted changes at build time
pub fn is_git_dirty() -> bool {
    GIT_DIRTY == "true"
}

/// Returns a formatted build version string
///
/// Format: `{package_version}+{sha}-{target_triple}-opt{opt_level}`
/// Example: `0.1.0+3f2a1bc-x86_64-unknown-linux-gnu-opt0`
pub fn version_string() -> String {
    let dirty = if is_git_dirty() { "-dirty" } else { "" };
    format!(
        "{}+{}{}-{}-opt{}",
        env!("CARGO_PKG_VERSION"),
        git_sha_short(),
        dirty,
        CARGO_TARGET_TRIPLE,
        CARGO_OPT_LEVEL
    )
}

/// Returns a detailed build info string
///
/// Includes build timestamp, git revision, target, optimization level, and
/// compiler version
pub fn detailed_info() -> String {
    format!(
        "Built: {}\nCommit: {} ({}) {}\nTarget: {}\nOptimization: {}\nRustc: {} ({})",
        BUILD_TIMESTAMP,
        git_sha_short(),
        GIT_BRANCH,
        GIT_COMMIT_TIMESTAMP,
        CARGO_TARGET_TRIPLE,
        CARGO_OPT_LEVEL,
        RUSTC_SEMVER,
        RUSTC_CHANNEL
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string_mentions_target() {
        let version = version_string();
        assert!(version.starts_with(env!("CARGO_PKG_VERSION")));
        assert!(version.contains(CARGO_TARGET_TRIPLE));
        assert!(version.ends_with(&format!("-opt{}", CARGO_OPT_LEVEL)));
    }

    #[test]
    fn test_short_sha_is_bounded() {
        assert!(git_sha_short().len() <= 7);
        assert!(detailed_info().contains(git_sha_short()));
    }
}
