//! Check trait, statuses and the per-line findings collector

use std::time::Duration;

use colored::Colorize;

/// Outcome of a check, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckStatus {
    Pass,
    /// Usable, but something looks off (e.g. an unknown target platform)
    Warn,
    Fail,
}

impl CheckStatus {
    /// Pass or Warn
    pub fn is_ok(&self) -> bool {
        !self.is_fail()
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, CheckStatus::Fail)
    }

    pub fn label(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Warn => "WARN",
            CheckStatus::Fail => "FAIL",
        }
    }

    /// Marker used at the start of detail lines
    pub fn symbol(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "✓",
            CheckStatus::Warn => "⚠",
            CheckStatus::Fail => "✗",
        }
    }

    /// Process exit code for a suite whose worst outcome is `self`
    pub fn exit_code(&self) -> i32 {
        match self {
            CheckStatus::Pass => 0,
            CheckStatus::Fail => 1,
            CheckStatus::Warn => 2,
        }
    }

    pub fn as_colored_str(&self) -> String {
        let label = self.label();
        match self {
            CheckStatus::Pass => label.green().to_string(),
            CheckStatus::Warn => label.yellow().to_string(),
            CheckStatus::Fail => label.red().to_string(),
        }
    }
}

/// Result of a single check
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub status: CheckStatus,
    /// One-line summary shown in the report table
    pub message: String,
    /// Multi-line breakdown printed below the table
    pub details: Option<String>,
    /// Filled in by the runner
    pub duration: Duration,
}

impl CheckResult {
    pub fn new(status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
            duration: Duration::ZERO,
        }
    }

    pub fn pass(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Pass, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Warn, message)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Fail, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Collects status-marked detail lines for checks that probe many cases
///
/// Profiles, seeds and similar sweeps record one line each; the check's
/// status is the worst status recorded.
#[derive(Debug, Default)]
pub struct Findings {
    lines: Vec<(CheckStatus, String)>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pass(&mut self, line: impl Into<String>) {
        self.lines.push((CheckStatus::Pass, line.into()));
    }

    pub fn warn(&mut self, line: impl Into<String>) {
        self.lines.push((CheckStatus::Warn, line.into()));
    }

    pub fn fail(&mut self, line: impl Into<String>) {
        self.lines.push((CheckStatus::Fail, line.into()));
    }

    /// Worst recorded status; `Pass` when nothing was recorded
    pub fn status(&self) -> CheckStatus {
        self.lines
            .iter()
            .map(|(status, _)| *status)
            .max()
            .unwrap_or(CheckStatus::Pass)
    }

    pub fn count(&self, status: CheckStatus) -> usize {
        self.lines.iter().filter(|(s, _)| *s == status).count()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Builds the result, picking the summary that matches the worst status
    pub fn finish(
        self,
        pass: impl Into<String>,
        warn: impl Into<String>,
        fail: impl Into<String>,
    ) -> CheckResult {
        let status = self.status();
        let message = match status {
            CheckStatus::Pass => pass.into(),
            CheckStatus::Warn => warn.into(),
            CheckStatus::Fail => fail.into(),
        };
        let details = self
            .lines
            .iter()
            .map(|(status, line)| format!("  {} {}", status.symbol(), line))
            .collect::<Vec<_>>()
            .join("\n");
        CheckResult::new(status, message).with_details(details)
    }
}

/// A startup diagnostic run by `--check`
pub trait SystemCheck {
    /// Row label in the report
    fn name(&self) -> &'static str;

    fn check(&self) -> CheckResult;

    fn description(&self) -> Option<&'static str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_order_and_exit_codes() {
        assert!(CheckStatus::Pass < CheckStatus::Warn);
        assert!(CheckStatus::Warn < CheckStatus::Fail);
        assert_eq!(CheckStatus::Warn.exit_code(), 2);
        assert_eq!(CheckStatus::Fail.exit_code(), 1);
        assert!(CheckStatus::Warn.is_ok());
    }

    #[test]
    fn test_findings_take_worst_status() {
        let mut findings = Findings::new();
        findings.pass("seed 1: fine");
        findings.warn("seed 2: odd");
        assert_eq!(findings.status(), CheckStatus::Warn);
        findings.fail("seed 3: broken");
        assert_eq!(findings.count(CheckStatus::Fail), 1);

        let result = findings.finish("ok", "meh", "bad");
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.message, "bad");
        let details = result.details.unwrap();
        assert!(details.starts_with("  ✓ seed 1: fine"));
        assert!(details.ends_with("  ✗ seed 3: broken"));
    }

    #[test]
    fn test_empty_findings_pass() {
        let findings = Findings::new();
        assert!(findings.is_empty());
        assert_eq!(findings.finish("ok", "meh", "bad").status, CheckStatus::Pass);
    }
}
