//! Runs a suite of checks and tallies the outcome

use std::time::Instant;

use tracing::{debug, warn};

use super::check::{CheckResult, CheckStatus, SystemCheck};

/// Outcome of a suite run, in registration order
#[derive(Debug)]
pub struct HealthCheckReport {
    /// `(check name, result)` pairs
    pub results: Vec<(String, CheckResult)>,
    pub total: usize,
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
}

impl HealthCheckReport {
    fn from_results(results: Vec<(String, CheckResult)>) -> Self {
        let count = |status: CheckStatus| {
            results
                .iter()
                .filter(|(_, result)| result.status == status)
                .count()
        };
        Self {
            total: results.len(),
            passed: count(CheckStatus::Pass),
            warned: count(CheckStatus::Warn),
            failed: count(CheckStatus::Fail),
            results,
        }
    }

    /// No check failed
    pub fn is_healthy(&self) -> bool {
        self.failed == 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warned > 0
    }

    /// Worst status across all checks; an empty suite passes
    pub fn overall_status(&self) -> CheckStatus {
        self.results
            .iter()
            .map(|(_, result)| result.status)
            .max()
            .unwrap_or(CheckStatus::Pass)
    }

    /// 0 = all pass, 1 = any fail, 2 = warnings only
    pub fn exit_code(&self) -> i32 {
        self.overall_status().exit_code()
    }

    /// Result of the check registered under `name`
    pub fn result(&self, name: &str) -> Option<&CheckResult> {
        self.results
            .iter()
            .find(|(check, _)| check == name)
            .map(|(_, result)| result)
    }
}

/// Builder-style suite of checks
#[derive(Default)]
pub struct HealthCheckRunner {
    checks: Vec<Box<dyn SystemCheck>>,
}

impl HealthCheckRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_check<C: SystemCheck + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Runs every check in order, timing each one
    pub fn run(self) -> HealthCheckReport {
        let results = self
            .checks
            .into_iter()
            .map(|check| {
                let start = Instant::now();
                let result = check.check().with_duration(start.elapsed());
                let name = check.name().to_string();
                match result.status {
                    CheckStatus::Pass => {
                        debug!(check = %name, duration = ?result.duration, "Check passed")
                    }
                    status => warn!(
                        check = %name,
                        status = status.label(),
                        message = %result.message,
                        "Check reported problems"
                    ),
                }
                (name, result)
            })
            .collect();

        HealthCheckReport::from_results(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str, CheckStatus);

    impl SystemCheck for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn check(&self) -> CheckResult {
            CheckResult::new(self.1, "fixed")
        }
    }

    #[test]
    fn test_tallies_and_exit_code() {
        let report = HealthCheckRunner::new()
            .add_check(Fixed("a", CheckStatus::Pass))
            .add_check(Fixed("b", CheckStatus::Warn))
            .run();
        assert_eq!((report.total, report.passed, report.warned), (2, 1, 1));
        assert_eq!(report.overall_status(), CheckStatus::Warn);
        assert_eq!(report.exit_code(), 2);

        let report = HealthCheckRunner::new()
            .add_check(Fixed("a", CheckStatus::Warn))
            .add_check(Fixed("b", CheckStatus::Fail))
            .run();
        assert!(!report.is_healthy());
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_empty_suite_is_healthy() {
        let report = HealthCheckRunner::new().run();
        assert_eq!(report.total, 0);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_lookup_by_name() {
        let report = HealthCheckRunner::new()
            .add_check(Fixed("Level Generation", CheckStatus::Fail))
            .run();
        assert_eq!(
            report.result("Level Generation").map(|r| r.status),
            Some(CheckStatus::Fail)
        );
        assert!(report.result("Missing").is_none());
    }
}
