//! Table and summary output for `--check`

use colored::Colorize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};

use super::check::CheckStatus;
use super::runner::HealthCheckReport;

/// Report table followed by the summary block
pub fn format_report(report: &HealthCheckReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Check", "Status", "Duration", "Message"]);
    for (name, result) in &report.results {
        builder.push_record([
            name.clone(),
            result.status.as_colored_str(),
            format!("{:.2?}", result.duration),
            result.message.clone(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    format!("{}\n{}", table, format_summary(report))
}

fn format_summary(report: &HealthCheckReport) -> String {
    let mut lines = vec![
        format!("\n{}", "Summary".bold().underline()),
        format!("  Total checks: {}", report.total),
        format!("  {} Passed: {}", CheckStatus::Pass.symbol().green(), report.passed),
    ];
    if report.warned > 0 {
        lines.push(format!(
            "  {} Warned: {}",
            CheckStatus::Warn.symbol().yellow(),
            report.warned
        ));
    }
    if report.failed > 0 {
        lines.push(format!(
            "  {} Failed: {}",
            CheckStatus::Fail.symbol().red(),
            report.failed
        ));
    }

    let overall = match report.overall_status() {
        CheckStatus::Pass => "Overall: HEALTHY".green().bold(),
        CheckStatus::Warn => "Overall: HEALTHY (with warnings)".yellow().bold(),
        CheckStatus::Fail => "Overall: UNHEALTHY".red().bold(),
    };
    lines.push(String::new());
    lines.push(format!("  {} (exit code {})", overall, report.exit_code()));
    lines.join("\n") + "\n"
}

/// Detail blocks; passing checks are listed only when `verbose`
pub fn format_details(report: &HealthCheckReport, verbose: bool) -> String {
    report
        .results
        .iter()
        .filter(|(_, result)| verbose || result.status != CheckStatus::Pass)
        .filter_map(|(name, result)| {
            result
                .details
                .as_ref()
                .map(|details| format!("\n{} Details:\n{}", name.bold(), details))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prints the table, the summary and the relevant detail blocks
pub fn print_report(report: &HealthCheckReport, verbose: bool) {
    println!("{}", format_report(report));
    let details = format_details(report, verbose);
    if !details.is_empty() {
        println!("{}", details);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::check::{CheckResult, SystemCheck};
    use crate::health::runner::HealthCheckRunner;

    struct Canned(&'static str, CheckStatus);

    impl SystemCheck for Canned {
        fn name(&self) -> &'static str {
            self.0
        }

        fn check(&self) -> CheckResult {
            CheckResult::new(self.1, "canned").with_details(format!("  {} line", self.0))
        }
    }

    fn report() -> HealthCheckReport {
        HealthCheckRunner::new()
            .add_check(Canned("Configuration", CheckStatus::Pass))
            .add_check(Canned("Level Generation", CheckStatus::Fail))
            .run()
    }

    #[test]
    fn test_summary_names_exit_code() {
        colored::control::set_override(false);
        let text = format_report(&report());
        assert!(text.contains("Level Generation"));
        assert!(text.contains("Overall: UNHEALTHY (exit code 1)"));
    }

    #[test]
    fn test_details_skip_passing_checks_unless_verbose() {
        colored::control::set_override(false);
        let report = report();
        let quiet = format_details(&report, false);
        assert!(quiet.contains("Level Generation line"));
        assert!(!quiet.contains("Configuration line"));
        assert!(format_details(&report, true).contains("Configuration line"));
    }
}
