use colored::Colorize;
use mimir_core::mimir_precompile::{EcMulReport, TrialRecord};

/// A one-line verdict on a scenario.
pub(crate) fn verdict<E: std::fmt::Display>(name: &str, outcome: &Result<(), E>) -> String {
    match outcome {
        Ok(()) => format!("{} {}", "PASS".green().bold(), name),
        Err(e) => format!("{} {}: {}", "FAIL".red().bold(), name, e),
    }
}

/// The closing summary of a run.
pub(crate) fn summary(passed: usize, total: usize) -> String {
    let counts = format!("{passed}/{total} passed");
    if passed == total {
        counts.green().bold().to_string()
    } else {
        counts.red().bold().to_string()
    }
}

/// The verdict on one EC multiplication trial, named by the seed that replays it.
pub(crate) fn ec_mul_failure(record: &TrialRecord) -> String {
    let trial = &record.trial;
    let name = format!("trial {} ({}, seed {})", trial.index, trial.case, trial.seed);
    verdict(&name, &record.outcome)
}

/// The closing summary of a differential EC multiplication run.
pub(crate) fn ec_mul_summary(report: &EcMulReport) -> String {
    format!(
        "{} ({} trials executed, seed {})",
        summary(report.passed(), report.planned),
        report.executed(),
        report.seed
    )
}
