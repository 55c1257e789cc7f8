//! Update inhibitor evaluation.
//!
//! Every configured check runs, in a fixed order, even after an earlier
//! one has failed: the full list of reasons is what gets shown to the
//! user and written to the log.
//!
//! A probe that cannot read system state fails its check closed, with a
//! reason starting `Unable to determine`.

use crate::config::{CheckSettings, Config};
use crate::inhibitors::probe::SystemProbe;
use crate::shell::Executor;
use std::path::Path;

/// Outcome of one inhibitor evaluation.
///
/// `passed` is derived from `failures`, so the two can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InhibitorResult {
    failures: Vec<String>,
}

impl InhibitorResult {
    /// Build a result from collected failure reasons.
    pub fn from_failures(failures: Vec<String>) -> Self {
        Self { failures }
    }

    /// Whether every check passed.
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failure reasons, in check order.
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Consume the result, returning the failure reasons.
    pub fn into_failures(self) -> Vec<String> {
        self.failures
    }
}

/// Evaluates the configured inhibitor checks against live state.
pub struct InhibitorEvaluator<'a> {
    probe: &'a dyn SystemProbe,
    executor: &'a dyn Executor,
}

impl<'a> InhibitorEvaluator<'a> {
    /// Create an evaluator over the given probe and script executor.
    pub fn new(probe: &'a dyn SystemProbe, executor: &'a dyn Executor) -> Self {
        Self { probe, executor }
    }

    /// Run every enabled check and collect the failures.
    pub fn evaluate(&self, config: &Config) -> InhibitorResult {
        let checks = &config.checks;
        let mut failures = Vec::new();

        failures.extend(self.check_network(checks));
        failures.extend(self.check_battery(checks));
        failures.extend(self.check_cpu(checks));
        failures.extend(self.check_memory(checks));
        for script in &checks.scripts {
            failures.extend(self.check_script(script));
        }

        for reason in &failures {
            tracing::info!("Update check failed: {}", reason);
        }

        InhibitorResult::from_failures(failures)
    }

    fn check_network(&self, checks: &CheckSettings) -> Option<String> {
        if !checks.network_not_metered {
            return None;
        }
        match self.probe.network_metered() {
            Ok(true) => Some("Network is metered".to_string()),
            Ok(false) => None,
            Err(e) => Some(format!("Unable to determine network metering: {}", e)),
        }
    }

    fn check_battery(&self, checks: &CheckSettings) -> Option<String> {
        let min = checks.min_battery_percent?;
        match self.probe.battery() {
            Ok(Some(battery)) if !battery.power_plugged && battery.percent < min => Some(
                format!(
                    "Battery is below {}% ({}%)",
                    format_percent(min),
                    format_percent(battery.percent)
                ),
            ),
            Ok(_) => None,
            Err(e) => Some(format!("Unable to determine battery status: {}", e)),
        }
    }

    fn check_cpu(&self, checks: &CheckSettings) -> Option<String> {
        let max = checks.max_cpu_load_percent?;
        match self.probe.cpu_load_percent() {
            Ok(load) if load > max => Some(format!(
                "CPU load is above {}% ({}%)",
                format_percent(max),
                format_percent(load)
            )),
            Ok(_) => None,
            Err(e) => Some(format!("Unable to determine CPU load: {}", e)),
        }
    }

    fn check_memory(&self, checks: &CheckSettings) -> Option<String> {
        let max = checks.max_mem_percent?;
        match self.probe.memory_used_percent() {
            Ok(used) if used > max => Some(format!(
                "Memory usage is above {}% ({}%)",
                format_percent(max),
                format_percent(used)
            )),
            Ok(_) => None,
            Err(e) => Some(format!("Unable to determine memory usage: {}", e)),
        }
    }

    fn check_script(&self, script: &Path) -> Option<String> {
        tracing::debug!("Running check script: {}", script.display());
        match self.executor.execute(script) {
            Ok(result) if result.success => None,
            Ok(result) => {
                let output = result.stdout.trim();
                if output.is_empty() {
                    Some(format!("Check script {} failed", script.display()))
                } else {
                    Some(output.to_string())
                }
            }
            Err(e) => Some(format!(
                "Unable to run check script {}: {}",
                script.display(),
                e
            )),
        }
    }
}

/// Render a percentage with at most one decimal place.
fn format_percent(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockExecutor, MockProbe};
    use std::path::PathBuf;

    fn all_thresholds() -> Config {
        let mut config = Config::default();
        config.checks.network_not_metered = true;
        config.checks.min_battery_percent = Some(20.0);
        config.checks.max_cpu_load_percent = Some(50.0);
        config.checks.max_mem_percent = Some(90.0);
        config
    }

    #[test]
    fn all_checks_disabled_passes() {
        let probe = MockProbe::new()
            .cpu_load(100.0)
            .memory_used(100.0)
            .metered()
            .on_battery(1.0);
        let executor = MockExecutor::new();

        let result = InhibitorEvaluator::new(&probe, &executor).evaluate(&Config::default());

        assert!(result.passed());
        assert!(result.failures().is_empty());
        assert_eq!(probe.reads(), 0);
        assert!(executor.calls().is_empty());
    }

    #[test]
    fn only_battery_violated() {
        let probe = MockProbe::new().on_battery(15.0);
        let executor = MockExecutor::new();

        let result = InhibitorEvaluator::new(&probe, &executor).evaluate(&all_thresholds());

        assert!(!result.passed());
        assert_eq!(result.failures(), ["Battery is below 20% (15%)"]);
    }

    #[test]
    fn battery_ignored_when_plugged_in() {
        let probe = MockProbe::new().plugged_in(5.0);
        let executor = MockExecutor::new();

        let result = InhibitorEvaluator::new(&probe, &executor).evaluate(&all_thresholds());
        assert!(result.passed());
    }

    #[test]
    fn no_battery_passes_battery_check() {
        let probe = MockProbe::new();
        let executor = MockExecutor::new();

        let result = InhibitorEvaluator::new(&probe, &executor).evaluate(&all_thresholds());
        assert!(result.passed());
    }

    #[test]
    fn only_cpu_violated() {
        let probe = MockProbe::new().cpu_load(75.5);
        let executor = MockExecutor::new();

        let result = InhibitorEvaluator::new(&probe, &executor).evaluate(&all_thresholds());
        assert_eq!(result.failures(), ["CPU load is above 50% (75.5%)"]);
    }

    #[test]
    fn only_memory_violated() {
        let probe = MockProbe::new().memory_used(95.0);
        let executor = MockExecutor::new();

        let result = InhibitorEvaluator::new(&probe, &executor).evaluate(&all_thresholds());
        assert_eq!(result.failures(), ["Memory usage is above 90% (95%)"]);
    }

    #[test]
    fn metered_network_only_fails_when_required() {
        let probe = MockProbe::new().metered();
        let executor = MockExecutor::new();
        let evaluator = InhibitorEvaluator::new(&probe, &executor);

        let mut config = Config::default();
        assert!(evaluator.evaluate(&config).passed());

        config.checks.network_not_metered = true;
        assert_eq!(evaluator.evaluate(&config).failures(), ["Network is metered"]);
    }

    #[test]
    fn violating_one_check_leaves_others_alone() {
        let executor = MockExecutor::new();
        let config = all_thresholds();

        let cpu_only = MockProbe::new().cpu_load(99.0);
        let cpu_and_mem = MockProbe::new().cpu_load(99.0).memory_used(99.0);

        let a = InhibitorEvaluator::new(&cpu_only, &executor).evaluate(&config);
        let b = InhibitorEvaluator::new(&cpu_and_mem, &executor).evaluate(&config);

        assert_eq!(a.failures(), ["CPU load is above 50% (99%)"]);
        assert_eq!(b.failures()[0], a.failures()[0]);
        assert_eq!(b.failures().len(), 2);
    }

    #[test]
    fn failures_accumulate_in_check_order() {
        let probe = MockProbe::new()
            .cpu_load(99.0)
            .memory_used(99.0)
            .metered()
            .on_battery(10.0);
        let executor = MockExecutor::new().exits("/checks/gpu", 1, "GPU job running\n");
        let mut config = all_thresholds();
        config.checks.scripts = vec![PathBuf::from("/checks/gpu")];

        let result = InhibitorEvaluator::new(&probe, &executor).evaluate(&config);

        assert_eq!(
            result.failures(),
            [
                "Network is metered",
                "Battery is below 20% (10%)",
                "CPU load is above 50% (99%)",
                "Memory usage is above 90% (99%)",
                "GPU job running",
            ]
        );
    }

    #[test]
    fn check_scripts_all_run_after_failure() {
        let probe = MockProbe::new();
        let executor = MockExecutor::new()
            .exits("/checks/a", 2, "")
            .exits("/checks/b", 0, "fine");
        let mut config = Config::default();
        config.checks.scripts = vec![PathBuf::from("/checks/a"), PathBuf::from("/checks/b")];

        let result = InhibitorEvaluator::new(&probe, &executor).evaluate(&config);

        assert_eq!(result.failures(), ["Check script /checks/a failed"]);
        assert_eq!(
            executor.calls(),
            vec![PathBuf::from("/checks/a"), PathBuf::from("/checks/b")]
        );
    }

    #[test]
    fn unrunnable_check_script_fails() {
        let probe = MockProbe::new();
        let executor = MockExecutor::new();
        let mut config = Config::default();
        config.checks.scripts = vec![PathBuf::from("/checks/missing")];

        let result = InhibitorEvaluator::new(&probe, &executor).evaluate(&config);

        assert_eq!(result.failures().len(), 1);
        assert!(result.failures()[0].starts_with("Unable to run check script /checks/missing"));
    }

    #[test]
    fn probe_errors_fail_closed() {
        let probe = MockProbe::new().broken();
        let executor = MockExecutor::new();

        let result = InhibitorEvaluator::new(&probe, &executor).evaluate(&all_thresholds());

        assert_eq!(result.failures().len(), 4);
        assert!(result.failures()[0].starts_with("Unable to determine network metering"));
        assert!(result.failures()[1].starts_with("Unable to determine battery status"));
        assert!(result.failures()[2].starts_with("Unable to determine CPU load"));
        assert!(result.failures()[3].starts_with("Unable to determine memory usage"));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let probe = MockProbe::new().cpu_load(80.0).on_battery(15.0);
        let executor = MockExecutor::new().exits("/checks/ok", 0, "");
        let mut config = all_thresholds();
        config.checks.scripts = vec![PathBuf::from("/checks/ok")];

        let evaluator = InhibitorEvaluator::new(&probe, &executor);
        assert_eq!(evaluator.evaluate(&config), evaluator.evaluate(&config));
    }

    #[test]
    fn thresholds_are_strict() {
        let probe = MockProbe::new()
            .cpu_load(50.0)
            .memory_used(90.0)
            .on_battery(20.0);
        let executor = MockExecutor::new();

        let result = InhibitorEvaluator::new(&probe, &executor).evaluate(&all_thresholds());
        assert!(result.passed());
    }

    #[test]
    fn passed_matches_empty_failures() {
        assert!(InhibitorResult::from_failures(Vec::new()).passed());
        let failed = InhibitorResult::from_failures(vec!["x".to_string()]);
        assert!(!failed.passed());
        assert_eq!(failed.into_failures(), vec!["x".to_string()]);
    }

    #[test]
    fn format_percent_trims_whole_numbers() {
        assert_eq!(format_percent(20.0), "20");
        assert_eq!(format_percent(75.56), "75.6");
        assert_eq!(format_percent(33.333), "33.3");
    }
}
