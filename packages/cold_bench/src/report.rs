use std::fmt;
use std::time::Duration;

use cache_wipe::CacheLevel;

use crate::{BaselineComparison, SampleSet, TrialConfig, Workload};

/// The samples collected for one operation under one trial configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Measurement {
    config: TrialConfig,
    samples: SampleSet,
}

impl Measurement {
    pub(crate) fn new(config: TrialConfig, samples: SampleSet) -> Self {
        Self { config, samples }
    }

    /// The configuration the samples were collected under.
    #[must_use]
    pub fn config(&self) -> TrialConfig {
        self.config
    }

    /// One sample per iteration.
    #[must_use]
    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }
}

/// Everything measured for one operation of a suite.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperationReport {
    name: String,
    measurements: Vec<Measurement>,
}

impl OperationReport {
    pub(crate) fn new(name: String, measurements: Vec<Measurement>) -> Self {
        Self { name, measurements }
    }

    /// The name the operation was registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The measurements, in the order the configurations were executed.
    #[must_use]
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// The samples collected under a specific configuration, if it was executed.
    #[must_use]
    pub fn samples(&self, config: TrialConfig) -> Option<&SampleSet> {
        self.measurements
            .iter()
            .find(|measurement| measurement.config == config)
            .map(Measurement::samples)
    }

    /// Baseline comparisons for every cache level that was executed both with and without
    /// the measured call.
    pub fn comparisons(&self) -> impl Iterator<Item = (CacheLevel, BaselineComparison)> {
        self.measurements
            .iter()
            .filter(|measurement| measurement.config.workload() == Workload::Run)
            .filter_map(|run| {
                let skip = self.samples(run.config.baseline_partner())?;

                Some((
                    run.config.cache_level(),
                    BaselineComparison::new(&run.samples, skip),
                ))
            })
    }
}

/// The result of executing a [`Suite`](crate::Suite).
///
/// The `Display` implementation renders a plain-text table of per-configuration statistics,
/// followed by the baseline-subtracted cost of each operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SuiteReport {
    name: String,
    iterations: u64,
    operations: Vec<OperationReport>,
}

impl SuiteReport {
    pub(crate) fn new(name: String, iterations: u64, operations: Vec<OperationReport>) -> Self {
        Self {
            name,
            iterations,
            operations,
        }
    }

    /// The name of the suite.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How many iterations each configuration was executed for.
    #[must_use]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// The operations that were executed, in registration order.
    #[must_use]
    pub fn operations(&self) -> &[OperationReport] {
        &self.operations
    }

    /// The report of a specific operation, if it was executed.
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&OperationReport> {
        self.operations
            .iter()
            .find(|operation| operation.name == name)
    }
}

impl fmt::Display for SuiteReport {
    #[cfg_attr(test, mutants::skip)] // Layout details are not worth testing exhaustively.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({} iterations per configuration)",
            self.name, self.iterations
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<32} {:<18} {:>12} {:>12} {:>12} {:>12}",
            "operation", "configuration", "mean", "median", "min", "max"
        )?;

        for operation in &self.operations {
            for measurement in &operation.measurements {
                let samples = &measurement.samples;

                writeln!(
                    f,
                    "{:<32} {:<18} {:>12} {:>12} {:>12} {:>12}",
                    operation.name,
                    measurement.config.to_string(),
                    duration(Some(samples.mean())),
                    duration(samples.median()),
                    duration(samples.min()),
                    duration(samples.max()),
                )?;
            }
        }

        let mut comparisons = self
            .operations
            .iter()
            .flat_map(|operation| {
                operation
                    .comparisons()
                    .map(move |(level, comparison)| (operation.name.as_str(), level, comparison))
            })
            .peekable();

        if comparisons.peek().is_none() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(
            f,
            "{:<32} {:<18} {:>12} {:>12} {:>12}",
            "operation", "cache", "run", "skip", "net"
        )?;

        for (name, level, comparison) in comparisons {
            writeln!(
                f,
                "{:<32} {:<18} {:>12} {:>12} {:>12}",
                name,
                level.to_string(),
                duration(Some(comparison.run_mean())),
                duration(Some(comparison.skip_mean())),
                duration(Some(comparison.net())),
            )?;
        }

        Ok(())
    }
}

fn duration(value: Option<Duration>) -> String {
    value.map_or_else(|| "-".to_string(), |value| format!("{value:.1?}"))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn samples(nanos: u64) -> SampleSet {
        SampleSet::from_durations([Duration::from_nanos(nanos); 4])
    }

    fn report() -> SuiteReport {
        SuiteReport::new(
            "overheads".to_string(),
            4,
            vec![
                OperationReport::new(
                    "dim".to_string(),
                    vec![
                        Measurement::new(
                            TrialConfig::new(CacheLevel::None, Workload::Run),
                            samples(30),
                        ),
                        Measurement::new(
                            TrialConfig::new(CacheLevel::None, Workload::Skip),
                            samples(20),
                        ),
                        Measurement::new(
                            TrialConfig::new(CacheLevel::L1, Workload::Run),
                            samples(90),
                        ),
                    ],
                ),
                OperationReport::new(
                    "numel".to_string(),
                    vec![Measurement::new(
                        TrialConfig::new(CacheLevel::None, Workload::Skip),
                        samples(15),
                    )],
                ),
            ],
        )
    }

    #[test]
    fn comparisons_require_both_workloads() {
        let report = report();

        let dim = report.operation("dim").unwrap();
        let comparisons = dim.comparisons().collect::<Vec<_>>();

        assert_eq!(comparisons.len(), 1);
        let (level, comparison) = comparisons.first().unwrap();
        assert_eq!(*level, CacheLevel::None);
        assert_eq!(comparison.net(), Duration::from_nanos(10));

        let numel = report.operation("numel").unwrap();
        assert_eq!(numel.comparisons().count(), 0);
    }

    #[test]
    fn samples_by_config() {
        let report = report();
        let dim = report.operation("dim").unwrap();

        assert_eq!(
            dim.samples(TrialConfig::new(CacheLevel::L1, Workload::Run))
                .map(SampleSet::mean),
            Some(Duration::from_nanos(90))
        );
        assert!(
            dim.samples(TrialConfig::new(CacheLevel::L1, Workload::Skip))
                .is_none()
        );
        assert!(report.operation("sizes").is_none());
    }

    #[test]
    fn display_lists_every_measurement() {
        let rendered = report().to_string();

        assert!(rendered.starts_with("overheads (4 iterations per configuration)"));
        assert!(rendered.contains("none/run"));
        assert!(rendered.contains("none/skip"));
        assert!(rendered.contains("L1/run"));
        assert!(rendered.contains("numel"));
        assert!(rendered.contains("net"));
    }

    #[test]
    fn display_omits_comparisons_without_baseline() {
        let report = SuiteReport::new(
            "warm".to_string(),
            4,
            vec![OperationReport::new(
                "dim".to_string(),
                vec![Measurement::new(TrialConfig::default(), samples(30))],
            )],
        );

        assert!(!report.to_string().contains("net"));
    }
}
