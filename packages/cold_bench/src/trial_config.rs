use std::str::FromStr;

use cache_wipe::CacheLevel;
use itertools::Itertools;

/// Whether the measured call executes inside the timed window.
///
/// Trials with [`Workload::Skip`] time an empty window and serve as the baseline: their mean
/// is subtracted from the mean of the matching [`Workload::Run`] trials to isolate the cost of
/// the measured call from timer overhead.
#[derive(
    Clone, Copy, Debug, Default, derive_more::Display, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
#[non_exhaustive]
pub enum Workload {
    /// Execute the measured call. This is the default.
    #[default]
    #[display("run")]
    Run,

    /// Do not execute the measured call; only time the empty window.
    #[display("skip")]
    Skip,
}

impl Workload {
    /// Both workload toggles, measured call first.
    pub const ALL: [Self; 2] = [Self::Run, Self::Skip];
}

impl FromStr for Workload {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "run" | "1" => Ok(Self::Run),
            "skip" | "0" => Ok(Self::Skip),
            _ => Err(format!(
                "invalid workload toggle: '{s}'. Valid options are: run, skip"
            )),
        }
    }
}

/// One combination of parameters under which a trial is executed.
///
/// Displayed as `cache/workload`, e.g. `L1/run`, which is also the parameter part of the
/// Criterion benchmark ID.
#[derive(
    Clone, Copy, Debug, Default, derive_more::Display, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
#[display("{cache_level}/{workload}")]
pub struct TrialConfig {
    cache_level: CacheLevel,
    workload: Workload,
}

impl TrialConfig {
    /// Creates a trial configuration.
    #[must_use]
    pub fn new(cache_level: CacheLevel, workload: Workload) -> Self {
        Self {
            cache_level,
            workload,
        }
    }

    /// How deep to evict the caches before each iteration.
    #[must_use]
    pub fn cache_level(&self) -> CacheLevel {
        self.cache_level
    }

    /// Whether the measured call executes.
    #[must_use]
    pub fn workload(&self) -> Workload {
        self.workload
    }

    /// The same configuration with the opposite workload toggle.
    #[must_use]
    pub fn baseline_partner(&self) -> Self {
        let workload = match self.workload {
            Workload::Run => Workload::Skip,
            Workload::Skip => Workload::Run,
        };

        Self { workload, ..*self }
    }
}

/// The set of trial configurations an operation is executed under.
///
/// Built as the product of a set of cache levels and a set of workload toggles.
///
/// # Examples
///
/// ```
/// use cache_wipe::CacheLevel;
/// use cold_bench::{ParameterSet, Workload};
///
/// let parameters = ParameterSet::new([CacheLevel::None, CacheLevel::L1], Workload::ALL);
///
/// assert_eq!(parameters.len(), 4);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParameterSet {
    configs: Vec<TrialConfig>,
}

impl ParameterSet {
    /// Creates the product of the given cache levels and workload toggles, skipping duplicates.
    #[must_use]
    pub fn new(
        cache_levels: impl IntoIterator<Item = CacheLevel>,
        workloads: impl IntoIterator<Item = Workload, IntoIter: Clone>,
    ) -> Self {
        let configs = cache_levels
            .into_iter()
            .cartesian_product(workloads)
            .map(|(cache_level, workload)| TrialConfig::new(cache_level, workload))
            .unique()
            .collect();

        Self { configs }
    }

    /// Every cache level, each with and without the measured call.
    #[must_use]
    pub fn all() -> Self {
        Self::new(CacheLevel::ALL, Workload::ALL)
    }

    /// A single configuration.
    #[must_use]
    pub fn single(config: TrialConfig) -> Self {
        Self {
            configs: vec![config],
        }
    }

    /// The configurations in the set, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = TrialConfig> {
        self.configs.iter().copied()
    }

    /// The number of configurations in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Whether the set has no configurations at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

/// Warm cache, with and without the measured call.
impl Default for ParameterSet {
    fn default() -> Self {
        Self::new([CacheLevel::None], Workload::ALL)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn display_combines_level_and_workload() {
        assert_eq!(
            TrialConfig::new(CacheLevel::L1L2, Workload::Skip).to_string(),
            "L1+L2/skip"
        );
        assert_eq!(TrialConfig::default().to_string(), "none/run");
    }

    #[test]
    fn baseline_partner_flips_workload() {
        let config = TrialConfig::new(CacheLevel::L1, Workload::Run);
        let partner = config.baseline_partner();

        assert_eq!(partner.cache_level(), CacheLevel::L1);
        assert_eq!(partner.workload(), Workload::Skip);
        assert_eq!(partner.baseline_partner(), config);
    }

    #[test]
    fn workload_parses() {
        assert_eq!("RUN".parse::<Workload>(), Ok(Workload::Run));
        assert_eq!("0".parse::<Workload>(), Ok(Workload::Skip));
        assert!("maybe".parse::<Workload>().is_err());
    }

    #[test]
    fn default_parameters_are_warm_run_and_skip() {
        let configs = ParameterSet::default().iter().collect::<Vec<_>>();

        assert_eq!(
            configs,
            vec![
                TrialConfig::new(CacheLevel::None, Workload::Run),
                TrialConfig::new(CacheLevel::None, Workload::Skip),
            ]
        );
    }

    #[test]
    fn all_parameters_cover_every_combination() {
        let parameters = ParameterSet::all();

        assert_eq!(parameters.len(), 8);

        for level in CacheLevel::ALL {
            for workload in Workload::ALL {
                assert!(parameters.iter().any(|c| c == TrialConfig::new(level, workload)));
            }
        }
    }

    #[test]
    fn duplicates_are_removed() {
        let parameters = ParameterSet::new(
            [CacheLevel::L1, CacheLevel::L1],
            [Workload::Run, Workload::Run],
        );

        assert_eq!(parameters.len(), 1);
    }

    #[test]
    fn empty_inputs_give_empty_set() {
        let parameters = ParameterSet::new(Vec::<CacheLevel>::new(), Workload::ALL);

        assert!(parameters.is_empty());
    }
}
