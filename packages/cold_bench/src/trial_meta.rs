use crate::TrialConfig;

/// Informs a trial callback about the iteration it is preparing.
///
/// # Examples
///
/// ```
/// use cache_wipe::CacheWiper;
/// use cold_bench::{Trial, TrialConfig};
///
/// let mut trial = Trial::new()
///     .setup(|meta| vec![0_u8; usize::try_from(meta.iteration()).unwrap()])
///     .measure(|operand| operand.len());
///
/// let samples = trial.execute(&mut CacheWiper::default(), TrialConfig::default(), 3);
/// assert_eq!(samples.len(), 3);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TrialMeta {
    config: TrialConfig,

    /// Zero-based index of the current iteration.
    iteration: u64,

    /// How many iterations the run consists of.
    iterations: u64,
}

impl TrialMeta {
    pub(crate) fn new(config: TrialConfig, iteration: u64, iterations: u64) -> Self {
        Self {
            config,
            iteration,
            iterations,
        }
    }

    /// The configuration the trial is executed under.
    #[must_use]
    pub fn config(&self) -> TrialConfig {
        self.config
    }

    /// Zero-based index of the current iteration.
    #[must_use]
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// How many iterations the run consists of.
    #[must_use]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}
