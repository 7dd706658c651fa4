use std::time::Duration;

/// The samples collected by executing a trial, one elapsed duration per iteration.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use cold_bench::SampleSet;
///
/// let samples = SampleSet::from_durations([10, 20, 60].map(Duration::from_nanos));
///
/// assert_eq!(samples.mean(), Duration::from_nanos(30));
/// assert_eq!(samples.median(), Some(Duration::from_nanos(20)));
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[must_use = "the samples are the whole point of executing a trial"]
pub struct SampleSet {
    samples: Vec<Duration>,
}

impl SampleSet {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, sample: Duration) {
        self.samples.push(sample);
    }

    /// Creates a sample set from previously collected durations.
    pub fn from_durations(samples: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }

    /// The number of samples, equal to the number of iterations executed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether there are no samples at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The samples, in the order the iterations were executed.
    pub fn iter(&self) -> impl Iterator<Item = Duration> {
        self.samples.iter().copied()
    }

    /// The samples as floating point seconds, in the order the iterations were executed.
    pub fn seconds(&self) -> impl Iterator<Item = f64> {
        self.iter().map(|sample| sample.as_secs_f64())
    }

    /// The sum of all samples.
    ///
    /// This is what gets reported to Criterion when the trial is timed manually.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.iter().fold(Duration::ZERO, Duration::saturating_add)
    }

    /// The arithmetic mean of the samples, or zero if there are none.
    #[must_use]
    pub fn mean(&self) -> Duration {
        let Some(count) = u128::try_from(self.len()).ok().filter(|count| *count > 0) else {
            return Duration::ZERO;
        };

        let total_nanos = self
            .iter()
            .fold(0_u128, |acc, sample| acc.saturating_add(sample.as_nanos()));

        Duration::from_nanos(
            total_nanos
                .checked_div(count)
                .expect("count is checked to be non-zero above")
                .try_into()
                .expect("a mean that overflows u64 nanoseconds is unrealistic with a real clock"),
        )
    }

    /// The shortest sample.
    #[must_use]
    pub fn min(&self) -> Option<Duration> {
        self.iter().min()
    }

    /// The longest sample.
    #[must_use]
    pub fn max(&self) -> Option<Duration> {
        self.iter().max()
    }

    /// The middle sample. With an even number of samples, the mean of the two middle samples.
    #[must_use]
    pub fn median(&self) -> Option<Duration> {
        let mut sorted = self.samples.clone();
        sorted.sort_unstable();

        let middle = sorted.len().checked_div(2)?;
        let upper = *sorted.get(middle)?;

        if sorted.len() % 2 == 1 {
            return Some(upper);
        }

        let lower = *sorted.get(middle.checked_sub(1)?)?;

        lower.saturating_add(upper).checked_div(2)
    }
}

/// Pairs the samples of a trial that executed the measured call with the samples of the same
/// trial that skipped it, to isolate the cost of the call from the overhead of timing it.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use cold_bench::{BaselineComparison, SampleSet};
///
/// let run = SampleSet::from_durations([Duration::from_nanos(50); 4]);
/// let skip = SampleSet::from_durations([Duration::from_nanos(20); 4]);
///
/// let comparison = BaselineComparison::new(&run, &skip);
/// assert_eq!(comparison.net(), Duration::from_nanos(30));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BaselineComparison {
    run_mean: Duration,
    skip_mean: Duration,
}

impl BaselineComparison {
    /// Compares the samples collected with the measured call to those collected without it.
    #[must_use]
    pub fn new(run: &SampleSet, skip: &SampleSet) -> Self {
        Self {
            run_mean: run.mean(),
            skip_mean: skip.mean(),
        }
    }

    /// Mean duration of the iterations that executed the measured call.
    #[must_use]
    pub fn run_mean(&self) -> Duration {
        self.run_mean
    }

    /// Mean duration of the iterations that skipped the measured call.
    #[must_use]
    pub fn skip_mean(&self) -> Duration {
        self.skip_mean
    }

    /// The estimated cost of the measured call itself, clamped at zero.
    #[must_use]
    pub fn net(&self) -> Duration {
        self.run_mean.saturating_sub(self.skip_mean)
    }

    /// Whether the measured call took measurably longer than the empty window.
    #[must_use]
    pub fn is_distinguishable(&self) -> bool {
        self.run_mean > self.skip_mean
    }
}
