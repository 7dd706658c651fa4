#![cfg(any(test, feature = "criterion"))]

use std::time::Duration;

use criterion::measurement::WallTime;
use criterion::{BenchmarkGroup, BenchmarkId};

use crate::pal::TimeSourceFacade;
use crate::{ConfiguredTrial, Evict, TrialConfig};

impl<Operand, Output> ConfiguredTrial<'_, Operand, Output> {
    /// Executes the trial one or more times as part of a Criterion benchmark group,
    /// recording the result with Criterion.
    ///
    /// The number of iterations is determined by Criterion. Only the timed windows are reported
    /// to Criterion, so setup, cache eviction and teardown do not count toward the result.
    /// Individual samples are not kept, so memory use does not grow with the iteration count.
    ///
    /// # Panics
    ///
    /// Panics if the wipe buffer or the operand cannot be allocated.
    pub fn execute_criterion<E: Evict>(
        &mut self,
        group: &mut BenchmarkGroup<'_, WallTime>,
        evictor: &mut E,
        config: TrialConfig,
        id: BenchmarkId,
    ) {
        group.bench_function(id, |b| {
            b.iter_custom(|iters| {
                self.total_with_clock(evictor, &mut TimeSourceFacade::real(), config, iters)
            });
        });
    }

    /// Executes the iterations and returns the sum of the timed windows.
    pub(crate) fn total_with_clock<E: Evict>(
        &mut self,
        evictor: &mut E,
        clock: &mut TimeSourceFacade,
        config: TrialConfig,
        iterations: u64,
    ) -> Duration {
        let mut total = Duration::ZERO;

        self.run_with_clock(evictor, clock, config, iterations, |sample| {
            total = total.saturating_add(sample);
        });

        total
    }
}
