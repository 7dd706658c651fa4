#![allow(
    clippy::type_complexity,
    reason = "builder pattern uses complex function types for flexibility"
)]

use std::hint::black_box;
use std::time::Duration;

use crate::pal::{TimeSource, TimeSourceFacade};
use crate::{Evict, SampleSet, TrialConfig, TrialMeta, Workload};

/// A fully configured trial, ready to be executed.
#[derive(derive_more::Debug)]
#[must_use]
pub struct ConfiguredTrial<'a, Operand, Output> {
    #[debug(ignore)]
    setup_fn: Box<dyn FnMut(&TrialMeta) -> Operand + 'a>,

    #[debug(ignore)]
    measure_fn: Box<dyn FnMut(&mut Operand) -> Output + 'a>,
}

impl<'a, Operand, Output> ConfiguredTrial<'a, Operand, Output> {
    pub(crate) fn new(
        setup_fn: Box<dyn FnMut(&TrialMeta) -> Operand + 'a>,
        measure_fn: Box<dyn FnMut(&mut Operand) -> Output + 'a>,
    ) -> Self {
        Self {
            setup_fn,
            measure_fn,
        }
    }

    /// Executes the trial under one configuration for a specific number of iterations,
    /// returning one sample per iteration.
    ///
    /// The caches are evicted through `evictor` before every iteration unless the
    /// configuration selects [`CacheLevel::None`](cache_wipe::CacheLevel::None).
    ///
    /// If you are executing the trial in a Criterion context, you may find it more convenient
    /// to use [`execute_criterion()`][Self::execute_criterion].
    ///
    /// # Panics
    ///
    /// Panics if the wipe buffer or the operand cannot be allocated. There is no partial result.
    pub fn execute<E: Evict>(
        &mut self,
        evictor: &mut E,
        config: TrialConfig,
        iterations: u64,
    ) -> SampleSet {
        self.execute_with_clock(evictor, &mut TimeSourceFacade::real(), config, iterations)
    }

    pub(crate) fn execute_with_clock<E: Evict>(
        &mut self,
        evictor: &mut E,
        clock: &mut TimeSourceFacade,
        config: TrialConfig,
        iterations: u64,
    ) -> SampleSet {
        let capacity = usize::try_from(iterations)
            .expect("iteration count that exceeds virtual memory size is impossible to execute as samples would not fit in memory");

        let mut samples = SampleSet::with_capacity(capacity);

        self.run_with_clock(evictor, clock, config, iterations, |sample| {
            samples.push(sample);
        });

        samples
    }

    /// Executes the iterations, handing the elapsed time of every timed window to `record`
    /// before the wipe buffer is released.
    pub(crate) fn run_with_clock<E: Evict>(
        &mut self,
        evictor: &mut E,
        clock: &mut TimeSourceFacade,
        config: TrialConfig,
        iterations: u64,
        mut record: impl FnMut(Duration),
    ) {
        let cache_level = config.cache_level();

        for iteration in 0..iterations {
            let meta = TrialMeta::new(config, iteration, iterations);

            let mut operand = (self.setup_fn)(&meta);

            let guard = (!cache_level.is_none()).then(|| evictor.evict(cache_level));

            let start = clock.now();

            let output = match config.workload() {
                Workload::Run => Some(black_box((self.measure_fn)(black_box(&mut operand)))),
                Workload::Skip => None,
            };

            let stop = clock.now();

            record(stop.saturating_duration_since(start));

            if let Some(guard) = guard {
                evictor.release(guard);
            }

            drop(output);
            drop(operand);
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    use cache_wipe::CacheLevel;

    use super::*;
    use crate::Trial;
    use crate::pal::MockTimeSource;

    type Events = Arc<Mutex<Vec<&'static str>>>;

    fn record(events: &Events, event: &'static str) {
        events.lock().unwrap().push(event);
    }

    /// Every timestamp is 10 nanoseconds after the previous one.
    fn ticking_clock(events: &Events) -> TimeSourceFacade {
        let events = Arc::clone(events);
        let origin = Instant::now();
        let mut ticks = 0_u64;

        let mut mock = MockTimeSource::new();
        mock.expect_now().returning(move || {
            record(&events, "clock");
            ticks += 1;
            origin + Duration::from_nanos(ticks * 10)
        });

        TimeSourceFacade::from(mock)
    }

    #[derive(Debug)]
    struct RecordingEvictor {
        events: Events,
        levels: Vec<CacheLevel>,
    }

    impl RecordingEvictor {
        fn new(events: &Events) -> Self {
            Self {
                events: Arc::clone(events),
                levels: Vec::new(),
            }
        }
    }

    impl Evict for RecordingEvictor {
        type Guard = ();

        fn evict(&mut self, level: CacheLevel) {
            record(&self.events, "evict");
            self.levels.push(level);
        }

        fn release(&mut self, (): ()) {
            record(&self.events, "release");
        }
    }

    struct RecordingOperand {
        events: Events,
    }

    impl Drop for RecordingOperand {
        fn drop(&mut self) {
            record(&self.events, "drop operand");
        }
    }

    fn recording_trial(events: &Events) -> ConfiguredTrial<'static, RecordingOperand, ()> {
        let setup_events = Arc::clone(events);
        let measure_events = Arc::clone(events);

        Trial::new()
            .setup(move |_| {
                record(&setup_events, "setup");
                RecordingOperand {
                    events: Arc::clone(&setup_events),
                }
            })
            .measure(move |_| record(&measure_events, "measure"))
    }

    #[test]
    fn cold_run_phases_are_ordered() {
        let events = Events::default();
        let mut evictor = RecordingEvictor::new(&events);
        let mut clock = ticking_clock(&events);

        let samples = recording_trial(&events).execute_with_clock(
            &mut evictor,
            &mut clock,
            TrialConfig::new(CacheLevel::L1, Workload::Run),
            2,
        );

        let iteration = [
            "setup",
            "evict",
            "clock",
            "measure",
            "clock",
            "release",
            "drop operand",
        ];

        assert_eq!(*events.lock().unwrap(), [iteration, iteration].concat());
        assert_eq!(evictor.levels, [CacheLevel::L1, CacheLevel::L1]);
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn cold_skip_phases_are_ordered() {
        let events = Events::default();
        let mut evictor = RecordingEvictor::new(&events);
        let mut clock = ticking_clock(&events);

        let _samples = recording_trial(&events).execute_with_clock(
            &mut evictor,
            &mut clock,
            TrialConfig::new(CacheLevel::L1L2L3, Workload::Skip),
            1,
        );

        assert_eq!(
            *events.lock().unwrap(),
            ["setup", "evict", "clock", "clock", "release", "drop operand"]
        );
    }

    #[test]
    fn warm_cache_is_not_evicted() {
        let events = Events::default();
        let mut evictor = RecordingEvictor::new(&events);
        let mut clock = ticking_clock(&events);

        let _samples = recording_trial(&events).execute_with_clock(
            &mut evictor,
            &mut clock,
            TrialConfig::new(CacheLevel::None, Workload::Run),
            1,
        );

        assert!(evictor.levels.is_empty());
        assert_eq!(
            *events.lock().unwrap(),
            ["setup", "clock", "measure", "clock", "drop operand"]
        );
    }

    #[test]
    fn samples_are_elapsed_time_between_timestamps() {
        let events = Events::default();
        let mut evictor = RecordingEvictor::new(&events);
        let mut clock = ticking_clock(&events);

        let samples = recording_trial(&events).execute_with_clock(
            &mut evictor,
            &mut clock,
            TrialConfig::new(CacheLevel::L1, Workload::Run),
            5,
        );

        assert!(samples.iter().all(|sample| sample == Duration::from_nanos(10)));
        assert_eq!(samples.total(), Duration::from_nanos(50));
    }

    #[test]
    fn backwards_clock_gives_zero_sample() {
        let origin = Instant::now() + Duration::from_secs(1);
        let mut ticks = 0_u64;

        let mut mock = MockTimeSource::new();
        mock.expect_now().returning(move || {
            ticks += 1;
            origin - Duration::from_nanos(ticks)
        });

        let samples = Trial::new().measure(|()| ()).execute_with_clock(
            &mut RecordingEvictor::new(&Events::default()),
            &mut TimeSourceFacade::from(mock),
            TrialConfig::default(),
            3,
        );

        assert!(samples.iter().all(|sample| sample == Duration::ZERO));
    }

    #[test]
    fn run_calls_measure_once_per_iteration() {
        let calls = Rc::new(Cell::new(0_u64));

        let mut trial = Trial::new().measure({
            let calls = Rc::clone(&calls);
            move |()| calls.set(calls.get() + 1)
        });

        let samples = trial.execute(
            &mut RecordingEvictor::new(&Events::default()),
            TrialConfig::new(CacheLevel::L1, Workload::Run),
            1000,
        );

        assert_eq!(calls.get(), 1000);
        assert_eq!(samples.len(), 1000);
    }

    #[test]
    fn skip_never_calls_measure() {
        let calls = Rc::new(Cell::new(0_u64));

        let mut trial = Trial::new().measure({
            let calls = Rc::clone(&calls);
            move |()| calls.set(calls.get() + 1)
        });

        let samples = trial.execute(
            &mut RecordingEvictor::new(&Events::default()),
            TrialConfig::new(CacheLevel::L1, Workload::Skip),
            1000,
        );

        assert_eq!(calls.get(), 0);
        assert_eq!(samples.len(), 1000);
    }

    #[test]
    fn setup_sees_iteration_metadata() {
        let seen = Rc::new(Cell::new(Vec::new()));
        let config = TrialConfig::new(CacheLevel::L1L2, Workload::Skip);

        let mut trial = Trial::new()
            .setup({
                let seen = Rc::clone(&seen);
                move |meta| {
                    let mut so_far = seen.take();
                    so_far.push(*meta);
                    seen.set(so_far);
                }
            })
            .measure(|()| ());

        let _samples = trial.execute(&mut RecordingEvictor::new(&Events::default()), config, 3);

        let seen = seen.take();
        assert_eq!(seen.len(), 3);

        for (index, meta) in seen.iter().enumerate() {
            assert_eq!(meta.iteration(), u64::try_from(index).unwrap());
            assert_eq!(meta.iterations(), 3);
            assert_eq!(meta.config(), config);
        }
    }

    #[test]
    fn zero_iterations_give_no_samples() {
        let samples = Trial::new().measure(|()| ()).execute(
            &mut RecordingEvictor::new(&Events::default()),
            TrialConfig::default(),
            0,
        );

        assert!(samples.is_empty());
    }
}
