use std::marker::PhantomData;

use crate::configure::TrialInitial;

/// A trial times one call per iteration, optionally under cold-cache conditions.
///
/// A `Trial` must first be configured, after which it can be executed under any
/// [`TrialConfig`](crate::TrialConfig) for any number of iterations.
///
/// # Execution phases
///
/// Every iteration goes through the following phases, strictly in order:
///
/// 1. **Setup**: the setup callback constructs the operand (unmeasured)
/// 2. **Wipe**: unless the cache level is `None`, the caches are evicted (unmeasured)
/// 3. **Start timestamp**
/// 4. **Measured call**: only if the workload is `Run`, exactly once
/// 5. **Stop timestamp**
/// 6. **Record**: the elapsed time between the timestamps becomes one sample
/// 7. **Teardown**: the wipe buffer is released and the operand dropped (unmeasured)
///
/// # Examples
///
/// ```
/// use cache_wipe::{CacheLevel, CacheWiper};
/// use cold_bench::{Trial, TrialConfig, Workload};
///
/// let mut trial = Trial::new()
///     .setup(|_| vec![0_u64; 64])
///     .measure(|numbers| numbers.iter().sum::<u64>());
///
/// let mut wiper = CacheWiper::default();
///
/// let run = trial.execute(&mut wiper, TrialConfig::new(CacheLevel::L1, Workload::Run), 10);
/// let skip = trial.execute(&mut wiper, TrialConfig::new(CacheLevel::L1, Workload::Skip), 10);
///
/// println!("sum: {:?} (baseline {:?})", run.mean(), skip.mean());
/// ```
#[derive(Debug)]
pub struct Trial {
    _no_construct: PhantomData<()>,
}

impl Trial {
    /// Creates a new trial and starts the process of configuring it.
    ///
    /// # Order of operations
    ///
    /// 1. Start with `Trial::new()`, which gives you an object you can use to configure the trial.
    /// 2. Optionally set the operand constructor with [`setup()`](crate::configure::TrialInitial::setup).
    /// 3. **Required**: Set the measured call with
    ///    [`measure()`](crate::configure::TrialWithSetup::measure).
    /// 4. **Required**: Execute the trial with either
    ///    [`execute()`][crate::ConfiguredTrial::execute] or by registering it with a
    ///    [`Suite`](crate::Suite).
    ///
    /// You can skip optional steps but cannot go back in the sequence.
    #[expect(
        clippy::new_ret_no_self,
        reason = "builder-style configuration pattern, intentional"
    )]
    pub fn new() -> TrialInitial {
        TrialInitial::new()
    }
}
