//! Intermediate stages of configuring a trial.
//!
//! You generally do not need to reference these types, they are just parts of a call chain.

#![allow(
    clippy::type_complexity,
    reason = "builder pattern uses complex function types for flexibility"
)]

use crate::{ConfiguredTrial, TrialMeta};

/// The first stage of configuring a trial, with the operand type unknown.
#[derive(Debug)]
#[must_use]
pub struct TrialInitial {
    _private: (),
}

/// The second stage of configuring a trial, with the operand type known.
#[derive(derive_more::Debug)]
#[must_use]
pub struct TrialWithSetup<'a, Operand> {
    #[debug(ignore)]
    setup_fn: Box<dyn FnMut(&TrialMeta) -> Operand + 'a>,
}

impl TrialInitial {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }

    /// Sets the callback that constructs the operand of the measured call.
    ///
    /// The callback is executed once per iteration, before the cache is wiped and outside the
    /// timed window. The operand is dropped after the stop timestamp.
    ///
    /// **Builder Order**: This method can only be called on [`TrialInitial`]. After calling this,
    /// you must use methods from [`TrialWithSetup`] for subsequent configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use cold_bench::Trial;
    ///
    /// let trial = Trial::new()
    ///     .setup(|_| vec![1, 2, 3])
    ///     .measure(|numbers| numbers.len());
    /// ```
    #[cfg_attr(test, mutants::skip)] // All mutations are unviable - skip them to save time.
    pub fn setup<'a, F, Operand>(self, f: F) -> TrialWithSetup<'a, Operand>
    where
        F: FnMut(&TrialMeta) -> Operand + 'a,
    {
        TrialWithSetup {
            setup_fn: Box::new(f),
        }
    }

    /// Sets the measured call of a trial that needs no operand.
    ///
    /// The value returned by the callback is passed through [`std::hint::black_box`] and
    /// dropped after the stop timestamp.
    ///
    /// # Examples
    ///
    /// ```
    /// use cold_bench::Trial;
    ///
    /// let trial = Trial::new().measure(|()| Vec::<u64>::with_capacity(16));
    /// ```
    #[cfg_attr(test, mutants::skip)] // All mutations are unviable - skip them to save time.
    pub fn measure<'a, F, Output>(self, f: F) -> ConfiguredTrial<'a, (), Output>
    where
        F: FnMut(&mut ()) -> Output + 'a,
    {
        ConfiguredTrial::new(Box::new(|_: &TrialMeta| ()), Box::new(f))
    }
}

impl<'a, Operand> TrialWithSetup<'a, Operand> {
    /// Sets the measured call, which receives the operand constructed by the setup callback.
    ///
    /// The measured call is executed at most once per iteration, inside the timed window, and
    /// only when the trial configuration selects [`Workload::Run`](crate::Workload::Run).
    /// The value it returns is passed through [`std::hint::black_box`] and dropped after the
    /// stop timestamp.
    ///
    /// # Examples
    ///
    /// ```
    /// use cold_bench::Trial;
    ///
    /// let trial = Trial::new()
    ///     .setup(|_| String::from("operand"))
    ///     .measure(|operand| operand.is_empty());
    /// ```
    #[cfg_attr(test, mutants::skip)] // All mutations are unviable - skip them to save time.
    pub fn measure<F, Output>(self, f: F) -> ConfiguredTrial<'a, Operand, Output>
    where
        F: FnMut(&mut Operand) -> Output + 'a,
    {
        ConfiguredTrial::new(self.setup_fn, Box::new(f))
    }
}
