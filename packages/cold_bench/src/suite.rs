use cache_wipe::CacheWiper;

use crate::{
    ConfiguredTrial, Evict, Measurement, OperationReport, ParameterSet, SampleSet, SuiteReport,
    TrialConfig,
};

/// A named table of operations, each measured under its own set of trial configurations.
///
/// Every operation is a configured [`Trial`](crate::Trial). Operations without their own
/// parameter set are executed under the suite's default parameters.
///
/// # Examples
///
/// ```
/// use cache_wipe::{CacheLevel, CacheWiper};
/// use cold_bench::{ParameterSet, Suite, Trial, Workload};
///
/// let mut suite = Suite::new("vec")
///     .operation(
///         "len",
///         Trial::new().setup(|_| vec![1, 2, 3]).measure(|v| v.len()),
///     )
///     .operation_with_parameters(
///         "with_capacity",
///         ParameterSet::new([CacheLevel::L1], Workload::ALL),
///         Trial::new().measure(|()| Vec::<u8>::with_capacity(64)),
///     );
///
/// let report = suite.execute(&mut CacheWiper::default(), 10);
///
/// assert_eq!(report.operations().len(), 2);
/// println!("{report}");
/// ```
#[derive(derive_more::Debug)]
#[must_use]
pub struct Suite<'a, E = CacheWiper> {
    name: String,
    parameters: ParameterSet,
    filter: Option<String>,
    operations: Vec<Operation<'a, E>>,
}

#[derive(derive_more::Debug)]
pub(crate) struct Operation<'a, E> {
    pub(crate) name: String,
    pub(crate) parameters: Option<ParameterSet>,

    #[debug(ignore)]
    pub(crate) trial: Box<dyn ErasedTrial<E> + 'a>,
}

impl<'a, E: Evict> Suite<'a, E> {
    /// Creates an empty suite. The name becomes the Criterion benchmark group name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: ParameterSet::default(),
            filter: None,
            operations: Vec::new(),
        }
    }

    /// Sets the parameters used by operations registered without their own parameter set.
    ///
    /// Defaults to a warm cache, with and without the measured call.
    pub fn parameters(self, parameters: ParameterSet) -> Self {
        Self { parameters, ..self }
    }

    /// Registers an operation that is executed under the suite's default parameters.
    pub fn operation<Operand: 'a, Output: 'a>(
        mut self,
        name: impl Into<String>,
        trial: ConfiguredTrial<'a, Operand, Output>,
    ) -> Self {
        self.operations.push(Operation {
            name: name.into(),
            parameters: None,
            trial: Box::new(trial),
        });
        self
    }

    /// Registers an operation that is executed under its own parameters.
    pub fn operation_with_parameters<Operand: 'a, Output: 'a>(
        mut self,
        name: impl Into<String>,
        parameters: ParameterSet,
        trial: ConfiguredTrial<'a, Operand, Output>,
    ) -> Self {
        self.operations.push(Operation {
            name: name.into(),
            parameters: Some(parameters),
            trial: Box::new(trial),
        });
        self
    }

    /// Restricts execution to operations whose name contains `pattern`.
    pub fn filter(self, pattern: impl Into<String>) -> Self {
        Self {
            filter: Some(pattern.into()),
            ..self
        }
    }

    /// The name of the suite.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The names of the operations that will be executed, after applying the filter.
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.selected().map(|operation| operation.name.as_str())
    }

    /// Executes every selected operation under each of its configurations for a specific
    /// number of iterations.
    ///
    /// # Panics
    ///
    /// Panics if a wipe buffer or an operand cannot be allocated.
    pub fn execute(&mut self, evictor: &mut E, iterations: u64) -> SuiteReport {
        let mut reports = Vec::new();

        for (operation, parameters) in self.selected_mut() {
            let measurements = parameters
                .iter()
                .map(|config| {
                    tracing::debug!(
                        operation = %operation.name,
                        %config,
                        iterations,
                        "executing trial"
                    );

                    let samples = operation.trial.execute(evictor, config, iterations);

                    tracing::debug!(
                        operation = %operation.name,
                        %config,
                        mean = ?samples.mean(),
                        "trial completed"
                    );

                    Measurement::new(config, samples)
                })
                .collect();

            reports.push(OperationReport::new(operation.name.clone(), measurements));
        }

        SuiteReport::new(self.name.clone(), iterations, reports)
    }

    fn selected(&self) -> impl Iterator<Item = &Operation<'a, E>> {
        let filter = self.filter.as_deref();

        self.operations
            .iter()
            .filter(move |operation| is_match(filter, &operation.name))
    }

    /// The selected operations, each paired with the parameters it is executed under.
    pub(crate) fn selected_mut(
        &mut self,
    ) -> impl Iterator<Item = (&mut Operation<'a, E>, ParameterSet)> {
        let filter = self.filter.as_deref();
        let defaults = &self.parameters;

        self.operations
            .iter_mut()
            .filter(move |operation| is_match(filter, &operation.name))
            .map(move |operation| {
                let parameters = operation
                    .parameters
                    .clone()
                    .unwrap_or_else(|| defaults.clone());

                (operation, parameters)
            })
    }
}

fn is_match(filter: Option<&str>, name: &str) -> bool {
    filter.is_none_or(|pattern| name.contains(pattern))
}

/// A configured trial with the operand and output types erased, so trials of different types
/// can share one table.
pub(crate) trait ErasedTrial<E> {
    fn execute(&mut self, evictor: &mut E, config: TrialConfig, iterations: u64) -> SampleSet;

    #[cfg(any(test, feature = "criterion"))]
    fn execute_criterion(
        &mut self,
        group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
        evictor: &mut E,
        config: TrialConfig,
        id: criterion::BenchmarkId,
    );
}

impl<E: Evict, Operand, Output> ErasedTrial<E> for ConfiguredTrial<'_, Operand, Output> {
    fn execute(&mut self, evictor: &mut E, config: TrialConfig, iterations: u64) -> SampleSet {
        Self::execute(self, evictor, config, iterations)
    }

    #[cfg(any(test, feature = "criterion"))]
    fn execute_criterion(
        &mut self,
        group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
        evictor: &mut E,
        config: TrialConfig,
        id: criterion::BenchmarkId,
    ) {
        Self::execute_criterion(self, group, evictor, config, id);
    }
}
