#![cfg(any(test, feature = "criterion"))]

use criterion::{BenchmarkId, Criterion};

use crate::{Evict, Suite};

impl<E: Evict> Suite<'_, E> {
    /// Registers every selected operation with Criterion, one benchmark per configuration,
    /// in a benchmark group named after the suite.
    ///
    /// Benchmark IDs take the form `suite/operation/cache/workload`, e.g.
    /// `tensor_overheads/array_dim/L1/run`. Criterion's own name filter applies on top of the
    /// suite's filter.
    ///
    /// # Panics
    ///
    /// Panics if a wipe buffer or an operand cannot be allocated.
    pub fn execute_criterion(&mut self, c: &mut Criterion, evictor: &mut E) {
        let mut group = c.benchmark_group(self.name().to_owned());

        for (operation, parameters) in self.selected_mut() {
            for config in parameters.iter() {
                let id = BenchmarkId::new(operation.name.clone(), config);

                operation
                    .trial
                    .execute_criterion(&mut group, evictor, config, id);
            }
        }

        group.finish();
    }
}
