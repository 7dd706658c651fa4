#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Call overhead of tensor metadata operations, measured one call at a time with `cold_bench`.
//!
//! Every accessor is measured through two entry points: directly on the owned array and through
//! a freshly borrowed view. The difference between the two is the cost of the wrapper.

use std::hint::black_box;
use std::num::NonZero;

use cache_wipe::{BufferPolicy, CacheLevel, CacheSizes, WipeConfig};
use cold_bench::{BenchConfig, ParameterSet, Suite, Trial, Workload};
use ndarray::{ArcArray, ArrayD, Axis, IxDyn};
use rand::Rng;

/// The name of the suite, which is also the Criterion benchmark group name.
pub const SUITE_NAME: &str = "tensor_overheads";

/// The shape of the large array reshaped onto itself by the `*_noop_reshape` operations.
pub const LARGE_SHAPE: [usize; 2] = [64, 2048];

/// Upper bound (exclusive) of the random length of the array constructed by `empty`.
pub const MAX_EMPTY_LEN: usize = 64;

/// The cache levels measured when none are requested explicitly: warm, and cold L1.
pub const DEFAULT_LEVELS: [CacheLevel; 2] = [CacheLevel::None, CacheLevel::L1];

/// Environment variable with a comma-separated list of cache levels for the Criterion bench
/// target, e.g. `none,l1,l1+l2`. Unset or empty means [`DEFAULT_LEVELS`].
pub const LEVELS_ENV_VAR: &str = "TENSOR_OVERHEADS_LEVELS";

/// Builds the suite of tensor operations, each measured under `parameters`.
#[must_use]
pub fn tensor_suite(parameters: ParameterSet) -> Suite<'static> {
    let large = ArcArray::<f32, IxDyn>::zeros(IxDyn(&LARGE_SHAPE));

    Suite::new(SUITE_NAME)
        .parameters(parameters)
        .operation(
            "empty",
            Trial::new()
                .setup(|_| rand::rng().random_range(0..MAX_EMPTY_LEN))
                .measure(|len| ArrayD::<f32>::zeros(IxDyn(&[*len]))),
        )
        .operation(
            "array_dim",
            Trial::new().setup(|_| empty()).measure(|array| array.ndim()),
        )
        .operation(
            "view_dim",
            Trial::new()
                .setup(|_| empty())
                .measure(|array| array.view().ndim()),
        )
        .operation(
            "array_numel",
            Trial::new().setup(|_| empty()).measure(|array| array.len()),
        )
        .operation(
            "view_numel",
            Trial::new()
                .setup(|_| empty())
                .measure(|array| array.view().len()),
        )
        .operation(
            "array_size",
            Trial::new()
                .setup(|_| empty())
                .measure(|array| array.len_of(Axis(0))),
        )
        .operation(
            "view_size",
            Trial::new()
                .setup(|_| empty())
                .measure(|array| array.view().len_of(Axis(0))),
        )
        .operation(
            "array_sizes",
            Trial::new().setup(|_| empty()).measure(|array| {
                black_box(array.shape());
            }),
        )
        .operation(
            "view_sizes",
            Trial::new().setup(|_| empty()).measure(|array| {
                black_box(array.view().shape());
            }),
        )
        .operation(
            "array_empty_noop_reshape",
            Trial::new()
                .setup(|_| empty())
                .measure(|array| noop_reshape(array, &[0])),
        )
        .operation(
            "view_empty_noop_reshape",
            Trial::new()
                .setup(|_| empty())
                .measure(|array| noop_reshape(&array.view(), &[0])),
        )
        .operation(
            "array_noop_reshape",
            Trial::new()
                .setup({
                    let large = large.clone();
                    move |_| large.clone()
                })
                .measure(|array| noop_reshape(array, &LARGE_SHAPE)),
        )
        .operation(
            "view_noop_reshape",
            Trial::new()
                .setup(move |_| large.clone())
                .measure(|array| noop_reshape(&array.view(), &LARGE_SHAPE)),
        )
        .operation(
            "array_storage_ptr",
            Trial::new().setup(|_| empty()).measure(|array| array.as_ptr()),
        )
        .operation(
            "array_layout_query",
            Trial::new()
                .setup(|_| empty())
                .measure(|array| array.is_standard_layout()),
        )
}

/// A one-dimensional array with zero elements.
fn empty() -> ArrayD<f32> {
    ArrayD::zeros(IxDyn(&[0]))
}

/// Reshapes an array to the shape it already has, which never copies.
///
/// Returns the element count of the reshaped array, or `None` if the shape was rejected.
fn noop_reshape<S>(array: &ndarray::ArrayBase<S, IxDyn>, shape: &[usize]) -> Option<usize>
where
    S: ndarray::Data<Elem = f32>,
{
    array.to_shape(shape).ok().map(|reshaped| reshaped.len())
}

/// Parameters for measuring under the given cache levels, each with and without the call.
///
/// Falls back to [`DEFAULT_LEVELS`] if no levels are given.
#[must_use]
pub fn parameters(levels: &[CacheLevel]) -> ParameterSet {
    if levels.is_empty() {
        ParameterSet::new(DEFAULT_LEVELS, Workload::ALL)
    } else {
        ParameterSet::new(levels.iter().copied(), Workload::ALL)
    }
}

/// Parses a comma-separated list of cache levels, ignoring surrounding whitespace and empty
/// entries.
///
/// # Errors
///
/// Returns the parse error of the first entry that is not a cache level.
pub fn parse_levels(list: &str) -> Result<Vec<CacheLevel>, String> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::parse)
        .collect()
}

/// Command-line overrides of a [`BenchConfig`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Overrides {
    /// Replaces the configured iteration count.
    pub iterations: Option<NonZero<u64>>,

    /// Forces [`BufferPolicy::Reused`].
    pub reuse_buffer: bool,

    /// Replaces the configured cache sizes with those of the host.
    pub detect_caches: bool,
}

impl Overrides {
    /// Applies the overrides on top of a loaded configuration.
    #[must_use]
    pub fn apply(&self, config: BenchConfig) -> BenchConfig {
        let wipe = config.wipe();

        let sizes = if self.detect_caches {
            CacheSizes::detect()
        } else {
            *wipe.sizes()
        };

        let policy = if self.reuse_buffer {
            BufferPolicy::Reused
        } else {
            wipe.policy()
        };

        let wipe = WipeConfig::builder()
            .sizes(sizes)
            .stride(wipe.stride())
            .policy(policy)
            .build();

        let config = config.with_wipe(wipe);

        match self.iterations {
            Some(iterations) => config.with_iterations(iterations),
            None => config,
        }
    }
}
