use thiserror::Error;

/// Errors that can occur when configuring a cache wiper.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The cache size table does not describe a valid cumulative cache hierarchy.
    #[error("invalid cache sizes (l1 = {l1}, l1_l2 = {l1_l2}, l1_l2_l3 = {l1_l2_l3}): {problem}")]
    InvalidCacheSizes {
        /// Cumulative size of the L1 data cache, in bytes.
        l1: usize,

        /// Cumulative size of the L1 and L2 caches, in bytes.
        l1_l2: usize,

        /// Cumulative size of the L1, L2 and L3 caches, in bytes.
        l1_l2_l3: usize,

        /// A human-readable description of the problem.
        problem: String,
    },
}

/// A specialized `Result` type for cache wiper operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn invalid_cache_sizes_message_names_all_sizes() {
        let error = Error::InvalidCacheSizes {
            l1: 1,
            l1_l2: 2,
            l1_l2_l3: 3,
            problem: "too small".to_string(),
        };

        let message = error.to_string();
        assert!(message.contains("l1 = 1"));
        assert!(message.contains("l1_l2 = 2"));
        assert!(message.contains("l1_l2_l3 = 3"));
        assert!(message.contains("too small"));
    }
}
