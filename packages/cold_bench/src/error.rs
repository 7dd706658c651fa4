use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when configuring a benchmark run.
///
/// Failures during a run are not reported through this type: failing to allocate a wipe buffer
/// or an operand is fatal and terminates the run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The configuration file could not be read.
    #[error("failed to read configuration file '{}'", path.display())]
    ReadConfig {
        /// The path of the configuration file.
        path: PathBuf,

        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration is not valid TOML.
    #[error("configuration is not valid TOML")]
    ConfigSyntax(#[from] toml::de::Error),

    /// The configuration is valid TOML but contains a value we cannot use.
    #[error("invalid configuration value for '{key}': {problem}")]
    InvalidConfig {
        /// The dotted path of the offending key, e.g. `wipe.stride`.
        key: String,

        /// A human-readable description of the problem.
        problem: String,
    },

    /// The configured cache sizes were rejected by the cache wiper.
    #[error(transparent)]
    CacheSizes(#[from] cache_wipe::Error),
}

impl Error {
    pub(crate) fn invalid_config(key: impl Into<String>, problem: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            problem: problem.into(),
        }
    }
}

/// A specialized `Result` type for benchmark configuration, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
