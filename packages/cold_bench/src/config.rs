use std::fs;
use std::num::NonZero;
use std::path::Path;

use cache_wipe::{BufferPolicy, CacheLevel, CacheSizes, WipeConfig, WipeConfigBuilder};
use toml::{Table, Value};

use crate::{Error, Result};

/// How many iterations of each trial configuration to execute if not configured otherwise.
pub const DEFAULT_ITERATIONS: NonZero<u64> = NonZero::new(100_000).unwrap();

/// Settings for a manually timed benchmark run, typically loaded from a TOML file.
///
/// Every key is optional:
///
/// ```toml
/// iterations = 100000
/// buffer_policy = "per_trial" # or "reused"
///
/// [wipe]
/// stride = 8
///
/// # Cumulative sizes, in bytes.
/// [wipe.cache_sizes]
/// l1 = 32768
/// l1_l2 = 294912
/// l1_l2_l3 = 8683520
/// ```
///
/// # Examples
///
/// ```
/// use cold_bench::BenchConfig;
///
/// let config = BenchConfig::from_toml_str("iterations = 500\n[wipe]\nstride = 16\n").unwrap();
///
/// assert_eq!(config.iterations().get(), 500);
/// assert_eq!(config.wipe().stride().get(), 16);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BenchConfig {
    wipe: WipeConfig,
    iterations: NonZero<u64>,
}

impl BenchConfig {
    /// Loads the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not contain a valid configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "loaded benchmark configuration file");

        Self::from_toml_str(&contents)
    }

    /// Parses the configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML, contains unknown keys or contains
    /// values of the wrong type or range.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let table: Table = toml::from_str(contents)?;

        let mut iterations = DEFAULT_ITERATIONS;
        let mut wipe = WipeConfig::builder();

        for (key, value) in &table {
            match key.as_str() {
                "iterations" => {
                    iterations = NonZero::new(positive_integer(key, value)?)
                        .expect("positive_integer() never returns zero");
                }
                "buffer_policy" => wipe = wipe.policy(buffer_policy(key, value)?),
                "wipe" => wipe = wipe_section(wipe, value)?,
                _ => return Err(unknown_key(key)),
            }
        }

        Ok(Self {
            wipe: wipe.build(),
            iterations,
        })
    }

    /// How the cache is wiped before each trial.
    #[must_use]
    pub fn wipe(&self) -> &WipeConfig {
        &self.wipe
    }

    /// How many iterations of each trial configuration to execute.
    #[must_use]
    pub fn iterations(&self) -> NonZero<u64> {
        self.iterations
    }

    /// Returns a copy with the wipe configuration replaced.
    #[must_use]
    pub fn with_wipe(self, wipe: WipeConfig) -> Self {
        Self { wipe, ..self }
    }

    /// Returns a copy with the iteration count replaced.
    #[must_use]
    pub fn with_iterations(self, iterations: NonZero<u64>) -> Self {
        Self { iterations, ..self }
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            wipe: WipeConfig::default(),
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

fn wipe_section(mut wipe: WipeConfigBuilder, value: &Value) -> Result<WipeConfigBuilder> {
    let section = table("wipe", value)?;

    for (key, value) in section {
        let path = format!("wipe.{key}");

        match key.as_str() {
            "stride" => {
                let stride = usize::try_from(positive_integer(&path, value)?)
                    .map_err(|_| Error::invalid_config(&path, "stride does not fit in memory"))?;

                wipe = wipe.stride(
                    NonZero::new(stride).expect("positive_integer() never returns zero"),
                );
            }
            "cache_sizes" => wipe = wipe.sizes(cache_sizes(value)?),
            _ => return Err(unknown_key(&path)),
        }
    }

    Ok(wipe)
}

fn cache_sizes(value: &Value) -> Result<CacheSizes> {
    let section = table("wipe.cache_sizes", value)?;

    let defaults = CacheSizes::OBSERVED;
    let mut l1 = defaults.bytes(CacheLevel::L1);
    let mut l1_l2 = defaults.bytes(CacheLevel::L1L2);
    let mut l1_l2_l3 = defaults.bytes(CacheLevel::L1L2L3);

    for (key, value) in section {
        let path = format!("wipe.cache_sizes.{key}");

        let target = match key.as_str() {
            "l1" => &mut l1,
            "l1_l2" => &mut l1_l2,
            "l1_l2_l3" => &mut l1_l2_l3,
            _ => return Err(unknown_key(&path)),
        };

        *target = usize::try_from(positive_integer(&path, value)?)
            .map_err(|_| Error::invalid_config(&path, "size does not fit in memory"))?;
    }

    Ok(CacheSizes::new(l1, l1_l2, l1_l2_l3)?)
}

fn buffer_policy(key: &str, value: &Value) -> Result<BufferPolicy> {
    match value.as_str() {
        Some("per_trial") => Ok(BufferPolicy::PerTrial),
        Some("reused") => Ok(BufferPolicy::Reused),
        _ => Err(Error::invalid_config(
            key,
            format!("expected \"per_trial\" or \"reused\", got {}", value.type_str()),
        )),
    }
}

fn table<'v>(key: &str, value: &'v Value) -> Result<&'v Table> {
    value.as_table().ok_or_else(|| {
        Error::invalid_config(key, format!("expected a table, got {}", value.type_str()))
    })
}

fn positive_integer(key: &str, value: &Value) -> Result<u64> {
    let integer = value.as_integer().ok_or_else(|| {
        Error::invalid_config(key, format!("expected an integer, got {}", value.type_str()))
    })?;

    u64::try_from(integer)
        .ok()
        .filter(|integer| *integer > 0)
        .ok_or_else(|| Error::invalid_config(key, "must be greater than zero"))
}

fn unknown_key(key: &str) -> Error {
    Error::invalid_config(key, "unknown key")
}
