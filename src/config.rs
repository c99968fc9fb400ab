// SPDX-License-Identifier: MIT

use crate::error::{Error, Result};
use std::env;
use std::str::FromStr;

/// Default array length of a benchmark run.
pub const DEFAULT_ARRAY_LENGTH: usize = 10_000_000;
/// Default seed, the stock seed of the 32-bit Mersenne Twister.
pub const DEFAULT_SEED: u64 = 5489;
/// Default number of chunk tasks per pool trial.
pub const DEFAULT_TASKS: usize = 20;
/// Default number of pool trials run on the same pool.
pub const DEFAULT_POOL_TRIALS: usize = 2;

/// Parameters of one benchmark run, passed explicitly to [`crate::bench::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Number of elements in the generated array.
    pub array_length: usize,
    /// Smallest value drawn, inclusive.
    pub min_value: i32,
    /// Largest value drawn, inclusive.
    pub max_value: i32,
    /// Seed of the array generator.
    pub seed: u64,
    /// Chunk count of the two thread strategies and size of the pool.
    pub threads: usize,
    /// Chunk count of each pool trial.
    pub tasks: usize,
    /// How many times the pool strategy runs on the same pool.
    pub pool_trials: usize,
}

/// Number of logical processors, never less than one.
pub fn processors() -> usize {
    num_cpus::get().max(1)
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            array_length: DEFAULT_ARRAY_LENGTH,
            min_value: 0,
            max_value: 1000,
            seed: DEFAULT_SEED,
            threads: processors(),
            tasks: DEFAULT_TASKS,
            pool_trials: DEFAULT_POOL_TRIALS,
        }
    }
}

fn parse_var<T: FromStr>(key: &'static str, target: &mut T) -> Result<()> {
    match env::var(key) {
        Ok(raw) => {
            *target = raw
                .trim()
                .parse()
                .map_err(|_| Error::Config { key, value: raw })?;
            Ok(())
        }
        Err(env::VarError::NotPresent) => Ok(()),
        Err(env::VarError::NotUnicode(raw)) => Err(Error::Config {
            key,
            value: raw.to_string_lossy().into_owned(),
        }),
    }
}

impl BenchConfig {
    /// Starts from the defaults and overrides every field whose
    /// `SUMBENCH_*` environment variable is set, then validates the result.
    pub fn from_env() -> Result<Self> {
        let mut config = BenchConfig::default();
        parse_var("SUMBENCH_LENGTH", &mut config.array_length)?;
        parse_var("SUMBENCH_MIN", &mut config.min_value)?;
        parse_var("SUMBENCH_MAX", &mut config.max_value)?;
        parse_var("SUMBENCH_SEED", &mut config.seed)?;
        parse_var("SUMBENCH_THREADS", &mut config.threads)?;
        parse_var("SUMBENCH_TASKS", &mut config.tasks)?;
        parse_var("SUMBENCH_TRIALS", &mut config.pool_trials)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.array_length == 0 {
            return Err(Error::EmptyArray);
        }
        if self.min_value > self.max_value {
            return Err(Error::InvalidBounds {
                min: self.min_value,
                max: self.max_value,
            });
        }
        if self.threads == 0 {
            return Err(Error::NoWorkers);
        }
        if self.tasks == 0 {
            return Err(Error::InvalidPartitions);
        }
        Ok(())
    }
}
