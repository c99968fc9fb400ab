// SPDX-License-Identifier: MIT

use std::io;
use thiserror::Error;

/// Errors produced by the reducers, the worker pool and the benchmark
/// driver.
#[derive(Debug, Error)]
pub enum Error {
    #[error("array length must be positive")]
    EmptyArray,

    #[error("invalid value bounds: min {min} is greater than max {max}")]
    InvalidBounds { min: i32, max: i32 },

    #[error("range [{start}, {end}) is out of bounds for length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("partition count must be positive")]
    InvalidPartitions,

    #[error("worker count must be positive")]
    NoWorkers,

    #[error("thread pool is closed")]
    PoolClosed,

    #[error("task panicked: {0}")]
    TaskPanicked(String),

    #[error("task was dropped before it completed")]
    TaskAbandoned,

    #[error("chunk thread panicked")]
    ThreadPanicked,

    #[error("failed to spawn worker thread")]
    Spawn(#[source] io::Error),

    #[error("invalid value {value:?} for {key}")]
    Config { key: &'static str, value: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
