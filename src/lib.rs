// SPDX-License-Identifier: MIT

//! Timing comparison of four ways to sum a large integer array: a single
//! thread, one scoped thread per chunk joined in order, one scoped thread per
//! chunk adding into a locked accumulator, and a fixed worker pool fed with
//! chunk tasks.

pub mod bench;
pub mod config;
pub mod data;
pub mod error;
pub mod pools;
pub mod reduce;
pub mod strategies;

pub use config::BenchConfig;
pub use data::Dataset;
pub use error::{Error, Result};
pub use pools::standardpool;
pub use reduce::Chunk;
