// SPDX-License-Identifier: MIT

//! The four ways of summing an array that the benchmark compares.
//!
//! Each strategy owns its accumulator for the duration of the call, so runs
//! are independent of each other.

use crate::error::{Error, Result};
use crate::pools::StandardPool;
use crate::reduce::{sum_slice, ChunkSplitter};
use std::sync::{Arc, Mutex};
use std::thread;

/// Builder for the thread summing chunk `index`. Spawning through it turns
/// an OS refusal into [`Error::Spawn`] instead of a panic.
fn chunk_thread(index: usize) -> thread::Builder {
    thread::Builder::new().name(format!("sumbench-chunk-{index}"))
}

pub fn single_thread(values: &[i32]) -> i64 {
    sum_slice(values)
}

/// Sums each chunk on its own scoped thread and joins the handles in
/// submission order. Workers share nothing mutable.
pub fn future_per_chunk(values: &[i32], num_chunks: usize) -> Result<i64> {
    let chunks = ChunkSplitter::new(values.len(), num_chunks)?;

    thread::scope(|scope| -> Result<i64> {
        let partial_results = chunks
            .enumerate()
            .map(|(index, chunk)| {
                let slice = &values[chunk.start..chunk.end];
                chunk_thread(index)
                    .spawn_scoped(scope, move || sum_slice(slice))
                    .map_err(Error::Spawn)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut total_sum = 0i64;
        for handle in partial_results {
            total_sum += handle.join().map_err(|_| Error::ThreadPanicked)?;
        }
        Ok(total_sum)
    })
}

/// Sums each chunk on its own scoped thread; every thread adds its partial
/// sum to a shared accumulator under the lock, once.
pub fn thread_per_chunk(values: &[i32], num_chunks: usize) -> Result<i64> {
    let chunks = ChunkSplitter::new(values.len(), num_chunks)?;
    let total_sum = Mutex::new(0i64);

    let panicked = thread::scope(|scope| -> Result<bool> {
        let handles = chunks
            .enumerate()
            .map(|(index, chunk)| {
                let slice = &values[chunk.start..chunk.end];
                let total_sum = &total_sum;
                chunk_thread(index)
                    .spawn_scoped(scope, move || {
                        let partial = sum_slice(slice);
                        let mut total_guard = total_sum
                            .lock()
                            .unwrap_or_else(|e| e.into_inner());
                        *total_guard += partial;
                    })
                    .map_err(Error::Spawn)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(handles
            .into_iter()
            .map(|handle| handle.join())
            .fold(false, |panicked, joined| panicked || joined.is_err()))
    })?;

    if panicked {
        return Err(Error::ThreadPanicked);
    }
    Ok(total_sum.into_inner().unwrap_or_else(|e| e.into_inner()))
}

/// Enqueues one task per chunk on `pool` and adds the results in submission
/// order.
pub fn pool_reduce(
    pool: &StandardPool,
    values: &Arc<[i32]>,
    num_tasks: usize,
) -> Result<i64> {
    let chunks = ChunkSplitter::new(values.len(), num_tasks)?;

    let mut results = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let values = values.clone();
        results.push(pool.enqueue(move || {
            sum_slice(&values[chunk.start..chunk.end])
        })?);
    }

    let mut total_sum = 0i64;
    for result in results {
        total_sum += result.wait()?;
    }
    Ok(total_sum)
}
