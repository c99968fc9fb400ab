// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicI64, Ordering::SeqCst};
use std::sync::{Arc, Mutex};
use sumbench::reduce::ChunkSplitter;
use sumbench::standardpool::Task;

/// Task that increments a shared counter protected by a mutex and returns
/// the value it observed.
pub struct SharedCounterTask {
    /// Thread-safe counter variable protected by a mutex.
    counter: Arc<Mutex<u32>>,
}

impl SharedCounterTask {
    pub fn new(counter: Arc<Mutex<u32>>) -> Self {
        SharedCounterTask { counter }
    }
}

impl Task for SharedCounterTask {
    type Output = u32;

    fn execute(&self) -> u32 {
        let mut counter_guard = self.counter.lock().unwrap();
        *counter_guard += 1;
        *counter_guard
    }
}

/// Task that sums one chunk of an array, returning the sum and also
/// recording it for inspection after the pool is gone.
pub struct SubsliceSumTask {
    input_array: Arc<[i32]>,
    slice_start: usize,
    slice_end: usize,
    pub subslice_sum: AtomicI64,
}

impl SubsliceSumTask {
    pub fn new(
        input_array: Arc<[i32]>,
        slice_start: usize,
        slice_end: usize,
    ) -> Self {
        SubsliceSumTask {
            input_array,
            slice_start,
            slice_end,
            subslice_sum: AtomicI64::new(0),
        }
    }
}

impl Task for SubsliceSumTask {
    type Output = i64;

    fn execute(&self) -> i64 {
        let sum: i64 = self.input_array[self.slice_start..self.slice_end]
            .iter()
            .map(|&v| i64::from(v))
            .sum();
        self.subslice_sum.store(sum, SeqCst);
        sum
    }
}

/// Task that always panics with `message`.
pub struct FailingTask {
    pub message: &'static str,
}

impl Task for FailingTask {
    type Output = i64;

    fn execute(&self) -> i64 {
        panic!("{}", self.message)
    }
}

pub fn get_subslice_sum_tasks(
    input_array: Arc<[i32]>,
    num_tasks: usize,
) -> Vec<Arc<SubsliceSumTask>> {
    let chunk_splitter = ChunkSplitter::new(input_array.len(), num_tasks)
        .expect("num_tasks must be positive");

    chunk_splitter
        .map(|chunk| {
            Arc::new(SubsliceSumTask::new(
                input_array.clone(),
                chunk.start,
                chunk.end,
            ))
        })
        .collect()
}
