// SPDX-License-Identifier: MIT

use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};
use sumbench::reduce::ChunkSplitter;
use sumbench::standardpool::{StandardPool, Task};

/// Task that sums a portion of an array in parallel
struct SumTask {
    data: Arc<[i32]>, // Input array to sum
    start: usize,     // Start index of this task's portion
    end: usize,       // End index of this task's portion
    result: AtomicI64, // Partial sum result for this task
}

impl Task for SumTask {
    type Output = i64;

    fn execute(&self) -> i64 {
        // Calculate sum for this task's portion of the array
        let sum: i64 = self.data[self.start..self.end]
            .iter()
            .map(|&x| i64::from(x))
            .sum();
        self.result.store(sum, Ordering::SeqCst);
        sum
    }
}

fn main() -> sumbench::Result<()> {
    let pool = StandardPool::new(4)?;

    // Initialize test array with 0..10
    let data: Arc<[i32]> = (0..10).collect::<Vec<i32>>().into();

    let mut tasks: Vec<Arc<SumTask>> = Vec::with_capacity(3);
    let mut handles = Vec::with_capacity(3);
    for chunk in ChunkSplitter::new(data.len(), 3)? {
        let task = Arc::new(SumTask {
            data: data.clone(),
            start: chunk.start,
            end: chunk.end,
            result: AtomicI64::new(0),
        });

        handles.push(pool.submit(task.clone())?);
        tasks.push(task);
    }

    // Aggregate partial sums in submission order
    let mut total_sum: i64 = 0;
    for (task, handle) in tasks.iter().zip(handles) {
        let partial = handle.wait()?;
        println!("[{}, {}) -> {}", task.start, task.end, partial);
        total_sum += partial;
    }

    println!("Sum: {} | average: {}", total_sum, total_sum / data.len() as i64);
    Ok(())
}
