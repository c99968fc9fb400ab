// SPDX-License-Identifier: MIT

use std::{thread, time::Duration};
use sumbench::standardpool::StandardPool;

fn main() -> sumbench::Result<()> {
    println!("Creating thread pool with 3 workers");
    let pool = StandardPool::new(3)?;

    // Tasks finish in a different order than they were queued in.
    let sleeps_ms = [1000u64, 500, 1500, 800, 200];

    println!("Submitting tasks...");
    let mut handles = Vec::with_capacity(sleeps_ms.len());
    for (id, sleep_ms) in sleeps_ms.into_iter().enumerate() {
        handles.push(pool.enqueue(move || {
            println!("Task {} starting", id);
            thread::sleep(Duration::from_millis(sleep_ms));
            println!("Task {} completed", id);
            sleep_ms
        })?);
    }

    println!("Collecting results in submission order...");
    for (id, handle) in handles.into_iter().enumerate() {
        println!("Task {} slept {} ms", id, handle.wait()?);
    }

    pool.join();
    println!("All tasks completed!");
    Ok(())
}
