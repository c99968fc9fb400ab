// SPDX-License-Identifier: MIT

use std::sync::{atomic::Ordering::SeqCst, mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;
use sumbench::standardpool::{PoolState, StandardPool, Task};
use sumbench::Error;
use test_utils::slices_utils::{iota, iota_sum, shared_ones};
use test_utils::tasks::{
    get_subslice_sum_tasks, FailingTask, SharedCounterTask,
};

#[test]
fn test_functionality_shared_variable() {
    // Set up test parameters
    let num_workers = 32;
    let total_tasks = 2048;
    let pool = StandardPool::new(num_workers).unwrap();
    let shared_counter = Arc::new(Mutex::new(0));

    // Run tasks in 8 batches, waiting on every handle between batches.
    for _ in 0..8 {
        let handles: Vec<_> = (0..total_tasks / 8)
            .map(|_| {
                pool.submit(Arc::new(SharedCounterTask::new(
                    shared_counter.clone(),
                )))
                .unwrap()
            })
            .collect();
        for handle in handles {
            handle.wait().unwrap();
        }
    }

    assert_eq!(*shared_counter.lock().unwrap(), total_tasks);
}

#[test]
fn test_functionality_subslices() {
    let num_workers: usize = 32; // 2^5
    let num_tasks: usize = 4096; // 2^12
    let array_size: usize = 4194304; // 2^22

    let pool = StandardPool::new(num_workers).unwrap();

    // Create array of 1s that will be summed.
    let array = shared_ones(array_size);

    // Create tasks that each sum a portion of the array.
    let tasks = get_subslice_sum_tasks(array.clone(), num_tasks);
    let handles: Vec<_> = tasks
        .iter()
        .map(|task| pool.submit(task.clone()).unwrap())
        .collect();

    let mut total_sum = 0i64;
    for handle in handles {
        total_sum += handle.wait().unwrap();
    }

    // Verify sum equals array size (since array contains all 1s).
    assert_eq!(total_sum, array_size as i64);

    // Tasks keep their own copy of the result once the pool is gone.
    pool.join();
    let recorded: i64 =
        tasks.iter().map(|t| t.subslice_sum.load(SeqCst)).sum();
    assert_eq!(recorded, array_size as i64);
}

#[test]
fn test_results_match_standalone_execution() {
    let pool = StandardPool::new(4).unwrap();
    let array: Arc<[i32]> = iota(10_000).into();
    let tasks = get_subslice_sum_tasks(array, 37);

    let handles: Vec<_> = tasks
        .iter()
        .map(|task| pool.submit(task.clone()).unwrap())
        .collect();
    let pooled: Vec<i64> =
        handles.into_iter().map(|h| h.wait().unwrap()).collect();

    let standalone: Vec<i64> = tasks
        .iter()
        .map(|task| task.execute())
        .collect();

    assert_eq!(pooled.len(), 37);
    assert_eq!(pooled, standalone);
    assert_eq!(pooled.iter().sum::<i64>(), iota_sum(10_000));
}

#[test]
fn test_failing_task_does_not_affect_siblings() {
    let pool = StandardPool::new(3).unwrap();
    let tasks = get_subslice_sum_tasks(shared_ones(300), 3);

    let first = pool.submit(tasks[0].clone()).unwrap();
    let failing = pool
        .submit(Arc::new(FailingTask {
            message: "bad chunk",
        }))
        .unwrap();
    let rest: Vec<_> = tasks[1..]
        .iter()
        .map(|task| pool.submit(task.clone()).unwrap())
        .collect();

    assert_eq!(first.wait().unwrap(), 100);
    assert!(matches!(
        failing.wait(),
        Err(Error::TaskPanicked(message)) if message == "bad chunk"
    ));
    for handle in rest {
        assert_eq!(handle.wait().unwrap(), 100);
    }
}

#[test]
fn test_concurrent_submitters() {
    let pool = Arc::new(StandardPool::new(4).unwrap());

    let submitters: Vec<_> = (0..8i64)
        .map(|id| {
            let pool = pool.clone();
            thread::spawn(move || {
                let handles: Vec<_> = (0..100i64)
                    .map(|i| pool.enqueue(move || id * 1000 + i).unwrap())
                    .collect();
                handles
                    .into_iter()
                    .map(|h| h.wait().unwrap())
                    .sum::<i64>()
            })
        })
        .collect();

    let total: i64 = submitters.into_iter().map(|s| s.join().unwrap()).sum();
    // Each submitter sums 100 * id * 1000 + (0 + ... + 99).
    let expected: i64 = (0..8i64).map(|id| 100 * id * 1000 + 4950).sum();
    assert_eq!(total, expected);
}

#[test]
fn test_shutdown_waits_for_queued_tasks() {
    let pool = StandardPool::new(2).unwrap();
    let handles: Vec<_> = (0..16u64)
        .map(|i| {
            pool.enqueue(move || {
                thread::sleep(Duration::from_millis(2));
                i
            })
            .unwrap()
        })
        .collect();

    pool.shutdown();
    assert!(matches!(pool.enqueue(|| 0u64), Err(Error::PoolClosed)));
    assert_ne!(pool.state(), PoolState::Running);
    pool.join();

    let results: Vec<u64> =
        handles.into_iter().map(|h| h.wait().unwrap()).collect();
    assert_eq!(results, (0..16u64).collect::<Vec<_>>());
}

#[test]
fn test_pool_dropped_from_its_own_worker() {
    let pool = Arc::new(StandardPool::new(2).unwrap());
    let (done_tx, done_rx) = mpsc::channel();

    let last_ref = pool.clone();
    let handle = pool
        .enqueue(move || {
            // Give the caller time to release its reference first.
            thread::sleep(Duration::from_millis(50));
            drop(last_ref);
            done_tx.send(()).unwrap();
            7
        })
        .unwrap();
    drop(pool);

    // Joining the dropping worker from itself would hang here.
    done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("pool drop on a worker did not return");
    assert_eq!(handle.wait().unwrap(), 7);
}
