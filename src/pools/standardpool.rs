// SPDX-License-Identifier: MIT

use crate::error::{Error, Result};
use crate::pools::handle::{self, TaskHandle};
use log::{debug, trace, warn};
use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;

/// Trait defining a reusable task structure, with an execute method to be
/// implemented by each task. Tasks are submitted with
/// [`StandardPool::submit`] and may be shared with the caller through the
/// `Arc` they are submitted in.
pub trait Task {
    type Output;

    fn execute(&self) -> Self::Output;
}

/// Type-erased unit of work as stored in the queue.
type Job = Box<dyn FnOnce() + Send + 'static>;

/// Observable lifecycle of a [`StandardPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    /// Accepting and executing tasks.
    Running,
    /// No longer accepting tasks; workers drain what is already queued.
    ShuttingDown,
    /// Every worker has exited.
    Stopped,
}

/// Shared data of the pool, holding the task queue and the shutdown
/// bookkeeping.
struct SchedulerSharedData {
    /// Queue of tasks for worker threads.
    task_queue: VecDeque<Job>,
    /// Flag to signal shutdown to worker threads.
    shutdown_flag: bool,
    /// Workers whose loop has not returned yet.
    live_workers: usize,
}

impl SchedulerSharedData {
    fn new() -> Self {
        SchedulerSharedData {
            task_queue: VecDeque::with_capacity(128),
            shutdown_flag: false,
            live_workers: 0,
        }
    }
}

/// Fixed-size pool of worker threads that consume a shared FIFO queue and
/// hand results back through [`TaskHandle`]s.
///
/// Dropping the pool (or calling [`StandardPool::join`]) stops accepting
/// tasks, lets the workers finish everything already queued and joins them.
pub struct StandardPool {
    /// Pool of worker threads.
    worker_threads: Vec<thread::JoinHandle<()>>,
    /// Shared data protected by a mutex.
    shared_data: Arc<Mutex<SchedulerSharedData>>,
    /// Condition variable to notify workers of new tasks or shutdown.
    task_available: Arc<Condvar>,
}

/// Locks the shared data, recovering it if a previous holder panicked.
fn lock_shared(
    shared_data: &Mutex<SchedulerSharedData>,
) -> MutexGuard<'_, SchedulerSharedData> {
    match shared_data.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            shared_data.clear_poison();
            poisoned.into_inner()
        }
    }
}

fn worker_loop(
    shared_data: Arc<Mutex<SchedulerSharedData>>,
    task_available: Arc<Condvar>,
) {
    loop {
        let job = {
            let mut shared_data_guard = lock_shared(&shared_data);

            // Wait until there is a task to process or a shutdown signal.
            while shared_data_guard.task_queue.is_empty()
                && !shared_data_guard.shutdown_flag
            {
                shared_data_guard = task_available
                    .wait(shared_data_guard)
                    .unwrap_or_else(|e| e.into_inner());
            }

            // The queue is drained before shutdown is honoured.
            match shared_data_guard.task_queue.pop_front() {
                Some(job) => job,
                None => {
                    shared_data_guard.live_workers -= 1;
                    break;
                }
            }
        };

        // Execute the task outside the lock scope.
        job();
    }
    trace!("{:?} exiting", thread::current().name());
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl StandardPool {
    /// Creates a pool with the specified number of worker threads.
    ///
    /// Fails with [`Error::NoWorkers`] when `thread_count` is zero and with
    /// [`Error::Spawn`] when the OS refuses a thread; workers spawned before
    /// the failure are shut down.
    pub fn new(thread_count: usize) -> Result<Self> {
        if thread_count == 0 {
            return Err(Error::NoWorkers);
        }

        let mut pool = StandardPool {
            worker_threads: Vec::with_capacity(thread_count),
            shared_data: Arc::new(Mutex::new(SchedulerSharedData::new())),
            task_available: Arc::new(Condvar::new()),
        };

        // Spawn worker threads that wait for tasks to be added to the task
        // queue.
        for index in 0..thread_count {
            let shared_data = pool.shared_data.clone();
            let task_condvar = pool.task_available.clone();

            lock_shared(&pool.shared_data).live_workers += 1;
            let spawned = thread::Builder::new()
                .name(format!("sumbench-worker-{index}"))
                .spawn(move || worker_loop(shared_data, task_condvar));

            match spawned {
                Ok(handle) => pool.worker_threads.push(handle),
                Err(err) => {
                    lock_shared(&pool.shared_data).live_workers -= 1;
                    return Err(Error::Spawn(err));
                }
            }
        }

        debug!("started pool with {} workers", thread_count);
        Ok(pool)
    }

    /// Adds a closure to the back of the task queue, notifies one waiting
    /// worker and returns a handle to the closure's result.
    ///
    /// Safe to call from several threads at once and from inside a running
    /// task. A panic inside `task` is caught on the worker and reported as
    /// [`Error::TaskPanicked`] through the returned handle only.
    pub fn enqueue<F, R>(&self, task: F) -> Result<TaskHandle<R>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (completer, task_handle) = handle::channel();
        let job: Job = Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(task))
                .map_err(|payload| {
                    let message = panic_message(&*payload);
                    warn!("task panicked: {}", message);
                    Error::TaskPanicked(message)
                });
            completer.complete(outcome);
        });

        let mut shared_data_guard = lock_shared(&self.shared_data);
        if shared_data_guard.shutdown_flag {
            return Err(Error::PoolClosed);
        }
        shared_data_guard.task_queue.push_back(job);
        trace!(
            "queued task, {} waiting",
            shared_data_guard.task_queue.len()
        );
        self.task_available.notify_one();

        Ok(task_handle)
    }

    /// Submits a shared [`Task`] implementor.
    pub fn submit<T>(&self, task: Arc<T>) -> Result<TaskHandle<T::Output>>
    where
        T: Task + Send + Sync + 'static,
        T::Output: Send + 'static,
    {
        self.enqueue(move || task.execute())
    }

    /// Stops accepting tasks and wakes every worker. Tasks already queued
    /// still run. Does not block.
    pub fn shutdown(&self) {
        let mut shared_data_guard = lock_shared(&self.shared_data);
        if !shared_data_guard.shutdown_flag {
            debug!(
                "shutting down pool, {} tasks still queued",
                shared_data_guard.task_queue.len()
            );
        }
        shared_data_guard.shutdown_flag = true;
        self.task_available.notify_all();
    }

    /// Shuts the pool down and waits for every worker to exit.
    pub fn join(mut self) {
        self.shutdown_and_join();
    }

    pub fn state(&self) -> PoolState {
        let shared_data_guard = lock_shared(&self.shared_data);
        if !shared_data_guard.shutdown_flag {
            PoolState::Running
        } else if shared_data_guard.live_workers > 0 {
            PoolState::ShuttingDown
        } else {
            PoolState::Stopped
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_threads.len()
    }

    /// Number of queued tasks no worker has claimed yet.
    pub fn pending(&self) -> usize {
        lock_shared(&self.shared_data).task_queue.len()
    }

    fn shutdown_and_join(&mut self) {
        self.shutdown();

        // A task holding the last reference to the pool drops it on a worker;
        // that worker cannot join itself and exits once its task returns.
        let current = thread::current().id();
        for handler in self.worker_threads.drain(..) {
            if handler.thread().id() == current {
                continue;
            }
            if handler.join().is_err() {
                warn!("worker thread panicked outside of a task");
            }
        }
    }
}

impl Drop for StandardPool {
    /// Signals the workers to shut down once the queue is drained and joins
    /// them.
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}
