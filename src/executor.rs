//! The task executor port used to fan a query out across workers.
//!
//! The engine never spawns threads itself. It hands a batch of jobs to a
//! [`TaskExecutor`] supplied by the host and waits for all of them.
//!
//! # Available Executors
//!
//! - [`Sequential`]: runs every job inline on the calling thread.
//! - [`GlobalPool`] (feature `parallel`): rayon's global thread pool.
//! - `rayon::ThreadPool` (feature `parallel`): a pool built by the host.

use crate::error::Result;

/// A unit of work handed to an executor. It may borrow from the caller's stack.
pub type Job<'a> = Box<dyn FnOnce() + Send + 'a>;

/// Runs batches of jobs on behalf of the engine.
///
/// `execute` must not return before every job in the batch has finished, so
/// jobs may safely borrow data owned by the caller. Jobs handed over by the
/// engine never panic; they report failures through their own results.
pub trait TaskExecutor: Send + Sync {
  /// How many jobs can make progress at the same time. Used to size chunks.
  fn worker_count(&self) -> usize;

  /// Runs every job and blocks until all of them completed.
  fn execute<'a>(&self, jobs: Vec<Job<'a>>) -> Result<()>;
}

/// Runs jobs one after another on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl TaskExecutor for Sequential {
  fn worker_count(&self) -> usize {
    1
  }

  fn execute<'a>(&self, jobs: Vec<Job<'a>>) -> Result<()> {
    for job in jobs {
      job();
    }
    Ok(())
  }
}

/// Runs jobs on rayon's global thread pool.
#[cfg(feature = "parallel")]
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalPool;

#[cfg(feature = "parallel")]
impl TaskExecutor for GlobalPool {
  fn worker_count(&self) -> usize {
    rayon::current_num_threads()
  }

  fn execute<'a>(&self, jobs: Vec<Job<'a>>) -> Result<()> {
    rayon::scope(|scope| {
      for job in jobs {
        scope.spawn(move |_| job());
      }
    });
    Ok(())
  }
}

#[cfg(feature = "parallel")]
impl TaskExecutor for rayon::ThreadPool {
  fn worker_count(&self) -> usize {
    self.current_num_threads()
  }

  fn execute<'a>(&self, jobs: Vec<Job<'a>>) -> Result<()> {
    self.scope(|scope| {
      for job in jobs {
        scope.spawn(move |_| job());
      }
    });
    Ok(())
  }
}

/// The executor used when the host does not inject one.
pub fn default_executor() -> std::sync::Arc<dyn TaskExecutor> {
  #[cfg(feature = "parallel")]
  {
    std::sync::Arc::new(GlobalPool)
  }
  #[cfg(not(feature = "parallel"))]
  {
    std::sync::Arc::new(Sequential)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};

  fn run_counting(executor: &dyn TaskExecutor, jobs: usize) -> usize {
    let counter = AtomicUsize::new(0);
    let batch: Vec<Job<'_>> = (0..jobs)
      .map(|_| {
        let counter = &counter;
        Box::new(move || {
          counter.fetch_add(1, Ordering::SeqCst);
        }) as Job<'_>
      })
      .collect();
    executor.execute(batch).unwrap();
    counter.load(Ordering::SeqCst)
  }

  #[test]
  fn test_sequential_runs_every_job() {
    assert_eq!(Sequential.worker_count(), 1);
    assert_eq!(run_counting(&Sequential, 17), 17);
  }

  #[cfg(feature = "parallel")]
  #[test]
  fn test_thread_pool_runs_every_job() {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(3).build().unwrap();
    assert_eq!(TaskExecutor::worker_count(&pool), 3);
    assert_eq!(run_counting(&pool, 64), 64);
  }

  #[cfg(feature = "parallel")]
  #[test]
  fn test_global_pool_runs_every_job() {
    assert!(GlobalPool.worker_count() >= 1);
    assert_eq!(run_counting(&GlobalPool, 32), 32);
  }
}
