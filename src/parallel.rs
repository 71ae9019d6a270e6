//! Bounded worker pool for independent blocking fetches.
//!
//! Registry and ontology lookups within one batch never depend on each other,
//! so a fixed number of scoped threads drain a shared work queue and results
//! are correlated back to their input, never to completion order. Callers
//! re-sort deterministically afterward.

use std::collections::VecDeque;
use std::sync::Mutex;

/// Run `f` over `items` on at most `max_workers` threads.
///
/// Output order matches input order. `f` must be infallible at this level;
/// fetch failures are converted to fallback values inside `f` per the
/// batch-isolation contract.
pub fn run_parallel<T, R, F>(items: Vec<T>, max_workers: usize, f: F) -> Vec<R>
where
    T: Send + Sync,
    R: Send,
    F: Fn(&T) -> R + Send + Sync,
{
    if items.is_empty() {
        return Vec::new();
    }
    let workers = max_workers.max(1).min(items.len());
    if workers == 1 {
        return items.iter().map(|item| f(item)).collect();
    }

    let queue: Mutex<VecDeque<usize>> = Mutex::new((0..items.len()).collect());
    let slots: Vec<Mutex<Option<R>>> = items.iter().map(|_| Mutex::new(None)).collect();

    std::thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let idx = {
                    let mut q = queue.lock().expect("work queue lock");
                    match q.pop_front() {
                        Some(idx) => idx,
                        None => break,
                    }
                };
                let result = f(&items[idx]);
                *slots[idx].lock().expect("result slot lock") = Some(result);
            });
        }
    });

    slots
        .into_iter()
        .map(|slot| {
            slot.into_inner()
                .expect("result slot lock")
                .expect("worker filled every claimed slot")
        })
        .collect()
}
