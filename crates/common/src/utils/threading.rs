use crossbeam_channel::unbounded;

use std::{
    any::Any,
    panic::{catch_unwind, AssertUnwindSafe},
    thread,
};

/// The outcome of a single task run by [`task_pool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome<R> {
    /// The task returned normally.
    Completed(R),
    /// The task panicked. Holds the panic message, if it was a string.
    Panicked(String),
}

impl<R> TaskOutcome<R> {
    /// Returns the task's result, if it completed.
    pub fn completed(self) -> Option<R> {
        match self {
            TaskOutcome::Completed(result) => Some(result),
            TaskOutcome::Panicked(_) => None,
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => message.to_string(),
            Err(_) => String::from("task panicked"),
        },
    }
}

/// A simple thread pool which feeds `items` to `num_threads` workers over a shared queue and
/// collects one [`TaskOutcome`] per item, in the original item order.
///
/// Every item runs in isolation: a panic inside `f` is caught and recorded for that item
/// only, and the remaining items still run to completion.
///
/// ```
/// use mimir_common::utils::threading::{task_pool, TaskOutcome};
///
/// let items = vec![1, 2, 3, 4, 5];
/// let results = task_pool(items, 2, |item| item * 2);
///
/// assert_eq!(
///     results,
///     vec![2, 4, 6, 8, 10].into_iter().map(TaskOutcome::Completed).collect::<Vec<_>>()
/// );
/// ```
pub fn task_pool<T, R, F>(items: Vec<T>, num_threads: usize, f: F) -> Vec<TaskOutcome<R>>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync,
{
    // if items is empty, return empty results
    if items.is_empty() {
        return Vec::new();
    }

    let total = items.len();
    let (work_tx, work_rx) = unbounded();
    let (result_tx, result_rx) = unbounded();

    for work in items.into_iter().enumerate() {
        let _ = work_tx.send(work);
    }
    drop(work_tx);

    thread::scope(|scope| {
        for _ in 0..num_threads.clamp(1, total) {
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();
            let f = &f;

            scope.spawn(move || {
                while let Ok((index, item)) = work_rx.recv() {
                    let outcome = match catch_unwind(AssertUnwindSafe(|| f(item))) {
                        Ok(result) => TaskOutcome::Completed(result),
                        Err(payload) => TaskOutcome::Panicked(panic_message(payload)),
                    };
                    let _ = result_tx.send((index, outcome));
                }
            });
        }
    });
    drop(result_tx);

    // restore the original ordering
    let mut results: Vec<(usize, TaskOutcome<R>)> = result_rx.iter().collect();
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, outcome)| outcome).collect()
}

#[cfg(test)]
mod tests {
    use crate::utils::threading::*;

    #[test]
    fn test_task_pool_with_single_thread() {
        let items = vec![1, 2, 3, 4, 5];
        let results = task_pool(items, 1, |x: i32| x * 2);

        assert_eq!(
            results.into_iter().filter_map(TaskOutcome::completed).collect::<Vec<_>>(),
            vec![2, 4, 6, 8, 10]
        );
    }

    #[test]
    fn test_task_pool_with_more_threads_than_items() {
        let items = vec![1, 2, 3];
        let results = task_pool(items, 16, |x: i32| x + 1);

        assert_eq!(
            results.into_iter().filter_map(TaskOutcome::completed).collect::<Vec<_>>(),
            vec![2, 3, 4]
        );
    }

    #[test]
    fn test_task_pool_with_empty_items() {
        let items: Vec<i32> = Vec::new();
        let results = task_pool(items, 2, |x: i32| x * 2);
        assert!(results.is_empty());
    }

    #[test]
    fn test_task_pool_isolates_panics() {
        let items = vec![1, 2, 3, 4];
        let results = task_pool(items, 2, |x: i32| {
            if x == 3 {
                panic!("trial {x} blew up");
            }
            x
        });

        assert_eq!(results.len(), 4);
        assert_eq!(results[0], TaskOutcome::Completed(1));
        assert_eq!(results[1], TaskOutcome::Completed(2));
        assert_eq!(results[2], TaskOutcome::Panicked(String::from("trial 3 blew up")));
        assert_eq!(results[3], TaskOutcome::Completed(4));
    }
}
