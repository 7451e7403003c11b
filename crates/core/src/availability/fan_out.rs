//! Best-effort concurrent fan-out
//!
//! The degrade-on-failure policy for provider fetches lives here, in one
//! auditable place: independent tasks run concurrently, failures are
//! collected rather than propagated, and the caller decides what a failure
//! costs.

use std::future::Future;

use futures::future::join_all;

/// Outcome of a settled fan-out.
#[derive(Debug)]
pub struct Settled<T, E> {
    pub successes: Vec<T>,
    /// Failures keyed by the label supplied with the task.
    pub failures: Vec<(String, E)>,
}

impl<T, E> Default for Settled<T, E> {
    fn default() -> Self {
        Self { successes: Vec::new(), failures: Vec::new() }
    }
}

/// Run labeled, independent, fallible tasks concurrently and split the
/// outcomes. One task failing never aborts its siblings.
pub async fn join_settled<T, E, F>(tasks: Vec<(String, F)>) -> Settled<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let (labels, futures): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();
    let results = join_all(futures).await;

    let mut settled = Settled::default();
    for (label, result) in labels.into_iter().zip(results) {
        match result {
            Ok(value) => settled.successes.push(value),
            Err(error) => settled.failures.push((label, error)),
        }
    }
    settled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn splits_successes_from_failures() {
        let tasks = vec![
            ("ok-1".to_string(), make_task(Ok(1))),
            ("bad".to_string(), make_task(Err("boom"))),
            ("ok-2".to_string(), make_task(Ok(2))),
        ];

        let settled = join_settled(tasks).await;

        assert_eq!(settled.successes, vec![1, 2]);
        assert_eq!(settled.failures.len(), 1);
        assert_eq!(settled.failures[0].0, "bad");
    }

    #[tokio::test]
    async fn empty_task_list_settles_empty() {
        let settled: Settled<i32, &str> =
            join_settled(Vec::<(String, std::future::Ready<Result<i32, &str>>)>::new()).await;

        assert!(settled.successes.is_empty());
        assert!(settled.failures.is_empty());
    }

    fn make_task(result: Result<i32, &'static str>) -> std::future::Ready<Result<i32, &'static str>> {
        std::future::ready(result)
    }
}
