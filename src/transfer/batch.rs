//! Batch execution with per-item outcome tracking.

use crate::error::ApiError;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use tracing::{info, warn};

/// Concurrency used when none is configured.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BatchFailure {
    pub target: String,
    pub kind: String,
    pub message: String,
}

/// Outcome of a batch: one entry per target, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub operation: String,
    pub success_count: usize,
    pub fail_count: usize,
    pub succeeded: Vec<String>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.success_count + self.fail_count
    }

    pub fn is_clean(&self) -> bool {
        self.fail_count == 0
    }
}

/// Run `op` once per target with at most `concurrency` items in flight.
///
/// Every item runs to completion; a failure is recorded and the remaining
/// items continue.
pub async fn run_batch<T, F, Fut>(
    operation: &str,
    targets: Vec<T>,
    concurrency: usize,
    op: F,
) -> BatchReport
where
    T: Display,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<(), ApiError>>,
{
    let results: Vec<(String, Result<(), ApiError>)> = stream::iter(targets.into_iter().map(|target| {
        let label = target.to_string();
        let fut = op(target);
        async move { (label, fut.await) }
    }))
    .buffered(concurrency.max(1))
    .collect()
    .await;

    let mut report = BatchReport {
        operation: operation.to_string(),
        ..Default::default()
    };
    for (target, result) in results {
        match result {
            Ok(()) => {
                report.success_count += 1;
                report.succeeded.push(target);
            }
            Err(e) => {
                warn!(operation, target = %target, kind = e.kind(), error = %e, "Batch item failed");
                report.fail_count += 1;
                report.failures.push(BatchFailure {
                    target,
                    kind: e.kind().to_string(),
                    message: e.to_string(),
                });
            }
        }
    }
    info!(
        operation,
        success = report.success_count,
        failed = report.fail_count,
        "Batch finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_failures_do_not_stop_remaining_items() {
        let calls = Arc::new(AtomicUsize::new(0));
        let report = run_batch("test", vec![1, 2, 3, 4], 2, |n| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                if n % 2 == 0 {
                    Err(ApiError::PreconditionFailed(format!("even {}", n)))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(report.success_count, 2);
        assert_eq!(report.fail_count, 2);
        assert_eq!(report.succeeded, vec!["1", "3"]);
        assert_eq!(report.failures[0].target, "2");
        assert!(report.failures[1].message.contains("even 4"));
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_runs() {
        let report = run_batch("noop", vec!["a"], 0, |_| async { Ok(()) }).await;
        assert_eq!(report.total(), 1);
        assert!(report.is_clean());
    }
}
