//! Rate-limited bulk mutation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET;

/// Per-item result of a bulk mutation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationOutcome {
    /// The operation was attempted and succeeded.
    Applied,
    /// The predicate rejected the item; no remote call was made.
    Skipped,
    /// The operation was attempted and failed; reported, not fatal.
    Failed,
}

/// Summary counts over a sequence of [`MutationOutcome`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationReport {
    /// Items whose operation succeeded.
    pub applied: usize,
    /// Items the predicate rejected.
    pub skipped: usize,
    /// Items whose operation failed.
    pub failed: usize,
}

impl MutationReport {
    /// Tallies a report from per-item outcomes.
    pub fn from_outcomes(outcomes: &[MutationOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut report, outcome| {
            match outcome {
                MutationOutcome::Applied => report.applied += 1,
                MutationOutcome::Skipped => report.skipped += 1,
                MutationOutcome::Failed => report.failed += 1,
            }
            report
        })
    }

    /// Total number of items visited.
    pub fn total(&self) -> usize {
        self.applied + self.skipped + self.failed
    }
}

/// Applies a remote mutation to every item that passes the predicate,
/// pacing attempted calls with a fixed delay.
///
/// Items are visited exactly once, in input order, and one outcome is
/// recorded per item. A failed operation is handed to `on_error` (a
/// reporting hook, e.g. logging) and recorded as [`MutationOutcome::Failed`];
/// the batch always runs to completion, so partial completion is observable
/// from the outcomes rather than from an early return.
///
/// The delay follows every *attempted* operation, success or failure;
/// skipped items incur none. It is a preventive measure against the remote
/// call-rate ceiling, not a reactive backoff: a rate-limit rejection is just
/// another per-item failure here.
///
/// Nested mutations tied to an item (deleting a message's attachments after
/// the message itself) belong inside `operation`, paced with the same delay;
/// their failure fails the parent item and nothing else.
pub async fn apply_all<T, E, P, Op, Fut, H>(
    items: &[T],
    mut predicate: P,
    mut operation: Op,
    delay: Duration,
    mut on_error: H,
) -> Vec<MutationOutcome>
where
    P: FnMut(&T) -> bool,
    Op: FnMut(&T) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    H: FnMut(&T, &E),
    E: std::fmt::Display,
{
    let mut outcomes = Vec::with_capacity(items.len());

    for item in items {
        if !predicate(item) {
            outcomes.push(MutationOutcome::Skipped);
            continue;
        }

        match operation(item).await {
            Ok(()) => outcomes.push(MutationOutcome::Applied),
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "bulk mutation failed for one item, continuing"
                );
                on_error(item, &error);
                outcomes.push(MutationOutcome::Failed);
            }
        }

        tokio::time::sleep(delay).await;
    }

    let report = MutationReport::from_outcomes(&outcomes);
    tracing::debug!(
        target: TRACING_TARGET,
        applied = report.applied,
        skipped = report.skipped,
        failed = report.failed,
        "bulk mutation complete"
    );

    outcomes
}
