//! Polling state machine for asynchronous generation jobs.
//!
//! A job starts `Pending`. Each poll waits a fixed interval, asks a
//! [`StatusSource`] for the latest report and feeds it through [`next_state`].
//! The loop ends on `Active`, `Failed`, or once the attempt budget is spent.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::lightx_model::OrderStatus;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

pub const GENERATION_FAILED_MESSAGE: &str = "Hairstyle generation failed";
pub const GENERATION_TIMEOUT_MESSAGE: &str = "Timeout while waiting for hairstyle generation";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Pending,
    /// Terminal success with the provider's output URL, untouched.
    Active(String),
    Failed,
    TimedOut,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Pending)
    }
}

/// Maps one status report to the state it puts the job in.
///
/// An `active` report without an output URL cannot be used and counts as a
/// failure. Unknown or missing statuses keep the job pending.
pub fn next_state(report: &OrderStatus) -> JobState {
    match (report.status.as_deref(), report.output.as_deref()) {
        (Some("active"), Some(output)) if !output.trim().is_empty() => {
            JobState::Active(output.to_string())
        }
        (Some("active"), _) | (Some("failed"), _) => JobState::Failed,
        _ => JobState::Pending,
    }
}

/// Anything that can report the status of a submitted job.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn order_status(&self, order_id: &str) -> Result<OrderStatus, AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    /// Uses the provider's declared budget, falling back to
    /// [`DEFAULT_MAX_ATTEMPTS`] when it is absent or zero.
    pub fn new(interval: Duration, declared_attempts: Option<u32>) -> Self {
        Self {
            interval,
            max_attempts: declared_attempts
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
        }
    }
}

/// Polls until the job reaches a terminal state and returns the raw output
/// URL on success.
///
/// Errors from the status source propagate immediately and are not retried.
pub async fn poll_until_terminal<S>(
    source: &S,
    order_id: &str,
    policy: PollPolicy,
) -> Result<String, AppError>
where
    S: StatusSource + ?Sized,
{
    let mut state = JobState::Pending;
    let mut attempts = 0;

    while !state.is_terminal() {
        if attempts >= policy.max_attempts {
            state = JobState::TimedOut;
            break;
        }

        tokio::time::sleep(policy.interval).await;

        let report = source.order_status(order_id).await?;
        attempts += 1;
        tracing::info!(
            order_id,
            attempt = attempts,
            max_attempts = policy.max_attempts,
            "Status check: {}",
            report.status.as_deref().unwrap_or("<none>")
        );

        state = next_state(&report);
    }

    match state {
        JobState::Active(output) => {
            tracing::info!(order_id, "Generation complete, result URL: {}", output);
            Ok(output)
        }
        JobState::Failed => Err(AppError::upstream(GENERATION_FAILED_MESSAGE)),
        JobState::TimedOut | JobState::Pending => Err(AppError::UpstreamTimeout(
            GENERATION_TIMEOUT_MESSAGE.to_string(),
        )),
    }
}

/// Drops everything from the first `?`, which removes transient signing
/// parameters from provider URLs.
pub fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

/// Builds the same-origin relay URL for `image_url`.
pub fn proxy_url(origin: &str, image_url: &str) -> String {
    format!(
        "{}/image-proxy?url={}",
        origin.trim_end_matches('/'),
        urlencoding::encode(image_url)
    )
}
