// ABOUTME: Acquisition controller calling the recognition provider with bounded latency
// ABOUTME: Two-attempt policy, transient-failure classification, 700ms backoff, cancel-safe
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealscan Labs

//! # Acquisition Controller
//!
//! Issues the recognition request so the caller is never left waiting
//! indefinitely: a first attempt under a 45 s budget, then, only for
//! transient failures, a single second attempt under a 35 s budget after a
//! short backoff. This is a two-attempt bounded-backoff policy, not an
//! unbounded retry loop; permanent-for-this-request failures surface to the
//! user with a manual retry action instead.
//!
//! The controller future is cancel-safe: aborting the task that drives it
//! stops the in-flight timeout race immediately, and cancellation is never
//! reinterpreted as a failure eligible for retry (it is not an `Err` at all).

use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, warn};

use crate::config::ScanConfig;
use crate::errors::PipelineResult;
use crate::models::{PendingScanRequest, RawScanResult};
use crate::providers::RecognitionProvider;

/// Bounded-latency wrapper around the recognition provider
#[derive(Debug, Clone, Default)]
pub struct AcquisitionController {
    config: ScanConfig,
}

impl AcquisitionController {
    /// Build a controller with the given timing configuration
    #[must_use]
    pub const fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Call the provider with timeout and exactly one retry.
    ///
    /// `on_retry` is invoked with a mode-appropriate transient status message
    /// just before the second attempt starts, so the session can surface
    /// "retrying" feedback.
    ///
    /// # Errors
    ///
    /// Returns the first attempt's error when it is non-transient, otherwise
    /// the second attempt's outcome, whatever it is.
    pub async fn acquire<F>(
        &self,
        provider: &dyn RecognitionProvider,
        request: &PendingScanRequest,
        on_retry: F,
    ) -> PipelineResult<RawScanResult>
    where
        F: Fn(&str),
    {
        match self
            .attempt(provider, request, self.config.first_attempt_timeout)
            .await
        {
            Ok(raw) => Ok(raw),
            Err(err) if err.is_transient() => {
                let notice = request.input_mode.retry_notice();
                warn!(
                    error = %err,
                    backoff_ms = self.config.retry_backoff.as_millis() as u64,
                    "transient acquisition failure, retrying once"
                );
                on_retry(notice);
                sleep(self.config.retry_backoff).await;
                self.attempt(provider, request, self.config.second_attempt_timeout)
                    .await
            }
            Err(err) => {
                debug!(error = %err, "non-transient acquisition failure, not retrying");
                Err(err)
            }
        }
    }

    async fn attempt(
        &self,
        provider: &dyn RecognitionProvider,
        request: &PendingScanRequest,
        budget: Duration,
    ) -> PipelineResult<RawScanResult> {
        match timeout(
            budget,
            provider.scan(&request.image_bytes, request.declared_meal_type),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_elapsed) => Err(crate::errors::ScanError::timeout(budget.as_secs())),
        }
    }
}
