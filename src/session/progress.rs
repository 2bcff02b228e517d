// ABOUTME: Perceived-progress ticker types and the step-advancing task body
// ABOUTME: Cosmetic only, always aborted when the real scan outcome arrives
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealscan Labs

//! Progress ticker.
//!
//! While a scan is in flight the session shows a fixed, mode-specific
//! sequence of labeled steps advancing on a timer. The sequence carries no
//! semantic weight; it exists so the user sees movement during a call that
//! can take tens of seconds. The driving task is aborted the moment the real
//! outcome arrives, whatever that outcome is, so the indicator can neither
//! race past completion nor linger after it.

use serde::Serialize;
use tokio::time::{sleep, Duration};

/// One visible step of the progress sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressUpdate {
    /// Zero-based index of the current step
    pub step: usize,
    /// Total number of steps in this mode's sequence
    pub total: usize,
    /// Step label shown to the user
    pub label: &'static str,
    /// Synthetic completion percentage, always short of 100
    pub percent: u8,
}

/// Advance through `steps`, reporting each one, then hold on the last.
///
/// `publish` writes into the session record. The future never completes on
/// its own after the last step; the session aborts it.
pub(crate) async fn run_ticker<F>(steps: &'static [(&'static str, u64)], publish: F)
where
    F: Fn(ProgressUpdate) + Send + 'static,
{
    let total = steps.len();
    for (step, (label, dwell_ms)) in steps.iter().enumerate() {
        // Percent is deliberately capped short of 100 so the bar cannot
        // finish before the real call does.
        let percent = (((step + 1) * 100) / (total + 1)) as u8;
        publish(ProgressUpdate {
            step,
            total,
            label,
            percent,
        });
        sleep(Duration::from_millis(*dwell_ms)).await;
    }
    // Hold on the last step until the session aborts this task.
    std::future::pending::<()>().await;
}
