// ABOUTME: Unified error types for the meal scan pipeline
// ABOUTME: ScanError with transient-failure classification driving the single-retry policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealscan Labs

//! # Error Handling
//!
//! All pipeline fallibility funnels into [`ScanError`]. Recovery and scoring
//! are total functions and never construct errors; acquisition and the
//! collaborator traits do. Cancellation is deliberately *not* an error
//! variant: an abandoned scan is aborted at the task level so it can never be
//! misread as a failure eligible for retry.

use thiserror::Error;

use crate::constants::acquisition::TRANSIENT_MARKERS;

/// Result alias used throughout the pipeline
pub type PipelineResult<T> = Result<T, ScanError>;

/// Unified error type for scan acquisition and collaborator calls
#[derive(Debug, Error)]
pub enum ScanError {
    /// The recognition provider reported a failure.
    ///
    /// The message is the provider's human-readable failure text; it drives
    /// retry classification via [`ScanError::is_transient`].
    #[error("recognition provider failed: {message}")]
    Provider {
        /// Human-readable failure message from the provider
        message: String,
    },

    /// A provider attempt exceeded its time budget
    #[error("recognition timed out after {seconds}s")]
    Timeout {
        /// The budget that elapsed, in whole seconds
        seconds: u64,
    },

    /// The capture itself was unusable (rejected input, never retried)
    #[error("invalid scan input: {message}")]
    InvalidInput {
        /// What was wrong with the input
        message: String,
    },

    /// A persistence or hand-off collaborator failed.
    ///
    /// These are best-effort writes; the session logs them and never blocks
    /// the user's result on them.
    #[error("summary store failed: {message}")]
    Store {
        /// What the collaborator reported
        message: String,
    },

    /// Configuration could not be loaded or was out of range
    #[error("configuration error: {message}")]
    Config {
        /// What was wrong with the configuration
        message: String,
    },
}

impl ScanError {
    /// Provider failure with a human-readable message
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Attempt timeout after the given budget
    #[must_use]
    pub const fn timeout(seconds: u64) -> Self {
        Self::Timeout { seconds }
    }

    /// Rejected input (never retried)
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Collaborator write failure
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Configuration failure
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this failure is transient and worth exactly one automatic retry.
    ///
    /// Timeouts are always transient. Provider failures are classified by
    /// case-insensitive substring inspection of the failure message; anything
    /// unrecognized is treated as permanent-for-this-request and surfaced with
    /// a manual retry action instead.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Provider { message } => {
                let lowered = message.to_lowercase();
                TRANSIENT_MARKERS
                    .iter()
                    .any(|marker| lowered.contains(marker))
            }
            Self::InvalidInput { .. } | Self::Store { .. } | Self::Config { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_transient() {
        assert!(ScanError::timeout(45).is_transient());
    }

    #[test]
    fn provider_message_classification_is_case_insensitive() {
        assert!(ScanError::provider("Network Timeout").is_transient());
        assert!(ScanError::provider("CONNECTION reset by peer").is_transient());
        assert!(!ScanError::provider("invalid image").is_transient());
    }

    #[test]
    fn non_provider_failures_are_not_retried() {
        assert!(!ScanError::invalid_input("blurry capture").is_transient());
        assert!(!ScanError::store("disk full").is_transient());
        assert!(!ScanError::config("timeout missing").is_transient());
    }
}
