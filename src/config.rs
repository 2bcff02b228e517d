// ABOUTME: Runtime configuration for the scan pipeline with environment overrides
// ABOUTME: Timeout and backoff tuning without recompilation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealscan Labs

//! Scan pipeline configuration.
//!
//! Defaults come from [`crate::constants::acquisition`]; each value can be
//! overridden through `MEALSCAN_*` environment variables for deployments that
//! need tighter or looser latency budgets.

use std::env;
use std::time::Duration;

use crate::constants::acquisition;
use crate::errors::{PipelineResult, ScanError};

/// Tunable timing parameters for acquisition and retry
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Time budget for the first provider attempt
    pub first_attempt_timeout: Duration,
    /// Time budget for the second (and last) provider attempt
    pub second_attempt_timeout: Duration,
    /// Delay between the two attempts
    pub retry_backoff: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            first_attempt_timeout: Duration::from_secs(acquisition::FIRST_ATTEMPT_TIMEOUT_SECS),
            second_attempt_timeout: Duration::from_secs(acquisition::SECOND_ATTEMPT_TIMEOUT_SECS),
            retry_backoff: Duration::from_millis(acquisition::RETRY_BACKOFF_MS),
        }
    }
}

impl ScanConfig {
    /// Build configuration from environment variables, falling back to defaults.
    ///
    /// Recognized variables:
    /// - `MEALSCAN_FIRST_TIMEOUT_SECS`
    /// - `MEALSCAN_SECOND_TIMEOUT_SECS`
    /// - `MEALSCAN_RETRY_BACKOFF_MS`
    pub fn from_env() -> PipelineResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            first_attempt_timeout: Duration::from_secs(parse_env_u64(
                "MEALSCAN_FIRST_TIMEOUT_SECS",
                defaults.first_attempt_timeout.as_secs(),
            )?),
            second_attempt_timeout: Duration::from_secs(parse_env_u64(
                "MEALSCAN_SECOND_TIMEOUT_SECS",
                defaults.second_attempt_timeout.as_secs(),
            )?),
            retry_backoff: Duration::from_millis(parse_env_u64(
                "MEALSCAN_RETRY_BACKOFF_MS",
                defaults.retry_backoff.as_millis() as u64,
            )?),
        })
    }
}

fn parse_env_u64(name: &str, default: u64) -> PipelineResult<u64> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|_| ScanError::config(format!("{name} must be an integer, got {raw:?}"))),
        Err(_) => Ok(default),
    }
}
