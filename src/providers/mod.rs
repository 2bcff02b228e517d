// ABOUTME: Recognition provider trait consumed by the acquisition controller
// ABOUTME: Opaque async contract for cloud vision, label OCR, and barcode lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealscan Labs

//! # Recognition Provider Contract
//!
//! The pipeline consumes recognition as an opaque async collaborator: one
//! call for image analysis, one for barcode lookup. Implementations live
//! outside this crate (HTTP clients, on-device engines, test fakes); the
//! pipeline only relies on this contract and on failure messages being
//! human-readable, since those messages drive retry classification.

use async_trait::async_trait;

use crate::errors::PipelineResult;
use crate::models::{MealType, RawScanResult, ScannedFood};

/// Asynchronous food recognition collaborator.
///
/// Calls may take tens of seconds and may fail transiently; the
/// [`crate::acquisition::AcquisitionController`] owns timeout and retry
/// policy, so implementations should not retry internally.
#[async_trait]
pub trait RecognitionProvider: Send + Sync {
    /// Analyze a meal or label image and return the raw, untrusted result.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::ScanError`] with a human-readable message;
    /// messages containing "timeout", "network", or "connection" are treated
    /// as transient by the caller.
    async fn scan(
        &self,
        image: &[u8],
        meal_type: Option<MealType>,
    ) -> PipelineResult<RawScanResult>;

    /// Look up a barcode in the food database.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::ScanError`] when the code is unknown or the
    /// lookup service is unreachable.
    async fn lookup_barcode(&self, code: &str) -> PipelineResult<ScannedFood>;
}
