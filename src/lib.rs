// ABOUTME: Library entry point for the mealscan-core pipeline
// ABOUTME: Scan acquisition, recovery, confidence scoring, and session orchestration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealscan Labs

#![deny(unsafe_code)]

//! # Mealscan Core
//!
//! Converts a meal capture (photo, packaging label, barcode, or gallery
//! image) into a trustworthy, editable nutrition record. The crate owns the
//! scan acquisition, recovery, and confidence-scoring pipeline; recognition,
//! persistence, and coaching are consumed as opaque async collaborators, and
//! no UI is rendered here.
//!
//! ## Architecture
//!
//! - **Models**: nutrition record types and the pure arithmetic over them
//! - **Recovery**: total sanitization of raw provider output, with fallback
//!   synthesis so a partial result never becomes a failure
//! - **Confidence**: provenance- and edit-driven trust percentages
//! - **Acquisition**: bounded-latency provider calls with a single retry
//! - **Session**: the `Ready` → `Analyzing` → `Results` state machine that
//!   owns the in-flight request and all concurrent tasks
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mealscan_core::config::ScanConfig;
//! use mealscan_core::session::ScanSession;
//! use mealscan_core::store::{MemoryCoachingChannel, MemorySummaryStore};
//! # use mealscan_core::providers::RecognitionProvider;
//! # fn provider() -> Arc<dyn RecognitionProvider> { unimplemented!() }
//!
//! # async fn example() {
//! let session = ScanSession::new(
//!     provider(),
//!     Arc::new(MemorySummaryStore::new()),
//!     Arc::new(MemoryCoachingChannel::new()),
//!     ScanConfig::default(),
//! );
//! let mut snapshots = session.subscribe();
//! # }
//! ```

/// Acquisition controller with timeout and single-retry policy
pub mod acquisition;

/// Confidence scorer for per-item and post-edit trust percentages
pub mod confidence;

/// Runtime configuration with environment overrides
pub mod config;

/// System-wide constants: energy coefficients, bands, and timings
pub mod constants;

/// Unified error handling with transient-failure classification
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Nutrition record types and pure arithmetic
pub mod models;

/// Recognition provider contract
pub mod providers;

/// Recovery engine turning raw provider output into valid results
pub mod recovery;

/// Scan session state machine
pub mod session;

/// Persistence and coaching hand-off collaborator contracts
pub mod store;
