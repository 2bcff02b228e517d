// ABOUTME: Downstream collaborator contracts for persistence and coaching hand-off
// ABOUTME: Summary/daily-nutrition projections plus in-memory reference implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealscan Labs

//! # Persistence and Hand-off Collaborators
//!
//! The pipeline produces a finalized result and pushes reduced projections of
//! it downstream; it does not own the consumers' storage formats. Writes are
//! best-effort from the session's point of view: a failed save or hand-off is
//! logged and never blocks the user from seeing their result.
//!
//! In-memory implementations are provided for embedders that have no durable
//! backend yet and for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::PipelineResult;
use crate::models::MacroNutrients;

/// Reduced projection of a finalized scan result for the summary store.
///
/// Keyed by result id and source storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSummary {
    /// Id of the finalized result this summarizes
    pub result_id: Uuid,
    /// Stable source tag: `photo_ai`, `label_ai`, `label_ocr`, `barcode`, or `library_ai`
    pub source_key: String,
    /// Meal display name
    pub meal_name: String,
    /// Total calories
    pub calories: u32,
    /// Total macros
    pub macros: MacroNutrients,
    /// Displayed confidence percentage
    pub confidence_percent: u8,
    /// Whether the result needed recovery
    pub was_recovered: bool,
    /// Capture timestamp
    pub captured_at: DateTime<Utc>,
}

/// Aggregate nutrition for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyNutrition {
    /// The day being aggregated
    pub date: NaiveDate,
    /// Calories consumed across all meals
    pub total_calories: u32,
    /// Macros consumed across all meals
    pub total_macros: MacroNutrients,
    /// Number of recorded meals
    pub meal_count: u32,
}

/// One-way projection pushed to the coaching collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachingHandoff {
    /// Meal display name
    pub meal_name: String,
    /// Total calories
    pub calories: u32,
    /// Total macros
    pub macros: MacroNutrients,
    /// Displayed confidence percentage
    pub confidence_percent: u8,
    /// Human-readable source label (the source tag's display title)
    pub source_label: String,
    /// Capture timestamp
    pub captured_at: DateTime<Utc>,
}

/// Persistence collaborator for finalized scan summaries
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Persist one summary.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::ScanError::Store`] on write failure; the
    /// session treats this as best-effort and only logs it.
    async fn save(&self, summary: &MealSummary) -> PipelineResult<()>;

    /// Load the most recent summaries, newest first
    async fn load_recent(&self, limit: usize) -> PipelineResult<Vec<MealSummary>>;

    /// Load today's aggregate, or `None` when nothing was recorded today
    async fn load_today(&self) -> PipelineResult<Option<DailyNutrition>>;
}

/// Coaching hand-off collaborator
#[async_trait]
pub trait CoachingChannel: Send + Sync {
    /// Push one finalized-result projection downstream.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::ScanError::Store`] on delivery failure; the
    /// session treats this as best-effort and only logs it.
    async fn push(&self, handoff: CoachingHandoff) -> PipelineResult<()>;
}

/// In-memory summary store, newest summaries last
#[derive(Debug, Default)]
pub struct MemorySummaryStore {
    summaries: Mutex<Vec<MealSummary>>,
}

impl MemorySummaryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored summaries
    pub fn len(&self) -> usize {
        self.summaries.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SummaryStore for MemorySummaryStore {
    async fn save(&self, summary: &MealSummary) -> PipelineResult<()> {
        let mut summaries = self
            .summaries
            .lock()
            .map_err(|_| crate::errors::ScanError::store("summary store poisoned"))?;
        summaries.push(summary.clone());
        Ok(())
    }

    async fn load_recent(&self, limit: usize) -> PipelineResult<Vec<MealSummary>> {
        let summaries = self
            .summaries
            .lock()
            .map_err(|_| crate::errors::ScanError::store("summary store poisoned"))?;
        Ok(summaries.iter().rev().take(limit).cloned().collect())
    }

    async fn load_today(&self) -> PipelineResult<Option<DailyNutrition>> {
        let summaries = self
            .summaries
            .lock()
            .map_err(|_| crate::errors::ScanError::store("summary store poisoned"))?;
        let today = Utc::now().date_naive();
        let mut aggregate: Option<DailyNutrition> = None;
        for summary in summaries
            .iter()
            .filter(|s| s.captured_at.date_naive() == today)
        {
            let entry = aggregate.get_or_insert(DailyNutrition {
                date: today,
                total_calories: 0,
                total_macros: MacroNutrients::default(),
                meal_count: 0,
            });
            entry.total_calories = entry.total_calories.saturating_add(summary.calories);
            entry.total_macros = entry.total_macros.saturating_add(summary.macros);
            entry.meal_count = entry.meal_count.saturating_add(1);
        }
        Ok(aggregate)
    }
}

/// In-memory coaching channel retaining every pushed hand-off
#[derive(Debug, Default)]
pub struct MemoryCoachingChannel {
    handoffs: Mutex<Vec<CoachingHandoff>>,
}

impl MemoryCoachingChannel {
    /// Create an empty channel
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every hand-off pushed so far
    pub fn pushed(&self) -> Vec<CoachingHandoff> {
        self.handoffs
            .lock()
            .map(|h| h.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CoachingChannel for MemoryCoachingChannel {
    async fn push(&self, handoff: CoachingHandoff) -> PipelineResult<()> {
        let mut handoffs = self
            .handoffs
            .lock()
            .map_err(|_| crate::errors::ScanError::store("coaching channel poisoned"))?;
        handoffs.push(handoff);
        Ok(())
    }
}
