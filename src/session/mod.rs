// ABOUTME: Scan session state machine orchestrating one capture-to-result cycle
// ABOUTME: Single-flight guard, ticker, acquisition, recovery, scoring, finalize, edits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealscan Labs

//! # Scan Session State Machine
//!
//! Orchestrates one end-to-end scan: `Ready` → `Analyzing` → `Results`, and
//! back to `Ready` on retake. All mutable session state lives in one explicit
//! record behind the session, updated only through named transition methods
//! and published as [`SessionSnapshot`] values over a watch channel.
//!
//! Concurrency model: the acquisition call and the progress ticker run as
//! separate cooperative tasks from session start; the ticker is always
//! aborted when the real outcome arrives. Recovery and confidence scoring run
//! strictly after acquisition resolves, in that order, on the same task, and
//! persistence plus the coaching hand-off complete before the visible
//! transition to `Results` — a result the user can see has always already
//! been summarized downstream. Retaking aborts both tasks; an aborted
//! acquisition never retries and never writes a persistence record.

/// Progress ticker types and task body
pub mod progress;

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::acquisition::AcquisitionController;
use crate::confidence::{item_confidence, post_edit_confidence, ItemConfidence};
use crate::config::ScanConfig;
use crate::constants::{barcode, label_draft, recovery as recovery_consts};
use crate::errors::ScanError;
use crate::models::{
    FoodItem, FoodScanResult, LabelDraft, MacroNutrients, NormalizedScanOutcome,
    PendingScanRequest, ScanResultSource,
};
use crate::providers::RecognitionProvider;
use crate::recovery;
use crate::store::{CoachingChannel, CoachingHandoff, MealSummary, SummaryStore};

pub use progress::ProgressUpdate;

/// The three visible states of a scan session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Idle, capture surface active
    #[default]
    Ready,
    /// Exactly one acquisition in flight
    Analyzing,
    /// A finalized result is ready for review and editing
    Results,
}

/// Everything the UI needs to render the session, published on every change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Current state
    pub state: SessionState,
    /// Current cosmetic progress step, while analyzing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressUpdate>,
    /// Transient status text, e.g. the automatic-retry notice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Surfaced scan failure, dismissible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Whether a bound retry action can re-submit the failed request
    pub retry_available: bool,
    /// Whether the independent barcode sub-flow is loading
    pub barcode_busy: bool,
    /// Surfaced barcode lookup failure, independent of the scan error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode_error: Option<String>,
}

/// A finalized scan plus its scoring and edit bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedScan {
    /// The always-consistent result under review
    pub result: FoodScanResult,
    /// Sticky recovery flag from normalization
    pub was_recovered: bool,
    /// Per-item trust estimates, parallel to `result.items`
    pub item_confidence: Vec<ItemConfidence>,
    /// Displayed overall trust percentage
    pub overall_percent: u8,
    /// Confidence as finalized, before any edits; edits are scored against this
    original_confidence: f64,
    /// Count of trust-lowering edits so far
    edits: u32,
}

impl FinalizedScan {
    /// Notice text shown when the recovery engine had to fill in estimates
    #[must_use]
    pub const fn recovery_notice(&self) -> Option<&'static str> {
        if self.was_recovered {
            Some("We filled in some estimates where the scan was unclear")
        } else {
            None
        }
    }
}

#[derive(Default)]
struct SessionInner {
    state: SessionState,
    progress: Option<ProgressUpdate>,
    status: Option<String>,
    error: Option<String>,
    retry_request: Option<PendingScanRequest>,
    barcode_busy: bool,
    barcode_error: Option<String>,
    current: Option<FinalizedScan>,
    scan_task: Option<JoinHandle<()>>,
    ticker_task: Option<JoinHandle<()>>,
}

/// One scan session: exclusive owner of the in-flight request and tasks.
///
/// Cheap to clone; clones share the same underlying session record.
#[derive(Clone)]
pub struct ScanSession {
    provider: Arc<dyn RecognitionProvider>,
    store: Arc<dyn SummaryStore>,
    coaching: Arc<dyn CoachingChannel>,
    controller: AcquisitionController,
    inner: Arc<Mutex<SessionInner>>,
    snapshot_tx: Arc<watch::Sender<SessionSnapshot>>,
}

impl ScanSession {
    /// Create a session over the given collaborators
    #[must_use]
    pub fn new(
        provider: Arc<dyn RecognitionProvider>,
        store: Arc<dyn SummaryStore>,
        coaching: Arc<dyn CoachingChannel>,
        config: ScanConfig,
    ) -> Self {
        let (snapshot_tx, _snapshot_rx) = watch::channel(SessionSnapshot::default());
        Self {
            provider,
            store,
            coaching,
            controller: AcquisitionController::new(config),
            inner: Arc::new(Mutex::new(SessionInner::default())),
            snapshot_tx: Arc::new(snapshot_tx),
        }
    }

    /// Subscribe to session snapshots; the current value is available immediately
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Current session state
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// Clone of the finalized scan under review, if any
    #[must_use]
    pub fn finalized(&self) -> Option<FinalizedScan> {
        self.lock().current.clone()
    }

    /// Clone of the result under review, if any
    #[must_use]
    pub fn current_result(&self) -> Option<FoodScanResult> {
        self.lock().current.as_ref().map(|c| c.result.clone())
    }

    /// Whether the edited result may be saved (false once the item list is empty)
    #[must_use]
    pub fn can_save(&self) -> bool {
        self.lock()
            .current
            .as_ref()
            .is_some_and(|c| !c.result.items.is_empty())
    }

    /// Begin analyzing a capture. Must be called within a tokio runtime.
    ///
    /// Returns `false` without doing anything when an analysis is already
    /// active: new requests are rejected, not queued, so rapid repeated taps
    /// cannot issue duplicate provider calls.
    pub fn start_scan(&self, request: PendingScanRequest) -> bool {
        // Transition, spawn, and handle storage happen under one lock
        // acquisition: a retake can never observe the session analyzing
        // without also seeing the handles it must abort.
        let mut inner = self.lock();
        if inner.state == SessionState::Analyzing {
            warn!(mode = ?request.input_mode, "scan already active, ignoring request");
            return false;
        }
        inner.state = SessionState::Analyzing;
        inner.error = None;
        inner.status = None;
        inner.progress = None;
        inner.retry_request = Some(request.clone());
        self.publish(&inner);

        let ticker_session = self.clone();
        let steps = request.input_mode.progress_steps();
        inner.ticker_task = Some(tokio::spawn(progress::run_ticker(steps, move |update| {
            ticker_session.set_progress(update);
        })));

        let scan_session = self.clone();
        inner.scan_task = Some(tokio::spawn(async move {
            scan_session.run_scan(request).await;
        }));
        true
    }

    /// Abandon the current scan or result and return to `Ready`.
    ///
    /// Aborts the acquisition and ticker tasks; an aborted acquisition never
    /// triggers the retry path and never writes a persistence record.
    pub fn retake(&self) {
        let mut inner = self.lock();
        if let Some(task) = inner.scan_task.take() {
            task.abort();
        }
        if let Some(task) = inner.ticker_task.take() {
            task.abort();
        }
        inner.state = SessionState::Ready;
        inner.progress = None;
        inner.status = None;
        inner.error = None;
        inner.retry_request = None;
        inner.current = None;
        self.publish(&inner);
    }

    /// Re-submit the request bound to the last failure.
    ///
    /// Returns `false` when no retry is bound or an analysis is already active.
    pub fn retry(&self) -> bool {
        let request = {
            let mut inner = self.lock();
            match inner.retry_request.clone() {
                Some(request) => {
                    inner.error = None;
                    self.publish(&inner);
                    Some(request)
                }
                None => None,
            }
        };
        request.is_some_and(|r| self.start_scan(r))
    }

    /// Dismiss a surfaced failure without retrying
    pub fn dismiss_error(&self) {
        let mut inner = self.lock();
        inner.error = None;
        inner.retry_request = None;
        inner.barcode_error = None;
        self.publish(&inner);
    }

    /// Look up a barcode as an independent parallel sub-flow.
    ///
    /// Transitions `Ready` → `Results` directly, without `Analyzing`. Barcode
    /// data is treated as already trustworthy and explicitly bypasses the
    /// recovery engine; it still receives a fixed confidence based on whether
    /// the lookup was a verified database match.
    pub fn lookup_barcode(&self, code: String) {
        {
            let mut inner = self.lock();
            inner.barcode_busy = true;
            inner.barcode_error = None;
            self.publish(&inner);
        }

        let session = self.clone();
        tokio::spawn(async move {
            match session.provider.lookup_barcode(&code).await {
                Ok(food) => {
                    let confidence = if food.verified {
                        barcode::VERIFIED_CONFIDENCE
                    } else {
                        barcode::UNVERIFIED_CONFIDENCE
                    };
                    let meal_suggestion = food.name.clone();
                    let mut result = FoodScanResult {
                        id: Uuid::new_v4(),
                        image_ref: None,
                        source: ScanResultSource::Barcode,
                        items: vec![food.into_food_item()],
                        total_calories: 0,
                        total_macros: MacroNutrients::default(),
                        confidence,
                        meal_suggestion,
                        captured_at: Utc::now(),
                    };
                    result.recompute_totals();
                    session.finalize_barcode(result).await;
                }
                Err(err) => {
                    warn!(error = %err, code = %code, "barcode lookup failed");
                    let mut inner = session.lock();
                    inner.barcode_busy = false;
                    inner.barcode_error = Some(err.to_string());
                    session.publish(&inner);
                }
            }
        });
    }

    /// Scale one item's portion; recomputes totals and overall confidence.
    ///
    /// Counts as a trust-lowering edit only when the scaled calories or
    /// macros actually differ. Never re-runs recovery: edits operate on
    /// already-sanitized data.
    pub fn scale_item(&self, index: usize, factor: f64) -> bool {
        let mut inner = self.lock();
        let Some(current) = inner.current.as_mut() else {
            return false;
        };
        let Some(item) = current.result.items.get(index) else {
            return false;
        };
        let scaled = item.scaled(factor);
        let changed = scaled.calories != item.calories || scaled.macros != item.macros;
        current.result.items[index] = scaled;
        current.result.recompute_totals();
        if changed {
            current.edits = current.edits.saturating_add(1);
        }
        Self::rescore(current);
        self.publish(&inner);
        true
    }

    /// Remove one item; recomputes totals and overall confidence.
    ///
    /// Saving is disabled whenever the edited item list becomes empty.
    pub fn remove_item(&self, index: usize) -> bool {
        let mut inner = self.lock();
        let Some(current) = inner.current.as_mut() else {
            return false;
        };
        if index >= current.result.items.len() {
            return false;
        }
        current.result.items.remove(index);
        current.result.recompute_totals();
        current.edits = current.edits.saturating_add(1);
        Self::rescore(current);
        self.publish(&inner);
        true
    }

    async fn run_scan(&self, request: PendingScanRequest) {
        let outcome = if let Some(draft) = usable_label_draft(&request) {
            info!(
                draft_confidence = draft.confidence,
                "label draft complete enough, skipping network call"
            );
            Ok(synthesize_from_draft(draft))
        } else {
            let status_session = self.clone();
            self.controller
                .acquire(self.provider.as_ref(), &request, move |notice| {
                    status_session.set_status(notice);
                })
                .await
                .map(|raw| recovery::normalize(raw, request.network_source(), None))
        };

        match outcome {
            Ok(NormalizedScanOutcome {
                result,
                was_recovered,
            }) => {
                self.finalize_scan(result, was_recovered).await;
            }
            Err(err) => self.fail_scan(&err),
        }
    }

    /// Score the result and push the summary and hand-off downstream.
    ///
    /// Shared by the scan and barcode paths. Both writes are best-effort and
    /// complete before the caller makes the result visible.
    async fn record_result(&self, result: FoodScanResult, was_recovered: bool) -> FinalizedScan {
        let overall_percent = post_edit_confidence(result.confidence, 0);
        let item_scores: Vec<ItemConfidence> = result
            .items
            .iter()
            .map(|item| item_confidence(item, overall_percent))
            .collect();

        let summary = MealSummary {
            result_id: result.id,
            source_key: result.source.storage_key().to_owned(),
            meal_name: result.meal_suggestion.clone(),
            calories: result.total_calories,
            macros: result.total_macros,
            confidence_percent: overall_percent,
            was_recovered,
            captured_at: result.captured_at,
        };
        if let Err(err) = self.store.save(&summary).await {
            warn!(error = %err, result_id = %result.id, "summary persistence failed, continuing");
        }

        let handoff = CoachingHandoff {
            meal_name: result.meal_suggestion.clone(),
            calories: result.total_calories,
            macros: result.total_macros,
            confidence_percent: overall_percent,
            source_label: result.source.title().to_owned(),
            captured_at: result.captured_at,
        };
        if let Err(err) = self.coaching.push(handoff).await {
            warn!(error = %err, result_id = %result.id, "coaching hand-off failed, continuing");
        }

        info!(
            result_id = %result.id,
            source = result.source.storage_key(),
            items = result.items.len(),
            calories = result.total_calories,
            recovered = was_recovered,
            confidence_percent = overall_percent,
            "scan finalized"
        );

        let original_confidence = result.confidence;
        FinalizedScan {
            result,
            was_recovered,
            item_confidence: item_scores,
            overall_percent,
            original_confidence,
            edits: 0,
        }
    }

    /// Record a scan-flow result and make it visible.
    ///
    /// Runs on the scan task itself: it retires the ticker and its own handle
    /// along with the transition to `Results`.
    async fn finalize_scan(&self, result: FoodScanResult, was_recovered: bool) {
        let finalized = self.record_result(result, was_recovered).await;
        let mut inner = self.lock();
        if let Some(task) = inner.ticker_task.take() {
            task.abort();
        }
        inner.progress = None;
        inner.status = None;
        inner.error = None;
        inner.retry_request = None;
        inner.scan_task = None;
        inner.current = Some(finalized);
        inner.state = SessionState::Results;
        self.publish(&inner);
    }

    /// Record a barcode result and make it visible.
    ///
    /// The barcode sub-flow owns no scan-flow tasks: an analysis may legally
    /// still be in flight, and its handles must stay with the session so a
    /// later retake can abort it. Only barcode state is touched here.
    async fn finalize_barcode(&self, result: FoodScanResult) {
        let finalized = self.record_result(result, false).await;
        let mut inner = self.lock();
        inner.barcode_busy = false;
        inner.current = Some(finalized);
        inner.state = SessionState::Results;
        self.publish(&inner);
    }

    fn fail_scan(&self, err: &ScanError) {
        warn!(error = %err, "scan failed, returning to ready with retry bound");
        let mut inner = self.lock();
        if let Some(task) = inner.ticker_task.take() {
            task.abort();
        }
        inner.progress = None;
        inner.status = None;
        inner.scan_task = None;
        inner.state = SessionState::Ready;
        inner.error = Some(err.to_string());
        // retry_request stays bound so the surfaced notice can re-submit it
        self.publish(&inner);
    }

    fn rescore(current: &mut FinalizedScan) {
        let overall = post_edit_confidence(current.original_confidence, current.edits);
        current.overall_percent = overall;
        current.result.confidence = f64::from(overall) / 100.0;
        current.item_confidence = current
            .result
            .items
            .iter()
            .map(|item| item_confidence(item, overall))
            .collect();
    }

    fn set_progress(&self, update: ProgressUpdate) {
        let mut inner = self.lock();
        inner.progress = Some(update);
        self.publish(&inner);
    }

    fn set_status(&self, status: &str) {
        let mut inner = self.lock();
        inner.status = Some(status.to_owned());
        self.publish(&inner);
    }

    fn publish(&self, inner: &SessionInner) {
        self.snapshot_tx.send_replace(SessionSnapshot {
            state: inner.state,
            progress: inner.progress.clone(),
            status: inner.status.clone(),
            error: inner.error.clone(),
            retry_available: inner.error.is_some() && inner.retry_request.is_some(),
            barcode_busy: inner.barcode_busy,
            barcode_error: inner.barcode_error.clone(),
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A label draft usable in place of the network call: calories present,
/// at least two macro fields present, and confidence above the threshold.
fn usable_label_draft(request: &PendingScanRequest) -> Option<&LabelDraft> {
    let draft = request.label_draft.as_ref()?;
    let complete = draft.calories.is_some()
        && draft.macro_field_count() >= label_draft::MIN_MACRO_FIELDS
        && draft.confidence >= label_draft::MIN_CONFIDENCE;
    complete.then_some(draft)
}

/// Build a result locally from an on-device label draft.
///
/// Calories fall back to macro energy when the label's own calorie field is
/// absent or zero. The draft was produced on device, so the result is tagged
/// `OcrLabel` and consumed no cloud credits.
fn synthesize_from_draft(draft: &LabelDraft) -> NormalizedScanOutcome {
    let macros = MacroNutrients::new(
        draft.protein_g.unwrap_or(0),
        draft.carbs_g.unwrap_or(0),
        draft.fat_g.unwrap_or(0),
    );
    let calories = draft
        .calories
        .filter(|c| *c > 0)
        .unwrap_or_else(|| macros.energy_kcal());
    let name = draft
        .product_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("Packaged food")
        .to_owned();

    let item = FoodItem {
        id: Uuid::new_v4(),
        name: name.clone(),
        serving_description: "1 serving (label)".to_owned(),
        quantity: 1.0,
        calories,
        macros,
        micros: None,
        weight_grams: None,
        calorie_density: None,
    };

    let mut result = FoodScanResult {
        id: Uuid::new_v4(),
        image_ref: None,
        source: ScanResultSource::OcrLabel,
        items: vec![item],
        total_calories: 0,
        total_macros: MacroNutrients::default(),
        confidence: draft.confidence.clamp(
            recovery_consts::CLEAN_CONFIDENCE_MIN,
            recovery_consts::CLEAN_CONFIDENCE_MAX,
        ),
        meal_suggestion: name,
        captured_at: Utc::now(),
    };
    result.recompute_totals();

    NormalizedScanOutcome {
        result,
        was_recovered: false,
    }
}
