// ABOUTME: Confidence scorer deriving trust percentages from provenance and edits
// ABOUTME: Per-item penalties with reasons, and monotonically non-increasing post-edit scoring
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealscan Labs

//! # Confidence Scorer
//!
//! Produces per-item and overall trust percentages. Both are display signals
//! the user can act on, not statistical probabilities. User corrections only
//! ever lower displayed trust: a correction is read as evidence of model
//! error, never of extra certainty.

use serde::{Deserialize, Serialize};

use crate::constants::confidence;
use crate::models::FoodItem;

/// Per-item trust estimate with human-readable reasons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemConfidence {
    /// Trust percentage in [35, 99]
    pub percent: u8,
    /// Concatenated penalty reasons, or "strong match" when none applied
    pub reasons: String,
}

/// Estimate per-item trust starting from the overall percentage.
///
/// Penalties: missing measured weight (portion estimated), all-zero macros
/// (macro data limited), vague serving unit such as "piece" or "cup"
/// (serving inferred). Clamped to [35, 99].
#[must_use]
pub fn item_confidence(item: &FoodItem, overall_percent: u8) -> ItemConfidence {
    let mut percent = i32::from(overall_percent);
    let mut reasons: Vec<&str> = Vec::new();

    if item.weight_grams.is_none() {
        percent -= confidence::PENALTY_NO_WEIGHT;
        reasons.push("portion estimated");
    }
    if item.macros.is_empty() {
        percent -= confidence::PENALTY_NO_MACROS;
        reasons.push("macro data limited");
    }
    if has_vague_serving_unit(&item.serving_description) {
        percent -= confidence::PENALTY_VAGUE_SERVING;
        reasons.push("serving inferred");
    }

    let percent = percent.clamp(confidence::ITEM_MIN_PERCENT, confidence::ITEM_MAX_PERCENT) as u8;
    let reasons = if reasons.is_empty() {
        "strong match".to_owned()
    } else {
        reasons.join(", ")
    };

    ItemConfidence { percent, reasons }
}

/// Overall trust percentage after `edits` user corrections.
///
/// Starts from the normalized result's confidence (a [0, 1] value), subtracts
/// a fixed penalty per item removed or per item whose calories/macros were
/// changed from the recognition output, and clamps to [45, 99]. Monotonically
/// non-increasing in the edit count.
#[must_use]
pub fn post_edit_confidence(base_confidence: f64, edits: u32) -> u8 {
    let base_percent = (base_confidence * 100.0).round() as i32;
    let penalty = confidence::EDIT_PENALTY.saturating_mul(i32::try_from(edits).unwrap_or(i32::MAX));
    base_percent
        .saturating_sub(penalty)
        .clamp(
            confidence::OVERALL_MIN_PERCENT,
            confidence::OVERALL_MAX_PERCENT,
        ) as u8
}

fn has_vague_serving_unit(serving_description: &str) -> bool {
    let lowered = serving_description.to_lowercase();
    confidence::VAGUE_SERVING_UNITS
        .iter()
        .any(|unit| lowered.contains(unit))
}
