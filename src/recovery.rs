// ABOUTME: Recovery engine that sanitizes raw provider output into valid results
// ABOUTME: Total function, synthesizes fallback values so a partial scan never fails
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealscan Labs

//! # Recovery Engine
//!
//! Turns a possibly-malformed [`RawScanResult`] (blank names, zero calories,
//! negative macros, empty item list) into a [`NormalizedScanOutcome`] that
//! satisfies every data-model invariant, while recording that recovery
//! occurred. Recovery is total by design: a scan must never fail purely
//! because the recognition provider returned partial data.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::constants::{energy, recovery};
use crate::models::{
    CalorieDensity, FoodItem, FoodScanResult, NormalizedScanOutcome, RawFoodItem, RawMacros,
    RawScanResult, ScanResultSource,
};

/// Sanitize a raw provider result into a valid, finalized-shape result.
///
/// `calorie_hint` seeds the fallback item when the provider returned zero
/// usable items (e.g. an expectation derived from the declared meal type).
///
/// The returned outcome always has a non-empty item list, totals recomputed
/// from the sanitized items, and a confidence clamped into the recovered band
/// of [0.34, 0.58] when any step fired, or the clean band of [0.45, 0.98]
/// otherwise. The overlap between the bands is intentional and preserved.
#[must_use]
pub fn normalize(
    raw: RawScanResult,
    source: ScanResultSource,
    calorie_hint: Option<u32>,
) -> NormalizedScanOutcome {
    let mut recovered = false;

    let mut items: Vec<FoodItem> = raw
        .items
        .iter()
        .enumerate()
        .map(|(index, raw_item)| sanitize_item(index, raw_item, &mut recovered))
        .collect();

    if items.is_empty() {
        debug!(source = source.storage_key(), "no items survived sanitization, synthesizing fallback");
        items.push(synthesize_fallback_item(calorie_hint, raw.total_macros));
        recovered = true;
    }

    let meal_suggestion = {
        let trimmed = raw.meal_suggestion.trim();
        if trimmed.is_empty() {
            recovered = true;
            items
                .first()
                .map_or_else(|| recovery::UNNAMED_MEAL.to_owned(), |item| item.name.clone())
        } else {
            trimmed.to_owned()
        }
    };

    let confidence = if recovered {
        raw.confidence.clamp(
            recovery::RECOVERED_CONFIDENCE_MIN,
            recovery::RECOVERED_CONFIDENCE_MAX,
        )
    } else {
        raw.confidence.clamp(
            recovery::CLEAN_CONFIDENCE_MIN,
            recovery::CLEAN_CONFIDENCE_MAX,
        )
    };

    let mut result = FoodScanResult {
        id: Uuid::new_v4(),
        image_ref: raw.image_ref,
        source,
        items,
        total_calories: 0,
        total_macros: crate::models::MacroNutrients::default(),
        confidence,
        meal_suggestion,
        captured_at: Utc::now(),
    };
    // Derived totals come from the sanitized items, never from the raw input.
    result.recompute_totals();

    NormalizedScanOutcome {
        result,
        was_recovered: recovered,
    }
}

fn sanitize_item(index: usize, raw: &RawFoodItem, recovered: &mut bool) -> FoodItem {
    let name = {
        let trimmed = raw.name.trim();
        if trimmed.is_empty() {
            *recovered = true;
            if index == 0 {
                recovery::UNNAMED_FIRST_ITEM.to_owned()
            } else {
                format!("Unidentified item {}", index + 1)
            }
        } else {
            trimmed.to_owned()
        }
    };

    let serving_description = {
        let trimmed = raw.serving_description.trim();
        if trimmed.is_empty() {
            *recovered = true;
            recovery::UNNAMED_SERVING.to_owned()
        } else {
            trimmed.to_owned()
        }
    };

    if raw.macros.protein_g < 0 || raw.macros.carbs_g < 0 || raw.macros.fat_g < 0 {
        *recovered = true;
    }
    let macros = raw.macros.sanitized();

    let calories = if raw.calories > 0 {
        crate::models::scan::clamp_to_u32(raw.calories)
    } else {
        *recovered = true;
        let derived = macros.energy_kcal();
        if derived > 0 {
            derived
        } else {
            recovery::DEFAULT_ITEM_CALORIES
        }
    };

    let weight_grams = match raw.weight_grams {
        Some(w) if w > 0.0 => Some(w),
        Some(_) => {
            // Zero or negative measured weight is treated as absent, never stored.
            *recovered = true;
            None
        }
        None => None,
    };

    FoodItem {
        id: Uuid::new_v4(),
        name,
        serving_description,
        quantity: if raw.quantity > 0.0 { raw.quantity } else { 1.0 },
        calories,
        macros,
        micros: raw.micros.map(crate::models::RawMicros::sanitized),
        weight_grams,
        calorie_density: CalorieDensity::from_weight(calories, weight_grams),
    }
}

/// Build the single placeholder item used when zero items survive.
///
/// Calories come from, in priority order, the caller-supplied hint, the raw
/// total-macro energy, or a fixed default. Macros are derived so the item is
/// nutritionally self-consistent rather than an empty meal.
fn synthesize_fallback_item(calorie_hint: Option<u32>, raw_total_macros: RawMacros) -> FoodItem {
    let macro_energy = raw_total_macros.sanitized().energy_kcal();
    let calories = calorie_hint
        .filter(|c| *c > 0)
        .unwrap_or(if macro_energy > 0 {
            macro_energy
        } else {
            recovery::FALLBACK_MEAL_CALORIES
        });

    let protein_g = (((f64::from(calories) * recovery::FALLBACK_PROTEIN_ENERGY_SHARE)
        / f64::from(energy::KCAL_PER_G_PROTEIN))
    .round() as u32)
        .max(recovery::FALLBACK_MIN_PROTEIN_G);
    let fat_g = (((f64::from(calories) * recovery::FALLBACK_FAT_ENERGY_SHARE)
        / f64::from(energy::KCAL_PER_G_FAT))
    .round() as u32)
        .max(recovery::FALLBACK_MIN_FAT_G);

    let protein_energy = protein_g * energy::KCAL_PER_G_PROTEIN;
    let fat_energy = fat_g * energy::KCAL_PER_G_FAT;
    let carb_energy = calories.saturating_sub(protein_energy.saturating_add(fat_energy));
    let carbs_g = (carb_energy / energy::KCAL_PER_G_CARBS).max(recovery::FALLBACK_MIN_CARBS_G);

    FoodItem {
        id: Uuid::new_v4(),
        name: recovery::UNNAMED_FIRST_ITEM.to_owned(),
        serving_description: recovery::UNNAMED_SERVING.to_owned(),
        quantity: 1.0,
        calories,
        macros: crate::models::MacroNutrients::new(protein_g, carbs_g, fat_g),
        micros: None,
        weight_grams: None,
        calorie_density: None,
    }
}
