// ABOUTME: Data model module grouping nutrition and scan-level types
// ABOUTME: Re-exports the full model surface at models::*
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealscan Labs

//! Nutrition record types and the pure arithmetic over them.

/// Food items, nutrient aggregates, totals, and portion scaling
pub mod nutrition;

/// Capture requests, provenance tags, raw payloads, and finalized results
pub mod scan;

pub use nutrition::{
    sum_calories, sum_macros, CalorieDensity, FoodItem, MacroNutrients, MicroNutrients,
};
pub use scan::{
    FoodScanResult, LabelDraft, MealType, NormalizedScanOutcome, PendingScanRequest, RawFoodItem,
    RawMacros, RawMicros, RawScanResult, ScanInputMode, ScanResultSource, ScannedFood,
};
