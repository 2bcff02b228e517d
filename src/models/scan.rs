// ABOUTME: Scan-level model types from capture to finalized result
// ABOUTME: Sources, pending requests, raw provider payloads, and the normalized outcome
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealscan Labs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::nutrition::{sum_calories, sum_macros, FoodItem, MacroNutrients, MicroNutrients};
use crate::constants::progress;

/// Declared meal type attached to a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// Morning meal
    Breakfast,
    /// Midday meal
    Lunch,
    /// Evening meal
    Dinner,
    /// Anything in between
    Snack,
}

/// How the capture entered the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanInputMode {
    /// Live camera photo of a plated meal
    Camera,
    /// Barcode scan of packaged food
    Barcode,
    /// Photo of a packaging nutrition label
    Label,
    /// Image picked from the gallery
    Gallery,
}

impl ScanInputMode {
    /// Progress ticker steps for this mode as (label, dwell ms) pairs.
    ///
    /// Barcode lookups run their own loading indicator and have no steps.
    #[must_use]
    pub const fn progress_steps(self) -> &'static [(&'static str, u64)] {
        match self {
            Self::Camera => progress::CAMERA_STEPS,
            Self::Label => progress::LABEL_STEPS,
            Self::Gallery => progress::GALLERY_STEPS,
            Self::Barcode => &[],
        }
    }

    /// Transient status text shown while the single automatic retry runs
    #[must_use]
    pub const fn retry_notice(self) -> &'static str {
        match self {
            Self::Camera => "Connection hiccup, retrying photo analysis",
            Self::Label => "Connection hiccup, retrying label analysis",
            Self::Gallery => "Connection hiccup, retrying image analysis",
            Self::Barcode => "Connection hiccup, retrying barcode lookup",
        }
    }
}

/// Provenance tag of a finalized scan result.
///
/// Closed set; immutable once a result is finalized. Drives both UI labeling
/// and the paid/cloud-credit disclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanResultSource {
    /// Cloud vision over a camera photo
    AiPhoto,
    /// Cloud vision over a packaging label photo
    AiLabel,
    /// On-device OCR of a packaging label
    OcrLabel,
    /// Barcode database lookup
    Barcode,
    /// Cloud vision over a gallery image
    AiLibrary,
}

impl ScanResultSource {
    /// Fixed display title
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::AiPhoto => "Photo analysis",
            Self::AiLabel => "Label analysis",
            Self::OcrLabel => "Label scan",
            Self::Barcode => "Barcode lookup",
            Self::AiLibrary => "Gallery analysis",
        }
    }

    /// Fixed display subtitle
    #[must_use]
    pub const fn subtitle(self) -> &'static str {
        match self {
            Self::AiPhoto => "Analyzed by cloud vision",
            Self::AiLabel => "Label read by cloud vision",
            Self::OcrLabel => "Label read on device",
            Self::Barcode => "Matched against the food database",
            Self::AiLibrary => "Analyzed by cloud vision",
        }
    }

    /// Whether producing this result consumed paid cloud credits.
    ///
    /// Barcode lookups and on-device label OCR are free; the rest are cloud AI.
    #[must_use]
    pub const fn uses_cloud_credits(self) -> bool {
        match self {
            Self::Barcode | Self::OcrLabel => false,
            Self::AiPhoto | Self::AiLabel | Self::AiLibrary => true,
        }
    }

    /// Stable storage key used by the summary store
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::AiPhoto => "photo_ai",
            Self::AiLabel => "label_ai",
            Self::OcrLabel => "label_ocr",
            Self::Barcode => "barcode",
            Self::AiLibrary => "library_ai",
        }
    }
}

/// A finalized, always-consistent scan result.
///
/// Invariant: `total_calories` and `total_macros` always equal the sums over
/// `items`; every mutation path recomputes them via
/// [`FoodScanResult::recompute_totals`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodScanResult {
    /// Unique identifier
    pub id: Uuid,
    /// Reference to the source image, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    /// Provenance of this result
    pub source: ScanResultSource,
    /// Detected items in detection order; non-empty after recovery
    pub items: Vec<FoodItem>,
    /// Sum of item calories
    pub total_calories: u32,
    /// Component-wise sum of item macros
    pub total_macros: MacroNutrients,
    /// Trust signal in [0, 1]; not a statistical probability
    pub confidence: f64,
    /// Short human-readable meal label
    pub meal_suggestion: String,
    /// When the capture happened
    pub captured_at: DateTime<Utc>,
}

impl FoodScanResult {
    /// Recompute derived totals from the item list.
    ///
    /// Totals are never trusted from any other source; call this after every
    /// mutation of `items`.
    pub fn recompute_totals(&mut self) {
        self.total_calories = sum_calories(&self.items);
        self.total_macros = sum_macros(&self.items);
    }
}

/// A finalized result plus the sticky recovery flag.
///
/// `was_recovered` stays true for the whole outcome once any sanitization
/// step had to invent or clamp a value, even if every later field was fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedScanOutcome {
    /// The sanitized, invariant-satisfying result
    pub result: FoodScanResult,
    /// Whether any recovery step fired
    pub was_recovered: bool,
}

/// On-device label OCR draft attached to a capture.
///
/// When complete enough, the session uses it directly and skips the network
/// call entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelDraft {
    /// Calories read from the label, when legible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    /// Protein grams read from the label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<u32>,
    /// Carbohydrate grams read from the label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs_g: Option<u32>,
    /// Fat grams read from the label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<u32>,
    /// OCR confidence in [0, 1]
    pub confidence: f64,
    /// Raw extracted text, kept for diagnostics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    /// Product name read from the label, when legible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
}

impl LabelDraft {
    /// How many of the three macro fields the draft carries
    #[must_use]
    pub const fn macro_field_count(&self) -> usize {
        self.protein_g.is_some() as usize
            + self.carbs_g.is_some() as usize
            + self.fat_g.is_some() as usize
    }
}

/// The raw capture, consumed exactly once by the session and never persisted
#[derive(Debug, Clone)]
pub struct PendingScanRequest {
    /// Captured image bytes
    pub image_bytes: Vec<u8>,
    /// Meal type the user declared, if any
    pub declared_meal_type: Option<MealType>,
    /// How the capture entered the pipeline
    pub input_mode: ScanInputMode,
    /// Pre-extracted on-device label OCR draft, if any
    pub label_draft: Option<LabelDraft>,
}

impl PendingScanRequest {
    /// The provenance tag a network-produced result from this capture carries
    #[must_use]
    pub const fn network_source(&self) -> ScanResultSource {
        match self.input_mode {
            ScanInputMode::Camera => ScanResultSource::AiPhoto,
            ScanInputMode::Label => ScanResultSource::AiLabel,
            ScanInputMode::Gallery => ScanResultSource::AiLibrary,
            ScanInputMode::Barcode => ScanResultSource::Barcode,
        }
    }
}

/// Barcode lookup payload from the recognition provider.
///
/// Treated as already trustworthy: it bypasses the recovery engine and
/// receives a fixed confidence based on `verified`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedFood {
    /// Product name
    pub name: String,
    /// Brand, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Serving description from the database
    pub serving_description: String,
    /// Calories per serving
    pub calories: u32,
    /// Macro breakdown per serving
    pub macros: MacroNutrients,
    /// Micronutrients per serving, when the database carries them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub micros: Option<MicroNutrients>,
    /// Whether this was an exact database match
    pub verified: bool,
}

impl ScannedFood {
    /// Convert into a [`FoodItem`] for inclusion in a scan result
    #[must_use]
    pub fn into_food_item(self) -> FoodItem {
        FoodItem {
            id: Uuid::new_v4(),
            name: self.name,
            serving_description: self.serving_description,
            quantity: 1.0,
            calories: self.calories,
            macros: self.macros,
            micros: self.micros,
            weight_grams: None,
            calorie_density: None,
        }
    }
}

/// Raw macro fields as the provider reported them, possibly negative
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMacros {
    /// Protein in grams, unvalidated
    pub protein_g: i64,
    /// Carbohydrates in grams, unvalidated
    pub carbs_g: i64,
    /// Fat in grams, unvalidated
    pub fat_g: i64,
}

impl RawMacros {
    /// Clamp each component at zero and narrow to the sanitized type
    #[must_use]
    pub fn sanitized(self) -> MacroNutrients {
        MacroNutrients {
            protein_g: clamp_to_u32(self.protein_g),
            carbs_g: clamp_to_u32(self.carbs_g),
            fat_g: clamp_to_u32(self.fat_g),
        }
    }
}

/// Raw micronutrient fields as the provider reported them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMicros {
    /// Fiber in grams, unvalidated
    pub fiber_g: i64,
    /// Sugar in grams, unvalidated
    pub sugar_g: i64,
    /// Sodium in milligrams, unvalidated
    pub sodium_mg: i64,
    /// Cholesterol in milligrams, unvalidated
    pub cholesterol_mg: i64,
    /// Vitamin C in milligrams, unvalidated
    pub vitamin_c_mg: i64,
    /// Calcium in milligrams, unvalidated
    pub calcium_mg: i64,
    /// Iron in milligrams, unvalidated
    pub iron_mg: i64,
}

impl RawMicros {
    /// Clamp each component at zero and narrow to the sanitized type
    #[must_use]
    pub fn sanitized(self) -> MicroNutrients {
        MicroNutrients {
            fiber_g: clamp_to_u32(self.fiber_g),
            sugar_g: clamp_to_u32(self.sugar_g),
            sodium_mg: clamp_to_u32(self.sodium_mg),
            cholesterol_mg: clamp_to_u32(self.cholesterol_mg),
            vitamin_c_mg: clamp_to_u32(self.vitamin_c_mg),
            calcium_mg: clamp_to_u32(self.calcium_mg),
            iron_mg: clamp_to_u32(self.iron_mg),
        }
    }
}

/// One food item exactly as the provider reported it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFoodItem {
    /// Name, possibly blank
    pub name: String,
    /// Serving description, possibly blank
    pub serving_description: String,
    /// Quantity multiplier, possibly non-positive
    pub quantity: f64,
    /// Calories, possibly zero or negative
    pub calories: i64,
    /// Macro fields, possibly negative
    pub macros: RawMacros,
    /// Micro fields, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub micros: Option<RawMicros>,
    /// Measured weight in grams, possibly non-positive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_grams: Option<f64>,
}

/// A scan result exactly as the provider returned it.
///
/// Nothing here is trusted: the recovery engine turns this into a
/// [`NormalizedScanOutcome`] that satisfies every data-model invariant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawScanResult {
    /// Detected items, possibly empty or malformed
    pub items: Vec<RawFoodItem>,
    /// Provider-reported total calories, ignored in favor of recomputation
    pub total_calories: i64,
    /// Provider-reported total macros, used only as a fallback energy hint
    pub total_macros: RawMacros,
    /// Provider-reported confidence, clamped during recovery
    pub confidence: f64,
    /// Provider-suggested meal label, possibly blank
    pub meal_suggestion: String,
    /// Reference to the analyzed image, when the provider echoes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

pub(crate) fn clamp_to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
