// ABOUTME: System-wide constants for the meal scan pipeline
// ABOUTME: Energy coefficients, recovery defaults, confidence bands, and timing values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealscan Labs

//! # Constants Module
//!
//! Fixed values used across the pipeline. Timing values have environment
//! overrides in [`crate::config::ScanConfig`]; everything here is the
//! hardcoded baseline.

/// Standard Atwater energy coefficients (kcal per gram)
pub mod energy {
    /// Energy yield of one gram of protein
    pub const KCAL_PER_G_PROTEIN: u32 = 4;
    /// Energy yield of one gram of carbohydrate
    pub const KCAL_PER_G_CARBS: u32 = 4;
    /// Energy yield of one gram of fat
    pub const KCAL_PER_G_FAT: u32 = 9;
}

/// Recovery engine defaults for missing or malformed scan data
pub mod recovery {
    /// Calories substituted when an item reports none and its macros carry no energy
    pub const DEFAULT_ITEM_CALORIES: u32 = 120;

    /// Calories for a synthesized fallback meal when zero items survive sanitization
    pub const FALLBACK_MEAL_CALORIES: u32 = 260;
    /// Share of fallback calories allocated to protein
    pub const FALLBACK_PROTEIN_ENERGY_SHARE: f64 = 0.20;
    /// Share of fallback calories allocated to fat
    pub const FALLBACK_FAT_ENERGY_SHARE: f64 = 0.30;
    /// Floor for synthesized protein grams
    pub const FALLBACK_MIN_PROTEIN_G: u32 = 8;
    /// Floor for synthesized fat grams
    pub const FALLBACK_MIN_FAT_G: u32 = 6;
    /// Floor for synthesized carbohydrate grams
    pub const FALLBACK_MIN_CARBS_G: u32 = 10;

    /// Substitute name for the first unnamed item
    pub const UNNAMED_FIRST_ITEM: &str = "Unidentified meal item";
    /// Substitute serving description for a blank one
    pub const UNNAMED_SERVING: &str = "1 serving (est.)";
    /// Substitute meal label when nothing usable is available
    pub const UNNAMED_MEAL: &str = "Unidentified meal";

    /// Confidence band for results that required recovery.
    /// A recovered result can never present as highly confident.
    pub const RECOVERED_CONFIDENCE_MIN: f64 = 0.34;
    /// Upper bound of the recovered confidence band
    pub const RECOVERED_CONFIDENCE_MAX: f64 = 0.58;
    /// Lower bound of the clean (non-recovered) confidence band.
    /// The [0.45, 0.58] overlap with the recovered band is intentional.
    pub const CLEAN_CONFIDENCE_MIN: f64 = 0.45;
    /// Upper bound of the clean confidence band
    pub const CLEAN_CONFIDENCE_MAX: f64 = 0.98;
}

/// Confidence scorer penalties and clamps
pub mod confidence {
    /// Penalty when an item has no measured weight (portion estimated)
    pub const PENALTY_NO_WEIGHT: i32 = 7;
    /// Penalty when an item's macros are all zero (macro data limited)
    pub const PENALTY_NO_MACROS: i32 = 10;
    /// Penalty when the serving description uses a vague unit (serving inferred)
    pub const PENALTY_VAGUE_SERVING: i32 = 4;
    /// Floor of the per-item confidence percentage
    pub const ITEM_MIN_PERCENT: i32 = 35;
    /// Ceiling of the per-item confidence percentage
    pub const ITEM_MAX_PERCENT: i32 = 99;

    /// Penalty per user edit to the overall confidence percentage
    pub const EDIT_PENALTY: i32 = 2;
    /// Floor of the overall post-edit confidence percentage
    pub const OVERALL_MIN_PERCENT: i32 = 45;
    /// Ceiling of the overall post-edit confidence percentage
    pub const OVERALL_MAX_PERCENT: i32 = 99;

    /// Serving units too vague to anchor a portion estimate
    pub const VAGUE_SERVING_UNITS: &[&str] =
        &["piece", "cup", "slice", "bowl", "handful", "serving"];
}

/// Acquisition controller timing and retry classification
pub mod acquisition {
    /// Timeout for the first provider attempt, in seconds
    pub const FIRST_ATTEMPT_TIMEOUT_SECS: u64 = 45;
    /// Timeout for the second (and last) provider attempt, in seconds
    pub const SECOND_ATTEMPT_TIMEOUT_SECS: u64 = 35;
    /// Delay between the two attempts, in milliseconds
    pub const RETRY_BACKOFF_MS: u64 = 700;

    /// Failure-message substrings that mark a failure as transient (retried once)
    pub const TRANSIENT_MARKERS: &[&str] = &["timeout", "network", "connection"];
}

/// Portion scaling bounds
pub mod portion {
    /// Smallest factor a single scale edit may apply
    pub const SCALE_FACTOR_MIN: f64 = 0.65;
    /// Largest factor a single scale edit may apply
    pub const SCALE_FACTOR_MAX: f64 = 1.45;
    /// Floor for the quantity multiplier after scaling
    pub const MIN_QUANTITY: f64 = 0.1;
    /// Floor for calories after scaling
    pub const MIN_CALORIES: u32 = 1;
}

/// Barcode lookup trust values
pub mod barcode {
    /// Confidence assigned to a verified database match
    pub const VERIFIED_CONFIDENCE: f64 = 0.95;
    /// Confidence assigned to an unverified lookup result
    pub const UNVERIFIED_CONFIDENCE: f64 = 0.80;
}

/// On-device label draft completeness thresholds
pub mod label_draft {
    /// Minimum OCR draft confidence for the network call to be skipped
    pub const MIN_CONFIDENCE: f64 = 0.52;
    /// Minimum count of {protein, carbs, fat} fields the draft must carry
    pub const MIN_MACRO_FIELDS: usize = 2;
}

/// Progress ticker step catalogs per input mode.
///
/// Steps are (label, dwell milliseconds). They exist purely for perceived
/// progress and carry no semantic weight; the ticker is aborted the moment
/// the real outcome arrives.
pub mod progress {
    /// Steps shown while a camera photo is analyzed
    pub const CAMERA_STEPS: &[(&str, u64)] = &[
        ("Uploading photo", 600),
        ("Detecting food items", 850),
        ("Estimating portions", 750),
        ("Computing nutrition", 700),
        ("Preparing recommendations", 550),
    ];

    /// Steps shown while a packaging label is analyzed
    pub const LABEL_STEPS: &[(&str, u64)] = &[
        ("Uploading label", 550),
        ("Reading label text", 800),
        ("Parsing nutrition facts", 750),
        ("Computing nutrition", 650),
        ("Preparing recommendations", 500),
    ];

    /// Steps shown while a gallery image is analyzed
    pub const GALLERY_STEPS: &[(&str, u64)] = &[
        ("Importing image", 500),
        ("Detecting food items", 850),
        ("Estimating portions", 750),
        ("Computing nutrition", 700),
        ("Preparing recommendations", 550),
    ];
}
