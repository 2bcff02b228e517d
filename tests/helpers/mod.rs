// ABOUTME: Shared test helpers for pipeline integration tests
// ABOUTME: Scripted recognition provider and raw-result builders

#![allow(missing_docs, dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod scripted_provider;

use mealscan_core::models::{
    PendingScanRequest, RawFoodItem, RawMacros, RawScanResult, ScanInputMode,
};

/// Minimal camera capture with a tiny stand-in image
pub fn camera_request() -> PendingScanRequest {
    PendingScanRequest {
        image_bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
        declared_meal_type: None,
        input_mode: ScanInputMode::Camera,
        label_draft: None,
    }
}

/// A well-formed raw item the recovery engine should pass through untouched
pub fn clean_raw_item(name: &str, calories: i64, protein: i64, carbs: i64, fat: i64) -> RawFoodItem {
    RawFoodItem {
        name: name.to_owned(),
        serving_description: "150 g".to_owned(),
        quantity: 1.0,
        calories,
        macros: RawMacros {
            protein_g: protein,
            carbs_g: carbs,
            fat_g: fat,
        },
        micros: None,
        weight_grams: Some(150.0),
    }
}

/// A well-formed raw result with one clean item
pub fn clean_raw_result() -> RawScanResult {
    RawScanResult {
        items: vec![clean_raw_item("Grilled chicken", 320, 38, 2, 17)],
        total_calories: 320,
        total_macros: RawMacros {
            protein_g: 38,
            carbs_g: 2,
            fat_g: 17,
        },
        confidence: 0.87,
        meal_suggestion: "Grilled chicken".to_owned(),
        image_ref: Some("capture-001".to_owned()),
    }
}
