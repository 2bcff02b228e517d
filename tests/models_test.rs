// ABOUTME: Integration tests for the nutrition data model
// ABOUTME: Portion scaling clamps, saturating sums, and source tag properties

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use mealscan_core::models::{
    sum_calories, sum_macros, CalorieDensity, FoodItem, MacroNutrients, MicroNutrients,
    ScanResultSource,
};
use uuid::Uuid;

fn item(calories: u32, protein: u32, carbs: u32, fat: u32) -> FoodItem {
    FoodItem {
        id: Uuid::new_v4(),
        name: "Test food".to_owned(),
        serving_description: "100 g".to_owned(),
        quantity: 1.0,
        calories,
        macros: MacroNutrients::new(protein, carbs, fat),
        micros: None,
        weight_grams: Some(100.0),
        calorie_density: None,
    }
}

#[test]
fn scale_with_factor_one_is_identity() {
    let original = item(320, 38, 2, 17);
    let scaled = original.scaled(1.0);
    assert_eq!(scaled.calories, original.calories);
    assert_eq!(scaled.macros, original.macros);
    assert!((scaled.quantity - original.quantity).abs() < f64::EPSILON);
}

#[test]
fn scale_factor_is_clamped_to_sane_window() {
    let original = item(200, 10, 20, 8);

    let shrunk = original.scaled(0.01);
    // 0.01 clamps to 0.65
    assert_eq!(shrunk.calories, 130);

    let grown = original.scaled(10.0);
    // 10.0 clamps to 1.45
    assert_eq!(grown.calories, 290);
}

#[test]
fn scaled_calories_never_drop_below_one() {
    let tiny = item(1, 0, 0, 0);
    let scaled = tiny.scaled(0.65);
    assert!(scaled.calories >= 1);
}

#[test]
fn scaled_quantity_floors_at_tenth() {
    let mut small = item(100, 5, 10, 3);
    small.quantity = 0.1;
    let scaled = small.scaled(0.65);
    assert!(scaled.quantity >= 0.1);
}

#[test]
fn scale_recomputes_micros_proportionally() {
    let mut with_micros = item(200, 10, 20, 8);
    with_micros.micros = Some(MicroNutrients {
        fiber_g: 10,
        sugar_g: 8,
        sodium_mg: 400,
        cholesterol_mg: 0,
        vitamin_c_mg: 12,
        calcium_mg: 80,
        iron_mg: 2,
    });

    let scaled = with_micros.scaled(1.45);
    let micros = scaled.micros.unwrap();
    assert_eq!(micros.fiber_g, 15); // 10 * 1.45 = 14.5, rounds to 15
    assert_eq!(micros.sodium_mg, 580);
}

#[test]
fn scaling_across_the_window_keeps_macros_non_negative() {
    let original = item(200, 10, 20, 8);
    for factor in [0.65, 0.8, 1.0, 1.2, 1.45] {
        let scaled = original.scaled(factor);
        assert!(scaled.calories >= 1);
        // u32 macros cannot go negative; the interesting property is rounding
        // stays proportional.
        assert!(scaled.macros.protein_g <= 15);
    }
}

#[test]
fn sums_are_component_wise_over_items() {
    let items = vec![item(320, 38, 2, 17), item(210, 4, 45, 1)];
    assert_eq!(sum_calories(&items), 530);
    assert_eq!(sum_macros(&items), MacroNutrients::new(42, 47, 18));
}

#[test]
fn macro_arithmetic_saturates_at_zero() {
    let a = MacroNutrients::new(5, 10, 2);
    let b = MacroNutrients::new(8, 3, 9);
    assert_eq!(a.saturating_sub(b), MacroNutrients::new(0, 7, 0));
}

#[test]
fn macro_energy_uses_atwater_coefficients() {
    assert_eq!(MacroNutrients::new(4, 45, 1).energy_kcal(), 205);
}

#[test]
fn calorie_density_requires_positive_weight() {
    assert_eq!(CalorieDensity::from_weight(500, None), None);
    assert_eq!(CalorieDensity::from_weight(500, Some(0.0)), None);
    assert_eq!(
        CalorieDensity::from_weight(100, Some(100.0)),
        Some(CalorieDensity::Low)
    );
    assert_eq!(
        CalorieDensity::from_weight(250, Some(100.0)),
        Some(CalorieDensity::Moderate)
    );
    assert_eq!(
        CalorieDensity::from_weight(550, Some(100.0)),
        Some(CalorieDensity::High)
    );
}

#[test]
fn source_tags_expose_fixed_metadata() {
    assert_eq!(ScanResultSource::AiPhoto.storage_key(), "photo_ai");
    assert_eq!(ScanResultSource::AiLabel.storage_key(), "label_ai");
    assert_eq!(ScanResultSource::OcrLabel.storage_key(), "label_ocr");
    assert_eq!(ScanResultSource::Barcode.storage_key(), "barcode");
    assert_eq!(ScanResultSource::AiLibrary.storage_key(), "library_ai");

    // Barcode and on-device OCR are the free paths.
    assert!(!ScanResultSource::Barcode.uses_cloud_credits());
    assert!(!ScanResultSource::OcrLabel.uses_cloud_credits());
    assert!(ScanResultSource::AiPhoto.uses_cloud_credits());
    assert!(ScanResultSource::AiLabel.uses_cloud_credits());
    assert!(ScanResultSource::AiLibrary.uses_cloud_credits());
}
