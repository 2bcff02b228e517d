// ABOUTME: Core nutrition model types and pure arithmetic over them
// ABOUTME: FoodItem, macro/micro nutrient aggregates, totals, and portion scaling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealscan Labs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{energy, portion};

/// Macronutrient breakdown in grams.
///
/// All arithmetic saturates at zero; a negative quantity can never surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroNutrients {
    /// Protein in grams
    pub protein_g: u32,
    /// Carbohydrates in grams
    pub carbs_g: u32,
    /// Fat in grams
    pub fat_g: u32,
}

impl MacroNutrients {
    /// Construct a macro breakdown
    #[must_use]
    pub const fn new(protein_g: u32, carbs_g: u32, fat_g: u32) -> Self {
        Self {
            protein_g,
            carbs_g,
            fat_g,
        }
    }

    /// Energy carried by these macros using the standard Atwater coefficients
    #[must_use]
    pub const fn energy_kcal(&self) -> u32 {
        self.protein_g * energy::KCAL_PER_G_PROTEIN
            + self.carbs_g * energy::KCAL_PER_G_CARBS
            + self.fat_g * energy::KCAL_PER_G_FAT
    }

    /// Component-wise saturating sum
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self {
            protein_g: self.protein_g.saturating_add(other.protein_g),
            carbs_g: self.carbs_g.saturating_add(other.carbs_g),
            fat_g: self.fat_g.saturating_add(other.fat_g),
        }
    }

    /// Component-wise saturating difference (floored at zero)
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self {
            protein_g: self.protein_g.saturating_sub(other.protein_g),
            carbs_g: self.carbs_g.saturating_sub(other.carbs_g),
            fat_g: self.fat_g.saturating_sub(other.fat_g),
        }
    }

    /// Whether every component is zero
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.protein_g == 0 && self.carbs_g == 0 && self.fat_g == 0
    }

    /// Scale each component by `factor`, rounding to the nearest gram
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            protein_g: scale_nutrient(self.protein_g, factor),
            carbs_g: scale_nutrient(self.carbs_g, factor),
            fat_g: scale_nutrient(self.fat_g, factor),
        }
    }
}

/// Optional micronutrient breakdown.
///
/// Units follow label conventions: fiber and sugar in grams, the rest in
/// milligrams. All values are non-negative by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicroNutrients {
    /// Dietary fiber in grams
    pub fiber_g: u32,
    /// Sugar in grams
    pub sugar_g: u32,
    /// Sodium in milligrams
    pub sodium_mg: u32,
    /// Cholesterol in milligrams
    pub cholesterol_mg: u32,
    /// Vitamin C in milligrams
    pub vitamin_c_mg: u32,
    /// Calcium in milligrams
    pub calcium_mg: u32,
    /// Iron in milligrams
    pub iron_mg: u32,
}

impl MicroNutrients {
    /// Scale each component by `factor`, rounding to the nearest unit
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            fiber_g: scale_nutrient(self.fiber_g, factor),
            sugar_g: scale_nutrient(self.sugar_g, factor),
            sodium_mg: scale_nutrient(self.sodium_mg, factor),
            cholesterol_mg: scale_nutrient(self.cholesterol_mg, factor),
            vitamin_c_mg: scale_nutrient(self.vitamin_c_mg, factor),
            calcium_mg: scale_nutrient(self.calcium_mg, factor),
            iron_mg: scale_nutrient(self.iron_mg, factor),
        }
    }
}

/// Calorie-density classification derived from energy per gram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalorieDensity {
    /// Below 1.5 kcal/g
    Low,
    /// 1.5 to 4.0 kcal/g
    Moderate,
    /// 4.0 kcal/g and above
    High,
}

impl CalorieDensity {
    /// Classify energy density from calories and measured weight.
    ///
    /// Returns `None` when the weight is absent or non-positive, since a
    /// density without a real weight would be meaningless.
    #[must_use]
    pub fn from_weight(calories: u32, weight_grams: Option<f64>) -> Option<Self> {
        let weight = weight_grams.filter(|w| *w > 0.0)?;
        let kcal_per_gram = f64::from(calories) / weight;
        if kcal_per_gram < 1.5 {
            Some(Self::Low)
        } else if kcal_per_gram < 4.0 {
            Some(Self::Moderate)
        } else {
            Some(Self::High)
        }
    }
}

/// One detected food item within a scan result.
///
/// Invariants: `calories` is non-negative by type; `weight_grams`, when
/// present, is strictly positive (zero or negative measured weight is stored
/// as `None`, never as a value).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Human-readable serving description, e.g. "1 bowl (250 g)"
    pub serving_description: String,
    /// Quantity multiplier relative to the described serving
    pub quantity: f64,
    /// Calories for this item at the current quantity
    pub calories: u32,
    /// Macronutrient breakdown
    pub macros: MacroNutrients,
    /// Optional micronutrient breakdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub micros: Option<MicroNutrients>,
    /// Measured weight in grams, when the capture could estimate one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_grams: Option<f64>,
    /// Energy-density classification, when derivable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_density: Option<CalorieDensity>,
}

impl FoodItem {
    /// Scale this item's portion by `factor`.
    ///
    /// The factor is clamped to the sane portion window so a single tap can
    /// never produce an absurd serving. Quantity, calories, macros, and (when
    /// present) micros are recomputed proportionally; nutrients round to the
    /// nearest gram and floor at zero, calories floor at 1, quantity floors
    /// at 0.1. Scaling by 1.0 is the identity.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = factor.clamp(portion::SCALE_FACTOR_MIN, portion::SCALE_FACTOR_MAX);
        let calories =
            ((f64::from(self.calories) * factor).round() as u32).max(portion::MIN_CALORIES);
        Self {
            id: self.id,
            name: self.name.clone(),
            serving_description: self.serving_description.clone(),
            quantity: (self.quantity * factor).max(portion::MIN_QUANTITY),
            calories,
            macros: self.macros.scaled(factor),
            micros: self.micros.map(|m| m.scaled(factor)),
            weight_grams: self.weight_grams,
            calorie_density: self.calorie_density,
        }
    }
}

/// Sum the macro breakdowns of a slice of items, saturating component-wise
#[must_use]
pub fn sum_macros(items: &[FoodItem]) -> MacroNutrients {
    items
        .iter()
        .fold(MacroNutrients::default(), |acc, item| {
            acc.saturating_add(item.macros)
        })
}

/// Sum the calories of a slice of items, saturating at `u32::MAX`
#[must_use]
pub fn sum_calories(items: &[FoodItem]) -> u32 {
    items
        .iter()
        .fold(0u32, |acc, item| acc.saturating_add(item.calories))
}

fn scale_nutrient(value: u32, factor: f64) -> u32 {
    (f64::from(value) * factor).round() as u32
}
