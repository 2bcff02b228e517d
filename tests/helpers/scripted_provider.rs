// ABOUTME: Scripted recognition provider for testing the pipeline without a network
// ABOUTME: Plays back a fixed sequence of outcomes and counts every call

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use mealscan_core::errors::{PipelineResult, ScanError};
use mealscan_core::models::{MacroNutrients, MealType, RawScanResult, ScannedFood};
use mealscan_core::providers::RecognitionProvider;

/// One scripted response for a `scan` call
pub enum ScanStep {
    /// Succeed with this raw result
    Succeed(Box<RawScanResult>),
    /// Fail with a provider error carrying this message
    Fail(&'static str),
    /// Sleep this long before succeeding (exercises the timeout race)
    Stall(Duration, Box<RawScanResult>),
}

/// Recognition provider that plays back a fixed script of outcomes.
///
/// Every call is counted so tests can assert the exact number of provider
/// invocations (retry bounds, single-flight). When the script runs out the
/// last step repeats.
pub struct ScriptedProvider {
    scan_calls: AtomicUsize,
    barcode_calls: AtomicUsize,
    script: Mutex<Vec<ScanStep>>,
    barcode_response: Mutex<Option<PipelineResult<ScannedFood>>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<ScanStep>) -> Self {
        Self {
            scan_calls: AtomicUsize::new(0),
            barcode_calls: AtomicUsize::new(0),
            script: Mutex::new(script),
            barcode_response: Mutex::new(None),
        }
    }

    pub fn with_barcode(response: PipelineResult<ScannedFood>) -> Self {
        Self::with_scan_and_barcode(Vec::new(), response)
    }

    pub fn with_scan_and_barcode(
        script: Vec<ScanStep>,
        response: PipelineResult<ScannedFood>,
    ) -> Self {
        let provider = Self::new(script);
        *provider.barcode_response.lock().unwrap() = Some(response);
        provider
    }

    pub fn scan_calls(&self) -> usize {
        self.scan_calls.load(Ordering::SeqCst)
    }

    pub fn barcode_calls(&self) -> usize {
        self.barcode_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecognitionProvider for ScriptedProvider {
    async fn scan(
        &self,
        _image: &[u8],
        _meal_type: Option<MealType>,
    ) -> PipelineResult<RawScanResult> {
        let call = self.scan_calls.fetch_add(1, Ordering::SeqCst);
        let step = {
            let mut script = self.script.lock().unwrap();
            let index = call.min(script.len().saturating_sub(1));
            assert!(!script.is_empty(), "scan called with an empty script");
            match &mut script[index] {
                ScanStep::Succeed(raw) => ScanStep::Succeed(raw.clone()),
                ScanStep::Fail(message) => ScanStep::Fail(*message),
                ScanStep::Stall(delay, raw) => ScanStep::Stall(*delay, raw.clone()),
            }
        };
        match step {
            ScanStep::Succeed(raw) => Ok(*raw),
            ScanStep::Fail(message) => Err(ScanError::provider(message)),
            ScanStep::Stall(delay, raw) => {
                tokio::time::sleep(delay).await;
                Ok(*raw)
            }
        }
    }

    async fn lookup_barcode(&self, _code: &str) -> PipelineResult<ScannedFood> {
        self.barcode_calls.fetch_add(1, Ordering::SeqCst);
        let response = self.barcode_response.lock().unwrap();
        match response.as_ref() {
            Some(Ok(food)) => Ok(food.clone()),
            Some(Err(err)) => Err(ScanError::provider(err.to_string())),
            None => Err(ScanError::provider("no barcode scripted")),
        }
    }
}

/// A verified barcode database hit
pub fn verified_scanned_food() -> ScannedFood {
    ScannedFood {
        name: "Oat bar".to_owned(),
        brand: Some("Granola Co".to_owned()),
        serving_description: "1 bar (45 g)".to_owned(),
        calories: 190,
        macros: MacroNutrients::new(4, 28, 7),
        micros: None,
        verified: true,
    }
}
