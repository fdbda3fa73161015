//! Mocked crop insights.
//!
//! Disease detection and yield prediction are placeholders for real models:
//! both wait for the configured latency and return canned or trivially
//! derived results.

use std::time::Duration;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Tons harvested per acre assumed by the yield model.
const YIELD_TONS_PER_ACRE: Decimal = Decimal::from_parts(42, 0, 0, false, 1);

/// Result of analysing a crop photo.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseReport {
    pub disease: &'static str,
    pub confidence: f64,
    pub description: &'static str,
    pub treatment: &'static str,
    pub preventive_measures: &'static [&'static str],
}

const LATE_BLIGHT: DiseaseReport = DiseaseReport {
    disease: "Late Blight",
    confidence: 0.92,
    description: "Late blight is a devastating disease that affects tomatoes and potatoes. \
                  The disease is caused by the fungus-like organism Phytophthora infestans.",
    treatment: "Apply fungicide immediately. Remove and destroy infected plants. \
                Improve air circulation.",
    preventive_measures: &[
        "Use disease-resistant varieties",
        "Maintain proper plant spacing",
        "Water at the base of plants",
        "Practice crop rotation",
    ],
};

/// Soil classes offered by the yield form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    Loamy,
    Sandy,
    Clay,
    Silt,
}

/// Farm conditions submitted for a yield prediction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldInputs {
    /// Minimum temperature (°C)
    pub min_temp: f64,
    /// Maximum temperature (°C)
    pub max_temp: f64,
    /// Rainfall (mm)
    pub rainfall: f64,
    pub soil_type: SoilType,
    /// Soil moisture (%)
    pub soil_moisture: f64,
    pub soil_ph: f64,
    /// Nitrogen (mg/kg)
    pub nitrogen: f64,
    /// Phosphorus (mg/kg)
    pub phosphorus: f64,
    /// Potassium (mg/kg)
    pub potassium: f64,
    /// Organic matter (%)
    pub organic_matter: f64,
    pub location: String,
    /// Land size (acres)
    pub land_size: Decimal,
}

/// Predicted harvest for a plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldPrediction {
    /// Tons, one decimal place.
    pub predicted_yield: Decimal,
    pub confidence: f64,
    pub optimization_tips: &'static [&'static str],
}

const OPTIMIZATION_TIPS: &[&str] = &[
    "Consider increasing nitrogen application by 10%",
    "Optimal planting time would be early March",
    "Current soil conditions are favorable",
    "Irrigation schedule looks appropriate",
];

/// Mocked inference backend.
#[derive(Debug, Clone)]
pub struct InsightService {
    latency: Duration,
}

impl InsightService {
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Analyse a crop photo.
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    pub async fn detect_disease(&self, image: &[u8]) -> DiseaseReport {
        self.simulate_latency().await;
        tracing::debug!(disease = LATE_BLIGHT.disease, "Disease detection complete");
        LATE_BLIGHT
    }

    /// Predict yield for the submitted conditions.
    #[instrument(skip(self, inputs), fields(location = %inputs.location, soil = ?inputs.soil_type))]
    pub async fn predict_yield(&self, inputs: &YieldInputs) -> YieldPrediction {
        self.simulate_latency().await;
        predict(inputs.land_size)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn predict(land_size: Decimal) -> YieldPrediction {
    let predicted_yield = (land_size * YIELD_TONS_PER_ACRE)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);

    YieldPrediction {
        predicted_yield,
        confidence: 0.89,
        optimization_tips: OPTIMIZATION_TIPS,
    }
}
