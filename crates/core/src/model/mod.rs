//! Net-sales predictive model boundary.
//!
//! The model is the one place in the domain that speaks f64: its
//! training contract is a fixed-order vector of 27 floats. Everything
//! upstream stays in `Decimal`; conversion happens here and a failed
//! conversion is a feature-extraction error, never a silent default.

// The model contract is float-typed; Decimal arithmetic stops at this seam.
#![allow(clippy::float_arithmetic, clippy::float_cmp)]

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entry::error::EntryError;
use crate::entry::types::{DerivedTotals, EntryDraft};

/// Number of features the net-sales model consumes.
pub const FEATURE_COUNT: usize = 27;

/// Maximum accepted gap between submitted and predicted net sales,
/// in currency units.
pub const NET_SALES_TOLERANCE: f64 = 30.00;

/// The fixed-order feature vector fed to the model.
///
/// The field order is part of the model's training contract and must
/// stay stable across releases.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// The features as a slice, in contract order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// A net-sales estimator: 27 features in, one estimate out.
///
/// Constructed once at process start and injected into the entry
/// pipeline, so tests can substitute a double.
pub trait NetSalesModel: Send + Sync {
    /// Predicts net sales for the given features.
    fn predict(&self, features: &FeatureVector) -> f64;
}

fn to_feature(field: &'static str, value: Decimal) -> Result<f64, EntryError> {
    value
        .to_f64()
        .ok_or_else(|| EntryError::FeatureExtraction(format!("{field} is not representable")))
}

/// Builds the model's feature vector from a derived entry.
///
/// # Errors
///
/// Returns `EntryError::FeatureExtraction` if any figure cannot be
/// represented as a float.
pub fn extract_features(
    draft: &EntryDraft,
    totals: &DerivedTotals,
) -> Result<FeatureVector, EntryError> {
    Ok(FeatureVector([
        to_feature("opening_meter_reading_ago", draft.opening_meter_reading_ago)?,
        to_feature("opening_meter_reading_pms", draft.opening_meter_reading_pms)?,
        to_feature("closing_meter_reading_ago", draft.closing_meter_reading_ago)?,
        to_feature("closing_meter_reading_pms", draft.closing_meter_reading_pms)?,
        to_feature("opening_tank_reading_ago", draft.opening_tank_reading_ago)?,
        to_feature("opening_tank_reading_pms", draft.opening_tank_reading_pms)?,
        to_feature("closing_tank_reading_ago", draft.closing_tank_reading_ago)?,
        to_feature("closing_tank_reading_pms", draft.closing_tank_reading_pms)?,
        to_feature("pump_test_ago", draft.pump_test_ago)?,
        to_feature("pump_test_pms", draft.pump_test_pms)?,
        to_feature("received_ago", draft.received_ago)?,
        to_feature("received_pms", draft.received_pms)?,
        to_feature("sales_ago", totals.sales_ago)?,
        to_feature("sales_pms", totals.sales_pms)?,
        to_feature("actuals_ago", totals.actuals_ago)?,
        to_feature("actuals_pms", totals.actuals_pms)?,
        to_feature("variation_ago", totals.variation_ago)?,
        to_feature("variation_pms", totals.variation_pms)?,
        to_feature("unit_price_ago", draft.unit_price_ago)?,
        to_feature("unit_price_pms", draft.unit_price_pms)?,
        to_feature("actuals_in_cedis_ago", totals.actuals_in_cedis_ago)?,
        to_feature("actuals_in_cedis_pms", totals.actuals_in_cedis_pms)?,
        to_feature("collections_cash", draft.collections_cash)?,
        to_feature("collections_cheque", draft.collections_cheque)?,
        to_feature("credit_ago", draft.credit_ago)?,
        to_feature("credit_pms", draft.credit_pms)?,
        to_feature("expenditure", draft.expenditure)?,
    ]))
}

/// Converts the supervisor's asserted net sales for comparison against
/// a prediction.
///
/// # Errors
///
/// Returns `EntryError::FeatureExtraction` if the value cannot be
/// represented as a float.
pub fn submitted_net_sales(draft: &EntryDraft) -> Result<f64, EntryError> {
    to_feature("net_sales", draft.net_sales)
}

/// Whether a submitted value sits within tolerance of the prediction.
#[must_use]
pub fn within_tolerance(submitted: f64, predicted: f64) -> bool {
    (submitted - predicted).abs() <= NET_SALES_TOLERANCE
}

/// Errors that can occur while loading a model artifact.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    /// The artifact file could not be read.
    #[error("failed to read model file {path}: {source}")]
    Io {
        /// Path that was attempted.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The artifact is not valid JSON.
    #[error("failed to parse model file {path}: {source}")]
    Parse {
        /// Path that was attempted.
        path: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// The coefficient vector has the wrong length.
    #[error("model expects {expected} coefficients, artifact has {got}")]
    WrongShape {
        /// Required coefficient count.
        expected: usize,
        /// Count found in the artifact.
        got: usize,
    },
}

/// A linear net-sales model: intercept plus one coefficient per feature.
///
/// The production artifact is exported from the training pipeline as a
/// JSON file and loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearNetSalesModel {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LinearNetSalesModel {
    /// Builds a model from an intercept and exactly 27 coefficients.
    ///
    /// # Errors
    ///
    /// Returns `ModelLoadError::WrongShape` on a length mismatch.
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Result<Self, ModelLoadError> {
        if coefficients.len() != FEATURE_COUNT {
            return Err(ModelLoadError::WrongShape {
                expected: FEATURE_COUNT,
                got: coefficients.len(),
            });
        }
        Ok(Self {
            intercept,
            coefficients,
        })
    }

    /// Loads the model artifact from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `ModelLoadError` if the file cannot be read, parsed, or
    /// has the wrong coefficient count.
    pub fn from_path(path: &str) -> Result<Self, ModelLoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
            path: path.to_string(),
            source,
        })?;
        let model: Self = serde_json::from_str(&raw).map_err(|source| ModelLoadError::Parse {
            path: path.to_string(),
            source,
        })?;
        Self::new(model.intercept, model.coefficients)
    }
}

impl NetSalesModel for LinearNetSalesModel {
    fn predict(&self, features: &FeatureVector) -> f64 {
        self.intercept
            + features
                .as_slice()
                .iter()
                .zip(&self.coefficients)
                .map(|(x, c)| x * c)
                .sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::derive_totals;
    use crate::entry::types::Branch;
    use rust_decimal_macros::dec;

    fn draft() -> EntryDraft {
        EntryDraft {
            branch: Branch::Tarkwa,
            date: chrono::Utc::now(),
            opening_meter_reading_ago: dec!(100),
            closing_meter_reading_ago: dec!(200),
            opening_meter_reading_pms: dec!(300),
            closing_meter_reading_pms: dec!(450),
            opening_tank_reading_ago: dec!(800),
            closing_tank_reading_ago: dec!(700),
            opening_tank_reading_pms: dec!(900),
            closing_tank_reading_pms: dec!(750),
            pump_test_ago: dec!(1),
            pump_test_pms: dec!(2),
            received_ago: dec!(3),
            received_pms: dec!(4),
            unit_price_ago: dec!(13),
            unit_price_pms: dec!(14),
            credit_ago: dec!(5),
            credit_pms: dec!(6),
            collections_cash: dec!(700),
            collections_cheque: dec!(80),
            expenditure: dec!(90),
            comment: None,
            net_sales: dec!(1234.56),
        }
    }

    #[test]
    fn test_feature_order_is_stable() {
        let d = draft();
        let totals = derive_totals(&d);
        let features = extract_features(&d, &totals).unwrap();
        let f = features.as_slice();

        assert_eq!(f.len(), FEATURE_COUNT);
        assert_eq!(f[0], 100.0); // opening_meter_reading_ago
        assert_eq!(f[2], 200.0); // closing_meter_reading_ago
        assert_eq!(f[12], 97.0); // sales_ago = 800 - 700 - 3
        assert_eq!(f[14], 99.0); // actuals_ago = 200 - 100 - 1
        assert_eq!(f[18], 13.0); // unit_price_ago
        assert_eq!(f[26], 90.0); // expenditure
    }

    #[test]
    fn test_linear_model_prediction() {
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[0] = 2.0;
        coefficients[26] = 1.0;
        let model = LinearNetSalesModel::new(10.0, coefficients).unwrap();

        let d = draft();
        let totals = derive_totals(&d);
        let features = extract_features(&d, &totals).unwrap();

        // 10 + 2*100 + 1*90
        assert_eq!(model.predict(&features), 300.0);
    }

    #[test]
    fn test_wrong_shape_rejected() {
        let result = LinearNetSalesModel::new(0.0, vec![1.0; 5]);
        assert!(matches!(
            result,
            Err(ModelLoadError::WrongShape {
                expected: FEATURE_COUNT,
                got: 5
            })
        ));
    }

    #[test]
    fn test_tolerance_boundary() {
        assert!(within_tolerance(1000.0, 1030.0));
        assert!(within_tolerance(1000.0, 970.0));
        assert!(!within_tolerance(1000.0, 1030.01));
        assert!(!within_tolerance(1000.0, 969.99));
    }

    #[test]
    fn test_submitted_net_sales_matches_draft() {
        let value = submitted_net_sales(&draft()).unwrap();
        assert!((value - 1234.56).abs() < 1e-9);
    }
}
