//! Error types for the sales-entry pipeline.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::FuelType;

/// Errors raised while preparing a daily entry for persistence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryError {
    /// Entry date lies in the future.
    #[error("Entry date cannot be in the future")]
    FutureDate,

    /// A reading or amount is negative.
    #[error("{field} cannot be negative")]
    NegativeReading {
        /// The offending field.
        field: &'static str,
    },

    /// A closing meter reading fell below its opening reading.
    /// Meters are monotonic counters.
    #[error("Closing meter reading {fuel} cannot be less than opening meter reading {fuel}")]
    MeterRegression {
        /// The fuel whose meter regressed.
        fuel: FuelType,
    },

    /// A closing tank reading exceeds its opening reading. Tank level
    /// must not increase without a delivery event.
    #[error("Closing tank reading {fuel} cannot be greater than opening tank reading {fuel}")]
    TankLevelIncrease {
        /// The fuel whose tank level increased.
        fuel: FuelType,
    },

    /// Submitted net sales differ from the model prediction beyond
    /// tolerance.
    #[error(
        "Net sales value ({submitted}) differs significantly from prediction \
         ({predicted:.2}). Please verify your entries."
    )]
    ImplausibleNetSales {
        /// The value the supervisor asserted.
        submitted: Decimal,
        /// The model's estimate.
        predicted: f64,
    },

    /// The entry could not be converted into model features.
    #[error("Could not validate sales entry: {0}")]
    FeatureExtraction(String),
}

impl EntryError {
    /// True for the variants the consistency validator raises.
    #[must_use]
    pub const fn is_consistency(&self) -> bool {
        matches!(self, Self::TankLevelIncrease { .. })
    }
}
