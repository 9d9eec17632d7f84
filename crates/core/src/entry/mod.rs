//! Sales-entry derivation and validation pipeline.
//!
//! This module implements the daily-entry core:
//! - Domain types (branch, fuel, draft and derived figures)
//! - Opening-value backfill from the branch's prior entry
//! - The derivation engine (fixed dependency order)
//! - Physical-consistency validation
//! - The entry service sequencing every stage ahead of persistence

pub mod backfill;
pub mod derive;
pub mod error;
pub mod service;
pub mod types;
pub mod validate;

#[cfg(test)]
mod derive_props;

pub use backfill::{backfill_openings, needs_backfill};
pub use derive::derive_totals;
pub use error::EntryError;
pub use service::EntryService;
pub use types::{Branch, DerivedTotals, EntryDraft, FuelType, PreparedEntry, PriorReadings};
pub use validate::{openings_empty, validate_consistency, validate_fields};
