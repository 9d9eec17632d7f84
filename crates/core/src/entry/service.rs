//! Entry service: the pipeline every write runs before persistence.
//!
//! Each stage is an explicit step rather than a storage hook, so tests
//! can drive stages independently and failure ordering is fixed:
//! field validation, backfill, derivation, consistency, plausibility.
//! A failure at any stage rejects the whole write.

use chrono::{DateTime, Utc};

use super::backfill::backfill_openings;
use super::derive::derive_totals;
use super::error::EntryError;
use super::types::{EntryDraft, PreparedEntry, PriorReadings};
use super::validate::{openings_empty, validate_consistency, validate_fields};
use crate::model::{NetSalesModel, extract_features, submitted_net_sales, within_tolerance};

/// Entry service sequencing the sales-entry pipeline.
///
/// Pure business logic with no database dependencies; the prior entry
/// and the predictive model arrive as injected collaborators.
pub struct EntryService;

impl EntryService {
    /// Runs the full pipeline over a candidate entry.
    ///
    /// Stages, in order:
    /// 1. Field validation on the raw draft (date, negatives, meters)
    /// 2. "Openings empty" evaluated on the raw draft
    /// 3. Backfill of unset openings from the branch's prior entry
    /// 4. Derivation of every dependent total
    /// 5. Tank consistency check (skipped for a first entry)
    /// 6. Net-sales plausibility against the injected model
    ///
    /// The returned entry keeps full precision; callers round at the
    /// persistence boundary via [`PreparedEntry::rounded`].
    ///
    /// # Errors
    ///
    /// Returns the first stage's `EntryError`; nothing is persisted by
    /// this function, so a failure leaves no partial state anywhere.
    pub fn prepare<M>(
        mut draft: EntryDraft,
        prior: Option<&PriorReadings>,
        model: &M,
        now: DateTime<Utc>,
    ) -> Result<PreparedEntry, EntryError>
    where
        M: NetSalesModel + ?Sized,
    {
        validate_fields(&draft, now)?;

        // Decided on the raw figures, before backfill can fill openings.
        let first_entry = openings_empty(&draft);

        backfill_openings(&mut draft, prior);

        let totals = derive_totals(&draft);

        validate_consistency(&draft, first_entry)?;

        Self::check_net_sales(&draft, &totals, model)?;

        Ok(PreparedEntry { draft, totals })
    }

    /// Compares the supervisor's net sales against the model estimate.
    ///
    /// The prediction is advisory: on success the submitted value is
    /// what persists, never the estimate.
    fn check_net_sales<M>(
        draft: &EntryDraft,
        totals: &super::types::DerivedTotals,
        model: &M,
    ) -> Result<(), EntryError>
    where
        M: NetSalesModel + ?Sized,
    {
        let features = extract_features(draft, totals)?;
        let predicted = model.predict(&features);
        let submitted = submitted_net_sales(draft)?;

        if within_tolerance(submitted, predicted) {
            Ok(())
        } else {
            Err(EntryError::ImplausibleNetSales {
                submitted: draft.net_sales,
                predicted,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::types::{Branch, FuelType};
    use crate::model::FeatureVector;
    use rust_decimal_macros::dec;

    /// Model double that answers with a fixed estimate.
    struct FixedModel(f64);

    impl NetSalesModel for FixedModel {
        fn predict(&self, _features: &FeatureVector) -> f64 {
            self.0
        }
    }

    fn draft() -> EntryDraft {
        EntryDraft {
            branch: Branch::Tema,
            date: Utc::now() - chrono::Duration::hours(6),
            opening_meter_reading_ago: dec!(1000),
            closing_meter_reading_ago: dec!(1400),
            opening_meter_reading_pms: dec!(2000),
            closing_meter_reading_pms: dec!(2600),
            opening_tank_reading_ago: dec!(900),
            closing_tank_reading_ago: dec!(510),
            opening_tank_reading_pms: dec!(1500),
            closing_tank_reading_pms: dec!(910),
            pump_test_ago: dec!(5),
            pump_test_pms: dec!(5),
            received_ago: dec!(0),
            received_pms: dec!(0),
            unit_price_ago: dec!(13.99),
            unit_price_pms: dec!(14.49),
            credit_ago: dec!(50),
            credit_pms: dec!(25),
            collections_cash: dec!(9000),
            collections_cheque: dec!(2000),
            expenditure: dec!(300),
            comment: None,
            net_sales: dec!(14000),
        }
    }

    #[test]
    fn test_pipeline_accepts_within_tolerance() {
        let prepared =
            EntryService::prepare(draft(), None, &FixedModel(14020.0), Utc::now()).unwrap();

        // Submitted net sales persist unchanged; the estimate is advisory.
        assert_eq!(prepared.draft.net_sales, dec!(14000));
        assert_eq!(prepared.totals.total_sales, dec!(980));
    }

    #[test]
    fn test_pipeline_rejects_beyond_tolerance() {
        let result = EntryService::prepare(draft(), None, &FixedModel(14030.01), Utc::now());
        assert!(matches!(
            result,
            Err(EntryError::ImplausibleNetSales { .. })
        ));
    }

    #[test]
    fn test_tolerance_is_inclusive() {
        // Exactly 30.00 apart still passes.
        assert!(EntryService::prepare(draft(), None, &FixedModel(14030.0), Utc::now()).is_ok());
        assert!(EntryService::prepare(draft(), None, &FixedModel(13970.0), Utc::now()).is_ok());
    }

    #[test]
    fn test_backfill_feeds_derivation() {
        // Second entry for the branch with unset AGO meter opening.
        let mut d = draft();
        d.opening_meter_reading_ago = dec!(0);
        let prior = PriorReadings {
            closing_meter_reading_ago: dec!(1000),
            closing_meter_reading_pms: dec!(2000),
            closing_tank_reading_ago: dec!(900),
            closing_tank_reading_pms: dec!(1500),
            unit_price_ago: dec!(13.99),
            unit_price_pms: dec!(14.49),
        };

        let prepared =
            EntryService::prepare(d, Some(&prior), &FixedModel(14000.0), Utc::now()).unwrap();

        assert_eq!(prepared.draft.opening_meter_reading_ago, dec!(1000));
        // actuals_ago = 1400 - 1000 - 5, from the backfilled opening
        assert_eq!(prepared.totals.actuals_ago, dec!(395));
    }

    #[test]
    fn test_first_entry_skips_tank_check() {
        // All openings unset, closing tank keyed: a legitimate first
        // entry proceeds to the plausibility stage.
        let mut d = draft();
        d.opening_meter_reading_ago = dec!(0);
        d.opening_meter_reading_pms = dec!(0);
        d.opening_tank_reading_ago = dec!(0);
        d.opening_tank_reading_pms = dec!(0);
        d.closing_meter_reading_ago = dec!(1400);
        d.closing_meter_reading_pms = dec!(2600);
        d.closing_tank_reading_ago = dec!(500);
        d.closing_tank_reading_pms = dec!(910);

        let result = EntryService::prepare(d, None, &FixedModel(14000.0), Utc::now());
        assert!(result.is_ok());
    }

    #[test]
    fn test_backfilled_openings_still_consistency_checked() {
        // Openings keyed (not empty) and the closing tank reads above
        // the opening: rejected for the offending fuel.
        let mut d = draft();
        d.closing_tank_reading_ago = dec!(901);

        let result = EntryService::prepare(d, None, &FixedModel(14000.0), Utc::now());
        assert_eq!(
            result,
            Err(EntryError::TankLevelIncrease {
                fuel: FuelType::Ago
            })
        );
    }

    #[test]
    fn test_field_validation_runs_first() {
        let mut d = draft();
        d.date = Utc::now() + chrono::Duration::days(2);
        d.closing_tank_reading_ago = dec!(901);

        // Future date wins over the tank violation.
        let result = EntryService::prepare(d, None, &FixedModel(14000.0), Utc::now());
        assert_eq!(result, Err(EntryError::FutureDate));
    }

    #[test]
    fn test_rerun_is_deterministic() {
        let a = EntryService::prepare(draft(), None, &FixedModel(14000.0), Utc::now()).unwrap();
        let b = EntryService::prepare(draft(), None, &FixedModel(14000.0), Utc::now()).unwrap();
        assert_eq!(a.totals, b.totals);
    }
}
