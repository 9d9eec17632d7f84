//! The derivation engine: raw figures to dependent totals.

use super::types::{DerivedTotals, EntryDraft};

/// Computes every derived quantity of a daily entry.
///
/// Pure and deterministic. The computation order below is a dependency
/// order: actuals and sales feed variation, the per-fuel volumes feed
/// the monetary conversions, and each total sums its AGO and PMS parts.
/// No intermediate rounding happens here; figures are rounded to two
/// decimal places only at the persistence boundary.
#[must_use]
pub fn derive_totals(draft: &EntryDraft) -> DerivedTotals {
    let mut t = DerivedTotals::default();

    // Volumes pumped for calibration checks
    t.total_pump_test = draft.pump_test_ago + draft.pump_test_pms;

    // Deliveries received into the tanks
    t.total_received = draft.received_ago + draft.received_pms;

    // Actuals: meter delta less the pump test volume
    t.actuals_ago =
        draft.closing_meter_reading_ago - draft.opening_meter_reading_ago - draft.pump_test_ago;
    t.actuals_pms =
        draft.closing_meter_reading_pms - draft.opening_meter_reading_pms - draft.pump_test_pms;
    t.total_actuals = t.actuals_ago + t.actuals_pms;

    // Sales: tank depletion less deliveries
    t.sales_ago =
        draft.opening_tank_reading_ago - draft.closing_tank_reading_ago - draft.received_ago;
    t.sales_pms =
        draft.opening_tank_reading_pms - draft.closing_tank_reading_pms - draft.received_pms;
    t.total_sales = t.sales_ago + t.sales_pms;

    // Variation: the discrepancy between the two measurements
    t.variation_ago = t.actuals_ago - t.sales_ago;
    t.variation_pms = t.actuals_pms - t.sales_pms;
    t.total_variation = t.variation_ago + t.variation_pms;

    // Monetary conversions at the day's unit prices
    t.sales_in_cedis_ago = t.sales_ago * draft.unit_price_ago;
    t.sales_in_cedis_pms = t.sales_pms * draft.unit_price_pms;
    t.total_sales_in_cedis = t.sales_in_cedis_ago + t.sales_in_cedis_pms;

    t.actuals_in_cedis_ago = t.actuals_ago * draft.unit_price_ago;
    t.actuals_in_cedis_pms = t.actuals_pms * draft.unit_price_pms;
    t.total_actuals_in_cedis = t.actuals_in_cedis_ago + t.actuals_in_cedis_pms;

    t.variation_in_cedis_ago = t.variation_ago * draft.unit_price_ago;
    t.variation_in_cedis_pms = t.variation_pms * draft.unit_price_pms;
    t.total_variation_in_cedis = t.variation_in_cedis_ago + t.variation_in_cedis_pms;

    t.total_credit = draft.credit_ago + draft.credit_pms;

    t.total_collections = draft.collections_cash + draft.collections_cheque;

    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::types::Branch;
    use rust_decimal_macros::dec;

    fn sample_draft() -> EntryDraft {
        EntryDraft {
            branch: Branch::Dunkwa,
            date: chrono::Utc::now(),
            opening_meter_reading_ago: dec!(1000),
            closing_meter_reading_ago: dec!(1500),
            opening_meter_reading_pms: dec!(2000),
            closing_meter_reading_pms: dec!(2800),
            opening_tank_reading_ago: dec!(900),
            closing_tank_reading_ago: dec!(420),
            opening_tank_reading_pms: dec!(1600),
            closing_tank_reading_pms: dec!(820),
            pump_test_ago: dec!(10),
            pump_test_pms: dec!(15),
            received_ago: dec!(5),
            received_pms: dec!(8),
            unit_price_ago: dec!(13.99),
            unit_price_pms: dec!(14.49),
            credit_ago: dec!(120),
            credit_pms: dec!(80),
            collections_cash: dec!(5400),
            collections_cheque: dec!(1300),
            expenditure: dec!(250),
            comment: Some("normal trading day".to_string()),
            net_sales: dec!(6450),
        }
    }

    #[test]
    fn test_derivation_sample_values() {
        let t = derive_totals(&sample_draft());

        assert_eq!(t.total_pump_test, dec!(25));
        assert_eq!(t.total_received, dec!(13));

        // actuals = closing meter - opening meter - pump test
        assert_eq!(t.actuals_ago, dec!(490));
        assert_eq!(t.actuals_pms, dec!(785));
        assert_eq!(t.total_actuals, dec!(1275));

        // sales = opening tank - closing tank - received
        assert_eq!(t.sales_ago, dec!(475));
        assert_eq!(t.sales_pms, dec!(772));
        assert_eq!(t.total_sales, dec!(1247));

        // variation = actuals - sales
        assert_eq!(t.variation_ago, dec!(15));
        assert_eq!(t.variation_pms, dec!(13));
        assert_eq!(t.total_variation, dec!(28));

        assert_eq!(t.sales_in_cedis_ago, dec!(6645.25));
        assert_eq!(t.sales_in_cedis_pms, dec!(11186.28));
        assert_eq!(t.total_sales_in_cedis, dec!(17831.53));

        assert_eq!(t.actuals_in_cedis_ago, dec!(6855.10));
        assert_eq!(t.actuals_in_cedis_pms, dec!(11374.65));
        assert_eq!(t.total_actuals_in_cedis, dec!(18229.75));

        assert_eq!(t.variation_in_cedis_ago, dec!(209.85));
        assert_eq!(t.variation_in_cedis_pms, dec!(188.37));
        assert_eq!(t.total_variation_in_cedis, dec!(398.22));

        assert_eq!(t.total_credit, dec!(200));
        assert_eq!(t.total_collections, dec!(6700));
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let draft = sample_draft();
        assert_eq!(derive_totals(&draft), derive_totals(&draft));
    }

    #[test]
    fn test_zero_draft_derives_to_zero() {
        let draft = EntryDraft {
            opening_meter_reading_ago: dec!(0),
            closing_meter_reading_ago: dec!(0),
            opening_meter_reading_pms: dec!(0),
            closing_meter_reading_pms: dec!(0),
            opening_tank_reading_ago: dec!(0),
            closing_tank_reading_ago: dec!(0),
            opening_tank_reading_pms: dec!(0),
            closing_tank_reading_pms: dec!(0),
            pump_test_ago: dec!(0),
            pump_test_pms: dec!(0),
            received_ago: dec!(0),
            received_pms: dec!(0),
            unit_price_ago: dec!(0),
            unit_price_pms: dec!(0),
            credit_ago: dec!(0),
            credit_pms: dec!(0),
            collections_cash: dec!(0),
            collections_cheque: dec!(0),
            expenditure: dec!(0),
            ..sample_draft()
        };
        assert_eq!(derive_totals(&draft), DerivedTotals::default());
    }
}
