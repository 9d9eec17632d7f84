//! Property-based tests for the derivation engine.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::derive::derive_totals;
use super::types::{Branch, EntryDraft};

/// Strategy for plausible two-decimal quantities.
fn quantity() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for unit prices.
fn price() -> impl Strategy<Value = Decimal> {
    (0i64..10_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy over whole drafts, grouped to stay within tuple limits.
fn any_draft() -> impl Strategy<Value = EntryDraft> {
    (
        (quantity(), quantity(), quantity(), quantity()),
        (quantity(), quantity(), quantity(), quantity()),
        (quantity(), quantity(), quantity(), quantity()),
        (price(), price(), quantity(), quantity()),
        (quantity(), quantity(), quantity()),
    )
        .prop_map(
            |(
                (opening_meter_ago, meter_delta_ago, opening_meter_pms, meter_delta_pms),
                (opening_tank_ago, closing_tank_ago, opening_tank_pms, closing_tank_pms),
                (pump_test_ago, pump_test_pms, received_ago, received_pms),
                (unit_price_ago, unit_price_pms, credit_ago, credit_pms),
                (collections_cash, collections_cheque, expenditure),
            )| EntryDraft {
                branch: Branch::Medie,
                date: chrono::Utc::now(),
                opening_meter_reading_ago: opening_meter_ago,
                closing_meter_reading_ago: opening_meter_ago + meter_delta_ago,
                opening_meter_reading_pms: opening_meter_pms,
                closing_meter_reading_pms: opening_meter_pms + meter_delta_pms,
                opening_tank_reading_ago: opening_tank_ago,
                closing_tank_reading_ago: closing_tank_ago,
                opening_tank_reading_pms: opening_tank_pms,
                closing_tank_reading_pms: closing_tank_pms,
                pump_test_ago,
                pump_test_pms,
                received_ago,
                received_pms,
                unit_price_ago,
                unit_price_pms,
                credit_ago,
                credit_pms,
                collections_cash,
                collections_cheque,
                expenditure,
                comment: None,
                net_sales: Decimal::ZERO,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every combined figure is exactly the sum of its AGO and PMS parts.
    #[test]
    fn prop_totals_are_fuel_sums(draft in any_draft()) {
        let t = derive_totals(&draft);

        prop_assert_eq!(t.total_pump_test, draft.pump_test_ago + draft.pump_test_pms);
        prop_assert_eq!(t.total_received, draft.received_ago + draft.received_pms);
        prop_assert_eq!(t.total_actuals, t.actuals_ago + t.actuals_pms);
        prop_assert_eq!(t.total_sales, t.sales_ago + t.sales_pms);
        prop_assert_eq!(t.total_variation, t.variation_ago + t.variation_pms);
        prop_assert_eq!(t.total_sales_in_cedis, t.sales_in_cedis_ago + t.sales_in_cedis_pms);
        prop_assert_eq!(t.total_actuals_in_cedis, t.actuals_in_cedis_ago + t.actuals_in_cedis_pms);
        prop_assert_eq!(
            t.total_variation_in_cedis,
            t.variation_in_cedis_ago + t.variation_in_cedis_pms
        );
        prop_assert_eq!(t.total_credit, draft.credit_ago + draft.credit_pms);
        prop_assert_eq!(t.total_collections, draft.collections_cash + draft.collections_cheque);
    }

    /// Variation is the gap between the two independent measurements.
    #[test]
    fn prop_variation_is_actuals_minus_sales(draft in any_draft()) {
        let t = derive_totals(&draft);
        prop_assert_eq!(t.variation_ago, t.actuals_ago - t.sales_ago);
        prop_assert_eq!(t.variation_pms, t.actuals_pms - t.sales_pms);
    }

    /// Monetary figures are their volumes at the day's unit price.
    #[test]
    fn prop_cedis_figures_scale_by_price(draft in any_draft()) {
        let t = derive_totals(&draft);
        prop_assert_eq!(t.sales_in_cedis_ago, t.sales_ago * draft.unit_price_ago);
        prop_assert_eq!(t.actuals_in_cedis_pms, t.actuals_pms * draft.unit_price_pms);
        prop_assert_eq!(t.variation_in_cedis_ago, t.variation_ago * draft.unit_price_ago);
    }

    /// Running the engine twice over the same draft changes nothing.
    #[test]
    fn prop_derivation_deterministic(draft in any_draft()) {
        prop_assert_eq!(derive_totals(&draft), derive_totals(&draft));
    }
}
