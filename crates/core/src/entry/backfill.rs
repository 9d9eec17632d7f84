//! Opening-value backfill from a branch's prior entry.

use rust_decimal::Decimal;

use super::types::{EntryDraft, PriorReadings};

/// Returns true if any backfillable field still holds the `0.00` unset
/// sentinel, meaning the prior-entry lookup is worth doing at all.
#[must_use]
pub fn needs_backfill(draft: &EntryDraft) -> bool {
    draft.opening_meter_reading_ago == Decimal::ZERO
        || draft.opening_meter_reading_pms == Decimal::ZERO
        || draft.opening_tank_reading_ago == Decimal::ZERO
        || draft.opening_tank_reading_pms == Decimal::ZERO
        || draft.unit_price_ago == Decimal::ZERO
        || draft.unit_price_pms == Decimal::ZERO
}

/// Fills unset opening readings and unit prices from the branch's most
/// recent entry.
///
/// Meter and tank openings continue from the prior entry's *closing*
/// values; unit prices carry forward unchanged. Fields the supervisor
/// actually keyed (non-zero) are never substituted. With no prior entry
/// the sentinels stay as they are: the branch's first entry.
pub fn backfill_openings(draft: &mut EntryDraft, prior: Option<&PriorReadings>) {
    let Some(prior) = prior else { return };

    if draft.opening_meter_reading_ago == Decimal::ZERO {
        draft.opening_meter_reading_ago = prior.closing_meter_reading_ago;
    }
    if draft.opening_meter_reading_pms == Decimal::ZERO {
        draft.opening_meter_reading_pms = prior.closing_meter_reading_pms;
    }
    if draft.opening_tank_reading_ago == Decimal::ZERO {
        draft.opening_tank_reading_ago = prior.closing_tank_reading_ago;
    }
    if draft.opening_tank_reading_pms == Decimal::ZERO {
        draft.opening_tank_reading_pms = prior.closing_tank_reading_pms;
    }
    if draft.unit_price_ago == Decimal::ZERO {
        draft.unit_price_ago = prior.unit_price_ago;
    }
    if draft.unit_price_pms == Decimal::ZERO {
        draft.unit_price_pms = prior.unit_price_pms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::types::Branch;
    use rust_decimal_macros::dec;

    fn blank_draft() -> EntryDraft {
        EntryDraft {
            branch: Branch::Tema,
            date: chrono::DateTime::from_timestamp(0, 0).unwrap(),
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
            comment: None,
            net_sales: dec!(0),
        }
    }

    fn prior() -> PriorReadings {
        PriorReadings {
            closing_meter_reading_ago: dec!(1000),
            closing_meter_reading_pms: dec!(2000),
            closing_tank_reading_ago: dec!(450.5),
            closing_tank_reading_pms: dec!(780.25),
            unit_price_ago: dec!(13.99),
            unit_price_pms: dec!(14.49),
        }
    }

    #[test]
    fn test_backfills_all_unset_fields() {
        let mut draft = blank_draft();
        backfill_openings(&mut draft, Some(&prior()));

        assert_eq!(draft.opening_meter_reading_ago, dec!(1000));
        assert_eq!(draft.opening_meter_reading_pms, dec!(2000));
        assert_eq!(draft.opening_tank_reading_ago, dec!(450.5));
        assert_eq!(draft.opening_tank_reading_pms, dec!(780.25));
        assert_eq!(draft.unit_price_ago, dec!(13.99));
        assert_eq!(draft.unit_price_pms, dec!(14.49));
    }

    #[test]
    fn test_keyed_values_never_substituted() {
        let mut draft = blank_draft();
        draft.opening_meter_reading_ago = dec!(555);
        draft.unit_price_pms = dec!(15.10);
        backfill_openings(&mut draft, Some(&prior()));

        // Non-zero fields survive, the rest are filled.
        assert_eq!(draft.opening_meter_reading_ago, dec!(555));
        assert_eq!(draft.unit_price_pms, dec!(15.10));
        assert_eq!(draft.opening_meter_reading_pms, dec!(2000));
        assert_eq!(draft.unit_price_ago, dec!(13.99));
    }

    #[test]
    fn test_no_prior_entry_leaves_sentinels() {
        let mut draft = blank_draft();
        backfill_openings(&mut draft, None);
        assert_eq!(draft, blank_draft());
    }

    #[test]
    fn test_needs_backfill() {
        let mut draft = blank_draft();
        assert!(needs_backfill(&draft));

        draft.opening_meter_reading_ago = dec!(1);
        draft.opening_meter_reading_pms = dec!(1);
        draft.opening_tank_reading_ago = dec!(1);
        draft.opening_tank_reading_pms = dec!(1);
        draft.unit_price_ago = dec!(13.99);
        assert!(needs_backfill(&draft), "one sentinel left is enough");

        draft.unit_price_pms = dec!(14.49);
        assert!(!needs_backfill(&draft));
    }

    #[test]
    fn test_backfill_is_idempotent() {
        let mut once = blank_draft();
        backfill_openings(&mut once, Some(&prior()));
        let mut twice = once.clone();
        backfill_openings(&mut twice, Some(&prior()));
        assert_eq!(once, twice);
    }
}
