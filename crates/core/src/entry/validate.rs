//! Field-level and physical-consistency validation for daily entries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::EntryError;
use super::types::{EntryDraft, FuelType};

/// Schema-level rules applied to the raw draft before any backfill.
///
/// Checks the entry date, rejects negative quantities, and rejects a
/// keyed closing meter reading below its keyed opening reading (meters
/// are monotonic counters). Opening values still at the `0.00` sentinel
/// are exempt from the meter rule; they have not been keyed yet.
pub fn validate_fields(draft: &EntryDraft, now: DateTime<Utc>) -> Result<(), EntryError> {
    if draft.date > now {
        return Err(EntryError::FutureDate);
    }

    let non_negative: [(&'static str, Decimal); 17] = [
        ("opening_meter_reading_ago", draft.opening_meter_reading_ago),
        ("closing_meter_reading_ago", draft.closing_meter_reading_ago),
        ("opening_meter_reading_pms", draft.opening_meter_reading_pms),
        ("closing_meter_reading_pms", draft.closing_meter_reading_pms),
        ("opening_tank_reading_ago", draft.opening_tank_reading_ago),
        ("closing_tank_reading_ago", draft.closing_tank_reading_ago),
        ("opening_tank_reading_pms", draft.opening_tank_reading_pms),
        ("closing_tank_reading_pms", draft.closing_tank_reading_pms),
        ("pump_test_ago", draft.pump_test_ago),
        ("pump_test_pms", draft.pump_test_pms),
        ("received_ago", draft.received_ago),
        ("received_pms", draft.received_pms),
        ("unit_price_ago", draft.unit_price_ago),
        ("unit_price_pms", draft.unit_price_pms),
        ("credit_ago", draft.credit_ago),
        ("credit_pms", draft.credit_pms),
        ("expenditure", draft.expenditure),
    ];
    for (field, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(EntryError::NegativeReading { field });
        }
    }
    if draft.collections_cash < Decimal::ZERO {
        return Err(EntryError::NegativeReading {
            field: "collections_cash",
        });
    }
    if draft.collections_cheque < Decimal::ZERO {
        return Err(EntryError::NegativeReading {
            field: "collections_cheque",
        });
    }

    if draft.opening_meter_reading_ago > Decimal::ZERO
        && draft.closing_meter_reading_ago < draft.opening_meter_reading_ago
    {
        return Err(EntryError::MeterRegression {
            fuel: FuelType::Ago,
        });
    }
    if draft.opening_meter_reading_pms > Decimal::ZERO
        && draft.closing_meter_reading_pms < draft.opening_meter_reading_pms
    {
        return Err(EntryError::MeterRegression {
            fuel: FuelType::Pms,
        });
    }

    Ok(())
}

/// Whether all four opening readings still hold the unset sentinel.
///
/// Evaluated on the raw draft, before backfill, for create and update
/// alike. An all-zero opening set marks the branch's first entry and
/// suppresses the tank consistency check.
#[must_use]
pub fn openings_empty(draft: &EntryDraft) -> bool {
    draft.opening_meter_reading_ago == Decimal::ZERO
        && draft.opening_meter_reading_pms == Decimal::ZERO
        && draft.opening_tank_reading_ago == Decimal::ZERO
        && draft.opening_tank_reading_pms == Decimal::ZERO
}

/// Physical-consistency check on the (possibly backfilled) draft.
///
/// Fuel is consumed, not created: a closing tank reading above its
/// opening reading is rejected per fuel type. Skipped entirely when the
/// raw openings were empty, since a first entry has no baseline.
pub fn validate_consistency(draft: &EntryDraft, openings_empty: bool) -> Result<(), EntryError> {
    if openings_empty {
        return Ok(());
    }

    if draft.opening_tank_reading_ago > Decimal::ZERO
        && draft.closing_tank_reading_ago > draft.opening_tank_reading_ago
    {
        return Err(EntryError::TankLevelIncrease {
            fuel: FuelType::Ago,
        });
    }
    if draft.opening_tank_reading_pms > Decimal::ZERO
        && draft.closing_tank_reading_pms > draft.opening_tank_reading_pms
    {
        return Err(EntryError::TankLevelIncrease {
            fuel: FuelType::Pms,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::types::Branch;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn draft() -> EntryDraft {
        EntryDraft {
            branch: Branch::Tema,
            date: Utc::now() - Duration::hours(2),
            opening_meter_reading_ago: dec!(1000),
            closing_meter_reading_ago: dec!(1400),
            opening_meter_reading_pms: dec!(2000),
            closing_meter_reading_pms: dec!(2600),
            opening_tank_reading_ago: dec!(900),
            closing_tank_reading_ago: dec!(500),
            opening_tank_reading_pms: dec!(1500),
            closing_tank_reading_pms: dec!(900),
            pump_test_ago: dec!(10),
            pump_test_pms: dec!(10),
            received_ago: dec!(0),
            received_pms: dec!(0),
            unit_price_ago: dec!(13.99),
            unit_price_pms: dec!(14.49),
            credit_ago: dec!(0),
            credit_pms: dec!(0),
            collections_cash: dec!(100),
            collections_cheque: dec!(0),
            expenditure: dec!(0),
            comment: None,
            net_sales: dec!(5000),
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(validate_fields(&draft(), Utc::now()).is_ok());
    }

    #[test]
    fn test_future_date_rejected() {
        let mut d = draft();
        d.date = Utc::now() + Duration::days(1);
        assert_eq!(
            validate_fields(&d, Utc::now()),
            Err(EntryError::FutureDate)
        );
    }

    #[test]
    fn test_negative_reading_rejected() {
        let mut d = draft();
        d.closing_tank_reading_pms = dec!(-1);
        assert!(matches!(
            validate_fields(&d, Utc::now()),
            Err(EntryError::NegativeReading {
                field: "closing_tank_reading_pms"
            })
        ));
    }

    #[test]
    fn test_meter_regression_rejected_per_fuel() {
        let mut d = draft();
        d.closing_meter_reading_ago = dec!(900);
        assert_eq!(
            validate_fields(&d, Utc::now()),
            Err(EntryError::MeterRegression {
                fuel: FuelType::Ago
            })
        );

        let mut d = draft();
        d.closing_meter_reading_pms = dec!(1999);
        assert_eq!(
            validate_fields(&d, Utc::now()),
            Err(EntryError::MeterRegression {
                fuel: FuelType::Pms
            })
        );
    }

    #[test]
    fn test_unset_opening_meter_exempt_from_regression() {
        let mut d = draft();
        d.opening_meter_reading_ago = dec!(0);
        d.closing_meter_reading_ago = dec!(0);
        assert!(validate_fields(&d, Utc::now()).is_ok());
    }

    #[test]
    fn test_openings_empty() {
        let mut d = draft();
        assert!(!openings_empty(&d));

        d.opening_meter_reading_ago = dec!(0);
        d.opening_meter_reading_pms = dec!(0);
        d.opening_tank_reading_ago = dec!(0);
        assert!(!openings_empty(&d), "all four must be zero");

        d.opening_tank_reading_pms = dec!(0);
        assert!(openings_empty(&d));
    }

    #[test]
    fn test_tank_level_increase_rejected_per_fuel() {
        let mut d = draft();
        d.closing_tank_reading_ago = dec!(950);
        assert_eq!(
            validate_consistency(&d, false),
            Err(EntryError::TankLevelIncrease {
                fuel: FuelType::Ago
            })
        );

        let mut d = draft();
        d.closing_tank_reading_pms = dec!(1501);
        assert_eq!(
            validate_consistency(&d, false),
            Err(EntryError::TankLevelIncrease {
                fuel: FuelType::Pms
            })
        );
    }

    #[test]
    fn test_consistency_skipped_for_first_entry() {
        // First-ever entry: openings all zero, closing tank keyed at 500.
        let mut d = draft();
        d.opening_meter_reading_ago = dec!(0);
        d.opening_meter_reading_pms = dec!(0);
        d.opening_tank_reading_ago = dec!(0);
        d.opening_tank_reading_pms = dec!(0);
        d.closing_tank_reading_ago = dec!(500);
        assert!(openings_empty(&d));
        assert!(validate_consistency(&d, true).is_ok());
    }

    #[test]
    fn test_equal_tank_readings_allowed() {
        let mut d = draft();
        d.closing_tank_reading_ago = d.opening_tank_reading_ago;
        assert!(validate_consistency(&d, false).is_ok());
    }
}
