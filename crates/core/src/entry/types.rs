//! Domain types for daily sales entries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The two fuel products tracked independently throughout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    /// Automotive gas oil (diesel).
    Ago,
    /// Premium motor spirit (petrol).
    Pms,
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ago => write!(f, "AGO"),
            Self::Pms => write!(f, "PMS"),
        }
    }
}

/// A physical fuel station location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    /// Asankragua station.
    Asankragua,
    /// Ayiem station.
    Ayiem,
    /// Assin Fosu station.
    #[serde(rename = "Assin Fosu")]
    AssinFosu,
    /// Atta ne Atta station.
    #[serde(rename = "Atta ne Atta")]
    AttaNeAtta,
    /// Atebubu station.
    Atebubu,
    /// Bepong station.
    Bepong,
    /// Bongo station.
    Bongo,
    /// Camp 15 station.
    #[serde(rename = "Camp 15")]
    Camp15,
    /// Dadieso station.
    Dadieso,
    /// Damango station.
    Damango,
    /// Dormaa station.
    Dormaa,
    /// Dunkwa station.
    Dunkwa,
    /// Feyiase station.
    Feyiase,
    /// Mamaso station.
    Mamaso,
    /// Medie station.
    Medie,
    /// Nkruma Nkwanta station.
    #[serde(rename = "Nkruma Nkwanta")]
    NkrumaNkwanta,
    /// Obuasi station.
    Obuasi,
    /// Oseikrom station.
    Oseikrom,
    /// Suma Ahenkro station.
    #[serde(rename = "Suma Ahenkro")]
    SumaAhenkro,
    /// Tarkwa station.
    Tarkwa,
    /// Tema station.
    Tema,
    /// Tepa station.
    Tepa,
    /// Tinga station.
    Tinga,
    /// Tumu station.
    Tumu,
    /// Tutuka station.
    Tutuka,
    /// Wa station.
    Wa,
}

impl Branch {
    /// Every branch in the network.
    pub const ALL: [Self; 26] = [
        Self::Asankragua,
        Self::Ayiem,
        Self::AssinFosu,
        Self::AttaNeAtta,
        Self::Atebubu,
        Self::Bepong,
        Self::Bongo,
        Self::Camp15,
        Self::Dadieso,
        Self::Damango,
        Self::Dormaa,
        Self::Dunkwa,
        Self::Feyiase,
        Self::Mamaso,
        Self::Medie,
        Self::NkrumaNkwanta,
        Self::Obuasi,
        Self::Oseikrom,
        Self::SumaAhenkro,
        Self::Tarkwa,
        Self::Tema,
        Self::Tepa,
        Self::Tinga,
        Self::Tumu,
        Self::Tutuka,
        Self::Wa,
    ];

    /// The station name as stored and displayed.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asankragua => "Asankragua",
            Self::Ayiem => "Ayiem",
            Self::AssinFosu => "Assin Fosu",
            Self::AttaNeAtta => "Atta ne Atta",
            Self::Atebubu => "Atebubu",
            Self::Bepong => "Bepong",
            Self::Bongo => "Bongo",
            Self::Camp15 => "Camp 15",
            Self::Dadieso => "Dadieso",
            Self::Damango => "Damango",
            Self::Dormaa => "Dormaa",
            Self::Dunkwa => "Dunkwa",
            Self::Feyiase => "Feyiase",
            Self::Mamaso => "Mamaso",
            Self::Medie => "Medie",
            Self::NkrumaNkwanta => "Nkruma Nkwanta",
            Self::Obuasi => "Obuasi",
            Self::Oseikrom => "Oseikrom",
            Self::SumaAhenkro => "Suma Ahenkro",
            Self::Tarkwa => "Tarkwa",
            Self::Tema => "Tema",
            Self::Tepa => "Tepa",
            Self::Tinga => "Tinga",
            Self::Tumu => "Tumu",
            Self::Tutuka => "Tutuka",
            Self::Wa => "Wa",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Branch {
    type Err = UnknownBranch;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| UnknownBranch(s.to_string()))
    }
}

/// Error returned when a branch name is not in the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown branch: {0}")]
pub struct UnknownBranch(pub String);

/// A candidate daily entry: the raw figures a supervisor keys in.
///
/// Opening readings and unit prices use `0.00` as the unset sentinel and
/// may be backfilled from the branch's prior entry before derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    /// Branch where the entry is recorded.
    pub branch: Branch,
    /// Calendar day being reported. Never in the future.
    pub date: DateTime<Utc>,
    /// Opening meter reading, AGO.
    pub opening_meter_reading_ago: Decimal,
    /// Closing meter reading, AGO.
    pub closing_meter_reading_ago: Decimal,
    /// Opening meter reading, PMS.
    pub opening_meter_reading_pms: Decimal,
    /// Closing meter reading, PMS.
    pub closing_meter_reading_pms: Decimal,
    /// Opening tank reading, AGO.
    pub opening_tank_reading_ago: Decimal,
    /// Closing tank reading, AGO.
    pub closing_tank_reading_ago: Decimal,
    /// Opening tank reading, PMS.
    pub opening_tank_reading_pms: Decimal,
    /// Closing tank reading, PMS.
    pub closing_tank_reading_pms: Decimal,
    /// Pump test volume, AGO.
    pub pump_test_ago: Decimal,
    /// Pump test volume, PMS.
    pub pump_test_pms: Decimal,
    /// Delivered volume received into the AGO tank.
    pub received_ago: Decimal,
    /// Delivered volume received into the PMS tank.
    pub received_pms: Decimal,
    /// Unit price, AGO.
    pub unit_price_ago: Decimal,
    /// Unit price, PMS.
    pub unit_price_pms: Decimal,
    /// Credit extended, AGO.
    pub credit_ago: Decimal,
    /// Credit extended, PMS.
    pub credit_pms: Decimal,
    /// Cash collected.
    pub collections_cash: Decimal,
    /// Cheques collected.
    pub collections_cheque: Decimal,
    /// Expenditure for the day.
    pub expenditure: Decimal,
    /// Free-text comment.
    pub comment: Option<String>,
    /// Net sales as asserted by the supervisor.
    pub net_sales: Decimal,
}

/// Closing figures of a branch's most recent entry, used for backfill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorReadings {
    /// Prior closing meter reading, AGO.
    pub closing_meter_reading_ago: Decimal,
    /// Prior closing meter reading, PMS.
    pub closing_meter_reading_pms: Decimal,
    /// Prior closing tank reading, AGO.
    pub closing_tank_reading_ago: Decimal,
    /// Prior closing tank reading, PMS.
    pub closing_tank_reading_pms: Decimal,
    /// Prior unit price, AGO (prices carry forward unchanged).
    pub unit_price_ago: Decimal,
    /// Prior unit price, PMS.
    pub unit_price_pms: Decimal,
}

/// Every quantity the derivation engine computes from a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DerivedTotals {
    /// Combined pump test volume.
    pub total_pump_test: Decimal,
    /// Combined received volume.
    pub total_received: Decimal,
    /// Dispensed volume from meter deltas, AGO.
    pub actuals_ago: Decimal,
    /// Dispensed volume from meter deltas, PMS.
    pub actuals_pms: Decimal,
    /// Combined actuals.
    pub total_actuals: Decimal,
    /// Sold volume from tank depletion, AGO.
    pub sales_ago: Decimal,
    /// Sold volume from tank depletion, PMS.
    pub sales_pms: Decimal,
    /// Combined sales.
    pub total_sales: Decimal,
    /// Actuals minus sales, AGO.
    pub variation_ago: Decimal,
    /// Actuals minus sales, PMS.
    pub variation_pms: Decimal,
    /// Combined variation.
    pub total_variation: Decimal,
    /// Sales valued at the unit price, AGO.
    pub sales_in_cedis_ago: Decimal,
    /// Sales valued at the unit price, PMS.
    pub sales_in_cedis_pms: Decimal,
    /// Combined sales value.
    pub total_sales_in_cedis: Decimal,
    /// Actuals valued at the unit price, AGO.
    pub actuals_in_cedis_ago: Decimal,
    /// Actuals valued at the unit price, PMS.
    pub actuals_in_cedis_pms: Decimal,
    /// Combined actuals value.
    pub total_actuals_in_cedis: Decimal,
    /// Variation valued at the unit price, AGO.
    pub variation_in_cedis_ago: Decimal,
    /// Variation valued at the unit price, PMS.
    pub variation_in_cedis_pms: Decimal,
    /// Combined variation value.
    pub total_variation_in_cedis: Decimal,
    /// Combined credit.
    pub total_credit: Decimal,
    /// Cash plus cheque collections.
    pub total_collections: Decimal,
}

/// A draft that has passed every pipeline stage, paired with its
/// derived totals, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedEntry {
    /// The draft after backfill.
    pub draft: EntryDraft,
    /// The derived quantities, at full precision.
    pub totals: DerivedTotals,
}

impl PreparedEntry {
    /// Returns a copy with every figure rounded to two decimal places,
    /// the form in which entries are persisted and serialized.
    #[must_use]
    pub fn rounded(&self) -> Self {
        let d = &self.draft;
        let t = &self.totals;
        Self {
            draft: EntryDraft {
                branch: d.branch,
                date: d.date,
                opening_meter_reading_ago: d.opening_meter_reading_ago.round_dp(2),
                closing_meter_reading_ago: d.closing_meter_reading_ago.round_dp(2),
                opening_meter_reading_pms: d.opening_meter_reading_pms.round_dp(2),
                closing_meter_reading_pms: d.closing_meter_reading_pms.round_dp(2),
                opening_tank_reading_ago: d.opening_tank_reading_ago.round_dp(2),
                closing_tank_reading_ago: d.closing_tank_reading_ago.round_dp(2),
                opening_tank_reading_pms: d.opening_tank_reading_pms.round_dp(2),
                closing_tank_reading_pms: d.closing_tank_reading_pms.round_dp(2),
                pump_test_ago: d.pump_test_ago.round_dp(2),
                pump_test_pms: d.pump_test_pms.round_dp(2),
                received_ago: d.received_ago.round_dp(2),
                received_pms: d.received_pms.round_dp(2),
                unit_price_ago: d.unit_price_ago.round_dp(2),
                unit_price_pms: d.unit_price_pms.round_dp(2),
                credit_ago: d.credit_ago.round_dp(2),
                credit_pms: d.credit_pms.round_dp(2),
                collections_cash: d.collections_cash.round_dp(2),
                collections_cheque: d.collections_cheque.round_dp(2),
                expenditure: d.expenditure.round_dp(2),
                comment: d.comment.clone(),
                net_sales: d.net_sales.round_dp(2),
            },
            totals: DerivedTotals {
                total_pump_test: t.total_pump_test.round_dp(2),
                total_received: t.total_received.round_dp(2),
                actuals_ago: t.actuals_ago.round_dp(2),
                actuals_pms: t.actuals_pms.round_dp(2),
                total_actuals: t.total_actuals.round_dp(2),
                sales_ago: t.sales_ago.round_dp(2),
                sales_pms: t.sales_pms.round_dp(2),
                total_sales: t.total_sales.round_dp(2),
                variation_ago: t.variation_ago.round_dp(2),
                variation_pms: t.variation_pms.round_dp(2),
                total_variation: t.total_variation.round_dp(2),
                sales_in_cedis_ago: t.sales_in_cedis_ago.round_dp(2),
                sales_in_cedis_pms: t.sales_in_cedis_pms.round_dp(2),
                total_sales_in_cedis: t.total_sales_in_cedis.round_dp(2),
                actuals_in_cedis_ago: t.actuals_in_cedis_ago.round_dp(2),
                actuals_in_cedis_pms: t.actuals_in_cedis_pms.round_dp(2),
                total_actuals_in_cedis: t.total_actuals_in_cedis.round_dp(2),
                variation_in_cedis_ago: t.variation_in_cedis_ago.round_dp(2),
                variation_in_cedis_pms: t.variation_in_cedis_pms.round_dp(2),
                total_variation_in_cedis: t.total_variation_in_cedis.round_dp(2),
                total_credit: t.total_credit.round_dp(2),
                total_collections: t.total_collections.round_dp(2),
            },
        }
    }
}
