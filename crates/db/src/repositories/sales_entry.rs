//! Sales entry repository: the persistence half of the entry pipeline.
//!
//! Writes run the pure core pipeline (backfill, derivation, consistency,
//! plausibility) and only then touch the database, inside one
//! transaction, so a rejected entry never leaves partial state behind.
//!
//! The prior-entry read for backfill deliberately happens outside the
//! write transaction; two concurrent creates for one branch can observe
//! the same baseline (last writer wins).

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::warn;
use uuid::Uuid;

use forecourt_core::entry::{
    Branch, EntryDraft, EntryError, EntryService, PreparedEntry, PriorReadings, needs_backfill,
};
use forecourt_core::model::NetSalesModel;

use crate::entities::sales_entries;

/// Error types for sales entry operations.
#[derive(Debug, thiserror::Error)]
pub enum SalesEntryError {
    /// Sales entry not found.
    #[error("Sales entry not found: {0}")]
    NotFound(Uuid),

    /// Actor does not own the entry.
    #[error("Not authorized to modify this entry")]
    NotOwner,

    /// The entry failed a pipeline stage.
    #[error(transparent)]
    Pipeline(#[from] EntryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Aggregated yearly sales for one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchStockTotals {
    /// Station name.
    pub branch: String,
    /// Summed AGO sales volume.
    pub total_ago: Decimal,
    /// Summed PMS sales volume.
    pub total_pms: Decimal,
    /// The year the totals cover.
    pub year: i32,
}

/// Aggregated yearly sales across the whole network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkStockTotals {
    /// Summed AGO sales volume.
    pub total_ago: Decimal,
    /// Summed PMS sales volume.
    pub total_pms: Decimal,
    /// The year the totals cover.
    pub year: i32,
}

/// One stock-summary result row.
///
/// The two query shapes stay explicit: per-branch rows come from the
/// grouped aggregate, the network row from the ungrouped one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockSummaryRow {
    /// Totals for a single branch.
    PerBranch(BranchStockTotals),
    /// Totals across every branch.
    Network(NetworkStockTotals),
}

/// Raw grouped aggregate row. Sums are NULL when no rows match.
#[derive(Debug, FromQueryResult)]
struct RawBranchTotals {
    branch: String,
    total_ago: Option<Decimal>,
    total_pms: Option<Decimal>,
}

/// Raw ungrouped aggregate row.
#[derive(Debug, FromQueryResult)]
struct RawNetworkTotals {
    total_ago: Option<Decimal>,
    total_pms: Option<Decimal>,
}

impl BranchStockTotals {
    /// Converts a raw grouped row, skipping rows with NULL sums.
    fn from_row(row: RawBranchTotals, year: i32) -> Option<Self> {
        match (row.total_ago, row.total_pms) {
            (Some(total_ago), Some(total_pms)) => Some(Self {
                branch: row.branch,
                total_ago: total_ago.round_dp(2),
                total_pms: total_pms.round_dp(2),
                year,
            }),
            _ => {
                warn!(branch = %row.branch, year, "skipping malformed stock summary row");
                None
            }
        }
    }
}

impl NetworkStockTotals {
    /// Converts the raw network row; NULL sums mean an empty year.
    fn from_row(row: RawNetworkTotals, year: i32) -> Option<Self> {
        match (row.total_ago, row.total_pms) {
            (Some(total_ago), Some(total_pms)) => Some(Self {
                total_ago: total_ago.round_dp(2),
                total_pms: total_pms.round_dp(2),
                year,
            }),
            _ => None,
        }
    }
}

/// Timestamp bounds covering a calendar year, or None for a year chrono
/// cannot represent.
fn year_bounds(year: i32) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?
        .and_hms_opt(0, 0, 0)?
        .and_utc();
    let end = NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
        .and_hms_opt(0, 0, 0)?
        .and_utc();
    Some((start.fixed_offset(), end.fixed_offset()))
}

/// Sales entry repository for pipeline-gated CRUD operations.
#[derive(Debug, Clone)]
pub struct SalesEntryRepository {
    db: DatabaseConnection,
}

impl SalesEntryRepository {
    /// Creates a new sales entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a daily entry, binding ownership to `created_by`.
    ///
    /// Runs the full pipeline first; the insert happens inside a single
    /// transaction only after every stage accepted the entry.
    ///
    /// # Errors
    ///
    /// Returns a pipeline error when a stage rejects the entry, or a
    /// database error on persistence failure.
    pub async fn create_entry<M>(
        &self,
        draft: EntryDraft,
        created_by: Uuid,
        model: &M,
    ) -> Result<sales_entries::Model, SalesEntryError>
    where
        M: NetSalesModel + ?Sized,
    {
        let prior = if needs_backfill(&draft) {
            self.prior_readings(draft.branch, None).await?
        } else {
            None
        };

        let prepared = EntryService::prepare(draft, prior.as_ref(), model, Utc::now())?;

        let now = Utc::now().fixed_offset();
        let mut entry = entry_data_fields(&prepared);
        entry.id = Set(Uuid::new_v4());
        entry.user_id = Set(created_by);
        entry.created_at = Set(now);
        entry.updated_at = Set(now);

        let txn = self.db.begin().await?;
        let inserted = entry.insert(&txn).await?;
        txn.commit().await?;

        Ok(inserted)
    }

    /// Rewrites an entry, re-running the full pipeline.
    ///
    /// Only the owner may update; ownership itself never changes.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing entry, `NotOwner` for a foreign
    /// actor, a pipeline error when a stage rejects the rewrite, or a
    /// database error.
    pub async fn update_entry<M>(
        &self,
        entry_id: Uuid,
        draft: EntryDraft,
        actor: Uuid,
        model: &M,
    ) -> Result<sales_entries::Model, SalesEntryError>
    where
        M: NetSalesModel + ?Sized,
    {
        let existing = sales_entries::Entity::find_by_id(entry_id)
            .one(&self.db)
            .await?
            .ok_or(SalesEntryError::NotFound(entry_id))?;

        if existing.user_id != actor {
            return Err(SalesEntryError::NotOwner);
        }

        // The entry being rewritten is not its own baseline.
        let prior = if needs_backfill(&draft) {
            self.prior_readings(draft.branch, Some(entry_id)).await?
        } else {
            None
        };

        let prepared = EntryService::prepare(draft, prior.as_ref(), model, Utc::now())?;

        let mut entry = entry_data_fields(&prepared);
        entry.id = Set(existing.id);
        entry.user_id = Set(existing.user_id);
        entry.created_at = Set(existing.created_at);
        entry.updated_at = Set(Utc::now().fixed_offset());

        let txn = self.db.begin().await?;
        let updated = entry.update(&txn).await?;
        txn.commit().await?;

        Ok(updated)
    }

    /// Permanently removes an entry. Owner only; no soft delete.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing entry, `NotOwner` for a foreign
    /// actor, or a database error.
    pub async fn delete_entry(&self, entry_id: Uuid, actor: Uuid) -> Result<(), SalesEntryError> {
        let existing = sales_entries::Entity::find_by_id(entry_id)
            .one(&self.db)
            .await?
            .ok_or(SalesEntryError::NotFound(entry_id))?;

        if existing.user_id != actor {
            return Err(SalesEntryError::NotOwner);
        }

        sales_entries::Entity::delete_by_id(entry_id)
            .exec(&self.db)
            .await?;

        Ok(())
    }

    /// All entries for one branch, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_branch(
        &self,
        branch: Branch,
    ) -> Result<Vec<sales_entries::Model>, SalesEntryError> {
        let entries = sales_entries::Entity::find()
            .filter(sales_entries::Column::Branch.eq(branch.as_str()))
            .order_by_asc(sales_entries::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(entries)
    }

    /// Paginated listing across all branches.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<sales_entries::Model>, SalesEntryError> {
        let entries = sales_entries::Entity::find()
            .order_by_asc(sales_entries::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(entries)
    }

    /// Per-branch yearly sales totals plus one network-wide row.
    ///
    /// Defaults to the current year. A year outside chrono's range
    /// yields an empty summary rather than an error, and rows whose
    /// aggregates are NULL are skipped, not fatal.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn stock_summary(
        &self,
        year: Option<i32>,
    ) -> Result<Vec<StockSummaryRow>, SalesEntryError> {
        let year = year.unwrap_or_else(|| Utc::now().year());
        let Some((start, end)) = year_bounds(year) else {
            warn!(year, "stock summary requested for unrepresentable year");
            return Ok(Vec::new());
        };

        let branch_rows = sales_entries::Entity::find()
            .select_only()
            .column(sales_entries::Column::Branch)
            .column_as(sales_entries::Column::SalesAgo.sum(), "total_ago")
            .column_as(sales_entries::Column::SalesPms.sum(), "total_pms")
            .filter(sales_entries::Column::Date.gte(start))
            .filter(sales_entries::Column::Date.lt(end))
            .group_by(sales_entries::Column::Branch)
            .order_by_asc(sales_entries::Column::Branch)
            .into_model::<RawBranchTotals>()
            .all(&self.db)
            .await?;

        let network_row = sales_entries::Entity::find()
            .select_only()
            .column_as(sales_entries::Column::SalesAgo.sum(), "total_ago")
            .column_as(sales_entries::Column::SalesPms.sum(), "total_pms")
            .filter(sales_entries::Column::Date.gte(start))
            .filter(sales_entries::Column::Date.lt(end))
            .into_model::<RawNetworkTotals>()
            .one(&self.db)
            .await?;

        let mut rows: Vec<StockSummaryRow> = branch_rows
            .into_iter()
            .filter_map(|row| BranchStockTotals::from_row(row, year))
            .map(StockSummaryRow::PerBranch)
            .collect();

        if let Some(network) = network_row.and_then(|row| NetworkStockTotals::from_row(row, year)) {
            rows.push(StockSummaryRow::Network(network));
        }

        Ok(rows)
    }

    /// Closing figures of the branch's most recent entry, if any.
    ///
    /// Ordered by creation time descending; `exclude` drops the entry
    /// currently being rewritten from consideration.
    async fn prior_readings(
        &self,
        branch: Branch,
        exclude: Option<Uuid>,
    ) -> Result<Option<PriorReadings>, SalesEntryError> {
        let mut query = sales_entries::Entity::find()
            .filter(sales_entries::Column::Branch.eq(branch.as_str()));

        if let Some(id) = exclude {
            query = query.filter(sales_entries::Column::Id.ne(id));
        }

        let latest = query
            .order_by_desc(sales_entries::Column::CreatedAt)
            .one(&self.db)
            .await?;

        Ok(latest.map(|entry| PriorReadings {
            closing_meter_reading_ago: entry.closing_meter_reading_ago,
            closing_meter_reading_pms: entry.closing_meter_reading_pms,
            closing_tank_reading_ago: entry.closing_tank_reading_ago,
            closing_tank_reading_pms: entry.closing_tank_reading_pms,
            unit_price_ago: entry.unit_price_ago,
            unit_price_pms: entry.unit_price_pms,
        }))
    }
}

/// Maps a prepared entry's figures onto an active model, rounded to the
/// two decimal places in which entries persist. Identity, ownership,
/// and timestamps are the caller's to set.
fn entry_data_fields(prepared: &PreparedEntry) -> sales_entries::ActiveModel {
    let PreparedEntry { draft, totals } = prepared.rounded();

    sales_entries::ActiveModel {
        branch: Set(draft.branch.as_str().to_owned()),
        date: Set(draft.date.fixed_offset()),
        opening_meter_reading_ago: Set(draft.opening_meter_reading_ago),
        closing_meter_reading_ago: Set(draft.closing_meter_reading_ago),
        opening_meter_reading_pms: Set(draft.opening_meter_reading_pms),
        closing_meter_reading_pms: Set(draft.closing_meter_reading_pms),
        opening_tank_reading_ago: Set(draft.opening_tank_reading_ago),
        closing_tank_reading_ago: Set(draft.closing_tank_reading_ago),
        opening_tank_reading_pms: Set(draft.opening_tank_reading_pms),
        closing_tank_reading_pms: Set(draft.closing_tank_reading_pms),
        pump_test_ago: Set(draft.pump_test_ago),
        pump_test_pms: Set(draft.pump_test_pms),
        total_pump_test: Set(totals.total_pump_test),
        received_ago: Set(draft.received_ago),
        received_pms: Set(draft.received_pms),
        total_received: Set(totals.total_received),
        actuals_ago: Set(totals.actuals_ago),
        actuals_pms: Set(totals.actuals_pms),
        total_actuals: Set(totals.total_actuals),
        sales_ago: Set(totals.sales_ago),
        sales_pms: Set(totals.sales_pms),
        total_sales: Set(totals.total_sales),
        variation_ago: Set(totals.variation_ago),
        variation_pms: Set(totals.variation_pms),
        total_variation: Set(totals.total_variation),
        unit_price_ago: Set(draft.unit_price_ago),
        unit_price_pms: Set(draft.unit_price_pms),
        sales_in_cedis_ago: Set(totals.sales_in_cedis_ago),
        sales_in_cedis_pms: Set(totals.sales_in_cedis_pms),
        total_sales_in_cedis: Set(totals.total_sales_in_cedis),
        actuals_in_cedis_ago: Set(totals.actuals_in_cedis_ago),
        actuals_in_cedis_pms: Set(totals.actuals_in_cedis_pms),
        total_actuals_in_cedis: Set(totals.total_actuals_in_cedis),
        variation_in_cedis_ago: Set(totals.variation_in_cedis_ago),
        variation_in_cedis_pms: Set(totals.variation_in_cedis_pms),
        total_variation_in_cedis: Set(totals.total_variation_in_cedis),
        credit_ago: Set(draft.credit_ago),
        credit_pms: Set(draft.credit_pms),
        total_credit: Set(totals.total_credit),
        collections_cash: Set(draft.collections_cash),
        collections_cheque: Set(draft.collections_cheque),
        total_collections: Set(totals.total_collections),
        expenditure: Set(draft.expenditure),
        comment: Set(draft.comment),
        net_sales: Set(draft.net_sales),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_year_bounds_cover_the_calendar_year() {
        let (start, end) = year_bounds(2025).unwrap();
        assert_eq!(start.to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_year_bounds_unrepresentable_year() {
        assert!(year_bounds(i32::MAX).is_none());
    }

    #[test]
    fn test_branch_row_conversion_rounds() {
        let row = RawBranchTotals {
            branch: "Tema".to_string(),
            total_ago: Some(dec!(1234.567)),
            total_pms: Some(dec!(89.014)),
        };
        let totals = BranchStockTotals::from_row(row, 2025).unwrap();
        assert_eq!(totals.total_ago, dec!(1234.57));
        assert_eq!(totals.total_pms, dec!(89.01));
        assert_eq!(totals.year, 2025);
    }

    #[test]
    fn test_null_aggregates_are_skipped() {
        let row = RawBranchTotals {
            branch: "Tema".to_string(),
            total_ago: None,
            total_pms: Some(dec!(10)),
        };
        assert!(BranchStockTotals::from_row(row, 2025).is_none());

        let network = RawNetworkTotals {
            total_ago: None,
            total_pms: None,
        };
        assert!(NetworkStockTotals::from_row(network, 2025).is_none());
    }
}
