//! Sales entry routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::{AppState, middleware::AuthUser};
use forecourt_core::entry::{Branch, EntryDraft};
use forecourt_db::entities::sales_entries;
use forecourt_db::repositories::{SalesEntryRepository, StockSummaryRow};
use forecourt_shared::AppError;

/// Creates the sales entry routes.
///
/// The trailing segment of `/entries/{key}` is a branch name on reads
/// and an entry id on writes, mirroring the client's URL scheme.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/entries/new", post(create_entry))
        .route("/entries/all", get(list_entries))
        .route("/entries/stock-summary", get(stock_summary))
        .route(
            "/entries/{key}",
            get(entries_by_branch)
                .put(update_entry)
                .delete(delete_entry),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating or rewriting a sales entry.
///
/// Figures arrive as JSON numbers; opening readings and unit prices
/// left at `0.0` are backfilled from the branch's prior entry.
#[derive(Debug, Deserialize)]
pub struct SalesEntryRequest {
    /// Branch where the entry is recorded.
    pub branch: String,
    /// Date of the entry.
    pub date: DateTime<Utc>,
    /// Opening meter reading, AGO.
    #[serde(default)]
    pub opening_meter_reading_ago: f64,
    /// Closing meter reading, AGO.
    #[serde(default)]
    pub closing_meter_reading_ago: f64,
    /// Opening meter reading, PMS.
    #[serde(default)]
    pub opening_meter_reading_pms: f64,
    /// Closing meter reading, PMS.
    #[serde(default)]
    pub closing_meter_reading_pms: f64,
    /// Opening tank reading, AGO.
    #[serde(default)]
    pub opening_tank_reading_ago: f64,
    /// Closing tank reading, AGO.
    #[serde(default)]
    pub closing_tank_reading_ago: f64,
    /// Opening tank reading, PMS.
    #[serde(default)]
    pub opening_tank_reading_pms: f64,
    /// Closing tank reading, PMS.
    #[serde(default)]
    pub closing_tank_reading_pms: f64,
    /// Pump test volume, AGO.
    #[serde(default)]
    pub pump_test_ago: f64,
    /// Pump test volume, PMS.
    #[serde(default)]
    pub pump_test_pms: f64,
    /// Received delivery volume, AGO.
    #[serde(default)]
    pub received_ago: f64,
    /// Received delivery volume, PMS.
    #[serde(default)]
    pub received_pms: f64,
    /// Unit price, AGO.
    #[serde(default)]
    pub unit_price_ago: f64,
    /// Unit price, PMS.
    #[serde(default)]
    pub unit_price_pms: f64,
    /// Credit extended, AGO.
    #[serde(default)]
    pub credit_ago: f64,
    /// Credit extended, PMS.
    #[serde(default)]
    pub credit_pms: f64,
    /// Cash collected.
    #[serde(default)]
    pub collections_cash: f64,
    /// Cheques collected.
    #[serde(default)]
    pub collections_cheque: f64,
    /// Expenditure for the day.
    #[serde(default)]
    pub expenditure: f64,
    /// Free-text comment.
    #[serde(default)]
    pub comment: Option<String>,
    /// Net sales as asserted by the supervisor.
    #[serde(default)]
    pub net_sales: f64,
}

/// Query parameters for paginated listings.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Number of items to skip.
    #[serde(default)]
    pub skip: u64,
    /// Number of items to return (max 1000).
    pub limit: Option<u64>,
}

impl ListQuery {
    /// Effective page size, clamped to the listing cap.
    #[must_use]
    pub fn effective_limit(&self) -> u64 {
        self.limit.unwrap_or(100).min(1000)
    }
}

/// Query parameters for the stock summary.
#[derive(Debug, Deserialize)]
pub struct StockSummaryQuery {
    /// Calendar year; defaults to the current one.
    pub year: Option<i32>,
}

/// Response for a fully derived sales entry.
///
/// Decimal figures serialize as strings with two decimal places.
#[derive(Debug, Serialize)]
pub struct SalesEntryResponse {
    /// Entry ID.
    pub id: Uuid,
    /// Branch name.
    pub branch: String,
    /// Entry date.
    pub date: String,
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
    /// Combined pump test volume.
    pub total_pump_test: Decimal,
    /// Received delivery volume, AGO.
    pub received_ago: Decimal,
    /// Received delivery volume, PMS.
    pub received_pms: Decimal,
    /// Combined received volume.
    pub total_received: Decimal,
    /// Actuals, AGO.
    pub actuals_ago: Decimal,
    /// Actuals, PMS.
    pub actuals_pms: Decimal,
    /// Combined actuals.
    pub total_actuals: Decimal,
    /// Sales, AGO.
    pub sales_ago: Decimal,
    /// Sales, PMS.
    pub sales_pms: Decimal,
    /// Combined sales.
    pub total_sales: Decimal,
    /// Variation, AGO.
    pub variation_ago: Decimal,
    /// Variation, PMS.
    pub variation_pms: Decimal,
    /// Combined variation.
    pub total_variation: Decimal,
    /// Unit price, AGO.
    pub unit_price_ago: Decimal,
    /// Unit price, PMS.
    pub unit_price_pms: Decimal,
    /// Sales value, AGO.
    pub sales_in_cedis_ago: Decimal,
    /// Sales value, PMS.
    pub sales_in_cedis_pms: Decimal,
    /// Combined sales value.
    pub total_sales_in_cedis: Decimal,
    /// Actuals value, AGO.
    pub actuals_in_cedis_ago: Decimal,
    /// Actuals value, PMS.
    pub actuals_in_cedis_pms: Decimal,
    /// Combined actuals value.
    pub total_actuals_in_cedis: Decimal,
    /// Variation value, AGO.
    pub variation_in_cedis_ago: Decimal,
    /// Variation value, PMS.
    pub variation_in_cedis_pms: Decimal,
    /// Combined variation value.
    pub total_variation_in_cedis: Decimal,
    /// Credit extended, AGO.
    pub credit_ago: Decimal,
    /// Credit extended, PMS.
    pub credit_pms: Decimal,
    /// Combined credit.
    pub total_credit: Decimal,
    /// Cash collected.
    pub collections_cash: Decimal,
    /// Cheques collected.
    pub collections_cheque: Decimal,
    /// Combined collections.
    pub total_collections: Decimal,
    /// Expenditure for the day.
    pub expenditure: Decimal,
    /// Free-text comment.
    pub comment: Option<String>,
    /// Net sales as asserted by the supervisor.
    pub net_sales: Decimal,
    /// Owner of the entry.
    pub user_id: Uuid,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<sales_entries::Model> for SalesEntryResponse {
    fn from(m: sales_entries::Model) -> Self {
        Self {
            id: m.id,
            branch: m.branch,
            date: m.date.to_rfc3339(),
            opening_meter_reading_ago: m.opening_meter_reading_ago,
            closing_meter_reading_ago: m.closing_meter_reading_ago,
            opening_meter_reading_pms: m.opening_meter_reading_pms,
            closing_meter_reading_pms: m.closing_meter_reading_pms,
            opening_tank_reading_ago: m.opening_tank_reading_ago,
            closing_tank_reading_ago: m.closing_tank_reading_ago,
            opening_tank_reading_pms: m.opening_tank_reading_pms,
            closing_tank_reading_pms: m.closing_tank_reading_pms,
            pump_test_ago: m.pump_test_ago,
            pump_test_pms: m.pump_test_pms,
            total_pump_test: m.total_pump_test,
            received_ago: m.received_ago,
            received_pms: m.received_pms,
            total_received: m.total_received,
            actuals_ago: m.actuals_ago,
            actuals_pms: m.actuals_pms,
            total_actuals: m.total_actuals,
            sales_ago: m.sales_ago,
            sales_pms: m.sales_pms,
            total_sales: m.total_sales,
            variation_ago: m.variation_ago,
            variation_pms: m.variation_pms,
            total_variation: m.total_variation,
            unit_price_ago: m.unit_price_ago,
            unit_price_pms: m.unit_price_pms,
            sales_in_cedis_ago: m.sales_in_cedis_ago,
            sales_in_cedis_pms: m.sales_in_cedis_pms,
            total_sales_in_cedis: m.total_sales_in_cedis,
            actuals_in_cedis_ago: m.actuals_in_cedis_ago,
            actuals_in_cedis_pms: m.actuals_in_cedis_pms,
            total_actuals_in_cedis: m.total_actuals_in_cedis,
            variation_in_cedis_ago: m.variation_in_cedis_ago,
            variation_in_cedis_pms: m.variation_in_cedis_pms,
            total_variation_in_cedis: m.total_variation_in_cedis,
            credit_ago: m.credit_ago,
            credit_pms: m.credit_pms,
            total_credit: m.total_credit,
            collections_cash: m.collections_cash,
            collections_cheque: m.collections_cheque,
            total_collections: m.total_collections,
            expenditure: m.expenditure,
            comment: m.comment,
            net_sales: m.net_sales,
            user_id: m.user_id,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

/// One stock-summary line; the network-wide line is labeled "Total".
#[derive(Debug, Serialize)]
pub struct StockSummaryResponse {
    /// Branch name, or "Total" for the network row.
    pub branch: String,
    /// Summed AGO sales volume.
    pub total_ago: Decimal,
    /// Summed PMS sales volume.
    pub total_pms: Decimal,
    /// The year the totals cover.
    pub year: i32,
}

impl From<StockSummaryRow> for StockSummaryResponse {
    fn from(row: StockSummaryRow) -> Self {
        match row {
            StockSummaryRow::PerBranch(b) => Self {
                branch: b.branch,
                total_ago: b.total_ago,
                total_pms: b.total_pms,
                year: b.year,
            },
            StockSummaryRow::Network(n) => Self {
                branch: "Total".to_string(),
                total_ago: n.total_ago,
                total_pms: n.total_pms,
                year: n.year,
            },
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /entries/new - Create a new sales entry.
async fn create_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SalesEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = to_draft(payload)?;
    let branch = draft.branch;

    let repo = SalesEntryRepository::new((*state.db).clone());
    let entry = repo
        .create_entry(draft, auth.user_id(), state.model.as_ref())
        .await
        .map_err(|e| {
            error!(error = %e, branch = %branch, "Failed to create sales entry");
            ApiError::from(e)
        })?;

    info!(entry_id = %entry.id, branch = %branch, "Created new sales entry");

    Ok((
        StatusCode::CREATED,
        Json(SalesEntryResponse::from(entry)),
    ))
}

/// GET /entries/all - List sales entries with pagination.
async fn list_entries(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = SalesEntryRepository::new((*state.db).clone());
    let entries = repo
        .list(query.skip, query.effective_limit())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to list sales entries");
            ApiError::from(e)
        })?;

    let items: Vec<SalesEntryResponse> =
        entries.into_iter().map(SalesEntryResponse::from).collect();

    Ok((StatusCode::OK, Json(items)))
}

/// GET /entries/stock-summary - Yearly sales totals per branch.
async fn stock_summary(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<StockSummaryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = SalesEntryRepository::new((*state.db).clone());
    let rows = repo.stock_summary(query.year).await.map_err(|e| {
        error!(error = %e, "Failed to build stock summary");
        ApiError::from(e)
    })?;

    let items: Vec<StockSummaryResponse> =
        rows.into_iter().map(StockSummaryResponse::from).collect();

    Ok((StatusCode::OK, Json(items)))
}

/// GET /entries/{branch} - All entries recorded for one branch.
async fn entries_by_branch(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(branch): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let branch: Branch = branch
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid branch: {branch}")))?;

    let repo = SalesEntryRepository::new((*state.db).clone());
    let entries = repo.list_by_branch(branch).await.map_err(|e| {
        error!(error = %e, branch = %branch, "Failed to list entries for branch");
        ApiError::from(e)
    })?;

    if entries.is_empty() {
        return Err(AppError::NotFound(format!(
            "No sales entries found for branch {branch}"
        ))
        .into());
    }

    let items: Vec<SalesEntryResponse> =
        entries.into_iter().map(SalesEntryResponse::from).collect();

    Ok((StatusCode::OK, Json(items)))
}

/// PUT /entries/{entry_id} - Rewrite a sales entry. Owner only.
async fn update_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
    Json(payload): Json<SalesEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry_id: Uuid = key
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid entry id: {key}")))?;
    let draft = to_draft(payload)?;

    let repo = SalesEntryRepository::new((*state.db).clone());
    let entry = repo
        .update_entry(entry_id, draft, auth.user_id(), state.model.as_ref())
        .await
        .map_err(|e| {
            error!(error = %e, entry_id = %entry_id, "Failed to update sales entry");
            ApiError::from(e)
        })?;

    info!(entry_id = %entry_id, "Updated sales entry");

    Ok((StatusCode::OK, Json(SalesEntryResponse::from(entry))))
}

/// DELETE /entries/{entry_id} - Permanently remove a sales entry. Owner only.
async fn delete_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let entry_id: Uuid = key
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid entry id: {key}")))?;
    let repo = SalesEntryRepository::new((*state.db).clone());
    repo.delete_entry(entry_id, auth.user_id())
        .await
        .map_err(|e| {
            error!(error = %e, entry_id = %entry_id, "Failed to delete sales entry");
            ApiError::from(e)
        })?;

    info!(entry_id = %entry_id, "Deleted sales entry");

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Converts a request payload into a domain draft.
///
/// Figures are rounded to two decimal places here, at the boundary,
/// before any validation or derivation sees them.
fn to_draft(payload: SalesEntryRequest) -> Result<EntryDraft, ApiError> {
    let branch: Branch = payload
        .branch
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid branch: {}", payload.branch)))?;

    Ok(EntryDraft {
        branch,
        date: payload.date,
        opening_meter_reading_ago: decimal_field(
            "opening_meter_reading_ago",
            payload.opening_meter_reading_ago,
        )?,
        closing_meter_reading_ago: decimal_field(
            "closing_meter_reading_ago",
            payload.closing_meter_reading_ago,
        )?,
        opening_meter_reading_pms: decimal_field(
            "opening_meter_reading_pms",
            payload.opening_meter_reading_pms,
        )?,
        closing_meter_reading_pms: decimal_field(
            "closing_meter_reading_pms",
            payload.closing_meter_reading_pms,
        )?,
        opening_tank_reading_ago: decimal_field(
            "opening_tank_reading_ago",
            payload.opening_tank_reading_ago,
        )?,
        closing_tank_reading_ago: decimal_field(
            "closing_tank_reading_ago",
            payload.closing_tank_reading_ago,
        )?,
        opening_tank_reading_pms: decimal_field(
            "opening_tank_reading_pms",
            payload.opening_tank_reading_pms,
        )?,
        closing_tank_reading_pms: decimal_field(
            "closing_tank_reading_pms",
            payload.closing_tank_reading_pms,
        )?,
        pump_test_ago: decimal_field("pump_test_ago", payload.pump_test_ago)?,
        pump_test_pms: decimal_field("pump_test_pms", payload.pump_test_pms)?,
        received_ago: decimal_field("received_ago", payload.received_ago)?,
        received_pms: decimal_field("received_pms", payload.received_pms)?,
        unit_price_ago: decimal_field("unit_price_ago", payload.unit_price_ago)?,
        unit_price_pms: decimal_field("unit_price_pms", payload.unit_price_pms)?,
        credit_ago: decimal_field("credit_ago", payload.credit_ago)?,
        credit_pms: decimal_field("credit_pms", payload.credit_pms)?,
        collections_cash: decimal_field("collections_cash", payload.collections_cash)?,
        collections_cheque: decimal_field("collections_cheque", payload.collections_cheque)?,
        expenditure: decimal_field("expenditure", payload.expenditure)?,
        comment: payload.comment,
        net_sales: decimal_field("net_sales", payload.net_sales)?,
    })
}

/// Converts one JSON number into a two-decimal figure.
fn decimal_field(field: &str, value: f64) -> Result<Decimal, ApiError> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(2))
        .ok_or_else(|| AppError::Validation(format!("{field} is not a valid number")).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request() -> SalesEntryRequest {
        SalesEntryRequest {
            branch: "Tema".to_string(),
            date: Utc::now(),
            opening_meter_reading_ago: 1000.0,
            closing_meter_reading_ago: 1400.125,
            opening_meter_reading_pms: 0.0,
            closing_meter_reading_pms: 2600.0,
            opening_tank_reading_ago: 900.0,
            closing_tank_reading_ago: 500.0,
            opening_tank_reading_pms: 1500.0,
            closing_tank_reading_pms: 900.0,
            pump_test_ago: 10.0,
            pump_test_pms: 10.0,
            received_ago: 0.0,
            received_pms: 0.0,
            unit_price_ago: 13.99,
            unit_price_pms: 14.49,
            credit_ago: 0.0,
            credit_pms: 0.0,
            collections_cash: 100.0,
            collections_cheque: 0.0,
            expenditure: 0.0,
            comment: None,
            net_sales: 5000.0,
        }
    }

    #[test]
    fn test_to_draft_rounds_at_the_boundary() {
        let draft = to_draft(request()).unwrap();
        assert_eq!(draft.branch, Branch::Tema);
        // 1400.125 rounds to even: 1400.12
        assert_eq!(draft.closing_meter_reading_ago, dec!(1400.12));
        assert_eq!(draft.unit_price_ago, dec!(13.99));
    }

    #[test]
    fn test_to_draft_rejects_unknown_branch() {
        let mut req = request();
        req.branch = "Accra Mall".to_string();
        let err = to_draft(req).unwrap_err();
        assert_eq!(err.0.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_to_draft_rejects_non_finite_figures() {
        let mut req = request();
        req.net_sales = f64::NAN;
        let err = to_draft(req).unwrap_err();
        assert_eq!(err.0.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_list_query_limit_is_capped() {
        let query = ListQuery {
            skip: 0,
            limit: Some(10_000),
        };
        assert_eq!(query.effective_limit(), 1000);

        let query = ListQuery {
            skip: 0,
            limit: None,
        };
        assert_eq!(query.effective_limit(), 100);
    }

    #[test]
    fn test_network_summary_row_is_labeled_total() {
        let row = StockSummaryRow::Network(forecourt_db::repositories::NetworkStockTotals {
            total_ago: dec!(12.5),
            total_pms: dec!(30),
            year: 2026,
        });
        let response = StockSummaryResponse::from(row);
        assert_eq!(response.branch, "Total");
        assert_eq!(response.total_ago, dec!(12.5));
    }
}
