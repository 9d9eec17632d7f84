//! Structured error responses for the HTTP surface.

use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use serde_json::json;

use forecourt_core::entry::EntryError;
use forecourt_db::repositories::{SalesEntryError, TruckError, UserError};
use forecourt_shared::AppError;

/// Error wrapper that renders the shared taxonomy as a JSON response.
///
/// Every handler failure funnels through `AppError`, so each error kind
/// keeps a stable code and status, and no internal detail leaks beyond
/// the human-readable message.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = json!({
            "error": self.0.error_code(),
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<EntryError> for ApiError {
    fn from(err: EntryError) -> Self {
        let app = match &err {
            EntryError::FutureDate
            | EntryError::NegativeReading { .. }
            | EntryError::MeterRegression { .. } => AppError::Validation(err.to_string()),
            EntryError::TankLevelIncrease { .. } => AppError::Consistency(err.to_string()),
            EntryError::ImplausibleNetSales { .. } => AppError::Plausibility(err.to_string()),
            EntryError::FeatureExtraction(_) => AppError::FeatureExtraction(err.to_string()),
        };
        Self(app)
    }
}

impl From<SalesEntryError> for ApiError {
    fn from(err: SalesEntryError) -> Self {
        match err {
            SalesEntryError::NotFound(id) => {
                Self(AppError::NotFound(format!("Sales entry {id} not found")))
            }
            SalesEntryError::NotOwner => {
                Self(AppError::Forbidden("Not authorized to modify this entry".into()))
            }
            SalesEntryError::Pipeline(inner) => inner.into(),
            SalesEntryError::Database(e) => Self(AppError::Persistence(e.to_string())),
        }
    }
}

impl From<TruckError> for ApiError {
    fn from(err: TruckError) -> Self {
        match err {
            TruckError::NotFound(id) => {
                Self(AppError::NotFound(format!("Truck entry {id} not found")))
            }
            TruckError::NotOwner => {
                Self(AppError::Forbidden("Not authorized to modify this entry".into()))
            }
            TruckError::Database(e) => Self(AppError::Persistence(e.to_string())),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => Self(AppError::NotFound("User not found".into())),
            UserError::EmailTaken => {
                Self(AppError::Validation("User with this email already exists".into()))
            }
            UserError::Database(e) => Self(AppError::Persistence(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecourt_core::entry::FuelType;

    #[test]
    fn test_pipeline_errors_map_to_taxonomy() {
        let consistency: ApiError = EntryError::TankLevelIncrease {
            fuel: FuelType::Ago,
        }
        .into();
        assert_eq!(consistency.0.status_code(), 422);
        assert_eq!(consistency.0.error_code(), "CONSISTENCY_ERROR");

        let plausibility: ApiError = EntryError::ImplausibleNetSales {
            submitted: rust_decimal::Decimal::ONE,
            predicted: 100.0,
        }
        .into();
        assert_eq!(plausibility.0.status_code(), 422);
        assert_eq!(plausibility.0.error_code(), "PLAUSIBILITY_ERROR");

        let validation: ApiError = EntryError::FutureDate.into();
        assert_eq!(validation.0.status_code(), 400);

        let extraction: ApiError = EntryError::FeatureExtraction("bad".into()).into();
        assert_eq!(extraction.0.error_code(), "FEATURE_EXTRACTION_ERROR");
    }

    #[test]
    fn test_ownership_maps_to_forbidden() {
        let err: ApiError = SalesEntryError::NotOwner.into();
        assert_eq!(err.0.status_code(), 403);
    }
}
