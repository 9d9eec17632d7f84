//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error taxonomy.
///
/// Every failure surfaced to a client maps to exactly one of these kinds,
/// each with a stable error code and HTTP status.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed or credentials are missing.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Actor is not the owner of the record or lacks the required role.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Referenced entry, branch, or user is absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Schema-level validation failure (bad branch, future date,
    /// negative or regressing readings).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Physical-constraint violation on derived state
    /// (closing tank reading above opening).
    #[error("Consistency error: {0}")]
    Consistency(String),

    /// Net sales differ from the model prediction beyond tolerance.
    #[error("Plausibility error: {0}")]
    Plausibility(String),

    /// The entry could not be turned into model features.
    #[error("Feature extraction error: {0}")]
    FeatureExtraction(String),

    /// Transaction or commit failure; always rolled back.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) | Self::FeatureExtraction(_) => 400,
            Self::Consistency(_) | Self::Plausibility(_) => 422,
            Self::Persistence(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Consistency(_) => "CONSISTENCY_ERROR",
            Self::Plausibility(_) => "PLAUSIBILITY_ERROR",
            Self::FeatureExtraction(_) => "FEATURE_EXTRACTION_ERROR",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Unauthorized(String::new()).status_code(), 401);
        assert_eq!(AppError::Forbidden(String::new()).status_code(), 403);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::Consistency(String::new()).status_code(), 422);
        assert_eq!(AppError::Plausibility(String::new()).status_code(), 422);
        assert_eq!(
            AppError::FeatureExtraction(String::new()).status_code(),
            400
        );
        assert_eq!(AppError::Persistence(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            AppError::Unauthorized(String::new()),
            AppError::Forbidden(String::new()),
            AppError::NotFound(String::new()),
            AppError::Validation(String::new()),
            AppError::Consistency(String::new()),
            AppError::Plausibility(String::new()),
            AppError::FeatureExtraction(String::new()),
            AppError::Persistence(String::new()),
            AppError::Internal(String::new()),
        ];
        let mut codes: Vec<&str> = errors.iter().map(AppError::error_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Consistency("msg".into()).to_string(),
            "Consistency error: msg"
        );
        assert_eq!(
            AppError::Plausibility("msg".into()).to_string(),
            "Plausibility error: msg"
        );
        assert_eq!(
            AppError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
    }
}
