//! Payroll ledger error types.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Errors raised by the registry, ledger, backup and admin components.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Bad caller input; the caller should re-prompt
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown employee, record or admin
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    /// Missing or wrong admin credentials
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Valid admin whose role is too low for the operation
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Month-uniqueness violation
    #[error("employee {employee_id} has already been paid for {year}-{month:02}")]
    DuplicatePayment {
        employee_id: u64,
        year: i32,
        month: u32,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl LedgerError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl ResponseError for LedgerError {
    fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
            LedgerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            LedgerError::Forbidden(_) => StatusCode::FORBIDDEN,
            LedgerError::NotFound { .. } => StatusCode::NOT_FOUND,
            LedgerError::DuplicatePayment { .. } => StatusCode::CONFLICT,
            LedgerError::Io { .. }
            | LedgerError::Serialization(_)
            | LedgerError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            return HttpResponse::build(status).json(json!({
                "error": "Something went wrong, Contact with system admin"
            }));
        }
        HttpResponse::build(status).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_payment_message_names_the_month() {
        let err = LedgerError::DuplicatePayment {
            employee_id: 7,
            year: 2024,
            month: 3,
        };
        assert_eq!(
            err.to_string(),
            "employee 7 has already been paid for 2024-03"
        );
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = LedgerError::not_found("employee", 42);
        assert_eq!(err.to_string(), "employee '42' not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn access_errors_map_to_401_and_403() {
        assert_eq!(
            LedgerError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            LedgerError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
    }
}
