//! HTTP error responses.
//!
//! Every handler returns `ApiResult<T>`. Repository errors convert into an
//! [`ApiError`] through the `From` impls below, which pick the status from
//! [`AppError`] and, for ledger and trip rules, a more specific error code.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fleetbook_core::{ledger::LedgerError, trip::TripError as TripRule};
use fleetbook_db::repositories::{
    BranchError, CategoryError, DashboardError, ExpenseError, PurchaseError, PurchaseSaleError,
    ReportError, TripError, UserError, VehicleError,
};
use fleetbook_shared::AppError;
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An [`AppError`] ready to be rendered as `{"error", "message"}` JSON.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    code: Option<&'static str>,
}

impl ApiError {
    /// Overrides the generic error code of the wrapped error.
    #[must_use]
    pub const fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// HTTP status of this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.code.unwrap_or_else(|| self.error.error_code())
    }

    /// Shorthand for a 400 response.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into()).into()
    }

    /// Shorthand for a 401 response.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized(message.into()).into()
    }

    /// Shorthand for a 404 response.
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into()).into()
    }

    fn database(err: &DbErr) -> Self {
        error!(error = %err, "Database error");
        AppError::Database(err.to_string()).into()
    }

    fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(error = %message, "Internal error");
        AppError::Internal(message).into()
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self { error, code: None }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.code(),
            "message": self.error.public_message(),
        });
        (self.status(), Json(body)).into_response()
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self::database(&err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::validation(errors.to_string())
    }
}

impl From<fleetbook_core::auth::PasswordError> for ApiError {
    fn from(err: fleetbook_core::auth::PasswordError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<fleetbook_shared::JwtError> for ApiError {
    fn from(err: fleetbook_shared::JwtError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        if err.is_validation_error() {
            return Self::validation(err.to_string());
        }
        let code = match &err {
            LedgerError::InsufficientBalance { .. } => "insufficient_balance",
            LedgerError::InsufficientTins { .. } => "insufficient_tins",
            LedgerError::LedgerCompleted => "ledger_completed",
            LedgerError::AlreadyCompleted => "already_completed",
            LedgerError::NotCompleted => "not_completed",
            LedgerError::NothingToCollect => "nothing_to_collect",
            _ => "business_rule_violation",
        };
        Self::from(AppError::BusinessRule(err.to_string())).with_code(code)
    }
}

impl From<TripRule> for ApiError {
    fn from(err: TripRule) -> Self {
        match err {
            TripRule::TripCompleted => {
                Self::from(AppError::BusinessRule(err.to_string())).with_code("trip_completed")
            }
            TripRule::SaleExceedsPurchase { .. } => {
                Self::from(AppError::BusinessRule(err.to_string())).with_code("oversold")
            }
            TripRule::Overflow => {
                Self::from(AppError::BusinessRule(err.to_string())).with_code("amount_overflow")
            }
            _ => Self::validation(err.to_string()),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::DuplicateUsername(_) => AppError::Conflict(err.to_string()).into(),
            UserError::Database(e) => Self::database(&e),
        }
    }
}

impl From<BranchError> for ApiError {
    fn from(err: BranchError) -> Self {
        match err {
            BranchError::DuplicateName(_) => AppError::Conflict(err.to_string()).into(),
            BranchError::NotFound(_) => Self::not_found(err.to_string()),
            BranchError::Database(e) => Self::database(&e),
        }
    }
}

impl From<CategoryError> for ApiError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::DuplicateName(_) => AppError::Conflict(err.to_string()).into(),
            CategoryError::NotFound(_) => Self::not_found(err.to_string()),
            CategoryError::Database(e) => Self::database(&e),
        }
    }
}

impl From<VehicleError> for ApiError {
    fn from(err: VehicleError) -> Self {
        match err {
            VehicleError::DuplicateNumber(_) => AppError::Conflict(err.to_string()).into(),
            VehicleError::InUse { .. } => {
                Self::from(AppError::Conflict(err.to_string())).with_code("vehicle_in_use")
            }
            VehicleError::NotFound(_) => Self::not_found(err.to_string()),
            VehicleError::BranchNotFound(_) => Self::validation(err.to_string()),
            VehicleError::Database(e) => Self::database(&e),
        }
    }
}

impl From<TripError> for ApiError {
    fn from(err: TripError) -> Self {
        match err {
            TripError::NotFound(_) => Self::not_found(err.to_string()),
            TripError::VehicleNotFound(_) => Self::validation(err.to_string()),
            TripError::Rule(rule) => rule.into(),
            TripError::Database(e) => Self::database(&e),
        }
    }
}

impl From<PurchaseError> for ApiError {
    fn from(err: PurchaseError) -> Self {
        match err {
            PurchaseError::NotFound(_) | PurchaseError::TripNotFound(_) => {
                Self::not_found(err.to_string())
            }
            PurchaseError::Rule(rule) => rule.into(),
            PurchaseError::Database(e) => Self::database(&e),
        }
    }
}

impl From<ExpenseError> for ApiError {
    fn from(err: ExpenseError) -> Self {
        match err {
            ExpenseError::NotFound(_) => Self::not_found(err.to_string()),
            ExpenseError::CategoryNotFound(_)
            | ExpenseError::VehicleNotFound(_)
            | ExpenseError::TripNotFound(_)
            | ExpenseError::Rule(_) => Self::validation(err.to_string()),
            ExpenseError::OwnedByLedger(_) => {
                Self::from(AppError::Conflict(err.to_string())).with_code("owned_by_ledger")
            }
            ExpenseError::Database(e) => Self::database(&e),
        }
    }
}

impl From<PurchaseSaleError> for ApiError {
    fn from(err: PurchaseSaleError) -> Self {
        match err {
            PurchaseSaleError::NotFound(_) | PurchaseSaleError::TransactionNotFound(_) => {
                Self::not_found(err.to_string())
            }
            PurchaseSaleError::VehicleNotFound(_) | PurchaseSaleError::BlankTitle => {
                Self::validation(err.to_string())
            }
            PurchaseSaleError::Ledger(rule) => rule.into(),
            PurchaseSaleError::Database(e) => Self::database(&e),
        }
    }
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Database(e) => Self::database(&e),
        }
    }
}

impl From<fleetbook_core::reports::ReportError> for ApiError {
    fn from(err: fleetbook_core::reports::ReportError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Params(e) => e.into(),
            ReportError::Database(e) => Self::database(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    #[test]
    fn test_ledger_rules_map_to_unprocessable() {
        let err = ApiError::from(PurchaseSaleError::Ledger(LedgerError::InsufficientBalance {
            balance: Decimal::ZERO,
            delta: -Decimal::ONE_HUNDRED,
        }));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "insufficient_balance");

        let err = ApiError::from(PurchaseSaleError::Ledger(LedgerError::LedgerCompleted));
        assert_eq!(err.code(), "ledger_completed");
    }

    #[test]
    fn test_ledger_input_errors_map_to_bad_request() {
        let err = ApiError::from(LedgerError::ExpenseWithTins);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn test_conflicts() {
        let err = ApiError::from(VehicleError::InUse { trips: 2, ledgers: 0 });
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "vehicle_in_use");

        let err = ApiError::from(ExpenseError::OwnedByLedger(Uuid::nil()));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_database_error_is_masked() {
        let err = ApiError::from(BranchError::Database(DbErr::Custom("pool timed out".into())));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "internal_error");
        assert_eq!(err.error.public_message(), "An error occurred");
    }

    #[test]
    fn test_trip_rules() {
        let err = ApiError::from(TripError::Rule(TripRule::TripCompleted));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let err = ApiError::from(TripError::Rule(TripRule::BlankTitle));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let err = ApiError::from(TripError::NotFound(Uuid::nil()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_out_of_range_values() {
        let err = ApiError::from(PurchaseError::Rule(TripRule::Overflow));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "amount_overflow");

        let err = ApiError::from(PurchaseError::Rule(TripRule::ValueOutOfRange(Decimal::ONE)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(LedgerError::AmountOutOfRange(Decimal::new(1, 5)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "validation_error");

        let err = ApiError::from(LedgerError::Overflow);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
