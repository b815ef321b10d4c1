pub mod health;
pub mod patients;
pub mod procedures;
pub mod users;

use axum::{http::StatusCode, response::Json};
use persistence::DaoError;
use sea_orm::{DbErr, SqlErr};
use tracing::error;

use crate::schemas::ErrorResponse;

/// Error half of every handler result
pub type HandlerError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn error_response(status: StatusCode, code: &str, message: String) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message,
            code: code.to_string(),
            success: false,
        }),
    )
}

pub(crate) fn not_found(entity: &str, id: i32) -> HandlerError {
    error_response(
        StatusCode::NOT_FOUND,
        "NOT_FOUND",
        format!("{} {} not found", entity, id),
    )
}

/// Maps a DAO failure onto an HTTP status.
///
/// Mapping errors and constraint violations are the caller's fault (400);
/// everything else from the store is a 500.
pub(crate) fn dao_error(err: DaoError, context: &str) -> HandlerError {
    error!("{}: {}", context, err);

    if err.is_mapping_error() {
        return error_response(StatusCode::BAD_REQUEST, "MAPPING_ERROR", err.to_string());
    }

    match &err {
        DaoError::Database(DbErr::RecordNotUpdated) => {
            error_response(StatusCode::NOT_FOUND, "NOT_FOUND", format!("{}: record not found", context))
        }
        DaoError::Database(db_err) if is_constraint_violation(db_err) => error_response(
            StatusCode::BAD_REQUEST,
            "CONSTRAINT_VIOLATION",
            format!("{}: {}", context, db_err),
        ),
        _ => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "DATABASE_ERROR",
            format!("{}: internal error", context),
        ),
    }
}

fn is_constraint_violation(db_err: &DbErr) -> bool {
    match db_err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_))
        | Some(SqlErr::UniqueConstraintViolation(_)) => true,
        _ => {
            // Not every driver error is classified; fall back to the message
            let message = db_err.to_string().to_lowercase();
            message.contains("constraint")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_error_is_bad_request() {
        let (status, Json(body)) = dao_error(
            DaoError::UnknownColumn {
                entity: "patient".to_string(),
                column: "shoe_size".to_string(),
            },
            "Failed to filter patients",
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "MAPPING_ERROR");
        assert!(!body.success);
    }

    #[test]
    fn test_record_not_updated_is_not_found() {
        let (status, _) = dao_error(
            DaoError::Database(DbErr::RecordNotUpdated),
            "Failed to update procedure 9",
        );
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let (status, Json(body)) = dao_error(
            DaoError::Fixture("broken".to_string()),
            "Failed to load",
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "DATABASE_ERROR");
    }
}
