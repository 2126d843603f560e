use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use daydream_core::error::CoreError;
use serde_json::json;

/// Error returned by every handler and extractor.
///
/// Renders as `{ "error": <message>, "code": <CODE> }`. Causes that are not
/// safe to show clients are logged and replaced by a fixed message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A failed operation reported to the client with a fixed message.
    #[error("{message}: {source}")]
    Operation {
        message: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl AppError {
    /// Wrap a database failure under a fixed client-facing message.
    ///
    /// ```ignore
    /// ClipRepo::soft_delete(&pool, id)
    ///     .await
    ///     .map_err(AppError::operation("Failed to delete clip"))?;
    /// ```
    pub fn operation(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
        move |source| AppError::Operation { message, source }
    }

    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Operation { message, source } => match classify_constraint(source) {
                Some(parts) => parts,
                None => {
                    tracing::error!(error = %source, "{message}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        (*message).to_string(),
                    )
                }
            },
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        (status, axum::Json(json!({ "error": message, "code": code }))).into_response()
    }
}

fn core_parts(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Map constraint violations a client can fix to 4xx.
///
/// - `23505` on a `uq_` constraint: 409 (e.g. a duplicate clip slug).
/// - `23503`: 400, the clip names an author or source clip that does not exist.
/// - `23514`: 400, a status value outside its CHECK constraint.
fn classify_constraint(err: &sqlx::Error) -> Option<(StatusCode, &'static str, String)> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    let constraint = db_err.constraint().unwrap_or("unknown");
    match db_err.code().as_deref() {
        Some("23505") if constraint.starts_with("uq_") => Some((
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        )),
        Some("23503") => Some((
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            format!("Referenced record does not exist: {constraint}"),
        )),
        Some("23514") => Some((
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            format!("Value violates check constraint: {constraint}"),
        )),
        _ => None,
    }
}

fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if let sqlx::Error::RowNotFound = err {
        return (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        );
    }
    classify_constraint(err).unwrap_or_else(|| {
        tracing::error!(error = %err, "Database error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred".to_string(),
        )
    })
}
