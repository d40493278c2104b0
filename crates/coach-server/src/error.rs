use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use coach_core::error::CoachError;

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequest(msg.into()).into())
    }
}

/// Carries an explicit 400 through the `anyhow::Error` chain.
#[derive(Debug)]
struct BadRequest(String);

impl std::fmt::Display for BadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequest {}

fn status_of(e: &CoachError) -> StatusCode {
    match e {
        CoachError::Validation(_) | CoachError::TagLimit(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CoachError::Persistence(_) => StatusCode::BAD_GATEWAY,
        CoachError::NotFound(_)
        | CoachError::SessionNotFound(_)
        | CoachError::BlockNotFound(_) => StatusCode::NOT_FOUND,
        CoachError::InvalidTransition { .. }
        | CoachError::SaveInFlight
        | CoachError::NoSaveInFlight => StatusCode::CONFLICT,
        CoachError::NotInitialized
        | CoachError::InvalidTag(_)
        | CoachError::InvalidStep(_)
        | CoachError::InvalidCategory(_)
        | CoachError::InvalidBlockKind(_)
        | CoachError::InvalidRecordId(_)
        | CoachError::InvalidDay(_) => StatusCode::BAD_REQUEST,
        CoachError::Io(_) | CoachError::Yaml(_) | CoachError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(b) = self.0.downcast_ref::<BadRequest>() {
            let body = serde_json::json!({ "error": b.0.clone() });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }

        let Some(e) = self.0.downcast_ref::<CoachError>() else {
            tracing::error!(error = %self.0, "unhandled error");
            let body = serde_json::json!({ "error": self.0.to_string() });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response();
        };

        let status = status_of(e);
        let mut body = serde_json::json!({ "error": e.to_string() });
        match e {
            CoachError::Validation(v) => {
                body["fields"] = serde_json::json!(v.fields());
                body["issues"] = serde_json::json!(v.issues);
            }
            CoachError::Persistence(p) => {
                body["persistence"] = serde_json::json!(p);
            }
            _ => {}
        }
        if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
            tracing::error!(error = %e, "request failed");
        }
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
