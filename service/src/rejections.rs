//! Rejection handling with `{"detail": ...}` error bodies.
//!
//! SDSM and the platform tooling consume this error shape on every
//! non-2xx response, so rejections and handler errors all funnel through
//! [`detail_reply`].

use serde::Serialize;
use std::convert::Infallible;
use warp::filters::body::BodyDeserializeError;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::{Rejection, Reply};

/// Wire shape of every error body.
#[derive(Debug, Serialize)]
pub struct Detail {
    /// Human-readable message.
    pub detail: String,
}

/// Build a `{"detail": ...}` JSON reply with the given status.
pub fn detail_reply(status: StatusCode, message: impl Into<String>) -> WithStatus<Json> {
    let body = Detail {
        detail: message.into(),
    };
    warp::reply::with_status(warp::reply::json(&body), status)
}

/// Map warp rejections onto the error surface.
///
/// Malformed request bodies become 422 rather than warp's default 400,
/// matching what existing clients expect from the platform.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if let Some(body_err) = err.find::<BodyDeserializeError>() {
        (StatusCode::UNPROCESSABLE_ENTITY, body_err.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method Not Allowed".to_string(),
        )
    } else {
        tracing::error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error".to_string(),
        )
    };
    Ok(detail_reply(status, message))
}
