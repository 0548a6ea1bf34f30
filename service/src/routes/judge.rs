//! Judge-01 Scenario Eval endpoint.

use super::with_state;
use crate::rejections::detail_reply;
use crate::state::AppState;
use df_judge::EvaluateRequest;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

pub(crate) fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("evaluate")
        .and(warp::post())
        .and(with_state(state))
        .and(warp::body::json())
        .and_then(evaluate)
}

/// `POST /evaluate`: score a trajectory against a satisfaction criterion.
///
/// Called by SDSM when it forwards `POST /api/dark-factory/evaluate`
/// requests. Backend failures surface as 502 with the underlying error
/// logged, never leaked.
async fn evaluate(
    state: Arc<AppState>,
    request: EvaluateRequest,
) -> Result<impl Reply, Rejection> {
    match state.backend.evaluate(&request).await {
        Ok(response) => {
            tracing::info!(
                "Judge evaluate ok: score={} backend={}",
                response.score.value(),
                state.backend.name()
            );
            Ok(warp::reply::with_status(
                warp::reply::json(&response),
                StatusCode::OK,
            ))
        }
        Err(err) => {
            tracing::error!("Judge evaluate error: {}", err);
            Ok(detail_reply(
                StatusCode::BAD_GATEWAY,
                "Judge backend evaluation failed",
            ))
        }
    }
}
