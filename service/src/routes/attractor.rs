//! Attractor convergence endpoints.

use super::with_state;
use crate::state::AppState;
use df_attractor::{ConvergeRequest, ConvergenceState, ConvergenceStatus};
use serde_json::json;
use std::sync::Arc;
use warp::{Filter, Rejection, Reply};

pub(crate) fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let converge_route = warp::path!("attractor" / "converge")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(warp::body::json())
        .and_then(converge);
    let converge_async_route = warp::path!("attractor" / "converge-async")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(warp::body::json())
        .and_then(converge_async);
    let status_route = warp::path!("attractor" / "status" / String)
        .and(warp::get())
        .and(with_state(state))
        .and_then(convergence_status);
    converge_route.or(converge_async_route).or(status_route)
}

/// `POST /attractor/converge`: run the convergence loop synchronously.
async fn converge(
    state: Arc<AppState>,
    request: ConvergeRequest,
) -> Result<impl Reply, Rejection> {
    let result = state.engine.converge(&request).await;
    state.sessions.insert(request.spec_id.clone(), result.clone());
    Ok(warp::reply::json(&result))
}

/// `POST /attractor/converge-async`: spawn the loop and return immediately.
/// The result lands in the session registry when the run finishes.
async fn converge_async(
    state: Arc<AppState>,
    request: ConvergeRequest,
) -> Result<impl Reply, Rejection> {
    let spec_id = request.spec_id.clone();
    let task_state = state.clone();
    tokio::spawn(async move {
        let result = task_state.engine.converge(&request).await;
        task_state.sessions.insert(request.spec_id.clone(), result);
    });
    Ok(warp::reply::json(
        &json!({"spec_id": spec_id, "status": "started"}),
    ))
}

/// `GET /attractor/status/{spec_id}`: where a convergence session stands.
/// Unknown specs report an initializing status rather than 404.
async fn convergence_status(
    spec_id: String,
    state: Arc<AppState>,
) -> Result<impl Reply, Rejection> {
    let status = match state.sessions.get(&spec_id) {
        Some(session) => ConvergenceStatus {
            spec_id,
            state: session.state,
            current_iteration: session.iterations_completed,
            current_satisfaction: session.final_satisfaction,
            budget_remaining_usd: 0.0,
        },
        None => ConvergenceStatus {
            spec_id,
            state: ConvergenceState::Initializing,
            current_iteration: 0,
            current_satisfaction: 0.0,
            budget_remaining_usd: 0.0,
        },
    };
    Ok(warp::reply::json(&status))
}
