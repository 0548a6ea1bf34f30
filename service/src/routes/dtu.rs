//! DTU Controller endpoints.

use super::with_state;
use crate::rejections::detail_reply;
use crate::state::AppState;
use df_dtu::{ProvisionRequest, TeardownRequest};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

pub(crate) fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let provision_route = warp::path!("dtu" / "provision")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(warp::body::json())
        .and_then(provision);
    let teardown_route = warp::path!("dtu" / "teardown")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(warp::body::json())
        .and_then(teardown);
    let list_route = warp::path!("dtu" / "environments")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(list_environments);
    let status_route = warp::path!("dtu" / "environments" / String)
        .and(warp::get())
        .and(with_state(state))
        .and_then(environment_status);
    provision_route
        .or(teardown_route)
        .or(list_route)
        .or(status_route)
}

/// `POST /dtu/provision`: provision a twin environment.
async fn provision(
    state: Arc<AppState>,
    request: ProvisionRequest,
) -> Result<impl Reply, Rejection> {
    let response = state.orchestrator.provision(request.environment);
    Ok(warp::reply::json(&response))
}

/// `POST /dtu/teardown`: tear an environment down.
async fn teardown(
    state: Arc<AppState>,
    request: TeardownRequest,
) -> Result<impl Reply, Rejection> {
    let response = state.orchestrator.teardown(&request.namespace);
    Ok(warp::reply::json(&response))
}

/// `GET /dtu/environments`: status of every live environment.
async fn list_environments(state: Arc<AppState>) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&state.orchestrator.list_environments()))
}

/// `GET /dtu/environments/{namespace}`: status of one environment.
async fn environment_status(
    namespace: String,
    state: Arc<AppState>,
) -> Result<impl Reply, Rejection> {
    match state.orchestrator.status(&namespace) {
        Some(status) => Ok(warp::reply::with_status(
            warp::reply::json(&status),
            StatusCode::OK,
        )),
        None => Ok(detail_reply(
            StatusCode::NOT_FOUND,
            format!("Environment {namespace} not found"),
        )),
    }
}
