//! HTTP route tree for the Dark Factory control plane.
//!
//! One submodule per component:
//! - `judge`: `POST /evaluate`
//! - `specs`: `POST /specs/validate`, `POST /specs/compile`
//! - `scenarios`: `POST /scenarios/execute`, `POST /scenarios/execute-batch`
//! - `attractor`: `POST /attractor/converge`, `POST /attractor/converge-async`,
//!   `GET /attractor/status/{spec_id}`
//! - `dtu`: `POST /dtu/provision`, `POST /dtu/teardown`,
//!   `GET /dtu/environments`, `GET /dtu/environments/{namespace}`

use crate::rejections;
use crate::state::AppState;
use df_core::round_dp;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, Rejection, Reply};

mod attractor;
mod dtu;
mod judge;
mod scenarios;
mod specs;

/// The full application: routes, rejection handling, request logging.
pub fn app(state: Arc<AppState>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    routes(state)
        .recover(rejections::handle_rejection)
        .with(warp::log::custom(|info| {
            tracing::info!(
                "{} {} -> {} ({} ms)",
                info.method(),
                info.path(),
                info.status().as_u16(),
                round_dp(info.elapsed().as_secs_f64() * 1000.0, 2)
            );
        }))
}

/// All component routes, without the recovery and logging layers.
pub fn routes(state: Arc<AppState>) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    health()
        .or(ready(state.clone()))
        .or(judge::routes(state.clone()))
        .or(specs::routes())
        .or(scenarios::routes(state.clone()))
        .or(attractor::routes(state.clone()))
        .or(dtu::routes(state))
}

fn health() -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("health")
        .and(warp::get())
        .map(|| warp::reply::json(&json!({"status": "ok", "version": crate::VERSION})))
}

fn ready(state: Arc<AppState>) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("ready").and(warp::get()).map(move || {
        let uptime = round_dp(state.started.elapsed().as_secs_f64(), 2);
        warp::reply::json(&json!({"status": "ready", "uptime_seconds": uptime}))
    })
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}
