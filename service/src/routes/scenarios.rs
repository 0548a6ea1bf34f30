//! Scenario Executor endpoints.

use super::with_state;
use crate::state::AppState;
use df_core::round_dp;
use df_scenario::{BatchExecuteRequest, BatchExecuteResponse, ExecuteRequest};
use std::sync::Arc;
use std::time::Instant;
use warp::{Filter, Rejection, Reply};

pub(crate) fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let execute_route = warp::path!("scenarios" / "execute")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(warp::body::json())
        .and_then(execute_scenario);
    let batch_route = warp::path!("scenarios" / "execute-batch")
        .and(warp::post())
        .and(with_state(state))
        .and(warp::body::json())
        .and_then(execute_batch);
    execute_route.or(batch_route)
}

/// `POST /scenarios/execute`: run one scenario against a DTU environment.
async fn execute_scenario(
    state: Arc<AppState>,
    request: ExecuteRequest,
) -> Result<impl Reply, Rejection> {
    let response = state.executor.execute(&request).await;
    Ok(warp::reply::json(&response))
}

/// `POST /scenarios/execute-batch`: run scenarios with bounded concurrency.
/// `parallel = false` forces the scenarios to run one at a time.
async fn execute_batch(
    state: Arc<AppState>,
    request: BatchExecuteRequest,
) -> Result<impl Reply, Rejection> {
    let start = Instant::now();
    let concurrency = if request.parallel {
        request.max_concurrency
    } else {
        1
    };
    let results = state
        .executor
        .execute_batch(&request.scenarios, concurrency)
        .await;

    let scores: Vec<f64> = results
        .iter()
        .filter_map(|result| result.satisfaction_score)
        .collect();
    let aggregate = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    };
    let elapsed = round_dp(start.elapsed().as_secs_f64() * 1000.0, 2);

    tracing::info!(
        "Scenario batch done: total={} aggregate={:?} elapsed_ms={}",
        results.len(),
        aggregate,
        elapsed
    );

    Ok(warp::reply::json(&BatchExecuteResponse {
        results,
        aggregate_satisfaction: aggregate,
        total_elapsed_ms: elapsed,
    }))
}
