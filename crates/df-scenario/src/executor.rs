//! Scenario execution engine.
//!
//! Runs scenario steps against DTU twin environments and collects trajectory
//! logs. The executor calls into the DTU Controller for step execution and
//! forwards completed trajectories to Judge-01 for satisfaction scoring.

use crate::models::{ExecuteRequest, ExecuteResponse, ScenarioStatus, StepResult, TrajectoryLog};
use df_core::{round_dp, short_hex};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

const STEP_TIMEOUT: Duration = Duration::from_secs(30);
const JUDGE_TIMEOUT: Duration = Duration::from_secs(60);

/// Narrow a `json!` object literal to its map. Non-objects collapse to empty.
fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Executes scenario steps against DTU twin endpoints.
#[derive(Debug, Clone, Default)]
pub struct ScenarioExecutor {
    dtu_base_url: String,
    judge_url: String,
    http: reqwest::Client,
}

impl ScenarioExecutor {
    /// New executor. An empty DTU url selects stub step execution; an empty
    /// judge url skips satisfaction scoring.
    #[must_use]
    pub fn new(dtu_base_url: impl Into<String>, judge_url: impl Into<String>) -> Self {
        Self {
            dtu_base_url: dtu_base_url.into(),
            judge_url: judge_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Configure from `DTU_BASE_URL` and `JUDGE_URL` (both default empty).
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("DTU_BASE_URL").unwrap_or_default(),
            std::env::var("JUDGE_URL").unwrap_or_default(),
        )
    }

    /// Execute a single scenario and return the trajectory with optional
    /// judge score.
    ///
    /// The whole run is bounded by the request's `timeout_seconds`; on expiry
    /// the response carries the `timeout` status and no trajectory.
    pub async fn execute(&self, request: &ExecuteRequest) -> ExecuteResponse {
        let start = Instant::now();
        let deadline = Duration::from_secs(request.timeout_seconds);

        match tokio::time::timeout(deadline, self.run(request)).await {
            Ok(response) => response,
            Err(_) => {
                tracing::warn!(
                    "Scenario {} timed out after {}s",
                    request.scenario_id,
                    request.timeout_seconds
                );
                ExecuteResponse {
                    scenario_id: request.scenario_id.clone(),
                    status: ScenarioStatus::Timeout,
                    trajectory: None,
                    satisfaction_score: None,
                    judge_reasoning: None,
                    error: Some(format!(
                        "scenario timed out after {}s",
                        request.timeout_seconds
                    )),
                    elapsed_ms: round_dp(start.elapsed().as_secs_f64() * 1000.0, 2),
                }
            }
        }
    }

    async fn run(&self, request: &ExecuteRequest) -> ExecuteResponse {
        let start = Instant::now();
        let trajectory_id = format!("traj-{}", short_hex(12));

        tracing::info!(
            "Executing scenario {} against {} ({} steps)",
            request.scenario_id,
            request.spec_ref,
            request.steps.len()
        );

        let mut step_results = Vec::with_capacity(request.steps.len());
        let mut passed: i64 = 0;
        let mut failed: i64 = 0;

        for (i, step) in request.steps.iter().enumerate() {
            let step_id = format!("step-{i}");
            let result = self
                .execute_step(&step_id, step, request.dtu_namespace.as_deref())
                .await;
            if result.assertions_passed {
                passed += 1;
            } else {
                failed += 1;
            }
            step_results.push(result);
        }

        let total = step_results.len() as i64;
        let trajectory = TrajectoryLog {
            trajectory_id,
            scenario_id: request.scenario_id.clone(),
            steps: step_results,
            structural_assertions: HashMap::from([
                ("passed".to_string(), passed),
                ("failed".to_string(), failed),
                ("total".to_string(), total),
            ]),
            timing_assertions: Map::new(),
        };

        let (satisfaction_score, judge_reasoning) = if self.judge_url.is_empty() {
            (None, None)
        } else {
            self.call_judge(&trajectory, &request.satisfaction_criteria)
                .await
        };

        let elapsed = round_dp(start.elapsed().as_secs_f64() * 1000.0, 2);
        let status = if failed == 0 {
            ScenarioStatus::Completed
        } else {
            ScenarioStatus::Failed
        };

        tracing::info!(
            "Scenario {} finished {:?}: {} passed, {} failed, satisfaction {:?}, {}ms",
            request.scenario_id,
            status,
            passed,
            failed,
            satisfaction_score,
            elapsed
        );

        ExecuteResponse {
            scenario_id: request.scenario_id.clone(),
            status,
            trajectory: Some(trajectory),
            satisfaction_score,
            judge_reasoning,
            error: None,
            elapsed_ms: elapsed,
        }
    }

    /// Execute a single scenario step against the DTU environment.
    async fn execute_step(
        &self,
        step_id: &str,
        step: &HashMap<String, String>,
        dtu_namespace: Option<&str>,
    ) -> StepResult {
        let action = step.get("action").cloned().unwrap_or_default();
        let expected = step.get("expect").cloned().unwrap_or_default();

        if self.dtu_base_url.is_empty() {
            return StepResult {
                step_id: step_id.to_string(),
                request: object(json!({ "action": action, "dtu_namespace": dtu_namespace })),
                response: object(json!({
                    "status": 200,
                    "body": { "mode": "stub", "expected": expected },
                })),
                assertions_passed: true,
                latency_ms: 1.0,
                error: None,
            };
        }

        match self.post_step(step_id, &action, dtu_namespace).await {
            Ok((status, body, latency)) => {
                let assertions_passed = body
                    .get("assertions_passed")
                    .and_then(Value::as_bool)
                    .unwrap_or(status == 200);
                StepResult {
                    step_id: step_id.to_string(),
                    request: object(json!({ "action": action, "dtu_namespace": dtu_namespace })),
                    response: object(json!({ "status": status, "body": body })),
                    assertions_passed,
                    latency_ms: latency,
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!("Step {} failed: {}", step_id, e);
                StepResult {
                    step_id: step_id.to_string(),
                    request: object(json!({ "action": action })),
                    response: Map::new(),
                    assertions_passed: false,
                    latency_ms: 0.0,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn post_step(
        &self,
        step_id: &str,
        action: &str,
        namespace: Option<&str>,
    ) -> Result<(u16, Value, f64), reqwest::Error> {
        let start = Instant::now();
        let resp = self
            .http
            .post(format!("{}/execute-step", self.dtu_base_url))
            .timeout(STEP_TIMEOUT)
            .json(&json!({ "step_id": step_id, "action": action, "namespace": namespace }))
            .send()
            .await?;
        let latency = round_dp(start.elapsed().as_secs_f64() * 1000.0, 2);
        let status = resp.status().as_u16();
        let body = resp.json::<Value>().await?;
        Ok((status, body, latency))
    }

    /// Forward a trajectory to Judge-01 for satisfaction scoring. Any
    /// failure degrades to an unscored trajectory rather than failing the
    /// scenario.
    async fn call_judge(
        &self,
        trajectory: &TrajectoryLog,
        criterion: &str,
    ) -> (Option<f64>, Option<String>) {
        let payload = json!({
            "prompt": format!("Evaluate trajectory against: {criterion}"),
            "trajectory_log": trajectory,
            "satisfaction_criterion": criterion,
        });

        let outcome = self
            .http
            .post(format!("{}/evaluate", self.judge_url))
            .timeout(JUDGE_TIMEOUT)
            .json(&payload)
            .send()
            .await;

        match outcome {
            Ok(resp) if resp.status() == reqwest::StatusCode::OK => {
                match resp.json::<Value>().await {
                    Ok(data) => (
                        data.get("score").and_then(Value::as_f64),
                        data.get("reasoning")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    ),
                    Err(e) => {
                        tracing::warn!("Judge response decode failed: {}", e);
                        (None, None)
                    }
                }
            }
            Ok(resp) => {
                tracing::warn!("Judge returned status {}", resp.status());
                (None, None)
            }
            Err(e) => {
                tracing::warn!("Judge call failed: {}", e);
                (None, None)
            }
        }
    }

    /// Execute scenarios with bounded concurrency. Result order matches
    /// request order.
    pub async fn execute_batch(
        &self,
        requests: &[ExecuteRequest],
        max_concurrency: usize,
    ) -> Vec<ExecuteResponse> {
        let semaphore = Semaphore::new(max_concurrency.max(1));
        let runs = requests.iter().map(|request| async {
            // acquire only fails when the semaphore is closed, which we never do
            let _permit = semaphore.acquire().await.ok();
            self.execute(request).await
        });
        futures::future::join_all(runs).await
    }
}
