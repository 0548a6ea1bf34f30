//! Wire models for the Scenario Executor.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle of a scenario run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    /// Accepted but not yet started.
    Pending,
    /// Steps are executing.
    Running,
    /// All step assertions passed.
    Completed,
    /// At least one step assertion failed.
    Failed,
    /// The run exceeded its deadline.
    Timeout,
}

/// Outcome of a single step against the twin environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub step_id: String,
    #[serde(default)]
    pub request: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub response: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub assertions_passed: bool,
    #[serde(default)]
    pub latency_ms: f64,
    #[serde(default)]
    pub error: Option<String>,
}

/// Full record of a scenario run, forwarded to the Judge for scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryLog {
    pub trajectory_id: String,
    pub scenario_id: String,
    #[serde(default)]
    pub steps: Vec<StepResult>,
    #[serde(default)]
    pub structural_assertions: HashMap<String, i64>,
    #[serde(default)]
    pub timing_assertions: serde_json::Map<String, serde_json::Value>,
}

/// Request to execute a scenario skeleton against a DTU environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub scenario_id: String,
    pub spec_ref: String,
    pub criterion_ref: String,
    #[serde(default)]
    pub preconditions: Vec<String>,
    #[serde(default)]
    pub steps: Vec<HashMap<String, String>>,
    #[serde(default)]
    pub satisfaction_criteria: String,
    #[serde(default)]
    pub dtu_namespace: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub scenario_id: String,
    pub status: ScenarioStatus,
    #[serde(default)]
    pub trajectory: Option<TrajectoryLog>,
    #[serde(default)]
    pub satisfaction_score: Option<f64>,
    #[serde(default)]
    pub judge_reasoning: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchExecuteRequest {
    pub scenarios: Vec<ExecuteRequest>,
    #[serde(default = "default_true")]
    pub parallel: bool,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchExecuteResponse {
    pub results: Vec<ExecuteResponse>,
    #[serde(default)]
    pub aggregate_satisfaction: Option<f64>,
    #[serde(default)]
    pub total_elapsed_ms: f64,
}

fn default_timeout_seconds() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

fn default_max_concurrency() -> usize {
    5
}
