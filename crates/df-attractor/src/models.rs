//! Wire models for the Attractor convergence agent.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a convergence session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceState {
    Initializing,
    Generating,
    Verifying,
    Evaluating,
    Regenerating,
    /// Satisfaction reached the threshold.
    Converged,
    /// Iterations ran out without reaching the threshold.
    Stalled,
    /// Spend reached the total budget before convergence.
    BudgetExhausted,
    /// Supervised run halted with spec amendment proposals.
    AmendmentProposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Autonomous,
    Supervised,
    Debug,
    Benchmark,
}

/// Budget split across convergence phases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetAllocation {
    #[serde(default = "default_generation_pct")]
    pub generation_pct: f64,
    #[serde(default = "default_scenarios_pct")]
    pub scenarios_pct: f64,
    #[serde(default = "default_judge_pct")]
    pub judge_pct: f64,
    #[serde(default = "default_overhead_pct")]
    pub overhead_pct: f64,
    #[serde(default = "default_total_budget_usd")]
    pub total_budget_usd: f64,
}

impl BudgetAllocation {
    #[must_use]
    pub fn generation_budget(&self) -> f64 {
        self.total_budget_usd * self.generation_pct
    }

    #[must_use]
    pub fn scenarios_budget(&self) -> f64 {
        self.total_budget_usd * self.scenarios_pct
    }

    #[must_use]
    pub fn judge_budget(&self) -> f64 {
        self.total_budget_usd * self.judge_pct
    }
}

impl Default for BudgetAllocation {
    fn default() -> Self {
        Self {
            generation_pct: default_generation_pct(),
            scenarios_pct: default_scenarios_pct(),
            judge_pct: default_judge_pct(),
            overhead_pct: default_overhead_pct(),
            total_budget_usd: default_total_budget_usd(),
        }
    }
}

/// One completed pass of the generate-verify-evaluate cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationResult {
    pub iteration: u32,
    pub satisfaction_score: f64,
    #[serde(default)]
    pub delta: f64,
    #[serde(default)]
    pub criteria_scores: HashMap<String, f64>,
    #[serde(default)]
    pub budget_spent_usd: f64,
    #[serde(default)]
    pub stall_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergeRequest {
    pub spec_id: String,
    pub spec_version: String,
    pub spec: serde_json::Map<String, serde_json::Value>,
    #[serde(default = "default_satisfaction_threshold")]
    pub satisfaction_threshold: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default)]
    pub budget: BudgetAllocation,
    #[serde(default)]
    pub mode: ExecutionMode,
    #[serde(default = "default_stall_limit")]
    pub stall_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergeResponse {
    pub spec_id: String,
    pub state: ConvergenceState,
    pub iterations_completed: usize,
    pub final_satisfaction: f64,
    #[serde(default)]
    pub iteration_history: Vec<IterationResult>,
    #[serde(default)]
    pub budget_spent_usd: f64,
    #[serde(default)]
    pub code_artifact_ref: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub amendments: Vec<AmendmentProposal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergenceStatus {
    pub spec_id: String,
    pub state: ConvergenceState,
    pub current_iteration: usize,
    pub current_satisfaction: f64,
    pub budget_remaining_usd: f64,
}

/// Why a stuck criterion is believed to be the spec's fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmendmentDiagnosis {
    /// Partial credit suggests the criterion is interpretable but unclear.
    Ambiguous,
    /// Near-zero scores suggest the criterion cannot be met as written.
    Unsatisfiable,
}

/// A stuck criterion flagged for human review of the spec itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmendmentProposal {
    pub criterion_ref: String,
    pub current_score: f64,
    pub iterations_stuck: usize,
    pub diagnosis: AmendmentDiagnosis,
    pub suggestion: String,
}

/// Discovered context about the service a spec targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodebaseContext {
    pub service_name: String,
}

fn default_generation_pct() -> f64 {
    0.50
}

fn default_scenarios_pct() -> f64 {
    0.30
}

fn default_judge_pct() -> f64 {
    0.15
}

fn default_overhead_pct() -> f64 {
    0.05
}

fn default_total_budget_usd() -> f64 {
    100.0
}

fn default_satisfaction_threshold() -> f64 {
    0.90
}

fn default_max_iterations() -> u32 {
    20
}

fn default_stall_limit() -> usize {
    3
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn converge_request_defaults() {
        let request: ConvergeRequest = serde_json::from_value(serde_json::json!({
            "spec_id": "spec-x",
            "spec_version": "1.0.0",
            "spec": {},
        }))
        .unwrap();
        assert_eq!(request.satisfaction_threshold, 0.90);
        assert_eq!(request.max_iterations, 20);
        assert_eq!(request.mode, ExecutionMode::Autonomous);
        assert_eq!(request.stall_limit, 3);
        assert_eq!(request.budget.total_budget_usd, 100.0);
    }

    #[test]
    fn budget_accessors_scale_with_total() {
        let budget = BudgetAllocation::default();
        assert_eq!(budget.generation_budget(), 50.0);
        assert_eq!(budget.scenarios_budget(), 30.0);
        assert_eq!(budget.judge_budget(), 15.0);
    }

    #[test]
    fn state_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(ConvergenceState::BudgetExhausted).unwrap(),
            serde_json::json!("budget_exhausted")
        );
        assert_eq!(
            serde_json::to_value(ConvergenceState::AmendmentProposed).unwrap(),
            serde_json::json!("amendment_proposed")
        );
    }

    #[test]
    fn diagnosis_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(AmendmentDiagnosis::Unsatisfiable).unwrap(),
            serde_json::json!("unsatisfiable")
        );
    }
}
