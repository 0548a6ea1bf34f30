//! Attractor convergence loop.
//!
//! Implements the generate-verify-regenerate cycle that converges code
//! toward spec satisfaction. Each iteration:
//!   1. Generate/regenerate code via the D3N SWE Fleet
//!   2. Verify via structural checks (Flash Apps)
//!   3. Execute scenarios in DTU
//!   4. Evaluate trajectories via Judge-01
//!   5. Decide: converged, continue, or strategic regeneration

use crate::driver::{ConvergenceDriver, HttpDriver};
use crate::models::{
    AmendmentDiagnosis, AmendmentProposal, CodebaseContext, ConvergeRequest, ConvergeResponse,
    ConvergenceState, ExecutionMode, IterationResult,
};
use df_core::round_dp;
use std::sync::Arc;

/// Satisfaction deltas below this count as a stalled iteration.
pub const STALL_DELTA_THRESHOLD: f64 = 0.01;

/// Core convergence engine for Dark Factory spec satisfaction.
#[derive(Clone)]
pub struct AttractorEngine {
    driver: Arc<dyn ConvergenceDriver>,
}

impl Default for AttractorEngine {
    fn default() -> Self {
        Self::new(Arc::new(HttpDriver::default()))
    }
}

impl AttractorEngine {
    #[must_use]
    pub fn new(driver: Arc<dyn ConvergenceDriver>) -> Self {
        Self { driver }
    }

    /// Production engine: HTTP driver configured from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(Arc::new(HttpDriver::from_env()))
    }

    /// Run the convergence loop until satisfaction threshold, budget
    /// exhaustion, or stall.
    pub async fn converge(&self, request: &ConvergeRequest) -> ConvergeResponse {
        tracing::info!(
            "Converging {} (threshold {}, max {} iterations, budget ${}, mode {:?})",
            request.spec_id,
            request.satisfaction_threshold,
            request.max_iterations,
            request.budget.total_budget_usd,
            request.mode
        );

        let mut history: Vec<IterationResult> = Vec::new();
        let mut total_spent = 0.0_f64;
        let mut stall_count: u32 = 0;
        let mut current_satisfaction = 0.0_f64;
        let mut code_artifact_ref: Option<String> = None;
        let mut context: Option<CodebaseContext> = None;
        let mut terminal: Option<ConvergenceState> = None;

        for iteration in 1..=request.max_iterations {
            if total_spent >= request.budget.total_budget_usd {
                tracing::warn!("Budget exhausted at ${:.2}", total_spent);
                terminal = Some(ConvergenceState::BudgetExhausted);
                break;
            }

            if context.is_none() {
                context = Some(self.driver.build_context(&request.spec).await);
            }

            let gen_cost = self
                .driver
                .generate(&request.spec, iteration, context.as_ref())
                .await;
            total_spent += gen_cost;

            let verify_cost = self.driver.verify(&request.spec_id).await;
            total_spent += verify_cost;

            let (satisfaction, criteria_scores, eval_cost) =
                self.driver.evaluate(&request.spec_id, &request.spec).await;
            total_spent += eval_cost;

            let delta = satisfaction - current_satisfaction;
            current_satisfaction = satisfaction;

            if delta < STALL_DELTA_THRESHOLD {
                stall_count += 1;
            } else {
                stall_count = 0;
            }

            history.push(IterationResult {
                iteration,
                satisfaction_score: satisfaction,
                delta: round_dp(delta, 4),
                criteria_scores: criteria_scores.clone(),
                budget_spent_usd: round_dp(gen_cost + verify_cost + eval_cost, 4),
                stall_count,
            });

            tracing::info!(
                "Iteration {}: satisfaction {:.4}, delta {:.4}, stalls {}, spent ${:.2}",
                iteration,
                satisfaction,
                delta,
                stall_count,
                total_spent
            );

            if satisfaction >= request.satisfaction_threshold {
                tracing::info!("Converged after {} iterations at {:.4}", iteration, satisfaction);
                code_artifact_ref =
                    Some(format!("artifact://{}/iter-{}", request.spec_id, iteration));
                terminal = Some(ConvergenceState::Converged);
                break;
            }

            if (stall_count as usize) >= request.stall_limit {
                tracing::warn!(
                    "Stalled at iteration {} ({:.4} satisfaction, {} flat iterations)",
                    iteration,
                    satisfaction,
                    stall_count
                );

                let amendments = detect_amendment_candidates(&history, request.stall_limit);

                if !amendments.is_empty() && request.mode == ExecutionMode::Supervised {
                    let refs: Vec<&str> =
                        amendments.iter().map(|a| a.criterion_ref.as_str()).collect();
                    tracing::info!("Proposing {} spec amendments: {:?}", amendments.len(), refs);
                    return ConvergeResponse {
                        spec_id: request.spec_id.clone(),
                        state: ConvergenceState::AmendmentProposed,
                        iterations_completed: history.len(),
                        final_satisfaction: current_satisfaction,
                        iteration_history: history,
                        budget_spent_usd: round_dp(total_spent, 4),
                        code_artifact_ref: None,
                        error: None,
                        amendments,
                    };
                }

                if !amendments.is_empty() {
                    let refs: Vec<&str> =
                        amendments.iter().map(|a| a.criterion_ref.as_str()).collect();
                    tracing::info!(
                        "Logging {} amendment candidates in {:?} mode: {:?}",
                        amendments.len(),
                        request.mode,
                        refs
                    );
                }

                // re-discover context on the next iteration
                context = None;
                let regen_cost = self
                    .driver
                    .strategic_regenerate(&request.spec, &criteria_scores)
                    .await;
                total_spent += regen_cost;
                stall_count = 0;
            }
        }

        ConvergeResponse {
            spec_id: request.spec_id.clone(),
            state: terminal.unwrap_or(ConvergenceState::Stalled),
            iterations_completed: history.len(),
            final_satisfaction: current_satisfaction,
            iteration_history: history,
            budget_spent_usd: round_dp(total_spent, 4),
            code_artifact_ref,
            error: None,
            amendments: Vec::new(),
        }
    }
}

/// Identify criteria that are consistently failing and may need spec
/// amendment.
///
/// A criterion is flagged when its score stayed below 0.3 across the last
/// `window` iterations while at least one other criterion exceeded 0.7.
/// That pattern points at the criterion, not the generation.
fn detect_amendment_candidates(
    history: &[IterationResult],
    window: usize,
) -> Vec<AmendmentProposal> {
    if history.len() < window {
        return Vec::new();
    }

    let recent = &history[history.len() - window..];
    let mut all_criteria: Vec<&str> = recent
        .iter()
        .flat_map(|r| r.criteria_scores.keys())
        .map(String::as_str)
        .collect();
    all_criteria.sort_unstable();
    all_criteria.dedup();

    let scores_for = |criterion: &str| -> Vec<f64> {
        recent
            .iter()
            .filter_map(|r| r.criteria_scores.get(criterion).copied())
            .collect()
    };

    let has_healthy = all_criteria.iter().any(|criterion| {
        scores_for(criterion)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
            > 0.7
    });
    if !has_healthy {
        return Vec::new();
    }

    let mut amendments = Vec::new();
    for criterion in all_criteria {
        let valid = scores_for(criterion);
        if valid.is_empty() {
            continue;
        }
        let avg = valid.iter().sum::<f64>() / valid.len() as f64;
        if avg < 0.3 {
            let diagnosis = if avg > 0.15 {
                AmendmentDiagnosis::Ambiguous
            } else {
                AmendmentDiagnosis::Unsatisfiable
            };
            amendments.push(AmendmentProposal {
                criterion_ref: criterion.to_string(),
                current_score: round_dp(avg, 4),
                iterations_stuck: window,
                diagnosis,
                suggestion: format!(
                    "Criterion '{criterion}' scored {avg:.2} avg over {window} iterations \
                     while other criteria passed. Consider clarifying or splitting."
                ),
            });
        }
    }

    amendments
}
