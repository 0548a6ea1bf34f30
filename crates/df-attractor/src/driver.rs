//! Phase drivers for the convergence loop.

use crate::models::CodebaseContext;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::time::Duration;

const EVAL_TIMEOUT: Duration = Duration::from_secs(120);

/// Seam for the generate-verify-evaluate phases of the convergence loop.
///
/// The defaults carry fixed phase cost estimates; production drivers
/// override them as the SWE Fleet and Flash App integrations come online.
/// [`HttpDriver`] overrides evaluation to run compiled scenarios through the
/// Scenario Executor.
#[async_trait]
pub trait ConvergenceDriver: Send + Sync {
    /// Discover codebase context for the target service before generation.
    async fn build_context(&self, spec: &Map<String, Value>) -> CodebaseContext {
        let service_name = spec
            .get("domain")
            .and_then(Value::as_object)
            .and_then(|domain| domain.get("service"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        tracing::info!("Building codebase context for {}", service_name);
        CodebaseContext {
            service_name: service_name.to_string(),
        }
    }

    /// Generate or update code for one iteration. Returns estimated cost.
    async fn generate(
        &self,
        _spec: &Map<String, Value>,
        iteration: u32,
        context: Option<&CodebaseContext>,
    ) -> f64 {
        tracing::debug!(
            "Generating iteration {} (context: {:?})",
            iteration,
            context.map(|c| c.service_name.as_str())
        );
        0.50
    }

    /// Run structural verification. Returns estimated cost.
    async fn verify(&self, spec_id: &str) -> f64 {
        tracing::debug!("Verifying {}", spec_id);
        0.10
    }

    /// Execute scenarios and judge the trajectories. Returns
    /// `(satisfaction, per-criterion scores, cost)`.
    async fn evaluate(
        &self,
        spec_id: &str,
        spec: &Map<String, Value>,
    ) -> (f64, HashMap<String, f64>, f64);

    /// Targeted regeneration focusing the lowest-scoring criteria. Returns
    /// estimated cost.
    async fn strategic_regenerate(
        &self,
        _spec: &Map<String, Value>,
        weak_criteria: &HashMap<String, f64>,
    ) -> f64 {
        let mut ranked: Vec<_> = weak_criteria.iter().collect();
        ranked.sort_by(|a, b| a.1.total_cmp(b.1));
        let focus: Vec<&str> = ranked.iter().take(3).map(|(name, _)| name.as_str()).collect();
        tracing::info!("Strategic regeneration focusing {:?}", focus);
        1.0
    }
}

/// Driver that evaluates satisfaction by posting one scenario per acceptance
/// criterion to the Scenario Executor's batch endpoint.
///
/// Without a scenario executor url every evaluation scores 0.5, which keeps
/// dev runs moving without external services.
#[derive(Debug, Clone, Default)]
pub struct HttpDriver {
    scenario_url: String,
    http: reqwest::Client,
}

impl HttpDriver {
    #[must_use]
    pub fn new(scenario_url: impl Into<String>) -> Self {
        Self {
            scenario_url: scenario_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Configure from `SCENARIO_EXECUTOR_URL` (default empty).
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(std::env::var("SCENARIO_EXECUTOR_URL").unwrap_or_default())
    }

    async fn batch_aggregate(&self, spec_id: &str, criteria: &[Value]) -> Option<f64> {
        let scenarios: Vec<Value> = criteria
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let criterion = c.get("criterion").and_then(Value::as_str).unwrap_or("");
                json!({
                    "scenario_id": format!("eval-{spec_id}-{i}"),
                    "spec_ref": spec_id,
                    "criterion_ref": criterion,
                    "steps": [],
                    "satisfaction_criteria": criterion,
                })
            })
            .collect();

        let outcome = self
            .http
            .post(format!("{}/scenarios/execute-batch", self.scenario_url))
            .timeout(EVAL_TIMEOUT)
            .json(&json!({ "scenarios": scenarios, "parallel": true }))
            .send()
            .await;

        let resp = match outcome {
            Ok(resp) if resp.status() == reqwest::StatusCode::OK => resp,
            Ok(resp) => {
                tracing::warn!("Scenario executor returned status {}", resp.status());
                return None;
            }
            Err(e) => {
                tracing::warn!("Scenario evaluation failed: {}", e);
                return None;
            }
        };

        match resp.json::<Value>().await {
            Ok(data) => data.get("aggregate_satisfaction").and_then(Value::as_f64),
            Err(e) => {
                tracing::warn!("Scenario evaluation failed: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl ConvergenceDriver for HttpDriver {
    async fn evaluate(
        &self,
        spec_id: &str,
        spec: &Map<String, Value>,
    ) -> (f64, HashMap<String, f64>, f64) {
        if self.scenario_url.is_empty() {
            return (0.5, HashMap::from([("default".to_string(), 0.5)]), 0.20);
        }

        let criteria = match spec.get("acceptance_criteria").and_then(Value::as_array) {
            Some(list) if !list.is_empty() => list,
            _ => return (0.5, HashMap::new(), 0.20),
        };

        match self.batch_aggregate(spec_id, criteria).await {
            Some(aggregate) => (aggregate, HashMap::new(), 0.20),
            None => (0.5, HashMap::new(), 0.20),
        }
    }
}
