//! Shared application state injected into route filters.

use dashmap::DashMap;
use df_attractor::{AttractorEngine, ConvergeResponse};
use df_dtu::DtuOrchestrator;
use df_judge::JudgeBackend;
use df_scenario::ScenarioExecutor;
use std::sync::Arc;
use std::time::Instant;

/// Everything the route handlers need, built once at startup.
pub struct AppState {
    /// Configured Judge backend.
    pub backend: Arc<dyn JudgeBackend>,
    /// Convergence engine.
    pub engine: AttractorEngine,
    /// Finished convergence runs keyed by spec id.
    pub sessions: DashMap<String, ConvergeResponse>,
    /// DTU environment orchestrator.
    pub orchestrator: DtuOrchestrator,
    /// Scenario executor.
    pub executor: ScenarioExecutor,
    /// Start instant, reported by `GET /ready` as uptime.
    pub started: Instant,
}

impl AppState {
    /// Build state around a configured Judge backend. The other components
    /// read their own settings from the environment.
    #[must_use]
    pub fn new(backend: Arc<dyn JudgeBackend>) -> Self {
        Self {
            backend,
            engine: AttractorEngine::from_env(),
            sessions: DashMap::new(),
            orchestrator: DtuOrchestrator::from_env(),
            executor: ScenarioExecutor::from_env(),
            started: Instant::now(),
        }
    }
}
