//! Scenario Executor - runs compiled scenarios against DTU twin environments.
//!
//! Each run produces a trajectory log of step results. Steps are posted to
//! the DTU Controller when a base url is configured (stub responses
//! otherwise), and completed trajectories are forwarded to Judge-01 Scenario
//! Eval for satisfaction scoring when a judge url is configured.

pub mod executor;
pub mod models;

pub use executor::ScenarioExecutor;
pub use models::{
    BatchExecuteRequest, BatchExecuteResponse, ExecuteRequest, ExecuteResponse, ScenarioStatus,
    StepResult, TrajectoryLog,
};
