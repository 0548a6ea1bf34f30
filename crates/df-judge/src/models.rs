//! Wire models for the `/evaluate` endpoint.

use df_core::SatisfactionScore;
use serde::{Deserialize, Serialize};

/// Request body forwarded by SDSM's `POST /api/dark-factory/evaluate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateRequest {
    /// Pre-built evaluation prompt from SDSM.
    pub prompt: String,
    /// Full trajectory log of the scenario execution. Must be a JSON object.
    pub trajectory_log: serde_json::Map<String, serde_json::Value>,
    /// Natural-language satisfaction criterion to score against.
    pub satisfaction_criterion: String,
}

/// Structured evaluation result returned to SDSM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateResponse {
    /// Satisfaction score in `[0, 1]`.
    pub score: SatisfactionScore,
    /// Optional chain-of-thought reasoning.
    #[serde(default)]
    pub reasoning: Option<String>,
    /// Model or backend version that produced this score.
    #[serde(default)]
    pub model_version: Option<String>,
}
