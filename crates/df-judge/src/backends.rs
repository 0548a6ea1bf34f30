//! Backend implementations.

use crate::config::JudgeConfig;
use crate::error::JudgeError;
use crate::models::{EvaluateRequest, EvaluateResponse};
use async_trait::async_trait;
use aws_sdk_sagemakerruntime::primitives::Blob;
use aws_sdk_sagemakerruntime::Client;
use df_core::SatisfactionScore;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// A trajectory scoring backend.
#[async_trait]
pub trait JudgeBackend: Send + Sync {
    /// Backend label used in logs.
    fn name(&self) -> &'static str;

    /// Score a trajectory against its satisfaction criterion.
    async fn evaluate(&self, request: &EvaluateRequest) -> Result<EvaluateResponse, JudgeError>;
}

/// Returns a fixed 0.5 score for dev and integration testing.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubBackend;

#[async_trait]
impl JudgeBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn evaluate(&self, _request: &EvaluateRequest) -> Result<EvaluateResponse, JudgeError> {
        Ok(EvaluateResponse {
            score: SatisfactionScore::HALF,
            reasoning: Some("stub backend — fixed score for testing".to_string()),
            model_version: Some("stub-v0".to_string()),
        })
    }
}

/// Invokes the D3N Judge-01 model via SageMaker real-time inference.
#[derive(Debug)]
pub struct SageMakerBackend {
    endpoint_name: String,
    region: String,
    client: OnceCell<Client>,
}

impl SageMakerBackend {
    /// New backend for the given endpoint. The runtime client is built
    /// lazily on first evaluate and reused afterwards.
    #[must_use]
    pub fn new(endpoint_name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            endpoint_name: endpoint_name.into(),
            region: region.into(),
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> &Client {
        self.client
            .get_or_init(|| async {
                tracing::debug!(
                    "Initializing sagemaker-runtime client for region {}",
                    self.region
                );
                let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                    .region(aws_config::Region::new(self.region.clone()))
                    .load()
                    .await;
                Client::new(&config)
            })
            .await
    }
}

/// Decode a model response body.
///
/// The trained model is expected to return `{"score": <number>, "reasoning":
/// <string>}`; an absent or non-numeric score decodes as 0.0 rather than
/// failing the evaluation.
fn parse_model_output(bytes: &[u8], endpoint_name: &str) -> Result<EvaluateResponse, JudgeError> {
    let parsed: serde_json::Value = serde_json::from_slice(bytes)?;
    let raw_score = parsed
        .get("score")
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(0.0);
    let score =
        SatisfactionScore::new(raw_score).ok_or(JudgeError::ScoreOutOfRange(raw_score))?;
    Ok(EvaluateResponse {
        score,
        reasoning: parsed
            .get("reasoning")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
        model_version: Some(format!("d3n:judge-01-scenario-eval:{endpoint_name}")),
    })
}

#[async_trait]
impl JudgeBackend for SageMakerBackend {
    fn name(&self) -> &'static str {
        "sagemaker"
    }

    async fn evaluate(&self, request: &EvaluateRequest) -> Result<EvaluateResponse, JudgeError> {
        let payload = serde_json::to_vec(&serde_json::json!({
            "prompt": request.prompt,
            "trajectory_log": request.trajectory_log,
            "satisfaction_criterion": request.satisfaction_criterion,
        }))?;

        let output = self
            .client()
            .await
            .invoke_endpoint()
            .endpoint_name(&self.endpoint_name)
            .content_type("application/json")
            .body(Blob::new(payload))
            .send()
            .await
            .map_err(|e| JudgeError::Invocation(e.to_string()))?;

        let body = output.body().cloned().unwrap_or_else(|| Blob::new(Vec::new()));
        parse_model_output(body.as_ref(), &self.endpoint_name)
    }
}

/// Build the backend selected by the configuration.
#[must_use]
pub fn backend_from_config(config: &JudgeConfig) -> Arc<dyn JudgeBackend> {
    match config {
        JudgeConfig::Stub => Arc::new(StubBackend),
        JudgeConfig::SageMaker {
            endpoint_name,
            region,
        } => Arc::new(SageMakerBackend::new(endpoint_name.clone(), region.clone())),
    }
}
