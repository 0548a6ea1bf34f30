//! Backend selection from the environment.
//!
//! Configuration is resolved once at startup; an invalid mode or a missing
//! endpoint name is a load-time error and the service never starts with it.

/// Invalid judge configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JudgeConfigError {
    /// `JUDGE_BACKEND_MODE=sagemaker` without an endpoint name.
    #[error("SAGEMAKER_ENDPOINT_NAME is required when JUDGE_BACKEND_MODE=sagemaker")]
    MissingEndpoint,
    /// Any mode other than `stub` or `sagemaker`.
    #[error(
        "Unknown JUDGE_BACKEND_MODE: '{0}'. Only 'sagemaker' (D3N model) and 'stub' (testing) \
         are supported. LLMs are never used as backends — only trained D3N models."
    )]
    UnknownMode(String),
}

/// Resolved judge backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JudgeConfig {
    /// Deterministic fixed-score backend.
    Stub,
    /// Trained D3N model behind a SageMaker endpoint.
    SageMaker {
        /// Inference endpoint name.
        endpoint_name: String,
        /// AWS region hosting the endpoint.
        region: String,
    },
}

impl JudgeConfig {
    /// Resolve from the environment: `JUDGE_BACKEND_MODE` (default `stub`),
    /// `SAGEMAKER_ENDPOINT_NAME`, `AWS_DEFAULT_REGION` (default `us-east-1`).
    pub fn from_env() -> Result<Self, JudgeConfigError> {
        let mode = std::env::var("JUDGE_BACKEND_MODE").unwrap_or_else(|_| "stub".to_string());
        Self::from_parts(
            &mode,
            std::env::var("SAGEMAKER_ENDPOINT_NAME").ok(),
            std::env::var("AWS_DEFAULT_REGION").ok(),
        )
    }

    /// Resolve from raw parts. The mode is matched case-insensitively.
    pub fn from_parts(
        mode: &str,
        endpoint_name: Option<String>,
        region: Option<String>,
    ) -> Result<Self, JudgeConfigError> {
        let mode = mode.to_lowercase();
        match mode.as_str() {
            "stub" => Ok(JudgeConfig::Stub),
            "sagemaker" => {
                let endpoint_name = match endpoint_name {
                    Some(name) if !name.is_empty() => name,
                    _ => return Err(JudgeConfigError::MissingEndpoint),
                };
                Ok(JudgeConfig::SageMaker {
                    endpoint_name,
                    region: region.unwrap_or_else(|| "us-east-1".to_string()),
                })
            }
            _ => Err(JudgeConfigError::UnknownMode(mode)),
        }
    }

    /// Short backend label for logs.
    #[must_use]
    pub fn mode_name(&self) -> &'static str {
        match self {
            JudgeConfig::Stub => "stub",
            JudgeConfig::SageMaker { .. } => "sagemaker",
        }
    }
}
