//! Judge-01 Scenario Eval - trajectory scoring.
//!
//! Two backends, selected by `JUDGE_BACKEND_MODE`:
//!   - `stub`: deterministic 0.5 for dev and integration testing
//!   - `sagemaker`: the trained D3N Judge-01 model behind a SageMaker
//!     real-time inference endpoint
//!
//! Only D3N models are used in production. LLMs are never used as backends.

pub mod backends;
pub mod config;
pub mod error;
pub mod models;

pub use backends::{backend_from_config, JudgeBackend, SageMakerBackend, StubBackend};
pub use config::{JudgeConfig, JudgeConfigError};
pub use error::JudgeError;
pub use models::{EvaluateRequest, EvaluateResponse};
