//! Judge backend errors.

/// Error produced while evaluating a trajectory.
///
/// All variants map to a 502 at the HTTP boundary; the detail never leaves
/// the process.
#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    /// The inference endpoint could not be invoked.
    #[error("sagemaker invocation failed: {0}")]
    Invocation(String),
    /// The model returned a body that is not valid JSON.
    #[error("malformed model response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    /// The model returned a score outside the unit interval.
    #[error("model returned score {0} outside [0.0, 1.0]")]
    ScoreOutOfRange(f64),
}
