//! Wire models for the Spec Engine.

use df_core::SatisfactionScore;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecState {
    /// Being authored; may change freely.
    #[default]
    Draft,
    /// Under review before publication.
    Review,
    /// Frozen and compilable.
    Published,
    /// Being converged against by the Attractor.
    Active,
    /// Converged; satisfaction threshold reached.
    Satisfied,
    /// Retired; no longer compiled or converged.
    Deprecated,
}

impl std::fmt::Display for SpecState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SpecState::Draft => "draft",
            SpecState::Review => "review",
            SpecState::Published => "published",
            SpecState::Active => "active",
            SpecState::Satisfied => "satisfied",
            SpecState::Deprecated => "deprecated",
        };
        f.write_str(name)
    }
}

/// A weighted acceptance criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceCriterion {
    /// Natural-language criterion text.
    pub criterion: String,
    /// Priority label, `P1` by default.
    #[serde(default = "default_priority")]
    pub priority: String,
    /// Weight toward overall satisfaction; weights of a spec sum to 1.0.
    pub satisfaction_weight: SatisfactionScore,
}

fn default_priority() -> String {
    "P1".to_string()
}

/// Target service and implementation language of a spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecDomain {
    /// Service the spec targets (must exist in the DTU twin catalog).
    pub service: String,
    /// Implementation language of the target service.
    pub language: String,
    /// Optional framework hint.
    #[serde(default)]
    pub framework: Option<String>,
}

/// A named input the behavior consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecInput {
    /// Input name.
    pub name: String,
    /// Input type.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Optional format hint.
    #[serde(default)]
    pub format: Option<String>,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A named output the behavior produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecOutput {
    /// Output name.
    pub name: String,
    /// Output type.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Optional format hint.
    #[serde(default)]
    pub format: Option<String>,
    /// Constraints the output must satisfy.
    #[serde(default)]
    pub constraints: Vec<String>,
}

/// Upstream services and D3N capabilities the spec depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecDependencies {
    /// Services that must be available.
    #[serde(default)]
    pub services: Vec<String>,
    /// D3N model capabilities in `model:capability` form.
    #[serde(default)]
    pub d3n_capabilities: Vec<String>,
}

/// A complete behavior spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spec {
    /// Globally unique id, `spec-{date}-{slug}` format.
    pub id: String,
    /// Semantic version.
    pub version: String,
    /// Human-readable name.
    pub name: String,
    /// What the behavior does.
    pub description: String,
    /// Lifecycle state; new specs start as drafts.
    #[serde(default)]
    pub state: SpecState,
    /// Target domain.
    pub domain: SpecDomain,
    /// Inputs the behavior consumes.
    #[serde(default)]
    pub inputs: Vec<SpecInput>,
    /// Outputs the behavior produces.
    #[serde(default)]
    pub outputs: Vec<SpecOutput>,
    /// Safety properties that must always hold.
    #[serde(default)]
    pub invariants: Vec<String>,
    /// Non-functional constraints.
    #[serde(default)]
    pub constraints: Vec<String>,
    /// Weighted acceptance criteria.
    #[serde(default)]
    pub acceptance_criteria: Vec<AcceptanceCriterion>,
    /// External dependencies.
    #[serde(default)]
    pub dependencies: SpecDependencies,
}

/// One step of a compiled scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioStep {
    /// Who performs the step: `client`, `system`, `adversary`, or `observer`.
    pub actor: String,
    /// What the actor does.
    pub action: String,
    /// Expected outcome.
    pub expect: String,
}

/// Compiled scenario skeleton from a spec's acceptance criteria.
///
/// Skeletons carry structure, not data; the Scenario Executor fills in
/// concrete requests when it runs them against a DTU environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSkeleton {
    /// Scenario id, `scn-` or `scn-inv-` prefixed.
    pub id: String,
    /// Originating spec as `id:version`.
    pub spec_ref: String,
    /// The criterion (or `[INVARIANT]`-tagged invariant) this scenario checks.
    pub criterion_ref: String,
    /// Conditions that must hold before execution.
    #[serde(default)]
    pub preconditions: Vec<String>,
    /// Ordered steps.
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
    /// Criterion text the Judge scores the trajectory against.
    #[serde(default)]
    pub satisfaction_criteria: String,
}

/// Request body for `POST /specs/compile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileRequest {
    /// Spec to compile.
    pub spec: Spec,
}

/// Result of compiling a spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileResponse {
    /// Compiled spec id.
    pub spec_id: String,
    /// Compiled spec version.
    pub version: String,
    /// Generated scenario skeletons; empty when compilation failed.
    pub scenarios: Vec<ScenarioSkeleton>,
    /// Compilation errors; empty on success.
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Request body for `POST /specs/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    /// Spec to validate.
    pub spec: Spec,
}

/// Result of validating a spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateResponse {
    /// True when no errors were found (warnings do not affect validity).
    pub valid: bool,
    /// Blocking problems.
    #[serde(default)]
    pub errors: Vec<String>,
    /// Non-blocking advisories.
    #[serde(default)]
    pub warnings: Vec<String>,
}
