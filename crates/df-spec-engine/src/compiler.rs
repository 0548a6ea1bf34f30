//! Spec-to-scenario compiler.
//!
//! Transforms published specs into scenario skeletons that the Scenario
//! Executor populates with concrete test data. Each acceptance criterion
//! becomes a positive scenario; each invariant becomes a negative scenario
//! with an adversary step.

use crate::models::{
    AcceptanceCriterion, CompileResponse, ScenarioSkeleton, ScenarioStep, Spec,
};
use df_core::short_hex;

fn uid() -> String {
    short_hex(12)
}

fn clip(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Compile a single acceptance criterion into a scenario skeleton.
///
/// Steps come from the spec's inputs (client provides) and outputs (system
/// produces). A spec with neither gets one generic exercise step.
#[must_use]
pub fn compile_criterion(spec: &Spec, criterion: &AcceptanceCriterion) -> ScenarioSkeleton {
    let mut steps = Vec::new();
    for input in &spec.inputs {
        steps.push(ScenarioStep {
            actor: "client".to_string(),
            action: format!("Provide {} ({})", input.name, input.type_name),
            expect: format!("{} accepted by {}", input.name, spec.domain.service),
        });
    }

    for output in &spec.outputs {
        let constraint_text = if output.constraints.is_empty() {
            "valid output".to_string()
        } else {
            output.constraints.join("; ")
        };
        steps.push(ScenarioStep {
            actor: "system".to_string(),
            action: format!("Produce {} ({})", output.name, output.type_name),
            expect: constraint_text,
        });
    }

    if steps.is_empty() {
        steps.push(ScenarioStep {
            actor: "client".to_string(),
            action: format!("Exercise behavior: {}", clip(&criterion.criterion, 120)),
            expect: "Criterion satisfied".to_string(),
        });
    }

    ScenarioSkeleton {
        id: format!("scn-{}", uid()),
        spec_ref: format!("{}:{}", spec.id, spec.version),
        criterion_ref: criterion.criterion.clone(),
        preconditions: vec![
            format!("Service {} is running", spec.domain.service),
            format!("DTU twin for {} is available", spec.domain.service),
        ],
        steps,
        satisfaction_criteria: criterion.criterion.clone(),
    }
}

/// Compile an invariant into a negative-test scenario skeleton.
#[must_use]
pub fn compile_invariant(spec: &Spec, invariant: &str) -> ScenarioSkeleton {
    ScenarioSkeleton {
        id: format!("scn-inv-{}", uid()),
        spec_ref: format!("{}:{}", spec.id, spec.version),
        criterion_ref: format!("[INVARIANT] {invariant}"),
        preconditions: vec![format!("Service {} is running", spec.domain.service)],
        steps: vec![
            ScenarioStep {
                actor: "adversary".to_string(),
                action: format!("Attempt to violate: {}", clip(invariant, 200)),
                expect: "System prevents violation".to_string(),
            },
            ScenarioStep {
                actor: "observer".to_string(),
                action: "Verify invariant still holds".to_string(),
                expect: format!("Invariant maintained: {}", clip(invariant, 200)),
            },
        ],
        satisfaction_criteria: format!("System preserves invariant: {invariant}"),
    }
}

/// Compile a full spec into scenario skeletons.
///
/// Only published or active specs compile. Criterion scenarios come first,
/// invariant scenarios after, both in input order.
#[must_use]
pub fn compile_spec(spec: &Spec) -> CompileResponse {
    let mut errors = Vec::new();

    if !spec.state.is_compilable() {
        errors.push(format!(
            "Spec must be Published or Active to compile; current state: {}",
            spec.state
        ));
        return CompileResponse {
            spec_id: spec.id.clone(),
            version: spec.version.clone(),
            scenarios: vec![],
            errors,
        };
    }

    if spec.acceptance_criteria.is_empty() {
        errors.push("Spec has no acceptance criteria".to_string());
    }

    let weights: f64 = spec
        .acceptance_criteria
        .iter()
        .map(|c| c.satisfaction_weight.value())
        .sum();
    if !spec.acceptance_criteria.is_empty() && (weights - 1.0).abs() > 0.01 {
        errors.push(format!(
            "Acceptance criteria weights sum to {weights:.2}, expected 1.0"
        ));
    }

    if !errors.is_empty() {
        return CompileResponse {
            spec_id: spec.id.clone(),
            version: spec.version.clone(),
            scenarios: vec![],
            errors,
        };
    }

    let mut scenarios = Vec::new();
    for criterion in &spec.acceptance_criteria {
        scenarios.push(compile_criterion(spec, criterion));
    }
    for invariant in &spec.invariants {
        scenarios.push(compile_invariant(spec, invariant));
    }

    tracing::info!(
        "Compiled spec {} v{} into {} scenarios",
        spec.id,
        spec.version,
        scenarios.len()
    );

    CompileResponse {
        spec_id: spec.id.clone(),
        version: spec.version.clone(),
        scenarios,
        errors: vec![],
    }
}
