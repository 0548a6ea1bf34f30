//! Testing utilities for the Dark Factory workspace
//!
//! Shared fixtures and request builders.

#![allow(missing_docs)]

use df_attractor::{BudgetAllocation, ConvergeRequest, ExecutionMode};
use df_core::SatisfactionScore;
use df_dtu::EnvironmentSpec;
use df_judge::EvaluateRequest;
use df_scenario::ExecuteRequest;
use df_spec_engine::{
    AcceptanceCriterion, Spec, SpecDependencies, SpecDomain, SpecInput, SpecOutput, SpecState,
};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

pub fn criterion(text: &str, weight: f64) -> AcceptanceCriterion {
    AcceptanceCriterion {
        criterion: text.to_string(),
        priority: "P1".to_string(),
        satisfaction_weight: SatisfactionScore::new(weight).unwrap(),
    }
}

/// A published spec that passes validation and compiles cleanly.
pub fn sample_spec() -> Spec {
    Spec {
        id: "spec-20260301-persona-auth".to_string(),
        version: "1.0.0".to_string(),
        name: "Persona authentication".to_string(),
        description: "Authenticate a user and mint a session token".to_string(),
        state: SpecState::Published,
        domain: SpecDomain {
            service: "persona".to_string(),
            language: "rust".to_string(),
            framework: None,
        },
        inputs: vec![SpecInput {
            name: "credentials".to_string(),
            type_name: "object".to_string(),
            format: Some("json".to_string()),
            description: None,
        }],
        outputs: vec![SpecOutput {
            name: "session_token".to_string(),
            type_name: "string".to_string(),
            format: Some("jwt".to_string()),
            constraints: vec!["expires within 24h".to_string()],
        }],
        invariants: vec!["Tokens are never logged".to_string()],
        constraints: Vec::new(),
        acceptance_criteria: vec![
            criterion("Valid credentials yield a session token", 0.6),
            criterion("Invalid credentials are rejected", 0.4),
        ],
        dependencies: SpecDependencies {
            services: vec!["sdsm".to_string()],
            d3n_capabilities: vec!["judge-01:scenario-eval".to_string()],
        },
    }
}

pub fn draft_spec() -> Spec {
    let mut spec = sample_spec();
    spec.state = SpecState::Draft;
    spec
}

pub fn sample_spec_value() -> Map<String, Value> {
    let Value::Object(map) = serde_json::to_value(sample_spec()).unwrap() else {
        unreachable!("specs serialize to objects")
    };
    map
}

pub fn evaluate_request() -> EvaluateRequest {
    let Value::Object(trajectory_log) = json!({
        "trajectory_id": "traj-test",
        "scenario_id": "scn-test",
        "steps": [],
        "structural_assertions": {"passed": 2, "failed": 0, "total": 2},
    }) else {
        unreachable!("json! object literal")
    };
    EvaluateRequest {
        prompt: "Evaluate trajectory against: valid credentials yield a token".to_string(),
        trajectory_log,
        satisfaction_criterion: "Valid credentials yield a session token".to_string(),
    }
}

pub fn step(action: &str, expect: &str) -> HashMap<String, String> {
    HashMap::from([
        ("actor".to_string(), "client".to_string()),
        ("action".to_string(), action.to_string()),
        ("expect".to_string(), expect.to_string()),
    ])
}

/// An execute request that runs in stub mode (no DTU namespace needed).
pub fn stub_execute_request(scenario_id: &str) -> ExecuteRequest {
    ExecuteRequest {
        scenario_id: scenario_id.to_string(),
        spec_ref: "spec-20260301-persona-auth:1.0.0".to_string(),
        criterion_ref: "Valid credentials yield a session token".to_string(),
        preconditions: vec!["Service persona is running".to_string()],
        steps: vec![
            step("Provide credentials (object)", "credentials accepted by persona"),
            step("Produce session_token (string)", "expires within 24h"),
        ],
        satisfaction_criteria: "Valid credentials yield a session token".to_string(),
        dtu_namespace: None,
        timeout_seconds: 300,
    }
}

/// A converge request tuned to finish on the first iteration offline, where
/// the evaluate phase scores a flat 0.5.
pub fn converge_request(spec_id: &str) -> ConvergeRequest {
    ConvergeRequest {
        spec_id: spec_id.to_string(),
        spec_version: "1.0.0".to_string(),
        spec: sample_spec_value(),
        satisfaction_threshold: 0.4,
        max_iterations: 3,
        budget: BudgetAllocation::default(),
        mode: ExecutionMode::Autonomous,
        stall_limit: 3,
    }
}

pub fn environment_spec(twins: &[&str]) -> EnvironmentSpec {
    EnvironmentSpec {
        twins: twins.iter().map(|&twin| twin.to_string()).collect(),
        scenario_id: None,
        ttl_seconds: 600,
    }
}
