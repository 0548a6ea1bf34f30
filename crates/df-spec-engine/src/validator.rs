//! Spec validation - ensures specs are well-formed before compilation.

use crate::models::{Spec, ValidateResponse};
use once_cell::sync::Lazy;
use regex::Regex;

static SPEC_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^spec-\d{8}-[a-z0-9-]+$").expect("valid pattern"));
static SEMVER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid pattern"));

/// Validate a spec for completeness and correctness.
///
/// Errors block compilation; warnings are advisory only.
#[must_use]
pub fn validate_spec(spec: &Spec) -> ValidateResponse {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !SPEC_ID_PATTERN.is_match(&spec.id) {
        errors.push(format!(
            "Spec ID must match 'spec-{{date}}-{{slug}}' format, got: {}",
            spec.id
        ));
    }

    if !SEMVER_PATTERN.is_match(&spec.version) {
        errors.push(format!("Version must be semver (x.y.z), got: {}", spec.version));
    }

    if spec.description.trim().is_empty() {
        errors.push("Description is required".to_string());
    }

    if spec.acceptance_criteria.is_empty() {
        errors.push("At least one acceptance criterion is required".to_string());
    }

    let weights: f64 = spec
        .acceptance_criteria
        .iter()
        .map(|c| c.satisfaction_weight.value())
        .sum();
    if !spec.acceptance_criteria.is_empty() && (weights - 1.0).abs() > 0.01 {
        errors.push(format!(
            "Acceptance criteria weights must sum to 1.0, got {weights:.2}"
        ));
    }

    if spec.invariants.is_empty() {
        warnings.push("No invariants defined — consider adding safety properties".to_string());
    }

    if spec.inputs.is_empty() {
        warnings.push("No inputs defined".to_string());
    }

    if spec.outputs.is_empty() {
        warnings.push("No outputs defined".to_string());
    }

    for dep in &spec.dependencies.d3n_capabilities {
        if !dep.contains(':') {
            errors.push(format!(
                "D3N capability must be 'model:capability' format, got: {dep}"
            ));
        }
    }

    if spec.domain.service.is_empty() {
        errors.push("Domain service is required".to_string());
    }

    if spec.domain.language.is_empty() {
        errors.push("Domain language is required".to_string());
    }

    ValidateResponse {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AcceptanceCriterion, SpecDependencies, SpecDomain, SpecState};
    use df_core::SatisfactionScore;

    fn criterion(text: &str, weight: f64) -> AcceptanceCriterion {
        AcceptanceCriterion {
            criterion: text.to_string(),
            priority: "P1".to_string(),
            satisfaction_weight: SatisfactionScore::new(weight).unwrap(),
        }
    }

    fn sample_spec() -> Spec {
        Spec {
            id: "spec-20260219-user-auth-refresh".to_string(),
            version: "1.0.0".to_string(),
            name: "Silent Token Refresh".to_string(),
            description: "Refresh expired access tokens silently".to_string(),
            state: SpecState::Published,
            domain: SpecDomain {
                service: "persona".to_string(),
                language: "go".to_string(),
                framework: None,
            },
            inputs: vec![crate::models::SpecInput {
                name: "refresh_token".to_string(),
                type_name: "string".to_string(),
                format: None,
                description: None,
            }],
            outputs: vec![crate::models::SpecOutput {
                name: "new_token".to_string(),
                type_name: "string".to_string(),
                format: None,
                constraints: vec!["exp=15m".to_string()],
            }],
            invariants: vec!["Refresh tokens are single-use".to_string()],
            constraints: vec![],
            acceptance_criteria: vec![
                criterion("Valid refresh produces new token pair", 0.6),
                criterion("Reused token triggers revocation", 0.4),
            ],
            dependencies: SpecDependencies::default(),
        }
    }

    #[test]
    fn valid_spec_passes() {
        let result = validate_spec(&sample_spec());
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn bad_id_format_rejected() {
        let mut spec = sample_spec();
        spec.id = "bad-id".to_string();
        let result = validate_spec(&spec);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.contains("format")));
    }

    #[test]
    fn bad_version_rejected() {
        let mut spec = sample_spec();
        spec.version = "abc".to_string();
        assert!(!validate_spec(&spec).valid);
    }

    #[test]
    fn blank_description_rejected() {
        let mut spec = sample_spec();
        spec.description = "   ".to_string();
        let result = validate_spec(&spec);
        assert!(result.errors.iter().any(|e| e == "Description is required"));
    }

    #[test]
    fn missing_criteria_rejected() {
        let mut spec = sample_spec();
        spec.acceptance_criteria.clear();
        assert!(!validate_spec(&spec).valid);
    }

    #[test]
    fn weight_mismatch_rejected() {
        let mut spec = sample_spec();
        spec.acceptance_criteria = vec![criterion("A", 0.3), criterion("B", 0.3)];
        let result = validate_spec(&spec);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.to_lowercase().contains("weights")));
    }

    #[test]
    fn missing_invariants_warns_but_passes() {
        let mut spec = sample_spec();
        spec.invariants.clear();
        let result = validate_spec(&spec);
        assert!(result.valid);
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn capability_without_colon_rejected() {
        let mut spec = sample_spec();
        spec.dependencies.d3n_capabilities = vec!["judge-01".to_string()];
        let result = validate_spec(&spec);
        assert!(result.errors.iter().any(|e| e.contains("model:capability")));
    }

    #[test]
    fn empty_domain_fields_rejected() {
        let mut spec = sample_spec();
        spec.domain.service = String::new();
        spec.domain.language = String::new();
        let result = validate_spec(&spec);
        assert!(result.errors.iter().any(|e| e == "Domain service is required"));
        assert!(result.errors.iter().any(|e| e == "Domain language is required"));
    }
}
