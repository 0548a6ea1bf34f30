//! Deploy guard - blocks externally exposed Kubernetes resources.
//!
//! Dark Factory services are cluster-internal only. The guard scans rendered
//! manifests for `kind: Ingress`, `kind: LoadBalancer`, or `alb.ingress`
//! annotations and fails the build when any appear.

use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The three patterns that mean a manifest exposes a service outside the
/// cluster.
pub const FORBIDDEN_PATTERNS: [&str; 3] = ["kind: Ingress", "kind: LoadBalancer", "alb.ingress"];

/// A forbidden pattern found in a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub file: PathBuf,
    pub pattern: &'static str,
}

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Scan a manifest directory recursively for forbidden exposure. A missing
/// directory scans clean; there is nothing to deploy from it.
pub fn scan_dir(dir: &Path) -> Result<Vec<Violation>, GuardError> {
    let mut violations = Vec::new();
    if !dir.exists() {
        return Ok(violations);
    }
    walk(dir, &mut violations)?;
    violations.sort_by(|a, b| a.file.cmp(&b.file).then(a.pattern.cmp(b.pattern)));
    Ok(violations)
}

fn walk(dir: &Path, violations: &mut Vec<Violation>) -> Result<(), GuardError> {
    let entries = fs::read_dir(dir).map_err(|source| GuardError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| GuardError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, violations)?;
        } else if is_manifest(&path) {
            tracing::debug!("Scanning {}", path.display());
            let content = fs::read_to_string(&path).map_err(|source| GuardError::Read {
                path: path.clone(),
                source,
            })?;
            for pattern in scan_manifest(&content) {
                violations.push(Violation {
                    file: path.clone(),
                    pattern,
                });
            }
        }
    }
    Ok(())
}

fn is_manifest(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}

/// Scan one manifest's text for the forbidden patterns.
///
/// Documents are parsed as multi-document YAML. A document that fails to
/// parse falls back to a plain-text containment check, so a malformed
/// manifest cannot smuggle a forbidden kind past the guard.
#[must_use]
pub fn scan_manifest(content: &str) -> Vec<&'static str> {
    let mut found = Vec::new();

    let mut parse_failed = false;
    for doc in serde_yaml::Deserializer::from_str(content) {
        match Value::deserialize(doc) {
            Ok(value) => check_document(&value, &mut found),
            Err(_) => {
                parse_failed = true;
                break;
            }
        }
    }

    if parse_failed {
        for pattern in FORBIDDEN_PATTERNS {
            if content.contains(pattern) {
                found.push(pattern);
            }
        }
    }

    found.sort_unstable();
    found.dedup();
    found
}

fn check_document(doc: &Value, found: &mut Vec<&'static str>) {
    let kind = doc.get("kind").and_then(Value::as_str);
    if kind == Some("Ingress") {
        found.push("kind: Ingress");
    }

    let spec_type = doc
        .get("spec")
        .and_then(|spec| spec.get("type"))
        .and_then(Value::as_str);
    if kind == Some("LoadBalancer") || spec_type == Some("LoadBalancer") {
        found.push("kind: LoadBalancer");
    }

    let annotations = doc
        .get("metadata")
        .and_then(|meta| meta.get("annotations"))
        .and_then(Value::as_mapping);
    if let Some(annotations) = annotations {
        let has_alb = annotations
            .keys()
            .filter_map(Value::as_str)
            .any(|key| key.starts_with("alb.ingress"));
        if has_alb {
            found.push("alb.ingress");
        }
    }
}
