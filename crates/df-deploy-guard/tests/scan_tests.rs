//! Integration tests for directory scanning.

use df_deploy_guard::{scan_dir, Violation};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_manifest(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_clean_directory_passes() {
    let dir = TempDir::new().unwrap();
    write_manifest(
        dir.path(),
        "service.yaml",
        "apiVersion: v1\nkind: Service\nspec:\n  type: ClusterIP\n",
    );
    write_manifest(
        dir.path(),
        "deployment.yaml",
        "apiVersion: apps/v1\nkind: Deployment\n",
    );

    let violations = scan_dir(dir.path()).unwrap();
    assert!(violations.is_empty());
}

#[test]
fn test_ingress_manifest_is_caught() {
    let dir = TempDir::new().unwrap();
    write_manifest(
        dir.path(),
        "ingress.yaml",
        "apiVersion: networking.k8s.io/v1\nkind: Ingress\n",
    );

    let violations = scan_dir(dir.path()).unwrap();
    assert_eq!(
        violations,
        vec![Violation {
            file: dir.path().join("ingress.yaml"),
            pattern: "kind: Ingress",
        }]
    );
}

#[test]
fn test_loadbalancer_service_is_caught() {
    let dir = TempDir::new().unwrap();
    write_manifest(
        dir.path(),
        "service.yml",
        "apiVersion: v1\nkind: Service\nspec:\n  type: LoadBalancer\n",
    );

    let violations = scan_dir(dir.path()).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].pattern, "kind: LoadBalancer");
}

#[test]
fn test_nested_directories_are_scanned() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("overlays").join("prod");
    fs::create_dir_all(&nested).unwrap();
    write_manifest(
        &nested,
        "service.yaml",
        "kind: Service\nmetadata:\n  annotations:\n    alb.ingress.kubernetes.io/scheme: internal\n",
    );

    let violations = scan_dir(dir.path()).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].pattern, "alb.ingress");
    assert_eq!(violations[0].file, nested.join("service.yaml"));
}

#[test]
fn test_non_manifest_files_are_ignored() {
    let dir = TempDir::new().unwrap();
    write_manifest(dir.path(), "notes.txt", "kind: Ingress\n");
    write_manifest(dir.path(), "README.md", "kind: LoadBalancer\n");

    let violations = scan_dir(dir.path()).unwrap();
    assert!(violations.is_empty());
}

#[test]
fn test_missing_directory_scans_clean() {
    let violations = scan_dir(Path::new("/nonexistent/k8s")).unwrap();
    assert!(violations.is_empty());
}

#[test]
fn test_violations_are_sorted_by_file() {
    let dir = TempDir::new().unwrap();
    write_manifest(dir.path(), "b.yaml", "kind: Ingress\n");
    write_manifest(dir.path(), "a.yaml", "kind: Service\nspec:\n  type: LoadBalancer\n");

    let violations = scan_dir(dir.path()).unwrap();
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].file, dir.path().join("a.yaml"));
    assert_eq!(violations[1].file, dir.path().join("b.yaml"));
}
