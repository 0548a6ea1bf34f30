//! Wire models and the twin catalog for the DTU Controller.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle of a single service twin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwinStatus {
    #[default]
    Pending,
    Provisioning,
    Ready,
    Running,
    TearingDown,
    Terminated,
    Error,
}

/// Specification for a single service twin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwinSpec {
    pub service_name: String,
    #[serde(default)]
    pub source_openapi_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default = "default_readiness_path")]
    pub readiness_path: String,
}

impl TwinSpec {
    fn entry(service_name: &str, port: u16, readiness_path: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
            source_openapi_url: None,
            image: None,
            port,
            env: HashMap::new(),
            readiness_path: readiness_path.to_string(),
        }
    }
}

/// Fixed catalog of provisionable service twins. Unknown service names are
/// skipped at provision time.
pub static TWIN_CATALOG: Lazy<HashMap<&'static str, TwinSpec>> = Lazy::new(|| {
    HashMap::from([
        ("persona", TwinSpec::entry("persona", 8080, "/health")),
        ("carousel", TwinSpec::entry("carousel", 8081, "/health")),
        ("sdsm", TwinSpec::entry("sdsm", 8082, "/health")),
        ("alexandria", TwinSpec::entry("alexandria", 8083, "/health")),
        ("postgresql", TwinSpec::entry("postgresql", 5432, "")),
        ("redis", TwinSpec::entry("redis", 6379, "")),
    ])
});

/// A provisioned twin inside a DTU namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwinInstance {
    pub twin_id: String,
    pub service_name: String,
    pub namespace: String,
    #[serde(default)]
    pub status: TwinStatus,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Specification for a DTU environment (collection of twins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentSpec {
    /// Service names from the twin catalog.
    #[serde(default)]
    pub twins: Vec<String>,
    #[serde(default)]
    pub scenario_id: Option<String>,
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl Default for EnvironmentSpec {
    fn default() -> Self {
        Self {
            twins: Vec::new(),
            scenario_id: None,
            ttl_seconds: default_ttl_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionRequest {
    pub environment: EnvironmentSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionResponse {
    pub namespace: String,
    pub twins: Vec<TwinInstance>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeardownRequest {
    pub namespace: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeardownResponse {
    pub namespace: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentStatus {
    pub namespace: String,
    pub twins: Vec<TwinInstance>,
    #[serde(default)]
    pub age_seconds: f64,
}

fn default_port() -> u16 {
    8080
}

fn default_readiness_path() -> String {
    "/health".to_string()
}

fn default_ttl_seconds() -> u64 {
    600
}
