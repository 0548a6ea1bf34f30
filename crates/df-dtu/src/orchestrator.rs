//! DTU environment lifecycle orchestration.

use crate::models::{
    EnvironmentSpec, EnvironmentStatus, ProvisionResponse, TeardownResponse, TwinInstance,
    TwinStatus, TWIN_CATALOG,
};
use dashmap::DashMap;
use df_core::{round_dp, short_hex};
use std::time::Instant;

/// A live environment: its twins, the spec that requested it, and when it
/// was created.
#[derive(Debug)]
struct Environment {
    twins: Vec<TwinInstance>,
    spec: EnvironmentSpec,
    created_at: Instant,
}

/// Manages DTU environment lifecycle.
#[derive(Debug, Default)]
pub struct DtuOrchestrator {
    k8s_enabled: bool,
    environments: DashMap<String, Environment>,
}

impl DtuOrchestrator {
    #[must_use]
    pub fn new(k8s_enabled: bool) -> Self {
        Self {
            k8s_enabled,
            environments: DashMap::new(),
        }
    }

    /// Configure from `DTU_K8S_ENABLED`; only the literal `true`
    /// (case-insensitive) enables the K8s path.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(std::env::var("DTU_K8S_ENABLED").is_ok_and(|v| v.eq_ignore_ascii_case("true")))
    }

    /// Provision a new DTU environment with the requested twins. Service
    /// names missing from the catalog are skipped with a warning.
    pub fn provision(&self, spec: EnvironmentSpec) -> ProvisionResponse {
        let namespace = format!("dtu-{}", short_hex(8));

        tracing::info!(
            "Provisioning {} (twins: {:?}, scenario: {:?})",
            namespace,
            spec.twins,
            spec.scenario_id
        );

        let mut twins = Vec::new();
        for svc_name in &spec.twins {
            let Some(catalog_entry) = TWIN_CATALOG.get(svc_name.as_str()) else {
                tracing::warn!("Unknown twin service {}, skipping", svc_name);
                continue;
            };

            let mut twin = TwinInstance {
                twin_id: format!("{namespace}-{svc_name}"),
                service_name: svc_name.clone(),
                namespace: namespace.clone(),
                status: TwinStatus::Pending,
                endpoint: None,
                port: catalog_entry.port,
            };

            if self.k8s_enabled {
                self.provision_k8s_twin(&mut twin);
            } else {
                twin.status = TwinStatus::Ready;
                twin.endpoint = Some(format!(
                    "http://{}.{}.svc:{}",
                    svc_name, namespace, catalog_entry.port
                ));
            }

            twins.push(twin);
        }

        let status = if twins.iter().all(|t| t.status == TwinStatus::Ready) {
            "ready"
        } else {
            "provisioning"
        };

        self.environments.insert(
            namespace.clone(),
            Environment {
                twins: twins.clone(),
                spec,
                created_at: Instant::now(),
            },
        );

        tracing::info!("Provisioned {} with {} twins", namespace, twins.len());

        ProvisionResponse {
            namespace,
            twins,
            status: status.to_string(),
        }
    }

    /// Tear down a DTU environment. Idempotent: unknown namespaces still
    /// report `terminated`.
    pub fn teardown(&self, namespace: &str) -> TeardownResponse {
        tracing::info!("Tearing down {}", namespace);

        let removed = self.environments.remove(namespace);
        if removed.is_some() && self.k8s_enabled {
            self.teardown_k8s_namespace(namespace);
        }

        TeardownResponse {
            namespace: namespace.to_string(),
            status: "terminated".to_string(),
        }
    }

    /// Status of a single environment, or None when the namespace is
    /// unknown.
    #[must_use]
    pub fn status(&self, namespace: &str) -> Option<EnvironmentStatus> {
        let env = self.environments.get(namespace)?;
        Some(EnvironmentStatus {
            namespace: namespace.to_string(),
            twins: env.twins.clone(),
            age_seconds: round_dp(env.created_at.elapsed().as_secs_f64(), 2),
        })
    }

    /// Status of every live environment.
    #[must_use]
    pub fn list_environments(&self) -> Vec<EnvironmentStatus> {
        self.environments
            .iter()
            .map(|entry| EnvironmentStatus {
                namespace: entry.key().clone(),
                twins: entry.value().twins.clone(),
                age_seconds: round_dp(entry.value().created_at.elapsed().as_secs_f64(), 2),
            })
            .collect()
    }

    /// Remove environments that outlived their TTL and return the reclaimed
    /// namespaces.
    pub fn sweep_expired(&self) -> Vec<String> {
        let mut reclaimed = Vec::new();
        self.environments.retain(|namespace, env| {
            if env.created_at.elapsed().as_secs() >= env.spec.ttl_seconds {
                reclaimed.push(namespace.clone());
                false
            } else {
                true
            }
        });
        if !reclaimed.is_empty() {
            tracing::info!("Swept {} expired environments: {:?}", reclaimed.len(), reclaimed);
        }
        reclaimed
    }

    /// Provision a twin as a pod in the DTU namespace.
    // TODO: drive the kube API here; twins currently mirror the stub path.
    fn provision_k8s_twin(&self, twin: &mut TwinInstance) {
        twin.status = TwinStatus::Ready;
        twin.endpoint = Some(format!(
            "http://{}.{}.svc:{}",
            twin.service_name, twin.namespace, twin.port
        ));
    }

    /// Delete the twin namespace and everything in it.
    fn teardown_k8s_namespace(&self, namespace: &str) {
        tracing::info!("Deleting K8s namespace {}", namespace);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spec_for(twins: &[&str]) -> EnvironmentSpec {
        EnvironmentSpec {
            twins: twins.iter().map(|s| (*s).to_string()).collect(),
            ..EnvironmentSpec::default()
        }
    }

    #[test]
    fn provision_environment() {
        let orchestrator = DtuOrchestrator::new(false);
        let mut spec = spec_for(&["persona", "carousel"]);
        spec.scenario_id = Some("scn-test".to_string());
        let result = orchestrator.provision(spec);
        assert!(result.namespace.starts_with("dtu-"));
        assert_eq!(result.twins.len(), 2);
        assert!(result.twins.iter().all(|t| t.status == TwinStatus::Ready));
        assert_eq!(result.status, "ready");
    }

    #[test]
    fn twin_endpoints_are_cluster_internal() {
        let orchestrator = DtuOrchestrator::new(false);
        let result = orchestrator.provision(spec_for(&["carousel"]));
        let endpoint = result.twins[0].endpoint.as_deref().unwrap();
        assert!(endpoint.starts_with("http://carousel.dtu-"));
        assert!(endpoint.ends_with(".svc:8081"));
    }

    #[test]
    fn teardown_environment() {
        let orchestrator = DtuOrchestrator::new(false);
        let prov = orchestrator.provision(spec_for(&["persona"]));
        let result = orchestrator.teardown(&prov.namespace);
        assert_eq!(result.status, "terminated");
        assert!(orchestrator.status(&prov.namespace).is_none());
    }

    #[test]
    fn teardown_is_idempotent() {
        let orchestrator = DtuOrchestrator::new(false);
        let result = orchestrator.teardown("dtu-never-existed");
        assert_eq!(result.status, "terminated");
    }

    #[test]
    fn unknown_twin_skipped() {
        let orchestrator = DtuOrchestrator::new(false);
        let result = orchestrator.provision(spec_for(&["persona", "nonexistent-service"]));
        assert_eq!(result.twins.len(), 1);
        assert_eq!(result.twins[0].service_name, "persona");
    }

    #[test]
    fn empty_environment_is_ready() {
        let orchestrator = DtuOrchestrator::new(false);
        let result = orchestrator.provision(spec_for(&[]));
        assert!(result.twins.is_empty());
        assert_eq!(result.status, "ready");
    }

    #[test]
    fn list_environments() {
        let orchestrator = DtuOrchestrator::new(false);
        orchestrator.provision(spec_for(&["persona"]));
        orchestrator.provision(spec_for(&["redis"]));
        let envs = orchestrator.list_environments();
        assert_eq!(envs.len(), 2);
    }

    #[test]
    fn sweep_reclaims_expired_environments() {
        let orchestrator = DtuOrchestrator::new(false);
        let mut expiring = spec_for(&["persona"]);
        expiring.ttl_seconds = 0;
        let doomed = orchestrator.provision(expiring);
        let kept = orchestrator.provision(spec_for(&["redis"]));

        let reclaimed = orchestrator.sweep_expired();
        assert_eq!(reclaimed, vec![doomed.namespace.clone()]);
        assert!(orchestrator.status(&doomed.namespace).is_none());
        assert!(orchestrator.status(&kept.namespace).is_some());
    }

    #[test]
    fn status_reports_age() {
        let orchestrator = DtuOrchestrator::new(false);
        let prov = orchestrator.provision(spec_for(&["sdsm"]));
        let status = orchestrator.status(&prov.namespace).unwrap();
        assert_eq!(status.namespace, prov.namespace);
        assert_eq!(status.twins.len(), 1);
        assert!(status.age_seconds >= 0.0);
    }
}
