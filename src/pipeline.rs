//! The build pipeline for one reconcile pass.
//!
//! Pure in-memory transformation: instantiate features, configure them
//! against the spec, merge their requirements, run the per-workload
//! mutation stages, then apply the user overrides. The surrounding
//! reconciler owns retries, caching and status reporting.

use crate::api::agent_spec::AgentSpec;
use crate::api::common::WorkloadKind;
use crate::dependencies::DependencyStore;
use crate::feature::registry::FeatureRegistry;
use crate::feature::{Feature, FeatureError, FeatureId, FeatureOptions, RequiredComponents};
use crate::manager::PodTemplateManagers;
use crate::overrides::{apply_container_override, OverrideError};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("feature `{id}` failed in the {stage} stage: {source}")]
    Feature {
        id: FeatureId,
        stage: &'static str,
        #[source]
        source: FeatureError,
    },

    #[error("override stage failed: {0}")]
    Override(#[from] OverrideError),
}

/// Output of one pass, consumed by the workload assembler.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconcileResult {
    pub required: RequiredComponents,
    pub workloads: BTreeMap<WorkloadKind, PodTemplateManagers>,
    pub dependencies: DependencyStore,
}

/// Runs the feature pipeline against a normalized spec.
///
/// The registry is borrowed: one registry serves every concurrent pass,
/// while features and managers are instantiated fresh per pass and never
/// shared.
pub struct BuildPipeline<'a> {
    registry: &'a FeatureRegistry,
    options: FeatureOptions,
}

impl<'a> BuildPipeline<'a> {
    pub fn new(registry: &'a FeatureRegistry) -> Self {
        BuildPipeline {
            registry,
            options: FeatureOptions::default(),
        }
    }

    pub fn run(&self, spec: &AgentSpec) -> Result<ReconcileResult, PipelineError> {
        let mut features = self.registry.build_all(&self.options);

        let required = configure_all(&mut features, spec);
        debug!(
            node_agent = required.node_agent.is_enabled(),
            cluster_agent = required.cluster_agent.is_enabled(),
            cluster_checks_runner = required.cluster_checks_runner.is_enabled(),
            "merged required components"
        );

        let mut dependencies = DependencyStore::default();
        for feature in &mut features {
            let id = feature.id();
            feature
                .manage_dependencies(&mut dependencies)
                .map_err(|source| PipelineError::Feature {
                    id,
                    stage: "dependencies",
                    source,
                })?;
        }

        let mut workloads = seed_workloads(&required);

        for feature in &mut features {
            let id = feature.id();
            if let Some(managers) = workloads.get_mut(&WorkloadKind::NodeAgent) {
                feature
                    .manage_node_agent(managers)
                    .map_err(|source| PipelineError::Feature {
                        id,
                        stage: "node agent",
                        source,
                    })?;
            }
            if let Some(managers) = workloads.get_mut(&WorkloadKind::ClusterAgent) {
                feature
                    .manage_cluster_agent(managers)
                    .map_err(|source| PipelineError::Feature {
                        id,
                        stage: "cluster agent",
                        source,
                    })?;
            }
            if let Some(managers) = workloads.get_mut(&WorkloadKind::ClusterChecksRunner) {
                feature
                    .manage_cluster_checks_runner(managers)
                    .map_err(|source| PipelineError::Feature {
                        id,
                        stage: "cluster checks runner",
                        source,
                    })?;
            }
        }

        // Overrides run strictly after every feature stage.
        for (kind, workload_override) in &spec.overrides {
            let Some(managers) = workloads.get_mut(kind) else {
                debug!(workload = %kind, "skipping override for a workload that is not required");
                continue;
            };
            for (role, container_override) in &workload_override.containers {
                apply_container_override(*role, managers, container_override)?;
            }
        }

        Ok(ReconcileResult {
            required,
            workloads,
            dependencies,
        })
    }
}

fn configure_all(features: &mut [Box<dyn Feature>], spec: &AgentSpec) -> RequiredComponents {
    let mut required = RequiredComponents::default();
    for feature in features {
        let contribution = feature.configure(spec);
        required.merge(&contribution);
    }
    required
}

/// A workload is seeded only when it is required and has containers; a role
/// with zero required containers is dropped entirely.
fn seed_workloads(required: &RequiredComponents) -> BTreeMap<WorkloadKind, PodTemplateManagers> {
    let mut workloads = BTreeMap::new();
    for kind in WorkloadKind::ALL {
        let component = required.component(kind);
        if component.is_enabled() {
            workloads.insert(
                kind,
                PodTemplateManagers::new(component.containers.iter().copied()),
            );
        }
    }
    workloads
}
