//! The pluggable feature contract and its shared data types.
//!
//! A feature translates one capability area of the spec into container-level
//! mutations. Instances live for exactly one reconcile pass: `configure`
//! runs first and stores whatever the feature needs, the `manage_*` stages
//! then mutate the managers for the workloads the feature declared.

pub mod cluster_checks;
pub mod prometheus_scrape;
pub mod registry;

use crate::api::agent_spec::AgentSpec;
use crate::api::common::{ContainerRole, WorkloadKind};
use crate::dependencies::DependencyStore;
use crate::manager::PodTemplateManagers;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FeatureError {
    #[error("invalid feature configuration: {0}")]
    InvalidConfiguration(String),
}

/// Cross-cutting inputs handed to every feature constructor.
///
/// Carries nothing today; it exists so adding a construction-time input
/// (platform capabilities, a scoped logger) does not change every builder
/// signature.
#[derive(Clone, Debug, Default)]
pub struct FeatureOptions {}

/// Stable identifier of a feature in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureId {
    PrometheusScrape,
    ClusterChecks,
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self {
            FeatureId::PrometheusScrape => "prometheus_scrape",
            FeatureId::ClusterChecks => "cluster_checks",
        };
        f.write_str(id)
    }
}

/// Whether a workload is required, with an explicit "no opinion" state so
/// that one feature's silence never clobbers another's explicit answer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequiredState {
    #[default]
    Unset,
    Required,
    NotRequired,
}

impl RequiredState {
    /// Commutative, associative merge: any `Required` wins, an explicit
    /// `NotRequired` beats silence.
    pub fn merge(self, other: RequiredState) -> RequiredState {
        match (self, other) {
            (RequiredState::Required, _) | (_, RequiredState::Required) => RequiredState::Required,
            (RequiredState::NotRequired, _) | (_, RequiredState::NotRequired) => {
                RequiredState::NotRequired
            }
            (RequiredState::Unset, RequiredState::Unset) => RequiredState::Unset,
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, RequiredState::Required)
    }
}

/// One workload's requirement declaration: the tri-state plus the containers
/// that must exist within it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequiredComponent {
    pub required: RequiredState,
    pub containers: BTreeSet<ContainerRole>,
}

impl RequiredComponent {
    pub fn required_with(roles: impl IntoIterator<Item = ContainerRole>) -> Self {
        RequiredComponent {
            required: RequiredState::Required,
            containers: roles.into_iter().collect(),
        }
    }

    pub fn not_required() -> Self {
        RequiredComponent {
            required: RequiredState::NotRequired,
            containers: BTreeSet::new(),
        }
    }

    pub fn merge(&mut self, other: &RequiredComponent) {
        self.required = self.required.merge(other.required);
        self.containers.extend(other.containers.iter().copied());
    }

    /// A workload makes it into the assembled output only when it is
    /// explicitly required and has at least one container.
    pub fn is_enabled(&self) -> bool {
        self.required.is_required() && !self.containers.is_empty()
    }
}

/// Merged requirement declarations for the three workloads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequiredComponents {
    pub node_agent: RequiredComponent,
    pub cluster_agent: RequiredComponent,
    pub cluster_checks_runner: RequiredComponent,
}

impl RequiredComponents {
    pub fn merge(&mut self, other: &RequiredComponents) {
        self.node_agent.merge(&other.node_agent);
        self.cluster_agent.merge(&other.cluster_agent);
        self.cluster_checks_runner.merge(&other.cluster_checks_runner);
    }

    pub fn component(&self, kind: WorkloadKind) -> &RequiredComponent {
        match kind {
            WorkloadKind::NodeAgent => &self.node_agent,
            WorkloadKind::ClusterAgent => &self.cluster_agent,
            WorkloadKind::ClusterChecksRunner => &self.cluster_checks_runner,
        }
    }
}

/// Contract every feature implements.
///
/// `configure` never fails: a feature whose spec section is absent or
/// disabled opts out by returning the default (empty) requirements, and its
/// `manage_*` methods must then leave the managers untouched.
pub trait Feature {
    fn id(&self) -> FeatureId;

    /// Inspects the normalized spec, stores the feature's own configuration
    /// for the later stages, and declares the workloads and containers the
    /// feature needs.
    fn configure(&mut self, spec: &AgentSpec) -> RequiredComponents;

    /// Registers auxiliary cluster objects the feature needs. An error
    /// aborts the whole pass.
    fn manage_dependencies(&mut self, _store: &mut DependencyStore) -> Result<(), FeatureError> {
        Ok(())
    }

    fn manage_node_agent(&mut self, _managers: &mut PodTemplateManagers) -> Result<(), FeatureError> {
        Ok(())
    }

    fn manage_cluster_agent(
        &mut self,
        _managers: &mut PodTemplateManagers,
    ) -> Result<(), FeatureError> {
        Ok(())
    }

    fn manage_cluster_checks_runner(
        &mut self,
        _managers: &mut PodTemplateManagers,
    ) -> Result<(), FeatureError> {
        Ok(())
    }
}
