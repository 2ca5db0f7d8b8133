//! Identifiers and well-known constants shared between the agent, the
//! operator and the Helm charts. The string forms here are part of the
//! wire contract and must not change.

use serde::{Deserialize, Serialize};
use std::fmt;

// Environment variables read by the agent.
pub const DD_PROMETHEUS_SCRAPE_ENABLED: &str = "DD_PROMETHEUS_SCRAPE_ENABLED";
pub const DD_PROMETHEUS_SCRAPE_SERVICE_ENDPOINTS: &str = "DD_PROMETHEUS_SCRAPE_SERVICE_ENDPOINTS";
pub const DD_PROMETHEUS_SCRAPE_CHECKS: &str = "DD_PROMETHEUS_SCRAPE_CHECKS";
pub const DD_CLUSTER_CHECKS_ENABLED: &str = "DD_CLUSTER_CHECKS_ENABLED";
pub const DD_EXTRA_CONFIG_PROVIDERS: &str = "DD_EXTRA_CONFIG_PROVIDERS";
pub const DD_EXTRA_LISTENERS: &str = "DD_EXTRA_LISTENERS";
pub const DD_LOG_LEVEL: &str = "DD_LOG_LEVEL";
pub const DD_HEALTH_PORT: &str = "DD_HEALTH_PORT";

// Pod-level volume names bound by the override stage.
pub const SECCOMP_ROOT_VOLUME_NAME: &str = "seccomp-root";
pub const SECURITY_AGENT_VOLUME_NAME: &str = "datadog-agent-security";

/// Prefix of the per-container AppArmor pod annotation; the full key is
/// `<prefix>/<container-role>`.
pub const APP_ARMOR_ANNOTATION_PREFIX: &str = "container.apparmor.security.beta.kubernetes.io";

/// Builds the AppArmor annotation key for one container role.
pub fn app_armor_annotation_key(role: ContainerRole) -> String {
    format!("{APP_ARMOR_ANNOTATION_PREFIX}/{role}")
}

/// Name of a container within one of the agent workloads.
///
/// The set is closed: features and overrides may only address containers the
/// operator itself knows how to assemble.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerRole {
    CoreAgent,
    TraceAgent,
    ProcessAgent,
    SystemProbe,
    SecurityAgent,
    ClusterAgent,
    ClusterChecksRunner,
}

impl ContainerRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ContainerRole::CoreAgent => "core-agent",
            ContainerRole::TraceAgent => "trace-agent",
            ContainerRole::ProcessAgent => "process-agent",
            ContainerRole::SystemProbe => "system-probe",
            ContainerRole::SecurityAgent => "security-agent",
            ContainerRole::ClusterAgent => "cluster-agent",
            ContainerRole::ClusterChecksRunner => "cluster-checks-runner",
        }
    }
}

impl fmt::Display for ContainerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the three deployment targets the operator assembles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkloadKind {
    NodeAgent,
    ClusterAgent,
    ClusterChecksRunner,
}

impl WorkloadKind {
    pub const ALL: [WorkloadKind; 3] = [
        WorkloadKind::NodeAgent,
        WorkloadKind::ClusterAgent,
        WorkloadKind::ClusterChecksRunner,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkloadKind::NodeAgent => "nodeAgent",
            WorkloadKind::ClusterAgent => "clusterAgent",
            WorkloadKind::ClusterChecksRunner => "clusterChecksRunner",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
