//! Current (`v2alpha1`) wire shape of the `DatadogAgent` custom resource.
//!
//! Only the sections the composition core consumes are modeled; schema
//! validation and defaulting live in the admission webhooks.

use crate::api::common::{ContainerRole, WorkloadKind};
use crate::overrides::ContainerOverride;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DatadogAgent {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: DatadogAgentSpec,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatadogAgentSpec {
    #[serde(default)]
    pub features: DatadogFeatures,

    /// Per-workload user overrides, applied on top of whatever the features
    /// produced.
    #[serde(default, rename = "override", skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<WorkloadKind, ComponentOverride>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatadogFeatures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prometheus_scrape: Option<PrometheusScrapeFeatureConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_checks: Option<ClusterChecksFeatureConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrometheusScrapeFeatureConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_service_endpoints: Option<bool>,

    /// Additional scrape check configurations, authored as YAML.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_configs: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterChecksFeatureConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_cluster_checks_runners: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentOverride {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub containers: BTreeMap<ContainerRole, ContainerOverride>,
}
