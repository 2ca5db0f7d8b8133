//! Legacy (`v1alpha1`) wire shape of the `DatadogAgent` custom resource.
//!
//! Accepted for backwards compatibility; it normalizes onto the same
//! [`AgentSpec`](crate::api::agent_spec::AgentSpec) as the current shape.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

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

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_agent: Option<ClusterAgentSpec>,

    /// Presence of this component is what enables dedicated check runners in
    /// the legacy shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_checks_runner: Option<ClusterChecksRunnerSpec>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatadogFeatures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prometheus_scrape: Option<PrometheusScrapeConfig>,
}

/// The legacy scrape block names the endpoints toggle differently from the
/// current shape (`serviceEndpoints` instead of `enableServiceEndpoints`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrometheusScrapeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_endpoints: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_configs: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterAgentSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ClusterAgentConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterAgentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_checks_enabled: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterChecksRunnerSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_legacy_scrape_block() {
        let doc = r#"
spec:
  features:
    prometheusScrape:
      enabled: true
      serviceEndpoints: false
      additionalConfigs: "- {}"
"#;
        let agent: DatadogAgent = serde_yaml::from_str(doc).unwrap();
        let scrape = agent.spec.features.prometheus_scrape.unwrap();
        assert_eq!(Some(true), scrape.enabled);
        assert_eq!(Some(false), scrape.service_endpoints);
        assert_eq!(Some("- {}".to_string()), scrape.additional_configs);
    }
}
