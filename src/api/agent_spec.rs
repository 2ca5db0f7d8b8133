//! Normalized, version-agnostic view of the user's declarative input.
//!
//! Both wire shapes converge here through pure mapping functions; features
//! only ever see this form.

use crate::api::common::{ContainerRole, WorkloadKind};
use crate::api::{v1alpha1, v2alpha1};
use crate::overrides::ContainerOverride;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentSpec {
    pub features: FeaturesSpec,
    pub overrides: BTreeMap<WorkloadKind, WorkloadOverride>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeaturesSpec {
    pub prometheus_scrape: PrometheusScrapeSpec,
    pub cluster_checks: ClusterChecksSpec,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrometheusScrapeSpec {
    pub enabled: bool,
    pub enable_service_endpoints: bool,
    pub additional_configs: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClusterChecksSpec {
    pub enabled: bool,
    pub use_cluster_checks_runners: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkloadOverride {
    pub containers: BTreeMap<ContainerRole, ContainerOverride>,
}

impl AgentSpec {
    /// Maps the current wire shape onto the normalized spec.
    pub fn from_v2alpha1(agent: &v2alpha1::DatadogAgent) -> Self {
        let features = &agent.spec.features;

        let prometheus_scrape = features
            .prometheus_scrape
            .as_ref()
            .map(|scrape| PrometheusScrapeSpec {
                enabled: scrape.enabled.unwrap_or_default(),
                enable_service_endpoints: scrape.enable_service_endpoints.unwrap_or_default(),
                additional_configs: scrape.additional_configs.clone(),
            })
            .unwrap_or_default();

        let cluster_checks = features
            .cluster_checks
            .as_ref()
            .map(|checks| ClusterChecksSpec {
                enabled: checks.enabled.unwrap_or_default(),
                use_cluster_checks_runners: checks.use_cluster_checks_runners.unwrap_or_default(),
            })
            .unwrap_or_default();

        let overrides = agent
            .spec
            .overrides
            .iter()
            .map(|(kind, component)| {
                (
                    *kind,
                    WorkloadOverride {
                        containers: component.containers.clone(),
                    },
                )
            })
            .collect();

        AgentSpec {
            features: FeaturesSpec {
                prometheus_scrape,
                cluster_checks,
            },
            overrides,
        }
    }

    /// Maps the legacy wire shape onto the normalized spec.
    ///
    /// The legacy shape has no generic override section; runner usage is
    /// implied by the presence of the `clusterChecksRunner` component.
    pub fn from_v1alpha1(agent: &v1alpha1::DatadogAgent) -> Self {
        let prometheus_scrape = agent
            .spec
            .features
            .prometheus_scrape
            .as_ref()
            .map(|scrape| PrometheusScrapeSpec {
                enabled: scrape.enabled.unwrap_or_default(),
                enable_service_endpoints: scrape.service_endpoints.unwrap_or_default(),
                additional_configs: scrape.additional_configs.clone(),
            })
            .unwrap_or_default();

        let cluster_checks_enabled = agent
            .spec
            .cluster_agent
            .as_ref()
            .and_then(|cluster_agent| cluster_agent.config.as_ref())
            .and_then(|config| config.cluster_checks_enabled)
            .unwrap_or_default();

        let cluster_checks = ClusterChecksSpec {
            enabled: cluster_checks_enabled,
            use_cluster_checks_runners: cluster_checks_enabled
                && agent.spec.cluster_checks_runner.is_some(),
        };

        AgentSpec {
            features: FeaturesSpec {
                prometheus_scrape,
                cluster_checks,
            },
            overrides: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_shapes_normalize_to_the_same_scrape_spec() {
        let current: v2alpha1::DatadogAgent = serde_yaml::from_str(
            r#"
spec:
  features:
    prometheusScrape:
      enabled: true
      enableServiceEndpoints: true
      additionalConfigs: "- {}"
"#,
        )
        .unwrap();

        let legacy: v1alpha1::DatadogAgent = serde_yaml::from_str(
            r#"
spec:
  features:
    prometheusScrape:
      enabled: true
      serviceEndpoints: true
      additionalConfigs: "- {}"
"#,
        )
        .unwrap();

        assert_eq!(
            AgentSpec::from_v2alpha1(&current).features.prometheus_scrape,
            AgentSpec::from_v1alpha1(&legacy).features.prometheus_scrape,
        );
    }

    #[test]
    fn absent_feature_block_normalizes_to_disabled() {
        let agent = v2alpha1::DatadogAgent::default();
        let spec = AgentSpec::from_v2alpha1(&agent);
        assert!(!spec.features.prometheus_scrape.enabled);
        assert!(!spec.features.cluster_checks.enabled);
    }

    #[test]
    fn legacy_runner_component_implies_runner_usage() {
        let legacy: v1alpha1::DatadogAgent = serde_yaml::from_str(
            r#"
spec:
  clusterAgent:
    config:
      clusterChecksEnabled: true
  clusterChecksRunner:
    replicas: 2
"#,
        )
        .unwrap();

        let spec = AgentSpec::from_v1alpha1(&legacy);
        assert!(spec.features.cluster_checks.enabled);
        assert!(spec.features.cluster_checks.use_cluster_checks_runners);
    }

    #[test]
    fn legacy_runner_component_without_checks_is_ignored() {
        let legacy: v1alpha1::DatadogAgent = serde_yaml::from_str(
            r#"
spec:
  clusterChecksRunner:
    replicas: 2
"#,
        )
        .unwrap();

        let spec = AgentSpec::from_v1alpha1(&legacy);
        assert!(!spec.features.cluster_checks.enabled);
        assert!(!spec.features.cluster_checks.use_cluster_checks_runners);
    }
}
