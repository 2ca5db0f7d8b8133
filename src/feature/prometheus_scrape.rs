//! Prometheus autodiscovery scraping.
//!
//! Turns the scrape section of the spec into the agent-side environment
//! variables on both the node agent and the cluster agent.

use super::{
    Feature, FeatureError, FeatureId, FeatureOptions, RequiredComponent, RequiredComponents,
};
use crate::api::agent_spec::AgentSpec;
use crate::api::common::{
    ContainerRole, DD_PROMETHEUS_SCRAPE_CHECKS, DD_PROMETHEUS_SCRAPE_ENABLED,
    DD_PROMETHEUS_SCRAPE_SERVICE_ENDPOINTS,
};
use crate::api::utils::yaml_to_json_string;
use crate::manager::PodTemplateManagers;
use k8s_openapi::api::core::v1::EnvVar;
use tracing::warn;

pub fn build(_options: &FeatureOptions) -> Box<dyn Feature> {
    Box::<PrometheusScrapeFeature>::default()
}

#[derive(Debug, Default)]
pub struct PrometheusScrapeFeature {
    enabled: bool,
    enable_service_endpoints: bool,
    additional_configs: Option<String>,
}

impl PrometheusScrapeFeature {
    fn add_env_vars(&self, managers: &mut PodTemplateManagers, role: ContainerRole) {
        managers.env_var().add_env_var_to_container(
            role,
            EnvVar {
                name: DD_PROMETHEUS_SCRAPE_ENABLED.to_string(),
                value: Some("true".to_string()),
                ..Default::default()
            },
        );
        managers.env_var().add_env_var_to_container(
            role,
            EnvVar {
                name: DD_PROMETHEUS_SCRAPE_SERVICE_ENDPOINTS.to_string(),
                value: Some(self.enable_service_endpoints.to_string()),
                ..Default::default()
            },
        );

        if let Some(configs) = &self.additional_configs {
            match yaml_to_json_string(configs) {
                Ok(json) => managers.env_var().add_env_var_to_container(
                    role,
                    EnvVar {
                        name: DD_PROMETHEUS_SCRAPE_CHECKS.to_string(),
                        value: Some(json),
                        ..Default::default()
                    },
                ),
                Err(err) => {
                    warn!(%err, "skipping additional prometheus scrape configurations")
                }
            }
        }
    }
}

impl Feature for PrometheusScrapeFeature {
    fn id(&self) -> FeatureId {
        FeatureId::PrometheusScrape
    }

    fn configure(&mut self, spec: &AgentSpec) -> RequiredComponents {
        let scrape = &spec.features.prometheus_scrape;
        if !scrape.enabled {
            return RequiredComponents::default();
        }

        self.enabled = true;
        self.enable_service_endpoints = scrape.enable_service_endpoints;
        // An empty configs string is the same as no configs at all.
        self.additional_configs = scrape
            .additional_configs
            .clone()
            .filter(|configs| !configs.is_empty());

        RequiredComponents {
            node_agent: RequiredComponent::required_with([ContainerRole::CoreAgent]),
            cluster_agent: RequiredComponent::required_with([ContainerRole::ClusterAgent]),
            ..Default::default()
        }
    }

    fn manage_node_agent(&mut self, managers: &mut PodTemplateManagers) -> Result<(), FeatureError> {
        if !self.enabled {
            return Ok(());
        }
        self.add_env_vars(managers, ContainerRole::CoreAgent);
        Ok(())
    }

    fn manage_cluster_agent(
        &mut self,
        managers: &mut PodTemplateManagers,
    ) -> Result<(), FeatureError> {
        if !self.enabled {
            return Ok(());
        }
        self.add_env_vars(managers, ContainerRole::ClusterAgent);
        Ok(())
    }
}
