//! Cluster check dispatching.
//!
//! Enables check dispatch on the cluster agent and routes execution either
//! to the node agents or to a dedicated pool of cluster-checks runners.

use super::{
    Feature, FeatureError, FeatureId, FeatureOptions, RequiredComponent, RequiredComponents,
};
use crate::api::agent_spec::AgentSpec;
use crate::api::common::{
    ContainerRole, DD_CLUSTER_CHECKS_ENABLED, DD_EXTRA_CONFIG_PROVIDERS, DD_EXTRA_LISTENERS,
};
use crate::manager::PodTemplateManagers;
use k8s_openapi::api::core::v1::EnvVar;

const KUBE_SERVICES_AND_ENDPOINTS_PROVIDERS: &str = "kube_services kube_endpoints";
const KUBE_SERVICES_AND_ENDPOINTS_LISTENERS: &str = "kube_services kube_endpoints";
const CLUSTER_CHECKS_CONFIG_PROVIDER: &str = "clusterchecks";
const ENDPOINTS_CHECKS_CONFIG_PROVIDER: &str = "endpointschecks";
const CLUSTER_AND_ENDPOINTS_CONFIG_PROVIDERS: &str = "clusterchecks endpointschecks";

pub fn build(_options: &FeatureOptions) -> Box<dyn Feature> {
    Box::<ClusterChecksFeature>::default()
}

#[derive(Debug, Default)]
pub struct ClusterChecksFeature {
    enabled: bool,
    use_cluster_checks_runners: bool,
}

fn env(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.to_string()),
        ..Default::default()
    }
}

impl Feature for ClusterChecksFeature {
    fn id(&self) -> FeatureId {
        FeatureId::ClusterChecks
    }

    fn configure(&mut self, spec: &AgentSpec) -> RequiredComponents {
        let checks = &spec.features.cluster_checks;
        if !checks.enabled {
            return RequiredComponents::default();
        }

        self.enabled = true;
        self.use_cluster_checks_runners = checks.use_cluster_checks_runners;

        let cluster_checks_runner = if self.use_cluster_checks_runners {
            RequiredComponent::required_with([ContainerRole::ClusterChecksRunner])
        } else {
            // Explicitly not required so another feature's silence cannot
            // accidentally schedule the runner pool.
            RequiredComponent::not_required()
        };

        RequiredComponents {
            node_agent: RequiredComponent::required_with([ContainerRole::CoreAgent]),
            cluster_agent: RequiredComponent::required_with([ContainerRole::ClusterAgent]),
            cluster_checks_runner,
        }
    }

    fn manage_node_agent(&mut self, managers: &mut PodTemplateManagers) -> Result<(), FeatureError> {
        if !self.enabled {
            return Ok(());
        }

        let providers = if self.use_cluster_checks_runners {
            ENDPOINTS_CHECKS_CONFIG_PROVIDER
        } else {
            CLUSTER_AND_ENDPOINTS_CONFIG_PROVIDERS
        };
        managers
            .env_var()
            .add_env_var_to_container(ContainerRole::CoreAgent, env(DD_EXTRA_CONFIG_PROVIDERS, providers));

        Ok(())
    }

    fn manage_cluster_agent(
        &mut self,
        managers: &mut PodTemplateManagers,
    ) -> Result<(), FeatureError> {
        if !self.enabled {
            return Ok(());
        }

        let env_var = managers.env_var();
        env_var.add_env_var_to_container(
            ContainerRole::ClusterAgent,
            env(DD_CLUSTER_CHECKS_ENABLED, "true"),
        );
        env_var.add_env_var_to_container(
            ContainerRole::ClusterAgent,
            env(DD_EXTRA_CONFIG_PROVIDERS, KUBE_SERVICES_AND_ENDPOINTS_PROVIDERS),
        );
        env_var.add_env_var_to_container(
            ContainerRole::ClusterAgent,
            env(DD_EXTRA_LISTENERS, KUBE_SERVICES_AND_ENDPOINTS_LISTENERS),
        );

        Ok(())
    }

    fn manage_cluster_checks_runner(
        &mut self,
        managers: &mut PodTemplateManagers,
    ) -> Result<(), FeatureError> {
        if !(self.enabled && self.use_cluster_checks_runners) {
            return Ok(());
        }

        let env_var = managers.env_var();
        env_var.add_env_var_to_container(
            ContainerRole::ClusterChecksRunner,
            env(DD_CLUSTER_CHECKS_ENABLED, "true"),
        );
        env_var.add_env_var_to_container(
            ContainerRole::ClusterChecksRunner,
            env(DD_EXTRA_CONFIG_PROVIDERS, CLUSTER_CHECKS_CONFIG_PROVIDER),
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::agent_spec::{ClusterChecksSpec, FeaturesSpec};
    use crate::feature::RequiredState;

    fn spec(checks: ClusterChecksSpec) -> AgentSpec {
        AgentSpec {
            features: FeaturesSpec {
                cluster_checks: checks,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn runners_enabled_requires_the_runner_workload() {
        let mut feature = ClusterChecksFeature::default();
        let required = feature.configure(&spec(ClusterChecksSpec {
            enabled: true,
            use_cluster_checks_runners: true,
        }));

        assert_eq!(RequiredState::Required, required.cluster_checks_runner.required);
        assert!(required
            .cluster_checks_runner
            .containers
            .contains(&ContainerRole::ClusterChecksRunner));

        let mut managers = PodTemplateManagers::new([ContainerRole::ClusterChecksRunner]);
        feature.manage_cluster_checks_runner(&mut managers).unwrap();
        let vars = managers.env_vars(ContainerRole::ClusterChecksRunner);
        assert_eq!(2, vars.len());
        assert_eq!(DD_CLUSTER_CHECKS_ENABLED, vars[0].name);
        assert_eq!(Some("clusterchecks".to_string()), vars[1].value);
    }

    #[test]
    fn runners_disabled_marks_the_workload_explicitly_not_required() {
        let mut feature = ClusterChecksFeature::default();
        let required = feature.configure(&spec(ClusterChecksSpec {
            enabled: true,
            use_cluster_checks_runners: false,
        }));

        assert_eq!(
            RequiredState::NotRequired,
            required.cluster_checks_runner.required
        );

        let mut node_agent = PodTemplateManagers::new([ContainerRole::CoreAgent]);
        feature.manage_node_agent(&mut node_agent).unwrap();
        let vars = node_agent.env_vars(ContainerRole::CoreAgent);
        assert_eq!(
            Some("clusterchecks endpointschecks".to_string()),
            vars[0].value
        );
    }

    #[test]
    fn cluster_agent_gets_dispatch_env_vars() {
        let mut feature = ClusterChecksFeature::default();
        feature.configure(&spec(ClusterChecksSpec {
            enabled: true,
            use_cluster_checks_runners: true,
        }));

        let mut managers = PodTemplateManagers::new([ContainerRole::ClusterAgent]);
        feature.manage_cluster_agent(&mut managers).unwrap();

        let names: Vec<&str> = managers
            .env_vars(ContainerRole::ClusterAgent)
            .iter()
            .map(|env| env.name.as_str())
            .collect();
        assert_eq!(
            vec![
                DD_CLUSTER_CHECKS_ENABLED,
                DD_EXTRA_CONFIG_PROVIDERS,
                DD_EXTRA_LISTENERS
            ],
            names
        );
    }

    #[test]
    fn disabled_feature_touches_nothing() {
        let mut feature = ClusterChecksFeature::default();
        let required = feature.configure(&spec(ClusterChecksSpec::default()));
        assert_eq!(RequiredComponents::default(), required);

        let mut managers = PodTemplateManagers::new([ContainerRole::CoreAgent]);
        let before = managers.clone();
        feature.manage_node_agent(&mut managers).unwrap();
        feature.manage_cluster_agent(&mut managers).unwrap();
        feature.manage_cluster_checks_runner(&mut managers).unwrap();
        assert_eq!(before, managers);
    }
}
