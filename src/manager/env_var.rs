use crate::api::common::ContainerRole;
use k8s_openapi::api::core::v1::EnvVar;
use std::collections::BTreeMap;

/// Accumulates environment variables per container for one reconcile pass.
///
/// Entries are append-only and never deduplicated by name: two appends of
/// the same name coexist as two entries, in call order. Consumers that need
/// a single value must dedupe themselves.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnvVarManager {
    by_container: BTreeMap<ContainerRole, Vec<EnvVar>>,
}

impl EnvVarManager {
    pub fn add_env_var_to_container(&mut self, role: ContainerRole, env_var: EnvVar) {
        self.by_container.entry(role).or_default().push(env_var);
    }

    pub fn add_env_var_to_containers(&mut self, roles: &[ContainerRole], env_var: EnvVar) {
        for role in roles {
            self.add_env_var_to_container(*role, env_var.clone());
        }
    }

    pub fn env_vars(&self, role: ContainerRole) -> &[EnvVar] {
        self.by_container
            .get(&role)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn by_container(&self) -> &BTreeMap<ContainerRole, Vec<EnvVar>> {
        &self.by_container
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(name: &str, value: &str) -> EnvVar {
        EnvVar {
            name: name.to_string(),
            value: Some(value.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn appends_keep_call_order_and_duplicates() {
        let mut manager = EnvVarManager::default();
        manager.add_env_var_to_container(ContainerRole::CoreAgent, env("DD_A", "1"));
        manager.add_env_var_to_container(ContainerRole::CoreAgent, env("DD_B", "2"));
        manager.add_env_var_to_container(ContainerRole::CoreAgent, env("DD_A", "3"));

        let vars = manager.env_vars(ContainerRole::CoreAgent);
        assert_eq!(3, vars.len());
        assert_eq!(env("DD_A", "1"), vars[0]);
        assert_eq!(env("DD_B", "2"), vars[1]);
        assert_eq!(env("DD_A", "3"), vars[2]);
    }

    #[test]
    fn multi_container_append_clones_to_each_role() {
        let mut manager = EnvVarManager::default();
        manager.add_env_var_to_containers(
            &[ContainerRole::CoreAgent, ContainerRole::ClusterAgent],
            env("DD_A", "1"),
        );

        assert_eq!(1, manager.env_vars(ContainerRole::CoreAgent).len());
        assert_eq!(1, manager.env_vars(ContainerRole::ClusterAgent).len());
        assert!(manager.env_vars(ContainerRole::TraceAgent).is_empty());
    }
}
