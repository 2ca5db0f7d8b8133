//! Auxiliary cluster objects collected during a reconcile pass.

use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// In-memory store of the auxiliary objects features need alongside the
/// workloads (today: ConfigMaps). The surrounding reconciler applies them
/// to the cluster; nothing here talks to the API.
///
/// Keyed by object name, last write wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DependencyStore {
    config_maps: BTreeMap<String, ConfigMap>,
}

impl DependencyStore {
    pub fn add_config_map(&mut self, name: &str, data: BTreeMap<String, String>) {
        let config_map = ConfigMap {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            data: Some(data),
            ..Default::default()
        };
        self.config_maps.insert(name.to_string(), config_map);
    }

    pub fn config_map(&self, name: &str) -> Option<&ConfigMap> {
        self.config_maps.get(name)
    }

    pub fn config_maps(&self) -> impl Iterator<Item = &ConfigMap> {
        self.config_maps.values()
    }

    pub fn is_empty(&self) -> bool {
        self.config_maps.is_empty()
    }
}
