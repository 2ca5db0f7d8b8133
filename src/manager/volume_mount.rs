use crate::api::common::ContainerRole;
use k8s_openapi::api::core::v1::VolumeMount;
use std::collections::BTreeMap;

/// Accumulates volume mounts per container for one reconcile pass.
///
/// Same append-only, no-dedup semantics as the environment variable manager.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VolumeMountManager {
    by_container: BTreeMap<ContainerRole, Vec<VolumeMount>>,
}

impl VolumeMountManager {
    pub fn add_volume_mount_to_container(&mut self, mount: VolumeMount, role: ContainerRole) {
        self.by_container.entry(role).or_default().push(mount);
    }

    pub fn add_volume_mount_to_containers(&mut self, mount: VolumeMount, roles: &[ContainerRole]) {
        for role in roles {
            self.add_volume_mount_to_container(mount.clone(), *role);
        }
    }

    pub fn volume_mounts(&self, role: ContainerRole) -> &[VolumeMount] {
        self.by_container
            .get(&role)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn by_container(&self) -> &BTreeMap<ContainerRole, Vec<VolumeMount>> {
        &self.by_container
    }
}
