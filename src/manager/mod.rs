//! Per-reconcile accumulators of pod template mutations.
//!
//! One [`PodTemplateManagers`] is exclusively owned by one reconcile pass;
//! nothing here performs I/O or is shared across passes.

pub mod annotation;
pub mod env_var;
pub mod volume;
pub mod volume_mount;

pub use annotation::AnnotationManager;
pub use env_var::EnvVarManager;
pub use volume::VolumeManager;
pub use volume_mount::VolumeMountManager;

use crate::api::common::ContainerRole;
use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// All mutation accumulators for one workload's pod template.
///
/// Features mutate the managers; the override stage additionally reaches
/// into the pod template for the wholesale container replacements (name,
/// command, resources, probes, security context).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PodTemplateManagers {
    pod_template: PodTemplateSpec,
    env_var: EnvVarManager,
    volume_mount: VolumeMountManager,
    volume: VolumeManager,
    annotation: AnnotationManager,
}

impl PodTemplateManagers {
    /// Seeds a pod template with one container per required role, in role
    /// order.
    pub fn new(roles: impl IntoIterator<Item = ContainerRole>) -> Self {
        let containers = roles
            .into_iter()
            .map(|role| Container {
                name: role.to_string(),
                ..Default::default()
            })
            .collect();

        PodTemplateManagers {
            pod_template: PodTemplateSpec {
                metadata: Some(ObjectMeta::default()),
                spec: Some(PodSpec {
                    containers,
                    ..Default::default()
                }),
            },
            ..Default::default()
        }
    }

    pub fn env_var(&mut self) -> &mut EnvVarManager {
        &mut self.env_var
    }

    pub fn volume_mount(&mut self) -> &mut VolumeMountManager {
        &mut self.volume_mount
    }

    pub fn volume(&mut self) -> &mut VolumeManager {
        &mut self.volume
    }

    pub fn annotation(&mut self) -> &mut AnnotationManager {
        &mut self.annotation
    }

    pub fn pod_template(&self) -> &PodTemplateSpec {
        &self.pod_template
    }

    pub fn containers(&self) -> &[Container] {
        self.pod_template
            .spec
            .as_ref()
            .map(|spec| spec.containers.as_slice())
            .unwrap_or_default()
    }

    /// Looks a container up by its original role name. Containers renamed by
    /// an earlier override are no longer addressable through their role.
    pub fn container_mut(&mut self, role: ContainerRole) -> Option<&mut Container> {
        self.pod_template
            .spec
            .as_mut()?
            .containers
            .iter_mut()
            .find(|container| container.name == role.as_str())
    }

    // Read-only views over the accumulated state.

    pub fn env_vars(&self, role: ContainerRole) -> &[k8s_openapi::api::core::v1::EnvVar] {
        self.env_var.env_vars(role)
    }

    pub fn volume_mounts(&self, role: ContainerRole) -> &[k8s_openapi::api::core::v1::VolumeMount] {
        self.volume_mount.volume_mounts(role)
    }

    pub fn volumes(&self) -> &[k8s_openapi::api::core::v1::Volume] {
        self.volume.volumes()
    }

    pub fn annotations(&self) -> &std::collections::BTreeMap<String, String> {
        self.annotation.annotations()
    }
}
