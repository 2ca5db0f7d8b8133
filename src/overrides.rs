//! Generic, feature-agnostic per-container overrides.
//!
//! The override stage runs strictly after every feature's `manage_*` stage:
//! whatever the user declares here lands on top of the accumulated state.

use crate::api::common::{
    app_armor_annotation_key, ContainerRole, DD_HEALTH_PORT, DD_LOG_LEVEL,
    SECCOMP_ROOT_VOLUME_NAME, SECURITY_AGENT_VOLUME_NAME,
};
use crate::manager::PodTemplateManagers;
use k8s_openapi::api::core::v1::{
    ConfigMapVolumeSource, EnvVar, HostPathVolumeSource, Probe, ResourceRequirements,
    SecurityContext, Volume, VolumeMount,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum OverrideError {
    #[error(
        "seccomp override for `{0}` supplies both a custom root path and a custom profile; \
         only one may be set"
    )]
    ConflictingSeccompConfig(ContainerRole),
}

/// Declarative patch for one container, applied after all features.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerOverride {
    /// Replaces the container name in the assembled template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Translated into the reserved `DD_LOG_LEVEL` environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Appended to the container's environment, order preserved.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,

    /// Appended to the container's volume mounts, order preserved.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<VolumeMount>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,

    /// Translated into the reserved `DD_HEALTH_PORT` environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_port: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_probe: Option<Probe>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness_probe: Option<Probe>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_context: Option<SecurityContext>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seccomp_config: Option<SeccompConfig>,

    /// AppArmor profile name, written as the pod annotation
    /// `container.apparmor.security.beta.kubernetes.io/<container-role>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_armor_profile_name: Option<String>,
}

/// Custom seccomp setup for one container. The two fields are mutually
/// exclusive inputs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeccompConfig {
    /// Binds a host path at the well-known `seccomp-root` volume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_root_path: Option<String>,

    /// Binds a ConfigMap at the well-known `datadog-agent-security` volume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_profile: Option<ConfigMapConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMapConfig {
    pub name: String,
}

fn reserved_env(name: &str, value: String) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value),
        ..Default::default()
    }
}

/// Applies one container's override block on top of the managers'
/// accumulated state.
pub fn apply_container_override(
    role: ContainerRole,
    managers: &mut PodTemplateManagers,
    container_override: &ContainerOverride,
) -> Result<(), OverrideError> {
    if let Some(log_level) = &container_override.log_level {
        managers
            .env_var()
            .add_env_var_to_container(role, reserved_env(DD_LOG_LEVEL, log_level.clone()));
    }

    if let Some(port) = container_override.health_port {
        managers
            .env_var()
            .add_env_var_to_container(role, reserved_env(DD_HEALTH_PORT, port.to_string()));
    }

    for env_var in &container_override.env {
        managers.env_var().add_env_var_to_container(role, env_var.clone());
    }

    for mount in &container_override.volume_mounts {
        managers
            .volume_mount()
            .add_volume_mount_to_container(mount.clone(), role);
    }

    if let Some(seccomp) = &container_override.seccomp_config {
        apply_seccomp(role, managers, seccomp)?;
    }

    if let Some(profile) = &container_override.app_armor_profile_name {
        managers
            .annotation()
            .set_annotation(app_armor_annotation_key(role), profile.clone());
    }

    if let Some(container) = managers.container_mut(role) {
        if let Some(resources) = &container_override.resources {
            container.resources = Some(resources.clone());
        }
        if let Some(command) = &container_override.command {
            container.command = Some(command.clone());
        }
        if let Some(args) = &container_override.args {
            container.args = Some(args.clone());
        }
        if let Some(probe) = &container_override.readiness_probe {
            container.readiness_probe = Some(probe.clone());
        }
        if let Some(probe) = &container_override.liveness_probe {
            container.liveness_probe = Some(probe.clone());
        }
        if let Some(security_context) = &container_override.security_context {
            container.security_context = Some(security_context.clone());
        }
        // Rename last so the lookups above still address the role.
        if let Some(name) = &container_override.name {
            container.name = name.clone();
        }
    }

    Ok(())
}

fn apply_seccomp(
    role: ContainerRole,
    managers: &mut PodTemplateManagers,
    seccomp: &SeccompConfig,
) -> Result<(), OverrideError> {
    match (&seccomp.custom_root_path, &seccomp.custom_profile) {
        (Some(_), Some(_)) => Err(OverrideError::ConflictingSeccompConfig(role)),
        (Some(path), None) => {
            managers.volume().add_volume(Volume {
                name: SECCOMP_ROOT_VOLUME_NAME.to_string(),
                host_path: Some(HostPathVolumeSource {
                    path: path.clone(),
                    ..Default::default()
                }),
                ..Default::default()
            });
            Ok(())
        }
        (None, Some(profile)) => {
            managers.volume().add_volume(Volume {
                name: SECURITY_AGENT_VOLUME_NAME.to_string(),
                config_map: Some(ConfigMapVolumeSource {
                    name: Some(profile.name.clone()),
                    ..Default::default()
                }),
                ..Default::default()
            });
            Ok(())
        }
        (None, None) => Ok(()),
    }
}
