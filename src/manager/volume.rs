use k8s_openapi::api::core::v1::Volume;

/// Accumulates pod-scoped volumes for one reconcile pass.
///
/// Append-only, no deduplication: callers pick well-known,
/// collision-resistant volume names.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VolumeManager {
    volumes: Vec<Volume>,
}

impl VolumeManager {
    pub fn add_volume(&mut self, volume: Volume) {
        self.volumes.push(volume);
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }
}
