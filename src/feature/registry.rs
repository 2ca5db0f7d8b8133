//! Registry of feature constructors.
//!
//! The registry is an ordinary value assembled once at program start and
//! passed by reference into the build pipeline; there is no hidden global
//! registration. After assembly it is only read, so sharing it across
//! reconcile workers is safe.

use super::{cluster_checks, prometheus_scrape, Feature, FeatureId, FeatureOptions};
use std::collections::BTreeMap;
use thiserror::Error;

pub type FeatureBuilder = fn(&FeatureOptions) -> Box<dyn Feature>;

#[derive(Error, Debug, PartialEq)]
pub enum RegistryError {
    #[error("unknown feature: `{0}`")]
    UnknownFeature(FeatureId),
}

#[derive(Default)]
pub struct FeatureRegistry {
    builders: BTreeMap<FeatureId, FeatureBuilder>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every stock feature registered.
    pub fn with_default_features() -> Self {
        let mut registry = Self::new();
        registry.register(FeatureId::PrometheusScrape, prometheus_scrape::build);
        registry.register(FeatureId::ClusterChecks, cluster_checks::build);
        registry
    }

    /// Registers a feature constructor.
    ///
    /// # Panics
    ///
    /// Panics if `id` is already registered. A silent override of a feature
    /// implementation would be a correctness hazard, and registration only
    /// happens at process start, so this is a fatal configuration error.
    pub fn register(&mut self, id: FeatureId, builder: FeatureBuilder) {
        if self.builders.insert(id, builder).is_some() {
            panic!("feature `{id}` registered twice");
        }
    }

    pub fn build(
        &self,
        id: FeatureId,
        options: &FeatureOptions,
    ) -> Result<Box<dyn Feature>, RegistryError> {
        self.builders
            .get(&id)
            .map(|builder| builder(options))
            .ok_or(RegistryError::UnknownFeature(id))
    }

    /// Instantiates every registered feature, in id order.
    pub fn build_all(&self, options: &FeatureOptions) -> Vec<Box<dyn Feature>> {
        self.builders
            .values()
            .map(|builder| builder(options))
            .collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = FeatureId> + '_ {
        self.builders.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}
