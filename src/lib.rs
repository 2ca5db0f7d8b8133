pub mod api;
pub mod datadog_client;
pub mod dependencies;
pub mod feature;
pub mod logging;
pub mod manager;
pub mod overrides;
pub mod pipeline;

pub use crate::api::agent_spec::AgentSpec;
pub use crate::feature::registry::FeatureRegistry;
pub use crate::pipeline::{BuildPipeline, ReconcileResult};
