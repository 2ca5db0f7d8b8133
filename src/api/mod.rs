pub mod agent_spec;
pub mod common;
pub mod utils;
pub mod v1alpha1;
pub mod v2alpha1;
