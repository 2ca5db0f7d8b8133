use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("invalid YAML: `{0}`")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON encoding failed: `{0}`")]
    Json(#[from] serde_json::Error),
}

/// Re-encodes a YAML document as compact JSON.
///
/// Users author additional check configurations as YAML in the custom
/// resource, while the agent expects the corresponding environment variable
/// to carry JSON.
pub fn yaml_to_json_string(yaml: &str) -> Result<String, ConversionError> {
    let value: serde_json::Value = serde_yaml::from_str(yaml)?;
    Ok(serde_json::to_string(&value)?)
}
