//! Credential and endpoint bootstrap for the Datadog API client.
//!
//! Only the authenticated context is produced here; the HTTP transport and
//! the telemetry calls live in the surrounding operator.

use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use url::Url;

const API_URL_PREFIX: &str = "https://api.";
const DEFAULT_SITE: &str = "datadoghq.com";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub app_key: String,
}

/// Optional endpoint selection: an explicit URL wins over a site.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct EndpointConfig {
    pub url: Option<String>,
    pub site: Option<String>,
}

#[derive(Error, Debug)]
pub enum DatadogClientError {
    #[error("error obtaining API key and/or app key")]
    MissingCredentials,

    #[error("invalid API URL: `{0}`")]
    InvalidUrl(#[from] url::ParseError),

    #[error("missing protocol or host: `{0}`")]
    MissingHostOrScheme(String),
}

/// Authenticated context for the Datadog API.
#[derive(Clone, Debug, PartialEq)]
pub struct DatadogClient {
    base_url: Url,
    credentials: Credentials,
}

impl DatadogClient {
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.credentials.api_key
    }

    pub fn app_key(&self) -> &str {
        &self.credentials.app_key
    }
}

/// Establishes the client context from credentials and endpoint selection.
///
/// Fails descriptively instead of falling back to defaults: empty keys, an
/// unparsable URL, or a URL without host or scheme are all rejected.
pub fn init_client(
    credentials: Credentials,
    endpoint: &EndpointConfig,
) -> Result<DatadogClient, DatadogClientError> {
    if credentials.api_key.is_empty() || credentials.app_key.is_empty() {
        return Err(DatadogClientError::MissingCredentials);
    }

    let api_url = match (&endpoint.url, &endpoint.site) {
        (Some(url), _) => url.clone(),
        (None, Some(site)) => format!("{API_URL_PREFIX}{}", site.trim()),
        (None, None) => format!("{API_URL_PREFIX}{DEFAULT_SITE}"),
    };
    info!(url = %api_url, "using Datadog API URL");

    let base_url = Url::parse(&api_url)?;
    if base_url.host_str().is_none() || base_url.scheme().is_empty() {
        return Err(DatadogClientError::MissingHostOrScheme(api_url));
    }

    Ok(DatadogClient {
        base_url,
        credentials,
    })
}
