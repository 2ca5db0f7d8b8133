use thiserror::Error;
use tracing::metadata::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("unable to install the global logging subscriber: `{0}`")]
    TryInit(String),
}

pub struct Logging;

impl Logging {
    /// Installs the global tracing subscriber for the operator process.
    ///
    /// The default level is INFO; `RUST_LOG` overrides it per target.
    /// Fails if a subscriber is already installed.
    pub fn try_init() -> Result<(), LoggingError> {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::builder()
                    .with_default_directive(LevelFilter::INFO.into())
                    .from_env_lossy(),
            )
            .try_init()
            .map_err(|err| LoggingError::TryInit(err.to_string()))
    }
}
