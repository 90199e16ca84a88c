use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Paths(#[from] launchgate_platform::AppPathsError),

    #[error("no {0} configured; pass --{0} or set it in the settings file")]
    MissingSetting(&'static str),

    #[error(transparent)]
    Gate(#[from] launchgate_core::GateError),

    #[error(transparent)]
    Fetcher(#[from] launchgate_core::FetchError),

    #[error(transparent)]
    Parse(#[from] launchgate_core::ParseError),

    #[error("failed to read {path}: {source}")]
    ReadDocument {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}
