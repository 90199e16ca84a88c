use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to request remote configuration: {0}")]
    Request(#[source] reqwest::Error),
    #[error("remote configuration request failed with HTTP {status}{body_snippet}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body_snippet: String,
    },
    #[error("failed to read remote configuration body: {0}")]
    Body(#[source] reqwest::Error),
    #[error("remote configuration response was empty")]
    EmptyBody,
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("configuration is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration root must be an object, found {found}")]
    UnexpectedRoot { found: &'static str },
    #[error("platform entry `{key}` must be an object")]
    PlatformEntry { key: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error ({kind}): {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },
    #[error("store contents could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PresentError {
    #[error("no presentation target is available")]
    NoTarget,
    #[error("presentation failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum GateError {
    #[error("invalid {which} URL `{value}`: {source}")]
    InvalidUrl {
        which: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::{ParseError, PresentError, StoreError};

    #[test]
    fn io_error_conversion_maps_to_io_variant() {
        let mapped = StoreError::from(std::io::Error::other("disk full"));
        assert!(
            matches!(mapped, StoreError::Io { kind, ref message } if kind == std::io::ErrorKind::Other && message.contains("disk full"))
        );
    }

    #[test]
    fn unexpected_root_display_names_found_kind() {
        let error = ParseError::UnexpectedRoot { found: "an array" };

        assert_eq!(
            error.to_string(),
            "configuration root must be an object, found an array"
        );
    }

    #[test]
    fn no_target_display() {
        assert_eq!(
            PresentError::NoTarget.to_string(),
            "no presentation target is available"
        );
    }
}
