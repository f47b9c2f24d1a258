/// All errors that can occur in the pgrest-client crates.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// The underlying send failed (connectivity, DNS, TLS, timeout).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not valid JSON, or not a row shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The API answered with a non-2xx status and (usually) a JSON error body.
    #[error("Remote error ({status}): {message}")]
    Remote {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// Invalid configuration (bad header value, missing field).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The base URL could not be parsed.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl RestError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn remote(status: u16, message: impl Into<String>, code: Option<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
            code,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// HTTP status for remote errors, `None` for everything else.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RestError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Result alias using RestError.
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_remote() {
        let err = RestError::remote(409, "duplicate key value", Some("23505".into()));
        assert_eq!(err.to_string(), "Remote error (409): duplicate key value");
    }

    #[test]
    fn error_display_decode() {
        let err = RestError::decode("expected value at line 1");
        assert_eq!(err.to_string(), "Decode error: expected value at line 1");
    }

    #[test]
    fn error_display_invalid_config() {
        let err = RestError::config("missing api key");
        assert_eq!(err.to_string(), "Invalid configuration: missing api key");
    }

    #[test]
    fn status_only_on_remote() {
        assert_eq!(RestError::remote(404, "not found", None).status(), Some(404));
        assert_eq!(RestError::decode("bad").status(), None);
    }

    #[test]
    fn error_converts_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: RestError = parse_err.into();
        assert!(matches!(err, RestError::Decode(_)));
    }
}
