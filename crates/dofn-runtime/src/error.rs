use anyhow::Error as AnyError;
use thiserror::Error;

/// Everything that can go wrong while serving one invocation.
///
/// None of these reach the platform: `Shim::handle` logs them and answers
/// with the fixed failure response.
#[derive(Debug, Error)]
pub enum ShimError {
    #[error("invalid event: {source}")]
    InvalidEvent {
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to decode base64 body: {source}")]
    Decode {
        #[from]
        source: base64::DecodeError,
    },
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
    #[error("server error: {source}")]
    Server { source: AnyError },
    #[error("failed to read response body: {source}")]
    Body { source: AnyError },
}

impl ShimError {
    pub fn invalid_event(source: serde_json::Error) -> Self {
        ShimError::InvalidEvent { source }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        ShimError::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn server<E>(error: E) -> Self
    where
        E: Into<AnyError>,
    {
        ShimError::Server {
            source: error.into(),
        }
    }

    pub fn body<E>(error: E) -> Self
    where
        E: Into<AnyError>,
    {
        ShimError::Body {
            source: error.into(),
        }
    }
}

impl From<http::Error> for ShimError {
    fn from(err: http::Error) -> Self {
        ShimError::invalid_request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_wraps_source_error() {
        let err = ShimError::server(anyhow::anyhow!("boom"));
        assert_eq!(err.to_string(), "server error: boom");
    }

    #[test]
    fn decode_error_converts_via_from() {
        use base64::Engine;
        let decode = base64::engine::general_purpose::STANDARD
            .decode("!!!")
            .expect_err("invalid base64");
        let err = ShimError::from(decode);
        assert!(matches!(err, ShimError::Decode { .. }));
        assert!(err.to_string().starts_with("failed to decode base64 body"));
    }

    #[test]
    fn http_error_becomes_invalid_request() {
        let http_err = http::Request::builder()
            .uri("not a uri")
            .body(())
            .expect_err("bad uri");
        let err = ShimError::from(http_err);
        assert!(matches!(err, ShimError::InvalidRequest { .. }));
    }
}
