// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("while {ctx}: {status_wrap}: {source}", status_wrap=StatusWrapper(*status))]
    RequestError {
        ctx: String,
        /// The HTTP status code of the error, or None if no response arrived.
        status: Option<u16>,
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
    #[error("decoding {decoding}: {source}")]
    DecodeError {
        decoding: String,
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
    #[error("in js: {error}")]
    JsError { error: String },
}

impl HttpError {
    /// The HTTP status the server answered with, if the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::RequestError { status, .. } => *status,
            HttpError::DecodeError { .. } | HttpError::JsError { .. } => None,
        }
    }
}

struct StatusWrapper(Option<u16>);

impl std::fmt::Display for StatusWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            None => f.write_str("no status"),
            Some(status) => write!(f, "status: {status}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context_and_status() {
        let err = HttpError::RequestError {
            ctx: "requesting https://example.com/query/sequence".into(),
            status: Some(500),
            source: "500 Internal Server Error: boom".into(),
        };
        assert_eq!(
            err.to_string(),
            "while requesting https://example.com/query/sequence: status: 500: 500 Internal Server Error: boom"
        );
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn display_without_status() {
        let err = HttpError::RequestError {
            ctx: "requesting x".into(),
            status: None,
            source: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "while requesting x: no status: connection refused");
        assert_eq!(err.status(), None);
    }
}
