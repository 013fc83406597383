// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use bytes::Bytes;
use tracing::debug;

use super::PostRequest;
use crate::content_type::check_content_type;
use crate::error::HttpError;
use shared_types::requests::RequestId;

#[derive(Debug, Clone)]
pub struct ApiClientCore {
    client: reqwest::Client, // cheaply cloneable (Arc<...> internally), see docs
}

impl ApiClientCore {
    pub fn new(request_id: RequestId) -> Self {
        let mut default_headers = reqwest::header::HeaderMap::with_capacity(1);
        default_headers.insert(
            RequestId::FIELD,
            reqwest::header::HeaderValue::from_str(&request_id.0).unwrap_or(
                reqwest::header::HeaderValue::from_static("non-ascii request id"),
            ),
        );

        let client = reqwest::ClientBuilder::new()
            .default_headers(default_headers)
            .cookie_store(true)
            .build()
            .unwrap_or_else(|err| {
                // only fails if the TLS backend can't be initialized; fall back to reqwest's defaults
                tracing::warn!("http_client: couldn't build configured client: {err}");
                reqwest::Client::new()
            });

        Self { client }
    }

    /// Posts `request.body`. Fails on a status >= 400 or when the response
    /// isn't `request.expected_content_type`.
    pub(crate) async fn post(&self, request: PostRequest) -> Result<Bytes, HttpError> {
        let PostRequest {
            url,
            body,
            content_type,
            expected_content_type,
        } = request;
        let rb = self
            .client
            .post(&url)
            .body(body)
            .header(reqwest::header::CONTENT_TYPE, content_type);

        debug!("http_client: requesting {url}");

        let response = rb.send().await.map_err(|e| HttpError::RequestError {
            ctx: format!("requesting {url}"),
            status: None,
            source: Box::new(e),
        })?;

        let status = response.status();
        debug!("http_client: response from {url:?}: {status}");

        let ctx = || format!("requesting {url}");
        let content_type_err = check_content_type(
            response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            expected_content_type,
        )
        .err();
        let bytes = response.bytes().await.map_err(|e| HttpError::RequestError {
            ctx: ctx(),
            status: Some(status.as_u16()),
            source: Box::new(e),
        })?;

        if status.is_client_error() || status.is_server_error() {
            return Err(HttpError::RequestError {
                ctx: ctx(),
                status: Some(status.as_u16()),
                source: format!("{status}: {}", String::from_utf8_lossy(&bytes)).into(),
            });
        }
        if let Some(err) = content_type_err {
            return Err(HttpError::RequestError {
                ctx: ctx(),
                status: Some(status.as_u16()),
                source: format!("{status}: {err}: {}", String::from_utf8_lossy(&bytes)).into(),
            });
        }
        Ok(bytes)
    }
}
