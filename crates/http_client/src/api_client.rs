// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use crate::api_client_core::{ApiClientCore, ApiClientCoreImpl, PostRequest};
use crate::content_type::{FORM_URLENCODED, JSON};
use crate::error::HttpError;
use shared_types::requests::RequestId;

/// Helper for querying the search API
#[derive(Clone)]
pub struct BaseApiClient {
    // 99% of the time this is going to be ApiClientCoreImpl, but it's overrideable for mocking purposes
    // ApiClientCoreImpl is the platform-dependent, reqwest (native) or web-sys (wasm) implmentation
    core: Arc<dyn ApiClientCore + Send + Sync>,
}

impl<Core: ApiClientCore + Send + Sync + 'static> From<Core> for BaseApiClient {
    fn from(core: Core) -> Self {
        Self {
            core: Arc::new(core),
        }
    }
}

impl BaseApiClient {
    /// Construct a new ApiClient for the given RequestId. It will attach this
    /// id to each request it makes.
    pub fn new(request_id: RequestId) -> Self {
        ApiClientCoreImpl::new(request_id).into()
    }

    /// Post form fields (`application/x-www-form-urlencoded`), get JSON.
    /// Returns error for >=400 status.
    pub async fn form_json_post<O: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        fields: &[(&str, &str)],
    ) -> Result<O, HttpError> {
        let body = encode_form(fields);
        self.bytes_json_post(url, body.into(), FORM_URLENCODED)
            .await
    }

    /// Post bytes, get JSON. Bring your own content-type. Returns error for >=400 status.
    pub async fn bytes_json_post<O: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: Bytes,
        content_type: &'static str,
    ) -> Result<O, HttpError> {
        let bytes = self
            .raw_post(url, body, content_type, JSON)
            .await?;

        serde_json::from_slice(&bytes).map_err(|e| {
            let error_text = format_serde_error_from_bytes(bytes.into(), e);
            HttpError::DecodeError {
                decoding: format!("json from {url}"),
                source: error_text.into(),
            }
        })
    }

    pub(crate) async fn raw_post(
        &self,
        url: &str,
        body: Bytes,
        content_type: &'static str,
        expected_content_type: &'static str,
    ) -> Result<Bytes, HttpError> {
        self.core
            .post(PostRequest {
                url: url.to_owned(),
                body,
                content_type,
                expected_content_type,
            })
            .await
    }
}

impl fmt::Debug for BaseApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseApiClient").finish_non_exhaustive()
    }
}

/// Encodes fields the way browsers encode a form submission.
pub fn encode_form(fields: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish()
}

fn format_serde_error_from_bytes(
    bytes: Vec<u8>,
    e: impl Into<format_serde_error::ErrorTypes>,
) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => format_serde_error::SerdeError::new(text, e).to_string(),
        Err(err) => err.to_string(),
    }
}
