// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

#[cfg_attr(target_arch = "wasm32", path = "web_sys.rs")]
#[cfg_attr(not(target_arch = "wasm32"), path = "reqwest.rs")]
pub mod implementation;

use bytes::Bytes;

pub use self::implementation::ApiClientCore as ApiClientCoreImpl;
use crate::error::HttpError;

/// One outgoing POST. The response must carry `expected_content_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRequest {
    pub url: String,
    pub body: Bytes,
    pub content_type: &'static str,
    pub expected_content_type: &'static str,
}

/// Transport under [`crate::BaseApiClient`]: reqwest natively, `fetch` in the browser.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait ApiClientCore {
    async fn post(&self, request: PostRequest) -> Result<Bytes, HttpError>;
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl ApiClientCore for ApiClientCoreImpl {
    async fn post(&self, request: PostRequest) -> Result<Bytes, HttpError> {
        self.post(request).await
    }
}

pub mod test_utils {
    use super::*;

    use std::pin::Pin;

    type ResultFuture = dyn futures::Future<Output = Result<Bytes, HttpError>> + Send;
    type Responder = dyn Fn(PostRequest) -> Pin<Box<ResultFuture>> + Send + Sync;

    /// Fake transport answering each [`PostRequest`] through a closure.
    ///
    /// ```rust
    /// use futures::FutureExt;
    ///
    /// use http_client::{BaseApiClient, HttpError};
    /// use http_client::test_utils::ApiClientCoreMock;
    ///
    /// let mock = ApiClientCoreMock::from(|request: http_client::PostRequest| {
    ///     // the closure returns a boxed future
    ///     async move {
    ///         if request.url.contains("broken") {
    ///             Err(HttpError::RequestError {
    ///                 ctx: request.url,
    ///                 status: Some(500),
    ///                 source: "internal server error".into(),
    ///             })
    ///         } else {
    ///             Ok(r#"{"results": []}"#.as_bytes().into())
    ///         }
    ///     }.boxed()
    /// });
    /// let client = BaseApiClient::from(mock);
    ///
    /// let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    /// rt.block_on(async {
    ///     client.form_json_post::<serde_json::Value>("example.com/query/sequence", &[("fasta", ">q\nMKV")]).await.unwrap();
    ///     client.form_json_post::<serde_json::Value>("example.com/broken", &[]).await.unwrap_err();
    /// });
    /// ```
    pub struct ApiClientCoreMock {
        responder: Box<Responder>,
    }

    #[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
    #[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
    impl ApiClientCore for ApiClientCoreMock {
        async fn post(&self, request: PostRequest) -> Result<Bytes, HttpError> {
            (self.responder)(request).await
        }
    }

    impl<F> From<F> for ApiClientCoreMock
    where
        F: Fn(PostRequest) -> Pin<Box<ResultFuture>> + Send + Sync + 'static,
    {
        fn from(responder: F) -> Self {
            Self {
                responder: Box::new(responder),
            }
        }
    }
}
