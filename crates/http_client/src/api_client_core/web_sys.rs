// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;
use std::fmt::Display;

use bytes::Bytes;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestCredentials, RequestInit, RequestMode, Response};

use super::PostRequest;
use crate::content_type::check_content_type;
use crate::error::HttpError;
use shared_types::requests::RequestId;

impl From<wasm_bindgen::JsValue> for HttpError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        HttpError::JsError {
            error: format!("{value:?}"),
        }
    }
}

#[derive(Debug)]
pub struct WebFetchError {
    status: Option<u16>,
}

impl Error for WebFetchError {}

impl Display for WebFetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WebAssembly fetch() failed: ")?;
        match self.status {
            None => write!(f, "no response"),
            Some(status) => write!(f, "response status {status}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClientCore {
    request_id: RequestId,
}

impl ApiClientCore {
    pub fn new(request_id: RequestId) -> Self {
        Self { request_id }
    }

    /// Posts `request.body` with `fetch`. Fails on a status >= 400 or when
    /// the response isn't `request.expected_content_type`.
    pub(crate) async fn post(&self, request: PostRequest) -> Result<Bytes, HttpError> {
        let PostRequest {
            url,
            body,
            content_type,
            expected_content_type,
        } = request;

        let body_array = js_sys::Uint8Array::new_with_length(body.len() as u32);
        body_array.copy_from(&body);
        let headers = Headers::new()?;
        headers.set("Content-Type", content_type)?;
        headers.set(RequestId::FIELD, &self.request_id.0)?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_credentials(RequestCredentials::SameOrigin);
        opts.set_body(&body_array.buffer());
        opts.set_headers(&headers);
        let request = Request::new_with_str_and_init(&url, &opts)?;

        let resp_value = match (
            js_sys::global().dyn_into::<web_sys::Window>(),
            js_sys::global().dyn_into::<web_sys::DedicatedWorkerGlobalScope>(),
        ) {
            (Ok(global), _) => JsFuture::from(global.fetch_with_request(&request)).await,
            (_, Ok(global)) => JsFuture::from(global.fetch_with_request(&request)).await,
            _ => {
                return Err(HttpError::JsError {
                    error: "no window or worker global to fetch from".into(),
                })
            }
        }
        .map_err(|_e| HttpError::RequestError {
            ctx: format!("requesting {url} from WebAssembly"),
            status: None,
            source: Box::new(WebFetchError { status: None }),
        })?;

        let resp: Response = resp_value.dyn_into()?;
        let status = resp.status();

        if status >= 400 {
            return Err(HttpError::RequestError {
                ctx: format!("requesting {url} from WebAssembly"),
                status: Some(status),
                source: Box::new(WebFetchError {
                    status: Some(status),
                }),
            });
        }

        let actual_content_type = resp.headers().get("Content-Type").ok().flatten();
        check_content_type(actual_content_type.as_deref(), expected_content_type).map_err(|e| {
            HttpError::RequestError {
                ctx: format!("got wrong content type back from {url}"),
                status: Some(status),
                source: e.into(),
            }
        })?;

        let buffer = JsFuture::from(resp.array_buffer()?).await?;
        let array = js_sys::Uint8Array::new(&buffer);
        Ok(Bytes::from(array.to_vec()))
    }
}
