// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod api_client;
pub mod api_client_core;
pub mod content_type;
pub mod error;

pub use api_client::BaseApiClient;
pub use api_client_core::{test_utils, PostRequest};
pub use error::HttpError;
