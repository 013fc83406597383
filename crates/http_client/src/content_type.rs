// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

/// What a response without a `Content-Type` header is treated as.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("wrong content type: expected {expected}, got {actual}")]
pub struct WrongContentType {
    pub actual: String,
    pub expected: &'static str,
}

/// Checks a response's `Content-Type` against the expected media type.
///
/// Parameters such as `; charset=utf-8` are ignored and the media type is
/// compared case-insensitively.
pub fn check_content_type(
    actual: Option<&str>,
    expected: &'static str,
) -> Result<(), WrongContentType> {
    let actual = actual.unwrap_or(DEFAULT_CONTENT_TYPE);
    let media_type = actual.split(';').next().unwrap_or_default().trim();
    if media_type.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(WrongContentType {
            actual: actual.to_owned(),
            expected,
        })
    }
}
