// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// A unique per-request ID that we attach to every search API call as an
/// HTTP header, so a search can be matched up with the server's logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl FromStr for RequestId {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(String::from(s)))
    }
}

impl RequestId {
    pub const FIELD: &'static str = "X-Request-ID";

    pub fn new_unique() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new_unique_with_prefix(prefix: &str) -> Self {
        Self(format!("{prefix}-{}", Uuid::new_v4()))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_ids_are_unique() {
        let a = RequestId::new_unique_with_prefix("gmgc-hits");
        let b = RequestId::new_unique_with_prefix("gmgc-hits");
        assert!(a.0.starts_with("gmgc-hits-"));
        assert_ne!(a, b);
    }

    #[test]
    fn parses_verbatim() {
        let id: RequestId = "abc 123".parse().unwrap();
        assert_eq!(id.to_string(), "abc 123");
    }
}
