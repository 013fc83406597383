// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use url::Url;

/// Query submitted when no sequence is supplied.
pub const SAMPLE_SEQUENCE: &str = ">MySeq\nAALAMSALMALSJLAJLACAOSIJDAOSIJDALAASKJDASLKJALCEMALWPQRODASLKJALCKMALWPQRODASLKJALCCKMALWPQRODASLKJALCKMALWPQROQUPJALSFAASLUFPASUFASFJA";

/// Endpoint, relative to the API base.
pub const QUERY_SEQUENCE_PATH: &str = "query/sequence";

/// Body of a `POST {base}/query/sequence` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceQuery {
    /// FASTA text. The API accepts several records but the page sends one.
    pub fasta: String,
    /// Ask for `protein_sequence` / `dna_sequence` on every hit.
    pub return_seqs: bool,
    pub return_bins: bool,
}

impl SequenceQuery {
    /// A query for `fasta` asking for sequences and bins, as the page does.
    pub fn new(fasta: impl Into<String>) -> Self {
        Self {
            fasta: fasta.into(),
            return_seqs: true,
            return_bins: true,
        }
    }

    pub fn sample() -> Self {
        Self::new(SAMPLE_SEQUENCE)
    }

    /// Form fields in submission order. Booleans are spelled `true`/`false`.
    pub fn form_fields(&self) -> [(&'static str, &str); 3] {
        [
            ("fasta", self.fasta.as_str()),
            ("return_seqs", bool_field(self.return_seqs)),
            ("return_bins", bool_field(self.return_bins)),
        ]
    }
}

impl Default for SequenceQuery {
    fn default() -> Self {
        Self::sample()
    }
}

fn bool_field(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Resolves the search endpoint against the API base.
///
/// The base is treated as a directory whether or not it ends in `/`, so
/// `https://host/api/v1.0` and `https://host/api/v1.0/` both resolve to
/// `https://host/api/v1.0/query/sequence`.
pub fn query_sequence_url(api_base: &Url) -> Result<Url, url::ParseError> {
    if api_base.path().ends_with('/') {
        api_base.join(QUERY_SEQUENCE_PATH)
    } else {
        let mut base = api_base.clone();
        base.set_path(&format!("{}/", api_base.path()));
        base.join(QUERY_SEQUENCE_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_query_asks_for_seqs_and_bins() {
        let query = SequenceQuery::default();
        assert_eq!(
            query.form_fields(),
            [
                ("fasta", SAMPLE_SEQUENCE),
                ("return_seqs", "true"),
                ("return_bins", "true"),
            ]
        );
        assert!(query.fasta.starts_with(">MySeq\n"));
    }

    #[test]
    fn encoded_body_matches_form_submission() {
        let query = SequenceQuery {
            fasta: ">q\nMKV".into(),
            return_seqs: true,
            return_bins: false,
        };
        assert_eq!(
            http_client::api_client::encode_form(&query.form_fields()),
            "fasta=%3Eq%0AMKV&return_seqs=true&return_bins=false"
        );
    }

    #[test]
    fn endpoint_resolution_ignores_trailing_slash() {
        for base in ["https://example.org/api/v1.0", "https://example.org/api/v1.0/"] {
            let url = query_sequence_url(&Url::parse(base).unwrap()).unwrap();
            assert_eq!(url.as_str(), "https://example.org/api/v1.0/query/sequence");
        }
    }

    #[test]
    fn endpoint_resolution_at_host_root() {
        let url = query_sequence_url(&Url::parse("http://localhost:5000").unwrap()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/query/sequence");
    }
}
