// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response types of the sequence search API (`POST {base}/query/sequence`).
//!
//! Only the structure the page walks is typed. Everything else the server
//! sends (bins, scores, ...) is carried along untouched, so re-serializing a
//! [`QueryResult`] gives back exactly what was received.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The full response payload of a sequence search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// One entry per submitted FASTA record. The page only ever submits one.
    pub results: Vec<QueryResult>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchResult {
    /// The result for the first submitted record, if the server returned any.
    pub fn first(&self) -> Option<&QueryResult> {
        self.results.first()
    }

    /// Consumes the response, keeping only the first query result.
    pub fn into_first(self) -> Option<QueryResult> {
        self.results.into_iter().next()
    }
}

/// Hits (and whatever else the server attached) for a single query record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueryResult {
    #[serde(default)]
    pub hits: Vec<HitRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One matched gene.
///
/// Kept as the raw JSON object the server sent, so every field (including
/// explicit `null`s) survives re-serialization. Fields are read leniently
/// through [`HitRecord::field`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct HitRecord {
    pub fields: Map<String, Value>,
}

impl HitRecord {
    pub const GENE_ID: &'static str = "gene_id";
    /// Only present when the query asked for `return_seqs`.
    pub const PROTEIN_SEQUENCE: &'static str = "protein_sequence";
    /// Only present when the query asked for `return_seqs`.
    pub const DNA_SEQUENCE: &'static str = "dna_sequence";

    /// Text of field `name`: strings as-is, missing or `null` as `""`, any
    /// other value as its JSON text.
    pub fn field(&self, name: &str) -> Cow<'_, str> {
        match self.fields.get(name) {
            None | Some(Value::Null) => Cow::Borrowed(""),
            Some(Value::String(text)) => Cow::Borrowed(text),
            Some(other) => Cow::Owned(other.to_string()),
        }
    }

    pub fn gene_id(&self) -> Cow<'_, str> {
        self.field(Self::GENE_ID)
    }

    pub fn protein_sequence(&self) -> Cow<'_, str> {
        self.field(Self::PROTEIN_SEQUENCE)
    }

    pub fn dna_sequence(&self) -> Cow<'_, str> {
        self.field(Self::DNA_SEQUENCE)
    }
}

impl From<Map<String, Value>> for HitRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for HitRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect::<Map<String, Value>>()
            .into()
    }
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn query_result_reserializes_unchanged() {
        let raw = json!({
            "hits": [
                {"gene_id": "GMGC10.000_000_001.UNKNOWN", "protein_sequence": "MKV", "dna_sequence": "ATGAAAGTA", "evalue": 1e-30},
                {"gene_id": "GMGC10.000_000_002.UNKNOWN", "bins": ["a", "b"]}
            ],
            "query_name": "MySeq",
            "bins": {"count": 2}
        });
        let parsed: QueryResult = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parsed.hits.len(), 2);
        assert_eq!(parsed.hits[1].protein_sequence(), "");
        assert_json_eq!(serde_json::to_value(&parsed).unwrap(), raw);
    }

    #[test]
    fn missing_fields_read_as_empty() {
        let hit: HitRecord = serde_json::from_value(json!({})).unwrap();
        assert_eq!(hit.gene_id(), "");
        assert_eq!(hit.protein_sequence(), "");
        assert_eq!(hit.dna_sequence(), "");
    }

    #[test]
    fn nulls_survive_reserialization() {
        let raw = json!({"hits": [{"gene_id": "g1", "protein_sequence": null, "dna_sequence": "ATG"}]});
        let parsed: QueryResult = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parsed.hits[0].protein_sequence(), "");
        assert_json_eq!(serde_json::to_value(&parsed).unwrap(), raw);
    }

    #[test]
    fn non_string_fields_read_as_json_text() {
        let hit: HitRecord = serde_json::from_value(json!({
            "gene_id": 12345,
            "protein_sequence": true,
            "dna_sequence": ["ATG"]
        }))
        .unwrap();
        assert_eq!(hit.gene_id(), "12345");
        assert_eq!(hit.protein_sequence(), "true");
        assert_eq!(hit.dna_sequence(), r#"["ATG"]"#);
    }

    #[test]
    fn collects_from_pairs() {
        let hit = HitRecord::from_iter([("gene_id", "g1"), ("dna_sequence", "ATG")]);
        assert_eq!(hit.gene_id(), "g1");
        assert_eq!(hit.dna_sequence(), "ATG");
        assert_eq!(hit.fields.len(), 2);
    }

    #[test]
    fn first_result_is_selected() {
        let result: SearchResult = serde_json::from_value(json!({
            "results": [
                {"hits": [{"gene_id": "g1"}]},
                {"hits": [{"gene_id": "g2"}, {"gene_id": "g3"}]}
            ]
        }))
        .unwrap();
        assert_eq!(result.first().unwrap().hits[0].gene_id(), "g1");
        assert_eq!(result.into_first().unwrap().hits.len(), 1);
    }

    #[test]
    fn empty_results_have_no_first() {
        let result: SearchResult = serde_json::from_value(json!({"results": []})).unwrap();
        assert!(result.first().is_none());
    }
}
