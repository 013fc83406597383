// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use shared_types::search::HitRecord;

/// Which hit sequence a download is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceTarget {
    Protein,
    Dna,
}

impl SequenceTarget {
    pub const ALL: [SequenceTarget; 2] = [SequenceTarget::Protein, SequenceTarget::Dna];

    /// Name of the hit field the sequence is read from.
    pub fn field_name(self) -> &'static str {
        match self {
            SequenceTarget::Protein => HitRecord::PROTEIN_SEQUENCE,
            SequenceTarget::Dna => HitRecord::DNA_SEQUENCE,
        }
    }

    /// Download file name: the field name pluralized, with a `.fasta` extension.
    pub fn file_name(self) -> &'static str {
        match self {
            SequenceTarget::Protein => "protein_sequences.fasta",
            SequenceTarget::Dna => "dna_sequences.fasta",
        }
    }

    /// Element id of the page button that triggers this download.
    pub fn button_id(self) -> &'static str {
        match self {
            SequenceTarget::Protein => "protein_download",
            SequenceTarget::Dna => "dna_download",
        }
    }

    pub fn sequence_of(self, hit: &HitRecord) -> Cow<'_, str> {
        hit.field(self.field_name())
    }
}

impl fmt::Display for SequenceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sequence target {0:?}, expected `protein` or `dna`")]
pub struct UnknownSequenceTarget(String);

impl FromStr for SequenceTarget {
    type Err = UnknownSequenceTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "protein" | "protein_sequence" => Ok(SequenceTarget::Protein),
            "dna" | "dna_sequence" => Ok(SequenceTarget::Dna),
            _ => Err(UnknownSequenceTarget(s.to_owned())),
        }
    }
}

/// Renders `hits` as FASTA, one `>{gene_id}\n{sequence}\n` block per hit, in order.
///
/// Missing or `null` fields render as empty strings, so a hit without the
/// requested sequence still produces a (header-only) block.
pub fn render_fasta(hits: &[HitRecord], target: SequenceTarget) -> String {
    let mut out = String::new();
    for hit in hits {
        out.push('>');
        out.push_str(&hit.gene_id());
        out.push('\n');
        out.push_str(&target.sequence_of(hit));
        out.push('\n');
    }
    out
}

/// A generated FASTA file, ready to be handed to a download sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaDownload {
    pub target: SequenceTarget,
    pub file_name: &'static str,
    pub contents: String,
    /// Number of FASTA records in `contents`.
    pub records: usize,
}

impl FastaDownload {
    pub fn new(hits: &[HitRecord], target: SequenceTarget) -> Self {
        Self {
            target,
            file_name: target.file_name(),
            contents: render_fasta(hits, target),
            records: hits.len(),
        }
    }
}
