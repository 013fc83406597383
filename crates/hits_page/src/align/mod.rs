// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pairwise protein alignment of a query against a catalogue gene.
//!
//! Smith-Waterman local alignment with affine gaps (Gotoh), scored with
//! BLOSUM62. A gap of length `k` costs `GAP_OPEN + (k - 1) * GAP_EXTEND`.

pub mod blosum62;
pub mod report;

pub use report::{render_html, render_text, ReportFormat};

pub const GAP_OPEN: i32 = 11;
pub const GAP_EXTEND: i32 = 1;

/// Gap character in aligned sequences.
pub const GAP: u8 = b'-';

// Low enough to never win, high enough not to overflow when penalized.
const NEG_INF: i32 = i32::MIN / 2;

// Traceback cell layout: bits 0-1 say where H came from, bit 2 whether E
// extended a gap, bit 3 whether F did.
const STOP: u8 = 0;
const FROM_DIAG: u8 = 1;
const FROM_E: u8 = 2;
const FROM_F: u8 = 3;
const SOURCE_MASK: u8 = 0b11;
const E_EXTENDED: u8 = 0b100;
const F_EXTENDED: u8 = 0b1000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlignError {
    #[error("cannot align an empty {0} sequence")]
    EmptySequence(&'static str),
    #[error("the sequences have no positively scoring local alignment")]
    NoAlignment,
}

/// How an alignment column is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Identical residues.
    Match,
    /// Different residues with a non-negative substitution score.
    Close,
    Mismatch,
    Gap,
}

impl ColumnKind {
    pub fn of(query: u8, target: u8) -> Self {
        if query == GAP || target == GAP {
            ColumnKind::Gap
        } else if query == target {
            ColumnKind::Match
        } else if blosum62::score(query, target) >= 0 {
            ColumnKind::Close
        } else {
            ColumnKind::Mismatch
        }
    }
}

/// Best local alignment of a query against a target.
///
/// Positions are 0-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAlignment {
    pub score: i32,
    /// Aligned query residues, with [`GAP`]s.
    pub query: Vec<u8>,
    /// Aligned target residues, with [`GAP`]s. Same length as `query`.
    pub target: Vec<u8>,
    pub query_start: usize,
    pub query_end: usize,
    pub query_len: usize,
    pub target_start: usize,
    pub target_end: usize,
    pub target_len: usize,
}

impl LocalAlignment {
    /// Number of alignment columns, gaps included.
    pub fn aligned_length(&self) -> usize {
        self.query.len()
    }

    pub fn columns(&self) -> impl Iterator<Item = (u8, u8, ColumnKind)> + '_ {
        self.query
            .iter()
            .zip(&self.target)
            .map(|(&q, &t)| (q, t, ColumnKind::of(q, t)))
    }

    /// Fraction of columns holding identical residues.
    pub fn identity(&self) -> f64 {
        let identical = self
            .columns()
            .filter(|(_, _, kind)| *kind == ColumnKind::Match)
            .count();
        identical as f64 / self.aligned_length() as f64
    }

    pub fn query_coverage(&self) -> f64 {
        (self.query_end - self.query_start + 1) as f64 / self.query_len as f64
    }

    pub fn target_coverage(&self) -> f64 {
        (self.target_end - self.target_start + 1) as f64 / self.target_len as f64
    }
}

/// Aligns `query` against `target`. Residues are compared case-insensitively.
pub fn smith_waterman(query: &[u8], target: &[u8]) -> Result<LocalAlignment, AlignError> {
    if query.is_empty() {
        return Err(AlignError::EmptySequence("query"));
    }
    if target.is_empty() {
        return Err(AlignError::EmptySequence("target"));
    }
    let q = query.to_ascii_uppercase();
    let t = target.to_ascii_uppercase();
    let width = t.len() + 1;

    let mut trace = vec![STOP; (q.len() + 1) * width];
    let mut h_prev = vec![0i32; width];
    let mut h_curr = vec![0i32; width];
    // F of the previous row, per column
    let mut f_above = vec![NEG_INF; width];
    let (mut best, mut best_i, mut best_j) = (0, 0, 0);

    for i in 1..=q.len() {
        h_curr[0] = 0;
        let mut e = NEG_INF;
        for j in 1..=t.len() {
            let mut cell = 0u8;

            // E: gap in the query, consuming t[j - 1]
            let e_open = h_curr[j - 1] - GAP_OPEN;
            let e_extend = e - GAP_EXTEND;
            e = if e_extend > e_open {
                cell |= E_EXTENDED;
                e_extend
            } else {
                e_open
            };

            // F: gap in the target, consuming q[i - 1]
            let f_open = h_prev[j] - GAP_OPEN;
            let f_extend = f_above[j] - GAP_EXTEND;
            let f = if f_extend > f_open {
                cell |= F_EXTENDED;
                f_extend
            } else {
                f_open
            };
            f_above[j] = f;

            let diag = h_prev[j - 1] + blosum62::score(q[i - 1], t[j - 1]);
            let (h, source) = if diag > 0 && diag >= e && diag >= f {
                (diag, FROM_DIAG)
            } else if e > 0 && e >= f {
                (e, FROM_E)
            } else if f > 0 {
                (f, FROM_F)
            } else {
                (0, STOP)
            };
            h_curr[j] = h;
            trace[i * width + j] = cell | source;

            if h > best {
                (best, best_i, best_j) = (h, i, j);
            }
        }
        std::mem::swap(&mut h_prev, &mut h_curr);
    }

    if best == 0 {
        return Err(AlignError::NoAlignment);
    }

    enum State {
        H,
        E,
        F,
    }
    let (mut i, mut j) = (best_i, best_j);
    let mut state = State::H;
    let mut aligned_query = Vec::new();
    let mut aligned_target = Vec::new();
    loop {
        let cell = trace[i * width + j];
        match state {
            State::H => match cell & SOURCE_MASK {
                FROM_DIAG => {
                    aligned_query.push(q[i - 1]);
                    aligned_target.push(t[j - 1]);
                    i -= 1;
                    j -= 1;
                }
                FROM_E => state = State::E,
                FROM_F => state = State::F,
                _ => break,
            },
            State::E => {
                aligned_query.push(GAP);
                aligned_target.push(t[j - 1]);
                if cell & E_EXTENDED == 0 {
                    state = State::H;
                }
                j -= 1;
            }
            State::F => {
                aligned_query.push(q[i - 1]);
                aligned_target.push(GAP);
                if cell & F_EXTENDED == 0 {
                    state = State::H;
                }
                i -= 1;
            }
        }
    }
    aligned_query.reverse();
    aligned_target.reverse();

    Ok(LocalAlignment {
        score: best,
        query: aligned_query,
        target: aligned_target,
        query_start: i,
        query_end: best_i - 1,
        query_len: q.len(),
        target_start: j,
        target_end: best_j - 1,
        target_len: t.len(),
    })
}
