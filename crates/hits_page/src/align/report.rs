// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Write;
use std::str::FromStr;

use super::{ColumnKind, LocalAlignment};

pub const DEFAULT_LINE_LENGTH: usize = 80;

const HTML_HEADER: &str = r#"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="UTF-8" />
        <title>Alignment result</title>
        <style type="text/css">
            .match{width:15px; height:19px; display:inline-block;}
            .gap{width:15px; height:19px; display:inline-block;}
            .close{width:15px; height:19px; display:inline-block;}
            .mismatch{width:15px; height:19px; display:inline-block;}
            span{font-family: monospace;text-align:center;font-size:15pt}
        </style>
    </head>
    <body>"#;

const HTML_FOOTER: &str = "    </body>\n</html>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported report format {0:?}: only text/plain and text/html are supported")]
pub struct UnsupportedFormat(String);

impl FromStr for ReportFormat {
    type Err = UnsupportedFormat;

    /// Accepts `text` / `html` or a media type such as `text/html; charset=utf-8`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "text" || s.starts_with("text/plain") {
            Ok(ReportFormat::Text)
        } else if s == "html" || s.starts_with("text/html") {
            Ok(ReportFormat::Html)
        } else {
            Err(UnsupportedFormat(s.to_owned()))
        }
    }
}

fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

fn summary(aln: &LocalAlignment) -> [String; 3] {
    [
        format!("identity: {}", percent(aln.identity())),
        format!(
            "Query coverage: {}(positions {}-{}; total length {})",
            percent(aln.query_coverage()),
            aln.query_start,
            aln.query_end,
            aln.query_len
        ),
        format!(
            "Unigene coverage: {}(positions {}-{}; total length {})",
            percent(aln.target_coverage()),
            aln.target_start,
            aln.target_end,
            aln.target_len
        ),
    ]
}

/// Rows of at most `line_length` columns.
fn rows(aln: &LocalAlignment, line_length: usize) -> Vec<Vec<(u8, u8, ColumnKind)>> {
    let columns: Vec<_> = aln.columns().collect();
    columns
        .chunks(line_length.max(1))
        .map(<[_]>::to_vec)
        .collect()
}

/// Plain-text report: the summary, then query / midline / target blocks.
///
/// The midline shows `|` for identical residues, `.` for substitutions and a
/// space under gaps.
pub fn render_text(aln: &LocalAlignment, line_length: usize) -> String {
    let mut lines: Vec<String> = summary(aln).into();
    for row in rows(aln, line_length) {
        lines.push(String::new());
        lines.push(row.iter().map(|(q, _, _)| *q as char).collect());
        lines.push(
            row.iter()
                .map(|(_, _, kind)| match kind {
                    ColumnKind::Match => '|',
                    ColumnKind::Close | ColumnKind::Mismatch => '.',
                    ColumnKind::Gap => ' ',
                })
                .collect(),
        );
        lines.push(row.iter().map(|(_, t, _)| *t as char).collect());
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn span(out: &mut String, kind: ColumnKind, content: &str) {
    let class = match kind {
        ColumnKind::Match => "match",
        ColumnKind::Close => "close",
        ColumnKind::Mismatch => "mismatch",
        ColumnKind::Gap => "gap",
    };
    // writing to a String can't fail
    let _ = write!(out, r#"<span class="{class}">{content}</span>"#);
}

/// HTML fragment with one `<span>` per residue, classed by column kind.
/// With `full_document`, the fragment is wrapped in a standalone page.
pub fn render_html(aln: &LocalAlignment, line_length: usize, full_document: bool) -> String {
    let mut lines = Vec::new();
    if full_document {
        lines.push(HTML_HEADER.to_owned());
    }

    lines.push(r#"<div class="alignment">"#.to_owned());
    let [identity, query_coverage, target_coverage] = summary(aln);
    lines.push(format!(r#"<p class="summary">{identity}</p>"#));
    lines.push(format!(r#"<p class="summary">{query_coverage}</p>"#));
    lines.push(format!(r#"<p class="summary">{target_coverage}</p><br/>"#));
    lines.push(r#"<p class="alignment">"#.to_owned());

    let rows = rows(aln, line_length);
    let mut buf = [0u8; 4];
    for (n, row) in rows.iter().enumerate() {
        let (mut query, mut midline, mut target) = (String::new(), String::new(), String::new());
        for &(q, t, kind) in row {
            span(&mut query, kind, (q as char).encode_utf8(&mut buf));
            let glyph = match kind {
                ColumnKind::Match => "|",
                ColumnKind::Close => "&#58",
                ColumnKind::Mismatch => ".",
                ColumnKind::Gap => "&nbsp",
            };
            span(&mut midline, kind, glyph);
            span(&mut target, kind, (t as char).encode_utf8(&mut buf));
        }
        lines.push(query + "<br/>");
        lines.push(midline + "<br/>");
        if n + 1 == rows.len() {
            lines.push(target + "</p></div>");
        } else {
            lines.push(target + "<br/><br/>");
        }
    }
    if rows.is_empty() {
        lines.push("</p></div>".to_owned());
    }

    if full_document {
        lines.push(HTML_FOOTER.to_owned());
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
