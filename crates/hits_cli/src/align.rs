// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use needletail::parse_fastx_file;
use tracing::{debug, info};

use hits_page::align::report::DEFAULT_LINE_LENGTH;
use hits_page::align::{render_html, render_text, smith_waterman, ReportFormat};

#[derive(Debug, Args)]
pub struct AlignArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "FASTA file holding the query protein. Only its first record is used."
    )]
    pub query: PathBuf,

    #[arg(long, value_name = "FILE", help = "FASTA file holding catalogue proteins.")]
    pub target: PathBuf,

    #[arg(
        long,
        value_name = "ID",
        help = "Identifier of the target record to align against, e.g. GMGC10.000_000_001.UNKNOWN"
    )]
    pub target_id: String,

    #[arg(
        long,
        value_name = "FORMAT",
        default_value = "text/plain",
        help = "Report format: text/plain or text/html."
    )]
    pub format: ReportFormat,

    #[arg(long, help = "With text/html, wrap the report in a standalone HTML page.")]
    pub html_header: bool,

    #[arg(
        long,
        value_name = "COLUMNS",
        default_value_t = DEFAULT_LINE_LENGTH,
        help = "Alignment columns per line."
    )]
    pub line_length: usize,
}

#[derive(Debug)]
struct FastaRecord {
    id: String,
    sequence: Vec<u8>,
}

/// First record of `path` accepted by `wanted`, which is given the record's
/// identifier (the header up to the first whitespace).
fn find_record(path: &Path, mut wanted: impl FnMut(&str) -> bool) -> Result<Option<FastaRecord>> {
    let mut reader = parse_fastx_file(path)
        .with_context(|| format!("opening FASTA file {}", path.display()))?;

    while let Some(record) = reader.next() {
        let record =
            record.with_context(|| format!("parsing FASTA record in {}", path.display()))?;
        let header = String::from_utf8_lossy(record.id());
        let id = header.split_whitespace().next().unwrap_or_default();
        if wanted(id) {
            return Ok(Some(FastaRecord {
                id: id.to_owned(),
                sequence: record.seq().into_owned(),
            }));
        }
    }
    Ok(None)
}

pub fn report(args: &AlignArgs) -> Result<String> {
    let query = find_record(&args.query, |_| true)?
        .with_context(|| format!("no sequence in {}", args.query.display()))?;
    let target = find_record(&args.target, |id| id == args.target_id)?
        .with_context(|| format!("{} not found in {}", args.target_id, args.target.display()))?;
    debug!(
        "aligning {} ({} aa) against {} ({} aa)",
        query.id,
        query.sequence.len(),
        target.id,
        target.sequence.len()
    );

    let aln = smith_waterman(&query.sequence, &target.sequence)
        .with_context(|| format!("aligning {} against {}", query.id, target.id))?;
    info!("alignment score {}", aln.score);

    Ok(match args.format {
        ReportFormat::Text => render_text(&aln, args.line_length),
        ReportFormat::Html => render_html(&aln, args.line_length, args.html_header),
    })
}

pub fn run(args: &AlignArgs) -> Result<()> {
    print!("{}", report(args)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Files {
        _dir: tempfile::TempDir,
        query: PathBuf,
        target: PathBuf,
    }

    fn files(query: &str, target: &str) -> Files {
        let dir = tempfile::tempdir().unwrap();
        let query_path = dir.path().join("query.faa");
        let target_path = dir.path().join("genes.faa");
        std::fs::write(&query_path, query).unwrap();
        std::fs::write(&target_path, target).unwrap();
        Files {
            _dir: dir,
            query: query_path,
            target: target_path,
        }
    }

    fn args(files: &Files, target_id: &str, format: ReportFormat) -> AlignArgs {
        AlignArgs {
            query: files.query.clone(),
            target: files.target.clone(),
            target_id: target_id.into(),
            format,
            html_header: false,
            line_length: DEFAULT_LINE_LENGTH,
        }
    }

    const GENES: &str = ">GMGC10.000_000_001.UNKNOWN some description\nPPPP\n>GMGC10.000_000_002.UNKNOWN\nWWWWWW\nWWWWWW\n";

    #[test]
    fn aligns_against_named_target() {
        let files = files(">q\nWWWWWWAWWWWWW\n", GENES);
        let text = report(&args(&files, "GMGC10.000_000_002.UNKNOWN", ReportFormat::Text)).unwrap();
        assert_eq!(
            text,
            concat!(
                "identity: 92.31%\n",
                "Query coverage: 100.00%(positions 0-12; total length 13)\n",
                "Unigene coverage: 100.00%(positions 0-11; total length 12)\n",
                "\n",
                "WWWWWWAWWWWWW\n",
                "|||||| ||||||\n",
                "WWWWWW-WWWWWW\n",
            )
        );
    }

    #[test]
    fn matches_identifier_before_description() {
        let files = files(">q\nPPPP\n", GENES);
        let text = report(&args(&files, "GMGC10.000_000_001.UNKNOWN", ReportFormat::Html)).unwrap();
        assert!(text.starts_with("<div class=\"alignment\">"));
        assert!(text.contains("identity: 100.00%"));
    }

    #[test]
    fn missing_target_is_an_error() {
        let files = files(">q\nWWWW\n", GENES);
        let err = report(&args(&files, "GMGC10.999", ReportFormat::Text)).unwrap_err();
        assert!(format!("{err:#}").contains("GMGC10.999 not found in"));
    }

    #[test]
    fn unrelated_sequences_are_an_error() {
        let files = files(">q\nW\n", GENES);
        let err = report(&args(&files, "GMGC10.000_000_001.UNKNOWN", ReportFormat::Text)).unwrap_err();
        assert!(format!("{err:#}").contains("no positively scoring local alignment"));
    }
}
