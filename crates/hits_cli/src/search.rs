// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};
use url::Url;

use hits_page::{FastaDownload, HitsPage, SequenceQuery, SequenceTarget, TextTable};
use http_client::BaseApiClient;
use shared_types::requests::RequestId;

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(
        long,
        value_name = "URL",
        env = "GMGC_HITS_API_BASE",
        help = "Base URL of the catalogue API, e.g. https://gmgc.embl.de/api/v1.0/"
    )]
    pub api_base: Url,

    #[arg(
        long,
        value_name = "FILE",
        env = "GMGC_HITS_FASTA",
        help = "FASTA file to search with. Without it, a built-in sample sequence is sent."
    )]
    pub fasta: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DURATION",
        default_value = "0s",
        env = "GMGC_HITS_STARTUP_DELAY",
        help = "Wait this long before sending the request, e.g. `500ms` or `2s`."
    )]
    pub startup_delay: humantime::Duration,

    #[arg(long, help = "Write the hits' protein sequences to protein_sequences.fasta.")]
    pub protein_download: bool,

    #[arg(long, help = "Write the hits' DNA sequences to dna_sequences.fasta.")]
    pub dna_download: bool,

    #[arg(
        short,
        long,
        value_name = "DIR",
        default_value = ".",
        env = "GMGC_HITS_OUTPUT_DIR",
        help = "Directory the downloads are written into."
    )]
    pub output_dir: PathBuf,

    #[arg(long, help = "Print the stored query result as JSON instead of the hits table.")]
    pub json: bool,
}

#[derive(Debug)]
pub struct SearchConfig {
    pub api_base: Url,
    pub query: SequenceQuery,
    pub startup_delay: Duration,
    pub downloads: Vec<SequenceTarget>,
    pub output_dir: PathBuf,
    pub json: bool,
}

impl SearchArgs {
    pub fn build_config(&self) -> Result<SearchConfig> {
        let query = match &self.fasta {
            Some(path) => {
                let fasta = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                if fasta.trim().is_empty() {
                    anyhow::bail!("{} is empty", path.display());
                }
                SequenceQuery::new(fasta)
            }
            None => SequenceQuery::sample(),
        };

        let downloads = [
            (self.protein_download, SequenceTarget::Protein),
            (self.dna_download, SequenceTarget::Dna),
        ]
        .into_iter()
        .filter_map(|(wanted, target)| wanted.then_some(target))
        .collect();

        Ok(SearchConfig {
            api_base: self.api_base.clone(),
            query,
            startup_delay: self.startup_delay.into(),
            downloads,
            output_dir: self.output_dir.clone(),
            json: self.json,
        })
    }
}

pub async fn run(config: &SearchConfig) -> Result<()> {
    let client = BaseApiClient::new(RequestId::new_unique_with_prefix("gmgc-hits"));
    let written = run_with_client(config, &client).await?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

/// Runs one search against `client`, prints the outcome and writes the
/// requested downloads. Returns the paths written.
pub async fn run_with_client(config: &SearchConfig, client: &BaseApiClient) -> Result<Vec<PathBuf>> {
    let mut page = HitsPage::new(&config.api_base, TextTable::default())
        .with_context(|| format!("resolving the search endpoint under {}", config.api_base))?;

    bootstrap(config.startup_delay).await;

    let outcome = page.search(client, config.query.clone()).await;
    match (config.json, page.pending_search()) {
        (true, Some(result)) => println!("{}", serde_json::to_string_pretty(result)?),
        _ => print!("{}", page.view()),
    }
    outcome.with_context(|| format!("searching {}", page.search_url()))?;

    let mut written = vec![];
    for &target in &config.downloads {
        if let Some(download) = page.download(target) {
            written.push(save_download(&download, &config.output_dir)?);
        }
    }
    Ok(written)
}

async fn bootstrap(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    info!("waiting {} before searching", humantime::format_duration(delay));
    tokio::time::sleep(delay).await;
}

/// Writes `download` into `dir` under its file name, replacing any previous file.
pub fn save_download(download: &FastaDownload, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(download.file_name);
    std::fs::write(&path, &download.contents)
        .with_context(|| format!("writing {}", path.display()))?;
    debug!("{} bytes written", download.contents.len());
    info!("saved {} {} records to {}", download.records, download.target, path.display());
    Ok(path)
}
