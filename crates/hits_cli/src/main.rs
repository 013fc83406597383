// Copyright 2021-2024 SecureDNA Stiftung (SecureDNA Foundation) <licensing@securedna.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

mod align;
mod search;

use clap::{ArgAction, CommandFactory, FromArgMatches, Parser, Subcommand};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Parser)]
#[command(
    version,
    author,
    about = "Search the gene catalogue by sequence and export the hits.",
    long_about = "gmgc-hits submits a FASTA sequence to the catalogue's sequence search API, prints the hits as a table and can write the hits' protein or DNA sequences as FASTA files. It can also align a query protein against a catalogue gene."
)]
struct Arguments {
    #[arg(
        short,
        long,
        global = true,
        help = "Suppress non-error output and set the log level to WARN."
    )]
    quiet: bool,

    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "Increase verbosity level, can be used multiple times."
    )]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one sequence search and render its hits.
    Search(search::SearchArgs),
    /// Align a query protein against a catalogue gene.
    Align(align::AlignArgs),
}

#[tokio::main]
async fn main() -> ! {
    let cmd = Arguments::command();
    let after_help = format!(
        "{}Examples:{}
# search with the built-in sample sequence
gmgc-hits search --api-base https://gmgc.example.org/api/v1.0/

# search with your own sequence and save both downloads into ./out
gmgc-hits search --api-base https://gmgc.example.org/api/v1.0/ \\
    --fasta query.faa --protein-download --dna-download -o out

# align a query against one catalogue gene, as an HTML page
gmgc-hits align --query query.faa --target genes.faa \\
    --target-id GMGC10.000_000_001.UNKNOWN --format text/html --html-header
",
        cmd.get_styles().get_header().render(),
        cmd.get_styles().get_header().render_reset()
    );
    let mut cmd = cmd.after_help(after_help);
    cmd.build();

    let mut matches = cmd.get_matches();
    let args = match Arguments::from_arg_matches_mut(&mut matches) {
        Ok(args) => args,
        Err(e) => {
            let e = e.format(&mut Arguments::command());
            e.exit();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_max_level(match (args.quiet, args.verbose) {
            (true, _) => Level::WARN,
            (false, 0) => Level::INFO,
            (false, 1) => Level::DEBUG,
            (false, _) => Level::TRACE,
        })
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("couldn't install logger: {err}");
    }

    let result = match &args.command {
        Command::Search(search_args) => {
            let config = match search_args.build_config() {
                Ok(config) => config,
                Err(err) => {
                    error!("{err:#}");
                    std::process::exit(2);
                }
            };
            search::run(&config).await
        }
        Command::Align(align_args) => align::run(align_args),
    };

    if let Err(err) = result {
        error!("{err:#}");
        std::process::exit(1);
    } else {
        std::process::exit(0);
    }
}
