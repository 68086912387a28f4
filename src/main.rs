//! Wordmark - invisible watermarks for words
//!
//! A CLI tool that hides a payload in the carrier words of text, XML and
//! JSON files, and recovers it later.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CommandExecutor, DecodeCommand, EmbedCommand};

/// Wordmark - invisible watermarks for words
///
/// Embeds a watermark into selected words of a document using zero-width
/// characters, and decodes it back. Stopwords, short words and words with
/// digits or punctuation are never touched.
#[derive(Parser)]
#[command(name = "wordmark")]
#[command(version)]
#[command(about = "Selective invisible watermarking for text, XML and JSON")]
#[command(long_about = None)]
struct Cli {
    /// Verbose logging to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed a watermark into a file
    Embed(EmbedCommand),

    /// Decode watermarks from a file
    Decode(DecodeCommand),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "wordmark=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Embed(cmd) => cmd.execute(),
        Commands::Decode(cmd) => cmd.execute(),
    }
}
