//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.

mod decode;
mod embed;

pub use decode::DecodeCommand;
pub use embed::EmbedCommand;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use wordmark::{ContentKind, Watermarker, WordmarkConfig};

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self) -> Result<()>;
}

/// Input handling selected on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    /// `.txt` is flat text, anything else is XML/JSON
    Auto,
    /// Flat text
    Text,
    /// XML or JSON (sniffed from the content)
    Tree,
}

impl FormatArg {
    pub fn resolve(self, input: &Path) -> ContentKind {
        match self {
            FormatArg::Auto => ContentKind::from_path(input),
            FormatArg::Text => ContentKind::Text,
            FormatArg::Tree => ContentKind::Tree,
        }
    }
}

/// Options shared by commands that need a watermark engine.
#[derive(Args, Debug)]
pub struct EngineArgs {
    /// Config file (defaults to ~/.wordmark/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Watermark secret (overrides the config file)
    #[arg(short, long, env = "WORDMARK_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Stopword list, one word per line (overrides the config file)
    #[arg(long)]
    pub stopwords: Option<PathBuf>,
}

impl EngineArgs {
    /// Loads the config file and applies command-line overrides.
    pub fn config(&self) -> Result<WordmarkConfig> {
        let mut config = match &self.config {
            Some(path) => WordmarkConfig::load_from(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => WordmarkConfig::load().context("Failed to load config")?,
        };

        if let Some(secret) = &self.secret {
            config.secret = secret.clone();
        }
        if let Some(stopwords) = &self.stopwords {
            config.stopwords = Some(stopwords.clone());
        }

        Ok(config)
    }

    pub fn build(&self) -> Result<Watermarker> {
        self.build_with(&self.config()?)
    }

    pub fn build_with(&self, config: &WordmarkConfig) -> Result<Watermarker> {
        Watermarker::new(config).context("Failed to initialize watermark engine")
    }
}
