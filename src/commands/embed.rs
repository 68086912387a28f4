//! Embed command - watermark a text, XML or JSON file.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::{CommandExecutor, EngineArgs, FormatArg};

/// Embed a watermark into the carrier words of a file.
///
/// `.txt` files are treated as flat text. Anything else is parsed as XML
/// (content starting with `<`) or JSON, and only the text under --tag is
/// watermarked.
#[derive(Args, Debug)]
pub struct EmbedCommand {
    /// Input file (text, XML or JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Watermark text to hide
    #[arg(short, long)]
    pub watermark: String,

    /// Element name (XML) or key (JSON) whose text is watermarked
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Output file (prints to stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// How to treat the input: auto (by extension), text or tree
    #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
    pub format: FormatArg,

    #[command(flatten)]
    pub engine: EngineArgs,
}

impl CommandExecutor for EmbedCommand {
    fn execute(&self) -> Result<()> {
        let engine = self.engine.build()?;
        let content = fs::read(&self.input)
            .with_context(|| format!("Failed to read input file: {}", self.input.display()))?;
        let kind = self.format.resolve(&self.input);

        let marked = engine.embed(&content, &self.watermark, kind, self.tag.as_deref())?;

        match &self.output {
            Some(path) => {
                fs::write(path, &marked)
                    .with_context(|| format!("Failed to write output file: {}", path.display()))?;
                println!("Watermarked output written to {}", path.display());
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(marked.as_bytes())?;
                stdout.flush()?;
            }
        }

        Ok(())
    }
}
