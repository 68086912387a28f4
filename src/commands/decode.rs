//! Decode command - recover watermarks from a file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{json, Value};

use wordmark::{Decoded, TreeMatch};

use super::{CommandExecutor, EngineArgs, FormatArg};

/// Decode watermarks from a file and print a JSON summary.
#[derive(Args, Debug)]
pub struct DecodeCommand {
    /// Input file (text, XML or JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Element name (XML) or key (JSON) whose text is decoded
    #[arg(short, long)]
    pub tag: Option<String>,

    /// How to treat the input: auto (by extension), text or tree
    #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
    pub format: FormatArg,

    /// Also list matched text values that carry no watermark
    #[arg(long)]
    pub all: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

impl CommandExecutor for DecodeCommand {
    fn execute(&self) -> Result<()> {
        let config = self.engine.config()?;
        let engine = self.engine.build_with(&config)?;
        let content = fs::read(&self.input)
            .with_context(|| format!("Failed to read input file: {}", self.input.display()))?;
        let kind = self.format.resolve(&self.input);

        let summary = match engine.decode(&content, kind, self.tag.as_deref())? {
            Decoded::Text(report) if report.is_empty() => {
                json!({ "message": "No watermarks detected." })
            }
            Decoded::Text(report) => json!({ "decoded_watermarks": report }),
            Decoded::Tree(matches) => {
                let entries: Vec<Value> = matches
                    .iter()
                    .filter(|m| self.all || !m.analysis.is_empty())
                    .map(|m| tree_entry(m, config.preview_chars))
                    .collect();

                if entries.is_empty() {
                    json!({ "message": "No watermarks detected in the specified tag." })
                } else {
                    json!({ "decoded_watermarks": entries })
                }
            }
        };

        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}

fn tree_entry(m: &TreeMatch, preview_chars: usize) -> Value {
    json!({
        "text": preview(&m.text, preview_chars),
        "analysis": m.analysis,
    })
}

/// Truncates `text` to `max_chars` characters, marking the cut with `...`.
fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
