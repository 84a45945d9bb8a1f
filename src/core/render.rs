//! Renderer module
//!
//! Renders report entries and the token summary as fenced text (the default, parsed by
//! downstream tooling, so its layout is fixed) or as JSON Lines.

use serde_json::json;
use std::io::{self, Write};

use crate::core::model::{EntryOutcome, ReportEntry, TokenStats};
use crate::core::tokenizer::TokenizeError;

const FENCE: &str = "```";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Jsonl,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "md" => Ok(OutputFormat::Text),
            "jsonl" => Ok(OutputFormat::Jsonl),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Token outcome for one entry, when counting is enabled
pub type TokenOutcome = Result<usize, TokenizeError>;

/// Streaming renderer for report entries
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    format: OutputFormat,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Write one entry
    pub fn write_entry<W: Write>(
        &self,
        writer: &mut W,
        entry: &ReportEntry,
        tokens: Option<&TokenOutcome>,
    ) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => write_entry_text(writer, entry, tokens),
            OutputFormat::Jsonl => write_entry_jsonl(writer, entry, tokens),
        }
    }

    /// Write the closing token summary
    pub fn write_summary<W: Write>(&self, writer: &mut W, stats: &TokenStats) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(writer, "=== Summary ===")?;
                writeln!(writer, "Total files processed: {}", stats.file_count)?;
                writeln!(writer, "Total tokens across all files: {}", stats.total_tokens)?;
                writeln!(writer, "Average tokens per file: {:.2}", stats.average())
            }
            OutputFormat::Jsonl => {
                let value = json!({
                    "summary": {
                        "file_count": stats.file_count,
                        "total_tokens": stats.total_tokens,
                        "average_tokens": format!("{:.2}", stats.average()),
                    }
                });
                writeln!(writer, "{}", value)
            }
        }
    }
}

fn write_entry_text<W: Write>(
    writer: &mut W,
    entry: &ReportEntry,
    tokens: Option<&TokenOutcome>,
) -> io::Result<()> {
    writeln!(writer, "File: {}", entry.path)?;
    writeln!(writer, "{}", FENCE)?;
    match &entry.outcome {
        EntryOutcome::Content(content) => {
            writeln!(writer, "Content:\n{}\n", content)?;
        }
        EntryOutcome::Error(err) => {
            writeln!(writer, "Could not read file {} due to: {}\n", entry.path, err)?;
        }
    }
    writeln!(writer, "{}", FENCE)?;

    if let Some(Err(err)) = tokens {
        writeln!(writer, "Could not tokenize file {} due to: {}", entry.path, err)?;
    }
    Ok(())
}

fn write_entry_jsonl<W: Write>(
    writer: &mut W,
    entry: &ReportEntry,
    tokens: Option<&TokenOutcome>,
) -> io::Result<()> {
    let mut value = json!({ "path": entry.path });
    match &entry.outcome {
        EntryOutcome::Content(content) => value["content"] = json!(content),
        EntryOutcome::Error(err) => value["error"] = json!(err.to_string()),
    }
    match tokens {
        Some(Ok(count)) => value["tokens"] = json!(count),
        Some(Err(err)) => value["token_error"] = json!(err.to_string()),
        None => {}
    }
    writeln!(writer, "{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file_reader::ReadError;
    use serde_json::Value;

    fn render(renderer: Renderer, entry: &ReportEntry, tokens: Option<&TokenOutcome>) -> String {
        let mut buffer = Vec::new();
        renderer.write_entry(&mut buffer, entry, tokens).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn denied() -> ReadError {
        ReadError::Io(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "Permission denied",
        ))
    }

    #[test]
    fn test_text_content_layout() {
        let entry = ReportEntry::content("x/a.py", "hi");
        let output = render(Renderer::default(), &entry, None);
        assert_eq!(output, "File: x/a.py\n```\nContent:\nhi\n\n```\n");
    }

    #[test]
    fn test_text_error_layout() {
        let entry = ReportEntry::error("x/b.bin", denied());
        let output = render(Renderer::default(), &entry, None);
        assert_eq!(
            output,
            "File: x/b.bin\n```\nCould not read file x/b.bin due to: Permission denied\n\n```\n"
        );
    }

    #[test]
    fn test_text_token_error_follows_fence() {
        let entry = ReportEntry::content("a.txt", "hi");
        let tokens: TokenOutcome = Err(TokenizeError::Backend("boom".to_string()));
        let output = render(Renderer::default(), &entry, Some(&tokens));
        assert!(output.ends_with("```\nCould not tokenize file a.txt due to: boom\n"));
    }

    #[test]
    fn test_text_token_success_adds_nothing() {
        let entry = ReportEntry::content("a.txt", "hi");
        let tokens: TokenOutcome = Ok(1);
        let output = render(Renderer::default(), &entry, Some(&tokens));
        assert_eq!(output, render(Renderer::default(), &entry, None));
    }

    #[test]
    fn test_summary_text() {
        let mut buffer = Vec::new();
        let stats = TokenStats {
            file_count: 3,
            total_tokens: 10,
        };
        Renderer::default().write_summary(&mut buffer, &stats).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "=== Summary ===\nTotal files processed: 3\nTotal tokens across all files: 10\nAverage tokens per file: 3.33\n"
        );
    }

    #[test]
    fn test_summary_text_no_files() {
        let mut buffer = Vec::new();
        Renderer::default()
            .write_summary(&mut buffer, &TokenStats::default())
            .unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("Average tokens per file: 0.00\n"));
    }

    #[test]
    fn test_jsonl_entries() {
        let renderer = Renderer::new(OutputFormat::Jsonl);

        let tokens: TokenOutcome = Ok(2);
        let ok = render(renderer, &ReportEntry::content("a.txt", "hi"), Some(&tokens));
        let value: Value = serde_json::from_str(ok.trim_end()).unwrap();
        assert_eq!(value["path"], "a.txt");
        assert_eq!(value["content"], "hi");
        assert_eq!(value["tokens"], 2);

        let err = render(renderer, &ReportEntry::error("b.txt", denied()), None);
        let value: Value = serde_json::from_str(err.trim_end()).unwrap();
        assert_eq!(value["error"], "Permission denied");
        assert!(value.get("content").is_none());
        assert_eq!(err.lines().count(), 1);
    }

    #[test]
    fn test_jsonl_summary() {
        let mut buffer = Vec::new();
        Renderer::new(OutputFormat::Jsonl)
            .write_summary(&mut buffer, &TokenStats::default())
            .unwrap();
        let value: Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["summary"]["file_count"], 0);
        assert_eq!(value["summary"]["average_tokens"], "0.00");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSONL".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        let result = "xml".parse::<OutputFormat>();
        assert!(result.unwrap_err().contains("Unknown format"));
    }

    #[test]
    fn test_output_format_default() {
        let format: OutputFormat = Default::default();
        assert_eq!(format, OutputFormat::Text);
    }
}
