//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use seedai_extractor::RunSummary;
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the result of a generation run.
    pub fn format_summary(&self, summary: &RunSummary, corpus: &Path) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "corpus": corpus.display().to_string(),
                    "completions": summary.completions,
                    "values": summary.values,
                    "seeds_written": summary.seeds_written,
                    "duplicates": summary.duplicates(),
                    "truncated": summary.truncated,
                });
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(summary.seeds_written.to_string()),
            OutputFormat::Text => Ok(self.format_summary_table(summary, corpus)),
        }
    }

    fn format_summary_table(&self, summary: &RunSummary, corpus: &Path) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Completions", "Values", "New seeds", "Duplicates"]);
        builder.push_record([
            summary.completions.to_string(),
            summary.values.to_string(),
            summary.seeds_written.to_string(),
            summary.duplicates().to_string(),
        ]);

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut out = table.to_string();
        out.push('\n');
        if summary.truncated {
            out.push_str(&self.warning("Function source was truncated to fit the prompt"));
            out.push('\n');
        }
        out.push_str(&self.success(&format!(
            "Wrote {} new seed(s) to {}",
            summary.seeds_written,
            corpus.display()
        )));
        out
    }

    /// Format the result of a corpus check.
    pub fn format_verify(&self, corpus: &Path, entries: usize, mismatched: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "corpus": corpus.display().to_string(),
                    "entries": entries,
                    "mismatched": mismatched,
                });
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(mismatched.join("\n")),
            OutputFormat::Text => {
                if mismatched.is_empty() {
                    return Ok(self.success(&format!(
                        "{} entries in {} match their content",
                        entries,
                        corpus.display()
                    )));
                }

                let mut lines = vec![self.error(&format!(
                    "{} of {} entries do not match their content",
                    mismatched.len(),
                    entries
                ))];
                lines.extend(mismatched.iter().map(|name| format!("  {}", name)));
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> RunSummary {
        RunSummary {
            completions: 10,
            values: 14,
            seeds_written: 9,
            truncated: true,
        }
    }

    #[test]
    fn test_json_summary() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_summary(&summary(), Path::new("corpus")).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["seeds_written"], 9);
        assert_eq!(value["duplicates"], 5);
        assert_eq!(value["truncated"], true);
        assert_eq!(value["corpus"], "corpus");
    }

    #[test]
    fn test_quiet_summary() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_summary(&summary(), Path::new("corpus")).unwrap();
        assert_eq!(output, "9");
    }

    #[test]
    fn test_text_summary() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let output = formatter.format_summary(&summary(), Path::new("corpus")).unwrap();
        assert!(output.contains("New seeds"));
        assert!(output.contains("truncated"));
        assert!(output.contains("✓ Wrote 9 new seed(s) to corpus"));
    }

    #[test]
    fn test_verify_output() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let ok = formatter.format_verify(Path::new("c"), 3, &[]).unwrap();
        assert_eq!(ok, "✓ 3 entries in c match their content");

        let bad = formatter
            .format_verify(Path::new("c"), 3, &["abc".to_string()])
            .unwrap();
        assert!(bad.starts_with("✗ 1 of 3 entries"));
        assert!(bad.contains("  abc"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let msg = formatter.success("test");
        assert_eq!(msg, "✓ test");
    }
}
