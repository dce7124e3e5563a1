//! Diagnostic sink that appends run records to a file

use crate::error::ExtractorError;
use seedai_domain::DiagnosticSink;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

const RULE: &str = "----------------------------------";

/// Writes prompts, completions and extracted values to a text file
///
/// Write failures are logged and otherwise ignored so a full disk never
/// aborts a generation run.
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileSink {
    /// Open `path` for appending, creating it if needed
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ExtractorError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| ExtractorError::Diagnostics {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    /// Target file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(&mut self, write: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>) {
        if let Err(e) = write(&mut self.writer).and_then(|_| self.writer.flush()) {
            warn!("Failed to write debug record to {}: {}", self.path.display(), e);
        }
    }
}

impl DiagnosticSink for FileSink {
    fn prompt(&mut self, text: &str) {
        self.record(|w| writeln!(w, "{RULE}\nPROMPT\n{RULE}\n{text}\n{RULE}"));
    }

    fn completion(&mut self, index: usize, text: &str) {
        self.record(|w| writeln!(w, "COMPLETION {index}\n{text}\n{RULE}"));
    }

    fn values(&mut self, index: usize, values: &[String]) {
        self.record(|w| {
            writeln!(w, "VALUES {index} ({})", values.len())?;
            for value in values {
                writeln!(w, "{:?}", value)?;
            }
            writeln!(w, "{RULE}")
        });
    }
}
