//! Append-only decision log.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use emofeed_common::error::EmofeedResult;
use emofeed_face_model::DecisionRecord;

/// Metadata written as the first line of a decision log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionLogHeader {
    pub schema_version: String,
    /// Wall-clock time at tracking start (ISO 8601).
    pub epoch_wall: String,
    pub model: String,
    pub confidence_threshold: f64,
}

/// Writes a `# {header}` line followed by one decision per line.
pub struct DecisionWriter {
    sink: Box<dyn Write + Send>,
}

impl DecisionWriter {
    /// Start a log on any sink.
    pub fn new(sink: impl Write + Send + 'static, header: &DecisionLogHeader) -> EmofeedResult<Self> {
        let mut sink: Box<dyn Write + Send> = Box::new(sink);
        writeln!(sink, "# {}", serde_json::to_string(header)?)?;
        Ok(Self { sink })
    }

    /// Start a log in a fresh file at `path`, creating parent directories.
    pub fn create(path: &Path, header: &DecisionLogHeader) -> EmofeedResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::new(BufWriter::new(File::create(path)?), header)
    }

    pub fn write_record(&mut self, record: &DecisionRecord) -> EmofeedResult<()> {
        writeln!(self.sink, "{}", serde_json::to_string(record)?)?;
        Ok(())
    }

    pub fn flush(&mut self) -> EmofeedResult<()> {
        self.sink.flush()?;
        Ok(())
    }
}

/// Parse decision records from JSONL content, skipping the header.
pub fn parse_decisions(jsonl: &str) -> Result<Vec<DecisionRecord>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}
