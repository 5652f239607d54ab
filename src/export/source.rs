use std::{future::Future, io::Read, path::PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use super::entities::SessionRecord;

/// Interface for abstracting where sessions are loaded from.
pub trait SessionSource {
    /// Loads every session of the export in file order.
    fn load(&self) -> impl Future<Output = Result<Vec<SessionRecord>>>;
}

/// The main realization of [SessionSource].
#[derive(Debug)]
pub struct CsvSessionSource {
    path: PathBuf,
}

impl CsvSessionSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionSource for CsvSessionSource {
    #[instrument]
    async fn load(&self) -> Result<Vec<SessionRecord>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let sessions = parse_sessions(content.as_bytes())
            .with_context(|| format!("Failed to load sessions from {}", self.path.display()))?;
        debug!("Loaded {} sessions", sessions.len());
        Ok(sessions)
    }
}

/// Reads sessions out of CSV data with a header row.
pub fn parse_sessions(data: impl Read) -> Result<Vec<SessionRecord>> {
    let mut data = std::io::BufReader::new(data);
    skip_bom(&mut data)?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);
    let mut sessions = vec![];
    for (index, row) in reader.deserialize::<SessionRecord>().enumerate() {
        // + 2 accounts for the header and for rows being 1 based in spreadsheets
        let row = row.with_context(|| format!("Malformed row {}", index + 2))?;
        sessions.push(row);
    }
    Ok(sessions)
}

fn skip_bom(data: &mut impl std::io::BufRead) -> Result<()> {
    const BOM: &[u8] = "\u{feff}".as_bytes();
    if data.fill_buf()?.starts_with(BOM) {
        data.consume(BOM.len());
    }
    Ok(())
}
