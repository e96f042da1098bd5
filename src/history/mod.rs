//! Append-only trade history.
//!
//! One JSON record per line. Earlier lines are never rewritten; the only
//! destructive operation is an explicit [`TradeHistory::clear`].

mod export;
mod stats;

pub use export::CsvRow;
pub use stats::{equity_curve, EquityPoint, HistorySummary};

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::models::{CalculationResult, TradeInput};

/// Schema version written into every new record.
pub const RECORD_SCHEMA_VERSION: u32 = 1;

/// A calculation as stored in the history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub schema_version: u32,
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub exchange: String,
    pub symbol: String,
    #[serde(default)]
    pub notes: String,
    pub input: TradeInput,
    pub result: CalculationResult,
}

impl TradeRecord {
    pub fn new(
        exchange: impl Into<String>,
        symbol: impl Into<String>,
        notes: impl Into<String>,
        input: TradeInput,
        result: CalculationResult,
    ) -> Self {
        Self {
            schema_version: RECORD_SCHEMA_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            exchange: exchange.into(),
            symbol: symbol.into(),
            notes: notes.into(),
            input,
            result,
        }
    }
}

/// Trade history backed by a JSON Lines file.
pub struct TradeHistory {
    path: PathBuf,
    records: Vec<TradeRecord>,
}

impl TradeHistory {
    /// Open the log at `path`. A missing file is an empty history; a
    /// malformed line is an error naming its line number.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut records = Vec::new();

        if path.exists() {
            let file = std::fs::File::open(&path)
                .with_context(|| format!("failed to open history: {}", path.display()))?;

            for (i, line) in BufReader::new(file).lines().enumerate() {
                let line = line
                    .with_context(|| format!("failed to read history: {}", path.display()))?;
                if line.trim().is_empty() {
                    continue;
                }
                let record: TradeRecord = serde_json::from_str(&line).with_context(|| {
                    format!("malformed history record at {}:{}", path.display(), i + 1)
                })?;
                records.push(record);
            }
        }

        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record to the file and the in-memory view.
    pub fn append(&mut self, record: TradeRecord) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create history dir: {}", dir.display()))?;
        }

        let mut line = serde_json::to_string(&record).context("serializing trade record")?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open history: {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("failed to append to history: {}", self.path.display()))?;

        info!(id = %record.id, symbol = %record.symbol, "Trade recorded");
        self.records.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    /// The last `limit` records, oldest first.
    pub fn recent(&self, limit: usize) -> &[TradeRecord] {
        let start = self.records.len().saturating_sub(limit);
        &self.records[start..]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record, truncating the file.
    pub fn clear(&mut self) -> Result<()> {
        if self.path.exists() {
            std::fs::write(&self.path, b"")
                .with_context(|| format!("failed to clear history: {}", self.path.display()))?;
        }
        info!(removed = self.records.len(), "History cleared");
        self.records.clear();
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::engine::calculate;
    use crate::models::Side;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    pub(crate) fn make_record(symbol: &str, take_profit: Decimal) -> TradeRecord {
        let input = TradeInput {
            entry_price: dec!(50000),
            stop_loss: dec!(48000),
            take_profits: vec![take_profit],
            leverage: dec!(10),
            capital: dec!(1000),
            risk_percent: dec!(1),
            fee_percent: dec!(0.04),
            side: Side::Long,
        };
        let result = calculate(&input).unwrap();
        TradeRecord::new("Binance", symbol, "", input, result)
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let history = TradeHistory::open(dir.path().join("history.jsonl")).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_append_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("history.jsonl");

        let mut history = TradeHistory::open(&path).unwrap();
        let first = make_record("BTCUSDT", dec!(55000));
        let second = make_record("ETHUSDT", dec!(60000));
        history.append(first.clone()).unwrap();
        history.append(second.clone()).unwrap();

        let reopened = TradeHistory::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.records()[0], first);
        assert_eq!(reopened.records()[1], second);
        assert_eq!(reopened.records()[0].schema_version, RECORD_SCHEMA_VERSION);
    }

    #[test]
    fn test_recent_returns_tail() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = TradeHistory::open(dir.path().join("h.jsonl")).unwrap();
        for symbol in ["A", "B", "C"] {
            history.append(make_record(symbol, dec!(55000))).unwrap();
        }

        let recent: Vec<&str> = history.recent(2).iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(recent, vec!["B", "C"]);
        assert_eq!(history.recent(10).len(), 3);
    }

    #[test]
    fn test_malformed_line_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h.jsonl");
        let good = serde_json::to_string(&make_record("A", dec!(55000))).unwrap();
        std::fs::write(&path, format!("{good}\n{{broken\n")).unwrap();

        let err = TradeHistory::open(&path).err().unwrap();
        assert!(format!("{err:#}").contains(":2"));
    }

    #[test]
    fn test_clear_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h.jsonl");
        let mut history = TradeHistory::open(&path).unwrap();
        history.append(make_record("A", dec!(55000))).unwrap();

        history.clear().unwrap();
        assert!(history.is_empty());
        assert!(TradeHistory::open(&path).unwrap().is_empty());
    }
}
