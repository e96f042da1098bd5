//! CSV export of the trade history.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::{TradeHistory, TradeRecord};
use crate::models::{Side, Tier};

/// Byte-order mark so spreadsheet apps detect UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One flattened history record.
#[derive(Debug, Clone, Serialize)]
pub struct CsvRow {
    pub timestamp: String,
    pub exchange: String,
    pub symbol: String,
    pub side: Side,
    pub entry: Decimal,
    pub stop_loss: Decimal,
    pub leverage: Decimal,
    pub risk_percent: Decimal,
    pub position_size: Decimal,
    pub quantity: Decimal,
    pub liquidation_price: Decimal,
    pub total_fees: Decimal,
    pub loss_at_stop: Decimal,
    pub first_tp_pnl: Option<Decimal>,
    pub last_tp_pnl: Option<Decimal>,
    pub best_risk_reward: Option<Decimal>,
    pub best_tier: Option<Tier>,
    pub notes: String,
}

impl From<&TradeRecord> for CsvRow {
    fn from(record: &TradeRecord) -> Self {
        let result = &record.result;
        Self {
            timestamp: record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            exchange: record.exchange.clone(),
            symbol: record.symbol.clone(),
            side: record.input.side,
            entry: record.input.entry_price,
            stop_loss: record.input.stop_loss,
            leverage: record.input.leverage,
            risk_percent: record.input.risk_percent,
            position_size: result.position_size_base.round_dp(4),
            quantity: result.quantity.round_dp(8),
            liquidation_price: result.liquidation_price.round_dp(8),
            total_fees: result.total_fees.round_dp(8),
            loss_at_stop: result.loss_at_stop.round_dp(4),
            first_tp_pnl: result.targets.first().map(|t| t.net_pnl.round_dp(4)),
            last_tp_pnl: result.targets.last().map(|t| t.net_pnl.round_dp(4)),
            best_risk_reward: result.best_target.map(|b| b.risk_reward.round_dp(4)),
            best_tier: result.best_target.map(|b| b.tier),
            notes: record.notes.clone(),
        }
    }
}

/// Write `records` as CSV (header included) to `writer`.
pub fn write_csv<W: Write>(records: &[TradeRecord], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer
            .serialize(CsvRow::from(record))
            .with_context(|| format!("writing CSV row for record {}", record.id))?;
    }
    csv_writer.flush().context("flushing CSV output")?;
    Ok(records.len())
}

impl TradeHistory {
    /// Export every record to `path`. Returns the number of rows written;
    /// an empty history writes no file and returns 0.
    pub fn export_csv(&self, path: &Path) -> Result<usize> {
        if self.is_empty() {
            return Ok(0);
        }

        let mut file = std::fs::File::create(path)
            .with_context(|| format!("failed to create export file: {}", path.display()))?;
        file.write_all(UTF8_BOM)
            .with_context(|| format!("failed to write export file: {}", path.display()))?;

        let rows = write_csv(self.records(), file)?;
        info!(rows = rows, path = %path.display(), "History exported");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::tests::make_record;
    use rust_decimal_macros::dec;

    #[test]
    fn test_csv_has_header_and_rows() {
        let records = vec![make_record("BTCUSDT", dec!(55000)), make_record("ETHUSDT", dec!(60000))];
        let mut out = Vec::new();
        let rows = write_csv(&records, &mut out).unwrap();
        assert_eq!(rows, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("timestamp,exchange,symbol,side,entry"));
        assert!(lines[1].contains("BTCUSDT"));
        assert!(lines[1].contains("LONG"));
        assert!(lines[1].contains("ACCEPTABLE"));
        assert!(lines[2].contains("EXCELLENT"));
    }

    #[test]
    fn test_export_empty_history_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let history = TradeHistory::open(dir.path().join("h.jsonl")).unwrap();
        let target = dir.path().join("out.csv");

        assert_eq!(history.export_csv(&target).unwrap(), 0);
        assert!(!target.exists());
    }

    #[test]
    fn test_export_file_starts_with_bom() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = TradeHistory::open(dir.path().join("h.jsonl")).unwrap();
        history.append(make_record("BTCUSDT", dec!(55000))).unwrap();

        let target = dir.path().join("out.csv");
        assert_eq!(history.export_csv(&target).unwrap(), 1);

        let bytes = std::fs::read(&target).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
    }
}
