//! CSV and plain-text I/O for the CLI.
//!
//! Bar columns: instrument_id, trade_date, open, high, low, close, volume,
//! adj_close, ca_event, ca_hint. Empty cells read as absent.
//! Record files use the `IndicatorRecord` field names as headers, so an
//! output file can be fed back as `--prev` on the next run.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use eodsignal_core::domain::{Bar, IndicatorRecord};
use std::io::Write;
use std::path::Path;

/// Read every bar and order them by (instrument, date), the order the
/// calculator requires.
pub fn read_bars(path: &Path) -> Result<Vec<Bar>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open bars file {}", path.display()))?;
    let mut bars = Vec::new();
    for (line, row) in reader.deserialize::<Bar>().enumerate() {
        // +2: header line and 1-based numbering
        let bar = row.with_context(|| format!("{}: bad bar on line {}", path.display(), line + 2))?;
        bars.push(bar);
    }
    bars.sort_by(|a, b| {
        a.instrument_id
            .cmp(&b.instrument_id)
            .then(a.trade_date.cmp(&b.trade_date))
    });
    tracing::debug!(path = %path.display(), bars = bars.len(), "bars loaded");
    Ok(bars)
}

pub fn read_records(path: &Path) -> Result<Vec<IndicatorRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open records file {}", path.display()))?;
    let records = reader
        .deserialize::<IndicatorRecord>()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to parse records in {}", path.display()))?;
    tracing::debug!(path = %path.display(), records = records.len(), "previous records loaded");
    Ok(records)
}

pub fn write_records<'a, W: Write>(
    out: W,
    records: impl IntoIterator<Item = &'a IndicatorRecord>,
) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(out);
    let mut written = 0;
    for record in records {
        writer.serialize(record)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// One `YYYY-MM-DD` per line; blank lines and `#` comments are ignored.
pub fn read_holidays(path: &Path) -> Result<Vec<NaiveDate>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read holidays file {}", path.display()))?;
    parse_holidays(&content).with_context(|| format!("bad holidays file {}", path.display()))
}

fn parse_holidays(content: &str) -> Result<Vec<NaiveDate>> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(|line| {
            NaiveDate::parse_from_str(line, "%Y-%m-%d")
                .with_context(|| format!("invalid holiday date {line:?}"))
        })
        .collect()
}
