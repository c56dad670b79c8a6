//! Record sink contract.
//!
//! A sink must replace by (instrument, trade date): re-running a date
//! overwrites what the previous run wrote for that key.

use crate::domain::{IndicatorRecord, PrevSnapshot};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

pub trait RecordSink {
    type Error;

    fn upsert(&mut self, record: IndicatorRecord) -> Result<(), Self::Error>;

    fn upsert_all(
        &mut self,
        records: impl IntoIterator<Item = IndicatorRecord>,
    ) -> Result<(), Self::Error> {
        for record in records {
            self.upsert(record)?;
        }
        Ok(())
    }
}

/// In-memory sink ordered by (instrument, date).
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    rows: BTreeMap<(String, NaiveDate), IndicatorRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, instrument_id: &str, date: NaiveDate) -> Option<&IndicatorRecord> {
        self.rows.get(&(instrument_id.to_string(), date))
    }

    pub fn records(&self) -> impl Iterator<Item = &IndicatorRecord> {
        self.rows.values()
    }

    /// Latest stored snapshot per instrument strictly before `date`, ready to
    /// feed the next pass's continuity tracker.
    pub fn snapshots_before(&self, date: NaiveDate) -> HashMap<String, PrevSnapshot> {
        let mut out = HashMap::new();
        for ((id, day), record) in &self.rows {
            if *day < date {
                // BTreeMap order: later dates for the same id overwrite earlier ones.
                out.insert(id.clone(), PrevSnapshot::from(record));
            }
        }
        out
    }
}

impl RecordSink for MemorySink {
    type Error = std::convert::Infallible;

    fn upsert(&mut self, record: IndicatorRecord) -> Result<(), Self::Error> {
        self.rows.insert(record.key(), record);
        Ok(())
    }
}
