//! Content fingerprints for configs and computed records.
//!
//! - `hash_json`: BLAKE3 over the canonical JSON of any serializable value.
//! - `records_digest`: order-independent digest of a pass's output, keyed by
//!   (instrument, date). Two passes over the same bars with the same config
//!   must produce the same digest.

use crate::domain::IndicatorRecord;
use serde::Serialize;

/// BLAKE3 hex digest of the JSON encoding of `value`.
///
/// Struct field order is fixed by the type, so the encoding is stable across
/// runs. A value that cannot be encoded hashes as the empty document.
pub fn hash_json<T: Serialize>(value: &T) -> String {
    let json = serde_json::to_vec(value).unwrap_or_default();
    blake3::hash(&json).to_hex().to_string()
}

/// Digest of a set of records, independent of emission order.
pub fn records_digest(records: &[IndicatorRecord]) -> String {
    let mut sorted: Vec<&IndicatorRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        a.instrument_id
            .cmp(&b.instrument_id)
            .then(a.trade_date.cmp(&b.trade_date))
    });

    let mut hasher = blake3::Hasher::new();
    for record in sorted {
        let json = serde_json::to_vec(record).unwrap_or_default();
        hasher.update(&json);
        hasher.update(b"\n");
    }
    hasher.finalize().to_hex().to_string()
}
