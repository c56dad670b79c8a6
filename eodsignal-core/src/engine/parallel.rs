//! Chunked passes over independent groups of instruments.
//!
//! Each chunk gets its own calculator stream and rolling state, so chunks
//! share nothing mutable and can run on the rayon pool. Output is merged in
//! chunk order, which keeps results deterministic regardless of scheduling.

use crate::domain::Bar;
use crate::engine::calculator::{PassOutput, PrevSnapshots, SignalCalculator};
use crate::engine::observer::GuardObserver;
use rayon::prelude::*;

/// Split an instrument-grouped bar sequence into chunks of at most
/// `instruments_per_chunk` instruments. Never splits an instrument.
pub fn chunk_by_instrument(bars: Vec<Bar>, instruments_per_chunk: usize) -> Vec<Vec<Bar>> {
    let per_chunk = instruments_per_chunk.max(1);
    let mut chunks: Vec<Vec<Bar>> = Vec::new();
    let mut current: Vec<Bar> = Vec::new();
    let mut instruments = 0usize;

    for bar in bars {
        let new_instrument = current
            .last()
            .map_or(true, |last| last.instrument_id != bar.instrument_id);
        if new_instrument {
            if instruments == per_chunk {
                chunks.push(std::mem::take(&mut current));
                instruments = 0;
            }
            instruments += 1;
        }
        current.push(bar);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Run every chunk in parallel. `make_observer` receives the chunk index.
pub fn run_chunks<F, O>(
    calc: &SignalCalculator,
    chunks: Vec<Vec<Bar>>,
    prev: &PrevSnapshots,
    make_observer: F,
) -> PassOutput
where
    F: Fn(usize) -> O + Sync,
    O: GuardObserver,
{
    let chunk_count = chunks.len();
    let outputs: Vec<PassOutput> = chunks
        .into_par_iter()
        .enumerate()
        .map(|(index, chunk)| calc.run(chunk, prev, make_observer(index)))
        .collect();

    let mut merged = PassOutput::default();
    for output in outputs {
        merged.records.extend(output.records);
        merged.stats.merge(output.stats);
    }
    tracing::info!(
        chunks = chunk_count,
        emitted = merged.stats.emitted,
        skipped_invalid = merged.stats.skipped_invalid,
        "chunked pass complete"
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SignalConfig;
    use crate::engine::observer::NoopObserver;
    use chrono::NaiveDate;

    fn bars(ids: &[&str], days: i64) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ids.iter()
            .flat_map(|id| {
                (0..days).map(move |i| {
                    let c = 20.0 + i as f64;
                    Bar::new(*id, start + chrono::Duration::days(i), c, c + 1.0, c - 1.0, c, 500.0)
                })
            })
            .collect()
    }

    #[test]
    fn chunks_respect_instrument_boundaries() {
        let chunks = chunk_by_instrument(bars(&["A", "B", "C", "D", "E"], 3), 2);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 6);
        assert_eq!(chunks[2].len(), 3);
        assert!(chunks[1].iter().all(|b| b.instrument_id == "C" || b.instrument_id == "D"));
    }

    #[test]
    fn zero_chunk_size_is_one_instrument() {
        let chunks = chunk_by_instrument(bars(&["A", "B"], 2), 0);
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn chunked_equals_single_pass() {
        let all = bars(&["A", "B", "C", "D"], 40);
        let target = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(39);
        let calc = SignalCalculator::new(SignalConfig::default(), target);
        let prev = PrevSnapshots::new();

        let single = calc.run(&all, &prev, NoopObserver);
        let chunked = run_chunks(&calc, chunk_by_instrument(all, 1), &prev, |_| NoopObserver);

        assert_eq!(single.records, chunked.records);
        assert_eq!(single.stats, chunked.stats);
    }
}
