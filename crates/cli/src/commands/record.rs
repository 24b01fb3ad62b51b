// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use tracebuf::config::BufferConfig;
use tracebuf::ids::{ThreadRegistry, TypeRegistry};
use tracebuf::{HeaderClass, HeapBufferSource, RetireOutcome, Retirer, WriteCursor};

/// Shape of the synthetic workload.
#[derive(Clone, Debug)]
pub struct RecordOptions {
    pub events: u64,
    pub buffer_size: usize,
    /// Raw payload bytes appended to every event.
    pub payload: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordSummary {
    pub committed: u64,
    pub dropped: u64,
    pub flushes: u64,
    pub segments: usize,
    pub bytes: usize,
}

/// Marker type whose name is interned into every recorded event.
struct SyntheticEvent;

pub fn run(path: &Path, options: &RecordOptions) -> anyhow::Result<RecordSummary> {
    let cfg = BufferConfig::default().with_buffer_size(options.buffer_size);
    cfg.validate()?;

    let mut source = HeapBufferSource::new(&cfg);
    let buffer = source.allocate().context("Initial buffer allocation failed")?;
    let mut cursor = WriteCursor::with_config(buffer, source, &cfg);

    let threads = ThreadRegistry::new();
    let types = TypeRegistry::new();
    let thread = threads.current_thread();
    let ty = types.type_of::<SyntheticEvent>();
    let payload: Vec<u8> = (0..options.payload).map(|i| i as u8).collect();

    for seq in 0..options.events {
        cursor.write_event(HeaderClass::Large, |w| {
            w.write_u64(seq);
            w.write_thread(thread);
            w.write_type(ty);
            w.write_str(Some("synthetic"));
            w.write_bytes_raw(&payload);
        });
    }
    let stats = *cursor.stats();

    let mut retirer = Retirer::new();
    let mut segments = retirer.drain_queue(cursor.source().retired());
    if let RetireOutcome::Retired(last) = retirer.try_retire(cursor.buffer()) {
        segments.push(last);
    }

    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for segment in &segments {
        out.write_all(&segment.bytes)?;
    }
    out.flush()?;

    let summary = RecordSummary {
        committed: stats.committed_events,
        dropped: stats.dropped(),
        flushes: stats.flushes,
        segments: segments.len(),
        bytes: segments.iter().map(|s| s.len()).sum(),
    };
    tracing::info!(
        "Recorded {} events ({} bytes) into {}",
        summary.committed,
        summary.bytes,
        path.display()
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Committed", "Dropped", "Flushes", "Segments", "Bytes"]);
    table.add_row(vec![
        summary.committed.to_string(),
        summary.dropped.to_string(),
        summary.flushes.to_string(),
        summary.segments.to_string(),
        summary.bytes.to_string(),
    ]);
    println!("{table}\n");

    Ok(summary)
}
