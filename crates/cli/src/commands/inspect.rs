// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::fs::File;
use std::path::Path;

use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use memmap2::Mmap;
use tracebuf::EventReader;

/// Payload bytes shown per row.
const PREVIEW_BYTES: usize = 16;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InspectSummary {
    pub events: usize,
    pub small: usize,
    pub large: usize,
    pub bytes: usize,
}

pub fn run(path: &Path, limit: Option<usize>) -> anyhow::Result<InspectSummary> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    // Zero-length files cannot be mapped on every platform
    if file.metadata()?.len() == 0 {
        println!("\n{} holds no events\n", path.display());
        return Ok(InspectSummary::default());
    }
    let mmap = unsafe { Mmap::map(&file)? };
    inspect_bytes(&mmap, limit)
}

/// Walks the framed events in `bytes`, printing up to `limit` rows.
pub fn inspect_bytes(bytes: &[u8], limit: Option<usize>) -> anyhow::Result<InspectSummary> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Offset", "Header", "Size", "Payload"]);

    let mut summary = InspectSummary::default();
    for record in EventReader::new(bytes) {
        let record = record.with_context(|| format!("Corrupt framing after {} events", summary.events))?;
        if limit.map_or(true, |limit| summary.events < limit) {
            table.add_row(vec![
                summary.events.to_string(),
                record.offset.to_string(),
                if record.is_large() { "large" } else { "small" }.to_string(),
                record.size.to_string(),
                preview(record.payload),
            ]);
        }
        summary.events += 1;
        summary.bytes += record.size;
        if record.is_large() {
            summary.large += 1;
        } else {
            summary.small += 1;
        }
    }

    println!("{table}\n");
    println!(
        "{} events ({} small, {} large), {} bytes",
        summary.events, summary.small, summary.large, summary.bytes
    );
    Ok(summary)
}

fn preview(payload: &[u8]) -> String {
    let shown: Vec<String> = payload
        .iter()
        .take(PREVIEW_BYTES)
        .map(|b| format!("{:02x}", b))
        .collect();
    if payload.len() > PREVIEW_BYTES {
        format!("{} …", shown.join(" "))
    } else {
        shown.join(" ")
    }
}
