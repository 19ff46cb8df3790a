// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Size-bounded partitioning of serialized events.
//!
//! Events are serialized to one JSON line each and joined with newlines
//! into request payloads. A report bigger than the payload budget is split
//! by a greedy forward scan: chunks are contiguous runs of the input, in
//! order, with nothing dropped or duplicated across the cut points.

use crate::event::TestEvent;

/// One delivery unit: a contiguous run of serialized event lines together
/// with the byte length of its newline-joined payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    lines: Vec<String>,
    size_bytes: usize,
}

impl Chunk {
    fn from_lines(lines: Vec<String>, size_bytes: usize) -> Self {
        Chunk { lines, size_bytes }
    }

    /// The newline-delimited request body.
    #[must_use]
    pub fn payload(&self) -> String {
        self.lines.join("\n")
    }

    /// Serialized lines in this chunk, in input order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Byte length of [`Chunk::payload`].
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Number of events in this chunk.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Serializes `events` into JSON lines and partitions them into chunks
/// whose payloads do not exceed `max_bytes`.
///
/// A single line longer than `max_bytes` is emitted as a chunk of its own
/// rather than dropped; such an oversize singleton is the only kind of
/// chunk allowed over the budget.
pub fn chunk_events(events: &[TestEvent], max_bytes: usize) -> serde_json::Result<Vec<Chunk>> {
    let lines = events
        .iter()
        .map(serde_json::to_string)
        .collect::<serde_json::Result<Vec<_>>>()?;
    Ok(chunk_lines(lines, max_bytes))
}

fn chunk_lines(lines: Vec<String>, max_bytes: usize) -> Vec<Chunk> {
    if lines.is_empty() {
        return Vec::new();
    }

    // Whole report fits: skip the scan and ship a single payload.
    let total: usize = lines.iter().map(String::len).sum::<usize>() + lines.len() - 1;
    if total <= max_bytes {
        return vec![Chunk::from_lines(lines, total)];
    }

    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_size = 0usize;
    for line in lines {
        if line.len() > max_bytes {
            // The line alone blows the budget. Flush whatever is pending
            // and forward the oversize entry as its own chunk.
            if !current.is_empty() {
                chunks.push(Chunk::from_lines(std::mem::take(&mut current), current_size));
                current_size = 0;
            }
            let size_bytes = line.len();
            chunks.push(Chunk::from_lines(vec![line], size_bytes));
            continue;
        }

        // Marginal cost of this line: its bytes plus the newline joining
        // it to a non-empty chunk.
        let marginal = if current.is_empty() {
            line.len()
        } else {
            line.len() + 1
        };
        if !current.is_empty() && current_size + marginal > max_bytes {
            chunks.push(Chunk::from_lines(std::mem::take(&mut current), current_size));
            current_size = line.len();
            current.push(line);
        } else {
            current_size += marginal;
            current.push(line);
        }
    }
    if !current.is_empty() {
        chunks.push(Chunk::from_lines(current, current_size));
    }
    chunks
}
