//! Inspect command implementation.

use segbuf_core::{BufferStats, SegmentBuffer};
use serde::Serialize;

/// Buffer inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Window snapshot.
    #[serde(flatten)]
    pub stats: BufferStats,
    /// Whether oversized writes are accepted.
    pub allow_overflow: bool,
    /// Per-segment detail (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<SegmentInfo>>,
}

/// Summary of a single retained segment.
#[derive(Debug, Serialize)]
pub struct SegmentInfo {
    /// Segment ID.
    pub id: i64,
    /// Offset of the segment within the retained window.
    pub offset: usize,
    /// First bytes of the segment, hex encoded.
    pub head: String,
}

/// Number of leading bytes shown per segment.
const HEAD_BYTES: usize = 8;

/// Runs the inspect command.
pub fn run(
    buffer: &SegmentBuffer,
    show_segments: bool,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = inspect(buffer, show_segments);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

/// Collects the inspection result for `buffer`.
pub fn inspect(buffer: &SegmentBuffer, show_segments: bool) -> InspectResult {
    let stats = buffer.stats();

    let segments = show_segments.then(|| {
        (stats.first_id..=stats.last_id)
            .filter_map(|id| {
                let segment = buffer.segment(id).ok()?;
                Some(SegmentInfo {
                    id,
                    offset: (id - stats.first_id) as usize * stats.segment_size,
                    head: to_hex(&segment[..segment.len().min(HEAD_BYTES)]),
                })
            })
            .collect()
    });

    InspectResult {
        stats,
        allow_overflow: buffer.allow_overflow(),
        segments,
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn print_text_output(result: &InspectResult) {
    let stats = &result.stats;
    println!("Segment Buffer");
    println!("  Segment size:   {} bytes", stats.segment_size);
    println!("  Max segments:   {}", stats.max_segments);
    println!("  Allow overflow: {}", result.allow_overflow);
    println!();
    println!("Window");
    if stats.is_empty() {
        println!("  (empty, next ID {})", stats.first_id);
    } else {
        println!("  First ID: {}", stats.first_id);
        println!("  Last ID:  {}", stats.last_id);
    }
    println!("  Segments: {}", stats.segment_count);
    println!("  Fill:     {:.1}%", stats.fill_ratio() * 100.0);
    println!("  Bytes:    {}", stats.byte_size);
    println!("  Pending:  {} bytes", stats.pending_bytes);

    if let Some(segments) = &result.segments {
        println!();
        println!("Segments");
        for info in segments {
            println!("  #{:<8} @{:<10} {}", info.id, info.offset, info.head);
        }
    }
}
