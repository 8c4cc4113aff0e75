use tracing::debug;

/// One planned time range, produced only by [`plan_segments`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentDescriptor {
    pub index: usize,
    pub start_secs: f64,
    pub length_secs: f64,
}

impl SegmentDescriptor {
    pub fn end_secs(&self) -> f64 {
        self.start_secs + self.length_secs
    }
}

/// Plan duration-bounded segments covering `[0, total_secs)` with no gaps
/// and no overlaps. Every segment is at most `max_chunk_secs` long; only
/// the last may be shorter. Callers guarantee `total_secs > 0` and a
/// finite, positive `max_chunk_secs`; probing and config validation reject
/// anything else before planning happens.
pub fn plan_segments(total_secs: f64, max_chunk_secs: f64) -> Vec<SegmentDescriptor> {
    let count = (total_secs / max_chunk_secs).ceil() as usize;
    let segments: Vec<SegmentDescriptor> = (0..count)
        .map(|index| {
            let start_secs = index as f64 * max_chunk_secs;
            SegmentDescriptor {
                index,
                start_secs,
                length_secs: (total_secs - start_secs).min(max_chunk_secs),
            }
        })
        .collect();

    debug!(
        "Planned {} segment(s) of at most {:.0}s over {:.1}s of media",
        segments.len(),
        max_chunk_secs,
        total_secs
    );
    segments
}
