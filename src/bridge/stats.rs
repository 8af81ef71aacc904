use std::fmt;

/// Running counters for the sample loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeStats {
    /// Lines decoded into a sample
    pub samples_processed: u64,
    /// Malformed lines
    pub samples_skipped: u64,
    /// Net pixels emitted on X
    pub pixels_x: i64,
    /// Net pixels emitted on Y
    pub pixels_y: i64,
}

impl fmt::Display for BridgeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} samples ({} skipped), moved x={} y={} px",
            self.samples_processed, self.samples_skipped, self.pixels_x, self.pixels_y
        )
    }
}
