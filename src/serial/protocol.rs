//! # Sample Line Protocol
//!
//! The analog source prints one ASCII line per sample:
//!
//! ```text
//! <axis0>,<axis1>[,<ignored>...]\r\n
//! ```
//!
//! Only the first two fields are read; anything after them is ignored.

use crate::error::{BridgeError, Result};

/// Field separator within a sample line
pub const FIELD_SEPARATOR: char = ',';

/// Number of axis readings carried by each line
pub const AXIS_COUNT: usize = 2;

/// Longest line accepted from the transport, terminator included.
/// Anything longer is line noise (usually a baud rate mismatch).
pub const MAX_LINE_LEN: usize = 256;

/// One pair of raw axis readings, in transmission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSample {
    /// Axis index 0 (drives Y with the default axis mapping)
    pub axis0: i32,
    /// Axis index 1 (drives X with the default axis mapping)
    pub axis1: i32,
}

impl RawSample {
    #[must_use]
    pub fn new(axis0: i32, axis1: i32) -> Self {
        Self { axis0, axis1 }
    }
}

/// Decode a sample line
///
/// # Arguments
///
/// * `line` - One line from the transport, with or without its terminator
///
/// # Returns
///
/// * `Result<RawSample>` - The two readings, or error if malformed
///
/// # Errors
///
/// Returns [`BridgeError::Parse`] if:
/// - The line has fewer than two fields
/// - Either of the first two fields is not an integer
///
/// # Examples
///
/// ```
/// use analog_mouse_bridge::serial::protocol::{decode_line, RawSample};
///
/// assert_eq!(decode_line("680,1\r\n")?, RawSample::new(680, 1));
/// assert_eq!(decode_line("12, 34, 99")?, RawSample::new(12, 34));
/// assert!(decode_line("12").is_err());
/// # Ok::<(), analog_mouse_bridge::error::BridgeError>(())
/// ```
pub fn decode_line(line: &str) -> Result<RawSample> {
    let mut fields = line.trim().split(FIELD_SEPARATOR);

    let axis0 = parse_field(fields.next(), 0, line)?;
    let axis1 = parse_field(fields.next(), 1, line)?;

    Ok(RawSample::new(axis0, axis1))
}

fn parse_field(field: Option<&str>, index: usize, line: &str) -> Result<i32> {
    let field = field.ok_or_else(|| {
        BridgeError::Parse(format!(
            "expected {} fields, got {} in {:?}",
            AXIS_COUNT,
            index,
            line.trim_end()
        ))
    })?;

    field.trim().parse::<i32>().map_err(|e| {
        BridgeError::Parse(format!(
            "field {} ({:?}) is not an integer: {}",
            index,
            field.trim(),
            e
        ))
    })
}
