// crates/vidpress-core/src/report.rs
//
// Compression summary: arithmetic on the probed input and output sizes.
// A larger output is a valid outcome and renders as negative compression;
// only a zero-byte input is an error (the ratio would be a division by zero).

use std::fmt;

use crate::error::{Error, Result};

/// Input/output size comparison for one finished transcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompressionReport {
    pub input_bytes:  u64,
    pub output_bytes: u64,
}

impl CompressionReport {
    pub fn new(input_bytes: u64, output_bytes: u64) -> Result<Self> {
        if input_bytes == 0 {
            return Err(Error::DegenerateInput);
        }
        Ok(Self { input_bytes, output_bytes })
    }

    /// Bytes saved. Negative when the output grew.
    pub fn saved_bytes(&self) -> i64 {
        self.input_bytes as i64 - self.output_bytes as i64
    }

    /// Saved size as a percentage of the input. Negative when the output grew.
    pub fn percent(&self) -> f64 {
        self.saved_bytes() as f64 / self.input_bytes as f64 * 100.0
    }

    /// Saved size in kilobytes (1024 bytes).
    pub fn saved_kb(&self) -> f64 {
        self.saved_bytes() as f64 / 1024.0
    }
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Video processed! {:.3}% compressed ({:.3}kb)!",
            self.percent(),
            self.saved_kb(),
        )
    }
}
