//! Reference range parsing
//!
//! Ranges are stored as display strings such as `"60-70%"` or
//! `"2.0-3.0 dS/m"`. Only unsigned decimals are understood; a leading minus
//! sign is skipped, so `"-5-10"` reads as `5..=10`.

use serde::{Deserialize, Serialize};

/// Closed numeric interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub min: f64,
    pub max: f64,
}

impl ReferenceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Parse the first `<number>-<number>` pair found in `text`
    pub fn parse(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        let mut start = 0;

        while start < bytes.len() {
            if !bytes[start].is_ascii_digit() {
                start += 1;
                continue;
            }
            let min_end = scan_decimal(bytes, start);
            if bytes.get(min_end) == Some(&b'-')
                && bytes.get(min_end + 1).map_or(false, u8::is_ascii_digit)
            {
                let max_end = scan_decimal(bytes, min_end + 1);
                let min = text[start..min_end].parse().ok()?;
                let max = text[min_end + 1..max_end].parse().ok()?;
                return Some(Self { min, max });
            }
            start += 1;
        }
        None
    }

    /// Inclusive on both ends
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl std::fmt::Display for ReferenceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// End index of `\d+(\.\d*)?` starting at `start` (which must be a digit)
fn scan_decimal(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    end
}
