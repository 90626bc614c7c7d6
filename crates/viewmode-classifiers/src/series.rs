//! TV-series episode marker detection (`S02E05`, `s2e5`)

use regex::Regex;
use viewmode_core::{Error, Result};

/// Detects `S<1-2 digits>E<1-2 digits>` episode markers
#[derive(Debug, Clone)]
pub struct SeriesDetector {
    marker: Regex,
}

impl SeriesDetector {
    pub fn new() -> Result<Self> {
        // The digit runs may not be glued to further digits (`S123E4`).
        let marker = Regex::new(r"(?i)(?:^|\D)s\d{1,2}e\d{1,2}(?:\D|$)").map_err(|e| {
            Error::internal(format!("Failed to compile series marker regex: {}", e))
        })?;
        Ok(Self { marker })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.marker.is_match(text)
    }
}
