//! Text normalization applied before cache lookup and scoring

/// Lower-case and trim. Total: empty input gives empty output.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
