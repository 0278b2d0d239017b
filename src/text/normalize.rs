// Token extraction for topic counting.
//
// Punctuation and digits are dropped outright rather than replaced with a
// space, so "U.S." becomes "us" and "don't" becomes "dont". Keywords are
// matched against these tokens verbatim.

use std::path::Path;

use tracing::debug;

use crate::error::{AnalysisError, Result};

/// Split raw text into lowercase, letters-only tokens.
///
/// Every character that is not an ASCII letter or whitespace is removed,
/// the rest is lowercased and split on whitespace. Tokens shorter than
/// `min_length` characters are discarded (0 keeps everything, same as 1).
pub fn normalize(raw: &str, min_length: usize) -> Vec<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    cleaned
        .split_whitespace()
        // Tokens are pure ASCII here, so byte length == character length
        .filter(|token| token.len() >= min_length)
        .map(str::to_string)
        .collect()
}

/// Read a whole document into memory.
///
/// `document` is only used to label the error.
pub fn read_document(document: &str, path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path).map_err(|source| AnalysisError::FileAccess {
        document: document.to_string(),
        path: path.to_path_buf(),
        source,
    })?;
    debug!(document, bytes = text.len(), path = %path.display(), "Read document");
    Ok(text)
}
