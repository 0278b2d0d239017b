// Frequency table assembly across documents.
//
// All documents are loaded before any row is computed, so a run with
// several missing files reports every one of them at once instead of
// failing on the first.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::catalog::TopicCatalog;
use super::frequency::{build_row, FrequencyRow};
use crate::error::{AnalysisError, Result};
use crate::text::{normalize, read_document};

/// Source of raw document text, keyed by document identifier.
pub trait DocumentLoader {
    fn load(&self, document: &str) -> Result<String>;
}

/// Any closure from identifier to text is a loader (handy in tests).
impl<F> DocumentLoader for F
where
    F: Fn(&str) -> Result<String>,
{
    fn load(&self, document: &str) -> Result<String> {
        self(document)
    }
}

/// Reads `{dir}/{document}.txt`.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    dir: PathBuf,
}

impl DirectoryLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, document: &str) -> PathBuf {
        self.dir.join(format!("{document}.txt"))
    }
}

impl DocumentLoader for DirectoryLoader {
    fn load(&self, document: &str) -> Result<String> {
        read_document(document, &self.path_for(document))
    }
}

/// All documents' rows, plus the topic column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTable {
    pub topics: Vec<String>,
    pub rows: Vec<FrequencyRow>,
}

impl FrequencyTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn documents(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.document.as_str()).collect()
    }

    /// One topic's rates down the table, in row order.
    pub fn column(&self, topic: &str) -> Option<Vec<f64>> {
        if !self.topics.iter().any(|t| t == topic) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .map(|row| row.rate(topic).unwrap_or(0.0))
                .collect(),
        )
    }

    /// Highest rate anywhere in the table (0.0 when empty).
    pub fn max_rate(&self) -> f64 {
        self.rows
            .iter()
            .flat_map(|row| row.topics.iter().map(|t| t.rate))
            .fold(0.0, f64::max)
    }
}

/// Load, normalize and count every document, preserving input order.
///
/// No deduplication and no sorting: the table has exactly one row per
/// entry of `documents`.
pub fn build_table<L: DocumentLoader + ?Sized>(
    documents: &[String],
    loader: &L,
    catalog: &TopicCatalog,
    min_length: usize,
) -> Result<FrequencyTable> {
    let mut texts = Vec::with_capacity(documents.len());
    let mut failures = Vec::new();
    for document in documents {
        match loader.load(document) {
            Ok(text) => texts.push(text),
            Err(e) => failures.push(e),
        }
    }
    report(failures)?;

    // Empty documents are collected the same way, so every one is named
    let mut rows = Vec::with_capacity(documents.len());
    let mut failures = Vec::new();
    for (document, text) in documents.iter().zip(&texts) {
        let tokens = normalize(text, min_length);
        debug!(document = %document, tokens = tokens.len(), "Normalized document");
        match build_row(document, &tokens, catalog) {
            Ok(row) => {
                info!(
                    document = %row.document,
                    total_words = row.total_words,
                    "Computed topic rates"
                );
                rows.push(row);
            }
            Err(e) => failures.push(e),
        }
    }
    report(failures)?;

    Ok(FrequencyTable {
        topics: catalog.names(),
        rows,
    })
}

/// One failure is returned as-is, several as `Documents`.
fn report(mut failures: Vec<AnalysisError>) -> Result<()> {
    match failures.len() {
        0 => Ok(()),
        1 => Err(failures.remove(0)),
        _ => Err(AnalysisError::Documents(failures)),
    }
}
