// Per-document topic frequencies.
//
// Counting is exact token equality, not substring or stem matching:
// "homeowner" never counts toward "home".

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::catalog::TopicCatalog;
use crate::error::{AnalysisError, Result};

/// Rates are expressed per this many tokens.
pub const RATE_BASIS: f64 = 1000.0;

/// One topic's figures within a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicRate {
    pub topic: String,
    /// Tokens that matched one of the topic's keywords
    pub hits: usize,
    /// `hits * 1000 / total_words`
    pub rate: f64,
}

/// One document's row of the frequency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRow {
    pub document: String,
    pub total_words: usize,
    /// One entry per catalog topic, in catalog order
    pub topics: Vec<TopicRate>,
}

impl FrequencyRow {
    /// Rate for a topic by name, if the row has it.
    pub fn rate(&self, topic: &str) -> Option<f64> {
        self.topics.iter().find(|t| t.topic == topic).map(|t| t.rate)
    }

    pub fn hits(&self, topic: &str) -> Option<usize> {
        self.topics.iter().find(|t| t.topic == topic).map(|t| t.hits)
    }
}

/// Count tokens that exactly equal one of `keywords`.
///
/// Equivalent to summing the count of each distinct keyword; a keyword
/// listed twice is still only counted once per token.
pub fn count_occurrences(tokens: &[String], keywords: &[String]) -> usize {
    let keywords: HashSet<&str> = keywords.iter().map(String::as_str).collect();
    tokens
        .iter()
        .filter(|token| keywords.contains(token.as_str()))
        .count()
}

/// Compute a document's row: total words plus per-topic hits and rates.
///
/// Fails with `EmptyDocument` when there are no tokens, since a rate per
/// 1000 words is undefined.
pub fn build_row(document: &str, tokens: &[String], catalog: &TopicCatalog) -> Result<FrequencyRow> {
    let total_words = tokens.len();
    if total_words == 0 {
        return Err(AnalysisError::EmptyDocument(document.to_string()));
    }

    let topics = catalog
        .topics()
        .iter()
        .map(|topic| {
            let hits = count_occurrences(tokens, &topic.keywords);
            TopicRate {
                topic: topic.name.clone(),
                hits,
                rate: hits as f64 * RATE_BASIS / total_words as f64,
            }
        })
        .collect();

    Ok(FrequencyRow {
        document: document.to_string(),
        total_words,
        topics,
    })
}
