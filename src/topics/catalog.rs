// Topic catalog: the named keyword sets we count against.
//
// Order matters. The catalog order is the column order of the frequency
// table and the group order of the chart.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AnalysisError, Result};

static LETTERS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z]+$").expect("static regex"));

/// A named category and the exact-match keywords that count toward it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    /// Lowercase, deduplicated, in first-seen order
    pub keywords: Vec<String>,
}

impl Topic {
    /// Build a topic, lowercasing keywords and dropping repeats.
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty() && seen.insert(k.clone()))
            .collect();
        Self {
            name: name.into(),
            keywords,
        }
    }

    /// Keywords that can never equal a normalized token, because
    /// normalization strips everything except a-z (e.g. "putin's").
    pub fn unmatchable_keywords(&self) -> Vec<&str> {
        self.keywords
            .iter()
            .map(String::as_str)
            .filter(|k| !LETTERS_ONLY.is_match(k))
            .collect()
    }
}

/// Ordered collection of topics. Only built through `new`, so names are
/// always unique.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicCatalog {
    topics: Vec<Topic>,
}

impl TopicCatalog {
    /// Build a catalog. Topic names must be unique and non-empty.
    pub fn new(topics: Vec<Topic>) -> Result<Self> {
        let mut names = HashSet::new();
        for topic in &topics {
            if topic.name.trim().is_empty() {
                return Err(AnalysisError::Config("topic name must not be empty".to_string()));
            }
            if !names.insert(topic.name.as_str()) {
                return Err(AnalysisError::Config(format!(
                    "topic '{}' is defined more than once",
                    topic.name
                )));
            }
        }
        Ok(Self { topics })
    }

    /// Parse a JSON array of `{ "name": ..., "keywords": [...] }`.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<Topic> = serde_json::from_str(json)
            .map_err(|e| AnalysisError::Config(format!("topics file is not valid JSON: {e}")))?;
        // Re-run through Topic::new so file keywords get the same cleanup
        let topics = raw
            .into_iter()
            .map(|t| Topic::new(t.name, t.keywords))
            .collect();
        Self::new(topics)
    }

    /// Load a catalog from a JSON file on disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::Config(format!("cannot read topics file {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn names(&self) -> Vec<String> {
        self.topics.iter().map(|t| t.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.name == name)
    }

    /// Log a warning for every keyword that normalization makes unreachable.
    pub fn warn_unmatchable(&self) {
        for topic in &self.topics {
            for keyword in topic.unmatchable_keywords() {
                warn!(topic = %topic.name, keyword, "Keyword contains non-letters and can never match");
            }
        }
    }
}

impl Default for TopicCatalog {
    /// The six topics of the UK manifesto comparison.
    fn default() -> Self {
        Self {
            topics: vec![
                Topic::new(
                    "Immigration",
                    [
                        "immigration", "immigrant", "immigrants", "migrants", "migrant",
                        "border", "asylum", "refugees", "refugee", "visa", "deportation",
                        "boat", "boats", "rwanda",
                    ],
                ),
                Topic::new(
                    "Ukraine-Russia",
                    ["ukraine", "ukranian", "russia", "putin", "putin's"],
                ),
                Topic::new("Brexit", ["brexit", "eu"]),
                Topic::new(
                    "Israel-Palestine",
                    [
                        "israel", "israeli", "israelis", "israel's", "palestine",
                        "palestinian", "palestine's", "gaza", "two-state",
                    ],
                ),
                Topic::new(
                    "Housing",
                    [
                        "home", "homes", "house", "housing", "homeownership", "rent",
                        "renter", "renting", "renters", "mortgage", "mortgages",
                    ],
                ),
                Topic::new(
                    "Environment",
                    [
                        "decarbonise", "emissions", "environmental", "environmentally",
                        "climate", "warming", "carbon", "greenhouse", "renewable", "gases",
                    ],
                ),
            ],
        }
    }
}
