use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Parties analyzed when no documents are given on the command line.
/// Each one is read from `{documents_dir}/{name}.txt`.
pub const DEFAULT_DOCUMENTS: [&str; 6] = ["Tory", "Labour", "Reform", "Libdems", "Greens", "SNP"];

/// Party colors used for bars and legend entries.
pub const PARTY_COLORS: [(&str, &str); 6] = [
    ("Tory", "#013775"),
    ("Labour", "#ed1747"),
    ("Reform", "#2596be"),
    ("Libdems", "#f9a431"),
    ("Greens", "#00a85a"),
    ("SNP", "#fff482"),
];

/// Colors handed out, by row index, to documents missing from `PARTY_COLORS`.
pub const FALLBACK_COLORS: [&str; 6] = [
    "#8e44ad", "#16a085", "#d35400", "#7f8c8d", "#c0392b", "#2c3e50",
];

pub const DEFAULT_OUTPUT: &str = "Manifestos.png";

/// Places to look for a TrueType font when none is configured.
pub const FONT_CANDIDATES: [&str; 6] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Runtime configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy. Command-line flags
/// override these values in main.rs.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the `{party}.txt` files (MANIFESTO_DOCS_DIR)
    pub documents_dir: PathBuf,
    /// Where the chart is written (MANIFESTO_OUTPUT)
    pub output_path: PathBuf,
    /// Shortest token kept after normalization (MANIFESTO_MIN_LENGTH)
    pub min_length: usize,
    /// TrueType font for chart labels (MANIFESTO_FONT)
    pub font_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from("."),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            min_length: 1,
            font_path: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; only a malformed MANIFESTO_MIN_LENGTH is an error.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let min_length = match env::var("MANIFESTO_MIN_LENGTH") {
            Ok(raw) => parse_min_length(&raw)?,
            Err(_) => defaults.min_length,
        };

        Ok(Self {
            documents_dir: env::var("MANIFESTO_DOCS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.documents_dir),
            output_path: env::var("MANIFESTO_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            min_length,
            font_path: env::var("MANIFESTO_FONT").ok().map(PathBuf::from),
        })
    }

    /// The font to label the chart with: the configured one if set,
    /// otherwise the first candidate that exists on this machine.
    pub fn resolve_font(&self) -> Option<PathBuf> {
        if let Some(path) = &self.font_path {
            return Some(path.clone());
        }
        FONT_CANDIDATES
            .iter()
            .map(Path::new)
            .find(|p| p.exists())
            .map(Path::to_path_buf)
    }
}

fn parse_min_length(raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .with_context(|| format!("MANIFESTO_MIN_LENGTH must be a non-negative integer, got {raw:?}"))
}
