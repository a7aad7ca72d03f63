//! Phrase table for known translations
//!
//! The table short-circuits the remote model for phrases the demo already
//! knows. It is built once at startup and shared read-only afterwards.
//!
//! # Example
//!
//! ```ignore
//! use cuneiform_translator::LookupTable;
//!
//! let table = LookupTable::from_pairs([("𒂍𒃲", "The great temple")])?;
//! assert_eq!(table.lookup("𒂍𒃲"), Some("The great temple"));
//! assert_eq!(table.lookup("unknown"), None);
//! ```

use crate::error::{TranslateError, TranslateResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

/// A single known phrase and its translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub source: String,
    pub target: String,
}

impl LookupEntry {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Which way the user is translating
///
/// Only used to pick sample snippets; lookups themselves are direction-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    CuneiformToEnglish,
    EnglishToCuneiform,
}

impl FromStr for Direction {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cuneiform-to-english" => Ok(Direction::CuneiformToEnglish),
            "english-to-cuneiform" => Ok(Direction::EnglishToCuneiform),
            other => Err(TranslateError::ConfigurationError(format!(
                "Unknown translation direction: {}",
                other
            ))),
        }
    }
}

/// Phrases shipped with the demo page
const BUILTIN_PHRASES: &[(&str, &str)] = &[
    ("𒀭𒂗𒆠", "The god of Babylon"),
    ("𒈗𒁺𒌑", "The king has arrived"),
    ("𒀭𒊹𒆠", "The god Nabu"),
    ("𒂗𒉆𒈨𒌍𒉌", "Lord of all lands"),
    ("𒀭𒈨𒌍𒅖𒆠𒋫", "May the gods protect you"),
    ("𒂍𒃲", "The great temple"),
    ("𒅖𒈬𒀭𒀫𒌓", "In the name of Marduk"),
];

static CUNEIFORM_SIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{12000}-\x{123FF}]").unwrap());

/// Whether `text` contains any sign from the Unicode Cuneiform block
pub fn is_cuneiform(text: &str) -> bool {
    CUNEIFORM_SIGN.is_match(text)
}

/// Immutable mapping from known source strings to their translations
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    entries: HashMap<String, String>,
    // Insertion order, only for listing samples
    order: Vec<String>,
}

impl LookupTable {
    /// Build a table from entries, rejecting duplicate keys
    pub fn from_entries<I>(entries: I) -> TranslateResult<Self>
    where
        I: IntoIterator<Item = LookupEntry>,
    {
        let mut table = LookupTable::default();
        for entry in entries {
            if table.entries.contains_key(&entry.source) {
                return Err(TranslateError::ConfigurationError(format!(
                    "Duplicate lookup key: {}",
                    entry.source
                )));
            }
            table.order.push(entry.source.clone());
            table.entries.insert(entry.source, entry.target);
        }
        Ok(table)
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> TranslateResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_entries(pairs.into_iter().map(|(k, v)| LookupEntry::new(k, v)))
    }

    /// The phrase table the demo page ships with
    pub fn builtin() -> Self {
        // Keys in BUILTIN_PHRASES are distinct, so this cannot hit the duplicate check.
        Self::from_pairs(BUILTIN_PHRASES.iter().copied()).unwrap_or_default()
    }

    /// Parse a JSON array of `{"source": ..., "target": ...}` objects
    pub fn from_json_str(json: &str) -> TranslateResult<Self> {
        let entries: Vec<LookupEntry> = serde_json::from_str(json).map_err(|e| {
            TranslateError::ConfigurationError(format!("Failed to parse lookup table: {}", e))
        })?;
        Self::from_entries(entries)
    }

    /// Load a lookup table from a JSON file
    ///
    /// # Errors
    /// - File not found or unreadable
    /// - Invalid JSON or wrong shape
    /// - Duplicate source keys
    pub fn from_json_file(path: &Path) -> TranslateResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TranslateError::ConfigurationError(format!(
                "Failed to read file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&content)
    }

    /// Exact, case-sensitive lookup with no normalization
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All keys, in the order they were supplied
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Keys usable as sample snippets for the given direction
    pub fn samples(&self, direction: Direction) -> Vec<&str> {
        self.keys()
            .filter(|key| match direction {
                Direction::CuneiformToEnglish => is_cuneiform(key),
                Direction::EnglishToCuneiform => !is_cuneiform(key),
            })
            .collect()
    }
}
