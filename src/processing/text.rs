// Text normalization and length features
// Author: Gabriel Demetrios Lafis

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::info;

use super::{append_columns, column_index, replace_column};
use super::{DataProcessor, PipelineError};
use crate::data::{DataError, DataSet, Value};

const ENGLISH_STOP_WORDS: &str = include_str!("../../data/stopwords/english.txt");

/// Immutable stop-word set shared by every text operator.
///
/// Built once when a session starts and handed to operators behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Create a stop-word set from words; entries are lower-cased
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        StopWords { words }
    }

    /// The bundled English list
    pub fn english() -> Self {
        Self::from_words(ENGLISH_STOP_WORDS.lines())
    }

    /// Load a newline-separated list from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let stop_words = Self::from_words(contents.lines());
        info!(
            "Loaded {} stop words from {}",
            stop_words.len(),
            path.as_ref().display()
        );
        Ok(stop_words)
    }

    /// Check whether a token is a stop word
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    /// Number of stop words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Normalize one cell: lower-case, strip ASCII punctuation, drop stop words
pub fn normalize_text(value: &Value, stop_words: &StopWords) -> String {
    let text = match value.as_text() {
        Some(text) => text.to_lowercase(),
        None => return String::new(),
    };

    let stripped: String = text.chars().filter(|c| !c.is_ascii_punctuation()).collect();

    stripped
        .split_whitespace()
        .filter(|token| !stop_words.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Clean a free-text column in place
pub struct CleanText {
    column: String,
    stop_words: Arc<StopWords>,
}

impl CleanText {
    /// Create a new text cleaner
    pub fn new(column: &str, stop_words: Arc<StopWords>) -> Self {
        CleanText {
            column: column.to_string(),
            stop_words,
        }
    }
}

impl DataProcessor for CleanText {
    fn process(&self, input: &DataSet) -> Result<DataSet, PipelineError> {
        let index = column_index(input, &self.column)?;

        let values = input
            .column_values(index)
            .map(|v| Value::String(normalize_text(v, &self.stop_words)))
            .collect();

        replace_column(input, index, values)
    }

    fn name(&self) -> &str {
        "clean_text"
    }

    fn target_columns(&self) -> Vec<String> {
        vec![self.column.clone()]
    }

    fn describe(&self) -> String {
        format!("Cleaned text in '{}'", self.column)
    }
}

/// Append character and word counts derived from a text column
pub struct LengthFeatures {
    column: String,
}

impl LengthFeatures {
    /// Create a new length feature processor
    pub fn new(column: &str) -> Self {
        LengthFeatures {
            column: column.to_string(),
        }
    }

    /// Names of the two derived columns
    pub fn output_names(&self) -> [String; 2] {
        [
            format!("{}_char_count", self.column),
            format!("{}_word_count", self.column),
        ]
    }
}

impl DataProcessor for LengthFeatures {
    fn process(&self, input: &DataSet) -> Result<DataSet, PipelineError> {
        let index = column_index(input, &self.column)?;

        let (chars, words): (Vec<Value>, Vec<Value>) = input
            .column_values(index)
            .map(|v| match v.as_text() {
                Some(text) => (
                    Value::Integer(text.chars().count() as i64),
                    Value::Integer(text.split_whitespace().count() as i64),
                ),
                None => (Value::Integer(0), Value::Integer(0)),
            })
            .unzip();

        append_columns(input, &[], self.output_names().to_vec(), vec![chars, words])
    }

    fn name(&self) -> &str {
        "length_features"
    }

    fn target_columns(&self) -> Vec<String> {
        vec![self.column.clone()]
    }

    fn describe(&self) -> String {
        format!("Added length features for '{}'", self.column)
    }
}
