// TF-IDF term features
// Author: Gabriel Demetrios Lafis

use std::collections::{BTreeMap, HashMap};

use log::debug;

use super::{append_columns, column_index, DataProcessor, PipelineError};
use crate::data::{DataSet, Value};

/// Default vocabulary bound
pub const DEFAULT_MAX_FEATURES: usize = 10;

/// Prefix of generated feature columns
const COLUMN_PREFIX: &str = "tfidf_";

/// Split a document into lower-cased terms of two or more word characters
pub fn tokenize_terms(document: &str) -> Vec<String> {
    document
        .to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Learns a bounded vocabulary and inverse document frequencies
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
}

/// Fitted vocabulary with one smoothed idf weight per term
#[derive(Debug, Clone, PartialEq)]
pub struct TfidfModel {
    /// Selected terms in ascending order
    pub vocabulary: Vec<String>,
    /// `ln((1 + n) / (1 + df)) + 1` for each term
    pub idf: Vec<f64>,
}

/// Document-term weights, one row per document
#[derive(Debug, Clone, PartialEq)]
pub struct TermMatrix {
    pub terms: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl TfidfVectorizer {
    /// Create a new vectorizer keeping at most `max_features` terms
    pub fn new(max_features: usize) -> Result<Self, PipelineError> {
        if max_features == 0 {
            return Err(PipelineError::InvalidArgument(
                "max_features must be at least 1".to_string(),
            ));
        }

        Ok(TfidfVectorizer { max_features })
    }

    /// Learn the vocabulary from a corpus.
    ///
    /// Terms are ranked by document frequency, then by total occurrences,
    /// then alphabetically; the top `max_features` are kept.
    pub fn fit(&self, documents: &[String]) -> TfidfModel {
        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        let mut term_frequency: HashMap<String, usize> = HashMap::new();

        for document in documents {
            let terms = tokenize_terms(document);
            for term in &terms {
                *term_frequency.entry(term.clone()).or_insert(0) += 1;
            }

            let mut unique = terms;
            unique.sort();
            unique.dedup();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(String, usize)> = document_frequency.into_iter().collect();
        ranked.sort_by(|(a, df_a), (b, df_b)| {
            df_b.cmp(df_a)
                .then_with(|| term_frequency[b].cmp(&term_frequency[a]))
                .then_with(|| a.cmp(b))
        });
        ranked.truncate(self.max_features);
        ranked.sort_by(|(a, _), (b, _)| a.cmp(b));

        let n = documents.len() as f64;
        let idf = ranked
            .iter()
            .map(|(_, df)| ((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();
        let vocabulary = ranked.into_iter().map(|(term, _)| term).collect();

        TfidfModel { vocabulary, idf }
    }

    /// Fit on a corpus and weight the same corpus
    pub fn fit_transform(&self, documents: &[String]) -> TermMatrix {
        self.fit(documents).transform(documents)
    }
}

impl TfidfModel {
    /// Weight documents by raw term count times idf, L2-normalized per row
    pub fn transform(&self, documents: &[String]) -> TermMatrix {
        let positions: HashMap<&str, usize> = self
            .vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.as_str(), i))
            .collect();

        let rows = documents
            .iter()
            .map(|document| {
                let mut row = vec![0.0; self.vocabulary.len()];
                for term in tokenize_terms(document) {
                    if let Some(&i) = positions.get(term.as_str()) {
                        row[i] += 1.0;
                    }
                }

                for (weight, idf) in row.iter_mut().zip(&self.idf) {
                    *weight *= idf;
                }

                let norm = row.iter().map(|w| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    row.iter_mut().for_each(|w| *w /= norm);
                }
                row
            })
            .collect();

        TermMatrix {
            terms: self.vocabulary.clone(),
            rows,
        }
    }
}

/// Append TF-IDF weights of a text column as `tfidf_<term>` columns
pub struct TfidfFeatures {
    column: String,
    max_features: usize,
}

impl TfidfFeatures {
    /// Create a new TF-IDF feature processor
    pub fn new(column: &str, max_features: usize) -> Self {
        TfidfFeatures {
            column: column.to_string(),
            max_features,
        }
    }
}

impl DataProcessor for TfidfFeatures {
    fn process(&self, input: &DataSet) -> Result<DataSet, PipelineError> {
        let index = column_index(input, &self.column)?;
        let vectorizer = TfidfVectorizer::new(self.max_features)?;

        let documents: Vec<String> = input
            .column_values(index)
            .map(|v| v.as_text().unwrap_or_default())
            .collect();

        let matrix = vectorizer.fit_transform(&documents);
        debug!(
            "TF-IDF on '{}' selected {} terms",
            self.column,
            matrix.terms.len()
        );

        if matrix.rows.len() != input.len() {
            return Err(PipelineError::RowMismatch {
                expected: input.len(),
                got: matrix.rows.len(),
            });
        }

        let names = matrix
            .terms
            .iter()
            .map(|term| format!("{}{}", COLUMN_PREFIX, term))
            .collect();

        let columns = (0..matrix.terms.len())
            .map(|t| matrix.rows.iter().map(|row| Value::Float(row[t])).collect())
            .collect();

        append_columns(input, &[], names, columns)
    }

    fn name(&self) -> &str {
        "tfidf_features"
    }

    fn target_columns(&self) -> Vec<String> {
        vec![self.column.clone()]
    }

    fn parameters(&self) -> BTreeMap<String, String> {
        BTreeMap::from([("max_features".to_string(), self.max_features.to_string())])
    }

    fn describe(&self) -> String {
        format!(
            "Generated TF-IDF features from '{}' (max_features={})",
            self.column, self.max_features
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Row, Schema};

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    fn corpus(texts: &[Option<&str>]) -> DataSet {
        let rows = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let text = text.map_or(Value::Null, |t| Value::String(t.to_string()));
                Row::new(vec![Value::Integer(i as i64), text])
            })
            .collect();

        DataSet::from_rows(Schema::from_names(["id", "text"]), rows).unwrap()
    }

    #[test]
    fn test_tokenize_terms() {
        assert_eq!(
            tokenize_terms("A cat's hat, snake_case 42!"),
            vec!["cat", "hat", "snake_case", "42"]
        );
    }

    #[test]
    fn test_idf_weights() {
        let vectorizer = TfidfVectorizer::new(10).unwrap();
        let model = vectorizer.fit(&docs(&["apple banana", "apple cherry"]));

        assert_eq!(model.vocabulary, vec!["apple", "banana", "cherry"]);
        assert!((model.idf[0] - 1.0).abs() < 1e-12);
        assert!((model.idf[1] - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rows_are_l2_normalized() {
        let vectorizer = TfidfVectorizer::new(10).unwrap();
        let matrix = vectorizer.fit_transform(&docs(&["apple banana", "apple cherry", ""]));

        let norm: f64 = matrix.rows[0].iter().map(|w| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
        assert!(matrix.rows[2].iter().all(|&w| w == 0.0));
        assert!(matrix.rows[0][1] > matrix.rows[0][0]);
    }

    #[test]
    fn test_vocabulary_bound_uses_document_frequency() {
        let vectorizer = TfidfVectorizer::new(2).unwrap();
        let model = vectorizer.fit(&docs(&[
            "rust rust rust rust",
            "fast safe",
            "safe fast rust",
            "fast",
        ]));

        // df: fast=3, rust=2, safe=2; rust wins the tie on total count
        assert_eq!(model.vocabulary, vec!["fast", "rust"]);
    }

    #[test]
    fn test_zero_max_features_is_rejected() {
        assert!(matches!(
            TfidfVectorizer::new(0),
            Err(PipelineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_features_are_appended() {
        let input = corpus(&[Some("the quick fox"), None, Some("quick brown dog")]);
        let result = TfidfFeatures::new("text", 3).process(&input).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result.column_count(), 5);
        assert_eq!(result.column_names()[2..], ["tfidf_brown", "tfidf_dog", "tfidf_quick"]);
        assert_eq!(result.data[1].values[2..], [Value::Float(0.0), Value::Float(0.0), Value::Float(0.0)]);
    }

    #[test]
    fn test_small_vocabulary_adds_fewer_columns() {
        let input = corpus(&[Some("alpha beta"), Some("beta")]);
        let result = TfidfFeatures::new("text", 10).process(&input).unwrap();

        assert_eq!(result.column_names(), vec!["id", "text", "tfidf_alpha", "tfidf_beta"]);
    }

    #[test]
    fn test_all_missing_column_adds_nothing() {
        let input = corpus(&[None, None]);
        let result = TfidfFeatures::new("text", 10).process(&input).unwrap();

        assert_eq!(result.shape(), (2, 2));
    }
}
