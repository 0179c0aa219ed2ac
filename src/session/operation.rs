// User-triggered operations
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::processing::{
    CleanText, DataProcessor, DropColumns, DropRows, FillMethod, FillMissing, LabelEncode,
    LengthFeatures, OneHotEncode, RowPolicy, StopWords, TfidfFeatures,
};

/// One action requested against the current table.
///
/// Serialized with an `op` tag, e.g.
/// `{"op":"fill_missing","column":"age","method":"mean"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    FillMissing {
        column: String,
        method: FillMethod,
    },
    DropRows {
        policy: RowPolicy,
        #[serde(default)]
        confirmed: bool,
    },
    DropColumns {
        columns: Vec<String>,
        #[serde(default)]
        confirmed: bool,
    },
    LabelEncode {
        column: String,
    },
    OneHotEncode {
        column: String,
    },
    CleanText {
        column: String,
    },
    LengthFeatures {
        column: String,
    },
    #[serde(rename = "tfidf_features")]
    Tfidf {
        column: String,
        #[serde(default)]
        max_features: Option<usize>,
    },
}

impl Operation {
    /// Short name used in logs and errors
    pub fn label(&self) -> &'static str {
        match self {
            Operation::FillMissing { .. } => "fill_missing",
            Operation::DropRows { .. } => "drop_rows",
            Operation::DropColumns { .. } => "drop_columns",
            Operation::LabelEncode { .. } => "label_encode",
            Operation::OneHotEncode { .. } => "one_hot_encode",
            Operation::CleanText { .. } => "clean_text",
            Operation::LengthFeatures { .. } => "length_features",
            Operation::Tfidf { .. } => "tfidf_features",
        }
    }

    /// Whether the operation removes data and therefore needs confirmation
    pub fn is_destructive(&self) -> bool {
        matches!(self, Operation::DropRows { .. } | Operation::DropColumns { .. })
    }

    /// Whether the caller confirmed a destructive operation
    pub fn is_confirmed(&self) -> bool {
        match self {
            Operation::DropRows { confirmed, .. } | Operation::DropColumns { confirmed, .. } => {
                *confirmed
            }
            _ => true,
        }
    }

    /// Build the processor that carries out this operation
    pub fn processor(
        &self,
        stop_words: &Arc<StopWords>,
        default_max_features: usize,
    ) -> Box<dyn DataProcessor> {
        match self {
            Operation::FillMissing { column, method } => Box::new(FillMissing::new(column, *method)),
            Operation::DropRows { policy, .. } => Box::new(DropRows::new(policy.clone())),
            Operation::DropColumns { columns, .. } => Box::new(DropColumns::new(columns.clone())),
            Operation::LabelEncode { column } => Box::new(LabelEncode::new(column)),
            Operation::OneHotEncode { column } => Box::new(OneHotEncode::new(column)),
            Operation::CleanText { column } => {
                Box::new(CleanText::new(column, Arc::clone(stop_words)))
            }
            Operation::LengthFeatures { column } => Box::new(LengthFeatures::new(column)),
            Operation::Tfidf {
                column,
                max_features,
            } => Box::new(TfidfFeatures::new(
                column,
                max_features.unwrap_or(default_max_features),
            )),
        }
    }
}
