// Schema definition and validation
// Author: Gabriel Demetrios Lafis

use std::collections::HashSet;

use super::DataError;

/// Represents a schema for a dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema with the given fields
    pub fn new(fields: Vec<Field>) -> Self {
        Schema { fields }
    }

    /// Create a schema from column names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Schema::new(names.into_iter().map(|n| Field::new(n.into())).collect())
    }

    /// Get a reference to a field by name
    pub fn get_field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get the position of a field by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Get the field names in order
    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Check that field names are unique
    pub fn validate(&self) -> Result<(), DataError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(DataError::DuplicateColumn(field.name.clone()));
            }
        }

        Ok(())
    }
}

/// Represents a field in a schema.
///
/// Fields carry no declared type: a column's type is inferred from its
/// content whenever it is needed (see [`super::DataSet::column_type`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
}

impl Field {
    /// Create a new field
    pub fn new(name: String) -> Self {
        Field { name }
    }
}
