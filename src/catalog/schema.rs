//! Schema definitions for CardDB
//!
//! This module defines table schemas and column metadata.

use super::types::DataType;
use std::collections::HashMap;

/// Column definition in a table
#[derive(Debug, Clone)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// Column position (0-indexed)
    pub position: usize,
    /// Is this column nullable?
    pub nullable: bool,
    /// Default value expression (as string)
    pub default: Option<String>,
    /// Is this part of the primary key?
    pub primary_key: bool,
}

impl Column {
    /// Create a new column with minimal required fields
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            position: 0,
            nullable: true,
            default: None,
            primary_key: false,
        }
    }

    /// Set default value
    pub fn default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set primary key flag
    pub fn primary_key(mut self, pk: bool) -> Self {
        self.primary_key = pk;
        if pk {
            self.nullable = false;
        }
        self
    }
}

/// Table schema - defines the structure of a table
#[derive(Debug, Clone)]
pub struct Schema {
    /// Ordered list of columns
    columns: Vec<Column>,
    /// Lowercased column name to index mapping
    name_to_index: HashMap<String, usize>,
}

impl Schema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            name_to_index: HashMap::new(),
        }
    }

    /// Create a schema from a list of columns
    pub fn from_columns(columns: Vec<Column>) -> Self {
        let mut schema = Self::new();
        for col in columns {
            schema.add_column(col);
        }
        schema
    }

    /// Add a column to the schema
    pub fn add_column(&mut self, mut column: Column) {
        column.position = self.columns.len();
        self.name_to_index
            .insert(column.name.to_ascii_lowercase(), column.position);
        self.columns.push(column);
    }

    /// Get column by name (case-insensitive, matching SQL identifier rules)
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.name_to_index
            .get(&name.to_ascii_lowercase())
            .map(|&idx| &self.columns[idx])
    }

    /// Get all columns
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.name_to_index
            .contains_key(&name.to_ascii_lowercase())
    }

    /// Get primary key columns
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.primary_key).collect()
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_creation() {
        let mut schema = Schema::new();
        schema.add_column(Column::new("Amt", DataType::Decimal(10, 2)).primary_key(true));
        schema.add_column(Column::new("Category", DataType::Varchar(255)));

        assert_eq!(schema.column_count(), 2);
        assert!(schema.has_column("Amt"));
        assert!(!schema.has_column("unknown"));

        let amt = schema.get_column("Amt").unwrap();
        assert!(amt.primary_key);
        assert!(!amt.nullable);
        assert_eq!(schema.primary_key_columns().len(), 1);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let schema =
            Schema::from_columns(vec![Column::new("Cc_num", DataType::Numeric).primary_key(true)]);

        assert!(schema.has_column("cc_num"));
        assert!(schema.has_column("CC_NUM"));
        assert_eq!(schema.get_column("cc_NUM").unwrap().name, "Cc_num");
    }

    #[test]
    fn test_positions_assigned_in_order() {
        let schema = Schema::from_columns(vec![
            Column::new("Lat", DataType::Float),
            Column::new("Long", DataType::Float),
        ]);

        assert_eq!(schema.get_column("Lat").unwrap().position, 0);
        assert_eq!(schema.get_column("Long").unwrap().position, 1);
    }
}
