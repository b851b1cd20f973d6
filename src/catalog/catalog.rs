//! System catalog for CardDB
//!
//! The catalog is the fixed list of tables the tool provisions and the
//! allow-list every user-supplied table or column name is checked against.
//! It is not derived from the database; the database is provisioned from it.

use indexmap::IndexMap;

use super::schema::{Column, Schema};
use super::types::DataType;
use crate::error::{Error, Result};

/// Quote an identifier for inclusion in SQL text
///
/// Identifiers cannot be parameterized, so they are validated against the
/// catalog and then quoted. Quoting also keeps reserved words such as
/// `Transaction` usable as table names.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// A foreign key constraint from one table to a parent table
#[derive(Debug, Clone)]
pub struct ForeignKey {
    /// Referencing columns in the child table
    pub columns: Vec<String>,
    /// Parent table name
    pub parent_table: String,
    /// Referenced columns in the parent table
    pub parent_columns: Vec<String>,
    /// Propagate key updates to child rows
    pub on_update_cascade: bool,
}

impl ForeignKey {
    pub fn new(columns: &[&str], parent_table: &str, parent_columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            parent_table: parent_table.to_string(),
            parent_columns: parent_columns.iter().map(|c| c.to_string()).collect(),
            on_update_cascade: false,
        }
    }

    pub fn on_update_cascade(mut self) -> Self {
        self.on_update_cascade = true;
        self
    }

    fn to_sql(&self) -> String {
        let cols: Vec<String> = self.columns.iter().map(|c| quote_ident(c)).collect();
        let parent_cols: Vec<String> =
            self.parent_columns.iter().map(|c| quote_ident(c)).collect();
        let mut sql = format!(
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            cols.join(", "),
            quote_ident(&self.parent_table),
            parent_cols.join(", ")
        );
        if self.on_update_cascade {
            sql.push_str(" ON UPDATE CASCADE");
        }
        sql
    }
}

/// Definition of one table in the fixed schema
#[derive(Debug, Clone)]
pub struct TableDef {
    name: String,
    schema: Schema,
    foreign_keys: Vec<ForeignKey>,
}

impl TableDef {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            foreign_keys: Vec::new(),
        }
    }

    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Canonical table name as it appears in DDL
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Resolve a user-supplied column name to its canonical spelling
    pub fn resolve_column(&self, name: &str) -> Result<&Column> {
        self.schema
            .get_column(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string(), self.name.clone()))
    }

    /// Render the conditional CREATE TABLE statement for this table
    ///
    /// With `with_constraints` set, foreign key clauses are declared inline;
    /// the engine only enforces them once `PRAGMA foreign_keys` is on.
    pub fn create_sql(&self, with_constraints: bool) -> String {
        let mut items: Vec<String> = Vec::new();

        for col in self.schema.columns() {
            let mut item = format!("{} {}", quote_ident(&col.name), col.data_type);
            if let Some(default) = &col.default {
                item.push_str(&format!(" DEFAULT {}", default));
            }
            items.push(item);
        }

        let pk: Vec<String> = self
            .schema
            .primary_key_columns()
            .iter()
            .map(|c| quote_ident(&c.name))
            .collect();
        if !pk.is_empty() {
            items.push(format!("PRIMARY KEY ({})", pk.join(", ")));
        }

        if with_constraints {
            for fk in &self.foreign_keys {
                items.push(fk.to_sql());
            }
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            quote_ident(&self.name),
            items.join(",\n    ")
        )
    }
}

/// The fixed table registry
///
/// Tables keep their declaration order so parents are created before the
/// tables that reference them.
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: IndexMap<String, TableDef>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            tables: IndexMap::new(),
        }
    }

    /// The credit card transaction schema this tool provisions
    pub fn standard() -> Self {
        let mut catalog = Self::new();

        catalog.add_table(TableDef::new(
            "Location",
            Schema::from_columns(vec![
                Column::new("Lat", DataType::Float).primary_key(true),
                Column::new("Long", DataType::Float).primary_key(true),
            ]),
        ));

        catalog.add_table(TableDef::new(
            "Merchant",
            Schema::from_columns(vec![
                Column::new("Merchant", DataType::Varchar(255)).primary_key(true),
                Column::new("Merch_lat", DataType::Decimal(10, 8)),
                Column::new("Merch_long", DataType::Decimal(11, 8)),
            ]),
        ));

        catalog.add_table(
            TableDef::new(
                "Cardholder",
                Schema::from_columns(vec![
                    Column::new("Cc_num", DataType::Numeric).primary_key(true),
                    Column::new("First", DataType::Varchar(255)),
                    Column::new("Last", DataType::Varchar(255)),
                    Column::new("Gender", DataType::Char(1)),
                    Column::new("Street", DataType::Varchar(255)),
                    Column::new("City", DataType::Varchar(255)),
                    Column::new("State", DataType::Char(2)),
                    Column::new("Zip", DataType::Varchar(10)),
                    Column::new("Lat", DataType::Float),
                    Column::new("Long", DataType::Float),
                    Column::new("City_pop", DataType::Integer),
                    Column::new("Job", DataType::Varchar(255)),
                    Column::new("Dob", DataType::Date),
                ]),
            )
            .foreign_key(ForeignKey::new(&["Lat", "Long"], "Location", &["Lat", "Long"])),
        );

        catalog.add_table(
            TableDef::new(
                "Transaction",
                Schema::from_columns(vec![
                    Column::new("Trans_num", DataType::Varchar(36)).primary_key(true),
                    Column::new("Trans_date_trans_time", DataType::Timestamp),
                    Column::new("Cc_num", DataType::Numeric),
                    Column::new("Merchant", DataType::Varchar(255)),
                    Column::new("Category", DataType::Varchar(255)),
                    Column::new("Amt", DataType::Decimal(10, 2)),
                    Column::new("Unix_time", DataType::Numeric),
                    Column::new("Is_fraud", DataType::Integer).default("0"),
                ]),
            )
            .foreign_key(ForeignKey::new(&["Cc_num"], "Cardholder", &["Cc_num"]))
            .foreign_key(ForeignKey::new(&["Merchant"], "Merchant", &["Merchant"]))
            .foreign_key(ForeignKey::new(&["Amt"], "Amount", &["Amt"]).on_update_cascade()),
        );

        catalog.add_table(TableDef::new(
            "City",
            Schema::from_columns(vec![
                Column::new("City", DataType::Varchar(255)).primary_key(true),
                Column::new("State", DataType::Char(2)),
                Column::new("City_pop", DataType::Integer),
            ]),
        ));

        catalog.add_table(TableDef::new(
            "Date",
            Schema::from_columns(vec![
                Column::new("Trans_date_trans_time", DataType::Timestamp).primary_key(true)
            ]),
        ));

        catalog.add_table(TableDef::new(
            "Amount",
            Schema::from_columns(vec![
                Column::new("Amt", DataType::Decimal(10, 2)).primary_key(true)
            ]),
        ));

        catalog.add_table(TableDef::new(
            "AgeGroup",
            Schema::from_columns(vec![Column::new("Dob", DataType::Date).primary_key(true)]),
        ));

        catalog.add_table(TableDef::new(
            "Zip_Code",
            Schema::from_columns(vec![
                Column::new("Zip", DataType::Varchar(10)).primary_key(true)
            ]),
        ));

        catalog
    }

    /// Add a table to the catalog
    pub fn add_table(&mut self, table: TableDef) {
        self.tables
            .insert(table.name().to_ascii_lowercase(), table);
    }

    /// Resolve a user-supplied table name (case-insensitive)
    pub fn table(&self, name: &str) -> Result<&TableDef> {
        self.tables
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    /// Tables in declaration order
    pub fn tables(&self) -> impl Iterator<Item = &TableDef> {
        self.tables.values()
    }

    /// Canonical table names in declaration order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.values().map(|t| t.name()).collect()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_tables() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.table_count(), 9);
        assert_eq!(
            catalog.table_names(),
            vec![
                "Location",
                "Merchant",
                "Cardholder",
                "Transaction",
                "City",
                "Date",
                "Amount",
                "AgeGroup",
                "Zip_Code"
            ]
        );
    }

    #[test]
    fn test_table_lookup_is_case_insensitive() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.table("transaction").unwrap().name(), "Transaction");
        assert_eq!(catalog.table("AGEGROUP").unwrap().name(), "AgeGroup");
        assert!(matches!(
            catalog.table("Orders"),
            Err(Error::TableNotFound(_))
        ));
    }

    #[test]
    fn test_composite_primary_key() {
        let catalog = Catalog::standard();
        let location = catalog.table("Location").unwrap();
        assert_eq!(location.schema().primary_key_columns().len(), 2);

        let ddl = location.create_sql(false);
        assert!(ddl.contains("PRIMARY KEY (\"Lat\", \"Long\")"));
    }

    #[test]
    fn test_create_sql_variants() {
        let catalog = Catalog::standard();
        let transaction = catalog.table("Transaction").unwrap();

        let base = transaction.create_sql(false);
        assert!(base.starts_with("CREATE TABLE IF NOT EXISTS \"Transaction\""));
        assert!(base.contains("\"Is_fraud\" INT DEFAULT 0"));
        assert!(!base.contains("FOREIGN KEY"));

        let constrained = transaction.create_sql(true);
        assert!(constrained.contains("FOREIGN KEY (\"Cc_num\") REFERENCES \"Cardholder\" (\"Cc_num\")"));
        assert!(constrained
            .contains("FOREIGN KEY (\"Amt\") REFERENCES \"Amount\" (\"Amt\") ON UPDATE CASCADE"));
    }

    #[test]
    fn test_resolve_column() {
        let catalog = Catalog::standard();
        let amount = catalog.table("Amount").unwrap();
        assert_eq!(amount.resolve_column("amt").unwrap().name, "Amt");
        assert!(matches!(
            amount.resolve_column("total"),
            Err(Error::ColumnNotFound(_, _))
        ));
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("Transaction"), "\"Transaction\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
