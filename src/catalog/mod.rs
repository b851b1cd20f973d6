//! System catalog - fixed schema definitions and identifier validation

#[allow(clippy::module_inception)]
mod catalog;
mod schema;
mod types;

pub use catalog::{quote_ident, Catalog, ForeignKey, TableDef};
pub use schema::{Column, Schema};
pub use types::DataType;
