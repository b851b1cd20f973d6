//! Mutating operation builders: insert, delete, update
//!
//! The statements built here leave the transaction open; the shell issues
//! the commit as a separate step.

use super::{Delete, Insert, Update};
use crate::catalog::{quote_ident, Catalog};
use crate::error::{Error, Result};
use crate::session::{QueryOutcome, Session};

/// Insert one row
pub fn insert(session: &Session, catalog: &Catalog, p: &Insert) -> Result<QueryOutcome> {
    let table = catalog.table(&p.table)?;
    if p.columns.len() != p.values.len() {
        return Err(Error::ColumnValueMismatch {
            columns: p.columns.len(),
            values: p.values.len(),
        });
    }

    let mut columns = Vec::with_capacity(p.columns.len());
    for name in &p.columns {
        columns.push(quote_ident(&table.resolve_column(name)?.name));
    }
    let placeholders = vec!["?"; p.values.len()].join(", ");

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table.name()),
        columns.join(", "),
        placeholders
    );
    session.execute_query(&sql, &p.values, false)
}

/// Delete the rows matching a condition
pub fn delete(session: &Session, catalog: &Catalog, p: &Delete) -> Result<QueryOutcome> {
    let table = catalog.table(&p.table)?;
    let sql = format!(
        "DELETE FROM {} WHERE {}",
        quote_ident(table.name()),
        p.condition
    );
    session.execute_query(&sql, &[], false)
}

/// Set one column to a new value on the rows matching a condition
pub fn update(session: &Session, catalog: &Catalog, p: &Update) -> Result<QueryOutcome> {
    let table = catalog.table(&p.table)?;
    let column = table.resolve_column(&p.column)?;
    let sql = format!(
        "UPDATE {} SET {} = ? WHERE {}",
        quote_ident(table.name()),
        quote_ident(&column.name),
        p.condition
    );
    session.execute_query(&sql, std::slice::from_ref(&p.new_value), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::ops::Search;
    use crate::session::Session;
    use rusqlite::types::Value;

    fn setup() -> (Session, Catalog) {
        let catalog = Catalog::standard();
        let session = Session::open_in_memory().unwrap();
        session.create_tables(&catalog, false);
        (session, catalog)
    }

    fn amount_insert(amt: &str) -> Insert {
        Insert {
            table: "Amount".into(),
            columns: vec!["Amt".into()],
            values: vec![amt.into()],
        }
    }

    #[test]
    fn test_insert_then_search_by_primary_key() {
        let (session, catalog) = setup();
        insert(&session, &catalog, &amount_insert("19.99")).unwrap();

        let found = crate::ops::search(
            &session,
            &catalog,
            &Search {
                table: "Amount".into(),
                condition: "Amt = 19.99".into(),
            },
        )
        .unwrap();
        assert_eq!(found.rows, vec![vec![Value::Real(19.99)]]);
    }

    #[test]
    fn test_insert_validates_identifiers() {
        let (session, catalog) = setup();

        let unknown_table = insert(
            &session,
            &catalog,
            &Insert {
                table: "Orders".into(),
                columns: vec!["Amt".into()],
                values: vec!["1.00".into()],
            },
        );
        assert!(matches!(unknown_table, Err(Error::TableNotFound(_))));

        let unknown_column = insert(
            &session,
            &catalog,
            &Insert {
                table: "Amount".into(),
                columns: vec!["total".into()],
                values: vec!["1.00".into()],
            },
        );
        assert!(matches!(unknown_column, Err(Error::ColumnNotFound(_, _))));

        let mismatch = insert(
            &session,
            &catalog,
            &Insert {
                table: "Location".into(),
                columns: vec!["Lat".into(), "Long".into()],
                values: vec!["1.5".into()],
            },
        );
        assert!(matches!(
            mismatch,
            Err(Error::ColumnValueMismatch { columns: 2, values: 1 })
        ));
    }

    #[test]
    fn test_delete_matching_row() {
        let (session, catalog) = setup();
        insert(&session, &catalog, &amount_insert("5.00")).unwrap();
        insert(&session, &catalog, &amount_insert("7.00")).unwrap();

        let outcome = delete(
            &session,
            &catalog,
            &Delete {
                table: "Amount".into(),
                condition: "Amt = 5.00".into(),
            },
        )
        .unwrap();
        assert_eq!(outcome.affected, 1);

        let gone = crate::ops::search(
            &session,
            &catalog,
            &Search {
                table: "Amount".into(),
                condition: "Amt = 5.00".into(),
            },
        )
        .unwrap();
        assert!(gone.rows.is_empty());
    }

    #[test]
    fn test_update_reflected_in_search() {
        let (session, catalog) = setup();
        insert(
            &session,
            &catalog,
            &Insert {
                table: "City".into(),
                columns: vec!["City".into(), "State".into(), "City_pop".into()],
                values: vec!["Springfield".into(), "IL".into(), "110000".into()],
            },
        )
        .unwrap();

        update(
            &session,
            &catalog,
            &Update {
                table: "City".into(),
                column: "City_pop".into(),
                new_value: "115000".into(),
                condition: "City = 'Springfield'".into(),
            },
        )
        .unwrap();

        let found = crate::ops::search(
            &session,
            &catalog,
            &Search {
                table: "City".into(),
                condition: "City = 'Springfield'".into(),
            },
        )
        .unwrap();
        assert_eq!(found.rows[0][2], Value::Integer(115000));
    }

    #[test]
    fn test_duplicate_primary_key_is_engine_rejected() {
        let (session, catalog) = setup();
        insert(&session, &catalog, &amount_insert("3.00")).unwrap();
        let dup = insert(&session, &catalog, &amount_insert("3.00"));
        assert!(matches!(dup, Err(Error::Execution(_))));
    }
}
