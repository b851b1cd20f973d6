//! Reporting operation builders: search, aggregate, sort, join, group,
//! subquery

use super::{Aggregate, AggregateFunc, Group, Join, Search, Sort, Subquery};
use crate::catalog::{quote_ident, Catalog};
use crate::error::Result;
use crate::session::{QueryOutcome, Session};

/// Select the rows matching a condition
pub fn search(session: &Session, catalog: &Catalog, p: &Search) -> Result<QueryOutcome> {
    let table = catalog.table(&p.table)?;
    let sql = format!(
        "SELECT * FROM {} WHERE {}",
        quote_ident(table.name()),
        p.condition
    );
    session.execute_query(&sql, &[], true)
}

/// Apply an aggregate function to one column
///
/// `*` is accepted as the column for whole-table aggregates like COUNT(*).
pub fn aggregate(session: &Session, catalog: &Catalog, p: &Aggregate) -> Result<QueryOutcome> {
    let table = catalog.table(&p.table)?;
    let column = if p.column.trim() == "*" {
        "*".to_string()
    } else {
        quote_ident(&table.resolve_column(&p.column)?.name)
    };
    let sql = format!(
        "SELECT {}({}) FROM {}",
        p.function,
        column,
        quote_ident(table.name())
    );
    session.execute_query(&sql, &[], true)
}

/// Select the whole table ordered by one column
pub fn sort(session: &Session, catalog: &Catalog, p: &Sort) -> Result<QueryOutcome> {
    let table = catalog.table(&p.table)?;
    let column = table.resolve_column(&p.column)?;
    let sql = format!(
        "SELECT * FROM {} ORDER BY {} {}",
        quote_ident(table.name()),
        quote_ident(&column.name),
        p.order
    );
    session.execute_query(&sql, &[], true)
}

/// Inner join two tables on a key column that must exist in both
pub fn join(session: &Session, catalog: &Catalog, p: &Join) -> Result<QueryOutcome> {
    let left = catalog.table(&p.left)?;
    let right = catalog.table(&p.right)?;
    let left_key = left.resolve_column(&p.key)?;
    let right_key = right.resolve_column(&p.key)?;
    let sql = format!(
        "SELECT * FROM {left} INNER JOIN {right} ON {left}.{lk} = {right}.{rk}",
        left = quote_ident(left.name()),
        right = quote_ident(right.name()),
        lk = quote_ident(&left_key.name),
        rk = quote_ident(&right_key.name),
    );
    session.execute_query(&sql, &[], true)
}

/// Group by one column, counting rows per group
pub fn group(session: &Session, catalog: &Catalog, p: &Group) -> Result<QueryOutcome> {
    let table = catalog.table(&p.table)?;
    let column = quote_ident(&table.resolve_column(&p.column)?.name);
    let sql = format!(
        "SELECT {col}, COUNT(*) FROM {table} GROUP BY {col}",
        col = column,
        table = quote_ident(table.name()),
    );
    session.execute_query(&sql, &[], true)
}

/// Filter one column through an IN-subquery
pub fn subquery(session: &Session, catalog: &Catalog, p: &Subquery) -> Result<QueryOutcome> {
    let table = catalog.table(&p.table)?;
    let column = quote_ident(&table.resolve_column(&p.column)?.name);
    let sql = format!(
        "SELECT * FROM {} WHERE {} IN ({})",
        quote_ident(table.name()),
        column,
        p.subquery
    );
    session.execute_query(&sql, &[], true)
}
