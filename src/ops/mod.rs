//! CRUD and reporting operations
//!
//! One builder per menu operation. Each builder checks user-supplied table
//! and column names against the catalog, splices the quoted identifiers into
//! a SQL template with `?` placeholders for values, and hands the statement
//! to the session. Condition clauses and subqueries stay trusted raw
//! fragments; the tool is a raw SQL front-end, not a query abstraction.

mod dml;
mod query;

use std::fmt;
use std::str::FromStr;

pub use dml::{delete, insert, update};
pub use query::{aggregate, group, join, search, sort, subquery};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::session::{QueryOutcome, Session};

/// Aggregate functions the aggregate operation accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunc {
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

impl FromStr for AggregateFunc {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUM" => Ok(AggregateFunc::Sum),
            "AVG" => Ok(AggregateFunc::Avg),
            "COUNT" => Ok(AggregateFunc::Count),
            "MIN" => Ok(AggregateFunc::Min),
            "MAX" => Ok(AggregateFunc::Max),
            _ => Err(Error::UnknownAggregate(s.trim().to_string())),
        }
    }
}

impl fmt::Display for AggregateFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregateFunc::Sum => "SUM",
            AggregateFunc::Avg => "AVG",
            AggregateFunc::Count => "COUNT",
            AggregateFunc::Min => "MIN",
            AggregateFunc::Max => "MAX",
        };
        write!(f, "{}", name)
    }
}

/// Sort direction for the sort operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" | "ASCENDING" => Ok(SortOrder::Ascending),
            "DESC" | "DESCENDING" => Ok(SortOrder::Descending),
            _ => Err(Error::UnknownSortOrder(s.trim().to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => write!(f, "ASC"),
            SortOrder::Descending => write!(f, "DESC"),
        }
    }
}

/// Parameters for an insert
#[derive(Debug, Clone)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<String>,
}

/// Parameters for a delete
#[derive(Debug, Clone)]
pub struct Delete {
    pub table: String,
    pub condition: String,
}

/// Parameters for an update of one column
#[derive(Debug, Clone)]
pub struct Update {
    pub table: String,
    pub column: String,
    pub new_value: String,
    pub condition: String,
}

/// Parameters for a conditional search
#[derive(Debug, Clone)]
pub struct Search {
    pub table: String,
    pub condition: String,
}

/// Parameters for an aggregate over one column
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub table: String,
    pub column: String,
    pub function: AggregateFunc,
}

/// Parameters for a full-table sort
#[derive(Debug, Clone)]
pub struct Sort {
    pub table: String,
    pub column: String,
    pub order: SortOrder,
}

/// Parameters for an inner join on a shared key name
#[derive(Debug, Clone)]
pub struct Join {
    pub left: String,
    pub right: String,
    pub key: String,
}

/// Parameters for a group-by with count
#[derive(Debug, Clone)]
pub struct Group {
    pub table: String,
    pub column: String,
}

/// Parameters for an IN-subquery filter
#[derive(Debug, Clone)]
pub struct Subquery {
    pub table: String,
    pub column: String,
    pub subquery: String,
}

/// The closed set of data operations the menu dispatches to
#[derive(Debug, Clone)]
pub enum Operation {
    Insert(Insert),
    Delete(Delete),
    Update(Update),
    Search(Search),
    Aggregate(Aggregate),
    Sort(Sort),
    Join(Join),
    Group(Group),
    Subquery(Subquery),
}

impl Operation {
    /// Whether this operation mutates data and needs a following commit
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Operation::Insert(_) | Operation::Delete(_) | Operation::Update(_)
        )
    }
}

/// Dispatch an operation to its builder
pub fn run(session: &Session, catalog: &Catalog, op: &Operation) -> Result<QueryOutcome> {
    match op {
        Operation::Insert(p) => insert(session, catalog, p),
        Operation::Delete(p) => delete(session, catalog, p),
        Operation::Update(p) => update(session, catalog, p),
        Operation::Search(p) => search(session, catalog, p),
        Operation::Aggregate(p) => aggregate(session, catalog, p),
        Operation::Sort(p) => sort(session, catalog, p),
        Operation::Join(p) => join(session, catalog, p),
        Operation::Group(p) => group(session, catalog, p),
        Operation::Subquery(p) => subquery(session, catalog, p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_func_parsing() {
        assert_eq!("count".parse::<AggregateFunc>().unwrap(), AggregateFunc::Count);
        assert_eq!(" Sum ".parse::<AggregateFunc>().unwrap(), AggregateFunc::Sum);
        assert!(matches!(
            "MEDIAN".parse::<AggregateFunc>(),
            Err(Error::UnknownAggregate(_))
        ));
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Ascending);
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Descending);
        assert!(matches!(
            "sideways".parse::<SortOrder>(),
            Err(Error::UnknownSortOrder(_))
        ));
    }

    #[test]
    fn test_mutation_classification() {
        let insert = Operation::Insert(Insert {
            table: "Amount".into(),
            columns: vec!["Amt".into()],
            values: vec!["1.00".into()],
        });
        assert!(insert.is_mutation());

        let search = Operation::Search(Search {
            table: "Amount".into(),
            condition: "Amt > 0".into(),
        });
        assert!(!search.is_mutation());
    }
}
