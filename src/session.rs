//! Database session for CardDB
//!
//! The session owns the single persistent connection and is the chokepoint
//! every operation funnels through. Statements run inside a driver-managed
//! transaction that stays open until an explicit commit; any database error
//! rolls the open transaction back before the error is surfaced.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use tracing::{debug, error, info, warn};

use crate::catalog::Catalog;
use crate::config::ConnectionConfig;
use crate::error::{Error, Result};

/// Result of one executed statement
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    /// Column names, empty for statements without a result set
    pub columns: Vec<String>,
    /// Fetched rows
    pub rows: Vec<Vec<Value>>,
    /// Rows affected by a mutating statement
    pub affected: usize,
}

impl QueryOutcome {
    /// Whether the statement produced a result set
    pub fn is_result_set(&self) -> bool {
        !self.columns.is_empty()
    }
}

/// A session over the one connection the process holds for its lifetime
pub struct Session {
    conn: Connection,
}

impl Session {
    /// Open the configured database and provision the fixed schema
    ///
    /// Schema creation degrades on failure (tables may be partially
    /// created); only the connection itself failing is an error here.
    pub fn connect(config: &ConnectionConfig, catalog: &Catalog) -> Result<Self> {
        let conn = Connection::open(&config.database).map_err(Error::Connection)?;
        info!(database = %config.database.display(), "database connected");

        let session = Self { conn };
        session.create_tables(catalog, config.enforce_foreign_keys);
        if config.enforce_foreign_keys {
            session.enable_foreign_keys();
        }
        Ok(session)
    }

    /// Open a private in-memory database, without provisioning
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(Error::Connection)?;
        Ok(Self { conn })
    }

    /// Create every table in the catalog if it does not already exist
    ///
    /// The whole batch runs in one transaction: any failing statement rolls
    /// it back and is reported, and initialization does not raise.
    pub fn create_tables(&self, catalog: &Catalog, with_constraints: bool) {
        let attempt = (|| -> rusqlite::Result<()> {
            self.ensure_transaction()?;
            for table in catalog.tables() {
                debug!(table = table.name(), "creating table if absent");
                self.conn.execute(&table.create_sql(with_constraints), [])?;
            }
            self.conn.execute_batch("COMMIT")
        })();

        match attempt {
            Ok(()) => info!("tables created successfully"),
            Err(e) => {
                self.rollback_quietly();
                error!("error creating tables: {}", e);
            }
        }
    }

    /// Turn on referential enforcement for the constrained schema variant
    ///
    /// Layered separately because the pragma only takes effect outside a
    /// transaction. Non-fatal; "already enabled" is reported distinctly
    /// from real failures.
    pub fn enable_foreign_keys(&self) {
        let state = self
            .conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get::<_, i64>(0));
        match state {
            Ok(1) => info!("foreign key enforcement already enabled"),
            Ok(_) => match self.conn.execute_batch("PRAGMA foreign_keys = ON") {
                Ok(()) => info!("foreign key constraints enabled"),
                Err(e) => warn!("error enabling foreign key constraints: {}", e),
            },
            Err(e) => warn!("error enabling foreign key constraints: {}", e),
        }
    }

    /// Execute one statement, fetching all rows when `fetch` is set and the
    /// statement produces a result set
    ///
    /// On a database error the open transaction is rolled back before the
    /// error is returned.
    pub fn execute_query(&self, sql: &str, params: &[String], fetch: bool) -> Result<QueryOutcome> {
        debug!(%sql, "executing statement");
        self.ensure_transaction()?;
        match self.run_statement(sql, params, fetch) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.rollback_quietly();
                Err(Error::Execution(e))
            }
        }
    }

    fn run_statement(
        &self,
        sql: &str,
        params: &[String],
        fetch: bool,
    ) -> rusqlite::Result<QueryOutcome> {
        let mut stmt = self.conn.prepare(sql)?;
        if fetch && stmt.column_count() > 0 {
            let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
            let column_count = stmt.column_count();
            let mut fetched = Vec::new();
            let mut rows = stmt.query(params_from_iter(params.iter()))?;
            while let Some(row) = rows.next()? {
                let mut values = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    values.push(row.get::<_, Value>(i)?);
                }
                fetched.push(values);
            }
            Ok(QueryOutcome {
                columns,
                rows: fetched,
                affected: 0,
            })
        } else {
            let affected = stmt.execute(params_from_iter(params.iter()))?;
            Ok(QueryOutcome {
                columns: Vec::new(),
                rows: Vec::new(),
                affected,
            })
        }
    }

    /// Commit the open transaction, if any
    pub fn commit(&self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
        }
        debug!("transaction committed");
        Ok(())
    }

    /// Roll back the open transaction, if any
    pub fn rollback(&self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK")?;
        }
        debug!("transaction rolled back");
        Ok(())
    }

    /// Statements join the open transaction; one is started if none is open
    fn ensure_transaction(&self) -> rusqlite::Result<()> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN")?;
        }
        Ok(())
    }

    fn rollback_quietly(&self) {
        if let Err(e) = self.rollback() {
            warn!("rollback failed: {}", e);
        }
    }
}
