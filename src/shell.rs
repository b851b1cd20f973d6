//! Interactive shell for CardDB
//!
//! A single-state loop: print the menu, read a choice, read the chosen
//! operation's parameters one line at a time, dispatch, repeat until exit.
//! Every failure is printed here and the loop continues; a bad operation
//! never ends the session.

use rusqlite::types::Value;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::load::{self, ImportProfile};
use crate::ops::{
    self, Aggregate, Delete, Group, Insert, Join, Operation, Search, Sort, Subquery, Update,
};
use crate::session::{QueryOutcome, Session};

/// The closed set of menu choices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Insert,
    Delete,
    Update,
    Search,
    Aggregate,
    Sort,
    Join,
    Group,
    Subquery,
    Commit,
    ErrorDemo,
    Import,
    Exit,
}

impl MenuChoice {
    /// Parse a menu selection; numbers and operation names are accepted
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "1" | "insert" => Ok(MenuChoice::Insert),
            "2" | "delete" => Ok(MenuChoice::Delete),
            "3" | "update" => Ok(MenuChoice::Update),
            "4" | "search" => Ok(MenuChoice::Search),
            "5" | "aggregate" => Ok(MenuChoice::Aggregate),
            "6" | "sort" => Ok(MenuChoice::Sort),
            "7" | "join" => Ok(MenuChoice::Join),
            "8" | "group" => Ok(MenuChoice::Group),
            "9" | "subquery" => Ok(MenuChoice::Subquery),
            "10" | "commit" => Ok(MenuChoice::Commit),
            "11" | "error" => Ok(MenuChoice::ErrorDemo),
            "import" | "csv" => Ok(MenuChoice::Import),
            "12" | "exit" | "quit" => Ok(MenuChoice::Exit),
            other => Err(Error::UnknownChoice(other.to_string())),
        }
    }
}

/// Format query results as a table
pub fn format_results(columns: &[String], rows: &[Vec<Value>]) -> String {
    if columns.is_empty() && rows.is_empty() {
        return String::new();
    }

    let rendered: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(render_value).collect())
        .collect();

    // Calculate column widths
    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    for row in &rendered {
        for (i, value) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(value.len());
            }
        }
    }

    let mut output = String::new();

    // Header separator
    let separator: String = widths
        .iter()
        .map(|w| "-".repeat(*w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let separator = format!("+{}+\n", separator);

    // Header
    output.push_str(&separator);
    let header: String = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!(" {:^width$} ", c, width = *w))
        .collect::<Vec<_>>()
        .join("|");
    output.push_str(&format!("|{}|\n", header));
    output.push_str(&separator);

    // Rows
    for row in &rendered {
        let row_str: String = row
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!(" {:>width$} ", v, width = *w))
            .collect::<Vec<_>>()
            .join("|");
        output.push_str(&format!("|{}|\n", row_str));
    }

    if !rows.is_empty() {
        output.push_str(&separator);
    }

    output.push_str(&format!("{} row(s) returned\n", rows.len()));

    output
}

/// Split a comma-separated parameter line into items
///
/// Parsed with the same CSV dialect as the bulk loader, so an item that
/// itself contains a comma (a merchant name like `fraud_Rippin, Kub and
/// Mann`) can be double-quoted. Empty items are kept; they count toward
/// the column/value arity check.
pub fn split_list(line: &str) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());
    match reader.records().next() {
        Some(record) => Ok(record?.iter().map(|item| item.to_string()).collect()),
        None => Ok(Vec::new()),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

/// The menu-driven shell over one session
pub struct Shell<'a> {
    session: &'a Session,
    catalog: &'a Catalog,
    editor: DefaultEditor,
}

impl<'a> Shell<'a> {
    pub fn new(session: &'a Session, catalog: &'a Catalog) -> Result<Self> {
        Ok(Self {
            session,
            catalog,
            editor: DefaultEditor::new()?,
        })
    }

    /// Run the menu loop until the user exits
    pub fn run(&mut self) -> Result<()> {
        print_banner();
        loop {
            print_menu();
            let line = match self.editor.readline("\nEnter your choice (1-12): ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            };
            self.editor.add_history_entry(line.as_str()).ok();

            let choice = match MenuChoice::parse(&line) {
                Ok(choice) => choice,
                Err(e) => {
                    println!("{}", e);
                    println!("Please try again");
                    continue;
                }
            };
            debug!(?choice, "menu choice");

            if choice == MenuChoice::Exit {
                println!("Exiting...");
                break;
            }

            if let Err(e) = self.dispatch(choice) {
                println!("{}", e);
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
        match choice {
            MenuChoice::Insert => {
                let table = self.prompt("Enter table name: ")?;
                let columns = self.prompt_list("Enter column names: ")?;
                let values = self.prompt_list("Enter values: ")?;
                self.run_operation(&Operation::Insert(Insert {
                    table,
                    columns,
                    values,
                }))
            }
            MenuChoice::Delete => {
                let table = self.prompt("Enter table name: ")?;
                let condition = self.prompt("Enter condition: ")?;
                self.run_operation(&Operation::Delete(Delete { table, condition }))
            }
            MenuChoice::Update => {
                let table = self.prompt("Enter table name: ")?;
                let column = self.prompt("Enter column to update: ")?;
                let new_value = self.prompt("Enter new value: ")?;
                let condition = self.prompt("Enter condition: ")?;
                self.run_operation(&Operation::Update(Update {
                    table,
                    column,
                    new_value,
                    condition,
                }))
            }
            MenuChoice::Search => {
                let table = self.prompt("Enter table name: ")?;
                let condition = self.prompt("Enter condition: ")?;
                self.run_operation(&Operation::Search(Search { table, condition }))
            }
            MenuChoice::Aggregate => {
                let table = self.prompt("Enter table name: ")?;
                let column = self.prompt("Enter column: ")?;
                let function = self
                    .prompt("Enter function (SUM, AVG, COUNT, MIN, MAX): ")?
                    .parse()?;
                self.run_operation(&Operation::Aggregate(Aggregate {
                    table,
                    column,
                    function,
                }))
            }
            MenuChoice::Sort => {
                let table = self.prompt("Enter table name: ")?;
                let column = self.prompt("Enter column name: ")?;
                let order = self.prompt("Enter sorting order (ASC/DESC): ")?.parse()?;
                self.run_operation(&Operation::Sort(Sort {
                    table,
                    column,
                    order,
                }))
            }
            MenuChoice::Join => {
                let left = self.prompt("Enter first table name: ")?;
                let right = self.prompt("Enter second table name: ")?;
                let key = self.prompt("Enter join key: ")?;
                self.run_operation(&Operation::Join(Join { left, right, key }))
            }
            MenuChoice::Group => {
                let table = self.prompt("Enter table name: ")?;
                let column = self.prompt("Enter column name to group by: ")?;
                self.run_operation(&Operation::Group(Group { table, column }))
            }
            MenuChoice::Subquery => {
                let table = self.prompt("Enter table name: ")?;
                let column = self.prompt("Enter column name: ")?;
                let subquery = self.prompt("Enter subquery: ")?;
                self.run_operation(&Operation::Subquery(Subquery {
                    table,
                    column,
                    subquery,
                }))
            }
            MenuChoice::Commit => {
                println!("Starting transaction...");
                self.session.commit()?;
                println!("Transaction committed successfully");
                Ok(())
            }
            MenuChoice::ErrorDemo => {
                println!("Starting error handling...");
                println!("Rolling back changes...");
                self.session.rollback()?;
                Ok(())
            }
            MenuChoice::Import => {
                let table = self.prompt("Enter target table: ")?;
                let path = self.prompt("Path: ")?;
                let profile = ImportProfile::for_table(&table)?;
                let inserted =
                    load::import_csv(self.session, self.catalog, profile, path.as_ref())?;
                println!(
                    "Data inserted successfully from CSV file ({} row(s))",
                    inserted
                );
                Ok(())
            }
            // handled by the caller before dispatch
            MenuChoice::Exit => Ok(()),
        }
    }

    /// Run one data operation; mutations are committed as a separate step
    fn run_operation(&self, op: &Operation) -> Result<()> {
        let outcome = ops::run(self.session, self.catalog, op)?;
        self.report(&outcome);
        if op.is_mutation() {
            self.session.commit()?;
            println!("Transaction committed successfully");
        }
        Ok(())
    }

    fn report(&self, outcome: &QueryOutcome) {
        if outcome.is_result_set() {
            print!("{}", format_results(&outcome.columns, &outcome.rows));
        } else if outcome.affected > 0 {
            println!("{} row(s) affected", outcome.affected);
        } else {
            println!("Query executed successfully");
        }
    }

    fn prompt(&mut self, message: &str) -> Result<String> {
        Ok(self.editor.readline(message)?.trim().to_string())
    }

    /// Read a comma-separated list, e.g. column names or values
    fn prompt_list(&mut self, message: &str) -> Result<Vec<String>> {
        split_list(&self.prompt(message)?)
    }
}

fn print_banner() {
    println!("Welcome to the CardDB CLI!");
    println!("A SQL front-end for the credit card transaction dataset");
}

fn print_menu() {
    println!(
        r#"
Please select an option:
 1. Insert data
 2. Delete data
 3. Update data
 4. Search data
 5. Aggregate functions
 6. Sorting
 7. Joins
 8. Grouping
 9. Subqueries
10. Commit transaction
11. Error handling
12. Exit
    (type 'import' to load a CSV file)"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_choice_parsing() {
        assert_eq!(MenuChoice::parse("1").unwrap(), MenuChoice::Insert);
        assert_eq!(MenuChoice::parse(" 12 ").unwrap(), MenuChoice::Exit);
        assert_eq!(MenuChoice::parse("Import").unwrap(), MenuChoice::Import);
        assert_eq!(MenuChoice::parse("search").unwrap(), MenuChoice::Search);
        assert!(matches!(
            MenuChoice::parse("13"),
            Err(Error::UnknownChoice(_))
        ));
        assert!(matches!(
            MenuChoice::parse("banana"),
            Err(Error::UnknownChoice(_))
        ));
    }

    #[test]
    fn test_split_list_plain() {
        assert_eq!(
            split_list("Lat, Long").unwrap(),
            vec!["Lat".to_string(), "Long".to_string()]
        );
        assert!(split_list("").unwrap().is_empty());
    }

    #[test]
    fn test_split_list_quoted_item_keeps_comma() {
        assert_eq!(
            split_list("\"fraud_Rippin, Kub and Mann\", 40.7, -74.0").unwrap(),
            vec![
                "fraud_Rippin, Kub and Mann".to_string(),
                "40.7".to_string(),
                "-74.0".to_string()
            ]
        );
    }

    #[test]
    fn test_split_list_keeps_empty_items() {
        assert_eq!(
            split_list("a,,b").unwrap(),
            vec!["a".to_string(), "".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_format_results() {
        let columns = vec!["Amt".to_string()];
        let rows = vec![vec![Value::Real(19.99)]];
        let output = format_results(&columns, &rows);
        assert!(output.contains("Amt"));
        assert!(output.contains("19.99"));
        assert!(output.contains("1 row(s) returned"));
    }

    #[test]
    fn test_format_results_empty_set() {
        let columns = vec!["Amt".to_string()];
        let output = format_results(&columns, &[]);
        assert!(output.contains("0 row(s) returned"));
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&Value::Null), "NULL");
        assert_eq!(render_value(&Value::Integer(7)), "7");
        assert_eq!(render_value(&Value::Text("IL".into())), "IL");
        assert_eq!(render_value(&Value::Blob(vec![1, 2, 3])), "<3 bytes>");
    }
}
