//! CSV bulk loader
//!
//! Streams a comma-separated file row by row and issues one insert per row
//! into the profile's target table. The whole load is one transaction,
//! committed only after the last row: any malformed row or rejected insert
//! rolls back every row inserted so far, so a load either lands completely
//! or not at all.

use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::ops::{self, Insert};
use crate::session::Session;

/// Positional field-to-column mapping for one target table
///
/// Files carry no header row; fields are addressed by position, matching
/// the column order of the dataset's export files.
#[derive(Debug, Clone, Copy)]
pub struct ImportProfile {
    table: &'static str,
    columns: &'static [&'static str],
    fields: &'static [usize],
}

const PROFILES: &[ImportProfile] = &[
    ImportProfile {
        table: "Location",
        columns: &["Lat", "Long"],
        fields: &[0, 1],
    },
    ImportProfile {
        table: "Merchant",
        columns: &["Merchant", "Merch_lat", "Merch_long"],
        fields: &[0, 1, 2],
    },
    ImportProfile {
        table: "Cardholder",
        columns: &[
            "Cc_num", "First", "Last", "Gender", "Street", "City", "State", "Zip", "Lat", "Long",
            "City_pop", "Job", "Dob",
        ],
        fields: &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
    },
    ImportProfile {
        table: "Transaction",
        columns: &[
            "Trans_num",
            "Trans_date_trans_time",
            "Cc_num",
            "Merchant",
            "Category",
            "Amt",
            "Unix_time",
            "Is_fraud",
        ],
        fields: &[0, 1, 2, 3, 4, 5, 6, 7],
    },
    ImportProfile {
        table: "City",
        columns: &["City", "State", "City_pop"],
        fields: &[0, 1, 2],
    },
    ImportProfile {
        table: "Date",
        columns: &["Trans_date_trans_time"],
        fields: &[0],
    },
    ImportProfile {
        table: "Amount",
        columns: &["Amt"],
        fields: &[0],
    },
    ImportProfile {
        table: "AgeGroup",
        columns: &["Dob"],
        fields: &[0],
    },
    ImportProfile {
        table: "Zip_Code",
        columns: &["Zip"],
        fields: &[0],
    },
];

impl ImportProfile {
    /// Look up the profile for a target table (case-insensitive)
    pub fn for_table(name: &str) -> Result<&'static ImportProfile> {
        PROFILES
            .iter()
            .find(|p| p.table.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| Error::TableNotFound(name.trim().to_string()))
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }
}

/// Load a CSV file into the profile's target table, one insert per row
///
/// Returns the number of rows committed.
pub fn import_csv(
    session: &Session,
    catalog: &Catalog,
    profile: &ImportProfile,
    path: &Path,
) -> Result<usize> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    info!(file = %path.display(), table = profile.table, "starting CSV import");

    let attempt = (|| -> Result<usize> {
        let mut inserted = 0usize;
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let mut values = Vec::with_capacity(profile.fields.len());
            for &field in profile.fields {
                let value = record.get(field).ok_or(Error::ShortRow {
                    row: index + 1,
                    found: record.len(),
                    needed: field,
                })?;
                values.push(value.to_string());
            }

            let insert = Insert {
                table: profile.table.to_string(),
                columns: profile.columns.iter().map(|c| c.to_string()).collect(),
                values,
            };
            ops::insert(session, catalog, &insert)?;
            inserted += 1;
            debug!(row = index + 1, "row inserted");
        }
        Ok(inserted)
    })();

    match attempt {
        Ok(inserted) => {
            session.commit()?;
            info!(rows = inserted, "CSV import committed");
            Ok(inserted)
        }
        Err(e) => {
            session.rollback()?;
            Err(e)
        }
    }
}
