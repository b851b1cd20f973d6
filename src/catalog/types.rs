//! Data types for CardDB
//!
//! This module defines the SQL column types used by the fixed schema. The
//! engine stores values under its own affinity rules; these types exist to
//! render DDL text and to document the dataset's shape.

use std::fmt;

/// SQL column types appearing in the credit card transaction schema
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Arbitrary-precision numeric (card numbers, unix timestamps)
    Numeric,
    /// Integer (32-bit)
    Integer,
    /// Single-precision floating point
    Float,
    /// Fixed-point decimal with precision and scale
    Decimal(u8, u8),
    /// Fixed-length character string
    Char(usize),
    /// Variable-length character string with max length
    Varchar(usize),
    /// Date (year, month, day)
    Date,
    /// Timestamp (date + time)
    Timestamp,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Numeric => write!(f, "NUMERIC"),
            DataType::Integer => write!(f, "INT"),
            DataType::Float => write!(f, "FLOAT"),
            DataType::Decimal(p, s) => write!(f, "DECIMAL({}, {})", p, s),
            DataType::Char(n) => write!(f, "CHAR({})", n),
            DataType::Varchar(n) => write!(f, "VARCHAR({})", n),
            DataType::Date => write!(f, "DATE"),
            DataType::Timestamp => write!(f, "TIMESTAMP"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(DataType::Decimal(10, 2).to_string(), "DECIMAL(10, 2)");
        assert_eq!(DataType::Varchar(255).to_string(), "VARCHAR(255)");
        assert_eq!(DataType::Char(2).to_string(), "CHAR(2)");
        assert_eq!(DataType::Timestamp.to_string(), "TIMESTAMP");
    }
}
