//! CardDB - a menu-driven SQL front-end for a credit card transaction dataset
//!
//! This library provides the components behind the CLI:
//! - Fixed schema catalog and identifier validation
//! - Database session (single connection, explicit commit discipline)
//! - CRUD and reporting operation builders
//! - CSV bulk loader
//! - Interactive menu shell

pub mod catalog;
pub mod config;
pub mod error;
pub mod load;
pub mod ops;
pub mod session;
pub mod shell;

pub use error::{Error, Result};
