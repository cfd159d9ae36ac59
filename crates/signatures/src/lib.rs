//! Signature databases for the scanner.

mod csv;
pub mod error;

pub use crate::csv::CsvSignatureDatabase;
