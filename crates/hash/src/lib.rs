//! File fingerprinting for the scanner.
//!
//! [`FileHasher`] implements [`hashscan_scanner::Hasher`] for any
//! [`HashAlgorithm`]. Digests are lowercase hex.

mod algorithm;
pub mod error;
mod hasher;

pub use crate::algorithm::HashAlgorithm;
pub use crate::hasher::FileHasher;
