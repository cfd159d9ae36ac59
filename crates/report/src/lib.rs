//! Detection sinks for the scanner.
//!
//! [`JsonLinesLogger`] is the durable record of a scan; [`TracingLogger`]
//! is the fallback when no log file is configured.

pub mod error;
mod events;
mod json;

pub use crate::events::TracingLogger;
pub use crate::json::JsonLinesLogger;
