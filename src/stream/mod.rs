//! Stream framing and record decoding.
//!
//! This module handles:
//! - Cutting complete JSON objects out of the monitor's raw output
//! - Decoding each object into a record

pub mod decoder;
pub mod framer;

// Re-export main types
pub use decoder::{decode, Record};
pub use framer::{ParserState, StreamFramer};
