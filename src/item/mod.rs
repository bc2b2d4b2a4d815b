#[cfg(feature = "csv")]
/// This module provides a CSV row reader and a CSV record sink.
pub mod csv;
