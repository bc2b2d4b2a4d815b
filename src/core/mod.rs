/// Compiled, positional bindings of rows into typed objects.
pub mod binding;

/// Process-wide memoization of compiled bindings.
pub mod cache;

/// Column-name sequences and case-insensitive lookups.
pub mod column;

/// Conversion of raw cells into typed values.
pub mod convert;

/// Reader and sink seams shared with table and CSV code.
pub mod item;

pub mod row;
