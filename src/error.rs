use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
/// Row error
pub enum RowError {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Raised by the value buffer when a write reaches a read-only row.
    #[error("Row is not mutable, cannot write position {index}")]
    RowNotMutable { index: usize },

    /// Raised once, when a binding is compiled, never per row.
    #[error("Member {member} (column {column}) has unsupported type {member_type}")]
    UnsupportedMemberType {
        member: String,
        column: String,
        member_type: String,
    },

    #[error("Cannot convert {raw:?} from column {column} into member {member}: {reason}")]
    ConversionError {
        member: String,
        column: String,
        raw: String,
        reason: String,
    },

    #[error("Row has {actual} values but the schema has {expected} columns")]
    WidthMismatch { expected: usize, actual: usize },

    #[error("Position {index} is out of bounds for a row of {len} values")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("RecordSink from: {0}")]
    RecordSink(String),

    #[error("RowReader from: {0}")]
    RowReader(String),
}
