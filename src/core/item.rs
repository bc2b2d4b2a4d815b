use crate::{core::row::Row, error::RowError};

/// Represents the result of reading a row from a reader.
///
/// `Ok(Some(row))` carries the next row, `Ok(None)` signals that the source is
/// exhausted and `Err` carries the reason the next row could not be read.
pub type RowReaderResult = Result<Option<Row>, RowError>;

/// A source of rows sharing one column-name sequence, typically a table.
pub trait RowReader {
    fn read(&self) -> RowReaderResult;
}

/// A sink accepting one raw record at a time.
///
/// Implementations own the output format: quoting and escaping of the values
/// are their concern, callers hand over the values untouched.
pub trait RecordSink {
    fn write_record(&mut self, values: &[String]) -> Result<(), RowError>;

    fn flush(&mut self) -> Result<(), RowError> {
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn write_record(&mut self, values: &[String]) -> Result<(), RowError> {
        (**self).write_record(values)
    }

    fn flush(&mut self) -> Result<(), RowError> {
        (**self).flush()
    }
}
