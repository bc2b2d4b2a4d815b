use std::{
    fs::File,
    io::{self, Write},
    path::Path,
};

use csv::{Writer, WriterBuilder};

use crate::{
    core::{column::ColumnIndex, item::RecordSink},
    error::RowError,
};

/// A CSV record sink.
///
/// Values are quoted and escaped by the `csv` crate: a value containing the
/// delimiter, a quote or a line break is written between double quotes.
pub struct CsvRowWriter<W: Write> {
    wrapper: Writer<W>,
    header: Option<Vec<String>>,
}

impl<W: Write> RecordSink for CsvRowWriter<W> {
    fn write_record(&mut self, values: &[String]) -> Result<(), RowError> {
        if let Some(header) = &self.header {
            self.wrapper
                .write_record(header)
                .map_err(|error| RowError::RecordSink(error.to_string()))?;
            self.header = None;
        }

        self.wrapper
            .write_record(values)
            .map_err(|error| RowError::RecordSink(error.to_string()))
    }

    /// Flush the contents of the internal buffer to the underlying writer.
    ///
    /// Note that this also flushes the underlying writer.
    fn flush(&mut self) -> Result<(), RowError> {
        self.wrapper
            .flush()
            .map_err(|error| RowError::RecordSink(error.to_string()))
    }
}

impl<W: Write> CsvRowWriter<W> {
    pub fn into_inner(self) -> Result<W, RowError> {
        self.wrapper
            .into_inner()
            .map_err(|error| RowError::RecordSink(error.to_string()))
    }
}

#[derive(Default)]
pub struct CsvRowWriterBuilder {
    header: Option<Vec<String>>,
}

impl CsvRowWriterBuilder {
    pub fn new() -> CsvRowWriterBuilder {
        CsvRowWriterBuilder { header: None }
    }

    /// Writes the names of `columns` as a header record, before the first
    /// record.
    pub fn header(mut self, columns: &ColumnIndex) -> CsvRowWriterBuilder {
        self.header = Some(columns.names().to_vec());
        self
    }

    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvRowWriter<File>, RowError> {
        let wtr = WriterBuilder::new()
            .flexible(false)
            .from_path(path)
            .map_err(|error| RowError::RecordSink(error.to_string()))?;

        Ok(CsvRowWriter {
            wrapper: wtr,
            header: self.header,
        })
    }

    /// Creates a sink writing to `wtr`.
    ///
    /// ```
    /// # use std::error::Error;
    /// use row_binder_rs::core::{column::ColumnIndex, row::{Mutability, Row}};
    /// use row_binder_rs::item::csv::csv_writer::CsvRowWriterBuilder;
    ///
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// let columns = ColumnIndex::shared(["Id", "Name"]);
    /// let row = Row::new(columns.clone(), vec!["7".into(), "Ada, R.".into()], Mutability::ReadOnly)?;
    ///
    /// let mut wtr = CsvRowWriterBuilder::new().header(&columns).from_writer(vec![]);
    /// row.write_csv_line(&mut wtr)?;
    ///
    /// let data = String::from_utf8(wtr.into_inner()?)?;
    /// assert_eq!(data, "Id,Name\n7,\"Ada, R.\"\n");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_writer<W: io::Write>(self, wtr: W) -> CsvRowWriter<W> {
        let wtr = WriterBuilder::new().flexible(false).from_writer(wtr);

        CsvRowWriter {
            wrapper: wtr,
            header: self.header,
        }
    }
}
