use csv::{ReaderBuilder, StringRecordsIntoIter, Trim};
use log::{debug, info};
use std::{cell::RefCell, fs::File, io::Read, path::Path, sync::Arc};

use crate::{
    core::{
        column::ColumnIndex,
        item::{RowReader, RowReaderResult},
        row::{Mutability, Row},
    },
    error::RowError,
};

/// A CSV row reader that implements the `RowReader` trait.
///
/// Every row it yields shares one [`ColumnIndex`], built once from the header
/// record (or from the names given to the builder).
///
/// # Examples
///
/// ```
/// use row_binder_rs::item::csv::csv_reader::CsvRowReaderBuilder;
/// use row_binder_rs::core::item::RowReader;
///
/// let data = "\
/// name,value
/// foo,123
/// bar,456
/// ";
///
/// let reader = CsvRowReaderBuilder::new()
///     .has_headers(true)
///     .from_reader(data.as_bytes())
///     .unwrap();
///
/// let row = reader.read().unwrap().unwrap();
/// assert_eq!(row.get("NAME").unwrap(), "foo");
///
/// let row = reader.read().unwrap().unwrap();
/// assert_eq!(row.get("value").unwrap(), "456");
///
/// assert!(reader.read().unwrap().is_none());
/// ```
pub struct CsvRowReader<R> {
    columns: Arc<ColumnIndex>,
    mutability: Mutability,
    /// Uses `RefCell` so that `read` can advance through `&self`.
    records: RefCell<StringRecordsIntoIter<R>>,
}

impl<R: Read> RowReader for CsvRowReader<R> {
    /// Reads the next row.
    ///
    /// # Returns
    /// - `Ok(Some(row))` if a record is successfully read
    /// - `Ok(None)` if there are no more records to read
    /// - `Err(RowError::RowReader(_))` if the record cannot be parsed
    /// - `Err(RowError::WidthMismatch { .. })` if the record does not match the columns
    fn read(&self) -> RowReaderResult {
        let Some(result) = self.records.borrow_mut().next() else {
            return Ok(None);
        };

        let record = result.map_err(|error| RowError::RowReader(error.to_string()))?;
        let values = record.iter().map(str::to_owned).collect();
        let row = Row::new(Arc::clone(&self.columns), values, self.mutability)?;

        debug!(
            "Read row {}",
            serde_json::to_string(&row).unwrap_or_default()
        );

        Ok(Some(row))
    }
}

impl<R> CsvRowReader<R> {
    /// The columns shared by every row of this reader.
    pub fn columns(&self) -> &Arc<ColumnIndex> {
        &self.columns
    }
}

/// A builder for configuring CSV row reading.
///
/// # Default Configuration
///
/// - Headers: enabled
/// - Column names: taken from the header record
/// - Mutability: read-only rows
///
/// Header names are trimmed; cell values are kept exactly as read.
pub struct CsvRowReaderBuilder {
    /// Whether the first record holds the column names (default: true)
    has_headers: bool,
    /// Column names overriding the header record
    columns: Option<Vec<String>>,
    /// Mutability of the rows produced (default: read-only)
    mutability: Mutability,
}

impl Default for CsvRowReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvRowReaderBuilder {
    pub fn new() -> Self {
        Self {
            has_headers: true,
            columns: None,
            mutability: Mutability::ReadOnly,
        }
    }

    /// Sets whether the first record holds the column names.
    ///
    /// Without headers, the names must be given with
    /// [`CsvRowReaderBuilder::columns`].
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }

    /// Sets the column names, overriding the header record if any.
    pub fn columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the mutability of the rows produced.
    pub fn mutability(mut self, mutability: Mutability) -> Self {
        self.mutability = mutability;
        self
    }

    /// Creates a `CsvRowReader` from any source implementing `Read`.
    ///
    /// Fails when the header record cannot be read, or when no column names
    /// are available.
    pub fn from_reader<R: Read>(self, rdr: R) -> Result<CsvRowReader<R>, RowError> {
        let rdr = ReaderBuilder::new()
            .trim(Trim::Headers)
            .has_headers(self.has_headers)
            .flexible(false)
            .from_reader(rdr);

        self.build(rdr)
    }

    /// Creates a `CsvRowReader` reading the file at `path`.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvRowReader<File>, RowError> {
        let rdr = ReaderBuilder::new()
            .trim(Trim::Headers)
            .has_headers(self.has_headers)
            .flexible(false)
            .from_path(path)
            .map_err(|error| RowError::RowReader(error.to_string()))?;

        self.build(rdr)
    }

    fn build<R: Read>(self, mut rdr: csv::Reader<R>) -> Result<CsvRowReader<R>, RowError> {
        let names = match self.columns {
            Some(names) => names,
            None if self.has_headers => rdr
                .headers()
                .map_err(|error| RowError::RowReader(error.to_string()))?
                .iter()
                .map(str::to_owned)
                .collect(),
            None => {
                return Err(RowError::RowReader(
                    "no column names: enable headers or set columns".to_string(),
                ));
            }
        };

        let columns = ColumnIndex::shared(names);
        info!("Reading CSV rows with columns {:?}", columns.names());

        Ok(CsvRowReader {
            columns,
            mutability: self.mutability,
            records: RefCell::new(rdr.into_records()),
        })
    }
}
