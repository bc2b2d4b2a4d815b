use std::sync::Arc;

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    core::{binding::Bindable, cache::BindingCache, column::ColumnIndex, item::RecordSink},
    error::RowError,
};

/// Whether the values of a row may be overwritten.
///
/// The mode is decided by whoever creates the row (usually the table the row
/// belongs to); the row itself only enforces it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mutability {
    #[default]
    ReadOnly,
    Mutable,
}

/// The ordered string cells of a row together with their write capability.
///
/// Every write goes through [`ValueBuffer::set`], which is where the
/// capability is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueBuffer {
    values: Vec<String>,
    mutability: Mutability,
}

impl ValueBuffer {
    pub fn new(values: Vec<String>, mutability: Mutability) -> Self {
        Self { values, mutability }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Overwrites the value at `index`.
    ///
    /// Fails with [`RowError::RowNotMutable`] on a read-only buffer, leaving
    /// the values untouched.
    pub fn set(&mut self, index: usize, value: String) -> Result<(), RowError> {
        if self.mutability == Mutability::ReadOnly {
            return Err(RowError::RowNotMutable { index });
        }

        let len = self.values.len();
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RowError::IndexOutOfBounds { index, len }),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.values
    }

    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One record of column-aligned string values.
///
/// A row owns its values and shares the column names of the table it was
/// created from. Values can be read and written by column name (ignoring
/// case) or by position.
///
/// # Examples
///
/// ```
/// use row_binder_rs::core::{column::ColumnIndex, row::{Mutability, Row}};
///
/// let columns = ColumnIndex::shared(["Id", "Name", "Age"]);
/// let row = Row::new(columns, vec!["7".into(), "Ada".into(), "36".into()], Mutability::ReadOnly)?;
///
/// assert_eq!(row.get("name")?, "Ada");
/// assert_eq!(row.get_or_empty("Missing"), "");
/// # Ok::<(), row_binder_rs::RowError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<ColumnIndex>,
    values: ValueBuffer,
}

impl Row {
    /// Creates a row over `columns`.
    ///
    /// Fails with [`RowError::WidthMismatch`] when the number of values differs
    /// from the number of columns.
    pub fn new(
        columns: Arc<ColumnIndex>,
        values: Vec<String>,
        mutability: Mutability,
    ) -> Result<Self, RowError> {
        if values.len() != columns.len() {
            return Err(RowError::WidthMismatch {
                expected: columns.len(),
                actual: values.len(),
            });
        }

        Ok(Self {
            columns,
            values: ValueBuffer::new(values, mutability),
        })
    }

    /// Returns the value of the column `name`.
    pub fn get(&self, name: &str) -> Result<&str, RowError> {
        let index = self.index_of(name)?;
        self.value(index)
    }

    /// Returns the value of the column `name`, or `""` when the row has no
    /// such column.
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.columns
            .index_of(name)
            .and_then(|index| self.values.get(index))
            .unwrap_or_default()
    }

    /// Looks up every name of `names` with [`Row::get_or_empty`].
    ///
    /// The lookups are lazy and the returned iterator can be cloned to start
    /// over. It yields exactly one value per name.
    pub fn get_or_empty_all<'a, I>(&'a self, names: I) -> impl Iterator<Item = &'a str> + Clone
    where
        I: IntoIterator,
        I::IntoIter: Clone,
        I::Item: AsRef<str>,
    {
        names
            .into_iter()
            .map(move |name| self.get_or_empty(name.as_ref()))
    }

    /// Overwrites the value of the column `name`.
    ///
    /// The column is resolved first, so an unknown column is reported as
    /// [`RowError::ColumnNotFound`] even on a read-only row.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), RowError> {
        let index = self.index_of(name)?;
        self.values.set(index, value.into())
    }

    pub fn value(&self, index: usize) -> Result<&str, RowError> {
        self.values.get(index).ok_or(RowError::IndexOutOfBounds {
            index,
            len: self.values.len(),
        })
    }

    pub fn set_value(&mut self, index: usize, value: impl Into<String>) -> Result<(), RowError> {
        self.values.set(index, value.into())
    }

    pub fn values(&self) -> &[String] {
        self.values.as_slice()
    }

    pub fn columns(&self) -> &Arc<ColumnIndex> {
        &self.columns
    }

    pub fn mutability(&self) -> Mutability {
        self.values.mutability()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Writes the values as one record to `sink`.
    ///
    /// Values are passed through as they are; quoting belongs to the sink.
    pub fn write_csv_line<S: RecordSink + ?Sized>(&self, sink: &mut S) -> Result<(), RowError> {
        sink.write_record(self.values.as_slice())
    }

    /// Converts this row into `T` using the binding cached for `T` and this
    /// row's columns.
    pub fn bind<T: Bindable>(&self) -> Result<T, RowError> {
        BindingCache::global()
            .get_or_compile::<T>(&self.columns)?
            .apply(self)
    }

    /// One `name=value` entry per column, in column order.
    ///
    /// Meant for logs and tests; the format is not stable.
    pub fn debug_dump(&self) -> Vec<String> {
        self.columns
            .names()
            .iter()
            .zip(self.values.as_slice())
            .map(|(name, value)| format!("{name}={value}"))
            .collect()
    }

    fn index_of(&self, name: &str) -> Result<usize, RowError> {
        self.columns
            .index_of(name)
            .ok_or_else(|| RowError::ColumnNotFound(name.to_owned()))
    }
}

/// Serializes as a name → value map. A repeated name (ignoring case) keeps
/// only its first column, the one [`Row::get`] reads.
impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let entries: Vec<(&String, &String)> = self
            .columns
            .names()
            .iter()
            .zip(self.values.as_slice())
            .enumerate()
            .filter(|(index, (name, _))| self.columns.index_of(name) == Some(*index))
            .map(|(_, entry)| entry)
            .collect();

        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, value) in entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
