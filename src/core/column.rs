use std::{collections::HashMap, sync::Arc};

/// The ordered column names of a table, shared by every row of that table.
///
/// Besides the names themselves, a `ColumnIndex` keeps a precomputed mapping
/// from the case-folded name to its position, so that repeated lookups against
/// the same schema cost one hash lookup instead of a scan.
///
/// Names do not have to be unique. When a name occurs more than once, lookups
/// resolve to its first occurrence.
///
/// # Examples
///
/// ```
/// use row_binder_rs::core::column::ColumnIndex;
///
/// let columns = ColumnIndex::new(["Id", "Name", "Age"]);
///
/// assert_eq!(columns.index_of("name"), Some(1));
/// assert_eq!(columns.index_of("AGE"), Some(2));
/// assert_eq!(columns.index_of("missing"), None);
/// ```
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    /// Builds the index from an ordered sequence of column names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        let mut positions = HashMap::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            positions.entry(fold(name)).or_insert(index);
        }

        Self { names, positions }
    }

    /// Builds the index and wraps it for sharing between rows.
    pub fn shared<I, S>(names: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self::new(names))
    }

    /// Scans `names` left to right and returns the position of the first name
    /// equal to `name`, ignoring case.
    ///
    /// This is the cold path: it does not need a built index.
    pub fn scan<S: AsRef<str>>(names: &[S], name: &str) -> Option<usize> {
        let wanted = fold(name);
        names.iter().position(|candidate| fold(candidate.as_ref()) == wanted)
    }

    /// Returns the position of `name`, ignoring case.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.positions.get(&fold(name)).copied()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl PartialEq for ColumnIndex {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}

impl Eq for ColumnIndex {}

/// Folds one character at a time through upper then lower case, so that
/// letters with several lowercase forms (`σ`, `ς`) meet on one.
fn fold(name: &str) -> String {
    name.chars()
        .flat_map(char::to_uppercase)
        .flat_map(char::to_lowercase)
        .collect()
}
