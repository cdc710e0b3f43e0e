// Copyright 2025 the Glyphspec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tabular data sources read by field specs.

use alloc::string::String;
use hashbrown::HashMap;

use crate::value::Value;

/// Named columns of raw values.
///
/// Columns are [`Value::Array`] sequences or [`Value::Buffer`] typed
/// buffers. Lookups of absent columns return `None`; callers decide how to
/// degrade.
pub trait DataSource {
    /// Number of rows, or `None` if the source has no columns.
    fn get_length(&self) -> Option<usize>;

    /// The named column, if present.
    fn column(&self, name: &str) -> Option<&Value>;
}

/// A data source backed by an in-memory map of columns.
///
/// ```rust
/// use glyphspec_property::{ColumnDataSource, DataSource, Value};
///
/// let source = ColumnDataSource::new()
///     .with_column("x", vec![Value::from(1.0), Value::from(2.0)]);
/// assert_eq!(source.get_length(), Some(2));
/// assert!(source.column("x").is_some());
/// assert!(source.column("y").is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ColumnDataSource {
    columns: HashMap<String, Value>,
}

impl ColumnDataSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a column, builder style.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, column: impl Into<Value>) -> Self {
        self.insert(name, column);
        self
    }

    /// Adds or replaces a column, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, column: impl Into<Value>) -> Option<Value> {
        self.columns.insert(name.into(), column.into())
    }

    /// Removes a column.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.columns.remove(name)
    }

    /// Iterates the column names in unspecified order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

impl DataSource for ColumnDataSource {
    fn get_length(&self) -> Option<usize> {
        let mut lengths = self.columns.values().filter_map(Value::seq_len);
        let first = lengths.next()?;
        let mut longest = first;
        let mut consistent = true;
        for len in lengths {
            consistent &= len == first;
            longest = longest.max(len);
        }
        if !consistent {
            tracing::warn!("data source has columns of inconsistent lengths");
        }
        Some(longest)
    }

    fn column(&self, name: &str) -> Option<&Value> {
        self.columns.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::NdArray;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn empty_source_has_no_length() {
        assert_eq!(ColumnDataSource::new().get_length(), None);
    }

    #[test]
    fn buffers_and_arrays_count_rows() {
        let source = ColumnDataSource::new()
            .with_column("a", NdArray::from(vec![1.0_f64, 2.0, 3.0]))
            .with_column("b", vec![Value::Null; 3]);
        assert_eq!(source.get_length(), Some(3));
    }

    #[test]
    fn inconsistent_lengths_use_longest() {
        let source = ColumnDataSource::new()
            .with_column("a", vec![Value::Null; 2])
            .with_column("b", vec![Value::Null; 5]);
        assert_eq!(source.get_length(), Some(5));
    }

    #[test]
    fn insert_remove_names() {
        let mut source = ColumnDataSource::new();
        assert!(source.insert("a", vec![Value::Null]).is_none());
        assert!(source.insert("a", vec![Value::Null]).is_some());
        assert_eq!(source.names().collect::<Vec<_>>(), ["a"]);
        assert!(source.remove("a").is_some());
        assert_eq!(source.get_length(), None);
    }
}
