//! Aligned tables: every requested field on one common timeline.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, UlgCheckError};

/// Identifies one column: topic, multi-instance index and flattened field name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnKey {
    pub topic: String,
    pub instance: u8,
    pub field: String,
}

impl ColumnKey {
    pub fn new(topic: impl Into<String>, instance: u8, field: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            instance,
            field: field.into(),
        }
    }
}

/// `T_<topic>_<instance>__F_<field>`, with `.`/`[` as `_` and `]` dropped
impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field: String = self
            .field
            .chars()
            .filter(|&c| c != ']')
            .map(|c| if c == '.' || c == '[' { '_' } else { c })
            .collect();
        write!(f, "T_{}_{}__F_{}", self.topic, self.instance, field)
    }
}

/// A named column computed from table columns
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// Rows are resampled timestamps (µs), columns are keyed by [`ColumnKey`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedTable {
    timestamps: Vec<u64>,
    columns: BTreeMap<ColumnKey, Vec<f64>>,
}

impl AlignedTable {
    pub fn new(timestamps: Vec<u64>) -> Self {
        Self {
            timestamps,
            columns: BTreeMap::new(),
        }
    }

    /// Add or replace a column
    ///
    /// # Errors
    ///
    /// Returns error if `values` does not have one entry per row
    pub fn insert(&mut self, key: ColumnKey, values: Vec<f64>) -> Result<()> {
        if values.len() != self.timestamps.len() {
            return Err(UlgCheckError::LengthMismatch(format!(
                "{} has {} values for {} rows",
                key,
                values.len(),
                self.timestamps.len()
            )));
        }
        self.columns.insert(key, values);
        Ok(())
    }

    /// Builder form of [`AlignedTable::insert`]
    pub fn with_column(mut self, key: ColumnKey, values: Vec<f64>) -> Result<Self> {
        self.insert(key, values)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`UlgCheckError::MissingColumn`] if the key is absent
    pub fn column(&self, key: &ColumnKey) -> Result<&[f64]> {
        self.columns
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| UlgCheckError::MissingColumn(key.to_string()))
    }

    pub fn contains(&self, key: &ColumnKey) -> bool {
        self.columns.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ColumnKey> {
        self.columns.keys()
    }

    pub fn timestamps(&self) -> &[u64] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}
