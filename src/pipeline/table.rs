//! Numeric feature table consumed by the correlation filters

use std::collections::HashSet;

use super::error::ReductionError;

/// An ordered collection of named, equal-length numeric columns.
///
/// Construction validates the table: names are unique, no column is empty,
/// every column has the same length and every value is finite. A table with
/// zero features is valid; the filters report it as `EmptyInput`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureTable {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl FeatureTable {
    /// Build a table from `(name, values)` pairs, preserving their order.
    pub fn new<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Result<Self, ReductionError> {
        let mut names = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        let mut seen = HashSet::with_capacity(columns.len());

        for (name, column) in columns {
            let name = name.into();
            if !seen.insert(name.clone()) {
                return Err(ReductionError::DuplicateFeature { feature: name });
            }
            if column.is_empty() {
                return Err(ReductionError::EmptyColumn { feature: name });
            }
            if let Some(expected) = values.first().map(Vec::len) {
                if column.len() != expected {
                    return Err(ReductionError::RaggedColumn {
                        feature: name,
                        expected,
                        found: column.len(),
                    });
                }
            }
            if let Some(row) = column.iter().position(|v| !v.is_finite()) {
                return Err(ReductionError::NonFiniteValue { feature: name, row });
            }
            names.push(name);
            values.push(column);
        }

        Ok(Self {
            names,
            columns: values,
        })
    }

    /// A table with no features.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, index: usize) -> &[f64] {
        &self.columns[index]
    }

    pub fn column_by_name(&self, name: &str) -> Option<&[f64]> {
        self.index_of(name).map(|i| self.column(i))
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Column slices in table order.
    pub fn columns(&self) -> Vec<&[f64]> {
        self.columns.iter().map(Vec::as_slice).collect()
    }

    pub fn n_features(&self) -> usize {
        self.names.len()
    }

    /// Number of rows (0 for a table without features).
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Return a new table without the listed features. Unknown names are ignored.
    pub fn without(&self, drop: &[String]) -> Self {
        let drop: HashSet<&str> = drop.iter().map(String::as_str).collect();
        let (names, columns) = self
            .names
            .iter()
            .zip(self.columns.iter())
            .filter(|(name, _)| !drop.contains(name.as_str()))
            .map(|(name, column)| (name.clone(), column.clone()))
            .unzip();
        Self { names, columns }
    }

    /// Names of columns whose values are all identical.
    pub fn constant_features(&self) -> Vec<String> {
        self.names
            .iter()
            .zip(self.columns.iter())
            .filter(|(_, column)| is_constant(column))
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// True when every value equals the first one (a single value counts as constant).
pub(crate) fn is_constant(values: &[f64]) -> bool {
    match values.first() {
        Some(&first) => values.iter().all(|&v| v == first),
        None => true,
    }
}

/// `base`, or `base` with leading underscores added until it no longer collides.
pub(crate) fn unique_name(base: &str, taken: &[String]) -> String {
    let mut candidate = base.to_string();
    while taken.iter().any(|t| *t == candidate) {
        candidate = format!("_{}", candidate);
    }
    candidate
}
