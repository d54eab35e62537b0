//! Header lookup for logical columns.

use std::collections::HashMap;

use crate::error::AnalysisError;

/// Header name → position, built once per table.
///
/// Duplicate header names resolve to their first occurrence.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn from_headers(headers: &[String]) -> Self {
        let mut positions = HashMap::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            positions.entry(header.clone()).or_insert(i);
        }
        Self { positions }
    }

    /// Exact, case-sensitive lookup.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn require(&self, name: &str) -> Result<usize, AnalysisError> {
        self.position(name)
            .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))
    }

    /// Resolve every name, failing on the first one that is absent.
    pub fn require_all<const N: usize>(&self, names: &[&str; N]) -> Result<[usize; N], AnalysisError> {
        let mut resolved = [0usize; N];
        for (slot, name) in resolved.iter_mut().zip(names) {
            *slot = self.require(name)?;
        }
        Ok(resolved)
    }

    /// Names from `names` that are absent, in order.
    pub fn missing<'a>(&self, names: &[&'a str]) -> Vec<&'a str> {
        names.iter().copied().filter(|n| self.position(n).is_none()).collect()
    }
}
