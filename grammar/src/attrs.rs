//! Extraction payload: attribute identifiers mapped to value identifiers.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

/// Opaque attribute identifier. The engine never interprets it.
pub type AttributeId = u64;

/// Opaque value identifier stored under an attribute.
pub type ValueId = u64;

/// Mapping from attribute to the values discovered for it.
///
/// Values keep discovery order and duplicates are preserved. Attributes are
/// kept sorted so that debug and JSON output is stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttrValues(BTreeMap<AttributeId, Vec<ValueId>>);

impl AttrValues {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Appends `values` to the list stored under `attr`, creating it if absent.
    pub fn append(&mut self, attr: AttributeId, values: &[ValueId]) {
        self.0.entry(attr).or_default().extend_from_slice(values);
    }

    /// Returns the values recorded for `attr`.
    pub fn get(&self, attr: AttributeId) -> Option<&[ValueId]> {
        self.0.get(&attr).map(Vec::as_slice)
    }

    /// Whether any list was recorded for `attr`, even an empty one.
    pub fn contains(&self, attr: AttributeId) -> bool {
        self.0.contains_key(&attr)
    }

    /// Iterates attributes in ascending order.
    pub fn iter(&self) -> btree_map::Iter<'_, AttributeId, Vec<ValueId>> {
        self.0.iter()
    }

    /// Number of attributes with at least one recorded list.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the mapping, returning the underlying ordered map.
    pub fn into_inner(self) -> BTreeMap<AttributeId, Vec<ValueId>> {
        self.0
    }
}

impl From<BTreeMap<AttributeId, Vec<ValueId>>> for AttrValues {
    fn from(map: BTreeMap<AttributeId, Vec<ValueId>>) -> Self {
        Self(map)
    }
}

impl<const N: usize> From<[(AttributeId, Vec<ValueId>); N]> for AttrValues {
    fn from(entries: [(AttributeId, Vec<ValueId>); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl FromIterator<(AttributeId, Vec<ValueId>)> for AttrValues {
    /// Later entries for the same attribute are appended, not replaced.
    fn from_iter<I: IntoIterator<Item = (AttributeId, Vec<ValueId>)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (attr, ids) in iter {
            values.append(attr, &ids);
        }
        values
    }
}

impl<'a> IntoIterator for &'a AttrValues {
    type Item = (&'a AttributeId, &'a Vec<ValueId>);
    type IntoIter = btree_map::Iter<'a, AttributeId, Vec<ValueId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
