//! Canonical name→type-code mappings.
//!
//! A descriptor is a mapping, so the order in which fields are given is not significant.
//! Entries are kept in natural name order (`Field2` before `Field10`), which is also the
//! order fields are packed in. The canonical [Descriptor::signature] is the JSON object
//! of the entries in that order, so equivalent descriptors always share a signature.

use crate::{util::natural_cmp, Error};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Returns the name a compact formula assigns to the field at `index`.
pub fn field_name(index: usize) -> String {
    format!("Field{index}")
}

/// Field names and their type codes, in canonical order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, String>")]
pub struct Descriptor {
    entries: Vec<(String, String)>,
}

impl Descriptor {
    /// Builds a descriptor from a compact formula: one single-character type code per
    /// field, named `Field0`, `Field1`, ...
    pub fn compact(formula: &str) -> Self {
        formula
            .chars()
            .enumerate()
            .map(|(index, letter)| (field_name(index), letter.to_string()))
            .collect()
    }

    /// Parses a JSON object of field names to type codes.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Entries in canonical order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, code)| (name.as_str(), code.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical text used to intern generators.
    pub fn signature(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<BTreeMap<String, String>> for Descriptor {
    fn from(map: BTreeMap<String, String>) -> Self {
        let mut entries: Vec<_> = map.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| natural_cmp(a, b));
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Descriptor {
    /// Later entries replace earlier ones with the same name.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(name, code)| (name.into(), code.into()))
            .collect::<BTreeMap<_, _>>()
            .into()
    }
}

impl Serialize for Descriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(name, code)| (name, code)))
    }
}
