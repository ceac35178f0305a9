//! Attribute sets for elements.
//!
//! A parser hands over attributes as an ordered list of raw `(name, value)`
//! pairs, possibly absent. [`Attributes::from_raw`] turns that list into the
//! ordered map an element owns. Names are kept exactly as given (no case
//! folding). When a name repeats, the last value wins and the entry keeps the
//! position of its first occurrence.

use indexmap::IndexMap;

/// A raw attribute as delivered by a parser.
pub type RawAttribute = (String, String);

/// Ordered attribute map owned by an element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: IndexMap<String, String>,
}

impl Attributes {
    /// Creates an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts raw parser attributes. `None` yields an empty set.
    pub fn from_raw(raw: Option<&[RawAttribute]>) -> Self {
        let mut attributes = Self::new();
        for (name, value) in raw.into_iter().flatten() {
            attributes.set(name.as_str(), value.as_str());
        }
        attributes
    }

    /// Returns the value of an attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Sets an attribute, returning the previous value. An existing entry
    /// keeps its position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), value.into())
    }

    /// Removes an attribute, preserving the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.shift_remove(name)
    }

    /// Checks if an attribute exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterates over attributes in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<RawAttribute> for Attributes {
    fn from_iter<I: IntoIterator<Item = RawAttribute>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.set(name, value);
        }
        attributes
    }
}
