//! Named-field container the codec writes chunk geology into.
//!
//! Hosts persist chunks in their own key/value formats. The codec only needs
//! byte, byte-array, int-array and string-list fields, so [`TagContainer`] is that narrow
//! surface. [`Compound`] is the in-crate implementation; it is `serde`
//! serializable so it can be stored with any serde format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Typed field access by string key.
///
/// A `get_*` call returns `None` both when the key is absent and when it holds
/// a different kind of value. An empty array is `Some(&[])`.
pub trait TagContainer {
    fn put_byte(&mut self, key: &str, value: u8);
    fn get_byte(&self, key: &str) -> Option<u8>;

    fn put_byte_array(&mut self, key: &str, value: Vec<u8>);
    fn get_byte_array(&self, key: &str) -> Option<&[u8]>;

    fn put_int_array(&mut self, key: &str, value: Vec<i32>);
    fn get_int_array(&self, key: &str) -> Option<&[i32]>;

    fn put_string_list(&mut self, key: &str, value: Vec<String>);
    fn get_string_list(&self, key: &str) -> Option<&[String]>;

    /// Returns `true` if any value is stored under `key`.
    fn contains(&self, key: &str) -> bool;

    /// Returns `true` if the container holds no fields at all.
    fn is_empty(&self) -> bool;
}

/// A single stored value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tag {
    Byte(u8),
    ByteArray(Vec<u8>),
    IntArray(Vec<i32>),
    StringList(Vec<String>),
}

/// Ordered map of named [`Tag`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Compound {
    tags: BTreeMap<String, Tag>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw tag, returning the previous value under `key`.
    pub fn insert(&mut self, key: impl Into<String>, tag: Tag) -> Option<Tag> {
        self.tags.insert(key.into(), tag)
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.tags.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.tags.remove(key)
    }

    /// Iterates over fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }
}

impl TagContainer for Compound {
    fn put_byte(&mut self, key: &str, value: u8) {
        self.insert(key, Tag::Byte(value));
    }

    fn get_byte(&self, key: &str) -> Option<u8> {
        match self.tags.get(key)? {
            Tag::Byte(v) => Some(*v),
            _ => None,
        }
    }

    fn put_byte_array(&mut self, key: &str, value: Vec<u8>) {
        self.insert(key, Tag::ByteArray(value));
    }

    fn get_byte_array(&self, key: &str) -> Option<&[u8]> {
        match self.tags.get(key)? {
            Tag::ByteArray(v) => Some(v),
            _ => None,
        }
    }

    fn put_int_array(&mut self, key: &str, value: Vec<i32>) {
        self.insert(key, Tag::IntArray(value));
    }

    fn get_int_array(&self, key: &str) -> Option<&[i32]> {
        match self.tags.get(key)? {
            Tag::IntArray(v) => Some(v),
            _ => None,
        }
    }

    fn put_string_list(&mut self, key: &str, value: Vec<String>) {
        self.insert(key, Tag::StringList(value));
    }

    fn get_string_list(&self, key: &str) -> Option<&[String]> {
        match self.tags.get(key)? {
            Tag::StringList(v) => Some(v),
            _ => None,
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
