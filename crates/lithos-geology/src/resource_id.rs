//! Namespaced identifiers (`namespace:path`) used as stable rock names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Namespace assumed when an identifier is written without one.
pub const DEFAULT_NAMESPACE: &str = "lithos";

/// Errors that can occur while parsing a [`ResourceId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceIdError {
    /// The namespace or path part is empty.
    #[error("empty identifier component in {0:?}")]
    Empty(String),
    /// A character outside the allowed set was found.
    #[error("invalid character {ch:?} in identifier {id:?}")]
    InvalidChar {
        /// The offending identifier text.
        id: String,
        /// The first rejected character.
        ch: char,
    },
}

/// A `namespace:path` identifier.
///
/// Namespaces accept `[a-z0-9_.-]`; paths additionally accept `/`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId {
    namespace: String,
    path: String,
}

impl ResourceId {
    /// Builds an identifier from its two parts, validating both.
    pub fn new(namespace: &str, path: &str) -> Result<Self, ResourceIdError> {
        let full = format!("{namespace}:{path}");
        if namespace.is_empty() || path.is_empty() {
            return Err(ResourceIdError::Empty(full));
        }
        if let Some(ch) = namespace.chars().find(|&c| !valid_namespace_char(c)) {
            return Err(ResourceIdError::InvalidChar { id: full, ch });
        }
        if let Some(ch) = path.chars().find(|&c| !valid_path_char(c)) {
            return Err(ResourceIdError::InvalidChar { id: full, ch });
        }
        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// Parses `namespace:path`, or a bare `path` in [`DEFAULT_NAMESPACE`].
    pub fn parse(text: &str) -> Result<Self, ResourceIdError> {
        match text.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(DEFAULT_NAMESPACE, text),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

fn valid_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-')
}

fn valid_path_char(c: char) -> bool {
    valid_namespace_char(c) || c == '/'
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for ResourceId {
    type Err = ResourceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ResourceId {
    type Error = ResourceIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.to_string()
    }
}
