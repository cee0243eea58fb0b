//! Rock registry: maps compact [`RockId`] handles to [`RockDef`] metadata and
//! stable namespaced identifiers.
//!
//! The codec only depends on the [`RockRegistry`] trait, so hosts can plug in
//! their own block registry. [`RockTypeRegistry`] is the built-in table.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resource_id::{ResourceId, ResourceIdError};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Registry handle for a rock type. Two handles are the same rock iff they are equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RockId(pub u16);

/// Geological category of a rock type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RockCategory {
    IgneousIntrusive,
    IgneousExtrusive,
    Sedimentary,
    Metamorphic,
}

/// Descriptor for a rock type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RockDef {
    /// Stable identifier (e.g. `lithos:granite`). Written into saved chunks.
    pub name: ResourceId,
    /// Rock category.
    pub category: RockCategory,
}

impl RockDef {
    /// Convenience constructor that parses `name`.
    pub fn new(name: &str, category: RockCategory) -> Result<Self, ResourceIdError> {
        Ok(Self {
            name: ResourceId::parse(name)?,
            category,
        })
    }
}

/// Errors that can occur during rock registration.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A rock with the same identifier has already been registered.
    #[error("duplicate rock identifier: {0}")]
    DuplicateName(ResourceId),
    /// The identifier text could not be parsed.
    #[error("invalid rock identifier: {0}")]
    InvalidIdentifier(#[from] ResourceIdError),
    /// All 65 536 slots have been consumed.
    #[error("rock registry is full (max 65536 types)")]
    RegistryFull,
}

/// Identity lookups the layer codec needs from a rock registry.
pub trait RockRegistry {
    /// Resolves a persisted identifier to a rock, or `None` if unknown.
    fn resolve(&self, identifier: &str) -> Option<RockId>;

    /// Returns the identifier to persist for `rock`.
    ///
    /// Must be stable across process runs. `None` if `rock` was not issued by
    /// this registry.
    fn stable_identifier(&self, rock: RockId) -> Option<&str>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Dense table of rock definitions with O(1) lookup by id and by identifier.
pub struct RockTypeRegistry {
    /// `index == RockId.0`.
    rocks: Vec<RockDef>,
    /// Cached `namespace:path` text per rock, parallel to `rocks`.
    identifiers: Vec<String>,
    name_to_id: FxHashMap<ResourceId, RockId>,
}

impl RockTypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            rocks: Vec::new(),
            identifiers: Vec::new(),
            name_to_id: FxHashMap::default(),
        }
    }

    /// Builds a registry from a list of definitions, in order.
    pub fn from_defs(defs: impl IntoIterator<Item = RockDef>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for def in defs {
            registry.register(def)?;
        }
        Ok(registry)
    }

    /// Registers a new rock type and returns its assigned ID.
    ///
    /// IDs are assigned sequentially starting from 0.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if the identifier is taken, or
    /// [`RegistryError::RegistryFull`] if all slots are consumed.
    pub fn register(&mut self, def: RockDef) -> Result<RockId, RegistryError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        if self.rocks.len() > u16::MAX as usize {
            return Err(RegistryError::RegistryFull);
        }

        let id = RockId(self.rocks.len() as u16);
        self.name_to_id.insert(def.name.clone(), id);
        self.identifiers.push(def.name.to_string());
        self.rocks.push(def);
        Ok(id)
    }

    /// Parses `name` and registers it with `category`.
    pub fn register_named(
        &mut self,
        name: &str,
        category: RockCategory,
    ) -> Result<RockId, RegistryError> {
        let name = ResourceId::parse(name)?;
        self.register(RockDef { name, category })
    }

    /// Returns the definition for a given ID, or `None` if it was never issued.
    pub fn get(&self, id: RockId) -> Option<&RockDef> {
        self.rocks.get(id.0 as usize)
    }

    /// Looks up a rock by identifier. Bare paths use the default namespace.
    pub fn lookup_by_name(&self, name: &str) -> Option<RockId> {
        let id = ResourceId::parse(name).ok()?;
        self.name_to_id.get(&id).copied()
    }

    /// Iterates over all registered rocks in id order.
    pub fn iter(&self) -> impl Iterator<Item = (RockId, &RockDef)> {
        self.rocks
            .iter()
            .enumerate()
            .map(|(i, def)| (RockId(i as u16), def))
    }

    /// Returns the number of registered rocks.
    pub fn len(&self) -> usize {
        self.rocks.len()
    }

    /// Returns `true` if no rocks are registered.
    pub fn is_empty(&self) -> bool {
        self.rocks.is_empty()
    }
}

impl Default for RockTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RockRegistry for RockTypeRegistry {
    fn resolve(&self, identifier: &str) -> Option<RockId> {
        self.lookup_by_name(identifier)
    }

    fn stable_identifier(&self, rock: RockId) -> Option<&str> {
        self.identifiers.get(rock.0 as usize).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
