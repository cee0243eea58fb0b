//! Palette codec: persists a [`LayerStore`] into a [`TagContainer`].
//!
//! Rock identifiers are verbose, so each distinct rock is written once into a
//! palette and every column stores a one-byte index into it.
//!
//! ## Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `version` | byte, `1` (absent in the legacy layout) |
//! | `pallet` | string list, at most 256 stable rock identifiers |
//! | `bottomLayer` | 256 bytes, palette index per column |
//! | `topLayer` | 256 bytes, palette index per column |
//! | `soilLayer` | 256 bytes, [`SoilVariant`] ordinal per column |
//! | `sandLayer` | 256 bytes, [`SandType`] ordinal per column |
//! | `rockHeight` | 256 ints, transition height per column (absent in the legacy layout) |
//!
//! The legacy layout is what older saves contain: the palette list is stored
//! in reverse order, `bottomLayer` holds the *top* rock indices and `topLayer`
//! the *bottom* ones, and no heights are stored. It is still readable and,
//! when configured, writable.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::layers::{CHUNK_COLUMNS, LayerStore};
use crate::registry::{RockId, RockRegistry};
use crate::soil::{SandType, SoilVariant};
use crate::tag::TagContainer;

const KEY_VERSION: &str = "version";
const KEY_PALETTE: &str = "pallet";
const KEY_BOTTOM: &str = "bottomLayer";
const KEY_TOP: &str = "topLayer";
const KEY_SOIL: &str = "soilLayer";
const KEY_SAND: &str = "sandLayer";
const KEY_HEIGHT: &str = "rockHeight";

/// Palette indices are single bytes.
const MAX_PALETTE_LEN: usize = u8::MAX as usize + 1;

/// Persisted layout revision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageFormat {
    /// Unversioned layout with swapped rock layers and no heights.
    Legacy,
    /// Version 1: correctly named rock layers plus `rockHeight`.
    #[default]
    V1,
}

impl StorageFormat {
    /// Value of the `version` byte, `None` for the unversioned legacy layout.
    pub fn version(self) -> Option<u8> {
        match self {
            StorageFormat::Legacy => None,
            StorageFormat::V1 => Some(1),
        }
    }

    fn from_version(version: Option<u8>) -> Result<Self, MalformedLayerData> {
        match version {
            None => Ok(StorageFormat::Legacy),
            Some(1) => Ok(StorageFormat::V1),
            Some(v) => Err(MalformedLayerData::UnsupportedVersion(v)),
        }
    }

    /// Container keys holding the (bottom, top) rock indices.
    fn rock_layer_keys(self) -> (&'static str, &'static str) {
        match self {
            StorageFormat::Legacy => (KEY_TOP, KEY_BOTTOM),
            StorageFormat::V1 => (KEY_BOTTOM, KEY_TOP),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while encoding a store.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// Some columns were never written.
    #[error("layer store is not populated: {populated} of 256 columns written")]
    NotPopulated {
        /// Number of columns that were written.
        populated: usize,
    },
    /// A rock in the store has no stable identifier in the registry.
    #[error("rock {0:?} is not known to the registry")]
    UnregisteredRock(RockId),
    /// More distinct rocks than a byte index can address.
    #[error("palette needs {0} entries, at most 256 are addressable")]
    PaletteOverflow(usize),
}

/// Ways persisted layer data can be structurally wrong.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedLayerData {
    /// A required field is absent or holds the wrong kind of value.
    #[error("missing or mistyped field `{0}`")]
    MissingField(&'static str),
    /// A per-column array does not have one entry per column.
    #[error("field `{field}` has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    /// The palette is longer than a byte index can address.
    #[error("palette has {0} entries, at most 256 are addressable")]
    PaletteTooLarge(usize),
    /// A column references a palette entry that does not exist.
    #[error("field `{field}` column {column}: palette index {index} out of range (palette has {palette_len})")]
    PaletteIndexOutOfRange {
        field: &'static str,
        column: usize,
        index: u8,
        palette_len: usize,
    },
    /// A column holds an ordinal outside the enumeration.
    #[error("field `{field}` column {column}: invalid ordinal {ordinal}")]
    InvalidOrdinal {
        field: &'static str,
        column: usize,
        ordinal: u8,
    },
    /// The `version` byte names a layout this build cannot read.
    #[error("unsupported layer format version {0}")]
    UnsupportedVersion(u8),
}

/// Errors that can occur while decoding a store.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A palette identifier is unknown to the registry.
    #[error("unresolved rock identifier in palette: {identifier:?}")]
    UnresolvedRock {
        /// The identifier as stored.
        identifier: String,
    },
    /// The stored data is corrupt or from an incompatible layout.
    #[error("malformed layer data: {0}")]
    Malformed(#[from] MalformedLayerData),
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Encodes and decodes [`LayerStore`]s against a rock registry.
pub struct LayerCodec<'r, R: RockRegistry + ?Sized> {
    registry: &'r R,
    format: StorageFormat,
    legacy_rock_height: i32,
}

impl<'r, R: RockRegistry + ?Sized> LayerCodec<'r, R> {
    /// Creates a codec that writes [`StorageFormat::V1`].
    pub fn new(registry: &'r R) -> Self {
        Self {
            registry,
            format: StorageFormat::default(),
            legacy_rock_height: 0,
        }
    }

    /// Sets the layout used by [`encode`](Self::encode). Decoding always
    /// accepts every layout.
    pub fn with_format(mut self, format: StorageFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the transition height assigned to every column when decoding the
    /// legacy layout, which does not store heights.
    pub fn with_legacy_rock_height(mut self, height: i32) -> Self {
        self.legacy_rock_height = height;
        self
    }

    pub fn format(&self) -> StorageFormat {
        self.format
    }

    /// Writes `store` into `out`.
    ///
    /// Everything is validated before the first field is written, so `out` is
    /// left untouched on error.
    pub fn encode<C: TagContainer + ?Sized>(
        &self,
        store: &LayerStore,
        out: &mut C,
    ) -> Result<(), EncodeError> {
        if !store.is_populated() {
            return Err(EncodeError::NotPopulated {
                populated: store.populated_columns(),
            });
        }

        let (palette, index_of) = build_palette(store)?;
        let mut names = palette
            .iter()
            .map(|&rock| {
                self.registry
                    .stable_identifier(rock)
                    .map(str::to_string)
                    .ok_or(EncodeError::UnregisteredRock(rock))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let bottom = column_bytes(store.bottom_rocks(), |rock| index_of[&rock]);
        let top = column_bytes(store.top_rocks(), |rock| index_of[&rock]);
        let (bottom_key, top_key) = self.format.rock_layer_keys();
        if self.format == StorageFormat::Legacy {
            names.reverse();
        }

        tracing::trace!(
            palette_len = names.len(),
            format = ?self.format,
            "encoding chunk rock layers"
        );

        if let Some(version) = self.format.version() {
            out.put_byte(KEY_VERSION, version);
        }
        out.put_string_list(KEY_PALETTE, names);
        out.put_byte_array(bottom_key, bottom);
        out.put_byte_array(top_key, top);
        out.put_byte_array(KEY_SOIL, column_bytes(store.soils(), SoilVariant::ordinal));
        out.put_byte_array(KEY_SAND, column_bytes(store.sands(), SandType::ordinal));
        if self.format == StorageFormat::V1 {
            out.put_int_array(KEY_HEIGHT, store.rock_heights().to_vec());
        }
        Ok(())
    }

    /// Fills `store` from `input`.
    ///
    /// An absent or empty container is not an error: the store is left as it
    /// was, which for a fresh store means unpopulated. On error the store is
    /// also left untouched.
    pub fn decode<C: TagContainer + ?Sized>(
        &self,
        input: Option<&C>,
        store: &mut LayerStore,
    ) -> Result<(), DecodeError> {
        let Some(input) = input.filter(|c| !c.is_empty()) else {
            tracing::debug!("no stored rock layers, leaving store unpopulated");
            return Ok(());
        };

        if input.contains(KEY_VERSION) && input.get_byte(KEY_VERSION).is_none() {
            return Err(MalformedLayerData::MissingField(KEY_VERSION).into());
        }
        let format = StorageFormat::from_version(input.get_byte(KEY_VERSION))?;

        let palette = self.read_palette(input, format)?;
        let (bottom_key, top_key) = format.rock_layer_keys();

        let bottom = decode_rocks(bottom_key, read_layer(input, bottom_key)?, &palette)?;
        let top = decode_rocks(top_key, read_layer(input, top_key)?, &palette)?;
        let soil = decode_columns(read_layer(input, KEY_SOIL)?, SoilVariant::from_ordinal)
            .map_err(|(column, ordinal)| invalid_ordinal(KEY_SOIL, column, ordinal))?;
        let sand = decode_columns(read_layer(input, KEY_SAND)?, SandType::from_ordinal)
            .map_err(|(column, ordinal)| invalid_ordinal(KEY_SAND, column, ordinal))?;

        let heights = match format {
            StorageFormat::V1 => read_heights(input)?,
            StorageFormat::Legacy => {
                tracing::warn!(
                    height = self.legacy_rock_height,
                    "decoding legacy rock layers without stored heights"
                );
                [self.legacy_rock_height; CHUNK_COLUMNS]
            }
        };

        store.fill_from_raw_parts(bottom, top, soil, sand, heights);
        Ok(())
    }

    /// Decodes into a fresh store. See [`decode`](Self::decode).
    pub fn decode_new<C: TagContainer + ?Sized>(
        &self,
        input: Option<&C>,
    ) -> Result<LayerStore, DecodeError> {
        let mut store = LayerStore::new();
        self.decode(input, &mut store)?;
        Ok(store)
    }

    fn read_palette<C: TagContainer + ?Sized>(
        &self,
        input: &C,
        format: StorageFormat,
    ) -> Result<Vec<RockId>, DecodeError> {
        let names = input
            .get_string_list(KEY_PALETTE)
            .ok_or(MalformedLayerData::MissingField(KEY_PALETTE))?;
        if names.len() > MAX_PALETTE_LEN {
            return Err(MalformedLayerData::PaletteTooLarge(names.len()).into());
        }

        let mut palette = names
            .iter()
            .map(|name| {
                self.registry
                    .resolve(name)
                    .ok_or_else(|| DecodeError::UnresolvedRock {
                        identifier: name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if format == StorageFormat::Legacy {
            palette.reverse();
        }
        Ok(palette)
    }
}

/// Collects distinct rocks from the bottom then top layers in first-seen order.
fn build_palette(store: &LayerStore) -> Result<(Vec<RockId>, FxHashMap<RockId, u8>), EncodeError> {
    let mut palette = Vec::new();
    let mut seen: FxHashMap<RockId, usize> = FxHashMap::default();
    for &rock in store.bottom_rocks().iter().chain(store.top_rocks()) {
        seen.entry(rock).or_insert_with(|| {
            palette.push(rock);
            palette.len() - 1
        });
    }
    if palette.len() > MAX_PALETTE_LEN {
        return Err(EncodeError::PaletteOverflow(palette.len()));
    }
    let index_of = seen.into_iter().map(|(rock, i)| (rock, i as u8)).collect();
    Ok((palette, index_of))
}

/// One byte per column.
fn column_bytes<T: Copy>(values: &[T; CHUNK_COLUMNS], to_byte: impl Fn(T) -> u8) -> Vec<u8> {
    values.iter().map(|&v| to_byte(v)).collect()
}

fn read_layer<'a, C: TagContainer + ?Sized>(
    input: &'a C,
    key: &'static str,
) -> Result<&'a [u8; CHUNK_COLUMNS], MalformedLayerData> {
    let bytes = input
        .get_byte_array(key)
        .ok_or(MalformedLayerData::MissingField(key))?;
    bytes
        .try_into()
        .map_err(|_| MalformedLayerData::LengthMismatch {
            field: key,
            expected: CHUNK_COLUMNS,
            actual: bytes.len(),
        })
}

fn read_heights<C: TagContainer + ?Sized>(
    input: &C,
) -> Result<[i32; CHUNK_COLUMNS], MalformedLayerData> {
    let heights = input
        .get_int_array(KEY_HEIGHT)
        .ok_or(MalformedLayerData::MissingField(KEY_HEIGHT))?;
    heights
        .try_into()
        .map_err(|_| MalformedLayerData::LengthMismatch {
            field: KEY_HEIGHT,
            expected: CHUNK_COLUMNS,
            actual: heights.len(),
        })
}

/// Maps every byte through `lookup`, reporting the first `(column, byte)` it rejects.
fn decode_columns<T: Copy + Default>(
    bytes: &[u8; CHUNK_COLUMNS],
    lookup: impl Fn(u8) -> Option<T>,
) -> Result<[T; CHUNK_COLUMNS], (usize, u8)> {
    let mut out = [T::default(); CHUNK_COLUMNS];
    for (column, (&byte, slot)) in bytes.iter().zip(out.iter_mut()).enumerate() {
        *slot = lookup(byte).ok_or((column, byte))?;
    }
    Ok(out)
}

fn decode_rocks(
    field: &'static str,
    bytes: &[u8; CHUNK_COLUMNS],
    palette: &[RockId],
) -> Result<[RockId; CHUNK_COLUMNS], MalformedLayerData> {
    decode_columns(bytes, |i| palette.get(i as usize).copied()).map_err(|(column, index)| {
        MalformedLayerData::PaletteIndexOutOfRange {
            field,
            column,
            index,
            palette_len: palette.len(),
        }
    })
}

fn invalid_ordinal(field: &'static str, column: usize, ordinal: u8) -> MalformedLayerData {
    MalformedLayerData::InvalidOrdinal {
        field,
        column,
        ordinal,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
