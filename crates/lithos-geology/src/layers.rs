//! Column geology for a 16×16 chunk.
//!
//! Every column carries a bottom rock, a top rock, the height at which they
//! meet, a soil variant and a sand type. Columns are addressed with
//! wrap-around: only the low four bits of each coordinate matter, so world
//! coordinates can be passed straight through.

use crate::registry::RockId;
use crate::soil::{SandType, SoilVariant};

/// Columns per chunk axis.
pub const CHUNK_SIDE: usize = 16;

/// Total number of columns in a chunk (16²).
pub const CHUNK_COLUMNS: usize = CHUNK_SIDE * CHUNK_SIDE;

const MASK: i32 = CHUNK_SIDE as i32 - 1;

/// Returns the column index for `(x, z)`, wrapping both coordinates into the chunk.
///
/// Total for every `i32`: negative coordinates wrap the same way as the
/// generator's chunk-local convention (`-1` maps to `15`).
#[inline]
pub fn local_index(x: i32, z: i32) -> usize {
    (x & MASK) as usize + CHUNK_SIDE * (z & MASK) as usize
}

/// Everything stored for a single column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColumnGeology {
    pub bottom_rock: RockId,
    pub top_rock: RockId,
    /// Highest `y` that still belongs to the bottom band.
    pub rock_height: i32,
    pub soil: SoilVariant,
    pub sand: SandType,
}

/// Per-column geology for one chunk.
///
/// Created empty when generation starts, filled column by column through
/// [`LayerStore::set_column`] (or all at once by the codec), then read.
/// Reading a column that was never written is a caller bug: the unchecked
/// accessors assert in debug builds and return the zeroed default otherwise.
/// Use [`LayerStore::column`] for a checked read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerStore {
    bottom_rock: [RockId; CHUNK_COLUMNS],
    top_rock: [RockId; CHUNK_COLUMNS],
    soil: [SoilVariant; CHUNK_COLUMNS],
    sand: [SandType; CHUNK_COLUMNS],
    rock_height: [i32; CHUNK_COLUMNS],
    /// One bit per column, set once the column has been written.
    written: [u64; CHUNK_COLUMNS / 64],
}

impl LayerStore {
    /// Creates an unpopulated store.
    pub fn new() -> Self {
        Self {
            bottom_rock: [RockId::default(); CHUNK_COLUMNS],
            top_rock: [RockId::default(); CHUNK_COLUMNS],
            soil: [SoilVariant::default(); CHUNK_COLUMNS],
            sand: [SandType::default(); CHUNK_COLUMNS],
            rock_height: [0; CHUNK_COLUMNS],
            written: [0; CHUNK_COLUMNS / 64],
        }
    }

    /// Builds a fully populated store by calling `f` for every `(x, z)` in `0..16`.
    pub fn from_fn(mut f: impl FnMut(i32, i32) -> ColumnGeology) -> Self {
        let mut store = Self::new();
        for z in 0..CHUNK_SIDE as i32 {
            for x in 0..CHUNK_SIDE as i32 {
                store.set_column(x, z, f(x, z));
            }
        }
        store
    }

    /// Writes all attributes of the column at `(x, z)`.
    pub fn set_column(&mut self, x: i32, z: i32, column: ColumnGeology) {
        let i = local_index(x, z);
        self.bottom_rock[i] = column.bottom_rock;
        self.top_rock[i] = column.top_rock;
        self.rock_height[i] = column.rock_height;
        self.soil[i] = column.soil;
        self.sand[i] = column.sand;
        self.written[i / 64] |= 1 << (i % 64);
    }

    /// Returns the column at `(x, z)`, or `None` if it has not been written.
    pub fn column(&self, x: i32, z: i32) -> Option<ColumnGeology> {
        let i = local_index(x, z);
        self.is_written(i).then(|| ColumnGeology {
            bottom_rock: self.bottom_rock[i],
            top_rock: self.top_rock[i],
            rock_height: self.rock_height[i],
            soil: self.soil[i],
            sand: self.sand[i],
        })
    }

    /// Returns the rock at `(x, y, z)`.
    ///
    /// `y` above the transition height reads the top band; `y` at or below it
    /// reads the bottom band. `y` is not bounds-checked.
    pub fn rock(&self, x: i32, y: i32, z: i32) -> RockId {
        if y > self.rock_height(x, z) {
            self.top_rock(x, z)
        } else {
            self.bottom_rock(x, z)
        }
    }

    /// Returns the transition height of the column at `(x, z)`.
    pub fn rock_height(&self, x: i32, z: i32) -> i32 {
        self.rock_height[self.read_index(x, z)]
    }

    pub fn top_rock(&self, x: i32, z: i32) -> RockId {
        self.top_rock[self.read_index(x, z)]
    }

    pub fn bottom_rock(&self, x: i32, z: i32) -> RockId {
        self.bottom_rock[self.read_index(x, z)]
    }

    pub fn soil(&self, x: i32, z: i32) -> SoilVariant {
        self.soil[self.read_index(x, z)]
    }

    pub fn sand(&self, x: i32, z: i32) -> SandType {
        self.sand[self.read_index(x, z)]
    }

    /// Returns `true` once every column has been written.
    pub fn is_populated(&self) -> bool {
        self.written.iter().all(|&bits| bits == u64::MAX)
    }

    /// Number of columns written so far.
    pub fn populated_columns(&self) -> usize {
        self.written.iter().map(|bits| bits.count_ones() as usize).sum()
    }

    pub(crate) fn bottom_rocks(&self) -> &[RockId; CHUNK_COLUMNS] {
        &self.bottom_rock
    }

    pub(crate) fn top_rocks(&self) -> &[RockId; CHUNK_COLUMNS] {
        &self.top_rock
    }

    pub(crate) fn soils(&self) -> &[SoilVariant; CHUNK_COLUMNS] {
        &self.soil
    }

    pub(crate) fn sands(&self) -> &[SandType; CHUNK_COLUMNS] {
        &self.sand
    }

    pub(crate) fn rock_heights(&self) -> &[i32; CHUNK_COLUMNS] {
        &self.rock_height
    }

    /// Replaces every column at once (used by deserialization).
    ///
    /// The caller must have validated all five arrays.
    pub(crate) fn fill_from_raw_parts(
        &mut self,
        bottom_rock: [RockId; CHUNK_COLUMNS],
        top_rock: [RockId; CHUNK_COLUMNS],
        soil: [SoilVariant; CHUNK_COLUMNS],
        sand: [SandType; CHUNK_COLUMNS],
        rock_height: [i32; CHUNK_COLUMNS],
    ) {
        self.bottom_rock = bottom_rock;
        self.top_rock = top_rock;
        self.soil = soil;
        self.sand = sand;
        self.rock_height = rock_height;
        self.written = [u64::MAX; CHUNK_COLUMNS / 64];
    }

    fn is_written(&self, i: usize) -> bool {
        self.written[i / 64] & (1 << (i % 64)) != 0
    }

    fn read_index(&self, x: i32, z: i32) -> usize {
        let i = local_index(x, z);
        debug_assert!(self.is_written(i), "column ({x}, {z}) read before it was populated");
        i
    }
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
