//! Soil and sand classifications stored per column.
//!
//! Both enums are closed domains. Their ordinals are the persisted form, so
//! variants must only ever be appended.

use serde::{Deserialize, Serialize};

/// Soil texture variant for the dirt, grass and clay blocks of a column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SoilVariant {
    #[default]
    Silt = 0,
    Loam = 1,
    SandyLoam = 2,
    SiltyLoam = 3,
}

impl SoilVariant {
    /// Every variant, indexed by ordinal.
    pub const ALL: [SoilVariant; 4] = [
        SoilVariant::Silt,
        SoilVariant::Loam,
        SoilVariant::SandyLoam,
        SoilVariant::SiltyLoam,
    ];

    /// Returns the persisted ordinal.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Looks up a variant by ordinal, or `None` if out of range.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }
}

/// Colour of the sand generated in a column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SandType {
    #[default]
    Brown = 0,
    White = 1,
    Black = 2,
    Red = 3,
    Yellow = 4,
    Green = 5,
    Pink = 6,
}

impl SandType {
    /// Every sand type, indexed by ordinal.
    pub const ALL: [SandType; 7] = [
        SandType::Brown,
        SandType::White,
        SandType::Black,
        SandType::Red,
        SandType::Yellow,
        SandType::Green,
        SandType::Pink,
    ];

    /// Returns the persisted ordinal.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Looks up a sand type by ordinal, or `None` if out of range.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }
}
