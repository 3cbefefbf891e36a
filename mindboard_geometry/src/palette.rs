// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic area colors.

/// An opaque RGB color used to tint a category's containment area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl AreaColor {
    /// Create a color from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// The fixed palette area colors are drawn from.
pub const AREA_PALETTE: [AreaColor; 8] = [
    AreaColor::rgb(0x8E, 0xC5, 0xFC),
    AreaColor::rgb(0xFC, 0xB6, 0x9F),
    AreaColor::rgb(0xA7, 0xE8, 0xBD),
    AreaColor::rgb(0xFF, 0xDA, 0x79),
    AreaColor::rgb(0xD3, 0xB5, 0xF5),
    AreaColor::rgb(0xF7, 0xA8, 0xC9),
    AreaColor::rgb(0x9F, 0xE2, 0xE0),
    AreaColor::rgb(0xC9, 0xD1, 0x7E),
];

/// 32-bit rolling string hash (`h * 31 + c`, wrapping) over the chars of `id`.
pub fn id_hash(id: &str) -> i32 {
    id.chars()
        .fold(0_i32, |h, c| h.wrapping_mul(31).wrapping_add_unsigned(u32::from(c)))
}

/// The palette color for a category id.
///
/// The mapping only depends on the id's characters, so a category keeps its
/// color across renders, sessions, and processes.
pub fn color_for_id(id: &str) -> AreaColor {
    let slot = id_hash(id).unsigned_abs() % 8;
    AREA_PALETTE[slot as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable() {
        assert_eq!(id_hash(""), 0);
        assert_eq!(id_hash("a"), 97);
        assert_eq!(id_hash("ab"), 97 * 31 + 98);
    }

    #[test]
    fn color_is_deterministic_and_in_palette() {
        for id in ["cat-1", "cat-2", "7d1f0c", "", "a much longer identifier string"] {
            let c = color_for_id(id);
            assert_eq!(c, color_for_id(id), "color must be stable for {id:?}");
            assert!(AREA_PALETTE.contains(&c), "color for {id:?} must come from the palette");
        }
    }
}
