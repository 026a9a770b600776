//! Palette storage, persistence, and the one-time conversion into a
//! working-space table the per-pixel search actually queries against.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::colourspace::Colourspace;
use crate::vec4::Vec4;

#[derive(Debug, thiserror::Error)]
pub enum PaletteError {
    #[error("palette must have between 1 and 256 entries, got {0}")]
    InvalidSize(usize),
    #[error("failed to read palette file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse palette JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to grow palette table: {0}")]
    Allocation(#[from] std::collections::TryReserveError),
}

/// An ordered set of 1..=256 RGBA colours, as stored in a palette JSON file.
/// Index order is significant: it is the byte value each entry maps to in
/// the output raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette(Vec<[u8; 4]>);

impl Palette {
    pub fn new(entries: Vec<[u8; 4]>) -> Result<Self, PaletteError> {
        if entries.is_empty() || entries.len() > 256 {
            return Err(PaletteError::InvalidSize(entries.len()));
        }
        Ok(Palette(entries))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[[u8; 4]] {
        &self.0
    }

    /// A two-entry black/white palette — the only palette this crate builds
    /// for the caller, since palette generation proper (k-means, median-cut)
    /// is out of scope.
    pub fn black_and_white() -> Self {
        Palette(vec![[0, 0, 0, 255], [255, 255, 255, 255]])
    }

    /// An evenly-spaced grayscale ramp of `n` entries, `2 <= n <= 256`.
    pub fn grayscale(n: usize) -> Result<Self, PaletteError> {
        if !(2..=256).contains(&n) {
            return Err(PaletteError::InvalidSize(n));
        }
        let entries = (0..n)
            .map(|i| {
                let v = ((i * 255) / (n - 1)) as u8;
                [v, v, v, 255]
            })
            .collect();
        Ok(Palette(entries))
    }

    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<Self, PaletteError> {
        let text = std::fs::read_to_string(path)?;
        let entries: Vec<[u8; 4]> = serde_json::from_str(&text)?;
        Palette::new(entries)
    }

    pub fn save_to_json<P: AsRef<Path>>(&self, path: P) -> Result<(), PaletteError> {
        let text = serde_json::to_string_pretty(&self.0)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// The palette pre-transformed into a working space, built once per job and
/// queried by every pixel. Building this table is the one allocation in the
/// pipeline whose failure is treated as fatal (see `dither::DitherError`).
pub struct PaletteTable {
    colours: Vec<Vec4>,
}

impl PaletteTable {
    pub fn build(palette: &Palette, colourspace: Colourspace, premultiplied: bool) -> Result<Self, PaletteError> {
        let mut colours = Vec::new();
        colours.try_reserve_exact(palette.len())?;

        for &[r, g, b, a] in palette.entries() {
            let srgb = Vec4::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0);
            let mut working = colourspace.forward(srgb);
            if !premultiplied {
                working = working.premultiply_rgb(working.w);
            }
            colours.push(working);
        }

        Ok(PaletteTable { colours })
    }

    pub fn colours(&self) -> &[Vec4] {
        &self.colours
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_and_white_has_two_entries() {
        assert_eq!(Palette::black_and_white().len(), 2);
    }

    #[test]
    fn grayscale_spans_full_byte_range() {
        let p = Palette::grayscale(5).unwrap();
        assert_eq!(p.entries()[0], [0, 0, 0, 255]);
        assert_eq!(p.entries()[4], [255, 255, 255, 255]);
    }

    #[test]
    fn grayscale_rejects_degenerate_sizes() {
        assert!(Palette::grayscale(1).is_err());
        assert!(Palette::grayscale(257).is_err());
    }

    #[test]
    fn new_rejects_empty_and_oversized() {
        assert!(Palette::new(vec![]).is_err());
        assert!(Palette::new(vec![[0, 0, 0, 255]; 257]).is_err());
    }

    #[test]
    fn table_has_one_entry_per_palette_colour() {
        let palette = Palette::grayscale(4).unwrap();
        let table = PaletteTable::build(&palette, Colourspace::Srgb, false).unwrap();
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("imgdither-palette-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("palette.json");

        let palette = Palette::grayscale(6).unwrap();
        palette.save_to_json(&path).unwrap();
        let loaded = Palette::load_from_json(&path).unwrap();
        assert_eq!(palette, loaded);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
