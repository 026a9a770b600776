//! The per-pixel dither driver (C7): ingests source RGBA bytes in scan
//! order, dispatches to the threshold or diffusion family, and emits
//! palette indices.

use crate::colourspace::Colourspace;
use crate::diffusion::{DiffusionBuffer, DiffusionKernel};
use crate::palette::{Palette, PaletteError, PaletteTable};
use crate::search::{self, SearchError};
use crate::threshold;
use crate::vec4::Vec4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DitherType {
    None,
    Checker,
    /// Ordered (Bayer) dither over a `2^n x 2^n` tile, `n` in `1..=6`.
    Ordered(u32),
    FloydSteinberg,
    Atkinson,
}

impl DitherType {
    pub fn parse(name: &str) -> Option<DitherType> {
        Some(match name {
            "none" => DitherType::None,
            "checker" => DitherType::Checker,
            "floyd" => DitherType::FloydSteinberg,
            "atkinson" => DitherType::Atkinson,
            "ord2" => DitherType::Ordered(1),
            "ord4" => DitherType::Ordered(2),
            "ord8" => DitherType::Ordered(3),
            "ord16" => DitherType::Ordered(4),
            "ord32" => DitherType::Ordered(5),
            "ord64" => DitherType::Ordered(6),
            _ => return None,
        })
    }

    /// The mode-specific default level named in the configuration table.
    pub fn default_level(self) -> f32 {
        match self {
            DitherType::None => 0.0,
            DitherType::FloydSteinberg | DitherType::Atkinson => 0.5,
            DitherType::Checker | DitherType::Ordered(_) => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DitherConfig {
    pub dither_type: DitherType,
    pub dither_level: f32,
    pub colourspace: Colourspace,
    pub premultiplied_alpha: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DitherError {
    #[error("invalid dimensions: width={width} height={height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("invalid palette: {0}")]
    InvalidPalette(#[from] PaletteError),
    #[error("nearest-colour search failed: {0}")]
    Search(#[from] SearchError),
    #[error("source buffer too small: need {needed} bytes, got {got}")]
    SourceTooSmall { needed: usize, got: usize },
    #[error("output buffer too small: need {needed} bytes, got {got}")]
    OutputTooSmall { needed: usize, got: usize },
}

/// Caller-observable outcome of a dither call. `diffusion_degraded` is set
/// when the diffusion buffer could not be allocated and the engine fell
/// back to no dithering for the remainder of the image, rather than
/// silently degrading with no signal back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DitherReport {
    pub diffusion_degraded: bool,
}

/// Converts a full-colour RGBA raster into palette indices of the same
/// dimensions, per `config`.
pub fn dither(
    out_indices: &mut [u8],
    source_rgba: &[u8],
    width: usize,
    height: usize,
    palette: &Palette,
    config: DitherConfig,
) -> Result<DitherReport, DitherError> {
    if width == 0 || height == 0 {
        return Err(DitherError::InvalidDimensions { width, height });
    }

    let needed = width * height * 4;
    if source_rgba.len() < needed {
        return Err(DitherError::SourceTooSmall { needed, got: source_rgba.len() });
    }
    if out_indices.len() < width * height {
        return Err(DitherError::OutputTooSmall { needed: width * height, got: out_indices.len() });
    }

    // Fatal allocation: the palette table is load-bearing for every pixel.
    let table = PaletteTable::build(palette, config.colourspace, config.premultiplied_alpha)?;

    let mut report = DitherReport::default();
    let mut effective_mode = config.dither_type;

    let mut diffusion = match effective_mode {
        DitherType::FloydSteinberg | DitherType::Atkinson => {
            let kernel = if effective_mode == DitherType::FloydSteinberg {
                DiffusionKernel::FloydSteinberg
            } else {
                DiffusionKernel::Atkinson
            };
            match DiffusionBuffer::try_new(kernel, width) {
                Ok(buf) => Some(buf),
                Err(_) => {
                    // Non-fatal: degrade to no dithering, but tell the caller.
                    report.diffusion_degraded = true;
                    effective_mode = DitherType::None;
                    None
                }
            }
        }
        _ => None,
    };

    for y in 0..height {
        for x in 0..width {
            let src_offset = (y * width + x) * 4;
            let r = source_rgba[src_offset];
            let g = source_rgba[src_offset + 1];
            let b = source_rgba[src_offset + 2];
            let a = source_rgba[src_offset + 3];

            let srgb = Vec4::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0);
            let mut p = config.colourspace.forward(srgb);
            if !config.premultiplied_alpha {
                p = p.premultiply_rgb(p.w);
            }

            let index = match effective_mode {
                DitherType::None => search::nearest(p, table.colours())?,
                DitherType::FloydSteinberg | DitherType::Atkinson => {
                    let buf = diffusion.as_mut().expect("diffusion buffer present for this mode");
                    let q = p + buf.read(x) * config.dither_level;
                    let idx = search::nearest(q, table.colours())?;
                    let chosen = table.colours()[idx];
                    let err = p - chosen;
                    buf.propagate(x, err);
                    idx
                }
                DitherType::Checker => {
                    let offset = threshold::checker_offset(x as u32, y as u32) * config.dither_level;
                    search::nearest_two_biased(p, table.colours(), Vec4::splat(offset))?
                }
                DitherType::Ordered(n) => {
                    let offset = threshold::bayer_offset(x as u32, y as u32, n) * config.dither_level;
                    search::nearest_two_biased(p, table.colours(), Vec4::splat(offset))?
                }
            };

            out_indices[y * width + x] = index as u8;
        }

        if let Some(buf) = diffusion.as_mut() {
            if y + 1 < height {
                buf.advance_row();
            }
        }
    }

    Ok(report)
}
