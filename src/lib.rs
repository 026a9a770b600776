//! A perceptual palette-dithering engine: colourspace transforms, a
//! nearest-colour search, and ordered/error-diffusion dithering over a
//! fixed, caller-supplied palette.
//!
//! The engine itself (`vec4`, `colourspace`, `search`, `threshold`,
//! `diffusion`, `dither`) does no file I/O and does not log; `bmp` and
//! `palette` are the external collaborators that feed it and the CLI in
//! `src/bin/imgdither.rs` wires them together.

pub mod bmp;
pub mod colourspace;
pub mod dither;
pub mod diffusion;
pub mod palette;
pub mod search;
pub mod threshold;
pub mod vec4;
