//! Minimal uncompressed BMP reader/writer — the external raster
//! collaborator named in the engine's interface (§4.8): the core dither
//! loop never touches a file, it only ever sees RGBA byte arrays.
//!
//! Supports the common uncompressed pixel depths (8-bit palettized, 24-bit
//! BGR, 32-bit BGRA). `BI_BITFIELDS` and RLE compression are not supported;
//! such files are rejected rather than silently misread.

use std::io::{Cursor, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

const FILE_HEADER_SIZE: u32 = 14;
const INFO_HEADER_SIZE: u32 = 40;
const BI_RGB: u32 = 0;

#[derive(Debug, thiserror::Error)]
pub enum BmpError {
    #[error("not a BMP file (missing 'BM' magic)")]
    BadMagic,
    #[error("unsupported compression type {0}, only BI_RGB is supported")]
    UnsupportedCompression(u32),
    #[error("unsupported bit depth {0}, expected 8, 24, or 32")]
    UnsupportedBitDepth(u16),
    #[error("image dimensions out of range: width={width} height={height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A decoded raster: dimensions plus tightly packed top-down RGBA bytes.
pub struct RasterImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

fn row_stride(width: usize, bytes_per_pixel: usize) -> usize {
    (width * bytes_per_pixel + 3) & !3
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<RasterImage, BmpError> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

pub fn decode(bytes: &[u8]) -> Result<RasterImage, BmpError> {
    let mut cursor = Cursor::new(bytes);

    let mut magic = [0u8; 2];
    cursor.read_exact(&mut magic)?;
    if &magic != b"BM" {
        return Err(BmpError::BadMagic);
    }
    cursor.read_u32::<LittleEndian>()?; // file size, unused
    cursor.read_u16::<LittleEndian>()?; // reserved1
    cursor.read_u16::<LittleEndian>()?; // reserved2
    let pixel_data_offset = cursor.read_u32::<LittleEndian>()?;

    cursor.read_u32::<LittleEndian>()?; // info header size, assumed BITMAPINFOHEADER
    let width = cursor.read_i32::<LittleEndian>()?;
    let height_raw = cursor.read_i32::<LittleEndian>()?;
    cursor.read_u16::<LittleEndian>()?; // planes
    let bit_depth = cursor.read_u16::<LittleEndian>()?;
    let compression = cursor.read_u32::<LittleEndian>()?;
    cursor.read_u32::<LittleEndian>()?; // image size, unused
    cursor.read_i32::<LittleEndian>()?; // x pixels per meter
    cursor.read_i32::<LittleEndian>()?; // y pixels per meter
    let colours_used = cursor.read_u32::<LittleEndian>()?;
    cursor.read_u32::<LittleEndian>()?; // important colours

    if compression != BI_RGB {
        return Err(BmpError::UnsupportedCompression(compression));
    }
    if width <= 0 || height_raw == 0 {
        return Err(BmpError::InvalidDimensions { width, height: height_raw });
    }

    let width = width as usize;
    let bottom_up = height_raw > 0;
    let height = height_raw.unsigned_abs() as usize;

    let palette: Vec<[u8; 4]> = if bit_depth == 8 {
        let n = if colours_used == 0 { 256 } else { colours_used as usize };
        let mut table = Vec::with_capacity(n);
        for _ in 0..n {
            let b = cursor.read_u8()?;
            let g = cursor.read_u8()?;
            let r = cursor.read_u8()?;
            cursor.read_u8()?; // reserved
            table.push([r, g, b, 255]);
        }
        table
    } else {
        Vec::new()
    };

    cursor.set_position(pixel_data_offset as u64);

    let bytes_per_pixel = match bit_depth {
        8 => 1,
        24 => 3,
        32 => 4,
        other => return Err(BmpError::UnsupportedBitDepth(other)),
    };
    let stride = row_stride(width, bytes_per_pixel);

    let mut rgba = vec![0u8; width * height * 4];
    let mut row_buf = vec![0u8; stride];

    for row_index in 0..height {
        cursor.read_exact(&mut row_buf)?;
        // BMP rows are bottom-up by default; remap into top-down RGBA.
        let dest_row = if bottom_up { height - 1 - row_index } else { row_index };

        for x in 0..width {
            let (r, g, b, a) = match bit_depth {
                8 => {
                    let idx = row_buf[x] as usize;
                    let c = palette.get(idx).copied().unwrap_or([0, 0, 0, 255]);
                    (c[0], c[1], c[2], c[3])
                }
                24 => {
                    let base = x * 3;
                    (row_buf[base + 2], row_buf[base + 1], row_buf[base], 255)
                }
                32 => {
                    let base = x * 4;
                    (row_buf[base + 2], row_buf[base + 1], row_buf[base], row_buf[base + 3])
                }
                _ => unreachable!(),
            };
            let dest = (dest_row * width + x) * 4;
            rgba[dest] = r;
            rgba[dest + 1] = g;
            rgba[dest + 2] = b;
            rgba[dest + 3] = a;
        }
    }

    Ok(RasterImage { width, height, rgba })
}

/// Writes a 32-bit BGRA BMP (top-down RGBA input, bottom-up on disk).
pub fn save_rgba<P: AsRef<Path>>(path: P, width: usize, height: usize, rgba: &[u8]) -> Result<(), BmpError> {
    let bytes = encode_rgba(width, height, rgba)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

pub fn encode_rgba(width: usize, height: usize, rgba: &[u8]) -> Result<Vec<u8>, BmpError> {
    if width == 0 || height == 0 {
        return Err(BmpError::InvalidDimensions { width: width as i32, height: height as i32 });
    }

    let stride = row_stride(width, 4);
    let pixel_data_size = stride * height;
    let pixel_data_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
    let file_size = pixel_data_offset + pixel_data_size as u32;

    let mut out = Vec::with_capacity(file_size as usize);
    out.write_all(b"BM")?;
    out.write_u32::<LittleEndian>(file_size)?;
    out.write_u16::<LittleEndian>(0)?;
    out.write_u16::<LittleEndian>(0)?;
    out.write_u32::<LittleEndian>(pixel_data_offset)?;

    out.write_u32::<LittleEndian>(INFO_HEADER_SIZE)?;
    out.write_i32::<LittleEndian>(width as i32)?;
    out.write_i32::<LittleEndian>(height as i32)?; // positive: bottom-up
    out.write_u16::<LittleEndian>(1)?;
    out.write_u16::<LittleEndian>(32)?;
    out.write_u32::<LittleEndian>(BI_RGB)?;
    out.write_u32::<LittleEndian>(pixel_data_size as u32)?;
    out.write_i32::<LittleEndian>(2835)?; // ~72 DPI
    out.write_i32::<LittleEndian>(2835)?;
    out.write_u32::<LittleEndian>(0)?;
    out.write_u32::<LittleEndian>(0)?;

    for row_index in (0..height).rev() {
        for x in 0..width {
            let src = (row_index * width + x) * 4;
            out.write_u8(rgba[src + 2])?; // B
            out.write_u8(rgba[src + 1])?; // G
            out.write_u8(rgba[src])?; // R
            out.write_u8(rgba[src + 3])?; // A
        }
    }

    Ok(out)
}

/// Writes an 8-bit palette-indexed BMP carrying `palette` as its colour
/// table and `indices` (one byte per pixel, top-down) as the pixel data.
pub fn save_indexed<P: AsRef<Path>>(
    path: P,
    width: usize,
    height: usize,
    indices: &[u8],
    palette: &[[u8; 4]],
) -> Result<(), BmpError> {
    let bytes = encode_indexed(width, height, indices, palette)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

pub fn encode_indexed(
    width: usize,
    height: usize,
    indices: &[u8],
    palette: &[[u8; 4]],
) -> Result<Vec<u8>, BmpError> {
    if width == 0 || height == 0 {
        return Err(BmpError::InvalidDimensions { width: width as i32, height: height as i32 });
    }

    let stride = row_stride(width, 1);
    let pixel_data_size = stride * height;
    let palette_size = palette.len() * 4;
    let pixel_data_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE + palette_size as u32;
    let file_size = pixel_data_offset + pixel_data_size as u32;

    let mut out = Vec::with_capacity(file_size as usize);
    out.write_all(b"BM")?;
    out.write_u32::<LittleEndian>(file_size)?;
    out.write_u16::<LittleEndian>(0)?;
    out.write_u16::<LittleEndian>(0)?;
    out.write_u32::<LittleEndian>(pixel_data_offset)?;

    out.write_u32::<LittleEndian>(INFO_HEADER_SIZE)?;
    out.write_i32::<LittleEndian>(width as i32)?;
    out.write_i32::<LittleEndian>(height as i32)?;
    out.write_u16::<LittleEndian>(1)?;
    out.write_u16::<LittleEndian>(8)?;
    out.write_u32::<LittleEndian>(BI_RGB)?;
    out.write_u32::<LittleEndian>(pixel_data_size as u32)?;
    out.write_i32::<LittleEndian>(2835)?;
    out.write_i32::<LittleEndian>(2835)?;
    out.write_u32::<LittleEndian>(palette.len() as u32)?;
    out.write_u32::<LittleEndian>(palette.len() as u32)?;

    for &[r, g, b, _a] in palette {
        out.write_u8(b)?;
        out.write_u8(g)?;
        out.write_u8(r)?;
        out.write_u8(0)?;
    }

    let row_pad = stride - width;
    for row_index in (0..height).rev() {
        let row = &indices[row_index * width..row_index * width + width];
        out.write_all(row)?;
        for _ in 0..row_pad {
            out.write_u8(0)?;
        }
    }

    Ok(out)
}
