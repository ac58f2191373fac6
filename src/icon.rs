// ── PNG → ICO ─────────────────────────────────────────────────────────────────
//
// Windows Vista and later accept PNG-compressed images inside an ICO
// container.  We write the smallest valid container: one directory entry
// followed by the PNG bytes verbatim.  No re-encoding.
//
// No `unsafe`: pure safe Rust.

use std::{fs, io::Write, path::Path};

use crate::error::{Result, ShellError};

// ── Layout constants ──────────────────────────────────────────────────────────

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Signature (8) + IHDR length (4) + "IHDR" (4) + width (4) + height (4).
/// Input must be strictly longer: a file that stops here has no image data.
pub const MIN_PNG_LEN: usize = 24;

/// ICO format limit for either dimension.
pub const MAX_ICON_DIM: u32 = 256;

/// `ICONDIR` (6 bytes) + one `ICONDIRENTRY` (16 bytes).
pub const ICO_HEADER_LEN: usize = 22;

// ── Header inspection ─────────────────────────────────────────────────────────

/// Pixel dimensions read from a PNG's IHDR chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngHeader {
    pub width: u32,
    pub height: u32,
}

/// Check the signature and read the IHDR dimensions.
pub fn read_png_header(png: &[u8]) -> Result<PngHeader> {
    if png.len() <= MIN_PNG_LEN {
        return Err(ShellError::InvalidImage("no image data after the PNG header"));
    }
    if png[..8] != PNG_SIGNATURE {
        return Err(ShellError::InvalidImage("missing PNG signature"));
    }
    if &png[12..16] != b"IHDR" {
        return Err(ShellError::InvalidImage("first chunk is not IHDR"));
    }
    Ok(PngHeader {
        width: be_u32(&png[16..20]),
        height: be_u32(&png[20..24]),
    })
}

fn be_u32(b: &[u8]) -> u32 {
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

// ── Encoding ──────────────────────────────────────────────────────────────────

/// Build the ICO image in memory.
pub fn ico_bytes(png: &[u8]) -> Result<Vec<u8>> {
    let header = read_png_header(png)?;
    if header.width == 0 || header.height == 0 {
        return Err(ShellError::InvalidImage("zero width or height"));
    }
    if header.width > MAX_ICON_DIM || header.height > MAX_ICON_DIM {
        return Err(ShellError::ImageTooLarge {
            width: header.width,
            height: header.height,
        });
    }
    let size = u32::try_from(png.len()).map_err(|_| ShellError::InvalidImage("larger than 4 GiB"))?;

    let mut ico = Vec::with_capacity(ICO_HEADER_LEN + png.len());

    // ICONDIR: reserved, type = 1 (icon), image count = 1.
    ico.extend_from_slice(&0u16.to_le_bytes());
    ico.extend_from_slice(&1u16.to_le_bytes());
    ico.extend_from_slice(&1u16.to_le_bytes());

    // ICONDIRENTRY.  A dimension of 256 is stored as 0.
    ico.push(dim_byte(header.width));
    ico.push(dim_byte(header.height));
    ico.push(0); // color count
    ico.push(0); // reserved
    ico.extend_from_slice(&1u16.to_le_bytes()); // planes
    ico.extend_from_slice(&32u16.to_le_bytes()); // bit count
    ico.extend_from_slice(&size.to_le_bytes());
    ico.extend_from_slice(&(ICO_HEADER_LEN as u32).to_le_bytes());

    ico.extend_from_slice(png);
    Ok(ico)
}

fn dim_byte(d: u32) -> u8 {
    if d >= MAX_ICON_DIM {
        0
    } else {
        d as u8
    }
}

/// Validate `png` and write it to `out` wrapped in an ICO container.
///
/// The output file is only created once validation has passed, so rejected
/// input never leaves a file behind.
pub fn create_ico_from_png(png: &[u8], out: &Path) -> Result<()> {
    let ico = ico_bytes(png)?;
    let mut file = fs::File::create(out)?;
    file.write_all(&ico)?;
    log::info!("wrote icon {} ({} bytes)", out.display(), ico.len());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
