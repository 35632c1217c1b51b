//! TIFF container parsing and first-page decoding.
//!
//! OCT and fundus exports are usually TIFF files, often with several pages
//! (one per B-scan or per channel). The preview only ever shows page 0.
//!
//! # Architecture
//!
//! The IFD chain is walked by hand so the directory count and the declared
//! size of page 0 are known before any pixel data is touched. Pixel decoding
//! itself is delegated to the `image` crate's TIFF codec, which handles
//! strips, tiles, compression and sample formats, and always yields the
//! first image in the file.

use std::collections::HashSet;
use std::io::{Cursor, Read, Seek, SeekFrom};

use image::codecs::tiff::TiffDecoder;
use image::{DynamicImage, ImageError};

use super::{DecodeError, DecodedImage, ImageDirectory};

// TIFF constants
const TIFF_MAGIC_LE: [u8; 4] = [0x49, 0x49, 0x2A, 0x00]; // II + 42
const TIFF_MAGIC_BE: [u8; 4] = [0x4D, 0x4D, 0x00, 0x2A]; // MM + 42

// TIFF tag IDs
const TAG_IMAGE_WIDTH: u16 = 0x0100;
const TAG_IMAGE_LENGTH: u16 = 0x0101;

// TIFF field types
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;

const MAX_IFD_ENTRIES: u16 = 1000;
const MAX_DIRECTORIES: usize = 4096;

/// Check if bytes start with a TIFF byte-order mark and magic number.
///
/// This is never used to decide whether a file is a TIFF (the file name
/// decides that); it only validates the container once that decision is made.
pub fn is_tiff_header(bytes: &[u8]) -> bool {
    if bytes.len() < 4 {
        return false;
    }
    bytes[..4] == TIFF_MAGIC_LE || bytes[..4] == TIFF_MAGIC_BE
}

/// Walk the IFD chain and return every image directory in file order.
///
/// # Errors
///
/// - `DecodeError::NoImageDirectories` - empty input, or IFD0 offset is 0
/// - `DecodeError::InvalidFormat` - not a TIFF byte-order mark / magic number
/// - `DecodeError::CorruptedFile` - truncated header or directory, offsets
///   past the end of the file, or a directory chain that loops
pub fn read_directories(bytes: &[u8]) -> Result<Vec<ImageDirectory>, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::NoImageDirectories);
    }

    let mut cursor = Cursor::new(bytes);

    let mut header = [0u8; 4];
    cursor
        .read_exact(&mut header)
        .map_err(|e| DecodeError::CorruptedFile(format!("Failed to read header: {}", e)))?;

    let little_endian = if header == TIFF_MAGIC_LE {
        true
    } else if header == TIFF_MAGIC_BE {
        false
    } else {
        return Err(DecodeError::InvalidFormat);
    };

    let mut next_offset = read_u32(&mut cursor, little_endian)?;
    let mut visited = HashSet::new();
    let mut directories = Vec::new();

    while next_offset != 0 {
        if directories.len() >= MAX_DIRECTORIES {
            log::warn!(
                "TIFF has more than {} pages, ignoring the rest",
                MAX_DIRECTORIES
            );
            break;
        }
        if !visited.insert(next_offset) {
            return Err(DecodeError::CorruptedFile(format!(
                "IFD chain loops back to offset {}",
                next_offset
            )));
        }
        if next_offset as usize >= bytes.len() {
            return Err(DecodeError::CorruptedFile(format!(
                "IFD offset {} is beyond end of file ({} bytes)",
                next_offset,
                bytes.len()
            )));
        }

        cursor
            .seek(SeekFrom::Start(next_offset as u64))
            .map_err(|e| DecodeError::CorruptedFile(format!("Failed to seek to IFD: {}", e)))?;

        let (entries, following) = parse_ifd(&mut cursor, little_endian)?;
        directories.push(directory_from_entries(next_offset, &entries, little_endian));
        next_offset = following;
    }

    if directories.is_empty() {
        return Err(DecodeError::NoImageDirectories);
    }

    Ok(directories)
}

/// Decode page 0 of a TIFF file to RGBA pixel data.
///
/// Later pages are counted but never decoded.
///
/// # Errors
///
/// Everything [`read_directories`] and [`decode_first_directory`] return.
pub fn decode_first_page(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let directories = read_directories(bytes)?;
    decode_first_directory(bytes, &directories[0])
}

/// Decode page 0 given its already-parsed directory.
///
/// # Errors
///
/// - `DecodeError::CorruptedFile` - pixel data is truncated or malformed
/// - `DecodeError::Unsupported` - the codec rejects the page's pixel layout
/// - `DecodeError::DimensionMismatch` - decoded size differs from the
///   directory's declared width/height
pub fn decode_first_directory(
    bytes: &[u8],
    first: &ImageDirectory,
) -> Result<DecodedImage, DecodeError> {
    let decoder = TiffDecoder::new(Cursor::new(bytes)).map_err(map_image_error)?;
    let img = DynamicImage::from_decoder(decoder).map_err(map_image_error)?;

    // Gray, RGB, 16-bit and float samples all normalise to 8-bit RGBA here
    let rgba = img.into_rgba8();

    let (decoded_width, decoded_height) = rgba.dimensions();
    if (decoded_width, decoded_height) != first.dimensions() {
        return Err(DecodeError::DimensionMismatch {
            declared_width: first.width,
            declared_height: first.height,
            decoded_width,
            decoded_height,
        });
    }

    log::debug!(
        "Decoded TIFF page 0: {}x{} ({} bytes RGBA)",
        decoded_width,
        decoded_height,
        rgba.len()
    );

    Ok(DecodedImage::from_rgba_image(rgba))
}

fn map_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::Unsupported(e) => DecodeError::Unsupported(e.to_string()),
        other => DecodeError::CorruptedFile(other.to_string()),
    }
}

// IFD entry structure
struct IfdEntry {
    tag: u16,
    typ: u16,
    count: u32,
    value: [u8; 4],
}

fn read_u16<R: Read>(reader: &mut R, little_endian: bool) -> Result<u16, DecodeError> {
    let mut buf = [0u8; 2];
    reader
        .read_exact(&mut buf)
        .map_err(|e| DecodeError::CorruptedFile(format!("Failed to read u16: {}", e)))?;
    Ok(if little_endian {
        u16::from_le_bytes(buf)
    } else {
        u16::from_be_bytes(buf)
    })
}

fn read_u32<R: Read>(reader: &mut R, little_endian: bool) -> Result<u32, DecodeError> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .map_err(|e| DecodeError::CorruptedFile(format!("Failed to read u32: {}", e)))?;
    Ok(if little_endian {
        u32::from_le_bytes(buf)
    } else {
        u32::from_be_bytes(buf)
    })
}

fn parse_ifd<R: Read>(
    reader: &mut R,
    little_endian: bool,
) -> Result<(Vec<IfdEntry>, u32), DecodeError> {
    let entry_count = read_u16(reader, little_endian)?;

    if entry_count > MAX_IFD_ENTRIES {
        return Err(DecodeError::CorruptedFile(
            "Too many IFD entries".to_string(),
        ));
    }

    let mut entries = Vec::with_capacity(entry_count as usize);

    for _ in 0..entry_count {
        let tag = read_u16(reader, little_endian)?;
        let typ = read_u16(reader, little_endian)?;
        let count = read_u32(reader, little_endian)?;
        let mut value = [0u8; 4];
        reader
            .read_exact(&mut value)
            .map_err(|e| DecodeError::CorruptedFile(format!("Failed to read IFD entry: {}", e)))?;

        entries.push(IfdEntry {
            tag,
            typ,
            count,
            value,
        });
    }

    // A missing next-IFD pointer ends the chain
    let next_ifd = read_u32(reader, little_endian).unwrap_or(0);

    Ok((entries, next_ifd))
}

/// Read an inline SHORT or LONG value. Both sit left-justified in the
/// 4-byte value field regardless of byte order.
fn inline_value(entry: &IfdEntry, little_endian: bool) -> Option<u32> {
    if entry.count != 1 {
        return None;
    }
    let v = entry.value;
    match entry.typ {
        TYPE_SHORT => Some(if little_endian {
            u16::from_le_bytes([v[0], v[1]]) as u32
        } else {
            u16::from_be_bytes([v[0], v[1]]) as u32
        }),
        TYPE_LONG => Some(if little_endian {
            u32::from_le_bytes(v)
        } else {
            u32::from_be_bytes(v)
        }),
        _ => None,
    }
}

fn directory_from_entries(offset: u32, entries: &[IfdEntry], little_endian: bool) -> ImageDirectory {
    let mut width = 0;
    let mut height = 0;

    for entry in entries {
        match entry.tag {
            TAG_IMAGE_WIDTH => width = inline_value(entry, little_endian).unwrap_or(0),
            TAG_IMAGE_LENGTH => height = inline_value(entry, little_endian).unwrap_or(0),
            _ => {}
        }
    }

    ImageDirectory {
        offset,
        entry_count: entries.len() as u16,
        width,
        height,
    }
}
