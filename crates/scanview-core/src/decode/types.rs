//! Core types for scan decoding.

use thiserror::Error;

/// Error types for TIFF decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The byte-order mark or magic number is not a TIFF header.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The container holds no image file directories.
    #[error("No image directories found in TIFF container")]
    NoImageDirectories,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The codec rejected the pixel layout of the first page.
    #[error("Unsupported TIFF layout: {0}")]
    Unsupported(String),

    /// Decoded pixel data does not match the directory's declared size.
    #[error(
        "Decoded size {decoded_width}x{decoded_height} does not match declared {declared_width}x{declared_height}"
    )]
    DimensionMismatch {
        declared_width: u32,
        declared_height: u32,
        decoded_width: u32,
        decoded_height: u32,
    },

    /// I/O error while reading the file handle.
    #[error("I/O error: {0}")]
    IoError(String),
}

/// One parsed TIFF image file directory (a page).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDirectory {
    /// Byte offset of the directory within the file.
    pub offset: u32,
    /// Number of entries the directory declares.
    pub entry_count: u16,
    /// Declared image width (tag 256), 0 when absent.
    pub width: u32,
    /// Declared image height (tag 257), 0 when absent.
    pub height: u32,
}

impl ImageDirectory {
    /// Declared dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// A decoded image with RGBA pixel data.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order, top row first (4 bytes per pixel).
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new DecodedImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * 4,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a DecodedImage from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
