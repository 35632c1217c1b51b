//! Display-ready previews for scan files.
//!
//! The viewer needs something it can put in an `<img src>` for every scan a
//! user opens. Browsers render PNG/JPEG natively but not TIFF, so:
//!
//! - **TIFF** (`.tif` / `.tiff`, by name only): decode page 0, draw it into a
//!   surface and return a `data:image/png;base64,...` URL.
//! - **Anything else**: register the original bytes in a [`ReferenceTable`]
//!   and return the revocable reference. No decoding happens.
//!
//! # Example
//!
//! ```ignore
//! use scanview_core::preview::{get_preview_resource, MemoryFile, ObjectUrlRegistry, PreviewOptions};
//!
//! let registry = ObjectUrlRegistry::new();
//! let file = MemoryFile::new("oct_0001.tif", &bytes);
//! let resource = get_preview_resource(&file, &registry, &PreviewOptions::default())?;
//! if resource.is_revocable() {
//!     // release once the image is no longer on screen
//!     registry.release(resource.as_str());
//! }
//! ```

mod registry;

use std::borrow::Cow;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::decode::{self, DecodeError};
use crate::encode::png_data_url;
use crate::surface::{Surface, SurfaceError};

pub use registry::{ObjectUrlRegistry, ReferenceTable, RegisteredObject, OBJECT_URL_PREFIX};

/// MIME type used when the extension says nothing useful.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// A named, byte-bearing file handle.
pub trait PreviewFile {
    /// File name, used only for classification and MIME guessing.
    fn name(&self) -> &str;

    /// Read the complete byte content.
    fn read_bytes(&self) -> io::Result<Cow<'_, [u8]>>;
}

/// A file whose bytes are already in memory.
#[derive(Debug, Clone, Copy)]
pub struct MemoryFile<'a> {
    name: &'a str,
    bytes: &'a [u8],
}

impl<'a> MemoryFile<'a> {
    pub fn new(name: &'a str, bytes: &'a [u8]) -> Self {
        Self { name, bytes }
    }
}

impl PreviewFile for MemoryFile<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn read_bytes(&self) -> io::Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(self.bytes))
    }
}

/// A file on disk, read when the preview is requested.
#[derive(Debug, Clone)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
}

impl DiskFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreviewFile for DiskFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_bytes(&self) -> io::Result<Cow<'_, [u8]>> {
        std::fs::read(&self.path).map(Cow::Owned)
    }
}

/// How a file will be previewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    /// Decode and re-encode as PNG.
    Tiff,
    /// Hand the original bytes to the display layer.
    Native,
}

/// Classify a file by its name suffix (case-insensitive).
pub fn classify(name: &str) -> PreviewKind {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".tif") || lower.ends_with(".tiff") {
        PreviewKind::Tiff
    } else {
        PreviewKind::Native
    }
}

/// Guess a MIME type from the file extension.
pub fn mime_for_name(name: &str) -> &'static str {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(image::ImageFormat::from_extension)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}

/// Preview generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Largest surface (in pixels) the decoder will acquire.
    pub max_pixels: u64,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            max_pixels: 100_000_000, // 100 MP
        }
    }
}

/// A displayable image resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewResource {
    /// `data:image/png;base64,...`; self-contained, nothing to release.
    DataUrl(String),
    /// Reference into a [`ReferenceTable`]; the caller must release it.
    ObjectUrl(String),
}

impl PreviewResource {
    pub fn as_str(&self) -> &str {
        match self {
            PreviewResource::DataUrl(s) | PreviewResource::ObjectUrl(s) => s,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            PreviewResource::DataUrl(s) | PreviewResource::ObjectUrl(s) => s,
        }
    }

    /// Whether the caller owns a table entry that must be released.
    pub fn is_revocable(&self) -> bool {
        matches!(self, PreviewResource::ObjectUrl(_))
    }
}

impl fmt::Display for PreviewResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from [`get_preview_resource`]. Both kinds are final for the call.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Produce a displayable resource for `file`.
///
/// # Errors
///
/// - `PreviewError::Decode` - the TIFF is empty, malformed or unreadable
/// - `PreviewError::Surface` - no surface could be acquired for the page, or
///   the reference table refused the bytes
pub fn get_preview_resource<F, T>(
    file: &F,
    table: &T,
    options: &PreviewOptions,
) -> Result<PreviewResource, PreviewError>
where
    F: PreviewFile + ?Sized,
    T: ReferenceTable + ?Sized,
{
    let name = file.name();
    let bytes = file
        .read_bytes()
        .map_err(|e| DecodeError::IoError(format!("{}: {}", name, e)))?;

    match classify(name) {
        PreviewKind::Tiff => {
            log::debug!("Rendering TIFF preview for {} ({} bytes)", name, bytes.len());
            render_tiff_preview(&bytes, options).map(PreviewResource::DataUrl)
        }
        PreviewKind::Native => {
            let reference = table.create(&bytes, mime_for_name(name))?;
            Ok(PreviewResource::ObjectUrl(reference))
        }
    }
}

/// Decode page 0 of a TIFF and return it as a PNG data URL.
pub fn render_tiff_preview(bytes: &[u8], options: &PreviewOptions) -> Result<String, PreviewError> {
    let directories = decode::read_directories(bytes)?;
    let first = directories[0];
    if directories.len() > 1 {
        log::warn!(
            "Multi-page TIFF: previewing page 0, ignoring {} more page(s)",
            directories.len() - 1
        );
    }

    // The pixel budget applies before any pixel data is decoded
    let mut surface = Surface::acquire(first.width, first.height, options.max_pixels)?;
    let image = decode::decode_first_directory(bytes, &first)?;
    surface.draw(&image)?;

    Ok(png_data_url(&surface)?)
}
