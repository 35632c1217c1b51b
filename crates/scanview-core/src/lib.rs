//! ScanView Core - preview decoding and source conversion
//!
//! This crate provides the helpers behind the ScanView scan viewer:
//! turning OCT/fundus files into something an `<img>` can show, and
//! converting typed UI sources into plain JavaScript.
//!
//! # Module Structure
//!
//! - `decode` - TIFF directory walking and first-page decoding
//! - `surface` - RGBA pixel surfaces the decoded page is drawn into
//! - `encode` - PNG encoding and data URL export
//! - `preview` - file classification, preview resources, object references
//! - `strip` - ordered regex rewrites removing type-only syntax

pub mod decode;
pub mod encode;
pub mod preview;
pub mod strip;
pub mod surface;

#[cfg(test)]
mod test_support;

pub use decode::{DecodeError, DecodedImage, ImageDirectory};
pub use preview::{
    classify, get_preview_resource, DiskFile, MemoryFile, ObjectUrlRegistry, PreviewError,
    PreviewFile, PreviewKind, PreviewOptions, PreviewResource, ReferenceTable,
};
pub use strip::{strip_type_annotations, strip_with_report, StripReport};
pub use surface::{Surface, SurfaceError};
