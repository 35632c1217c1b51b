//! Scan decoding pipeline for ScanView.
//!
//! This module provides functionality for:
//! - Walking the image file directories of a TIFF container
//! - Decoding the first page of a TIFF to RGBA pixel data
//!
//! # Architecture
//!
//! The decoding pipeline is designed to be used from the browser via WASM
//! bindings. All operations are synchronous and single-threaded within WASM.
//!
//! # Examples
//!
//! ```ignore
//! use scanview_core::decode::{decode_first_page, read_directories};
//!
//! let bytes = std::fs::read("bscan.tif").unwrap();
//! let pages = read_directories(&bytes).unwrap();
//! let image = decode_first_page(&bytes).unwrap();
//! println!("{} pages, page 0 is {}x{}", pages.len(), image.width, image.height);
//! ```

mod tiff;
mod types;

pub use tiff::{decode_first_directory, decode_first_page, is_tiff_header, read_directories};
pub use types::{DecodeError, DecodedImage, ImageDirectory};
