//! Image encoding for ScanView previews.
//!
//! This module provides functionality for:
//! - Encoding surfaces to PNG
//! - Wrapping the PNG as a base64 data URL for display
//!
//! # Examples
//!
//! ```ignore
//! use scanview_core::encode::png_data_url;
//! use scanview_core::surface::Surface;
//!
//! let surface = Surface::acquire(100, 100, u64::MAX).unwrap();
//! let url = png_data_url(&surface).unwrap();
//! assert!(url.starts_with("data:image/png;base64,"));
//! ```

mod png;

pub use png::{encode_png, png_data_url, PNG_DATA_URL_PREFIX};
