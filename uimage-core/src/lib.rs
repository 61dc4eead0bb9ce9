//! Decoding and inspection of legacy bootloader images (uImage): a 64-byte
//! big-endian header followed by the payload.

pub mod error;
pub mod header;
pub mod image;
pub mod payload;
pub mod render;

pub use error::{ImageError, Result};
pub use header::{ImageHeader, IH_MAGIC, IH_NMLEN};
pub use image::*;
pub use payload::PayloadKind;
