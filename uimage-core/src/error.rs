use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    /// Underlying read, write, seek or open failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stream ended before a fixed-size read completed.
    #[error("input truncated: needed {needed} bytes, got {got}")]
    TruncatedInput { needed: usize, got: usize },

    #[error("not a uImage file (magic {found:#010x})")]
    InvalidMagic { found: u32 },
}

pub type Result<T> = std::result::Result<T, ImageError>;

/// Fills `buf` completely, reporting a short read as [`ImageError::TruncatedInput`]
/// rather than an I/O failure.
pub(crate) fn read_full<R: io::Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(ImageError::TruncatedInput {
                    needed: buf.len(),
                    got: filled,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
