use crate::error::{read_full, ImageError, Result};
use std::fmt;
use std::io::{self, SeekFrom};

/// Bytes skipped past the image header before the stub signature.
pub const KERNEL_SUBHEADER_LEN: i64 = 0x24;

/// Self-decompression stub signature of an ARM zImage.
pub const ZIMAGE_MAGIC: [u8; 4] = [0x18, 0x28, 0x6F, 0x01];

/// Payload subtype of an uncompressed kernel image.
///
/// This is a best-effort heuristic, not a format guarantee. The signature is
/// ARM zImage specific and is only meaningful when the image type is a kernel
/// image. Any other payload, including kernels for other architectures,
/// reports as [`PayloadKind::RawKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    StubKernel,
    RawKernel,
}

impl PayloadKind {
    pub fn label(self) -> &'static str {
        match self {
            PayloadKind::StubKernel => "stub-prefixed kernel image",
            PayloadKind::RawKernel => "raw kernel image",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sniffs the payload subtype of a stream positioned just past the header.
///
/// The reader is returned to the position it had on entry, so a following
/// payload copy starts at the same place whether or not sniffing ran.
pub fn sniff_kernel<R: io::Read + io::Seek + ?Sized>(rdr: &mut R) -> Result<PayloadKind> {
    let start = rdr.stream_position()?;

    rdr.seek(SeekFrom::Current(KERNEL_SUBHEADER_LEN)).map_err(|e| {
        log::debug!("seek past kernel sub-header failed: {e}");
        ImageError::TruncatedInput {
            needed: KERNEL_SUBHEADER_LEN as usize + ZIMAGE_MAGIC.len(),
            got: 0,
        }
    })?;

    let mut sig = [0u8; 4];
    read_full(rdr, &mut sig)?;

    let kind = if sig == ZIMAGE_MAGIC {
        PayloadKind::StubKernel
    } else {
        PayloadKind::RawKernel
    };
    log::info!("payload signature {sig:02x?} -> {kind}");

    rdr.seek(SeekFrom::Start(start))?;
    Ok(kind)
}
