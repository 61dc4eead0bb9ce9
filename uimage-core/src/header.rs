use crate::error::{read_full, ImageError, Result};
use byteorder::{ReadBytesExt, BE};
use std::io::{self, Cursor};

/// Image header magic number.
pub const IH_MAGIC: u32 = 0x2705_1956;

/// Length of the image name buffer.
pub const IH_NMLEN: usize = 32;

/// Represents the 64-byte header of a legacy bootloader image (uImage).
///
/// All multi-byte fields are stored big-endian on disk and are converted to
/// host order while decoding. The header is followed directly by the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    /// Header magic number, always [`IH_MAGIC`] for a decoded header.
    pub ih_magic: u32,

    /// CRC of the header with this field zeroed. Informational only.
    pub ih_hcrc: u32,

    /// Creation timestamp in seconds since the Unix epoch (UTC).
    pub ih_time: u32,

    /// Payload size in bytes.
    pub ih_size: u32,

    /// Address the payload is loaded to.
    pub ih_load: u32,

    /// Execution entry point.
    pub ih_ep: u32,

    /// CRC of the payload. Informational only.
    pub ih_dcrc: u32,

    /// Operating system code, see [`crate::render::os_name`].
    pub ih_os: u8,

    /// CPU architecture code, see [`crate::render::arch_name`].
    pub ih_arch: u8,

    /// Image type code, see [`crate::render::type_name`].
    ///
    /// Common values:
    /// - `2`: OS kernel image
    /// - `3`: RAMDisk image
    /// - `4`: Multi-file image
    pub ih_type: u8,

    /// Compression code, `0` meaning none.
    pub ih_comp: u8,

    /// NUL-padded image name. The last byte is always zero after decoding.
    pub ih_name: [u8; IH_NMLEN],
}

impl ImageHeader {
    pub const SIZE: usize = 64;

    /// Reads and validates a header from the current position of `rdr`.
    ///
    /// On success the reader is left positioned just past the header.
    pub fn from_reader<R: io::Read + ?Sized>(rdr: &mut R) -> Result<ImageHeader> {
        let mut raw = [0u8; Self::SIZE];
        read_full(rdr, &mut raw)?;
        Self::from_bytes(&raw)
    }

    pub fn from_bytes(raw: &[u8; Self::SIZE]) -> Result<ImageHeader> {
        let mut cur = Cursor::new(&raw[..]);

        let ih_magic = cur.read_u32::<BE>()?;
        if ih_magic != IH_MAGIC {
            return Err(ImageError::InvalidMagic { found: ih_magic });
        }

        let mut hdr = ImageHeader {
            ih_magic,
            ih_hcrc: cur.read_u32::<BE>()?,
            ih_time: cur.read_u32::<BE>()?,
            ih_size: cur.read_u32::<BE>()?,
            ih_load: cur.read_u32::<BE>()?,
            ih_ep: cur.read_u32::<BE>()?,
            ih_dcrc: cur.read_u32::<BE>()?,
            ih_os: cur.read_u8()?,
            ih_arch: cur.read_u8()?,
            ih_type: cur.read_u8()?,
            ih_comp: cur.read_u8()?,
            ih_name: [0u8; IH_NMLEN],
        };
        io::Read::read_exact(&mut cur, &mut hdr.ih_name)?;
        // the name is not guaranteed to be terminated on disk
        hdr.ih_name[IH_NMLEN - 1] = 0;

        log::debug!(
            "decoded header: size={:#x} load={:#x} ep={:#x} os={} arch={} type={} comp={}",
            hdr.ih_size,
            hdr.ih_load,
            hdr.ih_ep,
            hdr.ih_os,
            hdr.ih_arch,
            hdr.ih_type,
            hdr.ih_comp
        );
        Ok(hdr)
    }

    /// Image name up to the first NUL, at most 31 bytes.
    pub fn name(&self) -> String {
        let end = self
            .ih_name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(IH_NMLEN - 1);
        String::from_utf8_lossy(&self.ih_name[..end]).into_owned()
    }

    pub fn header_crc(&self) -> u32 {
        self.ih_hcrc
    }

    pub fn creation_time(&self) -> u32 {
        self.ih_time
    }

    pub fn data_size(&self) -> u32 {
        self.ih_size
    }

    pub fn load_address(&self) -> u32 {
        self.ih_load
    }

    pub fn entry_point(&self) -> u32 {
        self.ih_ep
    }

    pub fn data_crc(&self) -> u32 {
        self.ih_dcrc
    }

    pub fn os(&self) -> u8 {
        self.ih_os
    }

    pub fn arch(&self) -> u8 {
        self.ih_arch
    }

    pub fn image_type(&self) -> u8 {
        self.ih_type
    }

    pub fn compression(&self) -> u8 {
        self.ih_comp
    }

    pub fn is_uncompressed(&self) -> bool {
        self.ih_comp == 0
    }
}
