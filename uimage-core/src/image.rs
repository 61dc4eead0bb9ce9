use crate::error::Result;
use crate::header::ImageHeader;
use crate::payload::{sniff_kernel, PayloadKind};
use crate::render;
use std::fmt;
use std::io::{self, SeekFrom};

/// A decoded image: its header, the sniffed payload subtype and where the
/// payload begins in the source stream.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub header: ImageHeader,
    /// Present only for uncompressed images.
    pub payload: Option<PayloadKind>,
    pub payload_offset: u64,
}

impl ImageInfo {
    /// Decodes the header at the current position of `rdr` and, for
    /// uncompressed images, sniffs the payload subtype.
    ///
    /// The reader is left at [`ImageInfo::payload_offset`], just past the header.
    pub fn from_reader<R: io::Read + io::Seek + ?Sized>(rdr: &mut R) -> Result<Self> {
        let header = ImageHeader::from_reader(rdr)?;
        let payload_offset = rdr.stream_position()?;

        for (what, code, name, unknown) in [
            (
                "operating system",
                header.os(),
                render::os_name(header.os()),
                render::UNKNOWN_OS,
            ),
            (
                "architecture",
                header.arch(),
                render::arch_name(header.arch()),
                render::UNKNOWN_ARCH,
            ),
            (
                "image type",
                header.image_type(),
                render::type_name(header.image_type()),
                render::UNKNOWN_TYPE,
            ),
            (
                "compression",
                header.compression(),
                render::compression_name(header.compression()),
                render::UNKNOWN_COMP,
            ),
        ] {
            if name == unknown {
                log::warn!("unrecognised {what} code {code}");
            }
        }

        let payload = if header.is_uncompressed() {
            Some(sniff_kernel(rdr)?)
        } else {
            log::debug!("compressed payload, skipping kernel sniff");
            None
        };

        Ok(Self {
            header,
            payload,
            payload_offset,
        })
    }

    /// Extracts the payload of this image from `rdr` into `out`.
    ///
    /// A byte count that disagrees with the header's data size is logged,
    /// not treated as an error.
    pub fn extract<R, W>(&self, rdr: &mut R, out: &mut W) -> Result<u64>
    where
        R: io::Read + io::Seek + ?Sized,
        W: io::Write + ?Sized,
    {
        let copied = extract_payload(rdr, out, self.payload_offset)?;
        let expected = u64::from(self.header.data_size());
        if copied != expected {
            log::warn!("extracted {copied} bytes but header declares {expected}");
        }
        Ok(copied)
    }

    pub fn name(&self) -> String {
        self.header.name()
    }

    pub fn creation_date(&self) -> String {
        render::timestamp(self.header.creation_time())
    }

    pub fn os_name(&self) -> &'static str {
        render::os_name(self.header.os())
    }

    pub fn arch_name(&self) -> &'static str {
        render::arch_name(self.header.arch())
    }

    pub fn type_name(&self) -> &'static str {
        render::type_name(self.header.image_type())
    }

    pub fn compression_name(&self) -> &'static str {
        render::compression_name(self.header.compression())
    }
}

impl fmt::Display for ImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<18}{}", "Image name:", self.name())?;
        writeln!(f, "{:<18}{}", "Creation date:", self.creation_date())?;
        writeln!(f, "{:<18}{:x}", "Load address:", self.header.load_address())?;
        writeln!(f, "{:<18}{:x}", "Entry address:", self.header.entry_point())?;
        writeln!(f, "{:<18}{}", "Operating system:", self.os_name())?;
        writeln!(f, "{:<18}{}", "Architecture:", self.arch_name())?;
        writeln!(f, "{:<18}{}", "Image type:", self.type_name())?;
        writeln!(f, "{:<18}{}", "Compression type:", self.compression_name())?;
        if let Some(kind) = self.payload {
            writeln!(f, "{:<18}{}", "Payload type:", kind)?;
        }
        Ok(())
    }
}

/// Copies everything from `offset` to end-of-input into `out`, unmodified.
///
/// Returns the number of bytes written.
pub fn extract_payload<R, W>(rdr: &mut R, out: &mut W, offset: u64) -> Result<u64>
where
    R: io::Read + io::Seek + ?Sized,
    W: io::Write + ?Sized,
{
    rdr.seek(SeekFrom::Start(offset))?;
    let copied = io::copy(rdr, out)?;
    out.flush()?;
    log::info!("extracted {copied} payload bytes from offset {offset}");
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::IH_MAGIC;
    use std::io::Cursor;

    fn image(comp: u8, payload: &[u8]) -> Vec<u8> {
        let mut raw = Vec::with_capacity(64 + payload.len());
        raw.extend_from_slice(&IH_MAGIC.to_be_bytes());
        raw.extend_from_slice(&0u32.to_be_bytes());
        raw.extend_from_slice(&0u32.to_be_bytes());
        raw.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        raw.extend_from_slice(&0x8000_8000u32.to_be_bytes());
        raw.extend_from_slice(&0x8000_8000u32.to_be_bytes());
        raw.extend_from_slice(&0u32.to_be_bytes());
        raw.extend_from_slice(&[5, 2, 2, comp]);
        let mut name = [0u8; 32];
        name[..7].copy_from_slice(b"vmlinux");
        raw.extend_from_slice(&name);
        raw.extend_from_slice(payload);
        raw
    }

    #[test]
    fn report_lines() {
        let mut cur = Cursor::new(image(1, &[0u8; 8]));
        let info = ImageInfo::from_reader(&mut cur).unwrap();
        let report = info.to_string();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(
            lines,
            [
                "Image name:       vmlinux",
                "Creation date:    1970-01-01 00:00:00 UTC",
                "Load address:     80008000",
                "Entry address:    80008000",
                "Operating system: Linux",
                "Architecture:     ARM",
                "Image type:       OS Kernel Image",
                "Compression type: Gzip compression used",
            ]
        );
        assert_eq!(info.payload, None);
        assert_eq!(cur.position(), 64);
    }

    #[test]
    fn uncompressed_adds_payload_line() {
        let mut body = vec![0u8; 0x24];
        body.extend_from_slice(&[0x18, 0x28, 0x6F, 0x01]);
        let mut cur = Cursor::new(image(0, &body));
        let info = ImageInfo::from_reader(&mut cur).unwrap();
        assert_eq!(info.payload, Some(PayloadKind::StubKernel));
        assert!(info
            .to_string()
            .ends_with("Payload type:     stub-prefixed kernel image\n"));
        assert_eq!(info.payload_offset, 64);
        assert_eq!(cur.position(), 64);
    }

    #[test]
    fn uncompressed_with_short_payload_fails() {
        let err = ImageInfo::from_reader(&mut Cursor::new(image(0, &[1, 2, 3]))).unwrap_err();
        assert!(matches!(err, crate::ImageError::TruncatedInput { .. }));
    }

    #[test]
    fn header_decoded_mid_stream() {
        let mut data = vec![0xffu8; 16];
        data.extend_from_slice(&image(1, &[9, 8, 7]));
        let mut cur = Cursor::new(data);
        cur.set_position(16);
        let info = ImageInfo::from_reader(&mut cur).unwrap();
        assert_eq!(info.payload_offset, 80);

        let mut out = Vec::new();
        assert_eq!(info.extract(&mut cur, &mut out).unwrap(), 3);
        assert_eq!(out, [9, 8, 7]);
    }

    #[test]
    fn size_mismatch_still_extracts() {
        let mut raw = image(1, &[1, 2, 3, 4]);
        raw[12..16].copy_from_slice(&1000u32.to_be_bytes());
        let mut cur = Cursor::new(raw);
        let info = ImageInfo::from_reader(&mut cur).unwrap();
        let mut out = Vec::new();
        assert_eq!(info.extract(&mut cur, &mut out).unwrap(), 4);
        assert_eq!(out, [1, 2, 3, 4]);
    }

    #[test]
    fn extract_copies_tail() {
        let body: Vec<u8> = (0..200u8).collect();
        let mut cur = Cursor::new(image(1, &body));
        let info = ImageInfo::from_reader(&mut cur).unwrap();
        let mut out = Vec::new();
        let n = extract_payload(&mut cur, &mut out, info.payload_offset).unwrap();
        assert_eq!(n, 200);
        assert_eq!(out, body);
    }
}
