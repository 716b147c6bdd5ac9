//! Vendor maker-note header detection.
//!
//! Each vendor's `Exif.Photo.MakerNote` blob is its own mini-IFD, but the
//! offset of that IFD and the byte order it uses are determined by a
//! vendor-specific header that precedes it (or, for several vendors, no
//! header at all). This table is grounded in the per-vendor header parsing
//! already duplicated ad hoc across individual maker-note modules; here it
//! is centralized as pure header-sniffing, decoupled from any one parser.

use crate::ByteOrder;

/// Result of successfully recognizing a maker-note header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MakernoteHeader {
    /// Offset of the inner IFD relative to the start of the maker-note blob.
    pub ifd_offset: u32,
    /// `None` means "inherit the enclosing image's byte order".
    pub byte_order: Option<ByteOrder>,
}

impl MakernoteHeader {
    const fn inherit(ifd_offset: u32) -> Self {
        Self { ifd_offset, byte_order: None }
    }

    const fn forced(ifd_offset: u32, byte_order: ByteOrder) -> Self {
        Self { ifd_offset, byte_order: Some(byte_order) }
    }
}

/// Recognize a maker-note header given the vendor's `Make` string and the
/// maker-note's own leading bytes. Returns `None` for an unrecognized
/// vendor or a header that doesn't match any known marker; the caller
/// clears the `known_makernote` gate and leaves the subtree opaque.
pub fn detect(make: &str, bytes: &[u8]) -> Option<MakernoteHeader> {
    let make = make.trim();
    let make_lower = make.to_ascii_lowercase();

    if make_lower.starts_with("canon") {
        return Some(MakernoteHeader::inherit(0));
    }
    if make_lower.starts_with("nikon") {
        return detect_nikon(bytes);
    }
    if make_lower.starts_with("sony") {
        if bytes.starts_with(b"SONY DSC \0\0\0") || bytes.starts_with(b"SONY CAM \0\0\0") {
            return Some(MakernoteHeader::inherit(12));
        }
        return Some(MakernoteHeader::inherit(0));
    }
    if make_lower.starts_with("olympus") || make_lower.starts_with("olymp") {
        return detect_olympus(bytes);
    }
    if make_lower.starts_with("panasonic") {
        if bytes.starts_with(b"Panasonic\0\0\0") {
            return Some(MakernoteHeader::forced(12, ByteOrder::LittleEndian));
        }
        return None;
    }
    if make_lower.starts_with("fujifilm") || make_lower.starts_with("fuji") {
        return detect_fujifilm(bytes);
    }
    if make_lower.starts_with("pentax") || make_lower.starts_with("asahi") {
        if bytes.starts_with(b"AOC\0") {
            return Some(MakernoteHeader::inherit(4));
        }
        if bytes.starts_with(b"PENTAX \0") {
            return Some(MakernoteHeader::inherit(8));
        }
        return None;
    }
    if make_lower.starts_with("casio") {
        if bytes.starts_with(b"QVC\0\0\0") {
            return Some(MakernoteHeader::inherit(6));
        }
        return Some(MakernoteHeader::inherit(0));
    }
    if make_lower.starts_with("leica") {
        return detect_leica(bytes);
    }

    None
}

fn detect_nikon(bytes: &[u8]) -> Option<MakernoteHeader> {
    if bytes.starts_with(b"Nikon\0\x02") && bytes.len() >= 10 {
        // Type 2: 10-byte header, then an embedded TIFF header at offset 10.
        let embedded = &bytes[10..];
        if embedded.len() >= 8 {
            let order = ByteOrder::from_marker([embedded[0], embedded[1]]).ok()?;
            let ifd0_offset = order.read_u32([embedded[4], embedded[5], embedded[6], embedded[7]]);
            return Some(MakernoteHeader::forced(10u32.wrapping_add(ifd0_offset), order));
        }
        return Some(MakernoteHeader::inherit(8));
    }
    if bytes.starts_with(b"Nikon\0\x01\x00") {
        return Some(MakernoteHeader::inherit(8));
    }
    // Type 1: no header at all, IFD starts immediately.
    Some(MakernoteHeader::inherit(0))
}

fn detect_olympus(bytes: &[u8]) -> Option<MakernoteHeader> {
    if bytes.starts_with(b"OLYMPUS\0") && bytes.len() >= 12 {
        let order = ByteOrder::from_marker([bytes[8], bytes[9]]).ok()?;
        return Some(MakernoteHeader::forced(12, order));
    }
    if bytes.starts_with(b"OLYMP\0") {
        return Some(MakernoteHeader::inherit(8));
    }
    None
}

fn detect_fujifilm(bytes: &[u8]) -> Option<MakernoteHeader> {
    if bytes.starts_with(b"FUJIFILM") && bytes.len() >= 12 {
        let offset = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        return Some(MakernoteHeader::forced(offset, ByteOrder::LittleEndian));
    }
    None
}

fn detect_leica(bytes: &[u8]) -> Option<MakernoteHeader> {
    if bytes.starts_with(b"LEICA CAMERA AG\0") {
        return Some(MakernoteHeader::inherit(16));
    }
    if bytes.starts_with(b"LEICA\0\0\0") {
        return Some(MakernoteHeader::inherit(8));
    }
    if bytes.starts_with(b"Panasonic\0\0\0") {
        return Some(MakernoteHeader::forced(12, ByteOrder::LittleEndian));
    }
    Some(MakernoteHeader::inherit(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canon_has_no_header() {
        assert_eq!(detect("Canon", &[]), Some(MakernoteHeader::inherit(0)));
    }

    #[test]
    fn sony_dsc_header() {
        let mut bytes = b"SONY DSC \0\0\0".to_vec();
        bytes.extend_from_slice(&[0u8; 16]);
        assert_eq!(detect("SONY", &bytes), Some(MakernoteHeader::inherit(12)));
    }

    #[test]
    fn panasonic_forces_little_endian() {
        let mut bytes = b"Panasonic\0\0\0".to_vec();
        bytes.extend_from_slice(&[0u8; 16]);
        assert_eq!(
            detect("Panasonic", &bytes),
            Some(MakernoteHeader::forced(12, ByteOrder::LittleEndian))
        );
    }

    #[test]
    fn unknown_vendor_is_none() {
        assert_eq!(detect("Acme Corp", &[1, 2, 3]), None);
    }
}
