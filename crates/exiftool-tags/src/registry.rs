//! [`exiftool_core::tree::TagRegistry`] implementation against this crate's
//! own `phf` tag tables ([`crate::exif`], [`crate::generated`]).
//!
//! This is the concrete half of the tag-dictionary seam the tree engine
//! declares abstractly: `exiftool-core::tree` carries the trait and the
//! structural group topology (which pointer tag opens which child group),
//! while this module supplies the data (which tag is which node kind, and
//! what it's called).

use exiftool_core::tree::{GroupId, NodeKindHint, TagRegistry};

use crate::exif::{EXIF_TAGS, GPS_TAGS, IFD0_TAGS};
use crate::generated::canon;

/// Standard group numbering shared with `exiftool_core::tree::path`: IFD0 is
/// the root, ExifIFD/GPSIFD hang off it, InteropIFD hangs off ExifIFD, and a
/// single generic MakerNotes group hangs off ExifIFD via `0x927C`. Vendor
/// maker notes are not further split into per-vendor groups here, since
/// which vendor owns `Exif.Photo.MakerNote` is resolved only after the tag
/// registry has already decided "this is an MnEntry" — see
/// `exiftool_core::tree::reader::Reader::expand_makernote`.
pub const GROUP_IFD0: GroupId = 0;
pub const GROUP_IFD1: GroupId = 1;
pub const GROUP_EXIF_IFD: GroupId = 2;
pub const GROUP_GPS_IFD: GroupId = 3;
pub const GROUP_INTEROP_IFD: GroupId = 4;
pub const GROUP_MAKER_NOTES: GroupId = 5;

const TAG_EXIF_OFFSET: u16 = 0x8769;
const TAG_GPS_INFO: u16 = 0x8825;
const TAG_INTEROP_OFFSET: u16 = 0xA005;
const TAG_MAKER_NOTE: u16 = 0x927C;
const TAG_STRIP_OFFSETS: u16 = 0x0111;
const TAG_STRIP_BYTE_COUNTS: u16 = 0x0117;
const TAG_THUMBNAIL_OFFSET: u16 = 0x0201;
const TAG_THUMBNAIL_LENGTH: u16 = 0x0202;

/// Canon's AFInfo2 maker-note tag (`0x26`, decimal 38 in ExifTool's Canon
/// main table); decoded as a [`NodeKindHint::BinaryArray`] per
/// `exiftool_core::tree::binary::CANON_AF_INFO2`.
const TAG_CANON_AF_INFO2: u16 = 0x0026;
/// Sony's Tag9405 shot-info block, enciphered the same way as other Sony
/// maker-note binary arrays.
const TAG_SONY_TAG9405: u16 = 0x9405;

/// Synthetic sub-tag ids the Canon AFInfo2 decoder
/// (`exiftool_core::tree::decoder::Decoder::decode_canon_af_info2`) assigns
/// to each field of the record table it walks, paired with the field names
/// from [`canon::CANON_AFINFO2`] (keyed there by record position, not by
/// these synthetic ids).
const CANON_AF_INFO2_FIELDS: &[(u16, &str)] = &[
    (0x2602, "AFAreaMode"),
    (0x2603, "AFNumPoints"),
    (0x2604, "AFValidPoints"),
    (0x2605, "AFCanonImageWidth"),
    (0x2606, "AFCanonImageHeight"),
    (0x2607, "AFImageWidth"),
    (0x2608, "AFImageHeight"),
    (0x2609, "AFAreaWidths"),
    (0x260A, "AFAreaHeights"),
    (0x260B, "AFXPositions"),
    (0x260C, "AFYPositions"),
    (0x260D, "AFPointsInFocus"),
];

/// A [`TagRegistry`] backed entirely by this crate's static `phf` tables.
/// Zero-sized: every lookup is a const table probe, so one instance can be
/// shared (`&'static`) across an entire process.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticTagRegistry;

impl StaticTagRegistry {
    pub const fn new() -> Self {
        Self
    }
}

impl TagRegistry for StaticTagRegistry {
    fn node_kind(&self, tag: u16, group: GroupId) -> Option<NodeKindHint> {
        match group {
            GROUP_IFD0 | GROUP_IFD1 => match tag {
                TAG_EXIF_OFFSET => Some(NodeKindHint::SubIfd { new_group_base: GROUP_EXIF_IFD }),
                TAG_GPS_INFO => Some(NodeKindHint::SubIfd { new_group_base: GROUP_GPS_IFD }),
                TAG_STRIP_OFFSETS => Some(NodeKindHint::DataEntry {
                    size_tag: TAG_STRIP_BYTE_COUNTS,
                    size_group: group,
                }),
                TAG_STRIP_BYTE_COUNTS => {
                    Some(NodeKindHint::SizeEntry { data_tag: TAG_STRIP_OFFSETS, data_group: group })
                }
                TAG_THUMBNAIL_OFFSET => Some(NodeKindHint::ImageEntry {
                    size_tag: TAG_THUMBNAIL_LENGTH,
                    size_group: group,
                }),
                TAG_THUMBNAIL_LENGTH => {
                    Some(NodeKindHint::SizeEntry { data_tag: TAG_THUMBNAIL_OFFSET, data_group: group })
                }
                _ if IFD0_TAGS.contains_key(&tag) => Some(NodeKindHint::Entry),
                _ => None,
            },
            GROUP_EXIF_IFD => match tag {
                TAG_INTEROP_OFFSET => {
                    Some(NodeKindHint::SubIfd { new_group_base: GROUP_INTEROP_IFD })
                }
                TAG_MAKER_NOTE => Some(NodeKindHint::MnEntry),
                _ if EXIF_TAGS.contains_key(&tag) => Some(NodeKindHint::Entry),
                _ => None,
            },
            GROUP_GPS_IFD => GPS_TAGS.contains_key(&tag).then_some(NodeKindHint::Entry),
            GROUP_INTEROP_IFD => Some(NodeKindHint::Entry),
            GROUP_MAKER_NOTES => match tag {
                TAG_CANON_AF_INFO2 => Some(NodeKindHint::BinaryArray { config_key: "CanonAFInfo2" }),
                TAG_SONY_TAG9405 => Some(NodeKindHint::BinaryArray { config_key: "SonyTag9405" }),
                _ => Some(NodeKindHint::Entry),
            },
            _ => Some(NodeKindHint::Entry),
        }
    }

    fn tag_name(&self, tag: u16, group: GroupId) -> Option<&'static str> {
        match group {
            GROUP_IFD0 | GROUP_IFD1 => IFD0_TAGS.get(&tag).map(|d| d.name),
            GROUP_EXIF_IFD => EXIF_TAGS.get(&tag).map(|d| d.name),
            GROUP_GPS_IFD | GROUP_INTEROP_IFD => GPS_TAGS.get(&tag).map(|d| d.name),
            GROUP_MAKER_NOTES => canon::CANON_MAIN.get(&tag).map(|d| d.name),
            _ => None,
        }
    }

    fn group_name(&self, group: GroupId) -> &'static str {
        match group {
            GROUP_IFD0 => "Image",
            GROUP_IFD1 => "Image1",
            GROUP_EXIF_IFD => "Photo",
            GROUP_GPS_IFD => "GPSInfo",
            GROUP_INTEROP_IFD => "Iop",
            GROUP_MAKER_NOTES => "MakerNote",
            _ => "Unknown",
        }
    }

    fn tag_list(&self, family: &str) -> &'static [(u16, &'static str)] {
        match family {
            "CanonAFInfo2" => CANON_AF_INFO2_FIELDS,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_make_as_plain_entry() {
        let registry = StaticTagRegistry::new();
        assert_eq!(registry.node_kind(0x010F, GROUP_IFD0), Some(NodeKindHint::Entry));
        assert_eq!(registry.tag_name(0x010F, GROUP_IFD0), Some("Make"));
    }

    #[test]
    fn resolves_exif_offset_as_sub_ifd() {
        let registry = StaticTagRegistry::new();
        assert_eq!(
            registry.node_kind(0x8769, GROUP_IFD0),
            Some(NodeKindHint::SubIfd { new_group_base: GROUP_EXIF_IFD })
        );
    }

    #[test]
    fn resolves_strip_offsets_data_entry_pairing() {
        let registry = StaticTagRegistry::new();
        assert_eq!(
            registry.node_kind(TAG_STRIP_OFFSETS, GROUP_IFD0),
            Some(NodeKindHint::DataEntry { size_tag: TAG_STRIP_BYTE_COUNTS, size_group: GROUP_IFD0 })
        );
        assert_eq!(
            registry.node_kind(TAG_STRIP_BYTE_COUNTS, GROUP_IFD0),
            Some(NodeKindHint::SizeEntry { data_tag: TAG_STRIP_OFFSETS, data_group: GROUP_IFD0 })
        );
    }

    #[test]
    fn unknown_ifd0_tag_is_none() {
        let registry = StaticTagRegistry::new();
        assert_eq!(registry.node_kind(0xFFFF, GROUP_IFD0), None);
    }

    #[test]
    fn canon_af_info2_tag_list_matches_decoder_synthetic_ids() {
        let registry = StaticTagRegistry::new();
        let list = registry.tag_list("CanonAFInfo2");
        assert_eq!(list.iter().find(|(t, _)| *t == 0x2602).map(|(_, n)| *n), Some("AFAreaMode"));
        assert_eq!(list.len(), 12);
    }
}
