//! The Decoder traversal: walks a built [`Tree`] and emits [`ExifData`],
//! plus the IPTC and XMP payload bytes located along the way (IPTC/XMP
//! structural decoding proper is delegated to [`IptcCodec`]/[`XmpCodec`]
//! implementations the caller supplies, kept outside this crate).

use super::component::{GroupId, NodeId, NodeKind, Tree};
use super::exifdata::{ExifData, Exifdatum};
use super::finder::Finder;
use super::path::GROUP_IFD0;
use super::traits::{IptcCodec, Photoshop, TagRegistry, XmpCodec};
use super::visitor::{Gates, Visitor};
use crate::RawValue;

const TAG_XML_PACKET: u16 = 0x02BC;
const TAG_IPTC_NAA: u16 = 0x83BB;
const TAG_IMAGE_RESOURCES: u16 = 0x8649;
const TAG_MAKE: u16 = 0x010F;

pub struct Decoder<'r> {
    registry: &'r dyn TagRegistry,
    iptc_codec: Option<&'r dyn IptcCodec>,
    xmp_codec: Option<&'r dyn XmpCodec>,
    photoshop: Option<&'r dyn Photoshop>,
    gates: Gates,
    exif: ExifData,
    decoded_iptc: bool,
    iptc_result: Option<Vec<u8>>,
    xmp_result: Option<Vec<u8>>,
    make: Option<String>,
}

/// Everything the Decoder produced from one tree.
pub struct DecodedOutput {
    pub exif: ExifData,
    pub iptc: Option<Vec<u8>>,
    pub xmp: Option<Vec<u8>>,
}

impl<'r> Decoder<'r> {
    pub fn new(
        registry: &'r dyn TagRegistry,
        iptc_codec: Option<&'r dyn IptcCodec>,
        xmp_codec: Option<&'r dyn XmpCodec>,
        photoshop: Option<&'r dyn Photoshop>,
        existing_make: Option<String>,
    ) -> Self {
        Self {
            registry,
            iptc_codec,
            xmp_codec,
            photoshop,
            gates: Gates::default(),
            exif: ExifData::new(),
            decoded_iptc: false,
            iptc_result: None,
            xmp_result: None,
            make: existing_make,
        }
    }

    pub fn decode(mut self, tree: &mut Tree) -> DecodedOutput {
        if self.make.is_none() {
            self.make = Finder::find(tree, TAG_MAKE, GROUP_IFD0)
                .and_then(|id| tree.get(id).info.value.clone())
                .and_then(|v| v.as_str().map(|s| s.to_string()));
        }
        tree.walk(&mut self);
        DecodedOutput { exif: self.exif, iptc: self.iptc_result, xmp: self.xmp_result }
    }

    fn key_for(&self, tag: u16, group: GroupId) -> String {
        let group_name = self.registry.group_name(group);
        match self.registry.tag_name(tag, group) {
            Some(name) => format!("Exif.{group_name}.{name}"),
            None => format!("Exif.{group_name}.{tag:#06x}"),
        }
    }

    fn add_default(&mut self, tree: &Tree, id: NodeId) {
        let info = &tree.get(id).info;
        let Some(value) = info.value.clone() else { return };
        let key = self.key_for(info.tag, info.group);
        self.exif.add(Exifdatum { tag: info.tag, group: info.group, idx: info.idx, key, value });
    }

    fn decode_xmp(&mut self, tree: &Tree, id: NodeId) {
        self.add_default(tree, id);
        let info = &tree.get(id).info;
        let Some(raw) = info.value.as_ref().and_then(|v| v.as_bytes()) else { return };

        // Trim anything before the first '<' (some writers prepend junk
        // bytes before the XML declaration).
        let trimmed = match raw.iter().position(|&b| b == b'<') {
            Some(pos) => {
                if pos > 0 {
                    tracing::warn!(skipped = pos, "trimmed leading bytes before XMP packet");
                }
                &raw[pos..]
            }
            None => raw,
        };

        if let Some(codec) = self.xmp_codec {
            self.xmp_result = codec.decode(trimmed);
        }
    }

    fn decode_iptc(&mut self, tree: &Tree, id: NodeId) {
        self.add_default(tree, id);
        if self.decoded_iptc {
            return;
        }

        let info = &tree.get(id).info;
        if info.tag == TAG_IPTC_NAA {
            if let Some(bytes) = info.value.as_ref().and_then(|v| v.as_bytes()) {
                if let Some(codec) = self.iptc_codec {
                    if let Some(decoded) = codec.decode(bytes) {
                        self.iptc_result = Some(decoded);
                        self.decoded_iptc = true;
                    }
                }
            }
            return;
        }

        if info.tag == TAG_IMAGE_RESOURCES {
            let Some(bytes) = info.value.as_ref().and_then(|v| v.as_bytes()) else { return };
            let Some(photoshop) = self.photoshop else { return };
            let Some((hdr_len, data_len)) = photoshop.locate_iptc_irb(bytes) else { return };
            let Some(slice) = bytes.get(hdr_len..hdr_len + data_len) else { return };
            if let Some(codec) = self.iptc_codec {
                if let Some(decoded) = codec.decode(slice) {
                    self.iptc_result = Some(decoded);
                    self.decoded_iptc = true;
                }
            }
        }
    }

    fn decode_canon_af_info2(&mut self, tree: &Tree, id: NodeId) -> bool {
        let info = &tree.get(id).info;
        let Some(RawValue::UInt16(words)) = info.value.clone() else { return false };
        if words.len() < 3 || words[0] as usize != words.len() * 2 {
            return false;
        }

        let n_points = words[2] as usize;
        let n_masks = n_points.div_ceil(16);
        let group = info.group;
        let tag_list = self.registry.tag_list("CanonAFInfo2");

        // Fixed record table: (sub-tag, length-in-words, signed).
        let records: [(u16, usize, bool); 15] = [
            (0x2600, 1, true), // AFInfoSize
            (0x2601, 1, true), // AFAreaMode
            (0x2602, 1, true), // AFNumPoints
            (0x2603, 1, true), // AFValidPoints
            (0x2604, 1, true), // AFCanonImageWidth
            (0x2605, 1, true), // AFCanonImageHeight
            (0x2606, 1, true), // AFImageWidth
            (0x2607, 1, true), // AFImageHeight
            (0x2608, n_points, true),  // AFAreaWidths
            (0x2609, n_points, true),  // AFAreaHeights
            (0x260A, n_points, true),  // AFXPositions
            (0x260B, n_points, true),  // AFYPositions
            (0x260C, n_masks, false),  // AFPointsInFocus
            (0x260D, n_masks, false),  // AFPointsSelected
            (0x260E, n_masks, false),  // AFPointsUnusable
        ];

        let mut pos = 0usize;
        let mut synthesized = Vec::new();
        for (tag, len, signed) in records {
            if pos + len > words.len() {
                tracing::warn!("CanonAFInfo2 payload too short for declared record layout");
                return false;
            }
            let slice = &words[pos..pos + len];
            let value = if signed {
                RawValue::Int16(slice.iter().map(|&w| w as i16).collect())
            } else {
                RawValue::UInt16(slice.to_vec())
            };
            let name = tag_list.iter().find(|(t, _)| *t == tag).map(|(_, n)| *n).unwrap_or("Unknown");
            synthesized.push((tag, name, value));
            pos += len;
        }

        for (tag, name, value) in synthesized {
            let key = format!("Exif.{}.{}", self.registry.group_name(group), name);
            self.exif.add(Exifdatum { tag, group, idx: 1, key, value });
        }
        true
    }
}

impl<'r> Visitor for Decoder<'r> {
    fn gates(&self) -> Gates {
        self.gates
    }

    fn gates_mut(&mut self) -> &mut Gates {
        &mut self.gates
    }

    fn visit_entry(&mut self, tree: &mut Tree, id: NodeId) {
        let info = &tree.get(id).info;
        if info.tag == TAG_XML_PACKET && info.group == GROUP_IFD0 {
            self.decode_xmp(tree, id);
        } else if (info.tag == TAG_IPTC_NAA || info.tag == TAG_IMAGE_RESOURCES) && info.group == GROUP_IFD0 {
            self.decode_iptc(tree, id);
        } else {
            self.add_default(tree, id);
        }
    }

    fn visit_data_entry(&mut self, tree: &mut Tree, id: NodeId) {
        self.add_default(tree, id);
    }

    fn visit_image_entry(&mut self, tree: &mut Tree, id: NodeId) {
        self.add_default(tree, id);
    }

    fn visit_size_entry(&mut self, tree: &mut Tree, id: NodeId) {
        self.add_default(tree, id);
    }

    fn visit_mn_entry(&mut self, tree: &mut Tree, id: NodeId) {
        if let NodeKind::MnEntry { makernote: None } = &tree.get(id).kind {
            self.add_default(tree, id);
        }
    }

    fn visit_ifd_makernote(&mut self, tree: &mut Tree, id: NodeId) {
        let (mn_offset, byte_order, group) = match &tree.get(id).kind {
            NodeKind::IfdMakernote { mn_offset, byte_order, .. } => {
                (*mn_offset, *byte_order, tree.get(id).info.group)
            }
            _ => return,
        };
        self.exif.add(Exifdatum {
            tag: 0x0002,
            group,
            idx: 1,
            key: format!("Exif.{}.Offset", self.registry.group_name(group)),
            value: RawValue::UInt32(vec![mn_offset]),
        });
        self.exif.add(Exifdatum {
            tag: 0x0001,
            group,
            idx: 1,
            key: format!("Exif.{}.ByteOrder", self.registry.group_name(group)),
            value: RawValue::String(if byte_order == crate::ByteOrder::LittleEndian { "II" } else { "MM" }.to_string()),
        });
    }

    fn visit_binary_array(&mut self, tree: &mut Tree, id: NodeId) {
        let (config_key, decoded) = match &tree.get(id).kind {
            NodeKind::BinaryArray { config_key, decoded, .. } => (*config_key, *decoded),
            _ => return,
        };
        if !decoded {
            self.add_default(tree, id);
            return;
        }
        if config_key == "CanonAFInfo2" && self.decode_canon_af_info2(tree, id) {
            return;
        }
        self.add_default(tree, id);
    }

    fn visit_binary_element(&mut self, tree: &mut Tree, id: NodeId) {
        self.add_default(tree, id);
    }
}
