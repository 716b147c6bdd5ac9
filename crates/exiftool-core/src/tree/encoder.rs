//! The Encoder traversal: writes an [`ExifData`] store back onto a built
//! [`Tree`], either patching values in place (non-intrusive mode, used when
//! no new tags were added and the existing layout can be kept) or marking
//! nodes dirty for a full re-serialization (intrusive mode, used when the
//! Encoder must insert tags the Reader never saw).

use super::binary;
use super::component::{GroupId, NodeId, NodeKind, Tree};
use super::exifdata::ExifData;
use super::finder::Finder;
use super::path::{compute_path, GroupLink, GROUP_EXIF_IFD};
use super::traits::{Header, IptcCodec, Photoshop, TagRegistry, XmpCodec};
use super::visitor::{Gates, Visitor};
use crate::{ByteOrder, RawValue};
use std::borrow::Cow;

const TAG_IPTC_NAA: u16 = 0x83BB;
const TAG_XML_PACKET: u16 = 0x02BC;
const TAG_MAKERNOTE_PTR: u16 = 0x927C;

/// Tag numbers the Decoder synthesizes onto a maker note's own group
/// (see `decoder::Decoder::visit_ifd_makernote`) to carry its byte order
/// and base offset out as ordinary `Exifdatum`s. The Encoder must consult
/// and consume these rather than graft them back as real tags.
const SYNTH_TAG_BYTE_ORDER: u16 = 0x0001;
const SYNTH_TAG_OFFSET: u16 = 0x0002;

/// Which strategy the Encoder uses for a given run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeMode {
    /// Patch existing value slots in place; nodes with no matching
    /// `Exifdatum` are left untouched, and data the encode didn't consume
    /// is reported back rather than silently dropped.
    NonIntrusive,
    /// Rebuild: every node is marked dirty and new nodes are grafted in for
    /// data the tree doesn't already have a slot for.
    Intrusive,
}

pub struct Encoder<'r> {
    registry: &'r dyn TagRegistry,
    header: &'r dyn Header,
    hierarchy: &'r [GroupLink],
    iptc_codec: Option<&'r dyn IptcCodec>,
    xmp_codec: Option<&'r dyn XmpCodec>,
    photoshop: Option<&'r dyn Photoshop>,
    /// Groups the Copier already walked ahead of this Encoder; used, along
    /// with `is_new_image`, to skip re-encoding tags the Copier preserved
    /// verbatim from the source tree.
    primary_groups: &'r [GroupId],
    /// `false` when rewriting an existing file (image tags come from the
    /// Copier, not this store); `true` when building a brand-new file from
    /// scratch, in which case image tags are encoded like any other tag.
    is_new_image: bool,
    /// The tree this file was originally read from, consulted only when an
    /// `ImageEntry` has no data area of its own under an intrusive rebuild
    /// (a freshly grafted entry inheriting strip layout from the source).
    source_tree: Option<&'r Tree<'r>>,
    mode: EncodeMode,
    data: ExifData,
    consumed: Vec<bool>,
    gates: Gates,
    /// Byte order for the entry currently being patched: the host's normally,
    /// swapped to the maker-note's own while inside an `IfdMakernote` subtree.
    current_byte_order: ByteOrder,
}

impl<'r> Encoder<'r> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: &'r dyn TagRegistry,
        header: &'r dyn Header,
        hierarchy: &'r [GroupLink],
        iptc_codec: Option<&'r dyn IptcCodec>,
        xmp_codec: Option<&'r dyn XmpCodec>,
        photoshop: Option<&'r dyn Photoshop>,
        primary_groups: &'r [GroupId],
        is_new_image: bool,
        source_tree: Option<&'r Tree<'r>>,
        mode: EncodeMode,
        data: ExifData,
    ) -> Self {
        let consumed = vec![false; data.len()];
        let current_byte_order = header.byte_order();
        Self {
            registry,
            header,
            hierarchy,
            iptc_codec,
            xmp_codec,
            photoshop,
            primary_groups,
            is_new_image,
            source_tree,
            mode,
            data,
            consumed,
            gates: Gates::default(),
            current_byte_order,
        }
    }

    /// Runs the encode, returning the `Exifdatum`s that found no matching
    /// node (only possible in non-intrusive mode; in intrusive mode these
    /// are all grafted in and the returned list is always empty).
    pub fn encode(mut self, tree: &mut Tree) -> Vec<super::exifdata::Exifdatum> {
        tree.walk(&mut self);

        if self.mode == EncodeMode::Intrusive {
            self.graft_unconsumed(tree);
            return Vec::new();
        }

        self.data
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.consumed[*i])
            .map(|(_, d)| d.clone())
            .collect()
    }

    fn mark_consumed(&mut self, index: usize) {
        self.consumed[index] = true;
    }

    fn is_image_tag(&self, tag: u16, group: GroupId) -> bool {
        !self.is_new_image && self.header.is_image_tag(tag, group, self.primary_groups)
    }

    /// Two-step duplicate-tag match: first by `(tag, group)`, then, if the
    /// node's own `idx` doesn't agree with that hit, by `(group, idx, key)`.
    fn find_match(&self, tag: u16, group: GroupId, idx: u32) -> Option<usize> {
        let first = self.data.find_by_tag_group(tag, group)?;
        if self.data.get_at(first).idx == idx {
            return Some(first);
        }
        let key = self.data.get_at(first).key.clone();
        Some(self.data.find_by_group_idx_key(group, idx, &key).unwrap_or(first))
    }

    /// Patches (or, in intrusive mode, stages) the value for one entry-like
    /// node, using the two-step duplicate-tag match. Non-intrusive mode
    /// patches the node's `raw` slot in place when the newly encoded value
    /// still fits its original byte span; otherwise it flips `dirty`. A node
    /// with no matching `Exifdatum` at all means the tag was deleted from
    /// the store, which only an intrusive rebuild can drop, so it too
    /// flips `dirty`. Image tags of an existing file are skipped entirely:
    /// the Copier already carried them over from the source tree verbatim.
    fn patch_entry(&mut self, tree: &mut Tree, id: NodeId) {
        let (tag, group, idx) = {
            let info = &tree.get(id).info;
            (info.tag, info.group, info.idx)
        };
        if self.is_image_tag(tag, group) {
            return;
        }

        let Some(index) = self.find_match(tag, group, idx) else {
            tree.get_mut(id).info.dirty = true;
            return;
        };

        let value = self.data.get_at(index).value.clone();
        self.apply_value(tree, id, value);
        self.mark_consumed(index);
    }

    /// The offset-entry counterpart of [`Self::patch_entry`], used for
    /// `DataEntry`/`ImageEntry`/`SubIfd`/`BinaryArray` nodes, whose value
    /// is a pointer/count pair rather than the payload itself.
    fn offset_entry(&mut self, tree: &mut Tree, id: NodeId) {
        let (tag, group, idx) = {
            let info = &tree.get(id).info;
            (info.tag, info.group, info.idx)
        };
        if self.is_image_tag(tag, group) {
            return;
        }

        let Some(index) = self.find_match(tag, group, idx) else {
            tree.get_mut(id).info.dirty = true;
            return;
        };

        let value = self.data.get_at(index).value.clone();
        self.apply_offset_value(tree, id, value);
        self.mark_consumed(index);
    }

    /// Installs `value` onto `id`, patching `raw` in place if it fits the
    /// node's existing capacity (non-intrusive), or marking it dirty if it
    /// grew past it (forcing the caller to switch to an intrusive rebuild).
    /// In intrusive mode every touched node is already dirty, so this always
    /// just updates the value and the encoded bytes are never consulted.
    fn apply_value(&mut self, tree: &mut Tree, id: NodeId, value: RawValue) {
        let tiff_type = value.format() as u16;
        if self.mode == EncodeMode::Intrusive {
            let node = tree.get_mut(id);
            node.info.tiff_type = Some(tiff_type);
            node.info.value = Some(value);
            node.info.dirty = true;
            return;
        }

        let encoded = encode_value(&value, self.current_byte_order);
        let node = tree.get_mut(id);
        let capacity = node.info.raw.len();
        node.info.tiff_type = Some(tiff_type);
        if encoded.len() <= capacity {
            let mut padded = encoded;
            padded.resize(capacity, 0);
            node.info.raw = Cow::Owned(padded);
            node.info.value = Some(value);
        } else {
            node.info.value = Some(value);
            node.info.dirty = true;
        }
    }

    /// Offset-entry variant of [`Self::apply_value`]: a value that still
    /// fits is recorded but `raw` (the pointer/offset slot) is left
    /// untouched, since the bytes it addresses live in a data area this
    /// traversal doesn't itself relocate. Past capacity, the node flips
    /// dirty the same way.
    fn apply_offset_value(&mut self, tree: &mut Tree, id: NodeId, value: RawValue) {
        let tiff_type = value.format() as u16;
        if self.mode == EncodeMode::Intrusive {
            let node = tree.get_mut(id);
            node.info.tiff_type = Some(tiff_type);
            node.info.value = Some(value);
            node.info.dirty = true;
            return;
        }

        let encoded_len = encode_value(&value, self.current_byte_order).len();
        let node = tree.get_mut(id);
        let capacity = node.info.raw.len();
        node.info.tiff_type = Some(tiff_type);
        node.info.value = Some(value);
        if encoded_len > capacity {
            node.info.dirty = true;
        }
    }

    fn encode_iptc(&mut self, tree: &mut Tree, id: NodeId) {
        self.patch_entry(tree, id);
        let Some(codec) = self.iptc_codec else { return };
        let info = &tree.get(id).info;
        let Some(bytes) = info.value.as_ref().and_then(RawValue::as_bytes) else { return };
        let encoded = codec.encode(bytes);
        drop(info);
        let node = tree.get_mut(id);
        node.info.value = Some(RawValue::Undefined(encoded));
        node.info.dirty = true;
    }

    fn encode_xmp(&mut self, tree: &mut Tree, id: NodeId) {
        self.patch_entry(tree, id);
        let Some(codec) = self.xmp_codec else { return };
        let info = &tree.get(id).info;
        let Some(bytes) = info.value.as_ref().and_then(RawValue::as_bytes) else { return };
        let encoded = codec.encode(bytes);
        drop(info);
        let node = tree.get_mut(id);
        node.info.value = Some(RawValue::Undefined(encoded));
        node.info.dirty = true;
    }

    fn encode_data_entry(&mut self, tree: &mut Tree, id: NodeId) {
        let (size_tag, size_group, old_total) = match &tree.get(id).kind {
            NodeKind::DataEntry { size_tag, size_group, strips } => {
                (*size_tag, *size_group, strips.iter().map(|&(_, len)| len as u64).sum::<u64>())
            }
            _ => return,
        };

        self.offset_entry(tree, id);

        if self.mode != EncodeMode::NonIntrusive || tree.get(id).info.dirty {
            return;
        }

        let Some(size_index) = self.data.find_by_tag_group(size_tag, size_group) else { return };
        let Some(new_total) = self
            .data
            .get_at(size_index)
            .value
            .as_u32_vec()
            .map(|counts| counts.iter().map(|&c| c as u64).sum::<u64>())
        else {
            return;
        };

        if new_total > old_total {
            // The data area grew past the strips the Reader originally laid
            // out for it; only an intrusive rebuild can relocate it.
            tree.get_mut(id).info.dirty = true;
        }
        // Otherwise the existing strip layout has enough room: whatever
        // writes the final image data copies the new bytes in and zero-fills
        // the tail, without this tree needing to change.
    }

    fn encode_image_entry(&mut self, tree: &mut Tree, id: NodeId) {
        let (tag, group, size_tag, size_group, old_total) = {
            let info = &tree.get(id).info;
            let (tag, group) = (info.tag, info.group);
            match &tree.get(id).kind {
                NodeKind::ImageEntry { size_tag, size_group, strips } => (
                    tag,
                    group,
                    *size_tag,
                    *size_group,
                    strips.iter().map(|&(_, len)| len as u64).sum::<u64>(),
                ),
                _ => return,
            }
        };

        self.offset_entry(tree, id);

        if old_total > 0 && self.mode == EncodeMode::NonIntrusive {
            // A non-intrusive rewrite has nowhere to put a changed data
            // area; force a rebuild.
            tree.get_mut(id).info.dirty = true;
        }

        if old_total > 0 && self.mode == EncodeMode::Intrusive {
            match self.data.find_by_tag_group(size_tag, size_group) {
                Some(size_index) => {
                    let counts = self.data.get_at(size_index).value.as_u32_vec().unwrap_or_default();
                    let sum: u64 = counts.iter().map(|&c| c as u64).sum();
                    if sum != old_total {
                        tracing::warn!(
                            tag = format!("{size_tag:#06x}"),
                            sum,
                            old_total,
                            "sum of strip sizes does not match image data size; this results in an invalid image"
                        );
                    }
                    let strips: Vec<(u32, u32)> = counts.into_iter().map(|c| (0, c)).collect();
                    if let NodeKind::ImageEntry { strips: s, .. } = &mut tree.get_mut(id).kind {
                        *s = strips;
                    }
                }
                None => {
                    tracing::warn!(tag = format!("{size_tag:#06x}"), "size tag not found; writing only one strip");
                    if let NodeKind::ImageEntry { strips: s, .. } = &mut tree.get_mut(id).kind {
                        *s = vec![(0, old_total as u32)];
                    }
                }
            }
        }

        if old_total == 0 && self.mode == EncodeMode::Intrusive {
            let found = self.source_tree.and_then(|source| find_by_tag_group(source, tag, group).map(|id| (source, id)));
            match found {
                Some((source, found)) => {
                    if let NodeKind::ImageEntry { strips, .. } = &source.get(found).kind {
                        let strips = strips.clone();
                        if let NodeKind::ImageEntry { strips: s, .. } = &mut tree.get_mut(id).kind {
                            *s = strips;
                        }
                    }
                }
                None => {
                    tracing::warn!(tag = format!("{tag:#06x}"), "no image data to encode");
                }
            }
        }
    }

    /// Intrusive mode only: for every remaining unconsumed `Exifdatum`,
    /// compute its path from the root and graft placeholder nodes in.
    /// Synthesized maker-note `ByteOrder`/`Offset` tags are never grafted
    /// as real entries: `ByteOrder` is remembered for the fallback pass
    /// below (covering a maker note the walk never visited, since a fresh
    /// intrusive rebuild doesn't revisit an `IfdMakernote` subtree the way
    /// the normal walk does), and `Offset` is simply consumed.
    fn graft_unconsumed(&mut self, tree: &mut Tree) {
        let pending: Vec<usize> = (0..self.data.len()).filter(|i| !self.consumed[*i]).collect();
        let mut byte_order_datum: Option<usize> = None;

        for index in pending {
            let datum = self.data.get_at(index).clone();

            // The Decoder synthesizes these onto the MnEntry's own group
            // (see `decoder::Decoder::visit_ifd_makernote`), which is
            // `GROUP_EXIF_IFD` for the standard 0x927c maker-note pointer —
            // not a tag either real Exif IFD entry uses.
            if datum.tag == SYNTH_TAG_BYTE_ORDER && datum.group == GROUP_EXIF_IFD {
                byte_order_datum = Some(index);
                self.mark_consumed(index);
                continue;
            }
            if datum.tag == SYNTH_TAG_OFFSET && datum.group == GROUP_EXIF_IFD {
                self.mark_consumed(index);
                continue;
            }
            if self.is_image_tag(datum.tag, datum.group) {
                self.mark_consumed(index);
                continue;
            }

            let path = compute_path(self.hierarchy, datum.tag, datum.group);
            self.graft_path(tree, &path, datum.tag, datum.group, datum.value);
            self.mark_consumed(index);
        }

        // Hack: there is no tree node corresponding to a makernote byte
        // order/offset pseudo-tag, so if one was found above, look up the
        // real MnEntry/IfdMakernote pair directly and apply it there.
        let Some(index) = byte_order_datum else { return };
        let Some(bo_str) = self.data.get_at(index).value.as_str().map(str::to_string) else { return };
        let Some(bo) = bo_str.as_bytes().try_into().ok().and_then(|m| ByteOrder::from_marker(m).ok()) else {
            return;
        };
        let Some(mn_entry) = Finder::find(tree, TAG_MAKERNOTE_PTR, GROUP_EXIF_IFD) else { return };
        let makernote = match &tree.get(mn_entry).kind {
            NodeKind::MnEntry { makernote } => *makernote,
            _ => None,
        };
        if let Some(mn_id) = makernote {
            if let NodeKind::IfdMakernote { byte_order, .. } = &mut tree.get_mut(mn_id).kind {
                *byte_order = bo;
            }
        }
    }

    fn graft_path(
        &self,
        tree: &mut Tree,
        path: &[super::traits::PathStep],
        leaf_tag: u16,
        leaf_group: GroupId,
        value: RawValue,
    ) {
        let mut parent_dir = tree.root;
        for (i, step) in path.iter().enumerate() {
            if i + 1 == path.len() {
                let mut info = super::component::NodeInfo::new(leaf_tag, leaf_group);
                info.tiff_type = Some(value.format() as u16);
                info.value = Some(value);
                info.dirty = true;
                let leaf = tree.push(super::component::Component { info, kind: NodeKind::Entry });
                push_child(tree, parent_dir, leaf);
                return;
            }

            let next_group = path[i + 1].group;
            parent_dir = match find_child_pointer_dir(tree, parent_dir, step.tag) {
                Some(dir) => dir,
                None => {
                    let mut sub_info = super::component::NodeInfo::new(step.tag, step.group);
                    sub_info.dirty = true;
                    let inner_dir = tree.push(super::component::Component {
                        info: super::component::NodeInfo::new(0, next_group),
                        kind: NodeKind::Directory { children: Vec::new(), next: None, has_next: false, start: None },
                    });
                    let sub = tree.push(super::component::Component {
                        info: sub_info,
                        kind: NodeKind::SubIfd { new_group_base: next_group, children: vec![inner_dir] },
                    });
                    push_child(tree, parent_dir, sub);
                    inner_dir
                }
            };
        }
    }

    /// `visitDirectoryNext`-equivalent: after a directory (and everything
    /// under it) has been walked, rewrite each direct child's `tiffType`
    /// and recorded value to match what was just applied, and if the value
    /// now fits inline (`<= 4` bytes) where it previously didn't, move it
    /// into the inline offset slot and zero the old location. A node that
    /// is already `dirty` is left alone: its final layout will be decided
    /// by the intrusive rebuild, not by this in-place patch.
    fn finalize_directory(&mut self, tree: &mut Tree, id: NodeId) {
        let children = match &tree.get(id).kind {
            NodeKind::Directory { children, .. } => children.clone(),
            _ => return,
        };
        for child in children {
            self.finalize_entry_header(tree, child);
        }
    }

    fn finalize_entry_header(&mut self, tree: &mut Tree, id: NodeId) {
        let node = tree.get(id);
        if node.info.dirty {
            return;
        }
        let Some(value) = node.info.value.clone() else { return };

        let encoded = encode_value(&value, self.current_byte_order);
        let node = tree.get_mut(id);
        node.info.tiff_type = Some(value.format() as u16);
        if encoded.len() <= 4 && node.info.raw.len() != 4 {
            let mut inline = encoded;
            inline.resize(4, 0);
            node.info.raw = Cow::Owned(inline);
        }
    }

    /// `visitBinaryArrayEnd`-equivalent: a decoded, configured binary array
    /// whose cipher-pair is registered gets its plaintext (reassembled from
    /// its possibly-edited `BinaryElement` children) re-enciphered and
    /// patched back in place; if the re-enciphered buffer doesn't match the
    /// original span exactly, the node is flipped dirty instead.
    fn reencrypt_binary_array(&mut self, tree: &mut Tree, id: NodeId) {
        let (config_key, decoded, elements) = match &tree.get(id).kind {
            NodeKind::BinaryArray { config_key, decoded, elements } => (*config_key, *decoded, elements.clone()),
            _ => return,
        };
        if !decoded || elements.is_empty() {
            return;
        }
        let Some(config) = binary::find_config(config_key) else { return };
        let Some(cipher) = config.cipher else { return };

        let capacity = tree.get(id).info.raw.len();
        if capacity == 0 {
            return;
        }

        let mut plaintext = vec![0u8; capacity];
        for element_id in elements {
            let info = &tree.get(element_id).info;
            let start = info.tag as usize;
            if start >= plaintext.len() {
                continue;
            }
            let bytes = info.raw.as_ref();
            let end = (start + bytes.len()).min(plaintext.len());
            plaintext[start..end].copy_from_slice(&bytes[..end - start]);
        }

        let reenciphered = (cipher.encipher)(&plaintext);
        if reenciphered.len() == capacity {
            tree.get_mut(id).info.raw = Cow::Owned(reenciphered);
        } else {
            tree.get_mut(id).info.dirty = true;
        }
    }
}

impl<'r> Visitor for Encoder<'r> {
    fn gates(&self) -> Gates {
        self.gates
    }

    fn gates_mut(&mut self) -> &mut Gates {
        &mut self.gates
    }

    fn visit_directory(&mut self, tree: &mut Tree, id: NodeId) {
        if self.mode == EncodeMode::Intrusive {
            tree.get_mut(id).info.dirty = true;
        }
    }

    fn visit_directory_end(&mut self, tree: &mut Tree, id: NodeId) {
        self.finalize_directory(tree, id);
    }

    fn visit_entry(&mut self, tree: &mut Tree, id: NodeId) {
        let (tag, group) = {
            let info = &tree.get(id).info;
            (info.tag, info.group)
        };
        if tag == TAG_IPTC_NAA && group == super::path::GROUP_IFD0 {
            self.encode_iptc(tree, id);
        } else if tag == TAG_XML_PACKET && group == super::path::GROUP_IFD0 {
            self.encode_xmp(tree, id);
        } else {
            self.patch_entry(tree, id);
        }
    }

    fn visit_data_entry(&mut self, tree: &mut Tree, id: NodeId) {
        self.encode_data_entry(tree, id);
    }

    fn visit_image_entry(&mut self, tree: &mut Tree, id: NodeId) {
        self.encode_image_entry(tree, id);
    }

    fn visit_size_entry(&mut self, tree: &mut Tree, id: NodeId) {
        self.patch_entry(tree, id);
    }

    fn visit_sub_ifd(&mut self, tree: &mut Tree, id: NodeId) {
        self.offset_entry(tree, id);
    }

    fn visit_mn_entry(&mut self, tree: &mut Tree, id: NodeId) {
        if let NodeKind::MnEntry { makernote: None } = &tree.get(id).kind {
            self.patch_entry(tree, id);
        }
    }

    fn visit_binary_array(&mut self, tree: &mut Tree, id: NodeId) {
        let (has_config, decoded) = match &tree.get(id).kind {
            NodeKind::BinaryArray { config_key, decoded, .. } => (binary::find_config(config_key).is_some(), *decoded),
            _ => return,
        };
        if !has_config || !decoded {
            self.offset_entry(tree, id);
        }
    }

    fn visit_binary_array_end(&mut self, tree: &mut Tree, id: NodeId) {
        self.reencrypt_binary_array(tree, id);
    }

    fn visit_binary_element(&mut self, tree: &mut Tree, id: NodeId) {
        self.patch_entry(tree, id);
    }

    /// Consults the synthesized `Exif.<group>.ByteOrder`/`.Offset` data for
    /// this maker note before switching to its own byte order for the
    /// duration of the subtree: a recognized, differing byte order is
    /// applied and flips the node dirty (it must be re-serialized in its
    /// new byte order); the `Offset` datum is consumed without being
    /// applied, since the maker note's base offset is structural, not
    /// something an `Exifdatum` edit can move.
    fn visit_ifd_makernote(&mut self, tree: &mut Tree, id: NodeId) {
        let group = tree.get(id).info.group;

        if let Some(index) = self.data.find_by_tag_group(SYNTH_TAG_BYTE_ORDER, group) {
            let requested = self.data.get_at(index).value.as_str().map(str::to_string);
            if let Some(bo) = requested.and_then(|s| s.as_bytes().try_into().ok()).and_then(|m| ByteOrder::from_marker(m).ok()) {
                if let NodeKind::IfdMakernote { byte_order, .. } = &mut tree.get_mut(id).kind {
                    if *byte_order != bo {
                        *byte_order = bo;
                        tree.get_mut(id).info.dirty = true;
                    }
                }
            }
            self.mark_consumed(index);
        }
        if let Some(index) = self.data.find_by_tag_group(SYNTH_TAG_OFFSET, group) {
            self.mark_consumed(index);
        }

        if let NodeKind::IfdMakernote { byte_order, .. } = &tree.get(id).kind {
            self.current_byte_order = *byte_order;
        }
    }

    fn visit_ifd_makernote_end(&mut self, tree: &mut Tree, _id: NodeId) {
        let _ = tree;
        self.current_byte_order = self.header.byte_order();
    }
}

/// Encodes `value` to its on-disk byte representation in `bo`, the inverse
/// of `reader::parse_raw_value`. Strings get their null terminator back;
/// everything else is a flat little/big-endian element dump.
fn encode_value(value: &RawValue, bo: ByteOrder) -> Vec<u8> {
    fn push16(out: &mut Vec<u8>, v: u16, bo: ByteOrder) {
        out.extend_from_slice(&match bo {
            ByteOrder::LittleEndian => v.to_le_bytes(),
            ByteOrder::BigEndian => v.to_be_bytes(),
        });
    }
    fn push32(out: &mut Vec<u8>, v: u32, bo: ByteOrder) {
        out.extend_from_slice(&match bo {
            ByteOrder::LittleEndian => v.to_le_bytes(),
            ByteOrder::BigEndian => v.to_be_bytes(),
        });
    }
    fn push64(out: &mut Vec<u8>, v: u64, bo: ByteOrder) {
        out.extend_from_slice(&match bo {
            ByteOrder::LittleEndian => v.to_le_bytes(),
            ByteOrder::BigEndian => v.to_be_bytes(),
        });
    }

    let mut out = Vec::new();
    match value {
        RawValue::UInt8(v) => out.extend_from_slice(v),
        RawValue::String(s) => {
            out.extend_from_slice(s.as_bytes());
            out.push(0);
        }
        RawValue::UInt16(v) => v.iter().for_each(|&x| push16(&mut out, x, bo)),
        RawValue::UInt32(v) => v.iter().for_each(|&x| push32(&mut out, x, bo)),
        RawValue::URational(v) => v.iter().for_each(|r| {
            push32(&mut out, r.num, bo);
            push32(&mut out, r.den, bo);
        }),
        RawValue::Int8(v) => out.extend(v.iter().map(|&x| x as u8)),
        RawValue::Undefined(v) => out.extend_from_slice(v),
        RawValue::Int16(v) => v.iter().for_each(|&x| push16(&mut out, x as u16, bo)),
        RawValue::Int32(v) => v.iter().for_each(|&x| push32(&mut out, x as u32, bo)),
        RawValue::SRational(v) => v.iter().for_each(|r| {
            push32(&mut out, r.num as u32, bo);
            push32(&mut out, r.den as u32, bo);
        }),
        RawValue::Float(v) => v.iter().for_each(|&x| push32(&mut out, x.to_bits(), bo)),
        RawValue::Double(v) => v.iter().for_each(|&x| push64(&mut out, x.to_bits(), bo)),
        RawValue::UInt64(v) => v.iter().for_each(|&x| push64(&mut out, x, bo)),
        RawValue::Int64(v) => v.iter().for_each(|&x| push64(&mut out, x as u64, bo)),
    }
    out
}

fn push_child(tree: &mut Tree, dir: NodeId, child: NodeId) {
    if let NodeKind::Directory { children, .. } = &mut tree.get_mut(dir).kind {
        children.push(child);
    }
}

/// Immutable equivalent of [`Finder::find`], used to look a tag up in the
/// source tree without needing exclusive access to it (the Encoder only
/// borrows the source tree, it never mutates it).
fn find_by_tag_group(tree: &Tree, tag: u16, group: GroupId) -> Option<NodeId> {
    fn visit(tree: &Tree, id: NodeId, tag: u16, group: GroupId) -> Option<NodeId> {
        let component = tree.get(id);
        if component.info.tag == tag && component.info.group == group {
            return Some(id);
        }
        match &component.kind {
            NodeKind::Directory { children, next, .. } => {
                for &child in children {
                    if let Some(found) = visit(tree, child, tag, group) {
                        return Some(found);
                    }
                }
                next.and_then(|n| visit(tree, n, tag, group))
            }
            NodeKind::SubIfd { children, .. } => {
                children.iter().find_map(|&child| visit(tree, child, tag, group))
            }
            NodeKind::MnEntry { makernote: Some(mn) } => visit(tree, *mn, tag, group),
            NodeKind::IfdMakernote { ifd, .. } => visit(tree, *ifd, tag, group),
            NodeKind::BinaryArray { elements, .. } => {
                elements.iter().find_map(|&child| visit(tree, child, tag, group))
            }
            _ => None,
        }
    }
    visit(tree, tree.root, tag, group)
}

/// Looks for a `SubIfd` node with pointer tag `tag` directly under `dir`,
/// returning its first inner directory (the group the pointer leads into).
fn find_child_pointer_dir(tree: &Tree, dir: NodeId, tag: u16) -> Option<NodeId> {
    let children = match &tree.get(dir).kind {
        NodeKind::Directory { children, .. } => children.clone(),
        _ => return None,
    };
    for child in children {
        let component = tree.get(child);
        if component.info.tag != tag {
            continue;
        }
        if let NodeKind::SubIfd { children: inner, .. } = &component.kind {
            return inner.first().copied();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::component::{Component, NodeInfo};
    use super::super::exifdata::Exifdatum;
    use super::super::traits::NodeKindHint;

    struct TestHeader(ByteOrder);

    impl Header for TestHeader {
        fn byte_order(&self) -> ByteOrder {
            self.0
        }
        fn is_image_tag(&self, _tag: u16, _group: GroupId, _primary_groups: &[GroupId]) -> bool {
            false
        }
    }

    struct EmptyRegistry;

    impl TagRegistry for EmptyRegistry {
        fn node_kind(&self, _tag: u16, _group: GroupId) -> Option<NodeKindHint> {
            None
        }
        fn tag_name(&self, _tag: u16, _group: GroupId) -> Option<&'static str> {
            None
        }
        fn group_name(&self, _group: GroupId) -> &'static str {
            "Image"
        }
    }

    const TAG_IMAGE_DESCRIPTION: u16 = 0x010E;

    fn tree_with_description(capacity: usize) -> Tree<'static> {
        let mut tree = Tree::new(&[], 0);
        let mut info = NodeInfo::new(TAG_IMAGE_DESCRIPTION, 0);
        info.raw = Cow::Owned(vec![0u8; capacity]);
        info.value = Some(RawValue::String("hello".to_string()));
        let entry = tree.push(Component { info, kind: NodeKind::Entry });
        push_child(&mut tree, tree.root, entry);
        tree
    }

    fn data_with_description(text: &str) -> ExifData {
        let mut data = ExifData::new();
        data.add(Exifdatum {
            tag: TAG_IMAGE_DESCRIPTION,
            group: 0,
            idx: 0,
            key: "Exif.Image.ImageDescription".to_string(),
            value: RawValue::String(text.to_string()),
        });
        data
    }

    fn new_encoder<'r>(
        registry: &'r EmptyRegistry,
        header: &'r TestHeader,
        mode: EncodeMode,
        data: ExifData,
    ) -> Encoder<'r> {
        Encoder::new(registry, header, &[], None, None, None, &[], false, None, mode, data)
    }

    /// spec scenario 4: `"hello"` (8 bytes reserved) replaced with
    /// `"world"` patches in place and leaves `dirty == false`.
    #[test]
    fn non_intrusive_patch_in_place_stays_clean() {
        let mut tree = tree_with_description(8);
        let header = TestHeader(ByteOrder::LittleEndian);
        let registry = EmptyRegistry;
        let encoder = new_encoder(&registry, &header, EncodeMode::NonIntrusive, data_with_description("world"));
        let unconsumed = encoder.encode(&mut tree);
        assert!(unconsumed.is_empty());

        let entry = tree_entry(&tree);
        assert!(!entry.info.dirty);
        assert_eq!(entry.info.raw.as_ref(), &b"world\0\0\0"[..]);
    }

    /// spec scenario 5: growing past the reserved capacity flips `dirty`.
    #[test]
    fn non_intrusive_patch_past_capacity_flips_dirty() {
        let mut tree = tree_with_description(8);
        let header = TestHeader(ByteOrder::LittleEndian);
        let registry = EmptyRegistry;
        let encoder = new_encoder(
            &registry,
            &header,
            EncodeMode::NonIntrusive,
            data_with_description("a much longer string"),
        );
        let unconsumed = encoder.encode(&mut tree);
        assert!(unconsumed.is_empty());

        let entry = tree_entry(&tree);
        assert!(entry.info.dirty);
    }

    #[test]
    fn encode_value_round_trips_u16_little_endian() {
        let bytes = encode_value(&RawValue::UInt16(vec![1, 256]), ByteOrder::LittleEndian);
        assert_eq!(bytes, vec![1, 0, 0, 1]);
    }

    /// An image tag is skipped entirely when rewriting an existing file:
    /// the Copier already carried it over, so the Encoder must not touch it
    /// (and must not report it back as unconsumed, since it was never meant
    /// to be consumed from this store at all).
    #[test]
    fn image_tag_of_existing_file_is_left_untouched() {
        struct ImageTagHeader;
        impl Header for ImageTagHeader {
            fn byte_order(&self) -> ByteOrder {
                ByteOrder::LittleEndian
            }
            fn is_image_tag(&self, tag: u16, _group: GroupId, _primary_groups: &[GroupId]) -> bool {
                tag == TAG_IMAGE_DESCRIPTION
            }
        }

        let mut tree = tree_with_description(8);
        let header = ImageTagHeader;
        let registry = EmptyRegistry;
        let encoder = Encoder::new(
            &registry,
            &header,
            &[],
            None,
            None,
            None,
            &[],
            false,
            None,
            EncodeMode::NonIntrusive,
            data_with_description("world"),
        );
        let unconsumed = encoder.encode(&mut tree);
        assert_eq!(unconsumed.len(), 1);

        let entry = tree_entry(&tree);
        assert!(!entry.info.dirty);
        assert_eq!(entry.info.raw.as_ref(), &[0u8; 8][..]);
    }

    /// spec scenario 6: a maker note whose own byte order legitimately
    /// differs from the host must not be forced back to the host's order
    /// just because the two differ.
    #[test]
    fn makernote_byte_order_is_left_alone_without_an_override_datum() {
        let mut tree = Tree::new(&[], 0);
        let inner_dir = tree.push(Component {
            info: NodeInfo::new(0, 5),
            kind: NodeKind::Directory { children: Vec::new(), next: None, has_next: false, start: None },
        });
        let mn = tree.push(Component {
            info: NodeInfo::new(0x927C, 2),
            kind: NodeKind::IfdMakernote {
                header_len: 0,
                mn_offset: 0,
                byte_order: ByteOrder::BigEndian,
                base_offset: 0,
                ifd: inner_dir,
            },
        });
        let mn_entry = tree.push(Component {
            info: NodeInfo::new(0x927C, 2),
            kind: NodeKind::MnEntry { makernote: Some(mn) },
        });
        push_child(&mut tree, tree.root, mn_entry);

        let header = TestHeader(ByteOrder::LittleEndian);
        let registry = EmptyRegistry;
        let encoder = new_encoder(&registry, &header, EncodeMode::NonIntrusive, ExifData::new());
        encoder.encode(&mut tree);

        let NodeKind::IfdMakernote { byte_order, .. } = &tree.get(mn).kind else {
            panic!("expected IfdMakernote");
        };
        assert_eq!(*byte_order, ByteOrder::BigEndian);
        assert!(!tree.get(mn).info.dirty);
    }
}
