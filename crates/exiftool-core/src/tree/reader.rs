//! The Reader traversal: builds a [`Tree`] from a raw byte buffer.
//!
//! Parsing is best-effort. A malformed entry, directory, or sub-tree is
//! skipped with a `tracing::warn!` rather than aborting the whole read —
//! the caller gets back whatever portion of the tree could be recovered.

use std::borrow::Cow;
use std::collections::HashSet;

use crate::{ByteOrder, Error, ExifFormat, RawValue, SRational, URational};

use super::binary;
use super::component::{Component, GroupId, NodeId, NodeInfo, NodeKind, Tree, TAG_NEXT};
use super::config::ReaderConfig;
use super::makernote;
use super::traits::{NodeKindHint, TagRegistry};

const ENTRY_SIZE: usize = 12;

#[derive(Debug, Clone, Copy)]
struct ReaderState {
    byte_order: ByteOrder,
    base_offset: u32,
}

/// Builds a [`Tree`] from `buffer`, consulting `registry` for tag->kind
/// mapping. One `Reader` handles exactly one read; create a fresh one per
/// call to [`Reader::read`].
pub struct Reader<'a, 'r> {
    buffer: &'a [u8],
    registry: &'r dyn TagRegistry,
    config: ReaderConfig,
    state_stack: Vec<ReaderState>,
    seen_starts: HashSet<(GroupId, u32)>,
    counters: std::collections::HashMap<GroupId, u32>,
    post_list: Vec<NodeId>,
    make: Option<String>,
}

impl<'a, 'r> Reader<'a, 'r> {
    pub fn new(registry: &'r dyn TagRegistry, config: ReaderConfig) -> Self {
        Self {
            buffer: &[],
            registry,
            config,
            state_stack: Vec::new(),
            seen_starts: HashSet::new(),
            counters: std::collections::HashMap::new(),
            post_list: Vec::new(),
            make: None,
        }
    }

    /// Parse `buffer` (the TIFF body, not including any container wrapper)
    /// rooted at `root_start` in the root group, using `byte_order` as the
    /// initial state.
    pub fn read(
        mut self,
        buffer: &'a [u8],
        byte_order: ByteOrder,
        root_start: u32,
        root_group: GroupId,
    ) -> Tree<'a> {
        self.buffer = buffer;
        self.state_stack.push(ReaderState { byte_order, base_offset: 0 });

        let mut tree = Tree::new(buffer, root_group);
        if let NodeKind::Directory { start, .. } = &mut tree.get_mut(tree.root).kind {
            *start = Some(root_start);
        }

        self.expand_directory(&mut tree, tree.root);
        self.post_process(&mut tree);
        tree
    }

    fn state(&self) -> ReaderState {
        *self.state_stack.last().expect("reader state stack never empty")
    }

    fn next_idx(&mut self, group: GroupId) -> u32 {
        let counter = self.counters.entry(group).or_insert(0);
        *counter += 1;
        *counter
    }

    // --- primitive reads -------------------------------------------------

    fn u16_at(&self, offset: usize) -> Option<u16> {
        let bytes: [u8; 2] = self.buffer.get(offset..offset + 2)?.try_into().ok()?;
        Some(self.state().byte_order.read_u16(bytes))
    }

    fn u32_at(&self, offset: usize) -> Option<u32> {
        let bytes: [u8; 4] = self.buffer.get(offset..offset + 4)?.try_into().ok()?;
        Some(self.state().byte_order.read_u32(bytes))
    }

    // --- directory expansion ---------------------------------------------

    /// Populate `dir_id`'s children and "next" link by parsing from its
    /// recorded `start`, per the directory parse algorithm: circular-ref
    /// check, entry count bound, per-entry tag lookup + creation, then the
    /// trailing "next IFD" pointer.
    fn expand_directory(&mut self, tree: &mut Tree<'a>, dir_id: NodeId) {
        let group = tree.get(dir_id).info.group;
        let (start, has_next) = match &tree.get(dir_id).kind {
            NodeKind::Directory { start, has_next, .. } => (*start, *has_next),
            _ => return,
        };
        let Some(start) = start else { return };

        if !self.seen_starts.insert((group, start)) {
            tracing::warn!(offset = start, group, "directory already read; skipping");
            return;
        }

        let Some(count) = self.u16_at(start as usize) else {
            tracing::warn!(offset = start, "directory entry count out of bounds");
            return;
        };
        if count > self.config.max_ifd_entries {
            tracing::warn!(count, max = self.config.max_ifd_entries, "too many IFD entries; skipping directory");
            return;
        }

        let mut children = Vec::with_capacity(count as usize);
        for i in 0..count {
            let entry_pos = start as usize + 2 + i as usize * ENTRY_SIZE;
            if let Some(child) = self.read_entry_slot(tree, entry_pos, group) {
                children.push(child);
            }
        }

        let mut next_id = None;
        if has_next {
            let next_pos = start as usize + 2 + count as usize * ENTRY_SIZE;
            if let Some(next_offset) = self.u32_at(next_pos) {
                if next_offset != 0 {
                    let base = self.state().base_offset;
                    match base.checked_add(next_offset) {
                        Some(abs) if (abs as usize) <= self.buffer.len() => {
                            let next_dir = self.new_directory(group, Some(abs), has_next);
                            let id = tree.push(next_dir);
                            next_id = Some(id);
                        }
                        _ => tracing::warn!(next_offset, "next-IFD pointer out of bounds"),
                    }
                }
            }
        }

        if let NodeKind::Directory { children: c, next, .. } = &mut tree.get_mut(dir_id).kind {
            *c = children;
            *next = next_id;
        }
    }

    fn new_directory(&self, group: GroupId, start: Option<u32>, has_next: bool) -> Component<'static> {
        Component {
            info: NodeInfo::new(TAG_NEXT, group),
            kind: NodeKind::Directory { children: Vec::new(), next: None, has_next, start },
        }
    }

    /// Read one 12-byte entry slot, resolve its node kind via the tag
    /// registry, and (for the kinds that require it) recurse into its own
    /// sub-structure.
    fn read_entry_slot(&mut self, tree: &mut Tree<'a>, entry_pos: usize, group: GroupId) -> Option<NodeId> {
        let tag = self.u16_at(entry_pos)?;
        let tiff_type = self.u16_at(entry_pos + 2)?;
        let count = self.u32_at(entry_pos + 4)?;

        let Some(kind_hint) = self.registry.node_kind(tag, group) else {
            tracing::debug!(tag = format!("{tag:#06x}"), group, "unknown tag; skipping");
            return None;
        };

        let format = match ExifFormat::from_u16(tiff_type) {
            Ok(f) => f,
            Err(_) => {
                tracing::warn!(tiff_type, "unknown TIFF type; treating element size as 1");
                ExifFormat::Undefined
            }
        };

        let Some(type_size) = format.size().checked_mul(1) else {
            return None;
        };
        let Some(size) = (count as usize).checked_mul(type_size) else {
            tracing::warn!(tag = format!("{tag:#06x}"), count, "count*size overflow; skipping entry");
            return None;
        };
        if count >= (1u32 << 28) {
            tracing::warn!(tag = format!("{tag:#06x}"), count, "absurd element count; skipping entry");
            return None;
        }

        let is_sony_preview = group_name_is(self.registry, group, "Sony1") && tag == 0x2001;

        let (value_bytes, value_offset): (Cow<'a, [u8]>, u32) = if size <= 4 {
            let inline = self.buffer.get(entry_pos + 8..entry_pos + 8 + size)?;
            (Cow::Borrowed(inline), entry_pos as u32 + 8)
        } else {
            let raw_offset = self.u32_at(entry_pos + 8)?;
            let base = self.state().base_offset;
            let abs = match base.checked_add(raw_offset) {
                Some(v) => v,
                None => {
                    tracing::warn!(tag = format!("{tag:#06x}"), "base+offset overflow");
                    return None;
                }
            };
            match self.buffer.get(abs as usize..(abs as usize).checked_add(size)?) {
                Some(slice) => (Cow::Borrowed(slice), abs),
                None if is_sony_preview => {
                    // Sony's PreviewImage pointer lives past the metadata
                    // region, at the tail of the file; treat as an empty
                    // undefined value rather than failing the entry.
                    (Cow::Borrowed(&[][..]), abs)
                }
                None => {
                    tracing::warn!(tag = format!("{tag:#06x}"), abs, size, "value escapes buffer; skipping entry");
                    return None;
                }
            }
        };

        let value = if is_sony_preview && value_bytes.is_empty() {
            Some(RawValue::Undefined(Vec::new()))
        } else {
            parse_raw_value(format, count, &value_bytes, self.state().byte_order)
        };

        let idx = self.next_idx(group);
        let mut info = NodeInfo::new(tag, group);
        info.idx = idx;
        info.tiff_type = Some(tiff_type);
        info.value = value;
        info.offset = value_offset;
        info.raw = value_bytes;

        let (kind, needs_expand_sub_ifd, needs_mn) = match kind_hint {
            NodeKindHint::Entry => (NodeKind::Entry, false, false),
            NodeKindHint::DataEntry { size_tag, size_group } => {
                (NodeKind::DataEntry { size_tag, size_group, strips: Vec::new() }, false, false)
            }
            NodeKindHint::ImageEntry { size_tag, size_group } => {
                (NodeKind::ImageEntry { size_tag, size_group, strips: Vec::new() }, false, false)
            }
            NodeKindHint::SizeEntry { data_tag, data_group } => {
                (NodeKind::SizeEntry { data_tag, data_group }, false, false)
            }
            NodeKindHint::SubIfd { new_group_base } => {
                (NodeKind::SubIfd { new_group_base, children: Vec::new() }, true, false)
            }
            NodeKindHint::MnEntry => (NodeKind::MnEntry { makernote: None }, false, true),
            NodeKindHint::BinaryArray { config_key } => {
                (NodeKind::BinaryArray { config_key, decoded: false, elements: Vec::new() }, false, false)
            }
        };

        let node_id = tree.push(Component { info, kind });

        if needs_expand_sub_ifd {
            self.expand_sub_ifd(tree, node_id, format, count, entry_pos);
        }
        if needs_mn {
            self.expand_makernote(tree, node_id);
        }
        if matches!(kind_hint, NodeKindHint::BinaryArray { .. }) {
            self.post_list.push(node_id);
        }

        Some(node_id)
    }

    fn expand_sub_ifd(&mut self, tree: &mut Tree<'a>, node_id: NodeId, format: ExifFormat, count: u32, entry_pos: usize) {
        if !matches!(format, ExifFormat::UInt32 | ExifFormat::Int32 | ExifFormat::Ifd) || count == 0 {
            tracing::warn!("SubIfd entry has wrong type or zero count; skipping");
            return;
        }

        let new_group_base = match &tree.get(node_id).kind {
            NodeKind::SubIfd { new_group_base, .. } => *new_group_base,
            _ => return,
        };

        let is_ifd1_group = new_group_base == super::path::GROUP_IFD1;
        let max_children = if is_ifd1_group { self.config.max_ifd1_children } else { self.config.max_sub_ifd_children };

        let data_pos = if count as usize * 4 <= 4 { entry_pos + 8 } else {
            let raw_offset = match self.u32_at(entry_pos + 8) { Some(v) => v, None => return };
            match self.state().base_offset.checked_add(raw_offset) {
                Some(v) => v as usize,
                None => return,
            }
        };

        let mut children = Vec::new();
        for i in 0..count.min(max_children as u32) {
            let Some(offset) = self.u32_at(data_pos + 4 * i as usize) else { continue };
            let base = self.state().base_offset;
            let Some(abs) = base.checked_add(offset) else {
                tracing::warn!("SubIfd child offset overflow");
                continue;
            };
            if abs as usize > self.buffer.len() {
                tracing::warn!(abs, "SubIfd child offset out of bounds");
                continue;
            }
            let group = new_group_base + i as GroupId;
            let dir = self.new_directory(group, Some(abs), true);
            let dir_id = tree.push(dir);
            children.push(dir_id);
        }

        if let NodeKind::SubIfd { children: c, .. } = &mut tree.get_mut(node_id).kind {
            *c = children;
        }
    }

    fn expand_makernote(&mut self, tree: &mut Tree<'a>, node_id: NodeId) {
        let Some(make) = self.make.clone().or_else(|| self.find_make(tree)) else {
            tracing::warn!("no Make tag found; maker-note left opaque");
            return;
        };
        self.make = Some(make.clone());

        let bytes: Vec<u8> = match &tree.get(node_id).info.raw {
            Cow::Borrowed(b) => b.to_vec(),
            Cow::Owned(b) => b.clone(),
        };

        let Some(header) = makernote::detect(&make, &bytes) else {
            tracing::warn!(make, "unrecognized makernote header");
            return;
        };

        let mn_start = tree.get(node_id).info.offset;
        let group = tree.get(node_id).info.group;
        let byte_order = header.byte_order.unwrap_or(self.state().byte_order);
        let ifd_abs = mn_start.wrapping_add(header.ifd_offset);

        let inner_dir = self.new_directory(group, Some(ifd_abs), false);
        let inner_id = tree.push(inner_dir);

        let mn_component = Component {
            info: NodeInfo::new(TAG_NEXT, group),
            kind: NodeKind::IfdMakernote {
                header_len: header.ifd_offset,
                mn_offset: mn_start,
                byte_order,
                base_offset: ifd_abs.saturating_sub(header.ifd_offset.min(ifd_abs)),
                ifd: inner_id,
            },
        };
        let mn_id = tree.push(mn_component);

        if let NodeKind::MnEntry { makernote } = &mut tree.get_mut(node_id).kind {
            *makernote = Some(mn_id);
        }

        self.state_stack.push(ReaderState { byte_order, base_offset: mn_start });
        self.expand_directory(tree, inner_id);
        self.state_stack.pop();
    }

    fn find_make(&self, tree: &Tree<'a>) -> Option<String> {
        find_entry_value(tree, 0x010F, super::path::GROUP_IFD0).and_then(|v| v.as_str().map(|s| s.to_string()))
    }

    // --- post-processing ---------------------------------------------------

    /// Phase 2: resolve DataEntry/SizeEntry strip pairings, then decode
    /// every queued BinaryArray (decrypt if configured, materialize
    /// BinaryElement children per its layout).
    fn post_process(&mut self, tree: &mut Tree<'a>) {
        self.resolve_strips(tree);

        let queued = std::mem::take(&mut self.post_list);
        let mut seen_arrays: HashSet<(u16, GroupId)> = HashSet::new();
        for node_id in queued {
            let (tag, group) = {
                let info = &tree.get(node_id).info;
                (info.tag, info.group)
            };
            if !seen_arrays.insert((tag, group)) {
                tracing::warn!(tag = format!("{tag:#06x}"), group, "duplicate binary array; skipping");
                continue;
            }
            self.decode_binary_array(tree, node_id);
        }
    }

    fn resolve_strips(&self, tree: &mut Tree<'a>) {
        let mut pairs = Vec::new();
        for (idx, node) in tree.nodes.iter().enumerate() {
            if let NodeKind::DataEntry { size_tag, size_group, .. } = &node.kind {
                pairs.push((NodeId(idx as u32), *size_tag, *size_group));
            }
        }
        for (data_id, size_tag, size_group) in pairs {
            let Some(size_value) = find_entry_value(tree, size_tag, size_group) else { continue };
            let Some(counts) = size_value.as_u32_vec() else { continue };
            let Some(data_value) = tree.get(data_id).info.value.clone() else { continue };
            let Some(pointers) = data_value.as_u32_vec() else { continue };
            if pointers.len() != counts.len() {
                tracing::warn!(
                    pointers = pointers.len(),
                    counts = counts.len(),
                    "strip pointer/size count mismatch"
                );
            }
            let strips: Vec<(u32, u32)> = pointers.into_iter().zip(counts).collect();
            if let NodeKind::DataEntry { strips: s, .. } | NodeKind::ImageEntry { strips: s, .. } =
                &mut tree.get_mut(data_id).kind
            {
                *s = strips;
            }
        }
    }

    fn decode_binary_array(&self, tree: &mut Tree<'a>, node_id: NodeId) {
        let config_key = match &tree.get(node_id).kind {
            NodeKind::BinaryArray { config_key, .. } => *config_key,
            _ => return,
        };
        let Some(config) = binary::find_config(config_key) else {
            tracing::debug!(config_key, "no binary array config registered; left as plain entry");
            return;
        };

        let original: Vec<u8> = match &tree.get(node_id).info.raw {
            Cow::Borrowed(b) => b.to_vec(),
            Cow::Owned(b) => b.clone(),
        };
        if original.len() > self.config.max_binary_array_size {
            tracing::warn!(len = original.len(), "binary array exceeds max size; skipping");
            return;
        }

        let plaintext = match config.cipher {
            Some(cipher) => (cipher.decipher)(&original),
            None => original,
        };

        let group = tree.get(node_id).info.group;
        let byte_order = self.state().byte_order;
        let mut elements = Vec::new();
        let mut offset = 0usize;
        while offset < plaintext.len() {
            if let Some(def) = config.def_at(offset) {
                let width = def.format.size() * def.count as usize;
                let end = (offset + width).min(plaintext.len());
                let value = parse_raw_value(def.format, def.count, &plaintext[offset..end], byte_order);
                let mut info = NodeInfo::new(offset as u16, group);
                info.tiff_type = Some(def.format as u16);
                info.value = value;
                info.raw = Cow::Owned(plaintext[offset..end].to_vec());
                let id = tree.push(Component {
                    info,
                    kind: NodeKind::BinaryElement { byte_order: Some(byte_order) },
                });
                elements.push(id);
                offset = offset.max(end).max(offset + width.max(1));
            } else if config.concat {
                let next_def_offset = config
                    .defs
                    .iter()
                    .map(|d| d.offset)
                    .filter(|&o| o > offset)
                    .min()
                    .unwrap_or(plaintext.len());
                let gap = next_def_offset.saturating_sub(offset);
                let step = config.default_format.size().max(1);
                let count = (gap / step).max(if gap > 0 { 1 } else { 0 });
                let width = if count > 0 { (count * step).min(gap) } else { gap };
                let end = (offset + width.max(1)).min(plaintext.len());
                let mut info = NodeInfo::new(offset as u16, group);
                info.tiff_type = Some(ExifFormat::Undefined as u16);
                info.raw = Cow::Owned(plaintext[offset..end].to_vec());
                info.value = Some(RawValue::Undefined(plaintext[offset..end].to_vec()));
                let id = tree.push(Component {
                    info,
                    kind: NodeKind::BinaryElement { byte_order: Some(byte_order) },
                });
                elements.push(id);
                offset = end.max(offset + 1);
            } else {
                offset += 1;
            }
        }

        if let NodeKind::BinaryArray { decoded, elements: e, .. } = &mut tree.get_mut(node_id).kind {
            *decoded = true;
            *e = elements;
        }
    }
}

fn group_name_is(registry: &dyn TagRegistry, group: GroupId, name: &str) -> bool {
    registry.group_name(group) == name
}

fn find_entry_value<'a>(tree: &Tree<'a>, tag: u16, group: GroupId) -> Option<RawValue> {
    tree.nodes
        .iter()
        .find(|c| c.info.tag == tag && c.info.group == group && c.info.value.is_some())
        .and_then(|c| c.info.value.clone())
}

/// Parse `data` as `count` elements of `format`, silently truncating to
/// however many whole elements actually fit (callers are expected to have
/// already bounds-checked `data`'s length against `count * format.size()`;
/// this is a last-ditch guard against the gap-filling path handing over a
/// short slice).
fn parse_raw_value(format: ExifFormat, count: u32, data: &[u8], bo: ByteOrder) -> Option<RawValue> {
    let count = count as usize;
    Some(match format {
        ExifFormat::UInt8 => RawValue::UInt8(data.to_vec()),
        ExifFormat::String => {
            let s = data.iter().take_while(|&&b| b != 0).copied().collect::<Vec<u8>>();
            RawValue::String(String::from_utf8_lossy(&s).into_owned())
        }
        ExifFormat::Utf8 => {
            let s = data.iter().take_while(|&&b| b != 0).copied().collect::<Vec<u8>>();
            RawValue::String(String::from_utf8_lossy(&s).into_owned())
        }
        ExifFormat::UInt16 => RawValue::UInt16(chunked(data, 2, count, |c| bo.read_u16([c[0], c[1]]))),
        ExifFormat::UInt32 | ExifFormat::Ifd => {
            RawValue::UInt32(chunked(data, 4, count, |c| bo.read_u32([c[0], c[1], c[2], c[3]])))
        }
        ExifFormat::URational => RawValue::URational(chunked(data, 8, count, |c| {
            URational::new(bo.read_u32([c[0], c[1], c[2], c[3]]), bo.read_u32([c[4], c[5], c[6], c[7]]))
        })),
        ExifFormat::Int8 => RawValue::Int8(data.iter().map(|&b| b as i8).collect()),
        ExifFormat::Undefined => RawValue::Undefined(data.to_vec()),
        ExifFormat::Int16 => RawValue::Int16(chunked(data, 2, count, |c| bo.read_i16([c[0], c[1]]))),
        ExifFormat::Int32 => RawValue::Int32(chunked(data, 4, count, |c| bo.read_i32([c[0], c[1], c[2], c[3]]))),
        ExifFormat::SRational => RawValue::SRational(chunked(data, 8, count, |c| {
            SRational::new(bo.read_i32([c[0], c[1], c[2], c[3]]), bo.read_i32([c[4], c[5], c[6], c[7]]))
        })),
        ExifFormat::Float => RawValue::Float(chunked(data, 4, count, |c| bo.read_f32([c[0], c[1], c[2], c[3]]))),
        ExifFormat::Double => RawValue::Double(chunked(data, 8, count, |c| {
            bo.read_f64([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
        })),
        ExifFormat::UInt64 => RawValue::UInt64(chunked(data, 8, count, |c| {
            bo.read_u64([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
        })),
        ExifFormat::Int64 | ExifFormat::Ifd64 => RawValue::Int64(chunked(data, 8, count, |c| {
            bo.read_u64([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]) as i64
        })),
        ExifFormat::Unicode | ExifFormat::Complex => RawValue::Undefined(data.to_vec()),
    })
}

fn chunked<T>(data: &[u8], width: usize, count: usize, f: impl Fn(&[u8]) -> T) -> Vec<T> {
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let start = i * width;
        let end = start + width;
        if end > data.len() {
            break;
        }
        out.push(f(&data[start..end]));
    }
    out
}

impl Error {
    /// Convenience constructor matching the tree engine's soft-skip taxonomy.
    pub fn arithmetic_overflow(what: &'static str) -> Self {
        Error::ArithmeticOverflow { what }
    }
}
