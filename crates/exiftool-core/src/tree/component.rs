//! The component tree: an arena of tagged-variant nodes mirroring a TIFF
//! IFD hierarchy, plus maker-note sub-trees and binary-array layouts.

use std::borrow::Cow;

use crate::{ByteOrder, RawValue};

/// Index of a [`Component`] within a [`Tree`]'s arena.
///
/// Stands in for the raw owning pointers of a traditional intrusive tree:
/// children are stored by index, and cross-references (DataEntry <-> SizeEntry)
/// are resolved by a `(tag, group)` walk rather than a stored back-pointer,
/// since the two sides are not necessarily both present when either is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Interned IFD/group identifier (e.g. IFD0, ExifIFD, a SubIfd child group,
/// or a vendor maker-note group). Plain `u16` keeps this cheap to copy and
/// compare; group numbering is assigned by whoever drives the Reader (the
/// root group is conventionally 0).
pub type GroupId = u16;

pub const TAG_NEXT: u16 = 0x0000;

/// Per-node state shared by every kind.
///
/// Generic over the lifetime of the source buffer a node's `raw` slice may
/// borrow from (matching [`Tree`]'s own `'a`); a node created after read
/// time (grafted tags, decrypted binary array elements) holds `Cow::Owned`
/// data instead and is valid for any `'a`, including `'static`.
#[derive(Debug, Clone)]
pub struct NodeInfo<'a> {
    pub tag: u16,
    pub group: GroupId,
    /// 1-based sequence number within `(directory, group)`, assigned at read
    /// time; preserved across non-intrusive rewrites to keep duplicate-tag
    /// order stable.
    pub idx: u32,
    /// TIFF type id as read (or written) for this entry; `None` for nodes
    /// that have no direct TIFF-entry representation (e.g. the tree root).
    pub tiff_type: Option<u16>,
    pub value: Option<RawValue>,
    /// Byte offset of this node's 12-byte entry slot within the directory
    /// that owns it (or, for a Directory, the offset of its entry count).
    pub offset: u32,
    /// Borrowed bytes backing `value`, or an owned buffer once the node has
    /// been decrypted, patched, or freshly grafted.
    pub raw: Cow<'a, [u8]>,
    pub dirty: bool,
}

impl<'a> NodeInfo<'a> {
    pub fn new(tag: u16, group: GroupId) -> Self {
        Self {
            tag,
            group,
            idx: 0,
            tiff_type: None,
            value: None,
            offset: 0,
            raw: Cow::Borrowed(&[]),
            dirty: false,
        }
    }
}

/// A node's type-specific state, tagged by kind. Plays the role a
/// `TiffDirectory`/`TiffEntry`/`TiffDataEntry`/... class hierarchy would, but
/// as a single enum so the tree can be a flat arena instead of a pointer graph.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// An IFD: an ordered list of entries plus an optional "next" IFD.
    Directory {
        children: Vec<NodeId>,
        next: Option<NodeId>,
        has_next: bool,
        /// Byte offset this directory's entries start at; `None` until the
        /// Reader has located it (e.g. a SubIfd child before its pointer
        /// entry has been parsed).
        start: Option<u32>,
    },
    /// A plain tag/value pair with no special structure.
    Entry,
    /// An entry whose value is strip/tile pointer data, paired with a
    /// SizeEntry carrying the matching lengths.
    DataEntry {
        size_tag: u16,
        size_group: GroupId,
        strips: Vec<(u32, u32)>,
    },
    /// Like DataEntry, but additionally understood to reference raw image
    /// data rather than arbitrary binary payload.
    ImageEntry {
        size_tag: u16,
        size_group: GroupId,
        strips: Vec<(u32, u32)>,
    },
    /// The counterpart of a DataEntry: holds per-strip byte counts.
    SizeEntry { data_tag: u16, data_group: GroupId },
    /// A tag whose value is one or more offsets to further IFDs.
    SubIfd {
        new_group_base: GroupId,
        children: Vec<NodeId>,
    },
    /// Exif.Photo.MakerNote (0x927c): either an opaque blob (vendor unknown,
    /// or header didn't parse) or the owner of a concrete IfdMakernote.
    MnEntry { makernote: Option<NodeId> },
    /// A maker-note sub-tree with its own byte order and base offset.
    IfdMakernote {
        header_len: u32,
        mn_offset: u32,
        byte_order: ByteOrder,
        base_offset: u32,
        ifd: NodeId,
    },
    /// A vendor binary blob decoded into synthetic BinaryElement children
    /// per a per-tag layout config.
    BinaryArray {
        config_key: &'static str,
        decoded: bool,
        elements: Vec<NodeId>,
    },
    /// One synthetic field inside a BinaryArray.
    BinaryElement { byte_order: Option<ByteOrder> },
}

/// One node in the tree.
#[derive(Debug, Clone)]
pub struct Component<'a> {
    pub info: NodeInfo<'a>,
    pub kind: NodeKind,
}

impl<'a> Component<'a> {
    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }
}

/// Owns the arena of [`Component`]s plus the source buffer they were parsed
/// from. `'a` is the lifetime of that buffer; nodes created after read time
/// (grafted tags, decrypted binary arrays) hold owned (`Cow::Owned`) bytes
/// instead and are unaffected by it.
#[derive(Debug)]
pub struct Tree<'a> {
    pub(crate) source: &'a [u8],
    pub(crate) nodes: Vec<Component<'a>>,
    pub root: NodeId,
}

impl<'a> Tree<'a> {
    /// Create a tree with a single empty root Directory for `group`.
    pub fn new(source: &'a [u8], root_group: GroupId) -> Self {
        let root_info = NodeInfo::new(TAG_NEXT, root_group);
        let root = Component {
            info: root_info,
            kind: NodeKind::Directory {
                children: Vec::new(),
                next: None,
                has_next: true,
                start: None,
            },
        };
        Self {
            source,
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    pub fn get(&self, id: NodeId) -> &Component<'a> {
        &self.nodes[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Component<'a> {
        &mut self.nodes[id.0 as usize]
    }

    pub fn push(&mut self, component: Component<'a>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(component);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first walk of the whole tree, in child-insertion order, driving
    /// a [`super::visitor::Visitor`]. Stops descending into a subtree as
    /// soon as the visitor clears its `traverse` gate.
    pub fn walk<V: super::visitor::Visitor>(&mut self, visitor: &mut V) {
        super::visitor::walk_node(self, self.root, visitor);
    }
}
