//! External-collaborator seams: traits a consumer crate implements so the
//! tree engine never has to know a concrete tag dictionary or container
//! format. Defined here (the leaf of the dependency graph) and implemented
//! by `exiftool-tags` (tag data) and by format-specific callers (`Header`).

use crate::ByteOrder;
use super::component::GroupId;

/// What kind of node a `(tag, group)` pair should materialize as, as
/// determined by a tag dictionary. Returned by [`TagRegistry::node_kind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKindHint {
    Entry,
    DataEntry { size_tag: u16, size_group: GroupId },
    ImageEntry { size_tag: u16, size_group: GroupId },
    SizeEntry { data_tag: u16, data_group: GroupId },
    SubIfd { new_group_base: GroupId },
    MnEntry,
    BinaryArray { config_key: &'static str },
}

/// Maps tags to node kinds and (for Entry-like kinds) the TIFF decoder
/// registry also uses it to determine how a raw value should be split out.
/// Implemented in `exiftool-tags` against its `phf` tag tables; the tree
/// engine itself carries only the trait, per the one-directional crate
/// dependency graph (`exiftool-tags` depends on `exiftool-core`, not the
/// reverse).
pub trait TagRegistry {
    fn node_kind(&self, tag: u16, group: GroupId) -> Option<NodeKindHint>;

    /// Human-readable name for `(tag, group)`, used when decoding to an Exif
    /// record key (`Exif.<group-name>.<tag-name>`).
    fn tag_name(&self, tag: u16, group: GroupId) -> Option<&'static str>;

    /// Human-readable name for a group id, e.g. `"Image"`, `"Photo"`,
    /// `"GPSInfo"`, or a vendor maker-note group name like `"Canon"`.
    fn group_name(&self, group: GroupId) -> &'static str;

    /// Sub-tag name table for a synthetic record family such as Canon's
    /// AFInfo2 breakdown (`family` is an opaque key chosen by the decoder
    /// that needs it, e.g. `"CanonAFInfo2"`).
    fn tag_list(&self, family: &str) -> &'static [(u16, &'static str)] {
        let _ = family;
        &[]
    }
}

/// Per-container knowledge the Copier and intrusive Encoder need: which
/// byte order a freshly grafted entry should use, and whether a given tag
/// belongs to the set of "image" tags that the Copier preserves verbatim
/// rather than letting the Encoder re-derive them from Exif data.
pub trait Header {
    fn byte_order(&self) -> ByteOrder;

    fn is_image_tag(&self, tag: u16, group: GroupId, primary_groups: &[GroupId]) -> bool;
}

/// One step of a path from the tree root to where a new node for a tag
/// must be inserted, as computed by [`super::path::compute_path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub tag: u16,
    pub group: GroupId,
}

/// Opaque IPTC-IIM codec, implemented against `exiftool-iptc` by whatever
/// crate wires this engine up to a container format. Kept as raw bytes in
/// and out so this crate never has to depend on IPTC's own attribute model.
pub trait IptcCodec {
    fn decode(&self, data: &[u8]) -> Option<Vec<u8>>;
    fn encode(&self, data: &[u8]) -> Vec<u8>;
}

/// Opaque XMP codec, implemented against `exiftool-xmp`.
pub trait XmpCodec {
    fn decode(&self, packet: &[u8]) -> Option<Vec<u8>>;
    fn encode(&self, data: &[u8]) -> Vec<u8>;
}

/// Photoshop Image Resource Block helpers for the IPTC-in-`ImageResources`
/// path, implemented against `exiftool-iptc::photoshop`.
pub trait Photoshop {
    /// Returns `(header_len, data_len)` locating the IPTC block within an
    /// Image Resources buffer, if present.
    fn locate_iptc_irb(&self, bytes: &[u8]) -> Option<(usize, usize)>;
    fn set_iptc_irb(&self, bytes: &[u8], iptc: &[u8]) -> Vec<u8>;
}
