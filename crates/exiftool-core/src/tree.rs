//! The component-tree engine: a rooted arena of typed nodes mirroring a
//! TIFF/Exif IFD hierarchy, plus the four polymorphic traversals that build,
//! decode, encode, and selectively copy it.
//!
//! Modules are ordered by dependency, leaves first:
//!
//! - [`component`] / [`traits`] / [`path`] / [`config`] — the data model and
//!   the external-collaborator seams ([`traits::TagRegistry`],
//!   [`traits::Header`], [`traits::IptcCodec`], [`traits::XmpCodec`],
//!   [`traits::Photoshop`]) a consumer crate implements.
//! - [`visitor`] — the traversal framework (`Visitor` trait + gated walk).
//! - [`binary`] / [`makernote`] — vendor binary-array layouts and
//!   maker-note header detection, consulted by the Reader.
//! - [`reader`] — builds a [`component::Tree`] from a raw buffer.
//! - [`finder`] — by-key lookup traversal used by the other three.
//! - [`decoder`] / [`exifdata`] — emits [`exifdata::ExifData`] (plus IPTC/XMP
//!   payload bytes) from a built tree.
//! - [`encoder`] — writes an [`exifdata::ExifData`] back onto a tree, either
//!   patching in place or grafting new nodes for an intrusive rebuild.
//! - [`copier`] — clones "image tags" from one tree into another.

pub mod binary;
pub mod component;
pub mod config;
pub mod copier;
pub mod decoder;
pub mod encoder;
pub mod exifdata;
pub mod finder;
pub mod makernote;
pub mod path;
pub mod reader;
pub mod traits;
pub mod visitor;

pub use component::{Component, GroupId, NodeId, NodeInfo, NodeKind, Tree, TAG_NEXT};
pub use config::ReaderConfig;
pub use copier::Copier;
pub use decoder::{DecodedOutput, Decoder};
pub use encoder::{EncodeMode, Encoder};
pub use exifdata::{ExifData, Exifdatum};
pub use finder::Finder;
pub use reader::Reader;
pub use traits::{Header, IptcCodec, NodeKindHint, PathStep, Photoshop, TagRegistry, XmpCodec};
pub use visitor::{Gates, Visitor};
