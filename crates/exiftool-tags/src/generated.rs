//! Auto-generated vendor maker-note tag tables, one module per vendor family.
//!
//! Each submodule defines its own local `TagDef` (name + optional value
//! enumeration) and a set of `phf::Map` tables — regenerated from ExifTool's
//! vendor tag tables, not hand-maintained. See each file's own header.

pub mod apple;
pub mod canon;
pub mod dji;
pub mod exif;
pub mod fujifilm;
pub mod gopro;
pub mod gps;
pub mod nikon;
pub mod olympus;
pub mod panasonic;
pub mod samsung;
