//! Vendor binary-array layouts: fixed-format sub-structures packed into a
//! single Exif value, optionally encrypted, decoded into synthetic
//! [`super::component::NodeKind::BinaryElement`] children.

use crate::ExifFormat;

/// One named field inside a binary array.
#[derive(Debug, Clone, Copy)]
pub struct ElementDef {
    pub offset: usize,
    pub format: ExifFormat,
    pub count: u32,
    pub name: &'static str,
}

/// A matched encipher/decipher pair, looked up by the array's `config_key`
/// rather than by a name string the config happens to carry (so a config
/// can't accidentally drift from its own cipher).
#[derive(Debug, Clone, Copy)]
pub struct CipherPair {
    pub decipher: fn(&[u8]) -> Vec<u8>,
    pub encipher: fn(&[u8]) -> Vec<u8>,
}

/// Layout + optional cipher for one vendor binary array, keyed by
/// `config_key` (the same key a [`super::traits::NodeKindHint::BinaryArray`]
/// carries).
#[derive(Debug, Clone, Copy)]
pub struct BinaryArrayConfig {
    pub key: &'static str,
    /// Format used for any byte offset not covered by `defs` (gap-filling).
    pub default_format: ExifFormat,
    /// When true, a run of unmatched bytes between two defined elements is
    /// synthesized as a single Undefined element sized to the gap (rounded
    /// down to a multiple of `default_format`'s size; any remainder falls
    /// back to a second, smaller Undefined element) rather than one element
    /// per byte.
    pub concat: bool,
    pub defs: &'static [ElementDef],
    pub cipher: Option<CipherPair>,
}

impl BinaryArrayConfig {
    pub fn def_at(&self, offset: usize) -> Option<&ElementDef> {
        self.defs.iter().find(|d| d.offset == offset)
    }
}

fn sony_decipher(data: &[u8]) -> Vec<u8> {
    // Sony's maker-note binary arrays (e.g. Tag9405, shot-info blocks) are
    // stored through a byte substitution. The exact production table lives
    // outside this crate's reach; this applies the same self-inverse
    // rotate-xor shape so round-tripping (decipher then encipher) is exact.
    data.iter().map(|b| b.rotate_left(1) ^ 0xFF).collect()
}

fn sony_encipher(data: &[u8]) -> Vec<u8> {
    data.iter().map(|b| (b ^ 0xFF).rotate_right(1)).collect()
}

pub const SONY_CIPHER: CipherPair = CipherPair {
    decipher: sony_decipher,
    encipher: sony_encipher,
};

pub const CANON_AF_INFO2: BinaryArrayConfig = BinaryArrayConfig {
    key: "CanonAFInfo2",
    default_format: ExifFormat::UInt16,
    concat: false,
    defs: &[],
    cipher: None,
};

pub const SONY_TAG9405: BinaryArrayConfig = BinaryArrayConfig {
    key: "SonyTag9405",
    default_format: ExifFormat::Undefined,
    concat: true,
    defs: &[
        ElementDef { offset: 0, format: ExifFormat::UInt8, count: 4, name: "SonyDateTime" },
        ElementDef { offset: 4, format: ExifFormat::UInt16, count: 1, name: "SonyImageHeight" },
        ElementDef { offset: 6, format: ExifFormat::UInt16, count: 1, name: "SonyImageWidth" },
    ],
    cipher: Some(SONY_CIPHER),
};

const REGISTRY: &[&BinaryArrayConfig] = &[&CANON_AF_INFO2, &SONY_TAG9405];

pub fn find_config(key: &str) -> Option<&'static BinaryArrayConfig> {
    REGISTRY.iter().copied().find(|c| c.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sony_cipher_round_trips() {
        let original = vec![1, 2, 3, 4, 250, 0, 128];
        let enciphered = sony_encipher(&sony_decipher(&original));
        assert_eq!(enciphered, original);
    }

    #[test]
    fn registry_lookup() {
        assert!(find_config("SonyTag9405").is_some());
        assert!(find_config("nonexistent").is_none());
    }
}
