//! Property-based tests for the component-tree Reader.
//!
//! These only assert the bounds-safety invariant: arbitrary bytes, arbitrary
//! starting offsets, and arbitrary byte order never panic, no matter how the
//! tag registry routes a given tag. Semantic correctness is covered by the
//! unit tests alongside each `tree` submodule.

use exiftool_core::tree::{GroupId, NodeKindHint, Reader, ReaderConfig, TagRegistry};
use exiftool_core::ByteOrder;
use proptest::prelude::*;

/// Routes every tag to a plain `Entry` except a handful of well-known
/// pointer tags, so the fuzzer actually exercises SubIfd/MnEntry/DataEntry
/// expansion instead of only ever building flat directories.
struct FuzzRegistry;

impl TagRegistry for FuzzRegistry {
    fn node_kind(&self, tag: u16, _group: GroupId) -> Option<NodeKindHint> {
        match tag {
            0x8769 => Some(NodeKindHint::SubIfd { new_group_base: 2 }),
            0x8825 => Some(NodeKindHint::SubIfd { new_group_base: 3 }),
            0x927C => Some(NodeKindHint::MnEntry),
            0x0111 => Some(NodeKindHint::DataEntry { size_tag: 0x0117, size_group: 0 }),
            0x0117 => Some(NodeKindHint::SizeEntry { data_tag: 0x0111, data_group: 0 }),
            0x0026 => Some(NodeKindHint::BinaryArray { config_key: "CanonAFInfo2" }),
            _ => Some(NodeKindHint::Entry),
        }
    }

    fn tag_name(&self, _tag: u16, _group: GroupId) -> Option<&'static str> {
        None
    }

    fn group_name(&self, _group: GroupId) -> &'static str {
        "Unknown"
    }
}

proptest! {
    /// The Reader must never panic on arbitrary bytes, regardless of where
    /// it's told to start or which byte order it's told to use.
    #[test]
    fn reader_no_panic_on_arbitrary_bytes(
        data in prop::collection::vec(any::<u8>(), 0..2048),
        root_start in any::<u32>(),
        big_endian in any::<bool>(),
    ) {
        let order = if big_endian { ByteOrder::BigEndian } else { ByteOrder::LittleEndian };
        let registry = FuzzRegistry;
        let reader = Reader::new(&registry, ReaderConfig::default());
        let _tree = reader.read(&data, order, root_start, 0);
    }

    /// Same, but biasing the root offset into the buffer so directory
    /// expansion (not just the initial bounds check) actually runs.
    #[test]
    fn reader_no_panic_with_in_range_root(
        data in prop::collection::vec(any::<u8>(), 16..2048),
        offset_frac in 0.0f64..1.0,
    ) {
        let root_start = (offset_frac * data.len() as f64) as u32;
        let registry = FuzzRegistry;
        let reader = Reader::new(&registry, ReaderConfig::default());
        let _tree = reader.read(&data, ByteOrder::LittleEndian, root_start, 0);
    }

    /// A directory entry count claiming far more entries than the buffer
    /// could possibly hold must be rejected/truncated, never walked off
    /// the end of the slice.
    #[test]
    fn reader_rejects_oversized_entry_count(
        mut data in prop::collection::vec(any::<u8>(), 16..256),
        claimed_count in any::<u16>(),
    ) {
        data[0] = claimed_count.to_le_bytes()[0];
        data[1] = claimed_count.to_le_bytes()[1];
        let registry = FuzzRegistry;
        let reader = Reader::new(&registry, ReaderConfig::default());
        let _tree = reader.read(&data, ByteOrder::LittleEndian, 0, 0);
    }
}
