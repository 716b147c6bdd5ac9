#![no_main]

use arbitrary::Arbitrary;
use exiftool_core::tree::{ReaderConfig, Reader};
use exiftool_core::ByteOrder;
use exiftool_tags::StaticTagRegistry;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    big_endian: bool,
    root_start: u32,
    buffer: Vec<u8>,
}

fuzz_target!(|input: Input| {
    // Fuzz the component-tree Reader directly, independent of any
    // container wrapper, against the real tag registry.
    let order = if input.big_endian { ByteOrder::BigEndian } else { ByteOrder::LittleEndian };
    let registry = StaticTagRegistry::new();
    let reader = Reader::new(&registry, ReaderConfig::default());
    let _tree = reader.read(&input.buffer, order, input.root_start, 0);
});
