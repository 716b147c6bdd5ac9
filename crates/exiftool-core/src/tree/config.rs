//! Reader-side limits. Kept as an explicit config struct rather than
//! hard-coded constants so a caller parsing a file of unusual provenance
//! (e.g. a maker-note with legitimately many entries) can relax a single
//! knob instead of patching the reader.

/// Bounds enforced by [`super::reader::Reader`] while walking a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Max entries accepted in a single IFD.
    pub max_ifd_entries: u16,
    /// Max SubIfd children followed from one pointer entry.
    pub max_sub_ifd_children: usize,
    /// Max count accepted for a SubIfd's `IFD1` pointer specifically (the
    /// original reserves exactly one child for the thumbnail chain).
    pub max_ifd1_children: usize,
    /// Max total bytes accepted for a single BinaryArray payload.
    pub max_binary_array_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_ifd_entries: 256,
            max_sub_ifd_children: 9,
            max_ifd1_children: 1,
            max_binary_array_size: 1 << 20,
        }
    }
}
