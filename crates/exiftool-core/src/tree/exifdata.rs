//! `ExifData`: a tag/group/idx-keyed store, the Decoder's output and the
//! Encoder's input. Distinct from the flat string-keyed `Attrs` container
//! used elsewhere in the workspace for container-level APIs — this store
//! needs to preserve per-group duplicate-tag order (`idx`) through an
//! encode cycle, which a flat map can't represent.

use super::component::GroupId;
use crate::RawValue;

/// One decoded metadata datum: a key (tag/group/idx) plus its value and
/// human-readable name.
#[derive(Debug, Clone)]
pub struct Exifdatum {
    pub tag: u16,
    pub group: GroupId,
    pub idx: u32,
    pub key: String,
    pub value: RawValue,
}

/// Ordered collection of [`Exifdatum`]s, as produced by the Decoder and
/// consumed by the Encoder.
#[derive(Debug, Clone, Default)]
pub struct ExifData {
    data: Vec<Exifdatum>,
}

impl ExifData {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn add(&mut self, datum: Exifdatum) {
        self.data.push(datum);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exifdatum> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Exifdatum> {
        self.data.iter().find(|d| d.key == key)
    }

    /// Remove and return the first datum matching `key`, if any.
    pub fn take(&mut self, key: &str) -> Option<Exifdatum> {
        let pos = self.data.iter().position(|d| d.key == key)?;
        Some(self.data.remove(pos))
    }

    /// First lookup of the non-intrusive Encoder's two-step duplicate-tag
    /// match: exact `(tag, group)`.
    pub fn find_by_tag_group(&self, tag: u16, group: GroupId) -> Option<usize> {
        self.data.iter().position(|d| d.tag == tag && d.group == group)
    }

    /// Second lookup: same group and `idx`, and the same key as the first
    /// hit, rather than just taking whatever the first lookup returned when
    /// `idx` doesn't match the node being matched.
    pub fn find_by_group_idx_key(&self, group: GroupId, idx: u32, key: &str) -> Option<usize> {
        self.data.iter().position(|d| d.group == group && d.idx == idx && d.key == key)
    }

    pub fn remove_at(&mut self, index: usize) -> Exifdatum {
        self.data.remove(index)
    }

    pub fn get_at(&self, index: usize) -> &Exifdatum {
        &self.data[index]
    }
}
