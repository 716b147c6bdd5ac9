//! The Copier traversal: copies "image tags" (the tags a Header implementation
//! says describe the image itself rather than acquisition metadata — size,
//! compression, orientation, strip layout) from a source tree into a
//! destination tree, skipping Directory-kind structural nodes and grafting
//! new nodes via the same path computation the intrusive Encoder uses.

use super::component::{GroupId, NodeId, NodeKind, Tree};
use super::path::{compute_path, GroupLink};
use super::traits::Header;
use super::visitor::{Gates, Visitor};
use crate::RawValue;

struct CopiedTag {
    tag: u16,
    group: GroupId,
    value: RawValue,
    tiff_type: Option<u16>,
}

/// Collects image tags from a source tree. Run first over the source, then
/// [`Copier::graft_into`] applies the collected tags to a destination tree.
pub struct Copier<'r> {
    header: &'r dyn Header,
    primary_groups: &'r [GroupId],
    gates: Gates,
    collected: Vec<CopiedTag>,
}

impl<'r> Copier<'r> {
    pub fn new(header: &'r dyn Header, primary_groups: &'r [GroupId]) -> Self {
        Self { header, primary_groups, gates: Gates::default(), collected: Vec::new() }
    }

    /// Walks `source` collecting image tags, then grafts them into `dest`
    /// using `hierarchy` to compute each tag's insertion path.
    pub fn copy(mut self, source: &mut Tree, dest: &mut Tree, hierarchy: &[GroupLink]) {
        source.walk(&mut self);
        for tag in self.collected {
            graft(dest, hierarchy, tag);
        }
    }

    fn maybe_collect(&mut self, tree: &Tree, id: NodeId) {
        let info = &tree.get(id).info;
        if !self.header.is_image_tag(info.tag, info.group, self.primary_groups) {
            return;
        }
        let Some(value) = info.value.clone() else { return };
        self.collected.push(CopiedTag { tag: info.tag, group: info.group, value, tiff_type: info.tiff_type });
    }
}

impl<'r> Visitor for Copier<'r> {
    fn gates(&self) -> Gates {
        self.gates
    }

    fn gates_mut(&mut self) -> &mut Gates {
        &mut self.gates
    }

    // Directory nodes are pure structure and carry no image-tag payload of
    // their own; skipping them here (no override needed, the default is a
    // no-op) leaves only the leaf kinds below to qualify.

    fn visit_entry(&mut self, tree: &mut Tree, id: NodeId) {
        self.maybe_collect(tree, id);
    }

    fn visit_data_entry(&mut self, tree: &mut Tree, id: NodeId) {
        self.maybe_collect(tree, id);
    }

    fn visit_image_entry(&mut self, tree: &mut Tree, id: NodeId) {
        self.maybe_collect(tree, id);
    }

    fn visit_size_entry(&mut self, tree: &mut Tree, id: NodeId) {
        self.maybe_collect(tree, id);
    }
}

fn graft(dest: &mut Tree, hierarchy: &[GroupLink], tag: CopiedTag) {
    let path = compute_path(hierarchy, tag.tag, tag.group);
    let mut parent_dir = dest.root;

    for (i, step) in path.iter().enumerate() {
        if i + 1 == path.len() {
            if let Some(existing) = find_child_entry(dest, parent_dir, step.tag) {
                let node = dest.get_mut(existing);
                node.info.value = Some(tag.value);
                node.info.tiff_type = tag.tiff_type;
                node.info.dirty = true;
                return;
            }
            let mut info = super::component::NodeInfo::new(step.tag, step.group);
            info.tiff_type = tag.tiff_type;
            info.value = Some(tag.value);
            info.dirty = true;
            let leaf = dest.push(super::component::Component { info, kind: NodeKind::Entry });
            push_child(dest, parent_dir, leaf);
            return;
        }

        let next_group = path[i + 1].group;
        parent_dir = match find_child_pointer_dir(dest, parent_dir, step.tag) {
            Some(dir) => dir,
            None => {
                let mut sub_info = super::component::NodeInfo::new(step.tag, step.group);
                sub_info.dirty = true;
                let inner_dir = dest.push(super::component::Component {
                    info: super::component::NodeInfo::new(0, next_group),
                    kind: NodeKind::Directory { children: Vec::new(), next: None, has_next: false, start: None },
                });
                let sub = dest.push(super::component::Component {
                    info: sub_info,
                    kind: NodeKind::SubIfd { new_group_base: next_group, children: vec![inner_dir] },
                });
                push_child(dest, parent_dir, sub);
                inner_dir
            }
        };
    }
}

fn push_child(tree: &mut Tree, dir: NodeId, child: NodeId) {
    if let NodeKind::Directory { children, .. } = &mut tree.get_mut(dir).kind {
        children.push(child);
    }
}

fn find_child_entry(tree: &Tree, dir: NodeId, tag: u16) -> Option<NodeId> {
    let children = match &tree.get(dir).kind {
        NodeKind::Directory { children, .. } => children.clone(),
        _ => return None,
    };
    children.into_iter().find(|&child| tree.get(child).info.tag == tag)
}

fn find_child_pointer_dir(tree: &Tree, dir: NodeId, tag: u16) -> Option<NodeId> {
    let children = match &tree.get(dir).kind {
        NodeKind::Directory { children, .. } => children.clone(),
        _ => return None,
    };
    for child in children {
        let component = tree.get(child);
        if component.info.tag != tag {
            continue;
        }
        if let NodeKind::SubIfd { children: inner, .. } = &component.kind {
            return inner.first().copied();
        }
    }
    None
}
