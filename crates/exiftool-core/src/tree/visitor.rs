//! The traversal framework: a double-dispatch [`Visitor`] trait plus the
//! `go_`-array-equivalent [`Gates`] that visit callbacks flip to prune a
//! walk in progress.

use super::component::{Component, NodeId, NodeKind, Tree};

/// Scoped traversal flags. `traverse` is checked by [`walk_node`] between
/// children of the same directory so a visitor can cut a walk short (e.g.
/// the [`super::finder::Finder`] clears it the moment it finds its target);
/// `known_makernote` records whether the last maker-note header parsed
/// successfully, read by the Reader's own `visit_mn_entry`.
#[derive(Debug, Clone, Copy)]
pub struct Gates {
    pub traverse: bool,
    pub known_makernote: bool,
}

impl Default for Gates {
    fn default() -> Self {
        Self {
            traverse: true,
            known_makernote: true,
        }
    }
}

/// One visit method per node kind, each defaulted to a no-op, plus
/// bracket-scoped `_end` callbacks for the three kinds that carry scoped
/// state (Directory's child list, IfdMakernote's byte order/base offset,
/// BinaryArray's decrypted buffer).
#[allow(unused_variables)]
pub trait Visitor {
    fn gates(&self) -> Gates;
    fn gates_mut(&mut self) -> &mut Gates;

    fn visit_directory(&mut self, tree: &mut Tree, id: NodeId) {}
    fn visit_directory_end(&mut self, tree: &mut Tree, id: NodeId) {}
    fn visit_entry(&mut self, tree: &mut Tree, id: NodeId) {}
    fn visit_data_entry(&mut self, tree: &mut Tree, id: NodeId) {}
    fn visit_image_entry(&mut self, tree: &mut Tree, id: NodeId) {}
    fn visit_size_entry(&mut self, tree: &mut Tree, id: NodeId) {}
    fn visit_sub_ifd(&mut self, tree: &mut Tree, id: NodeId) {}
    fn visit_mn_entry(&mut self, tree: &mut Tree, id: NodeId) {}
    fn visit_ifd_makernote(&mut self, tree: &mut Tree, id: NodeId) {}
    fn visit_ifd_makernote_end(&mut self, tree: &mut Tree, id: NodeId) {}
    fn visit_binary_array(&mut self, tree: &mut Tree, id: NodeId) {}
    fn visit_binary_array_end(&mut self, tree: &mut Tree, id: NodeId) {}
    fn visit_binary_element(&mut self, tree: &mut Tree, id: NodeId) {}
}

/// Dispatches one node to the matching `visit_*` method, then (gates
/// permitting) descends into its children.
pub fn walk_node<V: Visitor>(tree: &mut Tree, id: NodeId, visitor: &mut V) {
    if !visitor.gates().traverse {
        return;
    }

    let kind_tag = component_tag(tree.get(id));
    match kind_tag {
        KindTag::Directory => {
            visitor.visit_directory(tree, id);
            if visitor.gates().traverse {
                let children = directory_children(tree, id);
                for child in children {
                    walk_node(tree, child, visitor);
                    if !visitor.gates().traverse {
                        break;
                    }
                }
                let next = directory_next(tree, id);
                if let Some(next_id) = next {
                    if visitor.gates().traverse {
                        walk_node(tree, next_id, visitor);
                    }
                }
            }
            visitor.visit_directory_end(tree, id);
        }
        KindTag::Entry => visitor.visit_entry(tree, id),
        KindTag::DataEntry => visitor.visit_data_entry(tree, id),
        KindTag::ImageEntry => visitor.visit_image_entry(tree, id),
        KindTag::SizeEntry => visitor.visit_size_entry(tree, id),
        KindTag::SubIfd => {
            visitor.visit_sub_ifd(tree, id);
            if visitor.gates().traverse {
                let children = sub_ifd_children(tree, id);
                for child in children {
                    walk_node(tree, child, visitor);
                    if !visitor.gates().traverse {
                        break;
                    }
                }
            }
        }
        KindTag::MnEntry => {
            visitor.visit_mn_entry(tree, id);
            if visitor.gates().traverse {
                if let Some(mn) = mn_entry_child(tree, id) {
                    walk_node(tree, mn, visitor);
                }
            }
        }
        KindTag::IfdMakernote => {
            visitor.visit_ifd_makernote(tree, id);
            if visitor.gates().traverse && visitor.gates().known_makernote {
                let inner = ifd_makernote_child(tree, id);
                walk_node(tree, inner, visitor);
            }
            visitor.visit_ifd_makernote_end(tree, id);
        }
        KindTag::BinaryArray => {
            visitor.visit_binary_array(tree, id);
            if visitor.gates().traverse {
                let elements = binary_array_children(tree, id);
                for child in elements {
                    walk_node(tree, child, visitor);
                    if !visitor.gates().traverse {
                        break;
                    }
                }
            }
            visitor.visit_binary_array_end(tree, id);
        }
        KindTag::BinaryElement => visitor.visit_binary_element(tree, id),
    }
}

enum KindTag {
    Directory,
    Entry,
    DataEntry,
    ImageEntry,
    SizeEntry,
    SubIfd,
    MnEntry,
    IfdMakernote,
    BinaryArray,
    BinaryElement,
}

fn component_tag(c: &Component<'_>) -> KindTag {
    match &c.kind {
        NodeKind::Directory { .. } => KindTag::Directory,
        NodeKind::Entry => KindTag::Entry,
        NodeKind::DataEntry { .. } => KindTag::DataEntry,
        NodeKind::ImageEntry { .. } => KindTag::ImageEntry,
        NodeKind::SizeEntry { .. } => KindTag::SizeEntry,
        NodeKind::SubIfd { .. } => KindTag::SubIfd,
        NodeKind::MnEntry { .. } => KindTag::MnEntry,
        NodeKind::IfdMakernote { .. } => KindTag::IfdMakernote,
        NodeKind::BinaryArray { .. } => KindTag::BinaryArray,
        NodeKind::BinaryElement { .. } => KindTag::BinaryElement,
    }
}

fn directory_children(tree: &Tree, id: NodeId) -> Vec<NodeId> {
    match &tree.get(id).kind {
        NodeKind::Directory { children, .. } => children.clone(),
        _ => Vec::new(),
    }
}

fn directory_next(tree: &Tree, id: NodeId) -> Option<NodeId> {
    match &tree.get(id).kind {
        NodeKind::Directory { next, .. } => *next,
        _ => None,
    }
}

fn sub_ifd_children(tree: &Tree, id: NodeId) -> Vec<NodeId> {
    match &tree.get(id).kind {
        NodeKind::SubIfd { children, .. } => children.clone(),
        _ => Vec::new(),
    }
}

fn mn_entry_child(tree: &Tree, id: NodeId) -> Option<NodeId> {
    match &tree.get(id).kind {
        NodeKind::MnEntry { makernote } => *makernote,
        _ => None,
    }
}

fn ifd_makernote_child(tree: &Tree, id: NodeId) -> NodeId {
    match &tree.get(id).kind {
        NodeKind::IfdMakernote { ifd, .. } => *ifd,
        _ => unreachable!("ifd_makernote_child called on non-IfdMakernote node"),
    }
}

fn binary_array_children(tree: &Tree, id: NodeId) -> Vec<NodeId> {
    match &tree.get(id).kind {
        NodeKind::BinaryArray { elements, .. } => elements.clone(),
        _ => Vec::new(),
    }
}
