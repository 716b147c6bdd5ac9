//! Finder: a by-key lookup traversal, used wherever the Decoder/Encoder
//! need to resolve a cross-reference (e.g. recovering `Make` before maker
//! -note dispatch, or locating the makernote wrapper for the byte-order
//! post-pass) without threading an index through the whole tree.

use super::component::{NodeId, Tree};
use super::visitor::{Gates, Visitor};

pub struct Finder {
    tag: u16,
    group: u16,
    found: Option<NodeId>,
    gates: Gates,
}

impl Finder {
    pub fn new(tag: u16, group: u16) -> Self {
        Self { tag, group, found: None, gates: Gates::default() }
    }

    /// Run the finder over `tree`, returning the first matching node (in
    /// traversal order) if any.
    pub fn find(tree: &mut Tree, tag: u16, group: u16) -> Option<NodeId> {
        let mut finder = Finder::new(tag, group);
        tree.walk(&mut finder);
        finder.found
    }

    fn check(&mut self, tree: &mut Tree, id: NodeId) {
        let info = &tree.get(id).info;
        if info.tag == self.tag && info.group == self.group {
            self.found = Some(id);
            self.gates.traverse = false;
        }
    }
}

impl Visitor for Finder {
    fn gates(&self) -> Gates {
        self.gates
    }

    fn gates_mut(&mut self) -> &mut Gates {
        &mut self.gates
    }

    fn visit_entry(&mut self, tree: &mut Tree, id: NodeId) {
        self.check(tree, id);
    }

    fn visit_data_entry(&mut self, tree: &mut Tree, id: NodeId) {
        self.check(tree, id);
    }

    fn visit_image_entry(&mut self, tree: &mut Tree, id: NodeId) {
        self.check(tree, id);
    }

    fn visit_size_entry(&mut self, tree: &mut Tree, id: NodeId) {
        self.check(tree, id);
    }

    fn visit_sub_ifd(&mut self, tree: &mut Tree, id: NodeId) {
        self.check(tree, id);
    }

    fn visit_mn_entry(&mut self, tree: &mut Tree, id: NodeId) {
        self.check(tree, id);
    }

    fn visit_binary_array(&mut self, tree: &mut Tree, id: NodeId) {
        self.check(tree, id);
    }

    fn visit_binary_element(&mut self, tree: &mut Tree, id: NodeId) {
        self.check(tree, id);
    }
}
