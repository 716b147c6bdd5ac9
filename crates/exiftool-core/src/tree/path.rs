//! PathFactory: given a target `(tag, group)`, compute the ordered chain of
//! pointer tags from the tree root down to where a node for that tag must
//! be grafted. Used by the Encoder's intrusive `add()` path and by the
//! Copier when an image tag has no counterpart yet in the destination tree.
//!
//! The tag-to-node-kind mapping is vendor/format data (owned by
//! [`super::traits::TagRegistry`]); the *structural* question of which
//! pointer tag opens which child group is TIFF/Exif knowledge and lives
//! here as a static table, independent of any one vendor's tag dictionary.

use super::component::GroupId;
use super::traits::PathStep;

/// One entry of the static group hierarchy: `group` is reached from
/// `parent` by following `pointer_tag` (a SubIfd- or MakerNote-kind entry
/// in `parent`).
#[derive(Debug, Clone, Copy)]
pub struct GroupLink {
    pub group: GroupId,
    pub parent: GroupId,
    pub pointer_tag: u16,
}

/// Standard Exif group topology: IFD0 is the root (group 0); ExifIFD and
/// GPSIFD hang off IFD0; InteropIFD hangs off ExifIFD; a vendor MakerNote
/// group hangs off ExifIFD via `0x927c`. Callers that introduce additional
/// SubIfd groups (RAW container pages, extra maker-note islands) extend
/// this table with their own [`GroupLink`]s.
pub const STANDARD_HIERARCHY: &[GroupLink] = &[
    GroupLink { group: GROUP_EXIF_IFD, parent: GROUP_IFD0, pointer_tag: 0x8769 },
    GroupLink { group: GROUP_GPS_IFD, parent: GROUP_IFD0, pointer_tag: 0x8825 },
    GroupLink { group: GROUP_INTEROP_IFD, parent: GROUP_EXIF_IFD, pointer_tag: 0xA005 },
    GroupLink { group: GROUP_MAKER_NOTES, parent: GROUP_EXIF_IFD, pointer_tag: 0x927C },
];

pub const GROUP_IFD0: GroupId = 0;
pub const GROUP_IFD1: GroupId = 1;
pub const GROUP_EXIF_IFD: GroupId = 2;
pub const GROUP_GPS_IFD: GroupId = 3;
pub const GROUP_INTEROP_IFD: GroupId = 4;
pub const GROUP_MAKER_NOTES: GroupId = 5;

/// Walk `hierarchy` up from `group` to the root, then reverse it into a
/// root-to-leaf path, appending the final `(tag, group)` step. Returns just
/// the final step if `group` is not found in `hierarchy` (it is already the
/// root group, e.g. IFD0 or IFD1).
pub fn compute_path(hierarchy: &[GroupLink], tag: u16, group: GroupId) -> Vec<PathStep> {
    let mut chain = Vec::new();
    let mut current = group;
    while let Some(link) = hierarchy.iter().find(|l| l.group == current) {
        chain.push(PathStep { tag: link.pointer_tag, group: link.parent });
        current = link.parent;
    }
    chain.reverse();
    chain.push(PathStep { tag, group });
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_to_ifd0_is_direct() {
        let path = compute_path(STANDARD_HIERARCHY, 0x010F, GROUP_IFD0);
        assert_eq!(path, vec![PathStep { tag: 0x010F, group: GROUP_IFD0 }]);
    }

    #[test]
    fn path_to_exif_ifd_goes_through_pointer() {
        let path = compute_path(STANDARD_HIERARCHY, 0x829A, GROUP_EXIF_IFD);
        assert_eq!(
            path,
            vec![
                PathStep { tag: 0x8769, group: GROUP_IFD0 },
                PathStep { tag: 0x829A, group: GROUP_EXIF_IFD },
            ]
        );
    }

    #[test]
    fn path_to_interop_nests_two_pointers() {
        let path = compute_path(STANDARD_HIERARCHY, 0x0001, GROUP_INTEROP_IFD);
        assert_eq!(
            path,
            vec![
                PathStep { tag: 0x8769, group: GROUP_IFD0 },
                PathStep { tag: 0xA005, group: GROUP_EXIF_IFD },
                PathStep { tag: 0x0001, group: GROUP_INTEROP_IFD },
            ]
        );
    }
}
