//! Graph entities of an island map
//!
//! Regions, corners and edges live in arenas owned by [`crate::Map`] and refer
//! to each other by index. Rivers, lakes and canyons are ordered groups of
//! region indices produced by the carving passes.

mod canyon;
mod corner;
mod edge;
mod lake;
mod region;
mod river;

pub use canyon::{Canyon, CanyonNode};
pub use corner::{Corner, CornerFlags};
pub use edge::Edge;
pub use lake::Lake;
pub use region::{Attribute, AttributeKind, Region, RegionFlags, RiverAttribute};
pub use river::{River, RiverNode};

/// Index of a [`Region`] in its map
pub type RegionId = usize;

/// Index of a [`Corner`] in its map
pub type CornerId = usize;

/// Index of an [`Edge`] in its map
pub type EdgeId = usize;

/// Append `id` unless the list already holds it
#[inline]
pub(crate) fn push_unique(list: &mut Vec<usize>, id: usize) {
    if !list.contains(&id) {
        list.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_unique() {
        let mut list = vec![3, 1];
        push_unique(&mut list, 1);
        push_unique(&mut list, 2);
        push_unique(&mut list, 3);
        assert_eq!(list, vec![3, 1, 2]);
    }
}
