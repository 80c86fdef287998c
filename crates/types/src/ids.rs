//! Stable handles into the document node arena.
//!
//! A `NodeId` is an index into the arena that owns the node. It never owns
//! anything itself, so it can be copied freely into parent back-references,
//! grid cells and negotiation records.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_node_id_round_trips_index() {
        let id = NodeId::new(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::from(42usize), id);
        assert_eq!(id.to_string(), "#42");
    }

    #[test]
    fn test_hash_map_usage() {
        let mut map = HashMap::new();
        map.insert(NodeId::new(1), "a");
        map.insert(NodeId::new(2), "b");
        assert_eq!(map.get(&NodeId::new(2)), Some(&"b"));
    }
}
