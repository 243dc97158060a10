//! The entity domains served by the search service.

use std::fmt;

/// One independently indexed entity domain.
///
/// Every kind owns exactly one search index and one message topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    /// Network nodes.
    Nodes,
    /// Hardware units installed in nodes.
    Hardware,
    /// Street addresses (houses).
    Addresses,
}

impl IndexKind {
    /// All kinds, in the order consumers are started.
    pub const ALL: [IndexKind; 3] = [IndexKind::Nodes, IndexKind::Hardware, IndexKind::Addresses];

    /// Base name of the search index holding documents of this kind.
    pub fn index_name(&self) -> &'static str {
        match self {
            IndexKind::Nodes => "nodes",
            IndexKind::Hardware => "hardware",
            IndexKind::Addresses => "addresses",
        }
    }

    /// Name of the message topic carrying index requests for this kind.
    pub fn topic(&self) -> &'static str {
        match self {
            IndexKind::Nodes => "index-node",
            IndexKind::Hardware => "index-hardware",
            IndexKind::Addresses => "index-address",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.index_name())
    }
}
