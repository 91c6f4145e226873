use crate::{FieldElement, hash::HashError};

/// Error types related to merkle trees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MerkleTreeError {
    /// The leaf set does not fit in a tree of the configured depth.
    #[error("tree overflow: {leaves} leaves do not fit in a tree of capacity {capacity}")]
    TreeOverflow {
        /// Number of leaf slots of the tree.
        capacity: usize,
        /// Number of leaves provided.
        leaves: usize,
    },

    /// The requested leaf index is outside `[0, capacity)`.
    #[error("index {index} is out of range for a tree of capacity {capacity}")]
    IndexOutOfRange {
        /// Requested leaf index.
        index: usize,
        /// Number of leaf slots of the tree.
        capacity: usize,
    },

    /// The configured depth exceeds the supported maximum.
    #[error("unsupported merkle tree depth {depth}: maximum is {max}")]
    UnsupportedDepth {
        /// Configured depth.
        depth: usize,
        /// Deepest supported tree.
        max: usize,
    },

    /// Invalid merkle path
    #[error("path does not verify against root: expected {expected}, computed {computed}")]
    PathInvalid {
        /// Root carried by the proof.
        expected: FieldElement,
        /// Root recomputed from the leaf.
        computed: FieldElement,
    },

    /// A path does not have one direction bit per sibling.
    #[error("malformed merkle path: {path_elements} siblings but {path_indices} direction bits")]
    PathLengthMismatch {
        /// Number of siblings.
        path_elements: usize,
        /// Number of direction bits.
        path_indices: usize,
    },

    /// Hashing a node failed.
    #[error(transparent)]
    Hash(#[from] HashError),
}
