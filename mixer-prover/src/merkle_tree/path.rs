use serde::{Deserialize, Serialize};

use crate::{FieldElement, hash::FieldHasher};

use super::MerkleTreeError;

/// Inclusion proof of a leaf in a [MerkleTree][super::MerkleTree].
///
/// A proof always carries one direction bit per sibling, deserialization included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedMerkleProof")]
pub struct MerkleProof {
    root: FieldElement,
    /// Sibling of the current node at each level, from the leaf level up to the root.
    path_elements: Vec<FieldElement>,
    /// At each level, `false` if the current node is a left (even) child and `true` if it is
    /// a right (odd) child.
    path_indices: Vec<bool>,
}

#[derive(Deserialize)]
struct UncheckedMerkleProof {
    root: FieldElement,
    path_elements: Vec<FieldElement>,
    path_indices: Vec<bool>,
}

impl TryFrom<UncheckedMerkleProof> for MerkleProof {
    type Error = MerkleTreeError;

    fn try_from(unchecked: UncheckedMerkleProof) -> Result<Self, Self::Error> {
        Self::new(
            unchecked.root,
            unchecked.path_elements,
            unchecked.path_indices,
        )
    }
}

impl MerkleProof {
    /// MerkleProof factory
    pub fn new(
        root: FieldElement,
        path_elements: Vec<FieldElement>,
        path_indices: Vec<bool>,
    ) -> Result<Self, MerkleTreeError> {
        let proof = Self {
            root,
            path_elements,
            path_indices,
        };
        proof.check_lengths()?;

        Ok(proof)
    }

    /// Root of the tree the proof was generated from.
    pub fn root(&self) -> FieldElement {
        self.root
    }

    /// Siblings from the leaf level up to the root.
    pub fn path_elements(&self) -> &[FieldElement] {
        &self.path_elements
    }

    /// Direction bits, `true` when the current node is a right child.
    pub fn path_indices(&self) -> &[bool] {
        &self.path_indices
    }

    /// Direction bits as consumed by the circuit: `true` when the current node is a left child.
    pub fn is_even(&self) -> Vec<bool> {
        self.path_indices.iter().map(|is_right| !is_right).collect()
    }

    /// Number of levels of the proof, equal to the depth of the tree.
    pub fn depth(&self) -> usize {
        self.path_elements.len()
    }

    /// Position of the leaf in the tree, read back from the direction bits.
    pub fn leaf_index(&self) -> usize {
        self.path_indices
            .iter()
            .rev()
            .fold(0, |index, is_right| (index << 1) | usize::from(*is_right))
    }

    /// Recompute the root from `leaf` by hashing up the path.
    pub fn compute_root<H: FieldHasher + ?Sized>(
        &self,
        leaf: FieldElement,
        hasher: &H,
    ) -> Result<FieldElement, MerkleTreeError> {
        self.check_lengths()?;

        let root = self.path_elements.iter().zip(&self.path_indices).try_fold(
            leaf,
            |current, (sibling, is_right)| {
                if *is_right {
                    hasher.hash(&[*sibling, current])
                } else {
                    hasher.hash(&[current, *sibling])
                }
            },
        )?;

        Ok(root)
    }

    /// Check that `leaf` is committed under the proof's root.
    pub fn verify<H: FieldHasher + ?Sized>(
        &self,
        leaf: FieldElement,
        hasher: &H,
    ) -> Result<(), MerkleTreeError> {
        let computed = self.compute_root(leaf, hasher)?;
        if computed != self.root {
            return Err(MerkleTreeError::PathInvalid {
                expected: self.root,
                computed,
            });
        }

        Ok(())
    }

    fn check_lengths(&self) -> Result<(), MerkleTreeError> {
        if self.path_elements.len() != self.path_indices.len() {
            return Err(MerkleTreeError::PathLengthMismatch {
                path_elements: self.path_elements.len(),
                path_indices: self.path_indices.len(),
            });
        }

        Ok(())
    }
}
