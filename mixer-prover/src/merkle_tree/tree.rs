use crate::{FieldElement, hash::FieldHasher};

use super::{MerkleProof, MerkleTreeError};

/// Deepest tree supported, capacity must fit a `usize` index.
pub const MAX_MERKLE_TREE_DEPTH: usize = 32;

/// Fixed depth binary tree of hashes over an ordered list of leaves.
///
/// A tree of depth `D` always has `2^D` leaf slots: the slots past the last leaf hold the pad
/// value. The padded region is never materialised, each level only stores the nodes that have
/// at least one leaf below them and every other node is the root of an empty subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    /// * `levels[0]` holds the leaves, in the order they were provided,
    /// * `levels[l + 1][i]` is `hash(levels[l][2i], levels[l][2i + 1])`,
    /// * `levels[depth]` holds the root, or nothing if there is no leaf.
    levels: Vec<Vec<FieldElement>>,
    /// `empty_roots[l]` is the root of a subtree of height `l` containing only pad values.
    empty_roots: Vec<FieldElement>,
    depth: usize,
    capacity: usize,
}

impl MerkleTree {
    /// Build the tree of the given depth over `leaves`, padding the remaining slots with `pad`.
    pub fn build<H: FieldHasher + ?Sized>(
        leaves: &[FieldElement],
        depth: usize,
        pad: FieldElement,
        hasher: &H,
    ) -> Result<Self, MerkleTreeError> {
        let capacity = Self::capacity_of(depth)?;
        if leaves.len() > capacity {
            return Err(MerkleTreeError::TreeOverflow {
                capacity,
                leaves: leaves.len(),
            });
        }

        let empty_roots = compute_empty_roots(pad, depth, hasher)?;
        let mut levels = Vec::with_capacity(depth + 1);
        levels.push(leaves.to_vec());

        for level in 0..depth {
            let parents = levels[level]
                .chunks(2)
                .map(|pair| {
                    let left = pair[0];
                    let right = pair.get(1).copied().unwrap_or(empty_roots[level]);
                    hasher.hash(&[left, right])
                })
                .collect::<Result<Vec<_>, _>>()?;
            levels.push(parents);
        }

        Ok(Self {
            levels,
            empty_roots,
            depth,
            capacity,
        })
    }

    /// Number of leaf slots of a tree of the given depth.
    pub fn capacity_of(depth: usize) -> Result<usize, MerkleTreeError> {
        let unsupported = MerkleTreeError::UnsupportedDepth {
            depth,
            max: MAX_MERKLE_TREE_DEPTH,
        };
        if depth > MAX_MERKLE_TREE_DEPTH {
            return Err(unsupported);
        }

        u32::try_from(depth)
            .ok()
            .and_then(|shift| 1usize.checked_shl(shift))
            .ok_or(unsupported)
    }

    /// Get the root of the tree.
    pub fn root(&self) -> FieldElement {
        self.node(self.depth, 0)
    }

    /// Depth of the tree, also the length of every proof it produces.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of leaf slots, `2^depth`.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of leaves provided at build time, pad slots excluded.
    pub fn number_of_leaves(&self) -> usize {
        self.levels[0].len()
    }

    /// The leaves provided at build time.
    pub fn leaves(&self) -> &[FieldElement] {
        &self.levels[0]
    }

    /// Value of the unfilled leaf slots.
    pub fn pad(&self) -> FieldElement {
        self.empty_roots[0]
    }

    /// Position of the first occurrence of `leaf` among the provided leaves.
    ///
    /// Pad slots are never matched.
    pub fn index_of(&self, leaf: &FieldElement) -> Option<usize> {
        self.levels[0].iter().position(|candidate| candidate == leaf)
    }

    /// Compute the inclusion proof of the leaf slot at `index`.
    pub fn proof(&self, index: usize) -> Result<MerkleProof, MerkleTreeError> {
        if index >= self.capacity {
            return Err(MerkleTreeError::IndexOutOfRange {
                index,
                capacity: self.capacity,
            });
        }

        let mut path_elements = Vec::with_capacity(self.depth);
        let mut path_indices = Vec::with_capacity(self.depth);
        let mut current = index;

        for level in 0..self.depth {
            path_elements.push(self.node(level, current ^ 1));
            path_indices.push(current & 1 == 1);
            current >>= 1;
        }

        MerkleProof::new(self.root(), path_elements, path_indices)
    }

    fn node(&self, level: usize, index: usize) -> FieldElement {
        self.levels[level]
            .get(index)
            .copied()
            .unwrap_or(self.empty_roots[level])
    }
}

fn compute_empty_roots<H: FieldHasher + ?Sized>(
    pad: FieldElement,
    depth: usize,
    hasher: &H,
) -> Result<Vec<FieldElement>, MerkleTreeError> {
    let mut empty_roots = Vec::with_capacity(depth + 1);
    empty_roots.push(pad);

    for level in 0..depth {
        let below = empty_roots[level];
        empty_roots.push(hasher.hash(&[below, below])?);
    }

    Ok(empty_roots)
}

#[cfg(test)]
mod tests {
    use proptest::{collection::vec, prelude::*};

    use crate::hash::{HashError, MockFieldHasher, PoseidonHasher};

    use super::*;

    fn fe(value: u64) -> FieldElement {
        FieldElement::from_u64(value)
    }

    fn leaves_from(values: &[u64]) -> Vec<FieldElement> {
        values.iter().copied().map(fe).collect()
    }

    /// Reference construction hashing every level of the fully padded tree.
    fn naive_root(leaves: &[FieldElement], depth: usize, pad: FieldElement) -> FieldElement {
        let hasher = PoseidonHasher::new();
        let mut level = leaves.to_vec();
        level.resize(1 << depth, pad);
        while level.len() > 1 {
            level = level
                .chunks(2)
                .map(|pair| hasher.hash(&[pair[0], pair[1]]).unwrap())
                .collect();
        }
        level[0]
    }

    #[test]
    fn build_and_find_the_commitment_of_a_small_tree() {
        let hasher = PoseidonHasher::new();
        let commitment = hasher.hash(&[fe(3), fe(4)]).unwrap();
        let leaves = vec![fe(5), commitment, fe(17)];

        let tree = MerkleTree::build(&leaves, 2, FieldElement::zero(), &hasher).unwrap();

        assert_eq!(4, tree.capacity());
        assert_eq!(3, tree.number_of_leaves());
        assert_eq!(Some(1), tree.index_of(&commitment));

        let proof = tree.proof(1).unwrap();
        assert_eq!(2, proof.path_elements().len());
        assert_eq!(vec![true, false], proof.path_indices());
        assert_eq!(fe(5), proof.path_elements()[0]);
        assert_eq!(tree.root(), proof.root());
        assert_eq!(tree.root(), proof.compute_root(commitment, &hasher).unwrap());
    }

    #[test]
    fn padded_sibling_is_the_pad_value() {
        let hasher = PoseidonHasher::new();
        let pad = fe(99);
        let leaves = leaves_from(&[5, 9, 17]);

        let tree = MerkleTree::build(&leaves, 2, pad, &hasher).unwrap();
        let proof = tree.proof(2).unwrap();

        assert_eq!(pad, tree.pad());
        assert_eq!(pad, proof.path_elements()[0]);
        assert_eq!(
            hasher.hash(&[fe(5), fe(9)]).unwrap(),
            proof.path_elements()[1]
        );
    }

    #[test]
    fn full_tree_builds_and_overflow_is_rejected() {
        let hasher = PoseidonHasher::new();
        let full = leaves_from(&[1, 2, 3, 4, 5, 6, 7, 8]);

        MerkleTree::build(&full, 3, FieldElement::zero(), &hasher)
            .expect("a tree holding exactly 2^D leaves should build");

        let overflow = leaves_from(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let error = MerkleTree::build(&overflow, 3, FieldElement::zero(), &hasher).unwrap_err();

        assert_eq!(
            MerkleTreeError::TreeOverflow {
                capacity: 8,
                leaves: 9
            },
            error
        );
    }

    #[test]
    fn empty_leaf_set_builds_an_entirely_padded_tree() {
        let hasher = PoseidonHasher::new();

        for depth in [0, 1, 5] {
            let tree = MerkleTree::build(&[], depth, FieldElement::zero(), &hasher).unwrap();

            assert_eq!(naive_root(&[], depth, FieldElement::zero()), tree.root());
            assert_eq!(None, tree.index_of(&FieldElement::zero()));
            assert_eq!(None, tree.index_of(&fe(1)));
        }
    }

    #[test]
    fn zero_depth_tree_root_is_its_only_slot() {
        let hasher = PoseidonHasher::new();

        let tree = MerkleTree::build(&[fe(8)], 0, FieldElement::zero(), &hasher).unwrap();

        assert_eq!(fe(8), tree.root());
        assert_eq!(0, tree.proof(0).unwrap().depth());
        MerkleTree::build(&leaves_from(&[1, 2]), 0, FieldElement::zero(), &hasher)
            .expect_err("a zero depth tree holds a single leaf");
    }

    #[test]
    fn index_of_returns_the_first_duplicate() {
        let hasher = PoseidonHasher::new();
        let leaves = leaves_from(&[4, 7, 4]);

        let tree = MerkleTree::build(&leaves, 2, FieldElement::zero(), &hasher).unwrap();

        assert_eq!(Some(0), tree.index_of(&fe(4)));
        assert_eq!(None, tree.index_of(&fe(5)));
    }

    #[test]
    fn proof_rejects_indices_outside_capacity() {
        let hasher = PoseidonHasher::new();
        let tree = MerkleTree::build(&leaves_from(&[1]), 2, FieldElement::zero(), &hasher).unwrap();

        tree.proof(3).expect("padded slots can be proven");
        assert_eq!(
            MerkleTreeError::IndexOutOfRange {
                index: 4,
                capacity: 4
            },
            tree.proof(4).unwrap_err()
        );
    }

    #[test]
    fn reject_unsupported_depth() {
        let hasher = PoseidonHasher::new();

        let error =
            MerkleTree::build(&[], MAX_MERKLE_TREE_DEPTH + 1, FieldElement::zero(), &hasher)
                .unwrap_err();

        assert!(matches!(error, MerkleTreeError::UnsupportedDepth { depth: 33, .. }));
    }

    #[test]
    fn deep_sparse_tree_builds_without_materialising_the_padding() {
        let hasher = PoseidonHasher::new();
        let leaves = leaves_from(&[1, 2, 3]);

        let tree = MerkleTree::build(&leaves, 20, FieldElement::zero(), &hasher).unwrap();

        for (i, leaf) in leaves.iter().enumerate() {
            let proof = tree.proof(i).unwrap();
            assert_eq!(20, proof.depth());
            proof.verify(*leaf, &hasher).unwrap();
        }
    }

    #[test]
    fn hash_failures_are_propagated() {
        let mut hasher = MockFieldHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Err(HashError::Primitive("broken".to_string())));

        let error = MerkleTree::build(&leaves_from(&[1]), 1, FieldElement::zero(), &hasher)
            .unwrap_err();

        assert_eq!(
            MerkleTreeError::Hash(HashError::Primitive("broken".to_string())),
            error
        );
    }

    prop_compose! {
        fn arb_leaves(max_depth: usize)
                     (depth in 0..=max_depth)
                     (values in vec(any::<u64>(), 0..=(1usize << depth)), depth in Just(depth))
                     -> (Vec<FieldElement>, usize) {
            (values.into_iter().map(FieldElement::from_u64).collect(), depth)
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(30))]

        #[test]
        fn sparse_root_matches_the_fully_padded_construction(
            (leaves, depth) in arb_leaves(4),
            pad in any::<u64>()
        ) {
            let hasher = PoseidonHasher::new();
            let pad = FieldElement::from_u64(pad);

            let tree = MerkleTree::build(&leaves, depth, pad, &hasher).unwrap();

            prop_assert_eq!(naive_root(&leaves, depth, pad), tree.root());
        }

        #[test]
        fn every_slot_proof_recomputes_the_root((leaves, depth) in arb_leaves(4)) {
            let hasher = PoseidonHasher::new();
            let tree = MerkleTree::build(&leaves, depth, FieldElement::zero(), &hasher).unwrap();

            for index in 0..tree.capacity() {
                let leaf = leaves.get(index).copied().unwrap_or(FieldElement::zero());
                let proof = tree.proof(index).unwrap();
                prop_assert_eq!(index, proof.leaf_index());
                prop_assert_eq!(tree.root(), proof.compute_root(leaf, &hasher).unwrap());
            }
        }

        #[test]
        fn build_is_deterministic((leaves, depth) in arb_leaves(4)) {
            let hasher = PoseidonHasher::new();

            let first = MerkleTree::build(&leaves, depth, FieldElement::zero(), &hasher).unwrap();
            let second = MerkleTree::build(&leaves, depth, FieldElement::zero(), &hasher).unwrap();

            prop_assert_eq!(first.root(), second.root());
        }

        #[test]
        fn index_of_distinct_leaves((leaves, depth) in arb_leaves(4)) {
            let mut distinct = leaves.clone();
            distinct.sort();
            distinct.dedup();
            let hasher = PoseidonHasher::new();
            let tree = MerkleTree::build(&distinct, depth, FieldElement::zero(), &hasher).unwrap();

            for (i, leaf) in distinct.iter().enumerate() {
                prop_assert_eq!(Some(i), tree.index_of(leaf));
            }
        }
    }
}
