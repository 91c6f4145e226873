#![warn(missing_docs)]
//! Proving core of a fixed-denomination mixer withdrawal.
//!
//! A depositor committed `hash(nullifier, secret)` in a fixed depth Merkle tree of deposits. To
//! withdraw, they prove in zero knowledge that they know the opening of one of the leaves and
//! reveal the hash of the nullifier so the same deposit cannot be withdrawn twice. This crate
//! rebuilds the commitment tree, opens the depositor's leaf, assembles the circuit inputs and
//! drives a [CircuitArtifact][circuit::CircuitArtifact] and a
//! [ProvingBackend][circuit::ProvingBackend] to get a proof ABI-encoded for a verifier contract.
//!
//! ```
//! use mixer_prover::{FieldElement, FieldHasher, MerkleTree, PoseidonHasher};
//!
//! # fn main() -> mixer_prover::StdResult<()> {
//! let hasher = PoseidonHasher::new();
//! let nullifier: FieldElement = "3".parse()?;
//! let secret: FieldElement = "0x04".parse()?;
//! let commitment = hasher.hash(&[nullifier, secret])?;
//! let leaves = vec![FieldElement::from_u64(5), commitment, FieldElement::from_u64(17)];
//!
//! let tree = MerkleTree::build(&leaves, 2, FieldElement::zero(), &hasher)?;
//! let index = tree.index_of(&commitment).expect("commitment was deposited");
//! let proof = tree.proof(index)?;
//!
//! assert_eq!(1, index);
//! assert_eq!(2, proof.path_elements().len());
//! assert_eq!(tree.root(), proof.compute_root(commitment, &hasher)?);
//! # Ok(())
//! # }
//! ```

pub mod circuit;
mod configuration;
mod error;
mod field_element;
pub mod hash;
pub mod logging;
pub mod merkle_tree;
pub mod off_circuit;
mod orchestrator;
pub mod proof_inputs;
mod proof_result;

pub use configuration::{DefaultConfiguration, ProverConfiguration};
pub use error::{ProvingError, ProvingErrorKind};
pub use field_element::{FIELD_ELEMENT_BYTES, FieldElement, FieldElementError};
pub use hash::{FieldHasher, PoseidonHasher};
pub use merkle_tree::{MerkleProof, MerkleTree, PadValue};
pub use orchestrator::{ProofRequest, ProvingOrchestrator};
pub use proof_inputs::{ProofInputAssembler, ProofInputVector};
pub use proof_result::ProofResult;

/// Generic error type
pub type StdError = anyhow::Error;

/// Generic result type
pub type StdResult<T> = anyhow::Result<T, StdError>;
