//! Hash function over field elements.
//!
//! The same hasher instance must be used to derive commitments, nullifier hashes and Merkle
//! tree nodes: the circuit recomputes all of them with a single hash function.

use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonHasher as _};

use crate::FieldElement;

/// Largest number of inputs supported by [PoseidonHasher].
pub const POSEIDON_MAX_ARITY: usize = 12;

/// Errors raised by a [FieldHasher].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    /// The hasher does not support this number of inputs.
    #[error("unsupported hash arity {arity}: expected between 1 and {max}")]
    UnsupportedArity {
        /// Number of inputs provided.
        arity: usize,
        /// Largest supported number of inputs.
        max: usize,
    },

    /// The underlying primitive reported a failure.
    #[error("hash primitive failure: {0}")]
    Primitive(String),
}

/// A deterministic, collision-resistant function from a sequence of field elements to a
/// field element.
#[cfg_attr(test, mockall::automock)]
pub trait FieldHasher: Send + Sync {
    /// Hash the given inputs.
    fn hash(&self, inputs: &[FieldElement]) -> Result<FieldElement, HashError>;
}

/// Poseidon over the BN254 scalar field, with circom compatible parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoseidonHasher;

impl PoseidonHasher {
    /// PoseidonHasher factory
    pub fn new() -> Self {
        Self
    }
}

impl FieldHasher for PoseidonHasher {
    fn hash(&self, inputs: &[FieldElement]) -> Result<FieldElement, HashError> {
        if inputs.is_empty() || inputs.len() > POSEIDON_MAX_ARITY {
            return Err(HashError::UnsupportedArity {
                arity: inputs.len(),
                max: POSEIDON_MAX_ARITY,
            });
        }

        let mut poseidon = Poseidon::<Fr>::new_circom(inputs.len())
            .map_err(|e| HashError::Primitive(e.to_string()))?;
        let scalars = inputs.iter().map(FieldElement::inner).collect::<Vec<_>>();
        let digest = poseidon
            .hash(&scalars)
            .map_err(|e| HashError::Primitive(e.to_string()))?;

        Ok(digest.into())
    }
}
