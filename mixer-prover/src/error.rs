use crate::{
    FieldElement, FieldElementError, StdError,
    hash::HashError,
    merkle_tree::MerkleTreeError,
    proof_inputs::SchemaMismatchError,
};

/// Who is responsible for a [ProvingError].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ProvingErrorKind {
    /// The caller supplied malformed values.
    InvalidInput,
    /// The caller's secrets do not open any known commitment.
    InvalidProofAttempt,
    /// The prover is deployed with settings that disagree with the circuit.
    Misconfiguration,
    /// A broken internal invariant.
    InternalInvariant,
    /// The circuit or the proving backend failed.
    BackendFault,
}

/// Errors aborting a proof generation.
#[derive(Debug, thiserror::Error)]
pub enum ProvingError {
    /// A numeral of the request is not a valid field element.
    #[error("invalid field element in proof request")]
    InvalidFieldElement(#[source] FieldElementError),

    /// The hasher could not hash the commitment or nullifier values.
    #[error("hashing failed")]
    Hash(#[source] HashError),

    /// The Merkle tree could not be built or opened.
    #[error("merkle tree error")]
    MerkleTree(#[source] MerkleTreeError),

    /// The commitment derived from the secrets is not in the leaf set.
    #[error("commitment {commitment} not found among the {leaves} known commitments")]
    CommitmentNotFound {
        /// Commitment derived from the nullifier and the secret.
        commitment: FieldElement,
        /// Number of known commitments.
        leaves: usize,
    },

    /// The circuit declares inputs that differ from the assembled ones.
    #[error("circuit input schema does not match the proof inputs")]
    SchemaMismatch(#[source] SchemaMismatchError),

    /// The circuit rejected the inputs.
    #[error("witness generation failed")]
    WitnessGenerationFailed(#[source] StdError),

    /// The proving backend failed.
    #[error("proof generation failed")]
    ProvingFailed(#[source] StdError),
}

impl ProvingError {
    /// Classify the error.
    pub fn kind(&self) -> ProvingErrorKind {
        match self {
            ProvingError::InvalidFieldElement(_) => ProvingErrorKind::InvalidInput,
            ProvingError::Hash(_) => ProvingErrorKind::Misconfiguration,
            ProvingError::MerkleTree(MerkleTreeError::IndexOutOfRange { .. })
            | ProvingError::MerkleTree(MerkleTreeError::PathInvalid { .. })
            | ProvingError::MerkleTree(MerkleTreeError::PathLengthMismatch { .. }) => {
                ProvingErrorKind::InternalInvariant
            }
            ProvingError::MerkleTree(_) => ProvingErrorKind::Misconfiguration,
            ProvingError::CommitmentNotFound { .. } => ProvingErrorKind::InvalidProofAttempt,
            ProvingError::SchemaMismatch(_) => ProvingErrorKind::Misconfiguration,
            ProvingError::WitnessGenerationFailed(_) | ProvingError::ProvingFailed(_) => {
                ProvingErrorKind::BackendFault
            }
        }
    }
}

impl From<FieldElementError> for ProvingError {
    fn from(error: FieldElementError) -> Self {
        ProvingError::InvalidFieldElement(error)
    }
}

impl From<HashError> for ProvingError {
    fn from(error: HashError) -> Self {
        ProvingError::Hash(error)
    }
}

impl From<MerkleTreeError> for ProvingError {
    fn from(error: MerkleTreeError) -> Self {
        match error {
            MerkleTreeError::Hash(hash_error) => ProvingError::Hash(hash_error),
            other => ProvingError::MerkleTree(other),
        }
    }
}

impl From<SchemaMismatchError> for ProvingError {
    fn from(error: SchemaMismatchError) -> Self {
        ProvingError::SchemaMismatch(error)
    }
}
