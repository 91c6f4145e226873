//! Seams with the external proving collaborators: the compiled circuit and the proving backend.

use serde::{Deserialize, Serialize};

use crate::{
    StdResult,
    proof_inputs::{CircuitInputSchema, InputMap},
};

/// Satisfying assignment of a circuit, opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Witness(Vec<u8>);

impl Witness {
    /// Witness factory
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Serialized witness.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Options forwarded to the proving backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofGenerationOptions {
    /// Number of threads the backend may use.
    pub threads: usize,
    /// Use a Keccak based transcript so that the proof can be verified on-chain.
    pub keccak: bool,
}

impl Default for ProofGenerationOptions {
    fn default() -> Self {
        Self {
            threads: 1,
            keccak: true,
        }
    }
}

/// Output of a proving backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProof {
    /// Serialized proof.
    pub proof: Vec<u8>,
    /// Public inputs of the statement, in circuit order, as 32 bytes words.
    pub public_inputs: Vec<[u8; 32]>,
}

/// A compiled circuit: its input schema and its witness generation.
#[cfg_attr(test, mockall::automock)]
pub trait CircuitArtifact: Send + Sync {
    /// Inputs declared by the circuit.
    fn input_schema(&self) -> CircuitInputSchema;

    /// Execute the circuit on the named inputs, failing if a constraint is not satisfied.
    fn execute(&self, inputs: &InputMap) -> StdResult<Witness>;
}

/// A proving system producing a proof from a witness.
#[cfg_attr(test, mockall::automock)]
pub trait ProvingBackend: Send + Sync {
    /// Generate the proof of the statement satisfied by `witness`.
    fn generate_proof(
        &self,
        witness: &Witness,
        options: &ProofGenerationOptions,
    ) -> StdResult<GeneratedProof>;
}
