use alloy_primitives::{B256, Bytes};
use alloy_sol_types::SolValue;
use anyhow::Context;

use crate::{StdResult, circuit::GeneratedProof};

/// A proof ready to be submitted to the verifier contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofResult {
    proof: Bytes,
    public_inputs: Vec<B256>,
}

impl ProofResult {
    /// ProofResult factory
    pub fn new(proof: Vec<u8>, public_inputs: Vec<[u8; 32]>) -> Self {
        Self {
            proof: Bytes::from(proof),
            public_inputs: public_inputs.into_iter().map(B256::from).collect(),
        }
    }

    /// Serialized proof.
    pub fn proof(&self) -> &[u8] {
        &self.proof
    }

    /// Public inputs, in circuit order.
    pub fn public_inputs(&self) -> &[B256] {
        &self.public_inputs
    }

    /// ABI encoding of the `(bytes, bytes32[])` parameter list.
    pub fn abi_encode(&self) -> Vec<u8> {
        (self.proof.clone(), self.public_inputs.clone()).abi_encode_params()
    }

    /// `0x` prefixed hexadecimal form of [Self::abi_encode].
    pub fn encode_hex(&self) -> String {
        format!("0x{}", hex::encode(self.abi_encode()))
    }

    /// Decode a `(bytes, bytes32[])` parameter list.
    pub fn abi_decode(bytes: &[u8]) -> StdResult<Self> {
        let (proof, public_inputs) = <(Bytes, Vec<B256>)>::abi_decode_params(bytes)
            .with_context(|| "Could not decode (bytes, bytes32[]) proof result")?;

        Ok(Self {
            proof,
            public_inputs,
        })
    }
}

impl From<GeneratedProof> for ProofResult {
    fn from(generated: GeneratedProof) -> Self {
        Self::new(generated.proof, generated.public_inputs)
    }
}
