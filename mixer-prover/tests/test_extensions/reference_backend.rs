use std::sync::Mutex;

use mixer_prover::{
    StdResult,
    circuit::{GeneratedProof, ProofGenerationOptions, ProvingBackend, Witness},
    off_circuit::ReferenceWitness,
};

/// A backend "proving" witnesses of the off-circuit membership statement.
///
/// The proof is the witness itself and the public inputs are read back from it.
#[derive(Default)]
pub struct ReferenceProvingBackend {
    received_options: Mutex<Vec<ProofGenerationOptions>>,
}

impl ReferenceProvingBackend {
    pub fn received_options(&self) -> Vec<ProofGenerationOptions> {
        self.received_options.lock().unwrap().clone()
    }
}

impl ProvingBackend for ReferenceProvingBackend {
    fn generate_proof(
        &self,
        witness: &Witness,
        options: &ProofGenerationOptions,
    ) -> StdResult<GeneratedProof> {
        self.received_options.lock().unwrap().push(*options);
        let reference = ReferenceWitness::from_witness(witness)?;

        Ok(GeneratedProof {
            proof: witness.as_bytes().to_vec(),
            public_inputs: reference
                .public_inputs()
                .iter()
                .map(|value| value.to_bytes_be())
                .collect(),
        })
    }
}
