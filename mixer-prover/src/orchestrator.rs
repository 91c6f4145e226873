use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};
use slog::{Logger, debug, info, warn};

use crate::{
    FieldElement,
    circuit::{CircuitArtifact, ProofGenerationOptions, ProvingBackend},
    configuration::ProverConfiguration,
    error::ProvingError,
    hash::FieldHasher,
    logging::ProverLogger,
    merkle_tree::MerkleTree,
    proof_inputs::ProofInputAssembler,
    proof_result::ProofResult,
};

/// A withdrawal proof request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRequest {
    /// Nullifier numeral.
    pub nullifier: String,
    /// Secret numeral.
    pub secret: String,
    /// Recipient address, forwarded to the circuit untouched.
    pub recipient: String,
    /// Every deposited commitment, in insertion order.
    pub leaves: Vec<String>,
}

impl ProofRequest {
    /// ProofRequest factory
    pub fn new<T: Into<String>>(
        nullifier: T,
        secret: T,
        recipient: T,
        leaves: Vec<String>,
    ) -> Self {
        Self {
            nullifier: nullifier.into(),
            secret: secret.into(),
            recipient: recipient.into(),
            leaves,
        }
    }
}

impl std::fmt::Debug for ProofRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofRequest")
            .field("nullifier", &"<redacted>")
            .field("secret", &"<redacted>")
            .field("recipient", &self.recipient)
            .field("leaves", &self.leaves.len())
            .finish()
    }
}

/// Turns a [ProofRequest] into a [ProofResult] by deriving the commitment, opening it in the
/// commitment tree and running the circuit and the proving backend.
pub struct ProvingOrchestrator<H: FieldHasher> {
    hasher: H,
    circuit: Arc<dyn CircuitArtifact>,
    backend: Arc<dyn ProvingBackend>,
    assembler: ProofInputAssembler,
    depth: usize,
    pad: FieldElement,
    options: ProofGenerationOptions,
    proofs: AtomicU64,
    logger: Logger,
}

impl<H: FieldHasher> ProvingOrchestrator<H> {
    /// Check that the circuit and the configuration agree and create the orchestrator.
    pub fn new(
        configuration: &ProverConfiguration,
        hasher: H,
        circuit: Arc<dyn CircuitArtifact>,
        backend: Arc<dyn ProvingBackend>,
        logger: Logger,
    ) -> Result<Self, ProvingError> {
        let logger = logger.for_component::<Self>();
        let depth = configuration.merkle_tree_depth;
        MerkleTree::capacity_of(depth)?;

        let assembler = ProofInputAssembler::new(&circuit.input_schema(), depth).inspect_err(
            |error| warn!(logger, "Circuit rejected at configuration time"; "error" => %error),
        )?;
        let pad = configuration.resolve_pad_value(&hasher)?;
        debug!(
            logger, "Orchestrator ready";
            "depth" => depth, "pad_value" => %configuration.pad_value,
            "threads" => configuration.threads, "keccak" => configuration.keccak
        );

        Ok(Self {
            hasher,
            circuit,
            backend,
            assembler,
            depth,
            pad,
            options: configuration.proof_generation_options(),
            proofs: AtomicU64::new(0),
            logger,
        })
    }

    /// Depth of the commitment tree.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Generate the withdrawal proof of `request`.
    pub fn prove(&self, request: &ProofRequest) -> Result<ProofResult, ProvingError> {
        let logger = self
            .logger
            .for_proof(self.proofs.fetch_add(1, Ordering::Relaxed));
        let result = self.run(request, &logger);
        match &result {
            Ok(proof) => info!(
                logger, "Proof generated";
                "proof_size" => proof.proof().len(),
                "public_inputs" => proof.public_inputs().len()
            ),
            Err(error) => warn!(
                logger, "Proof generation aborted";
                "kind" => %error.kind(), "error" => %error
            ),
        }

        result
    }

    fn run(&self, request: &ProofRequest, logger: &Logger) -> Result<ProofResult, ProvingError> {
        let nullifier: FieldElement = request.nullifier.parse()?;
        let secret: FieldElement = request.secret.parse()?;
        let leaves = request
            .leaves
            .iter()
            .map(|leaf| leaf.parse())
            .collect::<Result<Vec<FieldElement>, _>>()?;
        debug!(logger, "Request parsed"; "leaves" => leaves.len());

        let nullifier_hash = self.hasher.hash(&[nullifier])?;
        let commitment = self.hasher.hash(&[nullifier, secret])?;
        debug!(logger, "Commitment derived"; "nullifier_hash" => %nullifier_hash);

        let tree = MerkleTree::build(&leaves, self.depth, self.pad, &self.hasher)?;
        debug!(logger, "Commitment tree built"; "root" => %tree.root());

        let index = tree
            .index_of(&commitment)
            .ok_or(ProvingError::CommitmentNotFound {
                commitment,
                leaves: leaves.len(),
            })?;
        let proof = tree.proof(index)?;
        debug!(logger, "Commitment opened"; "leaf_index" => index);

        let inputs = self
            .assembler
            .assemble(&proof, nullifier, secret, nullifier_hash, &request.recipient);
        let witness = self
            .circuit
            .execute(&inputs.to_input_map())
            .map_err(ProvingError::WitnessGenerationFailed)?;
        debug!(logger, "Witness generated"; "witness_size" => witness.as_bytes().len());

        let generated = self
            .backend
            .generate_proof(&witness, &self.options)
            .map_err(ProvingError::ProvingFailed)?;

        Ok(ProofResult::from(generated))
    }
}
