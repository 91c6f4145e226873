//! Off-circuit evaluation of the membership statement.
//!
//! [MembershipStatement] checks the same constraints as the membership circuit, natively, and
//! can stand in for a compiled circuit: to dry-run a proof request before paying for a real
//! proof, or to exercise the pipeline in tests.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    FieldElement, FieldElementError, StdResult,
    circuit::{CircuitArtifact, Witness},
    hash::FieldHasher,
    merkle_tree::MerkleProof,
    proof_inputs::{
        CircuitInputSchema, IS_EVEN_INPUT, InputMap, InputValue, MERKLE_PROOF_INPUT,
        NULLIFIER_HASH_INPUT, NULLIFIER_INPUT, RECIPIENT_INPUT, ROOT_INPUT, SECRET_INPUT,
    },
};

/// A constraint of the membership statement is not satisfied by the inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatementViolation {
    /// An input is absent from the input map.
    #[error("missing input '{0}'")]
    MissingInput(String),

    /// An input does not have the expected shape or value type.
    #[error("malformed input '{name}': {reason}")]
    MalformedInput {
        /// Input name.
        name: String,
        /// What is wrong with the value.
        reason: String,
    },

    /// A path input does not have one entry per tree level.
    #[error("input '{name}' has length {actual}, expected {expected}")]
    WrongLength {
        /// Input name.
        name: String,
        /// Depth of the tree.
        expected: usize,
        /// Number of entries provided.
        actual: usize,
    },

    /// `nullifier_hash != hash(nullifier)`.
    #[error("nullifier hash does not match the nullifier")]
    NullifierHashMismatch,

    /// The commitment recomputed along the path does not reach the root.
    #[error("merkle root mismatch: expected {expected}, computed {computed}")]
    RootMismatch {
        /// The public root input.
        expected: FieldElement,
        /// Root recomputed from the commitment and the path.
        computed: FieldElement,
    },
}

/// Values exposed by a witness generated by [MembershipStatement].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceWitness {
    /// Merkle root.
    pub root: FieldElement,
    /// Hash of the nullifier.
    pub nullifier_hash: FieldElement,
    /// Recipient, read as a field element.
    pub recipient: FieldElement,
    /// The commitment proven to be in the tree.
    pub commitment: FieldElement,
}

impl ReferenceWitness {
    /// Public inputs in circuit order.
    pub fn public_inputs(&self) -> Vec<FieldElement> {
        vec![self.root, self.nullifier_hash, self.recipient]
    }

    /// Serialize into an opaque [Witness].
    pub fn to_witness(&self) -> StdResult<Witness> {
        let bytes = serde_json::to_vec(self)
            .with_context(|| "Could not serialize reference witness")?;

        Ok(Witness::new(bytes))
    }

    /// Read back a [Witness] produced by [MembershipStatement].
    pub fn from_witness(witness: &Witness) -> StdResult<Self> {
        serde_json::from_slice(witness.as_bytes())
            .with_context(|| "Could not deserialize reference witness")
    }
}

/// Native evaluation of the membership circuit for a tree of a fixed depth.
pub struct MembershipStatement<H: FieldHasher> {
    hasher: H,
    depth: usize,
}

impl<H: FieldHasher> MembershipStatement<H> {
    /// MembershipStatement factory
    pub fn new(hasher: H, depth: usize) -> Self {
        Self { hasher, depth }
    }

    /// Check every constraint of the statement and return the witness values.
    pub fn evaluate(&self, inputs: &InputMap) -> StdResult<ReferenceWitness> {
        let root = read_field(inputs, ROOT_INPUT)?;
        let nullifier_hash = read_field(inputs, NULLIFIER_HASH_INPUT)?;
        let recipient = read_field(inputs, RECIPIENT_INPUT)?;
        let nullifier = read_field(inputs, NULLIFIER_INPUT)?;
        let secret = read_field(inputs, SECRET_INPUT)?;
        let path_elements = read_array(inputs, MERKLE_PROOF_INPUT, self.depth)?
            .iter()
            .map(|value| parse_field(MERKLE_PROOF_INPUT, value))
            .collect::<Result<Vec<_>, _>>()?;
        let is_even = read_array(inputs, IS_EVEN_INPUT, self.depth)?
            .iter()
            .map(|value| {
                value.as_bool().ok_or_else(|| malformed(IS_EVEN_INPUT, "expected booleans"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if self.hasher.hash(&[nullifier])? != nullifier_hash {
            return Err(StatementViolation::NullifierHashMismatch.into());
        }

        let commitment = self.hasher.hash(&[nullifier, secret])?;
        let path_indices = is_even.iter().map(|is_even| !is_even).collect();
        let computed = MerkleProof::new(root, path_elements, path_indices)?
            .compute_root(commitment, &self.hasher)?;
        if computed != root {
            return Err(StatementViolation::RootMismatch {
                expected: root,
                computed,
            }
            .into());
        }

        Ok(ReferenceWitness {
            root,
            nullifier_hash,
            recipient,
            commitment,
        })
    }
}

impl<H: FieldHasher> CircuitArtifact for MembershipStatement<H> {
    fn input_schema(&self) -> CircuitInputSchema {
        CircuitInputSchema::membership(self.depth)
    }

    fn execute(&self, inputs: &InputMap) -> StdResult<Witness> {
        self.evaluate(inputs)?.to_witness()
    }
}

fn malformed(name: &str, reason: &str) -> StatementViolation {
    StatementViolation::MalformedInput {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn read_input<'a>(inputs: &'a InputMap, name: &str) -> Result<&'a InputValue, StatementViolation> {
    inputs
        .get(name)
        .ok_or_else(|| StatementViolation::MissingInput(name.to_string()))
}

fn parse_field(name: &str, value: &InputValue) -> Result<FieldElement, StatementViolation> {
    let numeral = value
        .as_field()
        .ok_or_else(|| malformed(name, "expected a field element"))?;

    numeral
        .parse()
        .map_err(|e: FieldElementError| malformed(name, &e.to_string()))
}

fn read_field(inputs: &InputMap, name: &str) -> Result<FieldElement, StatementViolation> {
    parse_field(name, read_input(inputs, name)?)
}

fn read_array<'a>(
    inputs: &'a InputMap,
    name: &str,
    expected: usize,
) -> Result<&'a [InputValue], StatementViolation> {
    let values = read_input(inputs, name)?
        .as_array()
        .ok_or_else(|| malformed(name, "expected an array"))?;
    if values.len() != expected {
        return Err(StatementViolation::WrongLength {
            name: name.to_string(),
            expected,
            actual: values.len(),
        });
    }

    Ok(values)
}
