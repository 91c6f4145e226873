//! Mapping of the statement values to the named inputs declared by the circuit.
//!
//! This is the single place where the public/private input names must match the circuit's
//! input schema.

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{FieldElement, merkle_tree::MerkleProof};

/// Public input: Merkle root of the commitment set.
pub const ROOT_INPUT: &str = "root";
/// Public input: hash of the nullifier.
pub const NULLIFIER_HASH_INPUT: &str = "nullifier_hash";
/// Public input: address receiving the withdrawn funds.
pub const RECIPIENT_INPUT: &str = "recipient";
/// Private input: nullifier.
pub const NULLIFIER_INPUT: &str = "nullifier";
/// Private input: secret.
pub const SECRET_INPUT: &str = "secret";
/// Private input: Merkle path siblings, from leaf to root.
pub const MERKLE_PROOF_INPUT: &str = "merkle_proof";
/// Private input: Merkle path directions, `true` when the current node is a left child.
pub const IS_EVEN_INPUT: &str = "is_even";

const EXPECTED_INPUTS: [(&str, InputVisibility, bool); 7] = [
    (ROOT_INPUT, InputVisibility::Public, false),
    (NULLIFIER_HASH_INPUT, InputVisibility::Public, false),
    (RECIPIENT_INPUT, InputVisibility::Public, false),
    (NULLIFIER_INPUT, InputVisibility::Private, false),
    (SECRET_INPUT, InputVisibility::Private, false),
    (MERKLE_PROOF_INPUT, InputVisibility::Private, true),
    (IS_EVEN_INPUT, InputVisibility::Private, true),
];

/// Whether an input is revealed to the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InputVisibility {
    /// Revealed to the verifier.
    Public,
    /// Known only to the prover.
    Private,
}

/// An input parameter declared by a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitParameter {
    /// Name of the parameter.
    pub name: String,
    /// Visibility of the parameter.
    pub visibility: InputVisibility,
    /// Length of the parameter when it is a fixed size array.
    pub array_length: Option<usize>,
}

impl CircuitParameter {
    /// CircuitParameter factory
    pub fn new(name: &str, visibility: InputVisibility, array_length: Option<usize>) -> Self {
        Self {
            name: name.to_string(),
            visibility,
            array_length,
        }
    }
}

/// The inputs declared by a compiled circuit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CircuitInputSchema {
    /// Declared parameters, in declaration order.
    pub parameters: Vec<CircuitParameter>,
}

impl CircuitInputSchema {
    /// CircuitInputSchema factory
    pub fn new(parameters: Vec<CircuitParameter>) -> Self {
        Self { parameters }
    }

    /// The schema of the membership circuit for a tree of the given depth.
    pub fn membership(depth: usize) -> Self {
        Self::new(
            EXPECTED_INPUTS
                .iter()
                .map(|(name, visibility, is_path)| {
                    CircuitParameter::new(name, *visibility, is_path.then_some(depth))
                })
                .collect(),
        )
    }

    fn find(&self, name: &str) -> Option<&CircuitParameter> {
        self.parameters.iter().find(|parameter| parameter.name == name)
    }
}

/// The circuit's declared inputs differ from the inputs produced by the assembler.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaMismatchError {
    /// Expected inputs the circuit does not declare.
    pub missing: Vec<String>,
    /// Inputs declared by the circuit that the assembler does not produce.
    pub unexpected: Vec<String>,
    /// Inputs declared with the wrong visibility.
    pub wrong_visibility: Vec<String>,
    /// Inputs declared with the wrong shape: path inputs must be arrays of one entry per tree
    /// level, every other input is a single field element.
    pub wrong_shape: Vec<String>,
}

impl SchemaMismatchError {
    fn is_empty(&self) -> bool {
        self.missing.is_empty()
            && self.unexpected.is_empty()
            && self.wrong_visibility.is_empty()
            && self.wrong_shape.is_empty()
    }
}

impl Display for SchemaMismatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "circuit input schema mismatch:")?;
        for (label, names) in [
            ("missing", &self.missing),
            ("unexpected", &self.unexpected),
            ("wrong visibility", &self.wrong_visibility),
            ("wrong shape", &self.wrong_shape),
        ] {
            if !names.is_empty() {
                write!(f, " {label} [{}]", names.join(", "))?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for SchemaMismatchError {}

/// A value of the named input map handed to the circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    /// A boolean.
    Bool(bool),
    /// A field element or an opaque value, in string form.
    Field(String),
    /// A fixed size array.
    Array(Vec<InputValue>),
}

impl InputValue {
    /// The string form of a field value.
    pub fn as_field(&self) -> Option<&str> {
        match self {
            InputValue::Field(value) => Some(value),
            _ => None,
        }
    }

    /// The boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            InputValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The array items.
    pub fn as_array(&self) -> Option<&[InputValue]> {
        match self {
            InputValue::Array(values) => Some(values),
            _ => None,
        }
    }
}

impl From<FieldElement> for InputValue {
    fn from(value: FieldElement) -> Self {
        InputValue::Field(value.to_string())
    }
}

/// Named inputs of the circuit.
pub type InputMap = BTreeMap<String, InputValue>;

/// Inputs revealed to the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicInputs {
    /// Merkle root of the commitment set.
    pub root: FieldElement,
    /// Hash of the nullifier.
    pub nullifier_hash: FieldElement,
    /// Recipient address, passed through untouched.
    pub recipient: String,
}

/// Inputs known only to the prover.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateInputs {
    /// Nullifier of the commitment.
    pub nullifier: FieldElement,
    /// Secret of the commitment.
    pub secret: FieldElement,
    /// Merkle path siblings, from leaf to root.
    pub merkle_proof: Vec<FieldElement>,
    /// `true` when the current node is a left child, from leaf to root.
    pub is_even: Vec<bool>,
}

impl Debug for PrivateInputs {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateInputs")
            .field("nullifier", &"<redacted>")
            .field("secret", &"<redacted>")
            .field("merkle_proof", &self.merkle_proof)
            .field("is_even", &self.is_even)
            .finish()
    }
}

/// Full input vector of the membership circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofInputVector {
    /// Public part.
    pub public: PublicInputs,
    /// Private part.
    pub private: PrivateInputs,
}

impl ProofInputVector {
    /// Named map consumed by the circuit witness generation.
    pub fn to_input_map(&self) -> InputMap {
        let mut inputs = InputMap::new();
        inputs.insert(ROOT_INPUT.to_string(), self.public.root.into());
        inputs.insert(
            NULLIFIER_HASH_INPUT.to_string(),
            self.public.nullifier_hash.into(),
        );
        inputs.insert(
            RECIPIENT_INPUT.to_string(),
            InputValue::Field(self.public.recipient.clone()),
        );
        inputs.insert(NULLIFIER_INPUT.to_string(), self.private.nullifier.into());
        inputs.insert(SECRET_INPUT.to_string(), self.private.secret.into());
        inputs.insert(
            MERKLE_PROOF_INPUT.to_string(),
            InputValue::Array(self.private.merkle_proof.iter().copied().map(Into::into).collect()),
        );
        inputs.insert(
            IS_EVEN_INPUT.to_string(),
            InputValue::Array(self.private.is_even.iter().copied().map(InputValue::Bool).collect()),
        );
        inputs
    }
}

/// Builds the circuit input vector once the circuit's schema has been checked.
#[derive(Debug, Clone)]
pub struct ProofInputAssembler {
    depth: usize,
}

impl ProofInputAssembler {
    /// Check the circuit's declared inputs against the inputs this assembler produces.
    pub fn new(schema: &CircuitInputSchema, depth: usize) -> Result<Self, SchemaMismatchError> {
        let mut mismatch = SchemaMismatchError::default();

        for (name, visibility, is_path) in EXPECTED_INPUTS {
            match schema.find(name) {
                None => mismatch.missing.push(name.to_string()),
                Some(parameter) => {
                    if parameter.visibility != visibility {
                        mismatch.wrong_visibility.push(name.to_string());
                    }
                    let expected_length = is_path.then_some(depth);
                    if parameter.array_length != expected_length {
                        mismatch.wrong_shape.push(name.to_string());
                    }
                }
            }
        }
        mismatch.unexpected = schema
            .parameters
            .iter()
            .filter(|parameter| !EXPECTED_INPUTS.iter().any(|(name, ..)| *name == parameter.name))
            .map(|parameter| parameter.name.clone())
            .collect();

        if !mismatch.is_empty() {
            return Err(mismatch);
        }

        Ok(Self { depth })
    }

    /// Depth of the tree the circuit was compiled for.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Map the statement values to the circuit input vector.
    pub fn assemble(
        &self,
        proof: &MerkleProof,
        nullifier: FieldElement,
        secret: FieldElement,
        nullifier_hash: FieldElement,
        recipient: &str,
    ) -> ProofInputVector {
        ProofInputVector {
            public: PublicInputs {
                root: proof.root(),
                nullifier_hash,
                recipient: recipient.to_string(),
            },
            private: PrivateInputs {
                nullifier,
                secret,
                merkle_proof: proof.path_elements().to_vec(),
                is_even: proof.is_even(),
            },
        }
    }
}
