use mixer_prover::{FIELD_ELEMENT_BYTES, FieldElement, FieldHasher, ProofRequest};
use rand_chacha::ChaCha20Rng;
use rand_core::RngCore;

/// The secrets of a deposit.
#[derive(Debug, Clone, Copy)]
pub struct Note {
    pub nullifier: FieldElement,
    pub secret: FieldElement,
}

impl Note {
    pub fn random(rng: &mut ChaCha20Rng) -> Self {
        Self {
            nullifier: random_field_element(rng),
            secret: random_field_element(rng),
        }
    }

    pub fn commitment<H: FieldHasher>(&self, hasher: &H) -> FieldElement {
        hasher.hash(&[self.nullifier, self.secret]).unwrap()
    }

    pub fn nullifier_hash<H: FieldHasher>(&self, hasher: &H) -> FieldElement {
        hasher.hash(&[self.nullifier]).unwrap()
    }

    /// A withdrawal request of this note, the nullifier in decimal and the secret in hex.
    pub fn withdrawal(&self, recipient: &str, leaves: &[FieldElement]) -> ProofRequest {
        ProofRequest::new(
            self.nullifier.to_decimal_string(),
            self.secret.to_string(),
            recipient.to_string(),
            leaves.iter().map(|leaf| leaf.to_decimal_string()).collect(),
        )
    }
}

/// Deposits in insertion order.
pub struct DepositPool {
    pub notes: Vec<Note>,
    pub leaves: Vec<FieldElement>,
}

impl DepositPool {
    pub fn random<H: FieldHasher>(size: usize, rng: &mut ChaCha20Rng, hasher: &H) -> Self {
        let notes = (0..size).map(|_| Note::random(rng)).collect::<Vec<_>>();
        let leaves = notes.iter().map(|note| note.commitment(hasher)).collect();

        Self { notes, leaves }
    }
}

/// A uniformly random value below 2^248, always lower than the field modulus.
pub fn random_field_element(rng: &mut ChaCha20Rng) -> FieldElement {
    let mut bytes = [0u8; FIELD_ELEMENT_BYTES];
    rng.fill_bytes(&mut bytes[1..]);

    FieldElement::from_bytes_be(&bytes).unwrap()
}
