use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{
    FieldElement, FieldElementError,
    hash::{FieldHasher, HashError},
};

/// Value filling the leaf slots that are not occupied by a commitment.
///
/// It must be the value the circuit's own test vectors were generated with, otherwise the
/// computed roots can not be verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, SerializeDisplay, DeserializeFromStr)]
pub enum PadValue {
    /// The zero field element.
    #[default]
    Zero,
    /// The hash of the single input `[0]`.
    HashOfZero,
    /// An explicit field element.
    Custom(FieldElement),
}

impl PadValue {
    /// Compute the field element used as pad with the given hasher.
    pub fn resolve<H: FieldHasher + ?Sized>(&self, hasher: &H) -> Result<FieldElement, HashError> {
        match self {
            PadValue::Zero => Ok(FieldElement::zero()),
            PadValue::HashOfZero => hasher.hash(&[FieldElement::zero()]),
            PadValue::Custom(value) => Ok(*value),
        }
    }
}

impl Display for PadValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PadValue::Zero => write!(f, "zero"),
            PadValue::HashOfZero => write!(f, "hash_of_zero"),
            PadValue::Custom(value) => write!(f, "{value}"),
        }
    }
}

impl FromStr for PadValue {
    type Err = FieldElementError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "zero" => Ok(PadValue::Zero),
            "hash_of_zero" => Ok(PadValue::HashOfZero),
            numeral => numeral.parse().map(PadValue::Custom),
        }
    }
}
