use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use serde_with::{DeserializeFromStr, SerializeDisplay};

/// Number of bytes of the canonical big-endian encoding of a [FieldElement].
pub const FIELD_ELEMENT_BYTES: usize = 32;

/// Errors raised when reading a [FieldElement] from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldElementError {
    /// The numeral is empty (or only a `0x` prefix).
    #[error("invalid field element: empty numeral")]
    Empty,

    /// The numeral contains characters that are not digits of its radix.
    #[error("invalid field element '{0}': not a decimal or 0x-prefixed hexadecimal numeral")]
    NotANumeral(String),

    /// The value is not strictly lower than the scalar field modulus.
    #[error("invalid field element '{0}': value exceeds the scalar field modulus")]
    OutOfRange(String),
}

/// A scalar of the BN254 scalar field.
///
/// It is parsed from a decimal numeral (`"42"`) or a `0x` prefixed hexadecimal numeral
/// (`"0x2a"`). Its canonical rendering is the `0x` prefixed, 64 hex digits, big-endian form.
///
/// It carries no arithmetic of its own: field operations are done on the arkworks scalar
/// returned by [FieldElement::inner] and the result is wrapped back with `From<Fr>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr)]
pub struct FieldElement(Fr);

impl FieldElement {
    /// The additive identity.
    pub fn zero() -> Self {
        Self(Fr::from(0u64))
    }

    /// Build a field element from a small integer.
    pub fn from_u64(value: u64) -> Self {
        Self(Fr::from(value))
    }

    /// Build a field element from its 32 bytes big-endian encoding.
    ///
    /// Encodings of values greater or equal to the modulus are rejected instead of reduced.
    pub fn from_bytes_be(bytes: &[u8; FIELD_ELEMENT_BYTES]) -> Result<Self, FieldElementError> {
        Self::from_biguint(BigUint::from_bytes_be(bytes))
            .ok_or_else(|| FieldElementError::OutOfRange(format!("0x{}", hex::encode(bytes))))
    }

    /// 32 bytes big-endian encoding, as committed in `bytes32` public inputs.
    pub fn to_bytes_be(&self) -> [u8; FIELD_ELEMENT_BYTES] {
        let bytes = self.0.into_bigint().to_bytes_be();
        let mut result = [0u8; FIELD_ELEMENT_BYTES];
        result[FIELD_ELEMENT_BYTES - bytes.len()..].copy_from_slice(&bytes);
        result
    }

    /// Decimal rendering of the value.
    pub fn to_decimal_string(&self) -> String {
        BigUint::from(self.0.into_bigint()).to_string()
    }

    /// The underlying arkworks scalar, to compute with.
    pub fn inner(&self) -> Fr {
        self.0
    }

    fn modulus() -> BigUint {
        BigUint::from(Fr::MODULUS)
    }

    fn from_biguint(value: BigUint) -> Option<Self> {
        if value >= Self::modulus() {
            return None;
        }

        Some(Self(Fr::from_be_bytes_mod_order(&value.to_bytes_be())))
    }
}

impl From<Fr> for FieldElement {
    fn from(value: Fr) -> Self {
        Self(value)
    }
}

impl From<FieldElement> for Fr {
    fn from(value: FieldElement) -> Self {
        value.0
    }
}

impl FromStr for FieldElement {
    type Err = FieldElementError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (digits, radix) = match value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
        {
            Some(hex_digits) => (hex_digits, 16),
            None => (value, 10),
        };

        if digits.is_empty() {
            return Err(FieldElementError::Empty);
        }
        // `BigUint` tolerates `_` separators and signs, numerals must not.
        if !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(FieldElementError::NotANumeral(value.to_string()));
        }

        let number = BigUint::parse_bytes(digits.as_bytes(), radix)
            .ok_or_else(|| FieldElementError::NotANumeral(value.to_string()))?;

        Self::from_biguint(number).ok_or_else(|| FieldElementError::OutOfRange(value.to_string()))
    }
}

impl Display for FieldElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes_be()))
    }
}

impl Debug for FieldElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODULUS_DECIMAL: &str =
        "21888242871839275222246405745257275088548364400416034343698204186575808495617";

    #[test]
    fn parse_decimal_and_hexadecimal_numerals() {
        let decimal: FieldElement = "255".parse().unwrap();
        let hexadecimal: FieldElement = "0xff".parse().unwrap();
        let upper_prefix: FieldElement = "0XFF".parse().unwrap();

        assert_eq!(FieldElement::from_u64(255), decimal);
        assert_eq!(decimal, hexadecimal);
        assert_eq!(decimal, upper_prefix);
    }

    #[test]
    fn display_is_padded_big_endian_hexadecimal() {
        let value = FieldElement::from_u64(9);

        assert_eq!(
            "0x0000000000000000000000000000000000000000000000000000000000000009",
            value.to_string()
        );
        assert_eq!("9", value.to_decimal_string());
    }

    #[test]
    fn canonical_rendering_parses_back_to_the_same_value() {
        let value: FieldElement = "123456789123456789123456789".parse().unwrap();

        let reparsed: FieldElement = value.to_string().parse().unwrap();

        assert_eq!(value, reparsed);
    }

    #[test]
    fn reject_malformed_numerals() {
        assert_eq!(Err(FieldElementError::Empty), "".parse::<FieldElement>());
        assert_eq!(Err(FieldElementError::Empty), "0x".parse::<FieldElement>());
        for numeral in ["abc", "-1", "+1", "1_000", "0xzz", "1.5", " 1"] {
            assert_eq!(
                Err(FieldElementError::NotANumeral(numeral.to_string())),
                numeral.parse::<FieldElement>(),
                "'{numeral}' should be rejected"
            );
        }
    }

    #[test]
    fn reject_values_not_lower_than_the_modulus() {
        assert!(matches!(
            MODULUS_DECIMAL.parse::<FieldElement>(),
            Err(FieldElementError::OutOfRange(_))
        ));

        let modulus_minus_one =
            "21888242871839275222246405745257275088548364400416034343698204186575808495616";
        modulus_minus_one
            .parse::<FieldElement>()
            .expect("modulus - 1 is the largest valid element");
    }

    #[test]
    fn bytes_be_conversion_rejects_out_of_range_encodings() {
        let value = FieldElement::from_u64(0x0102);
        let bytes = value.to_bytes_be();
        assert_eq!([1, 2], bytes[30..]);
        assert_eq!(value, FieldElement::from_bytes_be(&bytes).unwrap());

        FieldElement::from_bytes_be(&[0xff; 32])
            .expect_err("0xff..ff is above the modulus and must be rejected");
    }

    #[test]
    fn serde_uses_the_canonical_string_form() {
        let value = FieldElement::from_u64(17);

        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(
            "\"0x0000000000000000000000000000000000000000000000000000000000000011\"",
            json
        );
        assert_eq!(value, serde_json::from_str::<FieldElement>("\"17\"").unwrap());
    }

    #[test]
    fn arithmetic_goes_through_the_arkworks_scalar() {
        let modulus_minus_one = FieldElement::from(
            FieldElement::zero().inner() - FieldElement::from_u64(1).inner(),
        );
        let two = FieldElement::from_u64(2);

        let sum = FieldElement::from(modulus_minus_one.inner() + two.inner());
        let product = FieldElement::from(two.inner() * two.inner());

        assert_eq!(FieldElement::from_u64(1), sum);
        assert_eq!(FieldElement::from_u64(4), product);
    }
}
