use anyhow::Context;
use config::{Config, ConfigError, Map, Source, Value, ValueKind};
use serde::{Deserialize, Serialize};

use crate::{
    FieldElement, StdResult,
    circuit::ProofGenerationOptions,
    hash::{FieldHasher, HashError},
    merkle_tree::PadValue,
};

/// Prover configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProverConfiguration {
    /// Depth of the commitment tree, it must be the depth the circuit was compiled for.
    pub merkle_tree_depth: usize,

    /// Value of the unfilled leaf slots: `zero`, `hash_of_zero` or a numeral `[default: zero]`.
    pub pad_value: PadValue,

    /// Number of threads the proving backend may use `[default: 1]`.
    pub threads: usize,

    /// Produce proofs with a Keccak transcript, verifiable on-chain `[default: true]`.
    pub keccak: bool,
}

impl ProverConfiguration {
    /// Create a sample configuration mainly for tests
    #[doc(hidden)]
    pub fn new_sample(merkle_tree_depth: usize) -> Self {
        Self {
            merkle_tree_depth,
            pad_value: PadValue::Zero,
            threads: 1,
            keccak: true,
        }
    }

    /// Read the configuration from layered sources.
    pub fn from_config(config: Config) -> StdResult<Self> {
        config
            .try_deserialize()
            .with_context(|| "Could not read prover configuration")
    }

    /// Options forwarded to the proving backend.
    pub fn proof_generation_options(&self) -> ProofGenerationOptions {
        ProofGenerationOptions {
            threads: self.threads,
            keccak: self.keccak,
        }
    }

    /// Compute the pad value of the tree leaves.
    pub fn resolve_pad_value<H: FieldHasher + ?Sized>(
        &self,
        hasher: &H,
    ) -> Result<FieldElement, HashError> {
        self.pad_value.resolve(hasher)
    }
}

/// Default configuration with all the default values for configurations.
#[derive(Debug, Clone)]
pub struct DefaultConfiguration {
    /// Depth of the commitment tree.
    pub merkle_tree_depth: usize,

    /// Pad value of the tree leaves.
    pub pad_value: String,

    /// Proving threads.
    pub threads: usize,

    /// Keccak transcript toggle.
    pub keccak: bool,
}

impl DefaultConfiguration {
    fn namespace() -> String {
        "default configuration".to_string()
    }
}

impl Default for DefaultConfiguration {
    fn default() -> Self {
        Self {
            merkle_tree_depth: 20,
            pad_value: PadValue::Zero.to_string(),
            threads: 1,
            keccak: true,
        }
    }
}

impl Source for DefaultConfiguration {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<Map<String, Value>, ConfigError> {
        fn into_value<V: Into<ValueKind>>(value: V) -> Value {
            Value::new(Some(&DefaultConfiguration::namespace()), value.into())
        }
        let mut result = Map::new();
        let myself = self.clone();

        result.insert(
            "merkle_tree_depth".to_string(),
            into_value(myself.merkle_tree_depth as u64),
        );
        result.insert("pad_value".to_string(), into_value(myself.pad_value));
        result.insert("threads".to_string(), into_value(myself.threads as u64));
        result.insert("keccak".to_string(), into_value(myself.keccak));

        Ok(result)
    }
}
