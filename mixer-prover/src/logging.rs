//! Child loggers of the prover.
//!
//! Every record emitted by a component carries a [COMPONENT_KEY] entry, and every record
//! emitted while a proof is generated carries a [PROOF_KEY] entry, so the logs of
//! concurrent withdrawals can be told apart.

use slog::Logger;

/// Key of the component that emitted a record.
pub const COMPONENT_KEY: &str = "src";

/// Key of the sequence number of the proof being generated.
pub const PROOF_KEY: &str = "proof";

/// Derive the child loggers used by the prover components.
pub trait ProverLogger {
    /// Child logger tagged with the bare name of `T`.
    fn for_component<T>(&self) -> Self;

    /// Child logger tagged with the sequence number of a proof.
    fn for_proof(&self, sequence: u64) -> Self;
}

impl ProverLogger for Logger {
    fn for_component<T>(&self) -> Self {
        self.new(slog::o!(COMPONENT_KEY => component_name::<T>()))
    }

    fn for_proof(&self, sequence: u64) -> Self {
        self.new(slog::o!(PROOF_KEY => sequence))
    }
}

/// Name of the type without its module path nor its generic parameters.
fn component_name<T>() -> &'static str {
    let complete_name = std::any::type_name::<T>();
    let without_generic = complete_name.split('<').next().unwrap_or(complete_name);

    without_generic.rsplit("::").next().unwrap_or(complete_name)
}
