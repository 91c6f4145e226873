//! Fixed depth Merkle tree of commitments and its inclusion proofs.

mod error;
mod pad;
mod path;
mod tree;

pub use error::*;
pub use pad::*;
pub use path::*;
pub use tree::*;
