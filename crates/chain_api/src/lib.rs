//! Representation of the chain primitives consumed by the node components.
//!
//! Headers arrive here already decoded and signature-checked; this crate only describes their
//! shape. Encoding formats and hashing live with the network layer.

pub mod block;
pub mod core;
#[cfg(any(feature = "testing", test))]
pub mod test_utils;
