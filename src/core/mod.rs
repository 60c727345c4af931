//! Core numeric primitives.
//!
//! Arbitrary-precision modular arithmetic, the leaf dependency for the
//! commitment scheme and the representation proof protocol.

pub mod bigmath;

// Re-export core operations
pub use bigmath::{lcm, modinv, modmul, modpow, MathError};
