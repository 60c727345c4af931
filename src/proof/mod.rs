//! Commitment and Proof System
//!
//! The cryptographic half of the client: a two-base discrete-log
//! commitment over a composite modulus, and a non-interactive
//! zero-knowledge proof of knowledge of the committed coordinates.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     PROOF SYSTEM                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  params.rs     - Public parameters (p, q, g, h) + checks    │
//! │  commitment.rs - r = g^x * h^y mod m                        │
//! │  challenge.rs  - Fiat-Shamir transcript hashing             │
//! │  dlog.rs       - Representation proof prove/verify          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod challenge;
pub mod commitment;
pub mod dlog;
pub mod params;

// Re-export key types
pub use challenge::derive_challenge;
pub use commitment::{commit, Commitment};
pub use dlog::{prove, verify, ProofError, RepresentationProof};
pub use params::{ParamsError, PublicParams};
