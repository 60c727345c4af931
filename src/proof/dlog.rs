//! Two-Base Representation Proof
//!
//! Non-interactive zero-knowledge proof of knowledge of `(x, y)` such
//! that `r = g^x * h^y mod m`. A two-base generalization of a Schnorr
//! proof, made non-interactive with the Fiat-Shamir transform (see
//! [`crate::proof::challenge`]).
//!
//! Response scalars are reduced modulo `L = lcm(p-1, q-1)`, the order of
//! the exponent group modulo `m`. Reducing modulo `p-1` and `q-1`
//! individually would break completeness whenever the generators' orders
//! do not divide those values.
//!
//! Soundness leans on the hardness of the two-base discrete-log
//! representation problem modulo a composite of unknown factorization.
//! Zero-knowledge leans on the nonces `k1, k2` being uniformly random,
//! never reused, and discarded after use. The randomness source is
//! injected so tests can pin a seed while production draws from the OS.

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::bigmath::{modmul, modpow, MathError};
use crate::proof::challenge::derive_challenge;
use crate::proof::commitment::Commitment;
use crate::proof::params::PublicParams;

/// Proof generation failure. Surfaced to the caller, never swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    /// Coordinate outside the declared grid range. Callers wrap before
    /// proving; reaching this is a local precondition violation caught
    /// before any network interaction.
    #[error("coordinate component {value} out of range [0, {bound})")]
    CoordinateOutOfRange {
        /// The offending component.
        value: BigUint,
        /// Exclusive upper bound (`p - 1` or `q - 1`).
        bound: BigUint,
    },

    /// Underlying modular arithmetic failed.
    #[error(transparent)]
    Math(#[from] MathError),
}

/// A non-interactive representation proof `{t, s1, s2}`.
///
/// `t` commits to the per-proof random nonces; `s1`, `s2` are the
/// response scalars. Reveals nothing about `(x, y)` on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentationProof {
    /// Commitment to randomness: `g^k1 * h^k2 mod m`.
    pub t: BigUint,
    /// Response for the first base: `(k1 + c*x) mod L`.
    pub s1: BigUint,
    /// Response for the second base: `(k2 + c*y) mod L`.
    pub s2: BigUint,
}

fn check_range(value: &BigUint, bound: &BigUint) -> Result<(), ProofError> {
    if value >= bound {
        return Err(ProofError::CoordinateOutOfRange {
            value: value.clone(),
            bound: bound.clone(),
        });
    }
    Ok(())
}

/// Prove knowledge of `(x, y)` behind the commitment `r`.
///
/// Fresh nonces are drawn uniformly from `[0, p-1)` and `[0, q-1)` on
/// every invocation; both soundness and zero-knowledge depend on them
/// never being reused or predictable.
pub fn prove<R: RngCore + CryptoRng>(
    params: &PublicParams,
    x: &BigUint,
    y: &BigUint,
    r: &Commitment,
    rng: &mut R,
) -> Result<RepresentationProof, ProofError> {
    check_range(x, &params.grid_width())?;
    check_range(y, &params.grid_height())?;

    let k1 = rng.gen_biguint_below(&params.grid_width());
    let k2 = rng.gen_biguint_below(&params.grid_height());

    let m = BigInt::from(params.modulus());
    let g = BigInt::from(params.g.clone());
    let h = BigInt::from(params.h.clone());

    let t = modmul(
        &modpow(&g, &BigInt::from(k1.clone()), &m)?,
        &modpow(&h, &BigInt::from(k2.clone()), &m)?,
        &m,
    )?;
    let t = t.to_biguint().unwrap_or_default();

    let c = derive_challenge(params, r.value(), &t);
    let order = params.challenge_order();

    let s1 = (BigInt::from(k1) + &c * BigInt::from(x.clone())).mod_floor(&order);
    let s2 = (BigInt::from(k2) + &c * BigInt::from(y.clone())).mod_floor(&order);

    debug!(%c, "representation proof generated");

    Ok(RepresentationProof {
        t,
        s1: s1.to_biguint().unwrap_or_default(),
        s2: s2.to_biguint().unwrap_or_default(),
    })
}

/// Verify a representation proof against the commitment `r`.
///
/// Accepts iff `g^s1 * h^s2 mod m == t * r^c mod m`. A malformed but
/// well-typed proof simply fails the check; arithmetic errors (which
/// can only come from degenerate parameters) still surface.
pub fn verify(
    params: &PublicParams,
    r: &Commitment,
    proof: &RepresentationProof,
) -> Result<bool, MathError> {
    let m = BigInt::from(params.modulus());
    let g = BigInt::from(params.g.clone());
    let h = BigInt::from(params.h.clone());

    let c = derive_challenge(params, r.value(), &proof.t);

    let lhs = modmul(
        &modpow(&g, &BigInt::from(proof.s1.clone()), &m)?,
        &modpow(&h, &BigInt::from(proof.s2.clone()), &m)?,
        &m,
    )?;
    let rhs = modmul(
        &BigInt::from(proof.t.clone()),
        &modpow(&BigInt::from(r.0.clone()), &c, &m)?,
        &m,
    )?;

    Ok(lhs == rhs)
}

// =============================================================================
// TESTS
// =============================================================================
