//! Arbitrary-Precision Modular Arithmetic
//!
//! Leaf primitives for the commitment scheme and proof protocol.
//! Operands routinely exceed machine-word width (hundreds of bits),
//! so everything runs on `num-bigint` integers.
//!
//! All results are normalized into `[0, modulus)`.

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use thiserror::Error;

/// Errors from modular arithmetic primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    /// Modulus was zero or negative.
    #[error("modulus must be positive, got {0}")]
    InvalidModulus(BigInt),

    /// Exponent was negative. Exponents here are always coordinate or
    /// scalar values, which are non-negative by construction.
    #[error("negative exponent {0} is not supported")]
    NegativeExponent(BigInt),

    /// Operand has no inverse modulo the given modulus.
    #[error("{0} is not invertible modulo {1}")]
    NotInvertible(BigInt, BigInt),
}

fn check_modulus(modulus: &BigInt) -> Result<(), MathError> {
    if modulus.sign() != Sign::Plus {
        return Err(MathError::InvalidModulus(modulus.clone()));
    }
    Ok(())
}

/// Compute `base^exponent mod modulus`.
///
/// Pure function: identical inputs always produce identical output.
/// The base may be negative; it is reduced into the group first.
pub fn modpow(base: &BigInt, exponent: &BigInt, modulus: &BigInt) -> Result<BigInt, MathError> {
    check_modulus(modulus)?;
    if exponent.sign() == Sign::Minus {
        return Err(MathError::NegativeExponent(exponent.clone()));
    }
    let reduced = base.mod_floor(modulus);
    Ok(reduced.modpow(exponent, modulus))
}

/// Compute `a * b mod modulus`.
pub fn modmul(a: &BigInt, b: &BigInt, modulus: &BigInt) -> Result<BigInt, MathError> {
    check_modulus(modulus)?;
    Ok((a * b).mod_floor(modulus))
}

/// Compute the multiplicative inverse of `a` modulo `modulus`.
///
/// Used by the in-memory ledger to apply negative move deltas to a
/// stored commitment (dividing out `g^|dx|` instead of multiplying).
pub fn modinv(a: &BigInt, modulus: &BigInt) -> Result<BigInt, MathError> {
    check_modulus(modulus)?;
    let reduced = a.mod_floor(modulus);
    let ext = BigInt::extended_gcd(&reduced, modulus);
    if !ext.gcd.is_one() {
        return Err(MathError::NotInvertible(a.clone(), modulus.clone()));
    }
    Ok(ext.x.mod_floor(modulus))
}

/// Least common multiple of `a` and `b`.
///
/// The effective exponent-group order `lcm(p-1, q-1)` bounds the
/// Fiat-Shamir challenge space.
pub fn lcm(a: &BigInt, b: &BigInt) -> BigInt {
    if a.is_zero() || b.is_zero() {
        return BigInt::zero();
    }
    Integer::lcm(a, b)
}

// =============================================================================
// TESTS
// =============================================================================
