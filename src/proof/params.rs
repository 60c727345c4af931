//! Public Commitment Parameters
//!
//! The tuple `(p, q, g, h)` published by the ledger. Two large primes and
//! two generators of the multiplicative group modulo `m = p * q`.
//! Fetched once at session start and immutable for the life of a game.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::One;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::bigmath;

/// Malformed public parameters. Fatal at session start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    /// `p` or `q` is too small to define a grid dimension.
    #[error("prime parameter {0} must be at least 2")]
    PrimeTooSmall(BigUint),

    /// A generator falls outside the open interval `(1, m)`.
    #[error("generator {0} out of range for modulus {1}")]
    GeneratorOutOfRange(BigUint, BigUint),

    /// A generator shares a factor with `m` and cannot generate the group.
    #[error("generator {0} is not coprime to modulus {1}")]
    GeneratorNotCoprime(BigUint, BigUint),
}

/// Public commitment parameters `{p, q, g, h}`.
///
/// Primality of `p` and `q` is the parameter generator's responsibility
/// and is not checked here; structural sanity is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicParams {
    /// First prime. Grid width is `p - 1`.
    pub p: BigUint,
    /// Second prime. Grid height is `q - 1`.
    pub q: BigUint,
    /// First generator.
    pub g: BigUint,
    /// Second generator.
    pub h: BigUint,
}

impl PublicParams {
    /// Validate and construct parameters.
    pub fn new(p: BigUint, q: BigUint, g: BigUint, h: BigUint) -> Result<Self, ParamsError> {
        let two = BigUint::from(2u32);
        for prime in [&p, &q] {
            if *prime < two {
                return Err(ParamsError::PrimeTooSmall(prime.clone()));
            }
        }
        let m = &p * &q;
        for generator in [&g, &h] {
            if *generator <= BigUint::one() || *generator >= m {
                return Err(ParamsError::GeneratorOutOfRange(generator.clone(), m));
            }
            if !generator.gcd(&m).is_one() {
                return Err(ParamsError::GeneratorNotCoprime(generator.clone(), m));
            }
        }
        Ok(Self { p, q, g, h })
    }

    /// Convenience constructor from machine words (tests, demos).
    pub fn from_u64(p: u64, q: u64, g: u64, h: u64) -> Result<Self, ParamsError> {
        Self::new(
            BigUint::from(p),
            BigUint::from(q),
            BigUint::from(g),
            BigUint::from(h),
        )
    }

    /// Commitment modulus `m = p * q`.
    pub fn modulus(&self) -> BigUint {
        &self.p * &self.q
    }

    /// Grid width `p - 1`. The x coordinate lives in `[0, p - 2]`.
    pub fn grid_width(&self) -> BigUint {
        &self.p - BigUint::one()
    }

    /// Grid height `q - 1`. The y coordinate lives in `[0, q - 2]`.
    pub fn grid_height(&self) -> BigUint {
        &self.q - BigUint::one()
    }

    /// Effective exponent-group order `lcm(p - 1, q - 1)`.
    ///
    /// Bounds the Fiat-Shamir challenge space. Parameter generation must
    /// keep this large enough that random forgery is infeasible.
    pub fn challenge_order(&self) -> BigInt {
        bigmath::lcm(
            &BigInt::from(self.grid_width()),
            &BigInt::from(self.grid_height()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_toy_params() {
        let params = PublicParams::from_u64(23, 19, 5, 7).unwrap();
        assert_eq!(params.modulus(), BigUint::from(437u32));
        assert_eq!(params.grid_width(), BigUint::from(22u32));
        assert_eq!(params.grid_height(), BigUint::from(18u32));
        assert_eq!(params.challenge_order(), BigInt::from(198));
    }

    #[test]
    fn test_prime_too_small() {
        assert!(matches!(
            PublicParams::from_u64(1, 19, 5, 7),
            Err(ParamsError::PrimeTooSmall(_))
        ));
        assert!(matches!(
            PublicParams::from_u64(23, 0, 5, 7),
            Err(ParamsError::PrimeTooSmall(_))
        ));
    }

    #[test]
    fn test_generator_out_of_range() {
        assert!(matches!(
            PublicParams::from_u64(23, 19, 1, 7),
            Err(ParamsError::GeneratorOutOfRange(_, _))
        ));
        assert!(matches!(
            PublicParams::from_u64(23, 19, 5, 437),
            Err(ParamsError::GeneratorOutOfRange(_, _))
        ));
    }

    #[test]
    fn test_generator_not_coprime() {
        // 19 divides 437
        assert!(matches!(
            PublicParams::from_u64(23, 19, 19, 7),
            Err(ParamsError::GeneratorNotCoprime(_, _))
        ));
    }
}
