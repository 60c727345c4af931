//! Coordinate Commitment Scheme
//!
//! A position `(x, y)` is published as `r = g^x * h^y mod m`, a two-base
//! discrete-log commitment. The ledger only ever stores `r`; the
//! coordinate pair stays with the player.

use std::fmt;

use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};

use crate::core::bigmath::{modmul, modpow, MathError};
use crate::proof::params::PublicParams;

/// A committed location: `g^x * h^y mod m`.
///
/// Many-to-one in theory, but treated as a unique fingerprint per
/// coordinate at production parameter sizes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Commitment(pub BigUint);

impl Commitment {
    /// Raw committed value.
    pub fn value(&self) -> &BigUint {
        &self.0
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<BigUint> for Commitment {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

/// Commit to a coordinate pair: `g^x * h^y mod m`.
///
/// Pure function of its inputs. Out-of-range coordinates are the
/// caller's concern (wrap-around movement reduces them modulo the grid
/// dimensions first); this operation never rejects them.
pub fn commit(params: &PublicParams, x: &BigUint, y: &BigUint) -> Result<Commitment, MathError> {
    let m = BigInt::from(params.modulus());
    let gx = modpow(&BigInt::from(params.g.clone()), &BigInt::from(x.clone()), &m)?;
    let hy = modpow(&BigInt::from(params.h.clone()), &BigInt::from(y.clone()), &m)?;
    let r = modmul(&gx, &hy, &m)?;
    // Non-negative by construction: modmul normalizes into [0, m)
    Ok(Commitment(r.to_biguint().unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_params() -> PublicParams {
        PublicParams::from_u64(23, 19, 5, 7).unwrap()
    }

    #[test]
    fn test_worked_example() {
        // 5^4 = 625 = 188 mod 437, 7^2 = 49, 188 * 49 = 9212 = 35 mod 437
        let params = toy_params();
        let r = commit(&params, &BigUint::from(4u32), &BigUint::from(2u32)).unwrap();
        assert_eq!(r, Commitment(BigUint::from(35u32)));
    }

    #[test]
    fn test_commitment_determinism() {
        let params = toy_params();
        let x = BigUint::from(13u32);
        let y = BigUint::from(7u32);
        let first = commit(&params, &x, &y).unwrap();
        for _ in 0..10 {
            assert_eq!(commit(&params, &x, &y).unwrap(), first);
        }
    }

    #[test]
    fn test_distinct_coordinates_distinct_commitments() {
        // Not guaranteed in general, but holds for these parameters and
        // catches accidental constant outputs.
        let params = toy_params();
        let a = commit(&params, &BigUint::from(4u32), &BigUint::from(2u32)).unwrap();
        let b = commit(&params, &BigUint::from(5u32), &BigUint::from(2u32)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_coordinate() {
        // g^0 * h^0 = 1
        let params = toy_params();
        let r = commit(&params, &BigUint::from(0u32), &BigUint::from(0u32)).unwrap();
        assert_eq!(r, Commitment(BigUint::from(1u32)));
    }
}
