//! In-Memory Ledger
//!
//! A process-local stand-in for the on-chain contract, with the same
//! observable behavior: `initialize` verifies the representation proof
//! before binding the account, and `move` updates the stored commitment
//! homomorphically from the delta alone. Coordinates never enter the
//! ledger in plaintext. Used by the demo binary and the end-to-end
//! tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use num_bigint::{BigInt, Sign};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::core::bigmath::{modinv, modmul, modpow};
use crate::ledger::{AccountId, GatewayError, LedgerGateway, Receipt};
use crate::proof::commitment::Commitment;
use crate::proof::dlog::{verify, RepresentationProof};
use crate::proof::params::PublicParams;

struct LedgerState {
    locations: BTreeMap<AccountId, Commitment>,
    sequence: u64,
}

/// Process-local ledger holding the public parameters and one committed
/// location per account.
#[derive(Clone)]
pub struct InMemoryLedger {
    params: PublicParams,
    state: Arc<Mutex<LedgerState>>,
}

impl InMemoryLedger {
    /// Ledger seeded with the given parameters and no accounts.
    pub fn new(params: PublicParams) -> Self {
        Self {
            params,
            state: Arc::new(Mutex::new(LedgerState {
                locations: BTreeMap::new(),
                sequence: 0,
            })),
        }
    }

    /// Raise `base^|e|` and invert when `e` is negative, so a delta can
    /// be divided out of a commitment as easily as multiplied in.
    fn signed_power(&self, base: &BigInt, e: &BigInt, m: &BigInt) -> Result<BigInt, GatewayError> {
        let magnitude = e.magnitude();
        let powed = modpow(base, &BigInt::from(magnitude.clone()), m)
            .map_err(|err| GatewayError::Rejected(err.to_string()))?;
        if e.sign() == Sign::Minus {
            modinv(&powed, m).map_err(|err| GatewayError::Rejected(err.to_string()))
        } else {
            Ok(powed)
        }
    }
}

impl LedgerGateway for InMemoryLedger {
    async fn get_public_params(&self) -> Result<PublicParams, GatewayError> {
        Ok(self.params.clone())
    }

    async fn get_confirmed_location(
        &self,
        account: &AccountId,
    ) -> Result<Option<Commitment>, GatewayError> {
        let state = self.state.lock().await;
        Ok(state.locations.get(account).cloned())
    }

    async fn initialize(
        &self,
        account: &AccountId,
        r: &Commitment,
        proof: &RepresentationProof,
    ) -> Result<Receipt, GatewayError> {
        let mut state = self.state.lock().await;
        if state.locations.contains_key(account) {
            return Err(GatewayError::AlreadyInitialized(account.clone()));
        }
        let valid = verify(&self.params, r, proof)
            .map_err(|err| GatewayError::Rejected(err.to_string()))?;
        if !valid {
            warn!(%account, "initialize rejected: proof did not verify");
            return Err(GatewayError::ProofRejected(account.clone()));
        }
        state.locations.insert(account.clone(), r.clone());
        state.sequence += 1;
        info!(%account, %r, sequence = state.sequence, "account initialized");
        Ok(Receipt {
            sequence: state.sequence,
        })
    }

    async fn apply_move(
        &self,
        account: &AccountId,
        dx: &BigInt,
        dy: &BigInt,
    ) -> Result<Receipt, GatewayError> {
        let mut state = self.state.lock().await;
        let current = state
            .locations
            .get(account)
            .cloned()
            .ok_or_else(|| GatewayError::NotInitialized(account.clone()))?;

        let m = BigInt::from(self.params.modulus());
        let g = BigInt::from(self.params.g.clone());
        let h = BigInt::from(self.params.h.clone());

        // r' = r * g^dx * h^dy mod m: the destination commitment follows
        // from the stored one without the ledger ever seeing (x, y).
        let step_x = self.signed_power(&g, dx, &m)?;
        let step_y = self.signed_power(&h, dy, &m)?;
        let moved = modmul(&modmul(&BigInt::from(current.0), &step_x, &m).map_err(reject)?, &step_y, &m)
            .map_err(reject)?;
        let moved = Commitment(moved.to_biguint().unwrap_or_default());

        state.locations.insert(account.clone(), moved.clone());
        state.sequence += 1;
        info!(%account, %dx, %dy, %moved, sequence = state.sequence, "move applied");
        Ok(Receipt {
            sequence: state.sequence,
        })
    }
}

fn reject(err: crate::core::bigmath::MathError) -> GatewayError {
    GatewayError::Rejected(err.to_string())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::{Coordinate, MoveDelta};
    use crate::proof::commitment::commit;
    use crate::proof::dlog::prove;
    use num_bigint::BigUint;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn toy_params() -> PublicParams {
        PublicParams::from_u64(23, 19, 5, 7).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_requires_valid_proof() {
        let params = toy_params();
        let ledger = InMemoryLedger::new(params.clone());
        let account = AccountId::new("alice");
        let mut rng = StdRng::seed_from_u64(11);

        let x = BigUint::from(4u32);
        let y = BigUint::from(2u32);
        let r = commit(&params, &x, &y).unwrap();
        let proof = prove(&params, &x, &y, &r, &mut rng).unwrap();

        // Proof for a different commitment is refused
        let other = commit(&params, &BigUint::from(9u32), &BigUint::from(9u32)).unwrap();
        assert!(matches!(
            ledger.initialize(&account, &other, &proof).await,
            Err(GatewayError::ProofRejected(_))
        ));
        assert!(ledger
            .get_confirmed_location(&account)
            .await
            .unwrap()
            .is_none());

        // Honest proof is accepted
        ledger.initialize(&account, &r, &proof).await.unwrap();
        assert_eq!(
            ledger.get_confirmed_location(&account).await.unwrap(),
            Some(r.clone())
        );

        // Re-initialization is refused
        assert!(matches!(
            ledger.initialize(&account, &r, &proof).await,
            Err(GatewayError::AlreadyInitialized(_))
        ));
    }

    #[tokio::test]
    async fn test_move_updates_commitment_homomorphically() {
        let params = toy_params();
        let ledger = InMemoryLedger::new(params.clone());
        let account = AccountId::new("bob");
        let mut rng = StdRng::seed_from_u64(12);

        let origin = Coordinate::from_u64(4, 2);
        let r = origin.commitment(&params).unwrap();
        let proof = prove(&params, &origin.x, &origin.y, &r, &mut rng).unwrap();
        ledger.initialize(&account, &r, &proof).await.unwrap();

        // Step (1, 1): the ledger's homomorphic update must land on the
        // client-side commitment of the destination coordinate.
        let delta = MoveDelta::new(1, 1);
        ledger.apply_move(&account, &delta.dx, &delta.dy).await.unwrap();
        let destination = origin.wrapping_add(&delta, &params);
        assert_eq!(
            ledger.get_confirmed_location(&account).await.unwrap(),
            Some(destination.commitment(&params).unwrap())
        );

        // And back again with a negative delta.
        let back = MoveDelta::new(-1, -1);
        ledger.apply_move(&account, &back.dx, &back.dy).await.unwrap();
        assert_eq!(
            ledger.get_confirmed_location(&account).await.unwrap(),
            Some(r)
        );
    }

    #[tokio::test]
    async fn test_move_without_account_rejected() {
        let ledger = InMemoryLedger::new(toy_params());
        let account = AccountId::new("carol");
        assert!(matches!(
            ledger
                .apply_move(&account, &BigInt::from(1), &BigInt::from(1))
                .await,
            Err(GatewayError::NotInitialized(_))
        ));
    }
}
