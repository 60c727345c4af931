//! Ledger Gateway
//!
//! The authoritative append-only store, reached over a request/response
//! RPC. The client submits `initialize` and `move` transactions and
//! reads back public parameters and confirmed locations; everything
//! else about the ledger is opaque.

pub mod memory;

use num_bigint::BigInt;
use thiserror::Error;

use crate::proof::commitment::Commitment;
use crate::proof::dlog::RepresentationProof;
use crate::proof::params::PublicParams;

pub use memory::InMemoryLedger;

/// Opaque account identity supplied by the wallet layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(pub String);

impl AccountId {
    /// Wrap a wallet-supplied identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Acknowledgment that a submitted transaction was finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Ledger-assigned sequence number of the finalized transaction.
    pub sequence: u64,
}

/// Error signal for a submitted or read transaction.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The account already holds a committed location.
    #[error("account {0} is already initialized")]
    AlreadyInitialized(AccountId),

    /// A move was submitted for an account with no committed location.
    #[error("account {0} has no committed location")]
    NotInitialized(AccountId),

    /// The representation proof did not verify.
    #[error("proof rejected for account {0}")]
    ProofRejected(AccountId),

    /// The ledger could not apply the transaction.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// Transport failure, nothing finalized.
    #[error("gateway unreachable: {0}")]
    Unreachable(String),
}

/// Request/response interface to the ledger.
///
/// Submissions are fire-and-forget at the wire level; awaiting the call
/// covers the asynchronous receipt-or-error outcome.
pub trait LedgerGateway {
    /// Read the public commitment parameters.
    fn get_public_params(
        &self,
    ) -> impl std::future::Future<Output = Result<PublicParams, GatewayError>> + Send;

    /// Read an account's confirmed committed location.
    ///
    /// `None` means the account has not initialized yet (the wire
    /// protocol's sentinel zero).
    fn get_confirmed_location(
        &self,
        account: &AccountId,
    ) -> impl std::future::Future<Output = Result<Option<Commitment>, GatewayError>> + Send;

    /// Bind an account to its first committed location. The proof is
    /// mandatory here and only here.
    fn initialize(
        &self,
        account: &AccountId,
        r: &Commitment,
        proof: &RepresentationProof,
    ) -> impl std::future::Future<Output = Result<Receipt, GatewayError>> + Send;

    /// Apply a move delta. The ledger recomputes the destination
    /// commitment itself; no coordinate and no proof travel with the
    /// delta.
    fn apply_move(
        &self,
        account: &AccountId,
        dx: &BigInt,
        dy: &BigInt,
    ) -> impl std::future::Future<Output = Result<Receipt, GatewayError>> + Send;
}
