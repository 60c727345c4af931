//! Local Move State Machine
//!
//! Stages a move locally, submits it to the ledger, and reconciles the
//! local cache with the ledger's confirmed state. One outstanding
//! transaction at a time: a new stage may overwrite a staged-but-not-
//! submitted move, but never a move that is awaiting its receipt, and a
//! confirmation that no longer matches the staged move is discarded
//! instead of promoted.
//!
//! All mutation is serialized through this one instance; nothing here
//! is touched from two call paths at once.

use rand::{CryptoRng, RngCore};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::game::board::{Coordinate, KnownBoard, MoveDelta};
use crate::game::state::{ConfirmedMove, MovePhase, PlayerState, StagedMove};
use crate::ledger::{AccountId, GatewayError, LedgerGateway};
use crate::proof::commitment::Commitment;
use crate::proof::dlog::{prove, ProofError};
use crate::proof::params::{ParamsError, PublicParams};
use crate::storage::{CacheStore, PersistedCache, StorageError};

/// Client-side failure. Ledger errors are absorbed here as a clean
/// return to idle; cryptographic errors surface untouched.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The ledger published malformed parameters. Fatal at session
    /// start.
    #[error("invalid public parameters: {0}")]
    Params(#[from] ParamsError),

    /// Proof generation failed before any network interaction.
    #[error("proof generation failed: {0}")]
    Proof(#[from] ProofError),

    /// The commitment computation failed.
    #[error("commitment failed: {0}")]
    Math(#[from] crate::core::bigmath::MathError),

    /// A submitted move is still awaiting its receipt.
    #[error("a move is already awaiting confirmation")]
    MoveInFlight,

    /// Operation requires an initialized account.
    #[error("account has no confirmed location yet")]
    NotInitialized,

    /// Initialization was attempted twice.
    #[error("account already has a confirmed location")]
    AlreadyInitialized,

    /// The gateway rejected the transaction; local state reverted to
    /// idle, nothing was promoted.
    #[error("ledger rejected the transaction: {0}")]
    Ledger(#[from] GatewayError),

    /// The persisted cache could not be read or written.
    #[error("cache storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// What became of an arriving confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The confirmation matched the staged move and was promoted.
    Promoted,
    /// The staged move had changed underneath the confirmation; it was
    /// logged and discarded.
    Stale,
}

/// The client state machine, generic over its ledger and storage
/// capabilities.
pub struct GameClient<G, S> {
    params: PublicParams,
    gateway: G,
    store: S,
    account: AccountId,
    state: PlayerState,
    board: KnownBoard,
}

impl<G: LedgerGateway, S: CacheStore> GameClient<G, S> {
    /// Start a session: fetch and validate the public parameters, load
    /// the persisted cache, and reconcile against the ledger's view.
    ///
    /// If the ledger already confirmed the commitment we had staged when
    /// the session last ended, the stage is promoted now.
    pub async fn bootstrap(gateway: G, store: S, account: AccountId) -> Result<Self, ClientError> {
        let raw = gateway.get_public_params().await?;
        // Re-validate: the gateway is trusted for liveness, not for
        // well-formedness.
        let params = PublicParams::new(raw.p, raw.q, raw.g, raw.h)?;
        info!(
            grid = %format!("{}x{}", params.grid_width(), params.grid_height()),
            "public parameters fetched"
        );

        let cache = store.load()?.unwrap_or_default();
        let mut client = Self {
            params,
            gateway,
            store,
            account,
            state: PlayerState::new(),
            board: cache.board,
        };
        client.state.confirmed = cache.confirmed;
        if let Some(staged) = cache.staged {
            client.state.stage(staged);
        }

        match client.gateway.get_confirmed_location(&client.account).await? {
            None => {
                debug!(account = %client.account, "account not initialized yet");
                // A stage persisted for an uninitialized account is a
                // leftover from an abandoned submit.
                client.state.abandon_stage();
            }
            Some(ledger_r) => {
                info!(account = %client.account, location = %ledger_r, "confirmed location read");
                if client.state.staged.is_some() {
                    // The previous session ended mid-submit; the ledger
                    // now tells us whether that stage was finalized.
                    client.reconcile(&ledger_r);
                } else if client.state.confirmed.as_ref().map(|c| &c.commitment)
                    != Some(&ledger_r)
                {
                    warn!(
                        account = %client.account,
                        ledger = %ledger_r,
                        "cached confirmed location diverges from ledger"
                    );
                }
            }
        }
        client.persist()?;
        Ok(client)
    }

    /// Current player state, for rendering. Plain serializable values;
    /// nothing here depends on how they are displayed.
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Current known board, for rendering.
    pub fn board(&self) -> &KnownBoard {
        &self.board
    }

    /// Public parameters for this session.
    pub fn params(&self) -> &PublicParams {
        &self.params
    }

    /// Stage a move locally: compute the commitment and persist the
    /// staged pair.
    ///
    /// Overwrites a prior staged-but-unsubmitted move (last-write-wins;
    /// only one outstanding transaction is tracked). Refused while a
    /// submitted move awaits its receipt.
    pub fn stage_move(&mut self, coordinate: Coordinate) -> Result<StagedMove, ClientError> {
        if self.state.phase == MovePhase::Confirming {
            return Err(ClientError::MoveInFlight);
        }
        let commitment = coordinate.commitment(&self.params)?;
        let staged = StagedMove {
            coordinate,
            commitment,
        };
        debug!(coordinate = %staged.coordinate, commitment = %staged.commitment, "move staged");
        self.state.stage(staged.clone());
        self.persist()?;
        Ok(staged)
    }

    /// Initialize the account: stage the coordinate, prove knowledge of
    /// it, and submit `initialize(r, proof)`.
    ///
    /// The proof is only ever generated for a commitment we computed
    /// ourselves, never for an observed foreign one.
    pub async fn submit_initialize<R: RngCore + CryptoRng>(
        &mut self,
        coordinate: Coordinate,
        rng: &mut R,
    ) -> Result<Commitment, ClientError> {
        if self.state.is_initialized() {
            return Err(ClientError::AlreadyInitialized);
        }
        // A fresh account starts from a clean slate: any cache a prior
        // session left on this store is wiped before staging.
        self.store.clear()?;
        self.board = KnownBoard::new();
        let staged = self.stage_move(coordinate.clone())?;
        let proof = prove(
            &self.params,
            &coordinate.x,
            &coordinate.y,
            &staged.commitment,
            rng,
        )?;

        self.state.phase = MovePhase::Confirming;
        match self
            .gateway
            .initialize(&self.account, &staged.commitment, &proof)
            .await
        {
            Ok(receipt) => {
                debug!(sequence = receipt.sequence, "initialize receipt");
                let ledger_r = self.read_back().await?;
                self.reconcile(&ledger_r);
                self.persist()?;
                Ok(ledger_r)
            }
            Err(err) => {
                // Nothing was promoted; abandon the stage and report.
                warn!(%err, "initialize rejected by ledger");
                self.state.abandon_stage();
                self.persist()?;
                Err(ClientError::Ledger(err))
            }
        }
    }

    /// Move by a delta: wrap the last locally known coordinate, stage
    /// the destination, and submit `move(dx, dy)`.
    ///
    /// Only the delta travels; the ledger recomputes the destination
    /// commitment from the prior confirmed one, so ordinary moves carry
    /// no proof. The ledger already holds a location bound to this
    /// account by the initialize-time proof, and its own transition
    /// logic is what authorizes the step.
    pub async fn submit_move(&mut self, delta: MoveDelta) -> Result<Commitment, ClientError> {
        let confirmed = self
            .state
            .confirmed
            .as_ref()
            .ok_or(ClientError::NotInitialized)?;
        let destination = confirmed.coordinate.wrapping_add(&delta, &self.params);
        let staged = self.stage_move(destination)?;

        self.state.phase = MovePhase::Confirming;
        match self.gateway.apply_move(&self.account, &delta.dx, &delta.dy).await {
            Ok(receipt) => {
                debug!(sequence = receipt.sequence, "move receipt");
                let ledger_r = self.read_back().await?;
                if ledger_r == staged.commitment {
                    self.reconcile(&ledger_r);
                } else {
                    // The ledger finalized something other than what we
                    // staged (e.g. a wrap the homomorphic update cannot
                    // see). The ledger wins: its commitment becomes the
                    // confirmed value, paired with our wrapped local
                    // coordinate. The mismatched pair stays off the
                    // board cache.
                    warn!(staged = %staged.commitment, ledger = %ledger_r, "ledger commitment diverged from stage");
                    self.state.confirm(ConfirmedMove {
                        coordinate: staged.coordinate.clone(),
                        commitment: ledger_r.clone(),
                    });
                }
                self.persist()?;
                Ok(ledger_r)
            }
            Err(err) => {
                warn!(%err, "move rejected by ledger");
                self.state.abandon_stage();
                self.persist()?;
                Err(ClientError::Ledger(err))
            }
        }
    }

    /// Apply a confirmation that may have been delayed: promote iff it
    /// still matches the currently staged move.
    ///
    /// A confirmation for a stage that was since overwritten is logged
    /// and discarded; the confirmed location is never clobbered by a
    /// stale receipt.
    pub fn apply_confirmation(&mut self, ledger_r: &Commitment) -> ConfirmOutcome {
        let outcome = self.reconcile(ledger_r);
        if let Err(err) = self.persist() {
            warn!(%err, "cache save failed after confirmation");
        }
        outcome
    }

    /// Pick a uniformly random coordinate, commit to it, and cache the
    /// entry. Local self-generated sample data for visualization; the
    /// player state is untouched.
    pub fn explore_tick<R: RngCore + CryptoRng>(&mut self, rng: &mut R) -> Result<Coordinate, ClientError> {
        let coordinate = Coordinate::random(&self.params, rng);
        let commitment = coordinate.commitment(&self.params)?;
        debug!(%coordinate, %commitment, "explore tick");
        if !self.board.record(coordinate.clone(), commitment) {
            warn!(%coordinate, "board holds a conflicting commitment for this coordinate");
        }
        self.persist()?;
        Ok(coordinate)
    }

    /// Stale-confirmation guard: promote the staged move if `ledger_r`
    /// matches it, otherwise discard.
    fn reconcile(&mut self, ledger_r: &Commitment) -> ConfirmOutcome {
        match self.state.staged.clone() {
            Some(staged) if staged.commitment == *ledger_r => {
                if !self
                    .board
                    .record(staged.coordinate.clone(), staged.commitment.clone())
                {
                    warn!(
                        coordinate = %staged.coordinate,
                        "board holds a conflicting commitment for this coordinate"
                    );
                }
                self.state.promote(staged);
                ConfirmOutcome::Promoted
            }
            Some(staged) => {
                warn!(
                    staged = %staged.commitment,
                    confirmed = %ledger_r,
                    "stale confirmation discarded"
                );
                self.state.phase = MovePhase::Staged;
                ConfirmOutcome::Stale
            }
            None => {
                debug!(confirmed = %ledger_r, "confirmation with no staged move");
                ConfirmOutcome::Stale
            }
        }
    }

    async fn read_confirmed(&self) -> Result<Commitment, ClientError> {
        self.gateway
            .get_confirmed_location(&self.account)
            .await?
            .ok_or(ClientError::NotInitialized)
    }

    /// Read the confirmed commitment after a receipt. A failed read
    /// here still clears the stage and returns the machine to idle; the
    /// next bootstrap or confirmation re-reconciles against the ledger.
    async fn read_back(&mut self) -> Result<Commitment, ClientError> {
        match self.read_confirmed().await {
            Ok(ledger_r) => Ok(ledger_r),
            Err(err) => {
                warn!(%err, "confirmed read failed after receipt");
                self.state.abandon_stage();
                self.persist()?;
                Err(err)
            }
        }
    }

    fn persist(&mut self) -> Result<(), ClientError> {
        self.store.save(&PersistedCache {
            staged: self.state.staged.clone(),
            confirmed: self.state.confirmed.clone(),
            board: self.board.clone(),
        })?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
