//! Client Game Logic
//!
//! The optimistic move flow: coordinates and the known board, the
//! player's staged/confirmed bookkeeping, and the state machine that
//! drives submissions and reconciles confirmations.
//!
//! - `board`: coordinates, deltas, torus wrap, known-board cache
//! - `state`: player state and transaction phases
//! - `machine`: the state machine over ledger and storage capabilities

pub mod board;
pub mod machine;
pub mod state;

// Re-export key types
pub use board::{Coordinate, KnownBoard, MoveDelta};
pub use machine::{ClientError, ConfirmOutcome, GameClient};
pub use state::{ConfirmedMove, MovePhase, PlayerState, StagedMove};
