//! Player State
//!
//! The optimistic-move bookkeeping: the last ledger-confirmed position,
//! the locally staged (not yet confirmed) move, and the phase of the
//! one outstanding transaction the client allows itself.

use serde::{Deserialize, Serialize};

use crate::game::board::Coordinate;
use crate::proof::commitment::Commitment;

/// Phase of the single outstanding move transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovePhase {
    /// No move in progress.
    Idle,
    /// A move is staged locally but not yet submitted.
    Staged,
    /// A move has been submitted and is awaiting the ledger's receipt.
    Confirming,
}

/// A locally computed move awaiting ledger acknowledgment.
///
/// The staged commitment always equals the commitment of the staged
/// coordinate under the current public parameters; both are written in
/// the same operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedMove {
    /// Destination coordinate (never sent to the ledger).
    pub coordinate: Coordinate,
    /// Commitment of the destination coordinate.
    pub commitment: Commitment,
}

/// The last move the ledger confirmed for this player.
///
/// The coordinate is kept locally so the next move can be computed
/// without a ledger round trip; the ledger itself only ever holds the
/// commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedMove {
    /// Plaintext coordinate, local-only.
    pub coordinate: Coordinate,
    /// Commitment the ledger stores for this player.
    pub commitment: Commitment,
}

/// Full local player state. Mutated only through the state machine's
/// entry points, never from two call paths at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Last ledger-confirmed move, if the account is initialized.
    pub confirmed: Option<ConfirmedMove>,
    /// Staged move, present only between staging and confirmation.
    pub staged: Option<StagedMove>,
    /// Transaction phase.
    pub phase: MovePhase,
}

impl Default for MovePhase {
    fn default() -> Self {
        Self::Idle
    }
}

impl PlayerState {
    /// Fresh state with nothing confirmed or staged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Has the ledger confirmed an initial position for this player?
    pub fn is_initialized(&self) -> bool {
        self.confirmed.is_some()
    }

    /// Record a staged move and enter the staged phase.
    pub fn stage(&mut self, staged: StagedMove) {
        self.staged = Some(staged);
        self.phase = MovePhase::Staged;
    }

    /// Drop any staged move and return to idle.
    ///
    /// Nothing was promoted, so there is nothing to roll back; the
    /// confirmed position is untouched.
    pub fn abandon_stage(&mut self) {
        self.staged = None;
        self.phase = MovePhase::Idle;
    }

    /// Promote the staged move to confirmed and return to idle.
    pub fn promote(&mut self, staged: StagedMove) {
        self.confirm(ConfirmedMove {
            coordinate: staged.coordinate,
            commitment: staged.commitment,
        });
    }

    /// Record a ledger-confirmed move directly, dropping any staged
    /// move, and return to idle.
    ///
    /// Used when the ledger finalized a commitment other than the
    /// staged one; the ledger's value is authoritative.
    pub fn confirm(&mut self, confirmed: ConfirmedMove) {
        self.confirmed = Some(confirmed);
        self.staged = None;
        self.phase = MovePhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::params::PublicParams;

    fn staged_at(x: u64, y: u64) -> StagedMove {
        let params = PublicParams::from_u64(23, 19, 5, 7).unwrap();
        let coordinate = Coordinate::from_u64(x, y);
        let commitment = coordinate.commitment(&params).unwrap();
        StagedMove {
            coordinate,
            commitment,
        }
    }

    #[test]
    fn test_stage_promote_cycle() {
        let mut state = PlayerState::new();
        assert_eq!(state.phase, MovePhase::Idle);
        assert!(!state.is_initialized());

        let staged = staged_at(4, 2);
        state.stage(staged.clone());
        assert_eq!(state.phase, MovePhase::Staged);

        state.promote(staged.clone());
        assert_eq!(state.phase, MovePhase::Idle);
        assert!(state.is_initialized());
        assert_eq!(
            state.confirmed.as_ref().map(|c| &c.commitment),
            Some(&staged.commitment)
        );
        assert!(state.staged.is_none());
    }

    #[test]
    fn test_abandon_leaves_confirmed_untouched() {
        let mut state = PlayerState::new();
        let first = staged_at(4, 2);
        state.stage(first.clone());
        state.promote(first.clone());

        state.stage(staged_at(5, 3));
        state.abandon_stage();
        assert_eq!(state.phase, MovePhase::Idle);
        assert!(state.staged.is_none());
        assert_eq!(
            state.confirmed.as_ref().map(|c| &c.coordinate),
            Some(&first.coordinate)
        );
    }
}
