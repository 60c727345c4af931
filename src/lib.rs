//! # Gridveil Client
//!
//! Hides a player's position on a shared coordinate grid behind a
//! discrete-log commitment, proves knowledge of that position without
//! revealing it, and keeps a locally-cached, eventually-consistent view
//! of every commitment the client has computed or observed.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     GRIDVEIL CLIENT                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Numeric primitives                        │
//! │  └── bigmath.rs  - Arbitrary-precision modular arithmetic    │
//! │                                                              │
//! │  proof/          - Commitments and zero-knowledge proofs     │
//! │  ├── params.rs   - Public parameters (p, q, g, h)            │
//! │  ├── commitment.rs - r = g^x * h^y mod m                     │
//! │  ├── challenge.rs  - Fiat-Shamir transcript hashing          │
//! │  └── dlog.rs     - Two-base representation proof             │
//! │                                                              │
//! │  game/           - Optimistic client state                   │
//! │  ├── board.rs    - Coordinates, torus wrap, known board      │
//! │  ├── state.rs    - Staged/confirmed player state             │
//! │  └── machine.rs  - Stage/submit/confirm state machine        │
//! │                                                              │
//! │  storage/        - Persisted cache capability                │
//! │  ledger/         - Gateway trait + in-memory ledger          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Trust Model
//!
//! The ledger stores only commitments; a plaintext coordinate leaves
//! the client exactly never. `initialize` binds an account to its first
//! commitment with a representation proof; ordinary moves ship only a
//! delta, which the ledger applies to the stored commitment itself.
//! Local state is optimistic: a move is staged before submission and
//! promoted to confirmed only when the ledger's receipt arrives, with a
//! stale-confirmation guard for receipts that outlive their stage.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod ledger;
pub mod proof;
pub mod storage;

// Re-export commonly used types
pub use game::{
    ClientError, ConfirmOutcome, Coordinate, GameClient, KnownBoard, MoveDelta, MovePhase,
    PlayerState,
};
pub use ledger::{AccountId, GatewayError, InMemoryLedger, LedgerGateway, Receipt};
pub use proof::{commit, prove, verify, Commitment, PublicParams, RepresentationProof};
pub use storage::{CacheStore, JsonFileStore, MemoryStore, PersistedCache};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Seconds between self-exploration ticks in the demo client.
pub const EXPLORE_INTERVAL_SECS: u64 = 5;
