//! Coordinates and the Known Board
//!
//! The grid has `(p-1) x (q-1)` cells and wraps like a torus: moving
//! off one edge re-enters on the opposite edge. The known board is the
//! client's locally cached map of coordinates to the commitments it has
//! computed for them.

use std::collections::BTreeMap;

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::core::bigmath::MathError;
use crate::proof::commitment::{commit, Commitment};
use crate::proof::params::PublicParams;

/// A grid position `(x, y)` with `x < p-1`, `y < q-1`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// Horizontal component, in `[0, p-2]`.
    pub x: BigUint,
    /// Vertical component, in `[0, q-2]`.
    pub y: BigUint,
}

impl Coordinate {
    /// Construct from machine words (tests, demos).
    pub fn from_u64(x: u64, y: u64) -> Self {
        Self {
            x: BigUint::from(x),
            y: BigUint::from(y),
        }
    }

    /// Is this coordinate inside the grid declared by `params`?
    pub fn in_grid(&self, params: &PublicParams) -> bool {
        self.x < params.grid_width() && self.y < params.grid_height()
    }

    /// Commitment to this coordinate under `params`.
    pub fn commitment(&self, params: &PublicParams) -> Result<Commitment, MathError> {
        commit(params, &self.x, &self.y)
    }

    /// Apply a signed delta with torus wrap-around.
    ///
    /// Each component is reduced modulo its grid dimension, so any
    /// delta (including large negative ones) lands back on the grid.
    pub fn wrapping_add(&self, delta: &MoveDelta, params: &PublicParams) -> Self {
        let width = BigInt::from(params.grid_width());
        let height = BigInt::from(params.grid_height());
        let x = (BigInt::from(self.x.clone()) + &delta.dx).mod_floor(&width);
        let y = (BigInt::from(self.y.clone()) + &delta.dy).mod_floor(&height);
        Self {
            // mod_floor with a positive modulus is non-negative
            x: x.to_biguint().unwrap_or_default(),
            y: y.to_biguint().unwrap_or_default(),
        }
    }

    /// Draw a uniformly random coordinate from the grid.
    pub fn random<R: RngCore + CryptoRng>(params: &PublicParams, rng: &mut R) -> Self {
        Self {
            x: rng.gen_biguint_below(&params.grid_width()),
            y: rng.gen_biguint_below(&params.grid_height()),
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A signed move step `(dx, dy)`. The ledger receives only this delta,
/// never the destination coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDelta {
    /// Horizontal step.
    pub dx: BigInt,
    /// Vertical step.
    pub dy: BigInt,
}

impl MoveDelta {
    /// Construct from machine words.
    pub fn new(dx: i64, dy: i64) -> Self {
        Self {
            dx: BigInt::from(dx),
            dy: BigInt::from(dy),
        }
    }
}

/// One known-board entry, used for the serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoardEntry {
    coordinate: Coordinate,
    commitment: Commitment,
}

/// The client's sparse cache of coordinate -> commitment entries.
///
/// Grows monotonically: entries are only added, or overwritten with the
/// same value (the commitment of a coordinate is a pure function of the
/// public parameters). Serialized as an entry list so the JSON form is
/// stable regardless of map internals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<BoardEntry>", into = "Vec<BoardEntry>")]
pub struct KnownBoard {
    entries: BTreeMap<Coordinate, Commitment>,
}

impl KnownBoard {
    /// Empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the cache empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the cached commitment for a coordinate.
    pub fn get(&self, coordinate: &Coordinate) -> Option<&Commitment> {
        self.entries.get(coordinate)
    }

    /// Record a coordinate's commitment.
    ///
    /// Idempotent for a fixed parameter set; an attempt to change an
    /// existing entry to a different value is reported so the caller
    /// can treat it as cache corruption.
    pub fn record(&mut self, coordinate: Coordinate, commitment: Commitment) -> bool {
        match self.entries.get(&coordinate) {
            Some(existing) if *existing != commitment => false,
            _ => {
                self.entries.insert(coordinate, commitment);
                true
            }
        }
    }

    /// Iterate over cached entries in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (&Coordinate, &Commitment)> {
        self.entries.iter()
    }
}

impl From<Vec<BoardEntry>> for KnownBoard {
    fn from(entries: Vec<BoardEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| (e.coordinate, e.commitment))
                .collect(),
        }
    }
}

impl From<KnownBoard> for Vec<BoardEntry> {
    fn from(board: KnownBoard) -> Self {
        board
            .entries
            .into_iter()
            .map(|(coordinate, commitment)| BoardEntry {
                coordinate,
                commitment,
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn toy_params() -> PublicParams {
        PublicParams::from_u64(23, 19, 5, 7).unwrap()
    }

    #[test]
    fn test_wrapping_add_basic() {
        let params = toy_params();
        let c = Coordinate::from_u64(4, 2);
        let moved = c.wrapping_add(&MoveDelta::new(1, 1), &params);
        assert_eq!(moved, Coordinate::from_u64(5, 3));
    }

    #[test]
    fn test_wrapping_add_negative() {
        let params = toy_params();
        let c = Coordinate::from_u64(0, 0);
        let moved = c.wrapping_add(&MoveDelta::new(-1, -1), &params);
        // Wraps to the far corner: (21, 17) on a 22 x 18 grid
        assert_eq!(moved, Coordinate::from_u64(21, 17));
    }

    #[test]
    fn test_full_lap_is_identity() {
        // Moving by a whole grid dimension lands on the same cell with
        // the same commitment.
        let params = toy_params();
        let c = Coordinate::from_u64(4, 2);
        let lap = c.wrapping_add(&MoveDelta::new(22, 0), &params);
        assert_eq!(lap, c);
        assert_eq!(
            lap.commitment(&params).unwrap(),
            c.commitment(&params).unwrap()
        );

        let lap = c.wrapping_add(&MoveDelta::new(0, 18), &params);
        assert_eq!(lap, c);
    }

    #[test]
    fn test_random_coordinate_in_grid() {
        let params = toy_params();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(Coordinate::random(&params, &mut rng).in_grid(&params));
        }
    }

    #[test]
    fn test_board_record_and_get() {
        let params = toy_params();
        let mut board = KnownBoard::new();
        let c = Coordinate::from_u64(4, 2);
        let r = c.commitment(&params).unwrap();

        assert!(board.record(c.clone(), r.clone()));
        assert_eq!(board.get(&c), Some(&r));
        assert_eq!(board.len(), 1);

        // Idempotent overwrite
        assert!(board.record(c.clone(), r.clone()));
        assert_eq!(board.len(), 1);

        // Conflicting overwrite is refused
        assert!(!board.record(c.clone(), Commitment(BigUint::from(1u32))));
        assert_eq!(board.get(&c), Some(&r));
    }

    #[test]
    fn test_board_json_round_trip() {
        let params = toy_params();
        let mut board = KnownBoard::new();
        for (x, y) in [(0u64, 0u64), (4, 2), (21, 17)] {
            let c = Coordinate::from_u64(x, y);
            let r = c.commitment(&params).unwrap();
            board.record(c, r);
        }
        let json = serde_json::to_string(&board).unwrap();
        let restored: KnownBoard = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, board);
    }

    proptest! {
        /// Wrap-around idempotence: any delta that is a multiple of the
        /// grid dimensions is the identity move.
        #[test]
        fn prop_wrap_identity(x in 0u64..22, y in 0u64..18, laps_x in -3i64..3, laps_y in -3i64..3) {
            let params = toy_params();
            let c = Coordinate::from_u64(x, y);
            let delta = MoveDelta::new(laps_x * 22, laps_y * 18);
            prop_assert_eq!(c.wrapping_add(&delta, &params), c);
        }

        /// Wrapped coordinates always land inside the grid.
        #[test]
        fn prop_wrap_in_grid(x in 0u64..22, y in 0u64..18, dx in -100i64..100, dy in -100i64..100) {
            let params = toy_params();
            let c = Coordinate::from_u64(x, y);
            prop_assert!(c.wrapping_add(&MoveDelta::new(dx, dy), &params).in_grid(&params));
        }
    }
}
