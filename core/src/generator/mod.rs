use alloc::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

/// Places mines for a fresh board.
///
/// Implementations must never return `safe`, and must return exactly `config.mines` distinct coordinates inside
/// `config.size`, or an error when that is impossible.
pub trait MinefieldGenerator {
    fn generate(&mut self, config: GameConfig, safe: Coord2) -> Result<BTreeSet<Coord2>>;
}

/// How much of the board around the first opened cell is kept free of mines.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafeZone {
    /// Only the opened cell itself.
    Cell,
    /// The opened cell and its neighbors, so the first open always cascades.
    #[default]
    Neighborhood,
}
