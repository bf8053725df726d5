use ndarray::Array2;
use rand::prelude::*;

use crate::*;

pub trait MinefieldGenerator {
    fn generate(self, difficulty: &Difficulty) -> Result<Minefield>;
}

/// Rejection-sampling generator that keeps the 3x3 neighborhood around the
/// first revealed cell clear of mines.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SafeZoneGenerator {
    seed: u64,
    safe: Coords,
}

impl SafeZoneGenerator {
    pub fn new(seed: u64, safe: Coords) -> Self {
        Self { seed, safe }
    }
}

impl MinefieldGenerator for SafeZoneGenerator {
    fn generate(self, difficulty: &Difficulty) -> Result<Minefield> {
        let (rows, cols) = difficulty.size;
        let (safe_row, safe_col) = self.safe;

        if safe_row >= rows || safe_col >= cols {
            return Err(GameError::InvalidCoords);
        }

        let total_cells = difficulty.total_cells();
        if difficulty.mines >= total_cells {
            return Err(GameError::TooManyMines);
        }

        // The zone clips at the board edges, so its size depends on where the
        // first click landed. Checking it up front keeps sampling from
        // spinning forever on boards with no room left.
        let zone_rows = (safe_row + 2).min(rows) - safe_row.saturating_sub(1);
        let zone_cols = (safe_col + 2).min(cols) - safe_col.saturating_sub(1);
        if difficulty.mines > total_cells - zone_rows * zone_cols {
            return Err(GameError::SafeZoneTooTight);
        }

        let mut mines: Array2<bool> = Array2::default(difficulty.size);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut placed = 0;
        while placed < difficulty.mines {
            let row = rng.gen_range(0..rows);
            let col = rng.gen_range(0..cols);
            if mines[(row, col)] {
                continue;
            }
            if row.abs_diff(safe_row) <= 1 && col.abs_diff(safe_col) <= 1 {
                continue;
            }
            mines[(row, col)] = true;
            placed += 1;
        }

        log::debug!(
            "Placed {} mines on a {}x{} board, safe cell {:?}",
            placed,
            rows,
            cols,
            self.safe
        );
        Ok(Minefield::from_mask(mines))
    }
}
