use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::ops::Index;

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use leaderboard::*;

mod cell;
mod engine;
mod error;
mod generator;
mod leaderboard;

/// Board position as `(row, col)`.
pub type Coords = (usize, usize);

/// Board shape and mine budget for one game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    /// `(rows, cols)`
    pub size: Coords,
    pub mines: usize,
}

impl Difficulty {
    pub fn new(size: Coords, mines: usize) -> Result<Self> {
        let (rows, cols) = size;
        if rows == 0 || cols == 0 || mines == 0 || mines >= rows * cols {
            return Err(GameError::TooManyMines);
        }
        Ok(Self { size, mines })
    }

    pub const fn easy() -> Self {
        Self { size: (9, 9), mines: 10 }
    }

    pub const fn medium() -> Self {
        Self { size: (16, 16), mines: 40 }
    }

    pub const fn hard() -> Self {
        Self { size: (16, 30), mines: 99 }
    }

    /// Label used as the leaderboard record key.
    pub fn label(&self) -> &'static str {
        if *self == Self::easy() {
            "Easy"
        } else if *self == Self::medium() {
            "Medium"
        } else if *self == Self::hard() {
            "Hard"
        } else {
            "Custom"
        }
    }

    pub const fn total_cells(&self) -> usize {
        self.size.0 * self.size.1
    }
}

// Displacement mapping for the 8 grid-adjacent directions
const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Will make coords + delta and return the result if it is within bounds
fn apply_delta(coords: Coords, delta: (isize, isize), bounds: Coords) -> Option<Coords> {
    let (row, col) = coords;
    let (dr, dc) = delta;
    let (rows, cols) = bounds;
    let nr = row.checked_add_signed(dr)?;
    if nr >= rows {
        return None;
    }
    let nc = col.checked_add_signed(dc)?;
    if nc >= cols {
        return None;
    }
    Some((nr, nc))
}

#[derive(Debug)]
struct IterNeighbors {
    center: Coords,
    bounds: Coords,
    index: usize,
}

impl IterNeighbors {
    fn new(center: Coords, bounds: Coords) -> Self {
        IterNeighbors {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for IterNeighbors {
    type Item = Coords;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.index >= DISPLACEMENTS.len() {
                return None;
            }
            let next_item = apply_delta(self.center, DISPLACEMENTS[self.index], self.bounds);
            self.index += 1;
            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

/// A fully generated board: mine mask plus per-cell adjacent-mine counts.
///
/// Immutable once built; the counts are computed exactly once after placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minefield {
    mines: Array2<bool>,
    counts: Array2<u8>,
    mine_count: usize,
}

impl Minefield {
    /// Build a deterministic field from explicit mine positions.
    pub fn from_mine_coords(size: Coords, mine_coords: &[Coords]) -> Result<Self> {
        let mut mines: Array2<bool> = Array2::default(size);
        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mines[coords] = true;
        }
        Ok(Self::from_mask(mines))
    }

    pub(crate) fn from_mask(mines: Array2<bool>) -> Self {
        let mine_count = mines.iter().filter(|&&mine| mine).count();
        let (rows, cols) = mines.dim();
        let mut counts: Array2<u8> = Array2::default((rows, cols));
        for row in 0..rows {
            for col in 0..cols {
                if mines[(row, col)] {
                    continue;
                }
                counts[(row, col)] = IterNeighbors::new((row, col), (rows, cols))
                    .filter(|&pos| mines[pos])
                    .count() as u8;
            }
        }
        Self {
            mines,
            counts,
            mine_count,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty {
            size: self.size(),
            mines: self.mine_count,
        }
    }

    pub fn validate_coords(&self, coords: Coords) -> Result<Coords> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coords {
        self.mines.dim()
    }

    pub fn total_cells(&self) -> usize {
        self.mines.len()
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coords) -> bool {
        self.mines[coords]
    }

    /// Number of mines among the up-to-8 grid-adjacent neighbors.
    pub fn adjacent_count(&self, coords: Coords) -> u8 {
        self.counts[coords]
    }

    pub fn iter_neighbors(&self, coords: Coords) -> impl Iterator<Item = Coords> {
        IterNeighbors::new(coords, self.size())
    }
}

impl Index<Coords> for Minefield {
    type Output = bool;

    fn index(&self, index: Coords) -> &Self::Output {
        &self.mines[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_rejects_mines_filling_the_board() {
        assert_eq!(Difficulty::new((2, 2), 4), Err(GameError::TooManyMines));
        assert_eq!(Difficulty::new((0, 9), 1), Err(GameError::TooManyMines));
        assert!(Difficulty::new((2, 2), 3).is_ok());
    }

    #[test]
    fn preset_labels_match_leaderboard_keys() {
        assert_eq!(Difficulty::easy().label(), "Easy");
        assert_eq!(Difficulty::medium().label(), "Medium");
        assert_eq!(Difficulty::hard().label(), "Hard");
        assert_eq!(Difficulty::new((5, 5), 3).unwrap().label(), "Custom");
    }

    #[test]
    fn preset_shapes() {
        assert_eq!(Difficulty::easy().size, (9, 9));
        assert_eq!(Difficulty::medium().mines, 40);
        assert_eq!(Difficulty::hard().size, (16, 30));
        assert_eq!(Difficulty::hard().total_cells(), 480);
    }

    #[test]
    fn from_mine_coords_rejects_out_of_bounds() {
        assert_eq!(
            Minefield::from_mine_coords((3, 3), &[(3, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn adjacent_counts_are_exact() {
        let field = Minefield::from_mine_coords((5, 5), &[(0, 0), (0, 1), (4, 4)]).unwrap();

        assert_eq!(field.mine_count(), 3);
        assert_eq!(field.adjacent_count((1, 0)), 2);
        assert_eq!(field.adjacent_count((1, 1)), 2);
        assert_eq!(field.adjacent_count((0, 2)), 1);
        assert_eq!(field.adjacent_count((2, 2)), 0);
        assert_eq!(field.adjacent_count((3, 3)), 1);
        assert_eq!(field.adjacent_count((4, 3)), 1);
    }

    #[test]
    fn neighbor_iteration_clips_at_edges() {
        let field = Minefield::from_mine_coords((3, 3), &[]).unwrap();

        let corner: Vec<_> = field.iter_neighbors((0, 0)).collect();
        assert_eq!(corner, vec![(0, 1), (1, 0), (1, 1)]);

        let center: Vec<_> = field.iter_neighbors((1, 1)).collect();
        assert_eq!(center.len(), 8);
    }
}
