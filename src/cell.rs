use serde::{Deserialize, Serialize};

/// Player-visible state of a single board cell.
///
/// Mine placement lives in the [`Minefield`](crate::Minefield); a cell only
/// records what the player can see. `Revealed` carries the adjacent-mine
/// count, `Exploded` is the single mine disclosed by a losing reveal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Hidden,
    Revealed(u8),
    Flagged,
    Exploded,
}

impl Cell {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }

    /// Whether this cell counts as disclosed for the reveal path.
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_) | Self::Exploded)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Hidden
    }
}
