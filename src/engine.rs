use chrono::prelude::*;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - NotStarted -> Won (pre-built field, flags only)
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Initial state, mines not necessarily placed yet
    NotStarted,
    /// First reveal done, clock running
    InProgress,
    /// Game ended and player won
    Won,
    /// Game ended and player lost
    Lost,
}

impl GameState {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// Why a flag toggle was refused. These are expected gameplay outcomes, not
/// errors; the board is left untouched.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagRejection {
    CellAlreadyRevealed,
    NoFlagsRemaining,
}

/// Outcome of toggling a flag
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    Flagged,
    Unflagged,
    Rejected(FlagRejection),
}

impl FlagOutcome {
    /// Whether this outcome changed the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::Flagged => true,
            Self::Unflagged => true,
            Self::Rejected(_) => false,
        }
    }
}

/// Outcome of revealing a cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The target was a mine; the game is lost
    HitMine,
    /// Every cell newly revealed by this call, flood fill included. Empty
    /// when the target was already revealed or flagged.
    Disclosed(BTreeSet<Coords>),
}

impl RevealOutcome {
    /// Whether this outcome changed the game
    pub fn has_update(&self) -> bool {
        match self {
            Self::HitMine => true,
            Self::Disclosed(cells) => !cells.is_empty(),
        }
    }
}

/// Represents a game from start to finish.
///
/// Mines are placed lazily: the first [`reveal`](Game::reveal) runs the
/// generator with the target as safe cell, so the first click never loses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    difficulty: Difficulty,
    minefield: Option<Minefield>,
    grid: Array2<Cell>,
    flags_left: usize,
    state: GameState,
    seed: u64,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    triggered_mine: Option<Coords>,
}

impl Game {
    pub fn new(difficulty: Difficulty) -> Game {
        Self::with_seed(difficulty, rand::random())
    }

    /// Like [`Game::new`] but with a fixed generation seed.
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Game {
        Self {
            difficulty,
            minefield: None,
            grid: Array2::default(difficulty.size),
            flags_left: difficulty.mines,
            state: Default::default(),
            seed,
            started_at: None,
            ended_at: None,
            triggered_mine: None,
        }
    }

    /// Start from a pre-built field; the first reveal skips generation.
    pub fn from_minefield(minefield: Minefield) -> Game {
        let difficulty = minefield.difficulty();
        Self {
            difficulty,
            minefield: Some(minefield),
            grid: Array2::default(difficulty.size),
            flags_left: difficulty.mines,
            state: Default::default(),
            seed: 0,
            started_at: None,
            ended_at: None,
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn ended(&self) -> bool {
        self.state.is_final()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn size(&self) -> Coords {
        self.difficulty.size
    }

    pub fn total_mines(&self) -> usize {
        self.difficulty.mines
    }

    /// Flags still available to place
    pub fn flags_left(&self) -> usize {
        self.flags_left
    }

    pub fn cell_at(&self, coords: Coords) -> Cell {
        self.grid[coords]
    }

    /// The mine disclosed by the losing reveal, if the game is lost
    pub fn triggered_mine(&self) -> Option<Coords> {
        self.triggered_mine
    }

    /// The generated field, or `None` before the first reveal
    pub fn minefield(&self) -> Option<&Minefield> {
        self.minefield.as_ref()
    }

    /// Seconds since the first reveal, frozen once the game ends. 0.0 before
    /// the game starts.
    pub fn elapsed_secs(&self) -> f64 {
        if let Some(started_at) = self.started_at {
            let ended_at = self.ended_at.unwrap_or_else(Utc::now);
            (ended_at - started_at).num_milliseconds().max(0) as f64 / 1000.0
        } else {
            0.0
        }
    }

    /// Reveal a cell, generating the minefield first if this is the first
    /// reveal of the game.
    pub fn reveal(&mut self, coords: Coords) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_final()?;

        // revealing a flagged or already revealed cell changes nothing and
        // must not trigger generation either
        if !self.grid[coords].is_hidden() {
            return Ok(RevealOutcome::Disclosed(BTreeSet::new()));
        }

        if self.minefield.is_none() {
            let minefield = SafeZoneGenerator::new(self.seed, coords).generate(&self.difficulty)?;
            self.minefield = Some(minefield);
        }
        self.mark_start();

        let outcome = self.reveal_from(coords);
        if outcome.has_update() && !matches!(outcome, RevealOutcome::HitMine) {
            self.check_win();
        }
        Ok(outcome)
    }

    /// Toggle a flag on a cell. Flagging is refused, without touching the
    /// board, once the flag budget is exhausted or on a revealed cell.
    pub fn toggle_flag(&mut self, coords: Coords) -> Result<FlagOutcome> {
        use FlagOutcome::*;

        let coords = self.validate_coords(coords)?;
        self.check_final()?;

        let outcome = match self.grid[coords] {
            Cell::Hidden if self.flags_left == 0 => Rejected(FlagRejection::NoFlagsRemaining),
            Cell::Hidden => {
                self.grid[coords] = Cell::Flagged;
                self.flags_left -= 1;
                Flagged
            }
            Cell::Flagged => {
                self.grid[coords] = Cell::Hidden;
                self.flags_left += 1;
                Unflagged
            }
            Cell::Revealed(_) | Cell::Exploded => Rejected(FlagRejection::CellAlreadyRevealed),
        };

        if outcome.has_update() {
            self.check_win();
        }
        Ok(outcome)
    }

    /// Reveal a single hidden cell and flood-fill outward from a zero count.
    fn reveal_from(&mut self, coords: Coords) -> RevealOutcome {
        let Some(minefield) = &self.minefield else {
            // reveal() generates before disclosing anything
            return RevealOutcome::Disclosed(BTreeSet::new());
        };

        if minefield.contains_mine(coords) {
            self.grid[coords] = Cell::Exploded;
            self.triggered_mine = Some(coords);
            self.state = GameState::Lost;
            self.ended_at = Some(Utc::now());
            return RevealOutcome::HitMine;
        }

        let mut disclosed = BTreeSet::new();
        let count = minefield.adjacent_count(coords);
        self.grid[coords] = Cell::Revealed(count);
        disclosed.insert(coords);
        log::debug!("Revealed cell at {:?}, mine count: {}", coords, count);

        if count == 0 {
            let mut visited = BTreeSet::from([coords]);
            let mut to_visit: VecDeque<_> = minefield.iter_neighbors(coords).collect();

            while let Some(visit_coords) = to_visit.pop_front() {
                if !visited.insert(visit_coords) {
                    continue;
                }

                // skip flagged or already revealed cells; flood fill never
                // removes a player's flag
                if !self.grid[visit_coords].is_hidden() {
                    log::trace!("Skipping cell at {:?}", visit_coords);
                    continue;
                }

                let visit_count = minefield.adjacent_count(visit_coords);
                self.grid[visit_coords] = Cell::Revealed(visit_count);
                disclosed.insert(visit_coords);
                log::trace!(
                    "Flood revealed cell at {:?}, mine count: {}",
                    visit_coords,
                    visit_count
                );

                // only zero cells keep expanding the frontier
                if visit_count == 0 {
                    to_visit.extend(
                        minefield
                            .iter_neighbors(visit_coords)
                            .filter(|pos| !visited.contains(pos)),
                    );
                }
            }
        }

        RevealOutcome::Disclosed(disclosed)
    }

    /// The game is won exactly when every mine is flagged and nothing else
    /// is. Skipped while mines are not placed yet.
    fn check_win(&mut self) {
        let Some(minefield) = &self.minefield else {
            return;
        };
        if self.state.is_final() {
            return;
        }

        let (rows, cols) = minefield.size();
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                if minefield.contains_mine(coords) != self.grid[coords].is_flagged() {
                    return;
                }
            }
        }

        self.state = GameState::Won;
        self.ended_at = Some(Utc::now());
    }

    /// Changes to in-progress on the first reveal, recording the start time
    fn mark_start(&mut self) {
        if self.state.is_initial() {
            self.state = GameState::InProgress;
            self.started_at = Some(Utc::now());
        }
    }

    fn validate_coords(&self, coords: Coords) -> Result<Coords> {
        let (rows, cols) = self.difficulty.size;
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    fn check_final(&self) -> Result<()> {
        if self.state.is_final() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
