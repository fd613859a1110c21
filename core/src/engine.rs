use core::fmt;
use rand::prelude::*;
use std::collections::VecDeque;
use web_time::Duration;

use crate::*;

/// Callback invoked with the fresh state after every operation that changed it.
pub type Listener = Box<dyn FnMut(&GameState)>;

/// Owns one game at a time and applies the player's moves to it.
///
/// Moves outside the valid state (finished game, already revealed target) are no-ops reported as
/// `NoChange`, only out-of-range coordinates and invalid configurations are errors. Winning is checked
/// separately through [`GameEngine::check_win`] so callers can batch several moves before checking.
pub struct GameEngine {
    state: GameState,
    rng: SmallRng,
    listeners: Vec<Listener>,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_seed(config, rand::rng().random())
    }

    /// Same seed and same moves always give the same mines.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        log::debug!("engine seed: {}", seed);
        Ok(Self {
            state: GameState::new(config),
            rng: SmallRng::seed_from_u64(seed),
            listeners: Vec::new(),
        })
    }

    /// Starts from a known layout, mine generation is skipped.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let layout = MineLayout::from_mine_coords(size, mine_coords)?;
        Ok(Self {
            state: GameState::with_layout(&layout)?,
            rng: SmallRng::seed_from_u64(rand::rng().random()),
            listeners: Vec::new(),
        })
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GameState) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> GameConfig {
        self.state.config()
    }

    pub fn board(&self) -> &Board {
        self.state.board()
    }

    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = &Cell>> {
        self.state.board().rows()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.state.board().cells()
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<&Cell> {
        self.state.board().get(coords)
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    pub fn elapsed(&self) -> Duration {
        self.state.elapsed()
    }

    pub fn mines_left(&self) -> isize {
        self.state.mines_left()
    }

    /// Throws the current game away and starts a blank one, an invalid configuration keeps the old game.
    pub fn reset(&mut self, width: Coord, height: Coord, mines: CellCount) -> Result<()> {
        let config = GameConfig::new((width, height), mines).inspect_err(|err| {
            log::warn!("rejected reset to {}x{} with {} mines: {}", width, height, mines, err)
        })?;
        self.state = GameState::new(config);
        self.notify();
        Ok(())
    }

    pub fn reveal_cell(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.state.board().validate_coords(coords)?;

        if !self.state.status().is_playing() || self.is_revealed(coords) {
            return Ok(RevealOutcome::NoChange);
        }

        if !self.state.mine_generated() {
            self.generate_mines(coords)?;
        }

        let outcome = self.reveal_single_cell(coords);
        if outcome.has_update() {
            self.notify();
        }
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.state.board().validate_coords(coords)?;

        if !self.state.status().is_playing() {
            return Ok(MarkOutcome::NoChange);
        }

        let outcome = match self.state.board_mut().get_mut(coords) {
            Some(cell) if !cell.revealed => {
                cell.flagged = !cell.flagged;
                log::trace!("flag at {:?} set to {}", coords, cell.flagged);
                MarkOutcome::Changed
            }
            _ => MarkOutcome::NoChange,
        };

        if outcome.has_update() {
            self.notify();
        }
        Ok(outcome)
    }

    /// Resolves the two local deductions around a revealed number: all its mines are flagged so the rest is
    /// safe, or every unknown neighbor has to be a mine.
    pub fn auto_expand_cell(&mut self, coords: Coord2) -> Result<ExpandOutcome> {
        use ExpandOutcome::*;

        let coords = self.state.board().validate_coords(coords)?;

        if !self.state.status().is_playing() {
            return Ok(NoChange);
        }

        let number = match self.state.board().get(coords) {
            Some(cell) if cell.is_numbered() => cell.adjacent_mines,
            _ => return Ok(NoChange),
        };
        let flags = self.state.board().count_flagged_neighbors(coords);
        let unknown = self.state.board().count_unknown_neighbors(coords);

        let mut outcome = NoChange;
        if flags == number {
            outcome = self.reveal_unknown_neighbors(coords).into();
        } else if number.checked_sub(flags) == Some(unknown) && self.flag_unknown_neighbors(coords) {
            outcome = Flagged;
        }

        // second pass over the counts taken before either move, mirrors the branch above
        if outcome != HitMine
            && flags.saturating_add(unknown) == number
            && self.flag_unknown_neighbors(coords)
        {
            outcome = Flagged;
        }

        log::debug!(
            "auto-expand at {:?} (number {}, flags {}, unknown {}): {:?}",
            coords,
            number,
            flags,
            unknown,
            outcome
        );
        if outcome.has_update() {
            self.notify();
        }
        Ok(outcome)
    }

    /// Ends the game as won once every safe cell is revealed, flags do not matter.
    pub fn check_win(&mut self) -> bool {
        match self.state.status() {
            GameStatus::Won => return true,
            GameStatus::Lost => return false,
            GameStatus::Play => {}
        }

        if self.state.board().unrevealed_safe_count() > 0 {
            return false;
        }

        if self.state.finish(GameStatus::Won) {
            self.notify();
        }
        true
    }

    fn generate_mines(&mut self, opening: Coord2) -> Result<()> {
        let layout =
            RandomMinefieldGenerator::new(self.rng.random(), opening).generate(self.state.config())?;
        self.state.apply_layout(&layout)
    }

    fn is_revealed(&self, coords: Coord2) -> bool {
        self.state.board().get(coords).is_some_and(|cell| cell.revealed)
    }

    /// Reveals one hidden cell, flagged or not, losing on a mine and flooding on a zero.
    fn reveal_single_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let Some(cell) = self.state.board_mut().get_mut(coords) else {
            return RevealOutcome::NoChange;
        };
        if cell.revealed {
            return RevealOutcome::NoChange;
        }

        cell.revealed = true;
        let (mine, adjacent_mines) = (cell.mine, cell.adjacent_mines);
        if !mine {
            clear_wrong_flag(cell);
        }

        if mine {
            log::debug!("hit mine at {:?}", coords);
            self.state.set_triggered_mine(coords);
            self.state.finish(GameStatus::Lost);
            return RevealOutcome::HitMine;
        }

        log::debug!("reveal cell at {:?}, mine count: {}", coords, adjacent_mines);
        if adjacent_mines == 0 {
            self.expand_zero(coords);
        }
        RevealOutcome::Revealed
    }

    /// Breadth-first flood from a revealed zero, cells are marked revealed before they are queued.
    fn expand_zero(&mut self, start: Coord2) {
        let board = self.state.board_mut();
        let mut to_visit = VecDeque::from([start]);
        let mut opened: usize = 0;

        while let Some(visit_coords) = to_visit.pop_front() {
            for pos in board.neighbors(visit_coords) {
                let Some(cell) = board.get_mut(pos) else {
                    continue;
                };
                if cell.revealed || cell.mine {
                    continue;
                }

                cell.revealed = true;
                clear_wrong_flag(cell);
                opened += 1;

                if cell.adjacent_mines == 0 {
                    to_visit.push_back(pos);
                }
            }
        }

        log::trace!("flood-fill from {:?} opened {} cells", start, opened);
    }

    fn reveal_unknown_neighbors(&mut self, coords: Coord2) -> RevealOutcome {
        let mut outcome = RevealOutcome::NoChange;
        for pos in self.state.board().neighbors(coords) {
            // flagged neighbors stay covered
            if !self.state.board().get(pos).is_some_and(Cell::is_unknown) {
                continue;
            }
            outcome = outcome | self.reveal_single_cell(pos);
            if outcome == RevealOutcome::HitMine {
                break;
            }
        }
        outcome
    }

    fn flag_unknown_neighbors(&mut self, coords: Coord2) -> bool {
        let board = self.state.board_mut();
        let mut updated = false;
        for pos in board.neighbors(coords) {
            if let Some(cell) = board.get_mut(pos).filter(|cell| cell.is_unknown()) {
                cell.flagged = true;
                updated = true;
            }
        }
        updated
    }

    fn notify(&mut self) {
        for listener in &mut self.listeners {
            listener(&self.state);
        }
    }
}

/// An opened safe cell drops its flag, so `mines_left` and the neighbor flag counts only see covered cells.
/// Mines keep theirs when shown after a loss.
fn clear_wrong_flag(cell: &mut Cell) {
    if cell.flagged {
        log::trace!("clearing wrong flag at {:?}", cell.coords());
        cell.flagged = false;
    }
}

impl fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEngine")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
