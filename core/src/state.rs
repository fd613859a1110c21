use serde::{Deserialize, Serialize};
use web_time::{Duration, Instant};

use crate::*;

/// How long a frontend should wait after a loss before announcing it, the board itself updates immediately.
pub const LOSS_NOTICE_DELAY: Duration = Duration::from_millis(300);

/// Valid transitions:
/// - Play -> Won
/// - Play -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Play,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Play)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Everything one game owns, replaced wholesale on reset.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    mine_generated: bool,
    status: GameStatus,
    started_at: Instant,
    ended_at: Option<Instant>,
    triggered_mine: Option<Coord2>,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        let started_at = Instant::now();
        log::debug!("new {:?} game started at {:?}", config, started_at);
        Self {
            config,
            board: Board::new(config.size),
            mine_generated: false,
            status: GameStatus::Play,
            started_at,
            ended_at: None,
            triggered_mine: None,
        }
    }

    /// A game whose mines are already known, as if generation had happened.
    pub fn with_layout(layout: &MineLayout) -> Result<Self> {
        let config = GameConfig::new_unchecked(layout.size(), layout.mine_count());
        let mut state = Self::new(config);
        state.apply_layout(layout)?;
        Ok(state)
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn mine_generated(&self) -> bool {
        self.mine_generated
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Instant> {
        self.ended_at
    }

    /// The mine whose reveal lost the game, if any.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Time spent so far, frozen once the game has ended.
    pub fn elapsed(&self) -> Duration {
        self.ended_at
            .unwrap_or_else(Instant::now)
            .saturating_duration_since(self.started_at)
    }

    /// How many mines have not been flagged yet, negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.board.flag_count() as isize)
    }

    /// Earliest instant a loss should be surfaced to the player.
    pub fn loss_notice_due(&self) -> Option<Instant> {
        match (self.status, self.ended_at) {
            (GameStatus::Lost, Some(ended_at)) => Some(ended_at + LOSS_NOTICE_DELAY),
            _ => None,
        }
    }

    pub(crate) fn apply_layout(&mut self, layout: &MineLayout) -> Result<()> {
        self.board.place_mines(layout)?;
        self.mine_generated = true;
        Ok(())
    }

    pub(crate) fn set_triggered_mine(&mut self, coords: Coord2) {
        if self.triggered_mine.is_none() {
            self.triggered_mine = Some(coords);
        }
    }

    /// Leaves Play, returns whether anything changed.
    pub(crate) fn finish(&mut self, status: GameStatus) -> bool {
        if self.status.is_finished() || status.is_playing() {
            return false;
        }

        let now = Instant::now();
        self.status = status;
        self.ended_at = Some(now);
        log::debug!("game ended {:?} after {:?}", status, now - self.started_at);

        if status == GameStatus::Lost {
            let shown = self.board.show_all_mines();
            log::trace!("revealed {} remaining mines", shown);
        }
        true
    }
}
