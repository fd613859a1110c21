use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use state::*;
pub use types::*;

mod board;
mod cell;
mod engine;
mod error;
mod generator;
mod state;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validates dimensions and caps the mine count so that every possible opening leaves room for all mines.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let (size_x, size_y) = self.size;
        if size_x == 0 || size_y == 0 {
            return Err(GameError::InvalidSize);
        }

        let max = self.max_mines();
        if self.mines > max {
            return Err(GameError::TooManyMines {
                requested: self.mines,
                max,
            });
        }

        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    /// Largest mine count that fits outside the safe zone of any opening.
    pub fn max_mines(&self) -> CellCount {
        self.total_cells()
            .saturating_sub(max_exclusion_zone(self.size))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Difficulty::default().config()
    }
}

/// Classic board presets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const fn config(self) -> GameConfig {
        use Difficulty::*;
        match self {
            Beginner => GameConfig::new_unchecked((9, 9), 10),
            Intermediate => GameConfig::new_unchecked((16, 16), 40),
            Expert => GameConfig::new_unchecked((30, 16), 99),
        }
    }
}

impl From<Difficulty> for GameConfig {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.config()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
        }
    }
}

/// Used to merge outcomes when revealing several cells at once
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// What an auto-expand deduced around a numbered cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExpandOutcome {
    NoChange,
    Revealed,
    Flagged,
    HitMine,
}

impl ExpandOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

impl From<RevealOutcome> for ExpandOutcome {
    fn from(outcome: RevealOutcome) -> Self {
        match outcome {
            RevealOutcome::NoChange => Self::NoChange,
            RevealOutcome::Revealed => Self::Revealed,
            RevealOutcome::HitMine => Self::HitMine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_empty_board() {
        assert_eq!(GameConfig::new((0, 5), 0), Err(GameError::InvalidSize));
        assert_eq!(GameConfig::new((5, 0), 0), Err(GameError::InvalidSize));
    }

    #[test]
    fn config_caps_mines_outside_opening_zone() {
        assert!(GameConfig::new((9, 9), 72).is_ok());
        assert_eq!(
            GameConfig::new((9, 9), 73),
            Err(GameError::TooManyMines {
                requested: 73,
                max: 72
            })
        );
        // a 1-wide board only ever excludes three cells
        assert!(GameConfig::new((1, 5), 2).is_ok());
        assert!(GameConfig::new((1, 5), 3).is_err());
    }

    #[test]
    fn difficulty_presets_are_valid() {
        for difficulty in [Difficulty::Beginner, Difficulty::Intermediate, Difficulty::Expert] {
            assert_eq!(difficulty.config().validate(), Ok(()));
        }
        assert_eq!(GameConfig::default().size, (9, 9));
        assert_eq!(GameConfig::from(Difficulty::Expert).mines, 99);
    }

    #[test]
    fn difficulty_deserializes_from_settings() {
        let difficulty: Difficulty = serde_json::from_str("\"intermediate\"").unwrap();
        assert_eq!(difficulty.config(), GameConfig::new_unchecked((16, 16), 40));

        let config: GameConfig = serde_json::from_str(r#"{"size":[8,6],"mines":5}"#).unwrap();
        assert_eq!(config.total_cells(), 48);
        assert_eq!(config.safe_cells(), 43);
    }

    #[test]
    fn reveal_outcomes_merge_with_hit_mine_priority() {
        use RevealOutcome::*;
        assert_eq!(NoChange | Revealed, Revealed);
        assert_eq!(Revealed | HitMine, HitMine);
        assert_eq!(NoChange | NoChange, NoChange);
        assert!(!NoChange.has_update());
    }
}
