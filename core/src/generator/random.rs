use super::*;

/// Exact-count rejection sampling that keeps the opening cell and its neighbors free of mines.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    start: Coord2,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64, start: Coord2) -> Self {
        Self { seed, start }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use rand::prelude::*;

        let (size_x, size_y) = config.size;
        if size_x == 0 || size_y == 0 {
            return Err(GameError::InvalidSize);
        }
        if self.start.0 >= size_x || self.start.1 >= size_y {
            return Err(GameError::InvalidCoords);
        }

        let zone = exclusion_zone(self.start, config.size).count() as CellCount;
        let free_cells = config.total_cells().saturating_sub(zone);
        if config.mines > free_cells {
            log::warn!(
                "Cannot place {} mines around opening {:?}, only {} cells available",
                config.mines,
                self.start,
                free_cells
            );
            return Err(GameError::TooManyMines {
                requested: config.mines,
                max: free_cells,
            });
        }

        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines_placed: CellCount = 0;
        let mut rejected: usize = 0;

        while mines_placed < config.mines {
            let coords = (rng.random_range(0..size_x), rng.random_range(0..size_y));
            if in_exclusion_zone(self.start, coords) || mine_mask[coords.to_nd_index()] {
                rejected += 1;
                continue;
            }
            mine_mask[coords.to_nd_index()] = true;
            mines_placed += 1;
        }

        log::debug!(
            "Placed {} mines around opening {:?} (seed {}, {} samples rejected)",
            mines_placed,
            self.start,
            self.seed,
            rejected
        );
        Ok(MineLayout::from_mine_mask(mine_mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exact_count_outside_opening_zone() {
        let config = GameConfig::new((9, 9), 10).unwrap();

        for seed in 0..64 {
            let layout = RandomMinefieldGenerator::new(seed, (4, 4))
                .generate(config)
                .unwrap();

            assert_eq!(layout.mine_count(), 10);
            assert!(layout.iter_mines().all(|pos| !in_exclusion_zone((4, 4), pos)));
        }
    }

    #[test]
    fn fills_every_free_cell_when_board_is_dense() {
        let config = GameConfig::new((5, 5), 16).unwrap();

        let layout = RandomMinefieldGenerator::new(7, (2, 2))
            .generate(config)
            .unwrap();

        for y in 0..5 {
            for x in 0..5 {
                assert_eq!(layout[(x, y)], !in_exclusion_zone((2, 2), (x, y)));
            }
        }
    }

    #[test]
    fn corner_opening_leaves_more_room() {
        // a corner opening only excludes four cells
        let config = GameConfig::new_unchecked((3, 3), 5);

        let layout = RandomMinefieldGenerator::new(3, (0, 0))
            .generate(config)
            .unwrap();

        assert_eq!(layout.mine_count(), 5);
        assert!(!layout[(0, 0)] && !layout[(1, 0)] && !layout[(0, 1)] && !layout[(1, 1)]);
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let config = Difficulty::Intermediate.config();

        let a = RandomMinefieldGenerator::new(42, (0, 0)).generate(config).unwrap();
        let b = RandomMinefieldGenerator::new(42, (0, 0)).generate(config).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn rejects_impossible_counts_instead_of_looping() {
        let config = GameConfig::new_unchecked((3, 3), 1);

        assert_eq!(
            RandomMinefieldGenerator::new(0, (1, 1)).generate(config),
            Err(GameError::TooManyMines {
                requested: 1,
                max: 0
            })
        );
    }

    #[test]
    fn rejects_opening_outside_board() {
        let config = GameConfig::new_unchecked((3, 3), 0);

        assert_eq!(
            RandomMinefieldGenerator::new(0, (3, 0)).generate(config),
            Err(GameError::InvalidCoords)
        );
    }
}
