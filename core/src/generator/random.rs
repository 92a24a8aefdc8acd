use alloc::vec::Vec;
use ndarray::Array2;

use super::*;

/// Generation strategy that keeps the starting cell, and optionally its neighbors, free of mines; other than that is
/// purely random.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    safe_zone: SafeZone,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64, safe_zone: SafeZone) -> Self {
        Self { seed, safe_zone }
    }

    #[cfg(feature = "std")]
    pub fn from_entropy(safe_zone: SafeZone) -> Self {
        use rand::Rng;
        Self::new(rand::rng().random(), safe_zone)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn safe_zone(&self) -> SafeZone {
        self.safe_zone
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(&mut self, config: GameConfig, safe: Coord2) -> Result<BTreeSet<Coord2>> {
        use SafeZone::*;
        use rand::prelude::*;

        let (width, height) = config.size;
        if safe.0 >= width || safe.1 >= height {
            return Err(GameError::InvalidCoords);
        }

        let total_cells = config.total_cells();
        if config.mines >= total_cells {
            return Err(GameError::TooManyMines);
        }

        let mut reserved: Array2<bool> = Array2::default(config.size.grid_index());
        reserved[safe.grid_index()] = true;

        let neighbors = Neighbors::around(safe, config.size);
        let actual_safe_zone = match self.safe_zone {
            Cell => Cell,
            Neighborhood if config.mines + 1 + neighbors.clone().count() as CellCount > total_cells => {
                log::warn!("Cannot keep neighbors of {:?} free, fallback to single safe cell", safe);
                Cell
            }
            Neighborhood => Neighborhood,
        };
        if actual_safe_zone == Neighborhood {
            for coords in neighbors {
                reserved[coords.grid_index()] = true;
            }
        }

        let candidates: Vec<Coord2> = reserved
            .indexed_iter()
            .filter(|&(_, &is_reserved)| !is_reserved)
            .map(|((x, y), _)| (x as Coord, y as Coord))
            .collect();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mines: BTreeSet<Coord2> =
            rand::seq::index::sample(&mut rng, candidates.len(), config.mines.into())
                .iter()
                .map(|i| candidates[i])
                .collect();

        log::debug!(
            "Generated {} mines on {}x{} around safe cell {:?} ({:?})",
            mines.len(),
            width,
            height,
            safe,
            actual_safe_zone
        );
        Ok(mines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(size: Coord2, mines: CellCount) -> GameConfig {
        GameConfig::new(size, mines).unwrap()
    }

    #[test]
    fn generates_exact_mine_count() {
        let mut generator = RandomMinefieldGenerator::new(7, SafeZone::Neighborhood);

        let mines = generator.generate(config((30, 16), 99), (10, 10)).unwrap();

        assert_eq!(mines.len(), 99);
        assert!(mines.iter().all(|&(x, y)| x < 30 && y < 16));
    }

    #[test]
    fn neighborhood_stays_free() {
        for seed in 0..20 {
            let mut generator = RandomMinefieldGenerator::new(seed, SafeZone::Neighborhood);

            let mines = generator.generate(config((9, 9), 70), (4, 4)).unwrap();

            assert!(!mines.contains(&(4, 4)));
            for coords in Neighbors::around((4, 4), (9, 9)) {
                assert!(!mines.contains(&coords));
            }
        }
    }

    #[test]
    fn single_cell_zone_only_protects_safe_cell() {
        let mut generator = RandomMinefieldGenerator::new(3, SafeZone::Cell);

        let mines = generator.generate(config((3, 3), 8), (1, 1)).unwrap();

        assert_eq!(mines.len(), 8);
        assert!(!mines.contains(&(1, 1)));
    }

    #[test]
    fn crowded_board_falls_back_to_single_safe_cell() {
        let mut generator = RandomMinefieldGenerator::new(3, SafeZone::Neighborhood);

        let mines = generator.generate(config((4, 4), 13), (0, 0)).unwrap();

        assert_eq!(mines.len(), 13);
        assert!(!mines.contains(&(0, 0)));
    }

    #[test]
    fn same_seed_same_layout() {
        let cfg = config((16, 16), 40);
        let first = RandomMinefieldGenerator::new(42, SafeZone::Neighborhood)
            .generate(cfg, (0, 0))
            .unwrap();
        let second = RandomMinefieldGenerator::new(42, SafeZone::Neighborhood)
            .generate(cfg, (0, 0))
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn rejects_full_board_and_bad_safe_cell() {
        let mut generator = RandomMinefieldGenerator::new(0, SafeZone::Cell);

        assert_eq!(
            generator.generate(GameConfig::new_unchecked((3, 3), 9), (0, 0)),
            Err(GameError::TooManyMines)
        );
        assert_eq!(
            generator.generate(config((3, 3), 1), (3, 0)),
            Err(GameError::InvalidCoords)
        );
    }
}
