use alloc::boxed::Box;
use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use core::fmt;
use core::ops::{BitOr, Index};
use hashbrown::HashSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Receives every square changed by a move, once per square, before [`Board::make_move`] returns.
pub type ChangeObserver = Box<dyn FnMut(Coord2, &Square)>;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Active,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Owns the grid and runs every move, whether it comes from a person or a [`Player`].
///
/// Mines are placed lazily: the first open or chord move runs the generator with the targeted cell as the safe
/// cell. Once the game is won or lost every further move is rejected with [`GameError::AlreadyEnded`].
pub struct Board {
    generator: Option<Box<dyn MinefieldGenerator>>,
    config: GameConfig,
    grid: Array2<Square>,
    first_move: bool,
    state: GameState,
    open_squares: HashSet<Coord2>,
    flagged_count: CellCount,
    triggered_mine: Option<Coord2>,
    observer: Option<ChangeObserver>,
    changed: Vec<Coord2>,
}

impl Board {
    pub fn new<G>(generator: G, width: Coord, height: Coord, mine_count: CellCount) -> Result<Self>
    where
        G: MinefieldGenerator + 'static,
    {
        let config = GameConfig::new((width, height), mine_count)?;
        Ok(Self::with_generator(Some(Box::new(generator)), config))
    }

    /// Builds a board whose mines are already in place, skipping generation.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let config = GameConfig::new(size, 0)?;
        let mut board = Self::with_generator(None, config);
        board.first_move = false;
        for &coords in mine_coords {
            board.place_mine(coords)?;
        }
        Ok(board)
    }

    fn with_generator(generator: Option<Box<dyn MinefieldGenerator>>, config: GameConfig) -> Self {
        Self {
            generator,
            config,
            grid: Array2::default(config.size.grid_index()),
            first_move: true,
            state: GameState::default(),
            open_squares: HashSet::new(),
            flagged_count: 0,
            triggered_mine: None,
            observer: None,
            changed: Vec::new(),
        }
    }

    /// Places a mine directly, replacing lazy generation.
    ///
    /// The first injected mine discards the mine count given at construction; afterwards the board counts exactly
    /// the mines that were placed. Only allowed before any cell is opened.
    pub fn place_mine(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        self.check_active()?;
        if !self.open_squares.is_empty() {
            return Err(GameError::AlreadyStarted);
        }

        // the first injection drops the requested count, so check against what will be on the board
        let placed = if self.first_move { 0 } else { self.config.mines };
        let already_mine = self.grid[coords.grid_index()].is_mine();
        if !already_mine && placed + 1 >= self.config.total_cells() {
            return Err(GameError::TooManyMines);
        }

        if self.first_move {
            self.first_move = false;
            self.generator = None;
            self.config.mines = 0;
        }
        if already_mine {
            return Ok(());
        }
        self.add_mine(coords);
        self.config.mines += 1;
        Ok(())
    }

    pub fn set_change_observer<F>(&mut self, observer: F)
    where
        F: FnMut(Coord2, &Square) + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_change_observer(&mut self) {
        self.observer = None;
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn width(&self) -> Coord {
        self.config.size.0
    }

    pub fn height(&self) -> Coord {
        self.config.size.1
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn game_won(&self) -> bool {
        matches!(self.state, GameState::Won)
    }

    pub fn game_ended(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_first_move(&self) -> bool {
        self.first_move
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// How many mines have not been flagged yet, negative when there are more flags than mines.
    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.flagged_count as isize)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn open_squares(&self) -> &HashSet<Coord2> {
        &self.open_squares
    }

    pub fn within_board(&self, x: i32, y: i32) -> bool {
        (0..i32::from(self.width())).contains(&x) && (0..i32::from(self.height())).contains(&y)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.width() && coords.1 < self.height() {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get_square_at(&self, x: Coord, y: Coord) -> Option<&Square> {
        self.grid.get((x, y).grid_index())
    }

    pub fn squares(&self) -> impl Iterator<Item = (Coord2, &Square)> {
        self.grid
            .indexed_iter()
            .map(|((x, y), square)| ((x as Coord, y as Coord), square))
    }

    /// Finds a closed cell, preferring unflagged ones. Scans column by column so the result is stable.
    pub fn find_unopened_square(&self) -> Option<Coord2> {
        let mut flagged = None;
        for (coords, square) in self.squares() {
            if square.is_opened() {
                continue;
            }
            if !square.is_flagged() {
                return Some(coords);
            }
            flagged.get_or_insert(coords);
        }
        flagged
    }

    /// Resets every highlight without notifying the observer.
    pub fn clear_highlights(&mut self) {
        for square in self.grid.iter_mut() {
            square.set_highlight(Highlight::None);
        }
    }

    /// Applies a move.
    ///
    /// Returns `Ok(false)` only when the move opened a mine. Out-of-range coordinates and moves after the game
    /// ended are errors and leave the board untouched.
    pub fn make_move(&mut self, mv: Move) -> Result<bool> {
        let coords = self.validate_coords(mv.coords)?;
        self.check_active()?;
        log::debug!("{:?} at {:?}", mv.kind, coords);

        let result = match mv.kind {
            MoveKind::Action(MoveType::Open) => self.open(coords),
            MoveKind::Action(MoveType::Flag) => Ok(self.toggle_flag(coords)),
            MoveKind::Action(MoveType::Chord) => self.chord(coords),
            MoveKind::Highlight(highlight) => {
                self.grid[coords.grid_index()].set_highlight(highlight);
                self.changed.push(coords);
                Ok(true)
            }
        };

        self.notify_changes();
        result
    }

    fn open(&mut self, coords: Coord2) -> Result<bool> {
        self.generate_if_first_move(coords)?;

        let square = self.grid[coords.grid_index()];
        if square.is_flagged() || square.is_opened() {
            return Ok(true);
        }

        let outcome = self.open_with_cascade(coords);
        Ok(self.settle(outcome))
    }

    fn toggle_flag(&mut self, coords: Coord2) -> bool {
        let square = &mut self.grid[coords.grid_index()];
        if square.is_opened() {
            return true;
        }

        square.toggle_flagged();
        if square.is_flagged() {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }
        self.changed.push(coords);
        true
    }

    fn chord(&mut self, coords: Coord2) -> Result<bool> {
        self.generate_if_first_move(coords)?;

        let square = self.grid[coords.grid_index()];
        if !square.is_opened() {
            return Ok(true);
        }
        if square.is_mine() {
            // an opened mine means the game is already lost, kept for consistency
            self.end_game(false);
            return Ok(false);
        }

        let flagged = self.count_flagged_neighbors(coords);
        if flagged != square.surrounding_mine_count() {
            log::debug!(
                "Chord at {:?} skipped, {} flags for {} mines",
                coords,
                flagged,
                square.surrounding_mine_count()
            );
            return Ok(true);
        }

        // flagged neighbors are trusted, even when wrong
        let targets: SmallVec<[Coord2; 8]> = self
            .neighbors(coords)
            .filter(|(_, neighbor)| neighbor.is_closed() && !neighbor.is_flagged())
            .map(|(pos, _)| pos)
            .collect();

        let outcome = targets
            .into_iter()
            .map(|neighbor_coords| self.open_with_cascade(neighbor_coords))
            .reduce(BitOr::bitor)
            .unwrap_or(OpenOutcome::NoChange);
        Ok(self.settle(outcome))
    }

    fn generate_if_first_move(&mut self, safe: Coord2) -> Result<()> {
        if !self.first_move {
            return Ok(());
        }

        if let Some(generator) = self.generator.as_mut() {
            let mines = generator.generate(self.config, safe)?;
            self.check_minefield(&mines, safe)?;

            let mut placed: CellCount = 0;
            for coords in mines {
                if self.add_mine(coords) {
                    placed += 1;
                }
            }
            if placed != self.config.mines {
                log::warn!(
                    "Generated minefield count mismatch, actual: {}, requested: {}",
                    placed,
                    self.config.mines
                );
                self.config.mines = placed;
            }
        }

        self.generator = None;
        self.first_move = false;
        log::debug!("Mines placed, first move at {:?}", safe);
        Ok(())
    }

    /// Rejects generator output that would panic on the grid or put a mine under the first move.
    fn check_minefield(&self, mines: &BTreeSet<Coord2>, safe: Coord2) -> Result<()> {
        if let Some(&outside) = mines.iter().find(|&&coords| self.validate_coords(coords).is_err()) {
            log::warn!("Generator placed a mine outside the board at {:?}", outside);
            return Err(GameError::InvalidCoords);
        }
        if mines.contains(&safe) {
            log::warn!("Generator placed a mine on the safe cell {:?}", safe);
            return Err(GameError::MineOnSafeCell);
        }
        if mines.len() >= usize::from(self.config.total_cells()) {
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }

    /// Marks a mine and bumps the counters around it. Returns `false` if the cell already held one.
    fn add_mine(&mut self, coords: Coord2) -> bool {
        let square = &mut self.grid[coords.grid_index()];
        if square.is_mine() {
            return false;
        }
        square.set_mine();
        for pos in Neighbors::around(coords, self.size()) {
            self.grid[pos.grid_index()].increment_adjacent();
        }
        true
    }

    fn neighbors(&self, coords: Coord2) -> impl Iterator<Item = (Coord2, Square)> {
        Neighbors::around(coords, self.size()).map(|pos| (pos, self.grid[pos.grid_index()]))
    }

    /// Opens a closed, unflagged cell; zero cells keep opening their neighbors until numbered cells bound the region.
    fn open_with_cascade(&mut self, coords: Coord2) -> OpenOutcome {
        let square = self.grid[coords.grid_index()];
        if square.is_opened() || square.is_flagged() {
            return OpenOutcome::NoChange;
        }

        if square.is_mine() {
            self.open_square(coords);
            self.triggered_mine.get_or_insert(coords);
            return OpenOutcome::HitMine;
        }

        let mut to_visit = VecDeque::from([coords]);
        while let Some(visit_coords) = to_visit.pop_front() {
            let visit = self.grid[visit_coords.grid_index()];
            // the opened flag doubles as the visited marker
            if visit.is_opened() || visit.is_flagged() {
                continue;
            }

            self.open_square(visit_coords);
            log::trace!(
                "Opened {:?}, mine count: {}",
                visit_coords,
                visit.surrounding_mine_count()
            );

            if visit.surrounding_mine_count() == 0 {
                to_visit.extend(
                    self.neighbors(visit_coords)
                        .filter(|(_, neighbor)| neighbor.is_closed() && !neighbor.is_flagged())
                        .map(|(pos, _)| pos),
                );
            }
        }

        OpenOutcome::Opened
    }

    fn open_square(&mut self, coords: Coord2) {
        self.grid[coords.grid_index()].open();
        self.open_squares.insert(coords);
        self.changed.push(coords);
    }

    /// Turns the merged outcome of a move into its result, ending the game when needed.
    fn settle(&mut self, outcome: OpenOutcome) -> bool {
        match outcome {
            OpenOutcome::HitMine => {
                self.end_game(false);
                false
            }
            OpenOutcome::Opened | OpenOutcome::NoChange => {
                if self.open_squares.len() == usize::from(self.config.safe_cell_count()) {
                    self.end_game(true);
                }
                true
            }
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won { GameState::Won } else { GameState::Lost };
        log::debug!("Game ended: {:?}", self.state);
    }

    fn notify_changes(&mut self) {
        match self.observer.as_mut() {
            Some(observer) => {
                for coords in self.changed.drain(..) {
                    observer(coords, &self.grid[coords.grid_index()]);
                }
            }
            None => self.changed.clear(),
        }
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.neighbors(coords)
            .filter(|(_, neighbor)| neighbor.is_flagged())
            .count() as u8
    }

    fn check_active(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

impl Index<Coord2> for Board {
    type Output = Square;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.grid[coords.grid_index()]
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("first_move", &self.first_move)
            .field("open_squares", &self.open_squares.len())
            .field("flagged_count", &self.flagged_count)
            .finish_non_exhaustive()
    }
}
