/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`, also used for `(width, height)`.
pub type Coord2 = (Coord, Coord);

/// Converts board coordinates into an `ndarray` index, `[x, y]`.
pub trait GridIndex {
    fn grid_index(self) -> [usize; 2];
}

impl GridIndex for Coord2 {
    fn grid_index(self) -> [usize; 2] {
        [self.0.into(), self.1.into()]
    }
}

/// Number of cells on a board of the given size.
pub const fn area((width, height): Coord2) -> CellCount {
    (width as CellCount) * (height as CellCount)
}

/// The up to eight cells touching `center`, clipped to `bounds`.
///
/// Yields row by row from the top-left: ↖ ↑ ↗ ← → ↙ ↓ ↘.
#[derive(Debug, Clone)]
pub struct Neighbors {
    center: Coord2,
    bounds: Coord2,
    step: u8,
}

impl Neighbors {
    pub fn around(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            step: 0,
        }
    }
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while self.step < 9 {
            let step = self.step;
            self.step += 1;
            if step == 4 {
                continue;
            }

            let dx = (step % 3) as i8 - 1;
            let dy = (step / 3) as i8 - 1;
            let Some(x) = self.center.0.checked_add_signed(dx) else {
                continue;
            };
            let Some(y) = self.center.1.checked_add_signed(dy) else {
                continue;
            };
            if x < self.bounds.0 && y < self.bounds.1 {
                return Some((x, y));
            }
        }
        None
    }
}
