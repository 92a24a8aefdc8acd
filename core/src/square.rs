use serde::{Deserialize, Serialize};

/// Presentation hint attached to a square, independent from its game state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Highlight {
    #[default]
    None,
    Red,
    Green,
}

/// State of a single cell on the board.
///
/// `mine` and `adjacent_mines` are fixed once mines have been placed, `opened` only ever goes from `false` to `true`.
/// The square does not police flagging an opened cell; the board checks that before calling [`Square::toggle_flagged`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Square {
    mine: bool,
    opened: bool,
    flagged: bool,
    highlight: Highlight,
    adjacent_mines: u8,
}

impl Square {
    pub const fn is_mine(&self) -> bool {
        self.mine
    }

    pub const fn is_opened(&self) -> bool {
        self.opened
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Closed, whether flagged or not.
    pub const fn is_closed(&self) -> bool {
        !self.opened
    }

    pub const fn highlight(&self) -> Highlight {
        self.highlight
    }

    /// Number of mines among the eight neighbors.
    pub const fn surrounding_mine_count(&self) -> u8 {
        self.adjacent_mines
    }

    pub fn open(&mut self) {
        self.opened = true;
    }

    pub fn set_mine(&mut self) {
        self.mine = true;
    }

    pub fn toggle_flagged(&mut self) {
        self.flagged = !self.flagged;
    }

    pub fn set_highlight(&mut self, highlight: Highlight) {
        self.highlight = highlight;
    }

    pub(crate) fn increment_adjacent(&mut self) {
        self.adjacent_mines += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_square_is_closed_and_safe() {
        let square = Square::default();

        assert!(!square.is_mine());
        assert!(!square.is_opened());
        assert!(!square.is_flagged());
        assert_eq!(square.highlight(), Highlight::None);
        assert_eq!(square.surrounding_mine_count(), 0);
    }

    #[test]
    fn open_and_set_mine_are_idempotent() {
        let mut square = Square::default();

        square.open();
        square.open();
        square.set_mine();
        square.set_mine();

        assert!(square.is_opened());
        assert!(square.is_mine());
    }

    #[test]
    fn toggle_flagged_flips() {
        let mut square = Square::default();

        square.toggle_flagged();
        assert!(square.is_flagged());
        square.toggle_flagged();
        assert!(!square.is_flagged());
    }

    #[test]
    fn highlight_does_not_touch_game_state() {
        let mut square = Square::default();
        square.toggle_flagged();

        square.set_highlight(Highlight::Green);

        assert_eq!(square.highlight(), Highlight::Green);
        assert!(square.is_flagged());
        assert!(square.is_closed());
    }
}
