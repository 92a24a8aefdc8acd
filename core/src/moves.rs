use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveType {
    Open,
    Flag,
    Chord,
}

/// What a move asks the board to do at its coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    Action(MoveType),
    Highlight(Highlight),
}

/// A player's intent, consumed by [`Board::make_move`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub coords: Coord2,
    pub kind: MoveKind,
}

impl Move {
    pub const fn new(kind: MoveType, x: Coord, y: Coord) -> Self {
        Self {
            coords: (x, y),
            kind: MoveKind::Action(kind),
        }
    }

    pub const fn open(x: Coord, y: Coord) -> Self {
        Self::new(MoveType::Open, x, y)
    }

    pub const fn flag(x: Coord, y: Coord) -> Self {
        Self::new(MoveType::Flag, x, y)
    }

    pub const fn chord(x: Coord, y: Coord) -> Self {
        Self::new(MoveType::Chord, x, y)
    }

    pub const fn highlight(x: Coord, y: Coord, highlight: Highlight) -> Self {
        Self {
            coords: (x, y),
            kind: MoveKind::Highlight(highlight),
        }
    }

    pub const fn x(&self) -> Coord {
        self.coords.0
    }

    pub const fn y(&self) -> Coord {
        self.coords.1
    }

    /// The action kind, `None` for highlight-only moves.
    pub const fn move_type(&self) -> Option<MoveType> {
        match self.kind {
            MoveKind::Action(kind) => Some(kind),
            MoveKind::Highlight(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_move_has_no_action() {
        let mv = Move::highlight(5, 5, Highlight::Red);

        assert_eq!(mv.move_type(), None);
        assert_eq!((mv.x(), mv.y()), (5, 5));
    }

    #[test]
    fn serializes_as_plain_data() {
        let json = serde_json::to_string(&Move::chord(3, 4)).unwrap();

        assert_eq!(json, r#"{"coords":[3,4],"kind":{"Action":"Chord"}}"#);
    }
}
