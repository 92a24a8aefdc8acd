use crate::*;

/// Anything that can take a turn on a board: a bot strategy, a scripted test double, or a closure.
///
/// A player must go through [`Board::make_move`] like a person would. The return value is `true` when the move was
/// safe and the game goes on, `false` when it hit a mine or no move could be made.
pub trait Player {
    fn attempt_move(&mut self, board: &mut Board) -> bool;
}

impl<F> Player for F
where
    F: FnMut(&mut Board) -> bool,
{
    fn attempt_move(&mut self, board: &mut Board) -> bool {
        self(board)
    }
}

/// Opens the first closed cell it finds.
#[derive(Copy, Clone, Debug, Default)]
pub struct FirstUnopenedPlayer;

impl Player for FirstUnopenedPlayer {
    fn attempt_move(&mut self, board: &mut Board) -> bool {
        let Some((x, y)) = board.find_unopened_square() else {
            return false;
        };

        match board.make_move(Move::open(x, y)) {
            Ok(safe) => safe,
            Err(err) => {
                log::warn!("Player move at {:?} rejected: {}", (x, y), err);
                false
            }
        }
    }
}

/// Lets `player` move until the game ends, it gives up, or `max_moves` turns were taken.
pub fn play_out<P>(player: &mut P, board: &mut Board, max_moves: usize) -> GameState
where
    P: Player + ?Sized,
{
    for turn in 0..max_moves {
        if board.game_ended() {
            break;
        }
        if !player.attempt_move(board) {
            log::debug!("Player stopped after {} moves", turn + 1);
            break;
        }
    }
    board.state()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_unopened_player_opens_a_cell() {
        let mut board = Board::from_mine_coords((10, 10), &[(9, 9), (9, 8)]).unwrap();
        board.make_move(Move::flag(0, 0)).unwrap();

        assert!(FirstUnopenedPlayer.attempt_move(&mut board));

        assert!(board[(0, 1)].is_opened());
        assert!(!board[(0, 0)].is_opened());
    }

    #[test]
    fn player_reports_mine_hit() {
        let mut board = Board::from_mine_coords((3, 3), &[(0, 0)]).unwrap();

        assert!(!FirstUnopenedPlayer.attempt_move(&mut board));
        assert!(board.game_ended());
    }

    #[test]
    fn play_out_until_loss() {
        let mut board = Board::from_mine_coords((3, 3), &[(0, 1)]).unwrap();

        let state = play_out(&mut FirstUnopenedPlayer, &mut board, 100);

        assert_eq!(state, GameState::Lost);
        assert_eq!(board.open_squares().len(), 2);
    }

    #[test]
    fn play_out_until_win() {
        let mut board = Board::from_mine_coords((10, 10), &[(9, 9)]).unwrap();

        assert_eq!(play_out(&mut FirstUnopenedPlayer, &mut board, 100), GameState::Won);
    }

    #[test]
    fn play_out_with_generated_board() {
        let generator = RandomMinefieldGenerator::new(5, SafeZone::Neighborhood);
        let mut board = Board::new(generator, 9, 9, 10).unwrap();

        let state = play_out(&mut FirstUnopenedPlayer, &mut board, 81);

        assert!(state.is_finished());
        assert!(!board.is_first_move());
    }

    #[test]
    fn closures_are_players() {
        let mut board = Board::from_mine_coords((4, 4), &[(3, 3)]).unwrap();
        let mut moves = 0;
        let mut flagger = |board: &mut Board| {
            moves += 1;
            board.make_move(Move::flag(3, 3)).unwrap_or(false)
        };

        assert_eq!(play_out(&mut flagger, &mut board, 3), GameState::Active);
        assert_eq!(moves, 3);
        assert!(board[(3, 3)].is_flagged());
    }
}
