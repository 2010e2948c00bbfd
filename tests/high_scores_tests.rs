//! High-score list behaviour across finished sessions

use blockfall::core::{Board, HighScoreList, Session};
use blockfall::types::{PieceKind, BOARD_WIDTH, MAX_HIGH_SCORES};

#[test]
fn test_list_keeps_top_five_descending() {
    let mut list = HighScoreList::new();
    for score in [40, 1200, 80, 300, 100, 2400, 120] {
        list.record(score);
    }
    assert_eq!(list.len(), MAX_HIGH_SCORES);
    assert_eq!(list.scores(), &[2400, 1200, 300, 120, 100]);
}

#[test]
fn test_zero_scores_are_not_recorded() {
    let mut list = HighScoreList::from_scores([0, 0]);
    assert!(list.is_empty());
    assert_eq!(list.record(0), None);
    assert_eq!(list.best(), None);
}

#[test]
fn test_finished_session_score_is_recorded() {
    // A full bottom row to score; stacking at the spawn column then ends the game.
    let mut board = Board::new();
    for x in 0..BOARD_WIDTH as i8 {
        board.set(x, 19, Some(PieceKind::T));
    }
    let mut session = Session::new(2);
    session.start_with_board(board);

    let mut final_score = None;
    for _ in 0..200 {
        if !session.hard_drop() {
            break;
        }
        if let Some(event) = session.take_last_event() {
            if event.game_over {
                final_score = Some(event.score);
                break;
            }
        }
    }

    let score = final_score.expect("stacking in one column must end the game");
    assert!(score >= 40);

    let mut list = HighScoreList::from_scores([10, 5]);
    assert_eq!(list.record(score), Some(0));
    assert_eq!(list.best(), Some(score));

    // Reset does not touch the list.
    session.reset();
    assert_eq!(list.best(), Some(score));
}
