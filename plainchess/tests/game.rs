/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use plainchess::*;

fn sq(uci: &str) -> Square {
    Square::from_uci(uci).unwrap()
}

#[test]
fn scholars_mate_through_clicks() {
    let mut game = Game::new();

    for uci in ["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"] {
        assert_eq!(game.click(sq(&uci[0..2])), Selection::Selected(sq(&uci[0..2])));
        match game.click(sq(&uci[2..4])) {
            Selection::Moved(mv) => assert_eq!(mv.chess_notation(), uci),
            other => panic!("{uci} was not played: {other:?}"),
        }
    }

    assert_eq!(
        game.status(),
        GameStatus::Checkmate {
            winner: Color::White
        }
    );
    assert!(game.legal_moves().is_empty());
    assert_eq!(game.last_move().map(|mv| mv.is_capture()), Some(true));
}

#[test]
fn a_rejected_click_starts_a_new_selection() {
    let mut game = Game::new();

    // The Knight cannot reach e4, but e4 becomes the selection. Then e4 -> g1 has no piece to move.
    game.click(sq("g1"));
    assert_eq!(game.click(sq("e4")), Selection::Rejected(sq("e4")));
    assert_eq!(game.click(sq("g1")), Selection::Rejected(sq("g1")));

    // Now g1 is selected, so one more click plays the Knight
    assert!(matches!(game.click(sq("f3")), Selection::Moved(_)));
    assert_eq!(game.move_log(), ["g1f3"]);
}

#[test]
fn undo_after_mate_resumes_the_game() {
    let mut game = Game::from_fen(FEN_FOOLS_MATE).unwrap();
    assert!(game.status().is_over());

    // The position was loaded, not played, so there is nothing to take back
    assert_eq!(game.undo(), None);

    let mut game = Game::new();
    for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
        let mv = Move::from_uci(game.board(), uci).unwrap();
        game.try_make_move(mv).unwrap();
    }
    assert!(game.status().is_over());

    game.undo();
    assert_eq!(game.status(), GameStatus::Ongoing);
    assert_eq!(game.side_to_move(), Color::Black);
}

#[test]
fn moves_out_of_turn_are_rejected() {
    let mut game = Game::new();
    let mv = Move::from_uci(game.board(), "e7e5").unwrap();
    let err = game.try_make_move(mv).unwrap_err();
    assert!(err.to_string().contains("not a legal move"));
}
