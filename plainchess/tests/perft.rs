/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use plainchess::*;

fn check_perft(fen: &str, expected: &[u64]) {
    let mut pos = Position::from_fen(fen).unwrap();
    let original = pos.clone();

    for (depth, &nodes) in (1..).zip(expected) {
        assert_eq!(
            perft(&mut pos, depth),
            nodes,
            "perft({depth}) of {fen} is wrong"
        );
        assert_eq!(pos, original, "perft({depth}) did not restore {fen}");
    }
}

// No castling, en passant or promotion is reachable this early
#[test]
fn startpos() {
    check_perft(FEN_STARTPOS, &[20, 400, 8_902, 197_281]);
}

// A rook and pawn endgame with plenty of checks, pins and discovered attacks.
// En passant first becomes possible at depth 3.
#[test]
fn rook_endgame() {
    check_perft("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w", &[14, 191]);
}

#[test]
fn splitperft_agrees_with_perft() {
    let mut pos = Position::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w").unwrap();
    let split = splitperft(&mut pos, 2);
    assert_eq!(split.len(), 14);
    assert_eq!(split.iter().map(|(_, nodes)| nodes).sum::<u64>(), 191);
}
