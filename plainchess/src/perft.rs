/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Instant;

use tracing::trace;

use super::{Move, Position};

/// Counts the leaf positions reachable from `position` in exactly `depth` plies.
///
/// Moves are made and taken back in place, so `position` is unchanged afterwards.
///
/// # Example
/// ```
/// # use plainchess::*;
/// let mut pos = Position::new();
/// assert_eq!(perft(&mut pos, 2), 400);
/// ```
pub fn perft(position: &mut Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = position.get_valid_moves();

    // Bulk-count at the last ply
    if depth == 1 {
        return moves.len() as u64;
    }

    moves.into_iter().fold(0, |nodes, mv| {
        nodes + position.simulate(mv, |pos| perft(pos, depth - 1))
    })
}

/// Like [`perft`], but also reports how many leaves lie under each legal move of the root.
pub fn splitperft(position: &mut Position, depth: usize) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    position
        .get_valid_moves()
        .into_iter()
        .map(|mv| {
            let nodes = position.simulate(mv, |pos| perft(pos, depth - 1));
            trace!(mv = %mv, nodes, "split");
            (mv, nodes)
        })
        .collect()
}

/// Runs a perft on `position`, printing the node count with timing information.
///
/// If `SPLIT` is set, the count under every root move is printed first.
pub fn print_perft<const SPLIT: bool>(position: &mut Position, depth: usize) -> u64 {
    let now = Instant::now();

    let nodes = if SPLIT {
        let split = splitperft(position, depth);
        for (mv, nodes) in &split {
            println!("{mv}: {nodes}");
        }
        println!();
        split.iter().map(|(_, nodes)| nodes).sum()
    } else {
        perft(position, depth)
    };

    let elapsed = now.elapsed();
    let nps = nodes as f32 / elapsed.as_secs_f32();
    let m_nps = nps / 1_000_000.0;

    println!("  Total Nodes:\t{nodes}");
    println!(" Elapsed Time:\t{elapsed:.1?}");
    println!("  Nodes / Sec:\t{nps:.0}");
    println!("M Nodes / Sec:\t{m_nps:.1}");

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_shallow_depths() {
        let mut pos = Position::new();
        assert_eq!(perft(&mut pos, 0), 1);
        assert_eq!(perft(&mut pos, 1), 20);
        assert_eq!(perft(&mut pos, 2), 400);
        assert_eq!(pos, Position::new());
    }

    #[test]
    fn split_sums_to_the_total() {
        let mut pos = Position::new();
        let split = splitperft(&mut pos, 3);
        assert_eq!(split.len(), 20);
        assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), 8902);

        let e2e4 = split.iter().find(|(mv, _)| mv.chess_notation() == "e2e4");
        assert_eq!(e2e4.map(|(_, n)| *n), Some(600));
    }

    #[test]
    fn no_moves_means_no_leaves() {
        let mut pos = Position::from_fen(crate::FEN_FOOLS_MATE).unwrap();
        assert_eq!(perft(&mut pos, 1), 0);
        assert_eq!(perft(&mut pos, 3), 0);
        assert!(splitperft(&mut pos, 2).is_empty());
    }
}
