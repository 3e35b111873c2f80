use crate::game_stream::GameRecord;
use crate::pos_encoding::encode_board;
use crate::report::Reporter;
use rand::seq::SliceRandom;
use rand::Rng;
use shakmaty::{Color, Outcome, Position};

/// One training example extracted from a game.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    /// The sampled position, from the perspective of its side to move.
    pub x: [i8; 64],
    /// The position one ply earlier, from the other side's perspective.
    pub x_parent: [i8; 64],
    /// The parent after a uniformly random legal move instead of the real one.
    pub x_random: [i8; 64],
    /// Plies between the sampled position and the end of the game.
    pub moves_left: usize,
    /// Game outcome for the side to move at the sampled position.
    pub y: i8,
}

/// Draws one example from a finished game, or `None` if the game yields none.
///
/// The game must have a mapped result and actually end in a game-over
/// position. One non-root ply is chosen uniformly; the starting position is
/// never chosen since an example needs the ply before it. Board perspectives
/// follow whose move it is: the sampled side sees itself as positive, its
/// parent is encoded with the opposite flip, and the white-frame label is
/// negated when black is to move.
pub fn sample_game(
    game: &GameRecord,
    rng: &mut impl Rng,
    report: &dyn Reporter,
) -> Option<Example> {
    let y0: i8 = match game.result? {
        Outcome::Decisive {
            winner: Color::White,
        } => 1,
        Outcome::Decisive {
            winner: Color::Black,
        } => -1,
        Outcome::Draw => 0,
    };

    // unfinished games (abandoned, adjudicated mid-position) carry no signal
    let terminal = game.positions.last()?;
    if !terminal.is_game_over() {
        return None;
    }

    let plies = game.positions.len() - 1;
    if plies == 0 {
        return None;
    }

    if game.positions.len() < 10 {
        report.short_game(game.positions.len(), &game.event);
    }

    let index = rng.gen_range(1..game.positions.len());
    let moves_left = plies - index;
    let node = &game.positions[index];
    let parent = &game.positions[index - 1];

    let flip = node.turn() == Color::Black;

    let x = encode_board(node.board(), flip);
    let x_parent = encode_board(parent.board(), !flip);
    let y = if flip { -y0 } else { y0 };

    // the alternative move is played on a clone, the parent stays untouched
    let moves = parent.legal_moves();
    let random_move = moves.choose(rng)?;
    let random_pos = parent.clone().play(random_move).unwrap();
    let x_random = encode_board(random_pos.board(), flip);

    if moves_left < 3 {
        report.shallow_sample(moves_left, y, &game.event);
    }

    Some(Example {
        x,
        x_parent,
        x_random,
        moves_left,
        y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_stream::GameStream;
    use crate::report::Silent;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn record(pgn: &str) -> GameRecord {
        GameStream::new(Cursor::new(pgn.as_bytes()), &Silent)
            .next()
            .unwrap()
            .unwrap()
    }

    fn fools_mate() -> GameRecord {
        record("[Event \"Fools mate\"]\n[Result \"0-1\"]\n\n1. f3 e5 2. g4 Qh4# 0-1\n")
    }

    #[test]
    fn discards_unknown_results() {
        let game = record("[Result \"*\"]\n\n1. e4 e5 *\n");
        let mut rng = StdRng::seed_from_u64(0);

        assert!(sample_game(&game, &mut rng, &Silent).is_none());
    }

    #[test]
    fn discards_games_that_do_not_end() {
        // claimed result, but the final position is not game over
        let game = record("[Result \"1-0\"]\n\n1. e4 e5 1-0\n");
        let mut rng = StdRng::seed_from_u64(0);

        assert!(sample_game(&game, &mut rng, &Silent).is_none());
    }

    #[test]
    fn discards_games_without_moves() {
        let game = GameRecord {
            result: Some(Outcome::Draw),
            event: "".to_string(),
            positions: vec![],
        };
        let mut rng = StdRng::seed_from_u64(0);

        assert!(sample_game(&game, &mut rng, &Silent).is_none());
    }

    #[test]
    fn examples_match_the_chosen_ply() {
        let game = fools_mate();
        let plies = game.positions.len() - 1;

        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let example = sample_game(&game, &mut rng, &Silent).unwrap();

            // recover the chosen index from moves_left and recompute the
            // example from the record
            assert!(example.moves_left < plies);
            let index = plies - example.moves_left;
            let node = &game.positions[index];
            let parent = &game.positions[index - 1];
            let flip = node.turn() == Color::Black;

            assert_eq!(example.x, encode_board(node.board(), flip));
            assert_eq!(example.x_parent, encode_board(parent.board(), !flip));
            // black won; the label follows the sampled side to move
            assert_eq!(example.y, if flip { 1 } else { -1 });
        }
    }

    #[test]
    fn every_non_root_ply_is_reachable() {
        let game = fools_mate();
        let mut seen = [false; 4];

        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let example = sample_game(&game, &mut rng, &Silent).unwrap();
            seen[example.moves_left] = true;
        }

        // all of terminal..first ply show up, the root never does
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn random_branch_comes_from_the_parent() {
        let game = fools_mate();
        let plies = game.positions.len() - 1;

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let example = sample_game(&game, &mut rng, &Silent).unwrap();

            let index = plies - example.moves_left;
            let node = &game.positions[index];
            let parent = &game.positions[index - 1];
            let flip = node.turn() == Color::Black;

            let reachable = parent.legal_moves().iter().any(|mov| {
                let pos = parent.clone().play(mov).unwrap();
                encode_board(pos.board(), flip) == example.x_random
            });
            assert!(reachable);
        }
    }

    #[test]
    fn sampling_leaves_the_game_untouched() {
        let game = fools_mate();
        let before = game.positions.clone();

        let mut rng = StdRng::seed_from_u64(7);
        sample_game(&game, &mut rng, &Silent).unwrap();

        assert_eq!(game.positions, before);
    }

    #[test]
    fn draws_label_zero_for_both_sides() {
        // stalemate: black king is out of moves
        let game = record(
            "[Result \"1/2-1/2\"]\n\n1. c4 h5 2. h4 a5 3. Qa4 Ra6 4. Qxa5 Rah6 \
             5. Qxc7 f6 6. Qxd7+ Kf7 7. Qxb7 Qd3 8. Qxb8 Qh7 9. Qxc8 Kg6 10. Qe6 1/2-1/2",
        );
        assert!(game.positions.last().unwrap().is_game_over());

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let example = sample_game(&game, &mut rng, &Silent).unwrap();
            assert_eq!(example.y, 0);
        }
    }
}
