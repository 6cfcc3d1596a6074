use cardinal::board::Position;
use cardinal::moves::types::Move;
use cardinal::search::search::{SearchLimits, search};
use cardinal::search::tt::{Bound, Cache};

const MIDGAME_FEN: &str =
    "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3";

#[test]
fn search_populates_the_root_entry() {
    let mut pos = Position::from_fen(MIDGAME_FEN).unwrap();
    let mut cache = Cache::new(8);
    let result = search(&mut pos, &mut cache, &SearchLimits::depth(4));

    let pv_move = cache.get_pv_move(pos.zobrist);
    assert_ne!(pv_move, Move::NONE);
    assert_eq!(pv_move, result.best_move);
}

#[test]
fn warm_cache_speeds_up_a_repeat_search() {
    let mut pos = Position::from_fen(MIDGAME_FEN).unwrap();
    let mut cache = Cache::new(8);

    let cold = search(&mut pos, &mut cache, &SearchLimits::depth(5));
    let warm = search(&mut pos, &mut cache, &SearchLimits::depth(5));

    assert!(pos.move_exists(warm.best_move));
    assert!(
        warm.nodes <= cold.nodes,
        "warm cache searched more nodes ({} > {})",
        warm.nodes,
        cold.nodes
    );
}

#[test]
fn stored_moves_order_across_iterations() {
    // Just exercising the probe path: after an iteration, the root entry's
    // move must be among the position's generated moves.
    let mut pos = Position::from_fen(MIDGAME_FEN).unwrap();
    let mut cache = Cache::new(8);
    search(&mut pos, &mut cache, &SearchLimits::depth(3));

    let (mv, _) = cache.probe(pos.zobrist, 0, -100, 100, 0);
    assert!(pos.move_exists(mv), "cached move {mv} is not playable");
}

#[test]
fn clear_forgets_everything() {
    let mut cache = Cache::new(1);
    cache.store(0x1234, 0, Move::NONE, 50, Bound::Exact, 3);
    cache.clear();
    let (mv, score) = cache.probe(0x1234, 0, -100, 100, 0);
    assert_eq!(mv, Move::NONE);
    assert_eq!(score, None);
}
