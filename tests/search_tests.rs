use cardinal::board::Position;
use cardinal::moves::types::Move;
use cardinal::search::search::{SearchLimits, search};
use cardinal::search::tt::Cache;
use cardinal::search::{MATE, MATE_THRESHOLD};

fn run(fen: &str, limits: SearchLimits) -> (Position, cardinal::search::search::SearchResult) {
    let mut pos = Position::from_fen(fen).unwrap();
    let mut cache = Cache::new(16);
    let result = search(&mut pos, &mut cache, &limits);
    (pos, result)
}

#[test]
fn finds_a_back_rank_mate_in_one() {
    // Ra8# — the classic back-rank pattern.
    let (_, result) = run("6k1/5ppp/8/8/8/8/8/R3K3 w - - 0 1", SearchLimits::depth(2));
    assert!(
        result.score >= MATE - 2,
        "expected a mate score, got {}",
        result.score
    );
    assert_eq!(result.best_move.to_uci(), "a1a8");
}

#[test]
fn finds_the_mate_for_black_too() {
    let (_, result) = run("r3k3/8/8/8/8/8/5PPP/6K1 b - - 0 1", SearchLimits::depth(2));
    assert!(result.score >= MATE - 2);
    assert_eq!(result.best_move.to_uci(), "a8a1");
}

#[test]
fn prefers_winning_a_hanging_queen() {
    let (_, result) = run("4k3/8/4q3/8/4R3/8/8/4K3 w - - 0 1", SearchLimits::depth(4));
    assert_eq!(result.best_move.to_uci(), "e4e6");
    // Winning the queen flips the position from lost to won; the pawnless
    // scaling keeps the absolute number modest.
    assert!(result.score > 100);
}

#[test]
fn search_leaves_the_position_restored() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let (pos, result) = run(fen, SearchLimits::depth(4));
    assert_eq!(pos.to_fen(), fen);
    assert_ne!(result.best_move, Move::NONE);
    assert!(result.depth >= 4);
    assert!(result.nodes > 0);
}

#[test]
fn pv_starts_with_the_best_move_and_is_playable() {
    let (mut pos, result) = run(
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
        SearchLimits::depth(5),
    );
    assert!(!result.pv.is_empty());
    assert_eq!(result.pv[0], result.best_move);
    let mut played = 0;
    for &mv in &result.pv {
        if !pos.move_exists(mv) {
            break;
        }
        assert!(pos.make_move(mv));
        played += 1;
    }
    for _ in 0..played {
        pos.unmake_move();
    }
    assert!(played >= 1, "PV must be playable from the root");
}

#[test]
fn repetition_is_scored_as_a_draw() {
    // Shuffle knights back and forth until the position repeats.
    let mut pos = Position::new();
    for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
        let mv = pos.parse_move(uci).unwrap();
        assert!(pos.make_move(mv));
    }
    assert!(pos.is_repetition());
}

#[test]
fn fifty_move_rule_draws_the_search() {
    // A bare-rook position with the clock one move from a draw.
    let (_, result) = run("4k3/8/8/8/8/8/8/R3K3 w - - 99 80", SearchLimits::depth(3));
    // Any quiet rook or king move hits the 100 half-move draw immediately;
    // the only way to keep winning chances alive would be a pawn move or
    // capture, which do not exist here.
    assert_eq!(result.score, 0);
}

#[test]
fn time_limited_search_still_reports_a_move() {
    let (_, result) = run(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        SearchLimits::move_time(100),
    );
    assert_ne!(result.best_move, Move::NONE, "one iteration must complete");
    assert!(result.depth >= 1);
}

#[test]
fn mate_scores_stay_inside_the_band() {
    let (_, result) = run("6k1/5ppp/8/8/8/8/8/R3K3 w - - 0 1", SearchLimits::depth(4));
    assert!(result.score > MATE_THRESHOLD);
    assert!(result.score <= MATE);
}
