//! Iterative-deepening alpha-beta with quiescence.

use crate::board::Position;
use crate::moves::types::{Move, MoveList};
use crate::search::context::SearchContext;
use crate::search::eval::evaluate;
use crate::search::ordering::{FIRST_KILLER_SCORE, PV_SCORE, SECOND_KILLER_SCORE};
use crate::search::tt::{Bound, Cache};
use crate::search::{INFINITY, MATE, MATE_THRESHOLD, MAX_PLY};
use std::time::{Duration, Instant};

/// Poll the clock once per this many nodes.
const CLOCK_CHECK_INTERVAL: u64 = 2048;

/// Null-move reduction: a failed pass refutes the position at depth - R.
const NULL_MOVE_REDUCTION: i32 = 4;
const NULL_MOVE_MIN_DEPTH: i32 = 4;

/// What bounds a search: a depth ceiling, a wall-clock budget, or both.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchLimits {
    pub depth: Option<u8>,
    pub move_time: Option<Duration>,
}

impl SearchLimits {
    pub fn depth(depth: u8) -> Self {
        SearchLimits {
            depth: Some(depth),
            move_time: None,
        }
    }

    pub fn move_time(ms: u64) -> Self {
        SearchLimits {
            depth: None,
            move_time: Some(Duration::from_millis(ms)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: i32,
    pub depth: u8,
    pub nodes: u64,
    pub elapsed: Duration,
    pub pv: Vec<Move>,
}

pub struct TimeManager {
    start: Instant,
    stop_at: Option<Instant>,
    pub stopped: bool,
}

impl TimeManager {
    pub fn new(limit: Option<Duration>) -> Self {
        let start = Instant::now();
        TimeManager {
            start,
            stop_at: limit.map(|d| start + d),
            stopped: false,
        }
    }

    #[inline(always)]
    pub fn check_up(&mut self) {
        if let Some(stop_at) = self.stop_at
            && Instant::now() >= stop_at
        {
            self.stopped = true;
        }
    }

    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Walk the cache's stored moves from the current position to recover the
/// principal variation, then rewind.
fn extract_pv(pos: &mut Position, cache: &Cache, depth: u8) -> Vec<Move> {
    let mut pv = Vec::new();
    while pv.len() < depth as usize {
        let mv = cache.get_pv_move(pos.zobrist);
        if mv == Move::NONE || !pos.move_exists(mv) {
            break;
        }
        if !pos.make_move(mv) {
            break;
        }
        pv.push(mv);
    }
    for _ in 0..pv.len() {
        pos.unmake_move();
    }
    pv
}

fn quiescence(
    pos: &mut Position,
    ctx: &mut SearchContext,
    time: &mut TimeManager,
    mut alpha: i32,
    beta: i32,
) -> i32 {
    if ctx.nodes % CLOCK_CHECK_INTERVAL == 0 {
        time.check_up();
    }
    if time.stopped {
        return 0;
    }
    ctx.nodes += 1;

    if pos.ply > 0 && (pos.fifty_move >= 100 || pos.is_repetition()) {
        return 0;
    }
    if pos.ply >= MAX_PLY {
        return evaluate(pos);
    }

    let stand_pat = evaluate(pos);
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let mut list = MoveList::new();
    pos.generate_captures(&mut list);

    let mut legal = 0u32;
    for i in 0..list.len() {
        let mv = list.pick_next(i);
        if !pos.make_move(mv) {
            continue;
        }
        legal += 1;
        let score = -quiescence(pos, ctx, time, -beta, -alpha);
        pos.unmake_move();

        if time.stopped {
            return 0;
        }
        if score > alpha {
            if score >= beta {
                if legal == 1 {
                    ctx.fail_high_first += 1;
                }
                ctx.fail_high += 1;
                return beta;
            }
            alpha = score;
        }
    }

    alpha
}

#[allow(clippy::too_many_arguments)]
fn alpha_beta(
    pos: &mut Position,
    cache: &mut Cache,
    ctx: &mut SearchContext,
    time: &mut TimeManager,
    mut alpha: i32,
    beta: i32,
    mut depth: i32,
    do_null: bool,
) -> i32 {
    let side = pos.side_to_move;
    let in_check = pos.in_check(side);
    // Resolve checks one ply deeper instead of cutting into quiescence.
    if in_check {
        depth += 1;
    }

    if depth <= 0 {
        return quiescence(pos, ctx, time, alpha, beta);
    }

    if ctx.nodes % CLOCK_CHECK_INTERVAL == 0 {
        time.check_up();
    }
    if time.stopped {
        return 0;
    }
    ctx.nodes += 1;

    if pos.ply > 0 && (pos.fifty_move >= 100 || pos.is_repetition()) {
        return 0;
    }
    if pos.ply >= MAX_PLY {
        return evaluate(pos);
    }

    let (tt_move, tt_score) = cache.probe(pos.zobrist, pos.ply, alpha, beta, depth);
    if pos.ply > 0
        && let Some(score) = tt_score
    {
        return score;
    }

    if do_null
        && !in_check
        && pos.ply > 0
        && depth >= NULL_MOVE_MIN_DEPTH
        && pos.has_big_pieces(side)
    {
        pos.make_null_move();
        let score = -alpha_beta(
            pos,
            cache,
            ctx,
            time,
            -beta,
            -beta + 1,
            depth - NULL_MOVE_REDUCTION,
            false,
        );
        pos.unmake_null_move();

        if time.stopped {
            return 0;
        }
        // A mate "found" after passing is not trustworthy.
        if score >= beta && score.abs() < MATE_THRESHOLD {
            return beta;
        }
    }

    let mut list = MoveList::new();
    pos.generate_all_moves(&mut list);

    // Quiet scores are only known now: killers for this ply, history, and
    // the cache move on top of everything.
    for i in 0..list.len() {
        let mv = list.get(i);
        if mv == tt_move && tt_move != Move::NONE {
            list.set_score(i, PV_SCORE);
        } else if !mv.is_capture() {
            if ctx.killers[0][pos.ply] == mv {
                list.set_score(i, FIRST_KILLER_SCORE);
            } else if ctx.killers[1][pos.ply] == mv {
                list.set_score(i, SECOND_KILLER_SCORE);
            } else {
                let piece = pos.piece_at(mv.from());
                list.set_score(i, ctx.history[piece as usize][mv.to().index64() as usize]);
            }
        }
    }

    let old_alpha = alpha;
    let mut best_move = Move::NONE;
    let mut legal = 0u32;

    for i in 0..list.len() {
        let mv = list.pick_next(i);
        if !pos.make_move(mv) {
            continue;
        }
        legal += 1;

        let score = -alpha_beta(pos, cache, ctx, time, -beta, -alpha, depth - 1, true);
        pos.unmake_move();

        if time.stopped {
            return 0;
        }

        if score > alpha {
            if score >= beta {
                if legal == 1 {
                    ctx.fail_high_first += 1;
                }
                ctx.fail_high += 1;

                if !mv.is_capture() {
                    ctx.update_killers(pos.ply, mv);
                }
                cache.store(pos.zobrist, pos.ply, mv, beta, Bound::Lower, depth);
                return beta;
            }
            alpha = score;
            best_move = mv;

            if !mv.is_capture() {
                ctx.update_history(pos.piece_at(mv.from()), mv.to(), depth);
            }
        }
    }

    if legal == 0 {
        if in_check {
            return -MATE + pos.ply as i32;
        }
        return 0;
    }

    if alpha != old_alpha {
        cache.store(pos.zobrist, pos.ply, best_move, alpha, Bound::Exact, depth);
    } else {
        cache.store(pos.zobrist, pos.ply, best_move, alpha, Bound::Upper, depth);
    }

    alpha
}

/// Iterative deepening driver. Completed iterations land in the result;
/// a timed-out partial iteration is discarded.
pub fn search(pos: &mut Position, cache: &mut Cache, limits: &SearchLimits) -> SearchResult {
    let mut ctx = SearchContext::new();
    let mut time = TimeManager::new(limits.move_time);
    cache.new_search();
    pos.ply = 0;

    let max_depth = limits.depth.unwrap_or(MAX_PLY as u8).clamp(1, MAX_PLY as u8);
    let mut result = SearchResult::default();

    for depth in 1..=max_depth {
        let score = alpha_beta(
            pos,
            cache,
            &mut ctx,
            &mut time,
            -INFINITY,
            INFINITY,
            depth as i32,
            true,
        );

        if time.stopped {
            break;
        }

        let pv = extract_pv(pos, cache, depth);
        if let Some(&first) = pv.first() {
            result.best_move = first;
        }
        result.score = score;
        result.depth = depth;
        result.nodes = ctx.nodes;
        result.elapsed = time.elapsed();
        result.pv = pv;

        report_iteration(&result, &ctx);

        // Mate found: deeper iterations cannot improve on it.
        if score.abs() >= MATE_THRESHOLD {
            break;
        }
    }

    result
}

fn report_iteration(result: &SearchResult, ctx: &SearchContext) {
    let score_str = if result.score.abs() >= MATE_THRESHOLD {
        let moves = (MATE - result.score.abs() + 1) / 2;
        if result.score > 0 {
            format!("mate {moves}")
        } else {
            format!("mate -{moves}")
        }
    } else {
        format!("cp {}", result.score)
    };

    let pv_str = result
        .pv
        .iter()
        .map(|mv| mv.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    println!(
        "info depth {} score {} nodes {} time {} pv {}",
        result.depth,
        score_str,
        result.nodes,
        result.elapsed.as_millis(),
        pv_str
    );
    tracing::debug!(
        depth = result.depth,
        score = result.score,
        nodes = result.nodes,
        ordering = ctx.ordering_quality(),
        "iteration complete"
    );
}
