//! Perft: exhaustive leaf counting over the legal move tree. The canonical
//! oracle for the generator and make/unmake.

use crate::board::Position;
use crate::moves::types::MoveList;

pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut list = MoveList::new();
    pos.generate_all_moves(&mut list);

    let mut nodes = 0u64;
    for i in 0..list.len() {
        let mv = list.get(i);
        if !pos.make_move(mv) {
            continue;
        }
        nodes += perft(pos, depth - 1);
        pos.unmake_move();
    }
    nodes
}

/// Per-root-move breakdown, printed UCI-style. Returns the total.
pub fn perft_divide(pos: &mut Position, depth: u32) -> u64 {
    let mut list = MoveList::new();
    pos.generate_all_moves(&mut list);

    let mut total = 0u64;
    for i in 0..list.len() {
        let mv = list.get(i);
        if !pos.make_move(mv) {
            continue;
        }
        let nodes = if depth > 0 { perft(pos, depth - 1) } else { 1 };
        pos.unmake_move();
        total += nodes;
        println!("{mv}: {nodes}");
    }
    println!("total: {total}");
    total
}
