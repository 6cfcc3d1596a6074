//! Zobrist key tables.
//!
//! A position's key is the XOR of one 64-bit key per state-bearing fact:
//! each piece on its padded square, the side key when White is to move, one
//! key per castling-rights mask value, and the en-passant file when a target
//! square is set. Keys are drawn once per process.

use crate::board::PIECE_KINDS;
use crate::square::BOARD_SQUARES;
use once_cell::sync::OnceCell;
use rand::{RngCore, SeedableRng, rngs::StdRng};

#[cfg(feature = "deterministic_zobrist")]
const ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

fn make_zobrist_rng() -> StdRng {
    #[cfg(feature = "deterministic_zobrist")]
    {
        StdRng::seed_from_u64(ZOBRIST_SEED)
    }
    #[cfg(not(feature = "deterministic_zobrist"))]
    {
        let mut seed = [0u8; 32];
        rand::rng().fill_bytes(&mut seed);
        StdRng::from_seed(seed)
    }
}

pub struct ZobristKeys {
    /// Indexed `[piece][sq120]`; the `Empty` row is never used.
    pub piece: [[u64; BOARD_SQUARES]; PIECE_KINDS],
    /// XORed in while White is to move.
    pub side: u64,
    /// One key per 4-bit castling-rights value.
    pub castling: [u64; 16],
    /// a..h => 0..7.
    pub ep_file: [u64; 8],
}

/// Global keys, initialized on first use.
pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(|| generate_keys(make_zobrist_rng()))
}

fn generate_keys(mut rng: StdRng) -> ZobristKeys {
    #[inline]
    fn non_zero(rng: &mut StdRng) -> u64 {
        // zero keys would degenerate into no-ops
        let mut v = rng.next_u64();
        while v == 0 {
            v = rng.next_u64();
        }
        v
    }

    let mut keys = ZobristKeys {
        piece: [[0u64; BOARD_SQUARES]; PIECE_KINDS],
        side: 0,
        castling: [0u64; 16],
        ep_file: [0u64; 8],
    };

    for piece in 1..PIECE_KINDS {
        for sq in 0..BOARD_SQUARES {
            keys.piece[piece][sq] = non_zero(&mut rng);
        }
    }
    // the no-rights mask contributes nothing, so transitions hash cleanly
    keys.castling[0] = 0;
    for mask in 1..16 {
        keys.castling[mask] = non_zero(&mut rng);
    }
    for file in 0..8 {
        keys.ep_file[file] = non_zero(&mut rng);
    }
    keys.side = non_zero(&mut rng);

    keys
}
