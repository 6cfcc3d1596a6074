//! Castling-rights bit mask and the per-square update table.

use crate::square::{BOARD_SQUARES, Square};

pub type CastleBits = u8;

pub const CASTLE_WK: CastleBits = 0b0001;
pub const CASTLE_WQ: CastleBits = 0b0010;
pub const CASTLE_BK: CastleBits = 0b0100;
pub const CASTLE_BQ: CastleBits = 0b1000;

pub const CASTLE_ALL: CastleBits = CASTLE_WK | CASTLE_WQ | CASTLE_BK | CASTLE_BQ;

/// Per-square masks ANDed into the rights after every move. A move touching
/// a king or rook home square (as origin or destination) strips the
/// corresponding rights; every other square leaves them alone.
pub const CASTLE_PERM: [CastleBits; BOARD_SQUARES] = build_castle_perm();

const fn build_castle_perm() -> [CastleBits; BOARD_SQUARES] {
    let mut table = [CASTLE_ALL; BOARD_SQUARES];
    table[Square::A1.index() as usize] = CASTLE_ALL & !CASTLE_WQ;
    table[Square::E1.index() as usize] = CASTLE_ALL & !(CASTLE_WK | CASTLE_WQ);
    table[Square::H1.index() as usize] = CASTLE_ALL & !CASTLE_WK;
    table[Square::A8.index() as usize] = CASTLE_ALL & !CASTLE_BQ;
    table[Square::E8.index() as usize] = CASTLE_ALL & !(CASTLE_BK | CASTLE_BQ);
    table[Square::H8.index() as usize] = CASTLE_ALL & !CASTLE_BK;
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castle_bits_single_and_disjoint() {
        assert_eq!(CASTLE_WK.count_ones(), 1);
        assert_eq!(CASTLE_WQ.count_ones(), 1);
        assert_eq!(CASTLE_BK.count_ones(), 1);
        assert_eq!(CASTLE_BQ.count_ones(), 1);
        assert_eq!(CASTLE_ALL.count_ones(), 4);
    }

    #[test]
    fn perm_table_strips_home_squares_only() {
        assert_eq!(CASTLE_PERM[Square::E1.index() as usize], CASTLE_BK | CASTLE_BQ);
        assert_eq!(CASTLE_PERM[Square::A8.index() as usize], CASTLE_ALL & !CASTLE_BQ);
        let e4 = Square::from_algebraic("e4").unwrap();
        assert_eq!(CASTLE_PERM[e4.index() as usize], CASTLE_ALL);
    }
}
