//! Attack queries against the current occupancy.

use crate::board::{Color, Position};
use crate::moves::king::KING_ATTACKS;
use crate::moves::knight::KNIGHT_ATTACKS;
use crate::moves::magic::magic_tables;
use crate::moves::pawn::{BLACK_PAWN_ATTACKS, WHITE_PAWN_ATTACKS};
use crate::square::Square;

impl Position {
    /// Whether `by` attacks `sq` in the current position.
    pub fn square_attacked(&self, sq: Square, by: Color) -> bool {
        let sq64 = sq.index64() as usize;

        // A pawn of `by` attacks sq iff it stands on a square that a pawn of
        // the other color would attack from sq.
        let pawn_sources = match by {
            Color::White => BLACK_PAWN_ATTACKS[sq64],
            _ => WHITE_PAWN_ATTACKS[sq64],
        };
        if pawn_sources & self.bb(by.pawn()) != 0 {
            return true;
        }

        if KNIGHT_ATTACKS[sq64] & self.bb(by.knight()) != 0 {
            return true;
        }
        if KING_ATTACKS[sq64] & self.bb(by.king()) != 0 {
            return true;
        }

        let occupied = self.occupied();
        let tables = magic_tables();

        let rook_rays = tables.rook_attacks(sq64 as u8, occupied);
        if rook_rays & (self.bb(by.rook()) | self.bb(by.queen())) != 0 {
            return true;
        }

        let bishop_rays = tables.bishop_attacks(sq64 as u8, occupied);
        bishop_rays & (self.bb(by.bishop()) | self.bb(by.queen())) != 0
    }

    #[inline(always)]
    pub fn in_check(&self, side: Color) -> bool {
        self.square_attacked(self.king_square(side), side.opposite())
    }
}
