//! Reversible move application.
//!
//! `make_move` applies a pseudo-legal move, then verifies the mover's king
//! is not left attacked; if it is, the move is rolled back and `false`
//! returned. Every mutation of the piece placement goes through the three
//! helpers below so the mailbox, the bitboards, the incremental stats and
//! the Zobrist key can never drift apart.

use crate::bitboard::BitboardExt;
use crate::board::{CASTLE_PERM, Color, MAX_GAME_MOVES, Piece, Position, Undo};
use crate::hash::zobrist::zobrist_keys;
use crate::moves::types::Move;
use crate::square::Square;

impl Position {
    #[inline(always)]
    fn hash_piece(&mut self, piece: Piece, sq: Square) {
        self.zobrist ^= zobrist_keys().piece[piece as usize][sq.index() as usize];
    }

    #[inline(always)]
    fn hash_castle(&mut self) {
        self.zobrist ^= zobrist_keys().castling[self.castling_rights as usize];
    }

    #[inline(always)]
    fn hash_side(&mut self) {
        self.zobrist ^= zobrist_keys().side;
    }

    #[inline(always)]
    fn hash_en_passant(&mut self, ep: Square) {
        self.zobrist ^= zobrist_keys().ep_file[ep.file() as usize];
    }

    fn clear_piece(&mut self, sq: Square) {
        let piece = self.piece_at(sq);
        debug_assert!(
            piece != Piece::Empty && piece != Piece::OffBoard,
            "clearing empty square {sq}"
        );
        let color = piece.color() as usize;
        let sq64 = sq.index64();

        self.hash_piece(piece, sq);
        self.pieces[sq.index() as usize] = Piece::Empty;
        self.piece_bb[piece as usize].clear_bit(sq64);
        self.occupancy[color].clear_bit(sq64);
        self.occupancy[Color::Both as usize].clear_bit(sq64);
        if piece.is_big() {
            self.big_piece_count[color] -= 1;
        }
        self.material[color] -= piece.value();
    }

    fn add_piece(&mut self, sq: Square, piece: Piece) {
        debug_assert_eq!(self.piece_at(sq), Piece::Empty, "adding onto occupied {sq}");
        let color = piece.color() as usize;
        let sq64 = sq.index64();

        self.hash_piece(piece, sq);
        self.pieces[sq.index() as usize] = piece;
        self.piece_bb[piece as usize].set_bit(sq64);
        self.occupancy[color].set_bit(sq64);
        self.occupancy[Color::Both as usize].set_bit(sq64);
        if piece.is_big() {
            self.big_piece_count[color] += 1;
        }
        self.material[color] += piece.value();
        if piece.is_king() {
            self.king_sq[color] = sq;
        }
    }

    fn move_piece(&mut self, from: Square, to: Square) {
        let piece = self.piece_at(from);
        debug_assert!(piece != Piece::Empty, "moving from empty square {from}");
        debug_assert_eq!(self.piece_at(to), Piece::Empty, "moving onto occupied {to}");
        let color = piece.color() as usize;

        self.hash_piece(piece, from);
        self.pieces[from.index() as usize] = Piece::Empty;
        self.hash_piece(piece, to);
        self.pieces[to.index() as usize] = piece;

        self.piece_bb[piece as usize].clear_bit(from.index64());
        self.piece_bb[piece as usize].set_bit(to.index64());
        self.occupancy[color].clear_bit(from.index64());
        self.occupancy[color].set_bit(to.index64());
        self.occupancy[Color::Both as usize].clear_bit(from.index64());
        self.occupancy[Color::Both as usize].set_bit(to.index64());

        if piece.is_king() {
            self.king_sq[color] = to;
        }
    }

    /// Apply `mv`. Returns `false` (with the position fully restored) when
    /// the move would leave the mover's king attacked.
    pub fn make_move(&mut self, mv: Move) -> bool {
        let from = mv.from();
        let to = mv.to();
        let side = self.side_to_move;

        debug_assert!(self.piece_at(from) != Piece::Empty, "no piece on {from}");
        debug_assert_eq!(self.piece_at(from).color(), side, "moving the wrong side");
        assert!(
            self.history.len() < MAX_GAME_MOVES,
            "history stack exhausted after {} half-moves",
            self.history.len()
        );

        self.history.push(Undo {
            mv,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            fifty_move: self.fifty_move,
            zobrist: self.zobrist,
        });

        if mv.is_en_passant() {
            let captured_sq = match side {
                Color::White => Square::from_120(to.index() - 10),
                _ => Square::from_120(to.index() + 10),
            };
            self.clear_piece(captured_sq);
        } else if mv.is_castle() {
            match to {
                Square::G1 => self.move_piece(Square::H1, Square::F1),
                Square::C1 => self.move_piece(Square::A1, Square::D1),
                Square::G8 => self.move_piece(Square::H8, Square::F8),
                Square::C8 => self.move_piece(Square::A8, Square::D8),
                _ => panic!("castle move to invalid square {to}"),
            }
        }

        if let Some(ep) = self.en_passant {
            self.hash_en_passant(ep);
        }
        self.hash_castle();

        self.en_passant = None;
        self.castling_rights &=
            CASTLE_PERM[from.index() as usize] & CASTLE_PERM[to.index() as usize];
        self.hash_castle();

        self.fifty_move += 1;

        let captured = mv.captured();
        if captured != Piece::Empty {
            debug_assert_eq!(self.piece_at(to), captured, "capture target mismatch");
            self.clear_piece(to);
            self.fifty_move = 0;
        }

        self.hist_ply += 1;
        self.ply += 1;
        if side == Color::Black {
            self.fullmove_number += 1;
        }

        if self.piece_at(from).is_pawn() {
            self.fifty_move = 0;
            if mv.is_pawn_start() {
                let ep = match side {
                    Color::White => Square::from_120(from.index() + 10),
                    _ => Square::from_120(from.index() - 10),
                };
                debug_assert!(
                    (side == Color::White && ep.rank() == 2)
                        || (side == Color::Black && ep.rank() == 5),
                    "en-passant target {ep} on the wrong rank"
                );
                self.en_passant = Some(ep);
                self.hash_en_passant(ep);
            }
        }

        self.move_piece(from, to);

        let promoted = mv.promoted();
        if promoted != Piece::Empty {
            debug_assert!(!promoted.is_pawn() && !promoted.is_king());
            self.clear_piece(to);
            self.add_piece(to, promoted);
        }

        self.side_to_move = side.opposite();
        self.hash_side();

        #[cfg(all(debug_assertions, feature = "paranoid"))]
        self.check_board();
        #[cfg(debug_assertions)]
        self.assert_hash();

        if self.square_attacked(self.king_sq[side as usize], self.side_to_move) {
            self.unmake_move();
            return false;
        }

        true
    }

    /// Pop the most recent move and restore the position bit-exactly.
    pub fn unmake_move(&mut self) {
        let undo = self.history.pop().expect("unmake_move without a prior make_move");
        let mv = undo.mv;
        let from = mv.from();
        let to = mv.to();

        self.hist_ply -= 1;
        self.ply = self.ply.saturating_sub(1);

        self.side_to_move = self.side_to_move.opposite();
        let side = self.side_to_move;

        // A promoted piece reverts to the pawn that pushed.
        if mv.promoted() != Piece::Empty {
            self.clear_piece(to);
            self.add_piece(to, side.pawn());
        }

        self.move_piece(to, from);

        if mv.is_castle() {
            match to {
                Square::G1 => self.move_piece(Square::F1, Square::H1),
                Square::C1 => self.move_piece(Square::D1, Square::A1),
                Square::G8 => self.move_piece(Square::F8, Square::H8),
                Square::C8 => self.move_piece(Square::D8, Square::A8),
                _ => panic!("castle move to invalid square {to}"),
            }
        }

        if mv.is_en_passant() {
            let captured_sq = match side {
                Color::White => Square::from_120(to.index() - 10),
                _ => Square::from_120(to.index() + 10),
            };
            self.add_piece(captured_sq, side.opposite().pawn());
        } else if mv.captured() != Piece::Empty {
            self.add_piece(to, mv.captured());
        }

        if side == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_sub(1);
        }

        self.castling_rights = undo.castling_rights;
        self.en_passant = undo.en_passant;
        self.fifty_move = undo.fifty_move;
        self.zobrist = undo.zobrist;

        #[cfg(all(debug_assertions, feature = "paranoid"))]
        self.check_board();
        #[cfg(debug_assertions)]
        self.assert_hash();
    }

    /// Pass the turn: flip side and clear the en-passant target. Used by
    /// null-move pruning; no piece moves.
    pub fn make_null_move(&mut self) {
        assert!(
            self.history.len() < MAX_GAME_MOVES,
            "history stack exhausted after {} half-moves",
            self.history.len()
        );
        self.history.push(Undo {
            mv: Move::NONE,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            fifty_move: self.fifty_move,
            zobrist: self.zobrist,
        });

        if let Some(ep) = self.en_passant {
            self.hash_en_passant(ep);
        }
        self.en_passant = None;

        self.hist_ply += 1;
        self.ply += 1;

        self.side_to_move = self.side_to_move.opposite();
        self.hash_side();

        #[cfg(debug_assertions)]
        self.assert_hash();
    }

    pub fn unmake_null_move(&mut self) {
        let undo = self
            .history
            .pop()
            .expect("unmake_null_move without a prior make_null_move");
        debug_assert_eq!(undo.mv, Move::NONE, "unmake_null_move out of order");

        self.hist_ply -= 1;
        self.ply = self.ply.saturating_sub(1);

        self.side_to_move = self.side_to_move.opposite();
        self.en_passant = undo.en_passant;
        self.castling_rights = undo.castling_rights;
        self.fifty_move = undo.fifty_move;
        self.zobrist = undo.zobrist;
    }
}
