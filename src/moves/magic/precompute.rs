//! Magic number search and table fill.
//!
//! For each square: build the relevant-occupancy mask (rays up to but
//! excluding the board edge), enumerate every blocker subset, and try random
//! sparse multipliers until one hashes all subsets without a destructive
//! collision. Constructive collisions (same attack set) are allowed, which
//! is what makes the tables compact.

use super::rays::{BISHOP_DIRS, ROOK_DIRS, bishop_attacks_slow, rook_attacks_slow};
use super::tables::{Magic, MagicTables, SliderTable};
use crate::square::{SQ64_TO_SQ120, Square, on_board};
use rand::{RngCore, SeedableRng, rngs::StdRng};

fn relevant_mask(sq64: u8, dirs: [i16; 4]) -> u64 {
    let origin = SQ64_TO_SQ120[sq64 as usize] as i16;
    let mut mask = 0u64;
    for dir in dirs {
        let mut t = origin + dir;
        while on_board(t as u8) && on_board((t + dir) as u8) {
            mask |= 1u64 << Square::from_120(t as u8).index64();
            t += dir;
        }
    }
    mask
}

/// Carry-rippler enumeration of all subsets of `mask`.
fn blocker_subsets(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::with_capacity(1usize << mask.count_ones());
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

#[inline]
fn sparse_candidate(rng: &mut StdRng) -> u64 {
    rng.next_u64() & rng.next_u64() & rng.next_u64()
}

fn find_magic(sq64: u8, dirs: [i16; 4], slow: fn(u8, u64) -> u64, rng: &mut StdRng) -> Magic {
    let mask = relevant_mask(sq64, dirs);
    let bits = mask.count_ones();
    let shift = 64 - bits;
    let subsets = blocker_subsets(mask);
    let reference: Vec<u64> = subsets.iter().map(|&b| slow(sq64, b)).collect();

    loop {
        let magic = sparse_candidate(rng);
        // weed out multipliers that cannot spread the mask's high bits
        if (mask.wrapping_mul(magic) >> 56).count_ones() < 6 {
            continue;
        }

        let mut table = vec![0u64; 1usize << bits];
        let mut used = vec![false; 1usize << bits];
        let mut ok = true;

        for (i, &blockers) in subsets.iter().enumerate() {
            let index = (blockers.wrapping_mul(magic) >> shift) as usize;
            if !used[index] {
                used[index] = true;
                table[index] = reference[i];
            } else if table[index] != reference[i] {
                ok = false;
                break;
            }
        }

        if ok {
            return Magic {
                magic,
                shift,
                mask,
                table: table.into_boxed_slice(),
            };
        }
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => {
            let mut seed = [0u8; 32];
            rand::rng().fill_bytes(&mut seed);
            StdRng::from_seed(seed)
        }
    }
}

pub fn generate_magic_tables(seed: Option<u64>) -> MagicTables {
    let mut rng = make_rng(seed);

    let rook = SliderTable {
        entries: (0..64u8)
            .map(|sq| find_magic(sq, ROOK_DIRS, rook_attacks_slow, &mut rng))
            .collect(),
    };
    let bishop = SliderTable {
        entries: (0..64u8)
            .map(|sq| find_magic(sq, BISHOP_DIRS, bishop_attacks_slow, &mut rng))
            .collect(),
    };

    MagicTables { rook, bishop }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SEED: u64 = 0x45;

    #[test]
    fn rook_masks_exclude_edges() {
        // a1 rook mask: b1..g1 and a2..a7
        let mask = relevant_mask(0, ROOK_DIRS);
        assert_eq!(mask.count_ones(), 12);
        assert_eq!(mask & (1u64 << 7), 0); // h1 excluded
        assert_eq!(mask & (1u64 << 56), 0); // a8 excluded
    }

    #[test]
    fn subset_count_matches_mask_bits() {
        let mask = relevant_mask(27, BISHOP_DIRS);
        assert_eq!(blocker_subsets(mask).len(), 1usize << mask.count_ones());
    }

    #[test]
    fn generated_tables_match_the_scan_oracle() {
        let tables = generate_magic_tables(Some(TEST_SEED));
        let blocker_sets = [
            0u64,
            (1u64 << 19) | (1u64 << 35),
            (1u64 << 41) | (1u64 << 21) | (1u64 << 12),
            0xFFFF_0000_0000_FFFF,
        ];
        for sq in 0..64u8 {
            for &blockers in &blocker_sets {
                assert_eq!(
                    tables.rook_attacks(sq, blockers),
                    rook_attacks_slow(sq, blockers),
                    "rook mismatch on square {sq}"
                );
                assert_eq!(
                    tables.bishop_attacks(sq, blockers),
                    bishop_attacks_slow(sq, blockers),
                    "bishop mismatch on square {sq}"
                );
            }
        }
    }

    #[test]
    fn queen_is_union_of_rook_and_bishop() {
        let tables = generate_magic_tables(Some(TEST_SEED));
        let blockers = (1u64 << 19) | (1u64 << 35) | (1u64 << 41) | (1u64 << 21);
        assert_eq!(
            tables.queen_attacks(27, blockers),
            rook_attacks_slow(27, blockers) | bishop_attacks_slow(27, blockers)
        );
    }
}
