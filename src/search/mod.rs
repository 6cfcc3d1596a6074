pub mod context;
pub mod eval;
pub mod ordering;
pub mod pesto;
pub mod search;
pub mod tt;

/// Deepest search ply; killers and the PV are bounded by it.
pub const MAX_PLY: usize = 64;

/// Score band. Mate scores live just under [`INFINITY`] and encode distance
/// to mate; they are re-based by ply when they pass through the cache.
pub const INFINITY: i32 = 30_000;
pub const MATE: i32 = 29_000;
pub const MATE_THRESHOLD: i32 = MATE - MAX_PLY as i32;
