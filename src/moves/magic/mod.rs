//! Magic-bitboard sliding attacks.
//!
//! `rays` walks the padded board and is the slow reference; `precompute`
//! searches random candidates for the magic multipliers and fills the
//! per-square tables; `loader` owns the process-wide instance and the
//! bincode cache. The contract for every slider and ray direction: squares
//! up to and including the first blocker are set.

pub mod loader;
pub mod precompute;
pub mod rays;
pub mod tables;

pub use loader::magic_tables;
pub use tables::{Magic, MagicTables, SliderTable};
