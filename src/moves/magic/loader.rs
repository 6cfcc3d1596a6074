//! Process-wide magic table instance and the bincode cache.
//!
//! Generation takes well under a second, so the cache mostly matters for
//! repeated short-lived invocations; point `CARDINAL_MAGIC_FILE` at a file
//! written by [`save_tables`] to skip generation.

use super::precompute::generate_magic_tables;
use super::rays::{bishop_attacks_slow, rook_attacks_slow};
use super::tables::MagicTables;
use once_cell::sync::OnceCell;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

#[cfg(feature = "deterministic_magic")]
const MAGIC_SEED: u64 = 0xC0DE_0045;

#[derive(Debug, Error)]
pub enum MagicLoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Decode(#[from] bincode::Error),

    #[error("cached tables failed validation")]
    Invalid,
}

fn generation_seed() -> Option<u64> {
    #[cfg(feature = "deterministic_magic")]
    {
        Some(MAGIC_SEED)
    }
    #[cfg(not(feature = "deterministic_magic"))]
    {
        None
    }
}

/// The global tables, loaded from the cache when one is configured and
/// valid, generated otherwise.
pub fn magic_tables() -> &'static MagicTables {
    static TABLES: OnceCell<MagicTables> = OnceCell::new();
    TABLES.get_or_init(|| {
        if let Ok(path) = std::env::var("CARDINAL_MAGIC_FILE") {
            match load_tables(&path) {
                Ok(tables) => {
                    tracing::debug!(path = %path, "loaded magic tables from cache");
                    return tables;
                }
                Err(err) => {
                    tracing::warn!(path = %path, %err, "magic cache unusable, regenerating");
                }
            }
        }
        generate_magic_tables(generation_seed())
    })
}

pub fn save_tables<P: AsRef<Path>>(tables: &MagicTables, path: P) -> Result<(), MagicLoadError> {
    let file = File::create(path)?;
    bincode::serialize_into(BufWriter::new(file), tables)?;
    Ok(())
}

pub fn load_tables<P: AsRef<Path>>(path: P) -> Result<MagicTables, MagicLoadError> {
    let file = File::open(path)?;
    let tables: MagicTables = bincode::deserialize_from(BufReader::new(file))?;
    validate(&tables)?;
    Ok(tables)
}

/// Spot-check a cached table against the scan oracle before trusting it.
fn validate(tables: &MagicTables) -> Result<(), MagicLoadError> {
    if tables.rook.entries.len() != 64 || tables.bishop.entries.len() != 64 {
        return Err(MagicLoadError::Invalid);
    }
    let blockers = (1u64 << 19) | (1u64 << 35) | (1u64 << 42);
    for sq in [0u8, 27, 36, 63] {
        if tables.rook_attacks(sq, blockers) != rook_attacks_slow(sq, blockers)
            || tables.bishop_attacks(sq, blockers) != bishop_attacks_slow(sq, blockers)
        {
            return Err(MagicLoadError::Invalid);
        }
    }
    Ok(())
}
