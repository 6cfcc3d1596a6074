//! UCI-style command-line driver. All engine logic lives in the library;
//! this loop only translates protocol lines into calls.

use cardinal::board::Position;
use cardinal::logger::init_logging;
use cardinal::moves::magic::loader::{magic_tables, save_tables};
use cardinal::moves::perft::{perft, perft_divide};
use cardinal::search::eval::evaluate;
use cardinal::search::search::{SearchLimits, search};
use cardinal::search::tt::{Cache, DEFAULT_CACHE_MB};
use std::io::{self, BufRead};
use std::time::Duration;

fn main() {
    init_logging("logs/cardinal.log", "cardinal=info");

    // Force table construction before the first "go".
    let _ = magic_tables();

    let mut pos = Position::new();
    let mut cache = Cache::new(DEFAULT_CACHE_MB);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l.trim().to_string(),
            Err(_) => break,
        };
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "uci" => {
                println!("id name Cardinal 0.9");
                println!("id author Cardinal authors");
                println!("uciok");
            }
            "isready" => println!("readyok"),
            "ucinewgame" => {
                pos = Position::new();
                cache.clear();
            }
            "position" => {
                if let Some(new_pos) = handle_position(&parts) {
                    pos = new_pos;
                }
            }
            "go" => handle_go(&parts, &mut pos, &mut cache),
            "perft" => {
                let depth = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(4);
                let nodes = perft(&mut pos, depth);
                println!("perft {depth}: {nodes}");
            }
            "divide" => {
                let depth = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(4);
                perft_divide(&mut pos, depth);
            }
            "eval" => println!("eval {}", evaluate(&pos)),
            "fen" => println!("{pos}"),
            "d" | "display" => print!("{}", pos.board_string()),
            "magics" => {
                let path = parts.get(1).copied().unwrap_or("cardinal_magics.bin");
                match save_tables(magic_tables(), path) {
                    Ok(()) => println!("info string magic tables written to {path}"),
                    Err(err) => println!("info string failed to write magics: {err}"),
                }
            }
            "quit" => break,
            _ => {}
        }
    }
}

fn handle_position(parts: &[&str]) -> Option<Position> {
    let mut pos = if parts.get(1) == Some(&"fen") {
        let fen_end = parts
            .iter()
            .position(|&p| p == "moves")
            .unwrap_or(parts.len());
        let fen = parts.get(2..fen_end)?.join(" ");
        match Position::from_fen(&fen) {
            Ok(p) => p,
            Err(err) => {
                eprintln!("invalid fen: {err}");
                return None;
            }
        }
    } else {
        Position::new()
    };

    if let Some(moves_idx) = parts.iter().position(|&p| p == "moves") {
        for move_str in &parts[moves_idx + 1..] {
            let Some(mv) = pos.parse_move(move_str) else {
                eprintln!("invalid move: {move_str}");
                return None;
            };
            if !pos.make_move(mv) {
                eprintln!("illegal move: {move_str}");
                return None;
            }
        }
    }
    Some(pos)
}

fn handle_go(parts: &[&str], pos: &mut Position, cache: &mut Cache) {
    let mut limits = SearchLimits::default();

    let mut iter = parts.iter().skip(1);
    let mut wtime: Option<u64> = None;
    let mut btime: Option<u64> = None;
    while let Some(&token) = iter.next() {
        let value = iter.next().and_then(|v| v.parse::<u64>().ok());
        match token {
            "depth" => limits.depth = value.map(|v| v as u8),
            "movetime" => limits.move_time = value.map(Duration::from_millis),
            "wtime" => wtime = value,
            "btime" => btime = value,
            _ => {}
        }
    }

    // Crude allocation: a thirtieth of the remaining clock.
    if limits.move_time.is_none() {
        let remaining = match pos.side_to_move {
            cardinal::board::Color::White => wtime,
            _ => btime,
        };
        if let Some(ms) = remaining {
            limits.move_time = Some(Duration::from_millis((ms / 30).max(50)));
        }
    }

    // Unbounded "go" would never return.
    if limits.depth.is_none() && limits.move_time.is_none() {
        limits.depth = Some(7);
    }

    let result = search(pos, cache, &limits);
    println!("bestmove {}", result.best_move);
}
