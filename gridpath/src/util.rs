use std::path::{Path, PathBuf};

use anyhow::Context;
use log::debug;

use crate::{Alphabet, Grid, Settings};

/// The boards folder shipped with the crate
pub fn default_boards_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("boards")
}

/// Resolve a board name: existing paths are used as they are, anything else
/// is looked up in `boards`.
pub fn board_path(boards: &Path, name: &str) -> PathBuf {
    let direct = Path::new(name);
    if direct.is_file() {
        direct.to_path_buf()
    } else {
        boards.join(name)
    }
}

pub fn read_board(path: &Path) -> Result<String, anyhow::Error> {
    debug!("reading board from {}", path.display());
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read board {}", path.display()))
}

/// Load and parse a board by name with the given settings
pub fn load_board(settings: &Settings, name: &str) -> Result<Grid, anyhow::Error> {
    let boards = settings
        .boards
        .clone()
        .unwrap_or_else(default_boards_dir);
    let path = board_path(&boards, name);
    let text = read_board(&path)?;

    let grid = Grid::parse_with(&text, &settings.alphabet, settings.parse)
        .with_context(|| format!("failed to parse board {}", path.display()))?;

    Ok(grid.with_markers(settings.markers()))
}

/// Scales the board by the given factor, i.e. to make it twice as large, pass 2.
///
/// Every cell becomes a `factor` x `factor` block of the same symbol, except for
/// the start and end cells: only the top left corner of their block keeps the
/// symbol, the rest is filled with the cheapest terrain. Lines without any
/// board symbol are dropped.
pub fn scale_up(text: &str, factor: usize, alphabet: &Alphabet) -> String {
    let filler = alphabet.filler();
    let mut lines = Vec::new();

    for row in text.lines() {
        let symbols: Vec<char> = row.chars().filter(|c| alphabet.contains(*c)).collect();
        if symbols.is_empty() {
            continue;
        }

        for r in 0..factor {
            let line: String = symbols
                .iter()
                .flat_map(|&symbol| {
                    (0..factor).map(move |c| {
                        let unique = symbol == alphabet.start || symbol == alphabet.end;
                        if unique && (r, c) != (0, 0) {
                            filler
                        } else {
                            symbol
                        }
                    })
                })
                .collect();
            lines.push(line);
        }
    }

    lines.join("\n")
}
