use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::Malformation;

/// Glyph used for the path when the emoji display option is enabled
pub const RUNNER: char = '\u{1F3C3}';

/// The set of symbols a board may contain, and what each of them costs to enter.
///
/// Every character that is not part of the alphabet is discarded while parsing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alphabet {
    pub start: char,
    pub end: char,
    pub wall: char,
    pub start_weight: usize,
    pub end_weight: usize,
    /// Open terrain symbols and their weights
    pub terrain: BTreeMap<char, usize>,
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            start: 'A',
            end: 'B',
            wall: '#',
            start_weight: 1,
            end_weight: 1,
            terrain: BTreeMap::from([
                ('.', 1),
                ('r', 1),
                ('g', 5),
                ('f', 10),
                ('m', 50),
                ('w', 100),
            ]),
        }
    }
}

impl Alphabet {
    pub fn contains(&self, symbol: char) -> bool {
        symbol == self.start
            || symbol == self.end
            || symbol == self.wall
            || self.terrain.contains_key(&symbol)
    }

    /// Weight of a recognised symbol, `None` for walls and unknown symbols
    pub fn weight(&self, symbol: char) -> Option<usize> {
        if symbol == self.start {
            Some(self.start_weight)
        } else if symbol == self.end {
            Some(self.end_weight)
        } else {
            self.terrain.get(&symbol).copied()
        }
    }

    /// The cheapest open terrain symbol, falls back to the wall symbol
    pub fn filler(&self) -> char {
        self.terrain
            .iter()
            .min_by_key(|(symbol, weight)| (**weight, **symbol))
            .map(|(symbol, _)| *symbol)
            .unwrap_or(self.wall)
    }

    /// Every symbol has one meaning and every passable symbol a positive weight
    pub fn validate(&self) -> Result<(), Malformation> {
        if self.start == self.end || self.start == self.wall {
            return Err(Malformation::SymbolClash(self.start));
        }
        if self.end == self.wall {
            return Err(Malformation::SymbolClash(self.end));
        }
        if self.start_weight == 0 {
            return Err(Malformation::ZeroWeight(self.start));
        }
        if self.end_weight == 0 {
            return Err(Malformation::ZeroWeight(self.end));
        }
        for (&symbol, &weight) in &self.terrain {
            if [self.start, self.end, self.wall].contains(&symbol) {
                return Err(Malformation::SymbolClash(symbol));
            }
            if weight == 0 {
                return Err(Malformation::ZeroWeight(symbol));
            }
        }
        Ok(())
    }
}

/// Characters written over the board when rendering a search result
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    pub visited: char,
    pub frontier: char,
    pub path: char,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            visited: 'x',
            frontier: '*',
            path: 'o',
        }
    }
}

impl Markers {
    pub fn emoji() -> Self {
        Self {
            path: RUNNER,
            ..Default::default()
        }
    }
}

/// Optional overrides applied to every cell at parse time
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Initial cost-so-far of every cell, zero when unset
    pub default_cost: Option<usize>,
    /// Fixed heuristic for every cell instead of the distance to the end cell
    pub default_heuristic: Option<usize>,
}

/// Everything the command line tool can be configured with
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub alphabet: Alphabet,
    pub markers: Markers,
    pub parse: ParseOptions,
    /// Replace the path marker with a runner glyph
    pub emoji: bool,
    /// Folder that board names are resolved against
    pub boards: Option<PathBuf>,
}

impl Settings {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let settings: Settings = serde_json::from_str(json).context("invalid settings")?;
        settings.alphabet.validate()?;
        Ok(settings)
    }

    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in {}", path.display()))
    }

    /// The markers to render with, taking the emoji option into account
    pub fn markers(&self) -> Markers {
        if self.emoji {
            Markers {
                path: RUNNER,
                ..self.markers
            }
        } else {
            self.markers
        }
    }
}
