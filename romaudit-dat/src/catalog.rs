//! Read-only catalog of games and their expected ROM entries.
//!
//! Entries live in a flat arena and are referred to by [`RomId`]; games by
//! [`GameId`]. Two entries with identical name and hash in different games
//! are distinct ids. All hashes are lowercased once at build time so lookups
//! never compare case at query time.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::algorithm::HashAlgorithm;
use crate::dat::{self, DatFile, DatRom};
use crate::error::DatError;

/// Stable identifier of a catalog entry (index into the rom arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RomId(pub usize);

/// Stable identifier of a catalog game (index into the game list).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameId(pub usize);

/// One expected file within a game.
#[derive(Debug, Clone)]
pub struct CatalogRom {
    pub name: String,
    pub size: Option<u64>,
    /// Algorithm -> lowercase hex digest
    pub hashes: BTreeMap<HashAlgorithm, String>,
    pub game: GameId,
}

impl CatalogRom {
    /// Stored digest for `algorithm`, if the catalog recorded one.
    pub fn hash(&self, algorithm: HashAlgorithm) -> Option<&str> {
        self.hashes.get(&algorithm).map(String::as_str)
    }
}

/// A named set of expected entries.
#[derive(Debug, Clone)]
pub struct CatalogGame {
    pub name: String,
    pub description: Option<String>,
    /// Child entries in catalog order
    pub roms: Vec<RomId>,
}

/// How a name query compares against entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    Exact,
    Substring,
}

impl NameMatch {
    fn matches(self, candidate: &str, query: &str) -> bool {
        match self {
            NameMatch::Exact => candidate == query,
            NameMatch::Substring => candidate.contains(query),
        }
    }
}

/// Immutable, indexed view of a DAT file.
///
/// Built once and then shared read-only between workers; every query takes
/// `&self` and allocates its own result.
#[derive(Debug, Default)]
pub struct Catalog {
    pub name: String,
    pub description: String,
    pub version: String,
    games: Vec<CatalogGame>,
    roms: Vec<CatalogRom>,
    /// Algorithm -> lowercase digest -> entries
    by_hash: HashMap<HashAlgorithm, HashMap<String, Vec<RomId>>>,
    /// Exact entry name -> entries
    by_name: HashMap<String, Vec<RomId>>,
}

impl Catalog {
    /// Build a catalog from a parsed DAT file.
    pub fn from_dat(dat: DatFile) -> Self {
        let mut catalog = Catalog {
            name: dat.name,
            description: dat.description,
            version: dat.version,
            ..Default::default()
        };

        for game in dat.games {
            let game_id = GameId(catalog.games.len());
            let mut rom_ids = Vec::with_capacity(game.roms.len());

            for rom in game.roms {
                let rom_id = RomId(catalog.roms.len());
                let entry = catalog_rom(rom, game_id);

                for (&algorithm, digest) in &entry.hashes {
                    catalog
                        .by_hash
                        .entry(algorithm)
                        .or_default()
                        .entry(digest.clone())
                        .or_default()
                        .push(rom_id);
                }
                catalog
                    .by_name
                    .entry(entry.name.clone())
                    .or_default()
                    .push(rom_id);

                catalog.roms.push(entry);
                rom_ids.push(rom_id);
            }

            catalog.games.push(CatalogGame {
                name: game.name,
                description: game.description,
                roms: rom_ids,
            });
        }

        log::debug!(
            "Catalog '{}' loaded: {} games, {} roms",
            catalog.name,
            catalog.games.len(),
            catalog.roms.len()
        );
        catalog
    }

    /// Parse and index the DAT file at `path`.
    pub fn load(path: &Path) -> Result<Self, DatError> {
        let dat = dat::parse_dat_file(path)?;
        Ok(Self::from_dat(dat))
    }

    /// Every entry whose stored `algorithm` digest equals `digest`,
    /// compared case-insensitively.
    pub fn find_by_hash(&self, algorithm: HashAlgorithm, digest: &str) -> &[RomId] {
        self.by_hash
            .get(&algorithm)
            .and_then(|index| index.get(&digest.to_ascii_lowercase()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every entry whose name matches `name`.
    pub fn find_by_name(&self, name: &str, mode: NameMatch) -> Vec<RomId> {
        match mode {
            NameMatch::Exact => self.by_name.get(name).cloned().unwrap_or_default(),
            NameMatch::Substring => self
                .roms
                .iter()
                .enumerate()
                .filter(|(_, rom)| mode.matches(&rom.name, name))
                .map(|(i, _)| RomId(i))
                .collect(),
        }
    }

    /// Every game whose name matches `name`.
    pub fn find_games_by_name(&self, name: &str, mode: NameMatch) -> Vec<GameId> {
        self.games
            .iter()
            .enumerate()
            .filter(|(_, game)| mode.matches(&game.name, name))
            .map(|(i, _)| GameId(i))
            .collect()
    }

    /// Games in catalog order, paired with their ids.
    pub fn games(&self) -> impl Iterator<Item = (GameId, &CatalogGame)> {
        self.games
            .iter()
            .enumerate()
            .map(|(i, game)| (GameId(i), game))
    }

    pub fn game(&self, id: GameId) -> &CatalogGame {
        &self.games[id.0]
    }

    pub fn rom(&self, id: RomId) -> &CatalogRom {
        &self.roms[id.0]
    }

    /// Direct child entries of a game.
    pub fn child_roms(&self, id: GameId) -> &[RomId] {
        &self.games[id.0].roms
    }

    /// Game that owns an entry.
    pub fn parent_game(&self, id: RomId) -> GameId {
        self.roms[id.0].game
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    pub fn rom_count(&self) -> usize {
        self.roms.len()
    }
}

fn catalog_rom(rom: DatRom, game: GameId) -> CatalogRom {
    let mut hashes = BTreeMap::new();
    let sources = [
        (HashAlgorithm::Crc, rom.crc),
        (HashAlgorithm::Md5, rom.md5),
        (HashAlgorithm::Sha1, rom.sha1),
    ];
    for (algorithm, digest) in sources {
        if let Some(digest) = digest.filter(|d| !d.is_empty()) {
            hashes.insert(algorithm, digest.to_ascii_lowercase());
        }
    }

    CatalogRom {
        name: rom.name,
        size: rom.size,
        hashes,
        game,
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
