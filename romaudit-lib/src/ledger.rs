//! Per-game bookkeeping of which catalog entries are still missing.
//!
//! The ledger has exactly one writer: the coordinator that drains worker
//! results. Workers never see it, so it needs no locking.

use std::collections::{BTreeSet, HashMap};

use romaudit_dat::{Catalog, GameId, RomId};

/// Completion state of one game at report time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Completion {
    /// Every entry was found.
    Complete,
    /// Some entries were found.
    Partial,
    /// Nothing was found.
    Missing,
}

/// Ledger state for one referenced game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub game: GameId,
    /// Frozen copy of the game's entries at creation
    pub all: BTreeSet<RomId>,
    /// Entries not yet satisfied; always a subset of `all`
    pub missing: BTreeSet<RomId>,
}

impl LedgerEntry {
    fn new(catalog: &Catalog, game: GameId) -> Self {
        let all: BTreeSet<RomId> = catalog.child_roms(game).iter().copied().collect();
        Self {
            game,
            missing: all.clone(),
            all,
        }
    }

    pub fn completion(&self) -> Completion {
        if self.missing.is_empty() {
            Completion::Complete
        } else if self.missing == self.all {
            Completion::Missing
        } else {
            Completion::Partial
        }
    }
}

/// Outcome of reconciling one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// Entry was missing and is now satisfied.
    Removed,
    /// Entry had already been satisfied by another file.
    Duplicate,
}

/// Order in which game summaries are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SetOrder {
    /// Catalog order
    #[default]
    Datfile,
    /// Sorted by game name
    Name,
}

/// One game's summary, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    pub game: GameId,
    pub name: String,
    pub completion: Completion,
    /// Missing entries in catalog order
    pub missing: Vec<RomId>,
}

/// Aggregate counts over every game in the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditSummary {
    pub complete: usize,
    pub partial: usize,
    pub missing: usize,
}

impl AuditSummary {
    pub fn total(&self) -> usize {
        self.complete + self.partial + self.missing
    }
}

/// Run-scoped record of missing entries for every referenced game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: HashMap<GameId, LedgerEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the game's entry, creating it on first reference.
    pub fn touch(&mut self, catalog: &Catalog, game: GameId) -> &mut LedgerEntry {
        self.entries.entry(game).or_insert_with(|| {
            let entry = LedgerEntry::new(catalog, game);
            log::debug!(
                "Adding game {} with {} roms",
                catalog.game(game).name,
                entry.all.len()
            );
            entry
        })
    }

    /// Create an entry for every game in the catalog up front.
    pub fn seed_all(&mut self, catalog: &Catalog) {
        for (id, _) in catalog.games() {
            self.touch(catalog, id);
        }
    }

    /// Mark `rom` as satisfied in its parent game.
    ///
    /// A second reconcile of the same entry is a no-op reported as
    /// [`Reconciled::Duplicate`].
    pub fn reconcile(&mut self, catalog: &Catalog, rom: RomId) -> Reconciled {
        let game = catalog.parent_game(rom);
        let entry = self.touch(catalog, game);
        let rom_entry = catalog.rom(rom);
        let game_name = &catalog.game(game).name;

        if entry.missing.remove(&rom) {
            log::debug!(
                "Removing rom {} from {game_name}, {} still missing",
                rom_entry.name,
                entry.missing.len()
            );
            Reconciled::Removed
        } else {
            log::warn!(
                "Rom {} in {game_name} already found, possible duplicate file",
                rom_entry.name
            );
            Reconciled::Duplicate
        }
    }

    pub fn get(&self, game: GameId) -> Option<&LedgerEntry> {
        self.entries.get(&game)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summaries for every game in the ledger, in the requested order.
    pub fn summarize(&self, catalog: &Catalog, order: SetOrder) -> Vec<GameReport> {
        let mut reports: Vec<GameReport> = self
            .entries
            .values()
            .map(|entry| GameReport {
                game: entry.game,
                name: catalog.game(entry.game).name.clone(),
                completion: entry.completion(),
                missing: entry.missing.iter().copied().collect(),
            })
            .collect();

        match order {
            SetOrder::Datfile => reports.sort_by_key(|r| r.game),
            SetOrder::Name => reports.sort_by(|a, b| a.name.cmp(&b.name).then(a.game.cmp(&b.game))),
        }
        reports
    }

    /// Count complete, partial and missing games.
    pub fn counts(&self) -> AuditSummary {
        let mut summary = AuditSummary::default();
        for entry in self.entries.values() {
            match entry.completion() {
                Completion::Complete => summary.complete += 1,
                Completion::Partial => summary.partial += 1,
                Completion::Missing => summary.missing += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
#[path = "tests/ledger_tests.rs"]
mod tests;
