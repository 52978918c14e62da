//! Packing complete sets of loose files into `<game>.zip` archives.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use romaudit_dat::{Catalog, GameId, RomId};

use crate::audit::{PathOutcome, PathResult};
use crate::classify::Classification;
use crate::error::AuditError;

/// A game whose every entry is present as an exactly matching loose file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetPlan {
    pub game: GameId,
    pub game_name: String,
    /// Source file for each entry, in catalog order
    pub files: Vec<(RomId, PathBuf)>,
}

impl SetPlan {
    pub fn archive_name(&self) -> String {
        format!("{}.zip", self.game_name)
    }
}

/// Group exact loose matches by game and keep the complete games.
///
/// Archives are never repacked. When two files satisfy the same entry the
/// first one wins.
pub fn plan_sets(catalog: &Catalog, results: &[PathResult]) -> Vec<SetPlan> {
    let mut found: BTreeMap<GameId, BTreeMap<RomId, PathBuf>> = BTreeMap::new();

    for result in results {
        let PathOutcome::Loose(file) = &result.outcome else {
            continue;
        };
        if file.result.classification != Classification::Exact {
            continue;
        }
        for &rom in &file.result.candidates {
            let game = catalog.parent_game(rom);
            let files = found.entry(game).or_default();
            if files.contains_key(&rom) {
                log::debug!(
                    "{} already found for {}",
                    file.name,
                    catalog.game(game).name
                );
                continue;
            }
            files.insert(rom, result.path.clone());
        }
    }

    found
        .into_iter()
        .filter_map(|(game, files)| {
            let entry = catalog.game(game);
            log::debug!(
                "Game {} needs {} file(s), found {}",
                entry.name,
                entry.roms.len(),
                files.len()
            );
            let needed: BTreeSet<RomId> = entry.roms.iter().copied().collect();
            let have: BTreeSet<RomId> = files.keys().copied().collect();
            (needed == have).then(|| SetPlan {
                game,
                game_name: entry.name.clone(),
                files: files.into_iter().collect(),
            })
        })
        .collect()
}

/// Write `plan` to `<outdir>/<game>.zip` with deflate compression, storing
/// each file under its catalog name.
///
/// An existing target is refused. A partially written archive is removed.
pub fn write_set(
    catalog: &Catalog,
    plan: &SetPlan,
    outdir: &Path,
) -> Result<PathBuf, AuditError> {
    let archive_name = plan.archive_name();
    if archive_name.contains(['/', '\\']) {
        return Err(AuditError::output(
            outdir.join(&archive_name),
            "game name is not a plain file name",
        ));
    }
    let target = outdir.join(&archive_name);

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
        .map_err(|e| AuditError::output(&target, e))?;

    if let Err(e) = write_archive(catalog, plan, file) {
        if let Err(rm) = fs::remove_file(&target) {
            log::warn!("Unable to remove partial {}: {rm}", target.display());
        }
        return Err(e);
    }

    log::info!("Finished writing {archive_name}");
    Ok(target)
}

fn write_archive(catalog: &Catalog, plan: &SetPlan, file: File) -> Result<(), AuditError> {
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (rom, source) in &plan.files {
        let name = &catalog.rom(*rom).name;
        log::debug!("Writing {name} to {}", plan.archive_name());
        zip.start_file(name.as_str(), options)?;
        let mut reader = File::open(source)?;
        io::copy(&mut reader, &mut zip)?;
    }

    zip.finish()?.flush()?;
    Ok(())
}

/// Delete the source files of every written set. A file shared by several
/// sets is removed once. Failures are logged and returned, never fatal.
///
/// Call after every set has been written.
pub fn remove_sources<'a>(
    plans: impl IntoIterator<Item = &'a SetPlan>,
) -> Vec<(PathBuf, io::Error)> {
    let paths: BTreeSet<&PathBuf> = plans
        .into_iter()
        .flat_map(|plan| plan.files.iter().map(|(_, path)| path))
        .collect();

    let mut failures = Vec::new();
    for path in paths {
        log::debug!("Removing file {}", path.display());
        if let Err(e) = fs::remove_file(path) {
            log::warn!("Unable to remove file {}: {e}", path.display());
            failures.push((path.clone(), e));
        }
    }
    failures
}

#[cfg(test)]
#[path = "tests/packer_tests.rs"]
mod tests;
