//! The audit pipeline: fan candidate paths out to workers, fan matches back
//! into the ledger.
//!
//! Each worker stats, filters, opens, hashes and classifies one path
//! ([`audit_path`]) without touching shared mutable state. The coordinator
//! in [`audit_paths`] is the only code that mutates the [`Ledger`].

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use romaudit_dat::{Catalog, GameId, HashAlgorithm, RomId};

use crate::classify::{Classification, ClassifyResult, classify};
use crate::display::FileReport;
use crate::hasher::{hash_file, hash_reader};
use crate::ledger::Ledger;
use crate::rename::rename_in_place;
use crate::util::{file_name_of, is_excluded, is_zip};
use crate::worker_pool::WorkerPool;

/// Default number of concurrent workers.
pub const DEFAULT_WORKERS: usize = 10;

const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;

/// Run-wide audit configuration.
#[derive(Debug, Clone)]
pub struct AuditOptions {
    pub algorithm: HashAlgorithm,
    pub workers: usize,
    /// Lowercase extensions without the dot
    pub exclude: HashSet<String>,
    /// Rename unambiguous misnamed files and archives
    pub rename: bool,
    /// Create a ledger entry for every game before the run
    pub seed_all: bool,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            workers: DEFAULT_WORKERS,
            exclude: HashSet::new(),
            rename: false,
            seed_all: false,
        }
    }
}

/// Why a path was not audited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Excluded,
    NonRegular,
    StatError(String),
}

/// One classified file: a loose file or an archive member.
#[derive(Debug, Clone)]
pub struct FileMatch {
    /// Current file name (after any rename)
    pub name: String,
    /// Archive file name for archive members
    pub container: Option<String>,
    pub size: u64,
    pub digest: String,
    pub result: ClassifyResult,
    /// Previous name if the file was renamed during the run
    pub renamed_from: Option<String>,
    /// Report lines, in print order
    pub reports: Vec<FileReport>,
}

impl FileMatch {
    /// Entries this file's content satisfies.
    pub fn satisfied(&self) -> &[RomId] {
        if self.result.classification.satisfies() {
            &self.result.candidates
        } else {
            &[]
        }
    }
}

/// Result of auditing a zip archive.
#[derive(Debug, Clone)]
pub struct ArchiveAudit {
    pub members: Vec<FileMatch>,
    /// Members that could not be read
    pub failed_members: usize,
    /// New path if the archive was renamed to its game's name
    pub renamed_to: Option<PathBuf>,
}

/// What happened to one candidate path.
#[derive(Debug, Clone)]
pub enum PathOutcome {
    Skipped(SkipReason),
    /// The file or archive could not be opened or read
    Failed(String),
    Loose(FileMatch),
    Archive(ArchiveAudit),
}

/// One worker result.
#[derive(Debug, Clone)]
pub struct PathResult {
    pub path: PathBuf,
    pub outcome: PathOutcome,
}

impl PathResult {
    /// Every entry satisfied by this path, for reconciliation.
    pub fn matches(&self) -> Vec<RomId> {
        match &self.outcome {
            PathOutcome::Loose(file) => file.satisfied().to_vec(),
            PathOutcome::Archive(archive) => archive
                .members
                .iter()
                .flat_map(|m| m.satisfied().iter().copied())
                .collect(),
            PathOutcome::Skipped(_) | PathOutcome::Failed(_) => Vec::new(),
        }
    }

    /// Every report line produced for this path.
    pub fn reports(&self) -> Vec<&FileReport> {
        match &self.outcome {
            PathOutcome::Loose(file) => file.reports.iter().collect(),
            PathOutcome::Archive(archive) => archive
                .members
                .iter()
                .flat_map(|m| m.reports.iter())
                .collect(),
            PathOutcome::Skipped(_) | PathOutcome::Failed(_) => Vec::new(),
        }
    }
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct AuditRun {
    /// Worker results in completion order
    pub results: Vec<PathResult>,
    pub ledger: Ledger,
}

/// Audit `paths` against `catalog`.
///
/// `on_result` is called on the coordinator as each path finishes, in
/// completion order, before its matches are reconciled. The final ledger is
/// independent of worker count and completion order.
pub async fn audit_paths<F>(
    catalog: Arc<Catalog>,
    paths: Vec<PathBuf>,
    options: &AuditOptions,
    mut on_result: F,
) -> AuditRun
where
    F: FnMut(&PathResult),
{
    let mut ledger = Ledger::new();
    if options.seed_all {
        ledger.seed_all(&catalog);
    }

    let submitted = paths.len();
    let worker_catalog = catalog.clone();
    let worker_options = Arc::new(options.clone());
    let mut pool = WorkerPool::start(options.workers, paths, move |path: PathBuf| {
        let outcome = audit_path(&worker_catalog, &path, &worker_options);
        PathResult { path, outcome }
    });

    let mut results = Vec::with_capacity(submitted);
    while let Some(result) = pool.recv().await {
        on_result(&result);
        for rom in result.matches() {
            ledger.reconcile(&catalog, rom);
        }
        results.push(result);
    }

    if results.len() != submitted {
        log::warn!(
            "Expected {submitted} results but received {}",
            results.len()
        );
    }

    AuditRun { results, ledger }
}

/// Audit a single path. Never fails: problems become a skipped or failed
/// outcome.
pub fn audit_path(catalog: &Catalog, path: &Path, options: &AuditOptions) -> PathOutcome {
    log::debug!("Processing {}", path.display());

    let meta = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            log::debug!("Cannot check {}, skipping: {e}", path.display());
            return PathOutcome::Skipped(SkipReason::StatError(e.to_string()));
        }
    };

    let name = file_name_of(path);
    if is_excluded(&name, &options.exclude) {
        log::debug!("{} has excluded extension, skipping", path.display());
        return PathOutcome::Skipped(SkipReason::Excluded);
    }

    if !meta.is_file() {
        log::debug!("{} is not a regular file, skipping", path.display());
        return PathOutcome::Skipped(SkipReason::NonRegular);
    }

    if is_zip(path) {
        audit_archive(catalog, path, options)
    } else {
        audit_loose(catalog, path, name, meta.len(), options)
    }
}

fn audit_loose(
    catalog: &Catalog,
    path: &Path,
    name: String,
    size: u64,
    options: &AuditOptions,
) -> PathOutcome {
    let digest = match hash_file(path, options.algorithm) {
        Ok(d) => d,
        Err(e) => {
            log::error!("{} could not be read: {e}", path.display());
            return PathOutcome::Failed(e.to_string());
        }
    };
    log::debug!("{name} ({digest})");

    let mut file = FileMatch {
        result: classify(catalog, &name, &digest, options.algorithm),
        name,
        container: None,
        size,
        digest,
        renamed_from: None,
        reports: Vec::new(),
    };

    if options.rename
        && file.result.classification == Classification::HashOnly
        && file.result.is_unambiguous()
    {
        let rom_name = &catalog.rom(file.result.candidates[0]).name;
        match rename_in_place(path, rom_name) {
            Ok(_) => {
                log::debug!("ROM {rom_name} - renamed from {}", file.name);
                file.renamed_from = Some(std::mem::replace(&mut file.name, rom_name.clone()));
                file.result.classification = Classification::Exact;
            }
            Err(e) => log::error!("{e}"),
        }
    }

    file.reports = FileReport::for_match(catalog, options.algorithm, &file);
    PathOutcome::Loose(file)
}

fn audit_archive(catalog: &Catalog, path: &Path, options: &AuditOptions) -> PathOutcome {
    let container = file_name_of(path);

    let mut archive = match File::open(path)
        .map_err(zip::result::ZipError::from)
        .and_then(|f| zip::ZipArchive::new(BufReader::new(f)))
    {
        Ok(a) => a,
        Err(e) => {
            log::error!("{} could not be opened: {e}", path.display());
            return PathOutcome::Failed(e.to_string());
        }
    };

    let mut members = Vec::new();
    let mut failed_members = 0;
    for i in 0..archive.len() {
        let mut entry = match archive.by_index(i) {
            Ok(entry) => entry,
            Err(e) => {
                log::error!("{container}: member {i} could not be opened: {e}");
                failed_members += 1;
                continue;
            }
        };

        let is_symlink = entry
            .unix_mode()
            .is_some_and(|mode| mode & S_IFMT == S_IFLNK);
        if entry.is_dir() || is_symlink {
            log::debug!("{} is not a regular file, skipping", entry.name());
            continue;
        }

        let name = member_name(entry.name());
        if is_excluded(&name, &options.exclude) {
            log::debug!("{name} has excluded extension, skipping");
            continue;
        }

        let size = entry.size();
        let digest = match hash_reader(&mut entry, options.algorithm) {
            Ok(d) => d,
            Err(e) => {
                log::error!("{container}: {name} could not be read: {e}");
                failed_members += 1;
                continue;
            }
        };
        log::debug!("{name} ({digest}) in {container}");

        let mut file = FileMatch {
            result: classify(catalog, &name, &digest, options.algorithm),
            name,
            container: Some(container.clone()),
            size,
            digest,
            renamed_from: None,
            reports: Vec::new(),
        };
        file.reports = FileReport::for_match(catalog, options.algorithm, &file);
        members.push(file);
    }
    drop(archive);

    let matched_games: HashSet<GameId> = members
        .iter()
        .flat_map(|m| m.satisfied().iter().map(|&rom| catalog.parent_game(rom)))
        .collect();

    if matched_games.is_empty() {
        log::error!("{container} contains no recognised roms");
    }

    let renamed_to = if options.rename {
        rename_archive(catalog, path, &container, &matched_games)
    } else {
        None
    };

    PathOutcome::Archive(ArchiveAudit {
        members,
        failed_members,
        renamed_to,
    })
}

/// Rename an archive to `<game>.zip` when every matched member agrees on a
/// single game.
fn rename_archive(
    catalog: &Catalog,
    path: &Path,
    container: &str,
    matched_games: &HashSet<GameId>,
) -> Option<PathBuf> {
    let mut games = matched_games.iter();
    let (Some(&game), None) = (games.next(), games.next()) else {
        if matched_games.len() > 1 {
            log::debug!("{container} matches several games, not renaming");
        }
        return None;
    };

    let game_name = &catalog.game(game).name;
    let new_name = format!("{game_name}.zip");
    if new_name == container {
        return None;
    }

    match rename_in_place(path, &new_name) {
        Ok(new_path) => {
            log::info!("SET {game_name} - renamed to {new_name} from {container}");
            Some(new_path)
        }
        Err(e) => {
            log::error!("{e}");
            None
        }
    }
}

/// Base name of a member path inside an archive.
fn member_name(raw: &str) -> String {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw).to_string()
}

#[cfg(test)]
#[path = "tests/audit_tests.rs"]
mod tests;
