//! Report model shared by every command that prints audit results.
//!
//! Everything here is plain text; frontends add color to the [`Status`] tag
//! themselves.

use std::fmt;

use romaudit_dat::{Catalog, HashAlgorithm, RomId};

use crate::audit::FileMatch;
use crate::classify::{Classification, SizeDiagnostic, size_diagnostic};
use crate::ledger::{Completion, GameReport};

// ---------------------------------------------------------------------------
// Status tags
// ---------------------------------------------------------------------------

/// Status tag at the start of every report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    Warn,
    Bad,
    Miss,
    Unk,
}

impl Status {
    /// Fixed-width bracketed tag, e.g. `[ OK ]`.
    pub fn tag(self) -> &'static str {
        match self {
            Status::Ok => "[ OK ]",
            Status::Warn => "[WARN]",
            Status::Bad => "[BAD ]",
            Status::Miss => "[MISS]",
            Status::Unk => "[UNK ]",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ---------------------------------------------------------------------------
// Per-file lines
// ---------------------------------------------------------------------------

/// Trailing message of a per-file line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileDetail {
    /// Content is known under another name.
    Misnamed { expected: String, ambiguous: bool },
    /// Name is known but content is not.
    Incorrect {
        expected_hash: Option<String>,
        size: Option<SizeDiagnostic>,
    },
    Unknown,
    RenamedFrom(String),
}

impl fmt::Display for FileDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileDetail::Misnamed {
                expected,
                ambiguous,
            } => {
                write!(f, "misnamed, should be {expected}")?;
                if *ambiguous {
                    f.write_str(" (ambiguous)")?;
                }
                Ok(())
            }
            FileDetail::Incorrect {
                expected_hash,
                size,
            } => {
                write!(
                    f,
                    "incorrect, expected {}",
                    expected_hash.as_deref().unwrap_or("-")
                )?;
                if let Some(size) = size {
                    write!(f, " {size}")?;
                }
                Ok(())
            }
            FileDetail::Unknown => f.write_str("unknown"),
            FileDetail::RenamedFrom(old) => write!(f, "renamed from {old}"),
        }
    }
}

/// One per-file report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub status: Status,
    /// Digest of the file under the run's algorithm
    pub hash: String,
    pub file_name: String,
    /// Archive file name when the file is an archive member
    pub container: Option<String>,
    pub detail: Option<FileDetail>,
}

impl FileReport {
    /// Build the report lines for one classified file.
    ///
    /// `Exact` yields a single line; `HashOnly` and `NameOnly` yield one
    /// line per candidate entry.
    pub fn for_match(
        catalog: &Catalog,
        algorithm: HashAlgorithm,
        file: &FileMatch,
    ) -> Vec<FileReport> {
        let line = |status, detail| FileReport {
            status,
            hash: file.digest.clone(),
            file_name: file.name.clone(),
            container: file.container.clone(),
            detail,
        };
        let candidates = &file.result.candidates;

        match file.result.classification {
            Classification::None => vec![line(Status::Unk, Some(FileDetail::Unknown))],
            Classification::Exact => {
                let detail = file.renamed_from.clone().map(FileDetail::RenamedFrom);
                vec![line(Status::Ok, detail)]
            }
            Classification::HashOnly => {
                let ambiguous = candidates.len() > 1;
                candidates
                    .iter()
                    .map(|&id| {
                        line(
                            Status::Warn,
                            Some(FileDetail::Misnamed {
                                expected: catalog.rom(id).name.clone(),
                                ambiguous,
                            }),
                        )
                    })
                    .collect()
            }
            Classification::NameOnly => candidates
                .iter()
                .map(|&id| {
                    let rom = catalog.rom(id);
                    line(
                        Status::Bad,
                        Some(FileDetail::Incorrect {
                            expected_hash: rom.hash(algorithm).map(str::to_string),
                            size: size_diagnostic(file.size, rom.size),
                        }),
                    )
                })
                .collect(),
        }
    }

    /// Line text after the status tag.
    pub fn body(&self) -> String {
        let mut body = format!("{} {}", self.hash, self.file_name);
        if let Some(container) = &self.container {
            body.push(' ');
            body.push_str(container);
        }
        if let Some(detail) = &self.detail {
            body.push_str(" - ");
            body.push_str(&detail.to_string());
        }
        body
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.body())
    }
}

// ---------------------------------------------------------------------------
// Per-game summary lines
// ---------------------------------------------------------------------------

/// Status tag for a game summary.
pub fn set_status(completion: Completion) -> Status {
    match completion {
        Completion::Complete => Status::Ok,
        Completion::Partial => Status::Warn,
        Completion::Missing => Status::Miss,
    }
}

/// Summary header text after the tag: the game name, plus
/// `is missing:` for partial games.
pub fn set_header(report: &GameReport) -> String {
    match report.completion {
        Completion::Partial => format!("{} is missing:", report.name),
        Completion::Complete | Completion::Missing => report.name.clone(),
    }
}

/// Indented `<hash> <name>` line for a missing entry.
pub fn missing_entry_line(catalog: &Catalog, rom: RomId, algorithm: HashAlgorithm) -> String {
    let entry = catalog.rom(rom);
    format!(
        "        {} {}",
        entry.hash(algorithm).unwrap_or("-"),
        entry.name
    )
}

/// All plain-text lines for one game summary (header first).
pub fn set_lines(
    catalog: &Catalog,
    report: &GameReport,
    algorithm: HashAlgorithm,
) -> Vec<String> {
    let mut lines = vec![format!(
        "{}  {}",
        set_status(report.completion),
        set_header(report)
    )];
    if report.completion == Completion::Partial {
        lines.extend(
            report
                .missing
                .iter()
                .map(|&rom| missing_entry_line(catalog, rom, algorithm)),
        );
    }
    lines
}

#[cfg(test)]
#[path = "tests/display_tests.rs"]
mod tests;
