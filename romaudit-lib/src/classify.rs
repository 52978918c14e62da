//! Matching a candidate file against the catalog.
//!
//! [`classify`] is a pure function of its inputs and the catalog snapshot, so
//! workers call it concurrently without coordination.

use std::cmp::Ordering;
use std::fmt;

use romaudit_dat::{Catalog, HashAlgorithm, NameMatch, RomId};

use crate::util::format_iec;

/// How a candidate file relates to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Neither content nor name is known.
    None,
    /// An entry has this name, but no entry has this content.
    NameOnly,
    /// Content is known but filed under another name.
    HashOnly,
    /// Content and name both match.
    Exact,
}

impl Classification {
    /// Whether the file's content satisfies its candidate entries.
    pub fn satisfies(self) -> bool {
        matches!(self, Classification::Exact | Classification::HashOnly)
    }
}

/// Classification plus the entries that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyResult {
    pub classification: Classification,
    pub candidates: Vec<RomId>,
}

impl ClassifyResult {
    /// Exactly one candidate, i.e. safe to act on without guessing.
    pub fn is_unambiguous(&self) -> bool {
        self.candidates.len() == 1
    }
}

/// Classify a candidate by `(name, digest)`.
///
/// 1. Look up every entry whose `algorithm` hash equals `digest`.
/// 2. With no hash match, fall back to exact name lookup (`NameOnly`), or
///    `None` if that is empty too.
/// 3. Otherwise keep the hash matches whose name also equals `name`
///    (`Exact`); if there are none, every hash match is a `HashOnly`
///    candidate.
pub fn classify(
    catalog: &Catalog,
    name: &str,
    digest: &str,
    algorithm: HashAlgorithm,
) -> ClassifyResult {
    let by_hash = catalog.find_by_hash(algorithm, digest);

    if by_hash.is_empty() {
        let by_name = catalog.find_by_name(name, NameMatch::Exact);
        let classification = if by_name.is_empty() {
            Classification::None
        } else {
            Classification::NameOnly
        };
        log::debug!(
            "No match for hash {digest}, {} entries named {name}",
            by_name.len()
        );
        return ClassifyResult {
            classification,
            candidates: by_name,
        };
    }

    let exact: Vec<RomId> = by_hash
        .iter()
        .copied()
        .filter(|&id| catalog.rom(id).name == name)
        .collect();

    if exact.is_empty() {
        log::debug!(
            "Found {} entries matching hash {digest}, none named {name}",
            by_hash.len()
        );
        ClassifyResult {
            classification: Classification::HashOnly,
            candidates: by_hash.to_vec(),
        }
    } else {
        log::debug!("Found exact match for hash {digest} and name {name}");
        ClassifyResult {
            classification: Classification::Exact,
            candidates: exact,
        }
    }
}

// ---------------------------------------------------------------------------
// Size diagnostic
// ---------------------------------------------------------------------------

/// Size comparison of a name-matched file against its catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeDiagnostic {
    /// File is larger than the recorded size.
    Overdump { actual: u64, expected: u64 },
    /// File is smaller than the recorded size.
    Underdump { actual: u64, expected: u64 },
}

impl fmt::Display for SizeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, actual, expected) = match *self {
            SizeDiagnostic::Overdump { actual, expected } => ("overdump", actual, expected),
            SizeDiagnostic::Underdump { actual, expected } => ("underdump", actual, expected),
        };
        write!(
            f,
            "(Possible {kind}; size {}, expected {})",
            format_iec(actual),
            format_iec(expected)
        )
    }
}

/// Compare a file's size to the catalog's recorded size.
///
/// Returns `None` when the sizes agree or the catalog records no size.
pub fn size_diagnostic(actual: u64, expected: Option<u64>) -> Option<SizeDiagnostic> {
    let expected = expected?;
    match actual.cmp(&expected) {
        Ordering::Greater => Some(SizeDiagnostic::Overdump { actual, expected }),
        Ordering::Less => Some(SizeDiagnostic::Underdump { actual, expected }),
        Ordering::Equal => None,
    }
}

#[cfg(test)]
#[path = "tests/classify_tests.rs"]
mod tests;
