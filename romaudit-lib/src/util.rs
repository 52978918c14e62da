use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

const IEC_UNITS: [&str; 8] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB"];

/// Format a byte count with IEC binary prefixes and two decimals
/// (e.g., "10.00B", "1.50KiB", "4.00MiB").
pub fn format_iec(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in &IEC_UNITS[..IEC_UNITS.len() - 1] {
        if value < 1024.0 {
            return format!("{value:.2}{unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.2}{}", IEC_UNITS[IEC_UNITS.len() - 1])
}

/// Lowercased extension of a file name, without the leading dot.
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

/// Normalize user-supplied extensions (`".ZIP"`, `"txt"`) into the form
/// [`is_excluded`] compares against.
pub fn normalize_extensions<I, S>(exts: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    exts.into_iter()
        .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Whether a file name carries one of the excluded extensions.
pub fn is_excluded(name: &str, exclude: &HashSet<String>) -> bool {
    extension_of(name).is_some_and(|ext| exclude.contains(&ext))
}

/// Whether a path names a zip archive.
pub fn is_zip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Base name of a path as a display string.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Regular, non-hidden files directly inside `dir`, sorted by name.
pub fn files_in_directory(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        // Follows symlinks, so a link to a regular file counts
        match std::fs::metadata(entry.path()) {
            Ok(meta) if meta.is_file() => files.push(entry.path()),
            _ => {}
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
#[path = "tests/util_tests.rs"]
mod tests;
