pub(crate) mod audit;
pub(crate) mod check;
pub(crate) mod config;
pub(crate) mod lookup;
pub(crate) mod zip;

use std::path::PathBuf;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romaudit_lib::util::{files_in_directory, normalize_extensions};
use romaudit_lib::{AuditOptions, Catalog, FileReport, Settings, Status};

use crate::CliError;
use crate::cli_types::HashArgs;

/// State every command needs: merged settings and the global flags.
pub(crate) struct Context {
    pub settings: Settings,
    pub datfile: Option<PathBuf>,
    pub quiet: bool,
}

impl Context {
    /// Load the catalog named by `--datfile` or the settings file.
    pub(crate) fn load_catalog(&self) -> Result<Arc<Catalog>, CliError> {
        let path = self
            .datfile
            .clone()
            .or_else(|| self.settings.datfile.clone())
            .ok_or_else(|| {
                CliError::config("no DAT file given; pass --datfile or set datfile in settings.toml")
            })?;

        log::debug!("Loading catalog from {}", path.display());
        let catalog = Catalog::load(&path).map_err(|e| CliError::dat(&path, e))?;
        log::debug!(
            "{} games, {} roms",
            catalog.game_count(),
            catalog.rom_count()
        );
        Ok(Arc::new(catalog))
    }

    /// Audit options from command flags, falling back to settings.
    pub(crate) fn audit_options(&self, hash: &HashArgs) -> AuditOptions {
        let exclude = normalize_extensions(
            self.settings
                .exclude
                .iter()
                .chain(hash.exclude.iter()),
        );
        AuditOptions {
            algorithm: hash
                .method
                .unwrap_or_else(|| self.settings.method_or_default()),
            workers: hash
                .workers
                .unwrap_or_else(|| self.settings.workers_or_default()),
            exclude,
            ..Default::default()
        }
    }

    /// Progress bar counting processed paths; hidden with `--quiet`.
    pub(crate) fn progress_bar(&self, total: usize) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total as u64);
        if let Ok(style) =
            ProgressStyle::with_template("  {spinner:.cyan} [{pos}/{len}] {wide_msg}")
        {
            pb.set_style(style.tick_chars("/-\\|"));
        }
        pb
    }
}

/// Given paths, or every regular non-dot file in the current directory.
pub(crate) fn resolve_paths(files: Vec<PathBuf>) -> Result<Vec<PathBuf>, CliError> {
    if !files.is_empty() {
        return Ok(files);
    }
    let cwd = std::env::current_dir()?;
    let files = files_in_directory(&cwd)?;
    log::debug!("{} file(s) in {}", files.len(), cwd.display());
    Ok(files)
}

/// Status tag colored for the terminal.
pub(crate) fn colored_tag(status: Status) -> String {
    let tag = status.tag();
    match status {
        Status::Ok => tag.if_supports_color(Stdout, |t| t.green()).to_string(),
        Status::Warn => tag.if_supports_color(Stdout, |t| t.yellow()).to_string(),
        Status::Bad | Status::Miss => tag.if_supports_color(Stdout, |t| t.red()).to_string(),
        Status::Unk => tag.if_supports_color(Stdout, |t| t.dimmed()).to_string(),
    }
}

/// A per-file report line with a colored tag.
pub(crate) fn colored_file_line(report: &FileReport) -> String {
    format!("{} {}", colored_tag(report.status), report.body())
}

/// Print a section heading such as `--FILES--`.
pub(crate) fn section(title: &str) {
    log::info!("{}", title.if_supports_color(Stdout, |t| t.bold()));
}
