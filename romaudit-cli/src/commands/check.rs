use std::path::PathBuf;

use romaudit_lib::display::{missing_entry_line, set_header, set_status};
use romaudit_lib::{
    AuditSummary, Catalog, Completion, HashAlgorithm, Ledger, PathResult, SetOrder, audit_paths,
};

use super::{Context, colored_file_line, colored_tag, resolve_paths, section};
use crate::CliError;
use crate::cli_types::{HashArgs, Show};

/// Flags specific to `check`.
pub(crate) struct CheckFlags {
    pub rename: bool,
    pub allsets: bool,
    pub sort: bool,
    pub show: Show,
    pub sort_files: bool,
}

/// Run the check command.
pub(crate) async fn run_check(
    ctx: &Context,
    files: Vec<PathBuf>,
    hash: &HashArgs,
    flags: CheckFlags,
) -> Result<(), CliError> {
    let catalog = ctx.load_catalog()?;
    let paths = resolve_paths(files)?;

    let mut options = ctx.audit_options(hash);
    options.rename = flags.rename;
    options.seed_all = flags.allsets;
    let order = if flags.sort || ctx.settings.sort_sets_or_default() {
        SetOrder::Name
    } else {
        SetOrder::Datfile
    };

    log::debug!(
        "Checking {} path(s) with {} workers using {}",
        paths.len(),
        options.workers,
        options.algorithm
    );

    let print_files = flags.show.files();
    let streaming = print_files && !flags.sort_files;
    if print_files {
        section("--FILES--");
    }

    let pb = ctx.progress_bar(paths.len());
    let mut run = audit_paths(catalog.clone(), paths, &options, |result| {
        pb.inc(1);
        pb.set_message(result.path.display().to_string());
        if streaming {
            pb.suspend(|| print_file_lines(result));
        }
    })
    .await;
    pb.finish_and_clear();

    if print_files && flags.sort_files {
        run.results.sort_by(|a, b| a.path.cmp(&b.path));
        for result in &run.results {
            print_file_lines(result);
        }
    }

    if flags.show.sets() {
        section("--SETS--");
        print_sets(&catalog, &run.ledger, order, options.algorithm);
    }

    crate::log_blank();
    log::info!("{}", stats_line(&run.ledger.counts()));
    Ok(())
}

fn print_file_lines(result: &PathResult) {
    for report in result.reports() {
        log::info!("{}", colored_file_line(report));
    }
}

fn print_sets(catalog: &Catalog, ledger: &Ledger, order: SetOrder, algorithm: HashAlgorithm) {
    for report in ledger.summarize(catalog, order) {
        log::info!(
            "{}  {}",
            colored_tag(set_status(report.completion)),
            set_header(&report)
        );
        if report.completion == Completion::Partial {
            for &rom in &report.missing {
                log::info!("{}", missing_entry_line(catalog, rom, algorithm));
            }
        }
    }
}

/// Final statistics line, e.g. `complete: 3, partial: 1, missing: 0`.
pub(crate) fn stats_line(summary: &AuditSummary) -> String {
    format!(
        "complete: {}, partial: {}, missing: {}",
        summary.complete, summary.partial, summary.missing
    )
}
