use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romaudit_lib::display::set_lines;
use romaudit_lib::{AuditError, AuditRun, Catalog, HashAlgorithm, SetOrder, audit_paths};

use super::check::stats_line;
use super::{Context, resolve_paths};
use crate::CliError;
use crate::cli_types::HashArgs;

/// Default report name, e.g. `audit_2024-05-01_13:45:10.txt`.
pub(crate) fn default_output_name() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H:%M:%S");
    PathBuf::from(format!("audit_{stamp}.txt"))
}

/// Run the audit command: every set, sorted output, written to a file.
pub(crate) async fn run_audit(
    ctx: &Context,
    output: Option<PathBuf>,
    hash: &HashArgs,
    rename: bool,
) -> Result<(), CliError> {
    let catalog = ctx.load_catalog()?;
    let paths = resolve_paths(Vec::new())?;
    let output = output.unwrap_or_else(default_output_name);

    let mut options = ctx.audit_options(hash);
    options.exclude.insert("txt".to_string());
    options.rename = rename;
    options.seed_all = true;

    let file = File::create(&output).map_err(|e| AuditError::output(&output, e))?;

    log::info!(
        "Auditing {} file(s) against {}",
        paths.len(),
        catalog.name.if_supports_color(Stdout, |t| t.cyan())
    );

    let pb = ctx.progress_bar(paths.len());
    let mut run = audit_paths(catalog.clone(), paths, &options, |result| {
        pb.inc(1);
        pb.set_message(result.path.display().to_string());
    })
    .await;
    pb.finish_and_clear();

    run.results.sort_by(|a, b| a.path.cmp(&b.path));
    write_report(BufWriter::new(file), &catalog, &run, options.algorithm)
        .map_err(|e| AuditError::output(&output, e))?;

    log::info!("{}", stats_line(&run.ledger.counts()));
    log::info!(
        "Audit written to {}",
        output.display().if_supports_color(Stdout, |t| t.cyan())
    );
    Ok(())
}

/// Plain-text report: sorted file lines, then name-sorted set summaries.
pub(crate) fn write_report<W: Write>(
    mut out: W,
    catalog: &Catalog,
    run: &AuditRun,
    algorithm: HashAlgorithm,
) -> std::io::Result<()> {
    writeln!(out, "--FILES--")?;
    for result in &run.results {
        for report in result.reports() {
            writeln!(out, "{report}")?;
        }
    }

    writeln!(out, "--SETS--")?;
    for report in run.ledger.summarize(catalog, SetOrder::Name) {
        for line in set_lines(catalog, &report, algorithm) {
            writeln!(out, "{line}")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", stats_line(&run.ledger.counts()))?;
    out.flush()
}
