use std::fs;
use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romaudit_lib::{AuditError, audit_paths};
use romaudit_lib::packer::{plan_sets, remove_sources, write_set};

use super::{Context, resolve_paths};
use crate::CliError;
use crate::cli_types::HashArgs;

/// Run the zip command: verify loose files, then pack every complete set.
pub(crate) async fn run_zip(
    ctx: &Context,
    files: Vec<PathBuf>,
    hash: &HashArgs,
    outdir: &Path,
    remove: bool,
) -> Result<(), CliError> {
    let catalog = ctx.load_catalog()?;
    let paths = resolve_paths(files)?;
    let options = ctx.audit_options(hash);

    fs::create_dir_all(outdir).map_err(|e| AuditError::output(outdir, e))?;

    let pb = ctx.progress_bar(paths.len());
    let run = audit_paths(catalog.clone(), paths, &options, |result| {
        pb.inc(1);
        pb.set_message(result.path.display().to_string());
    })
    .await;
    pb.finish_and_clear();

    let plans = plan_sets(&catalog, &run.results);
    if plans.is_empty() {
        log::info!("No complete sets found");
        return Ok(());
    }

    let mut written = Vec::new();
    for plan in &plans {
        log::info!(
            "Creating {} with {} file(s)...",
            plan.archive_name().if_supports_color(Stdout, |t| t.cyan()),
            plan.files.len()
        );
        match write_set(&catalog, plan, outdir) {
            Ok(_) => written.push(plan),
            Err(e) => log::error!("{e}"),
        }
    }
    // Sources may be shared between sets; remove only after every write
    if remove {
        remove_sources(written.iter().copied());
    }

    log::info!(
        "{} of {} set(s) written to {}",
        written.len(),
        plans.len(),
        outdir.display()
    );
    Ok(())
}
