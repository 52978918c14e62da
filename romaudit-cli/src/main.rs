//! romaudit CLI
//!
//! Command-line interface for auditing ROM files and archives against DAT
//! catalogs.

mod cli_types;
mod commands;
mod error;
mod logging;

use clap::Parser;

use romaudit_lib::Settings;

use cli_types::{Cli, Commands, ConfigAction};
use commands::Context;
use commands::check::CheckFlags;
pub(crate) use error::CliError;
pub(crate) use logging::log_blank;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Unable to set up logging: {e}");
        std::process::exit(1);
    }

    let result = run(cli);
    if let Err(e) = &result {
        log::error!("{e}");
    }
    log::logger().flush();
    if result.is_err() {
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = Context {
        settings: Settings::load(),
        datfile: cli.datfile,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Check {
            files,
            hash,
            rename,
            allsets,
            sort,
            show,
            sort_files,
        } => {
            let flags = CheckFlags {
                rename,
                allsets,
                sort,
                show,
                sort_files,
            };
            block_on(commands::check::run_check(&ctx, files, &hash, flags))
        }
        Commands::Audit {
            output,
            hash,
            rename,
        } => block_on(commands::audit::run_audit(&ctx, output, &hash, rename)),
        Commands::Lookup {
            keys,
            mode,
            key,
            exact,
        } => commands::lookup::run_lookup(&ctx, &keys, mode, key, exact),
        Commands::Zip {
            files,
            hash,
            outdir,
            remove,
        } => block_on(commands::zip::run_zip(&ctx, files, &hash, &outdir, remove)),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&ctx),
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
        },
    }
}

/// Drive an async command to completion on a multi-threaded runtime.
fn block_on<F>(future: F) -> Result<(), CliError>
where
    F: Future<Output = Result<(), CliError>>,
{
    let rt = tokio::runtime::Runtime::new().map_err(|e| CliError::runtime(e.to_string()))?;
    rt.block_on(future)
}
