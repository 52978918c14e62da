use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romaudit_lib::settings::settings_path;

use super::Context;
use crate::CliError;

/// Show the effective settings and where each value comes from.
pub(crate) fn run_config_show(ctx: &Context) -> Result<(), CliError> {
    let path = settings_path();
    let settings = &ctx.settings;

    log::info!(
        "{}",
        "romaudit settings".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    let source = |set: bool| if set { "(settings)" } else { "(default)" };
    let datfile = match (&ctx.datfile, &settings.datfile) {
        (Some(path), _) => format!("{} (--datfile)", path.display()),
        (None, Some(path)) => format!("{} (settings)", path.display()),
        (None, None) => "not set".to_string(),
    };
    let exclude = if settings.exclude.is_empty() {
        "none".to_string()
    } else {
        settings.exclude.join(", ")
    };

    let fields = [
        ("datfile", datfile),
        (
            "method",
            format!(
                "{} {}",
                settings.method_or_default(),
                source(settings.method.is_some())
            ),
        ),
        (
            "workers",
            format!(
                "{} {}",
                settings.workers_or_default(),
                source(settings.workers.is_some())
            ),
        ),
        ("exclude", exclude),
        (
            "sort_sets",
            format!(
                "{} {}",
                settings.sort_sets_or_default(),
                source(settings.sort_sets.is_some())
            ),
        ),
    ];

    for (name, value) in fields {
        let label = format!("{:<10}", format!("{name}:"));
        log::info!(
            "  {} {value}",
            label.if_supports_color(Stdout, |t| t.bold())
        );
    }

    if path.exists() {
        crate::log_blank();
        match settings.to_toml_string() {
            Ok(text) => {
                for line in text.lines() {
                    log::info!("    {line}");
                }
            }
            Err(e) => return Err(CliError::config(e.to_string())),
        }
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", settings_path().display());
}
