use std::env;
use std::process::ExitCode;

use anyhow::{Error, Result};
use clap::Parser;
use mimalloc::MiMalloc;
use tracing::debug;

use quarry::core::Config;
use quarry::ops;
use quarry_ui::Ui;
use quarry_ui::args::VerbositySpec;

use crate::args::QuarryArgs;
use crate::errors::ErrorWithExitCode;

mod args;
mod commands;
mod errors;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    let args = QuarryArgs::parse();

    // Pre-create Ui used in logging and error reporting, because we will move `args` to `cli_main`.
    let ui = Ui::new(args.verbose.clone().into(), args.output_format());

    let _guard = init_logging(args.verbose.clone(), &ui);

    match cli_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => exit_with_error(err, &ui),
    }
}

fn init_logging(verbose: VerbositySpec, ui: &Ui) -> Option<impl Drop> {
    use std::fs;
    use std::path::PathBuf;

    use chrono::Local;
    use tracing_chrome::ChromeLayerBuilder;
    use tracing_subscriber::filter::{EnvFilter, LevelFilter, Targets};
    use tracing_subscriber::fmt::Layer;
    use tracing_subscriber::fmt::time::Uptime;
    use tracing_subscriber::prelude::*;

    let mut guard = None;

    let fmt_layer = Layer::new()
        .with_writer(std::io::stderr)
        .with_ansi(ui.has_colors_enabled_stderr())
        .with_timer(Uptime::default())
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(verbose.as_trace().into())
                .with_env_var("QUARRY_LOG")
                .from_env_lossy(),
        );

    let tracing_profile = env::var("QUARRY_TRACING_PROFILE")
        .ok()
        .map(|var| {
            let s = var.as_str();
            s == "true" || s == "1"
        })
        .unwrap_or(false);

    let profile_file = if tracing_profile {
        let mut path = PathBuf::from(format!(
            "./quarry-profile-{}.json",
            Local::now().to_rfc3339()
        ));
        match fs::File::create(&path) {
            Ok(file) => {
                // Try to canonicalise the path so that it is easier to find the file from logs.
                if let Ok(canonical) = dunce::canonicalize(&path) {
                    path = canonical;
                }
                eprintln!(
                    "this Quarry run will output tracing profile to: {}",
                    path.display()
                );
                eprintln!(
                    "open that file with https://ui.perfetto.dev (or chrome://tracing) to analyze it"
                );
                Some(file)
            }
            Err(err) => {
                eprintln!(
                    "failed to create tracing profile file {}: {err}",
                    path.display()
                );
                None
            }
        }
    } else {
        None
    };

    let profile_layer = profile_file.map(|profile_file| {
        let (profile_layer, profile_layer_guard) = ChromeLayerBuilder::new()
            .writer(profile_file)
            .include_args(true)
            .build();
        guard = Some(profile_layer_guard);
        profile_layer.with_filter(Targets::new().with_default(LevelFilter::TRACE))
    });

    let subscriber = tracing_subscriber::registry()
        .with(fmt_layer)
        .with(profile_layer);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("could not set up global logger");
    }

    guard
}

fn exit_with_error(err: Error, ui: &Ui) -> ExitCode {
    debug!("exit_with_error; err={:?}", err);

    if let Some(ErrorWithExitCode { source, exit_code }) = err.downcast_ref::<ErrorWithExitCode>() {
        if let Some(source_err) = source {
            ui.anyhow(source_err);
        }
        *exit_code
    } else {
        ui.anyhow(&err);
        ExitCode::FAILURE
    }
}

fn cli_main(args: QuarryArgs) -> Result<()> {
    let ui_output_format = args.output_format();
    let quarry_log =
        env::var_os("QUARRY_LOG").unwrap_or_else(|| args.verbose.as_trace().to_string().into());

    let manifest_path = ops::find_manifest_path(args.manifest_path.as_deref())?;

    let config = Config::builder(manifest_path)
        .build_dir_override(args.build_path)
        .deps_dir_override(args.deps_path)
        .ui_verbosity(args.verbose.clone().into())
        .ui_output_format(ui_output_format)
        .log_filter_directive(Some(quarry_log))
        .build()?;

    commands::run(args.command, &config)
}
