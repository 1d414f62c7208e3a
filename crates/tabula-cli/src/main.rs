// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, bail};
use config::Config;
use runtime::{DEMO_SEED, DemoRuntime, FileRuntime};
use std::env;
use std::path::PathBuf;
use tabula_app::AppState;
use tabula_tui::{AppRuntime, UiOptions};
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `tabula --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    logging::init(&config).context("start logging; check [log] file or TABULA_LOG_FILE")?;

    let ui = config.ui_options();
    match (&options.data_path, options.demo) {
        (Some(_), true) => bail!("choose either --data or --demo, not both"),
        (Some(path), false) => {
            info!(path = %path.display(), "opening data file");
            launch(FileRuntime::new(path.clone()), options.check_only, ui)
        }
        (None, true) => {
            info!(seed = DEMO_SEED, "opening demo data");
            launch(DemoRuntime::new(DEMO_SEED), options.check_only, ui)
        }
        (None, false) => {
            bail!("no data source; pass --data <file.json> or --demo (see --help)")
        }
    }
}

fn launch<R: AppRuntime>(mut runtime: R, check_only: bool, ui: UiOptions) -> Result<()> {
    if check_only {
        runtime.load_snapshot()?.validate()?;
        runtime.load_dashboard()?;
        return Ok(());
    }

    let mut state = AppState::default();
    tabula_tui::run_app(&mut state, &mut runtime, ui)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    data_path: Option<PathBuf>,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        data_path: None,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--data" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--data requires a JSON file path"))?;
                options.data_path = Some(PathBuf::from(value.as_ref()));
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("tabula");
    println!("  --data <path>            Browse a JSON table file");
    println!("  --demo                   Browse seeded demo data");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config and data, then exit");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod test_support {
    use std::sync::{Mutex, MutexGuard, OnceLock};

    pub(crate) fn env_lock() -> MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
