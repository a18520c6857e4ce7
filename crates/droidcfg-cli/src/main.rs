// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use droidcfg_app::{App, AppSettings, DocumentStore};
use droidcfg_store::FileStore;
use runtime::FileRuntime;
use std::env;
use std::path::PathBuf;
use time::OffsetDateTime;
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
            "load config {}; run `droid-config --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let document_path = config.document_path()?;
    if options.print_document_path {
        println!("{}", document_path.display());
        return Ok(());
    }

    let store = FileStore::open(&document_path).with_context(|| {
        format!(
            "open document {} -- if this path is wrong, set [storage].document_path or DROIDCFG_DOCUMENT_PATH",
            document_path.display()
        )
    })?;
    if options.check_only {
        store.load()?;
        return Ok(());
    }

    let log_path = match config.log_file() {
        Some(path) => path,
        None => logging::default_log_path()?,
    };
    let _log_guard = logging::init(&log_path, config.log_level())?;
    info!(
        document = %document_path.display(),
        config = %options.config_path.display(),
        "starting droid-config"
    );

    let mut runtime = FileRuntime::new(&store);
    let settings = AppSettings {
        scroll_padding: config.scroll_padding(),
    };
    let mut app = App::from_load(runtime.load(), settings, OffsetDateTime::now_utc());
    droidcfg_tui::run_app(&mut app, &mut runtime)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_document_path: bool,
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
        print_config_path: false,
        print_document_path: false,
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
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_document_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("droid-config: edit custom models in ~/.factory/config.json");
    println!("  --config <path>          Use a specific settings file");
    println!("  --print-config-path      Print resolved settings path");
    println!("  --print-path             Print resolved document path");
    println!("  --print-example-config   Print a settings template");
    println!("  --check                  Validate settings and read the document");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args};
    use anyhow::Result;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/droid-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                print_config_path: false,
                print_document_path: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_reads_config_override_and_flags() -> Result<()> {
        let options = parse_cli_args(
            ["--config", "/etc/droid.toml", "--print-path", "--check"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/etc/droid.toml"));
        assert!(options.print_document_path);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_requires_config_value() {
        let error = parse_cli_args(["--config"], default_options_path())
            .expect_err("missing value should fail");
        assert!(error.to_string().contains("--config requires a file path"));
    }

    #[test]
    fn parse_cli_args_rejects_unknown_flags() {
        let error = parse_cli_args(["--demo"], default_options_path())
            .expect_err("unknown flag should fail");
        assert!(error.to_string().contains("unknown argument \"--demo\""));
    }
}
