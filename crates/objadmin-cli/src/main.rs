//! `objadmin-log` binary: encodes newline-delimited JSON log events.
//!
//! ```text
//! objadmin-log [--config <path>] [input]
//! ```
//!
//! Reads from `input` or stdin and writes encoded events to stdout. Logs go
//! to stderr.

use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;

use objadmin_cli::config::{self, Config};
use objadmin_cli::{run, CliError};
use tracing_subscriber::EnvFilter;

struct Args {
    config_path: Option<String>,
    config_source: &'static str,
    input: Option<String>,
}

fn parse_args() -> Args {
    let mut config_path = None;
    let mut input = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            config_path = args.next().filter(|value| !value.trim().is_empty());
        } else if input.is_none() && arg != "-" {
            input = Some(arg);
        }
    }

    let (config_path, config_source) = match config_path {
        Some(path) => (Some(path), "cli-arg"),
        None => match std::env::var("OBJADMIN_CONFIG_PATH") {
            Ok(path) if !path.trim().is_empty() => (Some(path), "env-var"),
            _ => (Some("objadmin.toml".to_string()), "default"),
        },
    };

    Args {
        config_path,
        config_source,
        input,
    }
}

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
}

fn encode(args: &Args, config: &Config) -> Result<(), CliError> {
    let stdout = io::stdout().lock();
    match &args.input {
        Some(path) => {
            let file = File::open(path)?;
            run(config, BufReader::new(file), stdout)?;
        }
        None => {
            run(config, io::stdin().lock(), stdout)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = parse_args();

    let config = match config::load_config(args.config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("objadmin-log: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    tracing::info!(
        source = args.config_source,
        path = args.config_path.as_deref().unwrap_or("<none>"),
        input = args.input.as_deref().unwrap_or("<stdin>"),
        "resolved startup configuration"
    );

    match encode(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "encoding failed");
            ExitCode::FAILURE
        }
    }
}
