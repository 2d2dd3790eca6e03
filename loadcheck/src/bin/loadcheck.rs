//! Checks load test summaries against performance thresholds.

use std::{
    env,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, error::ErrorKind};
use loadcheck::{
    config::{self, Config},
    evaluate,
    report::Report,
};
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// path on disk to a YAML file overriding the default thresholds
    #[clap(long)]
    config_path: Option<PathBuf>,

    /// disable colored output
    #[clap(long)]
    no_color: bool,

    /// paths to load test summary files, for example results-*.json
    #[clap(required = true)]
    result_paths: Vec<PathBuf>,
}

#[derive(thiserror::Error, Debug)]
enum Error {
    #[error("Failed to load thresholds: {0}")]
    Config(#[from] config::Error),
    #[error("Failed to write report: {0}")]
    Io(#[from] io::Error),
}

fn load_config(config_path: Option<&Path>) -> Result<Config, config::Error> {
    if let Ok(env_var_value) = env::var("LOADCHECK_CONFIG") {
        debug!("Using config from env var 'LOADCHECK_CONFIG'");
        env_var_value.parse()
    } else if let Some(path) = config_path {
        debug!(
            "Attempting to open configuration file at: {}",
            path.display()
        );
        Config::from_path(path)
    } else {
        Ok(Config::default())
    }
}

fn color_enabled(no_color: bool) -> bool {
    !no_color && env::var_os("NO_COLOR").is_none_or(|value| value.is_empty())
}

fn run(args: &Args) -> Result<bool, Error> {
    let config = load_config(args.config_path.as_deref())?;
    let table = config.threshold_table()?;

    let mut report = Report::new(io::stdout().lock(), color_enabled(args.no_color));
    let passed = evaluate::run(&args.result_paths, &table, &mut report)?;
    report.into_inner().flush()?;
    Ok(passed)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_ansi(false)
        .finish()
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        // Usage errors exit 1, not clap's default of 2.
        Err(err) => {
            if let Err(print_err) = err.print() {
                error!("Failed to print usage: {print_err}");
            }
            return ExitCode::FAILURE;
        }
    };

    let version = env!("CARGO_PKG_VERSION");
    info!("Starting loadcheck {version} over {} files.", args.result_paths.len());

    match run(&args) {
        Ok(true) => {
            info!("Bye. :)");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            info!("Thresholds not met. Bye.");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_accept_many_paths() {
        let args = Args::try_parse_from(["loadcheck", "results-a.json", "results-b.json"])
            .expect("valid arguments");
        assert_eq!(
            args.result_paths,
            vec![PathBuf::from("results-a.json"), PathBuf::from("results-b.json")]
        );
        assert!(args.config_path.is_none());
        assert!(!args.no_color);
    }

    #[test]
    fn args_require_a_path() {
        let err = Args::try_parse_from(["loadcheck"]).expect_err("paths are required");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn args_accept_options() {
        let args = Args::try_parse_from([
            "loadcheck",
            "--no-color",
            "--config-path",
            "loadcheck.yaml",
            "results.json",
        ])
        .expect("valid arguments");
        assert!(args.no_color);
        assert_eq!(args.config_path, Some(PathBuf::from("loadcheck.yaml")));
    }

    #[test]
    fn no_color_flag_disables_color() {
        assert!(!color_enabled(true));
    }
}
