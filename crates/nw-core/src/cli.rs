//! Text command front-end.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nw_common::{Error, OutputFormat};
use nw_report::{Grouping, LogReport};
use nw_store::{append_sample, load_log};
use tracing::error;

use crate::config::{default_log_path, WatchConfig};
use crate::exit_codes::ExitCode;
use crate::probe::latency::DEFAULT_HOST;
use crate::sampler::Sampler;
use crate::scheduler::{run_loop, CancelFlag, RunOutcome, Schedule};

/// Periodic network latency/throughput watcher with a durable CSV log.
#[derive(Debug, Parser)]
#[command(name = "netwatch", version, about)]
pub struct Cli {
    /// Host to ping for the latency check.
    #[arg(long, global = true, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Path of the CSV measurement log.
    #[arg(long, global = true, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Measure once and append to the log.
    Once,
    /// Measure repeatedly on a fixed interval until ctrl-c or --count.
    Watch {
        /// Seconds between consecutive measurements.
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
        interval: i64,

        /// Number of measurements to take; unbounded when omitted.
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
        count: Option<i64>,
    },
    /// Summarize the log: aggregate and grouped descriptive statistics.
    Report {
        /// Which groupings to include.
        #[arg(long, value_enum, default_value_t = Grouping::All)]
        group: Grouping,

        /// Rendering format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

impl Cli {
    fn config(&self) -> WatchConfig {
        let mut config = WatchConfig {
            host: self.host.clone(),
            output: self.output.clone().unwrap_or_else(default_log_path),
            ..Default::default()
        };
        if let Command::Watch { interval, count } = self.command {
            config.interval_secs = interval;
            config.count = count;
            config.repeat = true;
        }
        config
    }
}

/// Dispatch a parsed command line. `cancel` is the flag the signal
/// handler sets.
pub fn run(cli: &Cli, cancel: &CancelFlag) -> ExitCode {
    let config = cli.config();
    if let Err(e) = config.validate() {
        error!(error = %e, "invalid configuration");
        eprintln!("error: {e}");
        return ExitCode::ConfigError;
    }

    match &cli.command {
        Command::Once => run_once(&config),
        Command::Watch { .. } => run_watch(&config, cancel),
        Command::Report { group, format } => run_report(&config, *group, *format),
    }
}

fn run_once(config: &WatchConfig) -> ExitCode {
    println!("measuring (ping target: {}) ...", config.host);
    let sample = Sampler::new(&config.host).compose();

    match append_sample(&config.output, &sample) {
        Ok(()) => {
            println!("logged to {}: {}", config.output.display(), sample);
            ExitCode::Clean
        }
        Err(e) => {
            error!(error = %e, "failed to append sample");
            eprintln!("error: {e}");
            ExitCode::IoError
        }
    }
}

fn run_watch(config: &WatchConfig, cancel: &CancelFlag) -> ExitCode {
    let schedule = match Schedule::new(config.interval_secs, config.count) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::ConfigError;
        }
    };

    let sampler = Sampler::new(&config.host);
    let output = config.output.clone();
    let total = schedule.count();

    let outcome = run_loop(schedule, cancel, |run| {
        let sample = sampler.compose();
        append_sample(&output, &sample).map_err(|e| Error::Store(e.to_string()))?;
        match total {
            Some(n) => println!("[{run}/{n}] {sample}"),
            None => println!("[{run}] {sample}"),
        }
        Ok(())
    });

    match outcome {
        RunOutcome::Completed { runs } => {
            println!("finished: {runs} measurement(s)");
            ExitCode::Clean
        }
        RunOutcome::Cancelled { runs } => {
            println!("cancelled after {runs} measurement(s)");
            ExitCode::Interrupted
        }
    }
}

fn run_report(config: &WatchConfig, group: Grouping, format: OutputFormat) -> ExitCode {
    let table = match load_log(&config.output) {
        Ok(Some(table)) => table,
        Ok(None) => {
            println!("{}: no data to report", config.output.display());
            return ExitCode::Clean;
        }
        Err(e) => {
            error!(error = %e, "failed to load log");
            eprintln!("error: {e}");
            return ExitCode::IoError;
        }
    };

    let report = LogReport::from_table(&table, group);
    match format {
        OutputFormat::Text => {
            print!("{}", report.render_text());
            ExitCode::Clean
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => {
                println!("{json}");
                ExitCode::Clean
            }
            Err(e) => {
                error!(error = %e, "failed to serialize report");
                eprintln!("error: {e}");
                ExitCode::InternalError
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_watch_count_reaches_config() {
        let cli = Cli::parse_from(["netwatch", "watch", "--interval", "300", "--count", "4"]);
        let config = cli.config();
        assert_eq!(config.interval_secs, 300);
        assert_eq!(config.count, Some(4));
        assert!(config.repeat);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_once_uses_defaults() {
        let cli = Cli::parse_from(["netwatch", "once"]);
        let config = cli.config();
        assert_eq!(config.host, DEFAULT_HOST);
        assert!(!config.repeat);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_global_options_apply_to_subcommands() {
        let cli = Cli::parse_from([
            "netwatch", "report", "--host", "1.1.1.1", "--output", "/tmp/x.csv",
        ]);
        let config = cli.config();
        assert_eq!(config.host, "1.1.1.1");
        assert_eq!(config.output, PathBuf::from("/tmp/x.csv"));
    }

    #[test]
    fn test_zero_interval_rejected_by_parser() {
        let result = Cli::try_parse_from(["netwatch", "watch", "--interval", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_count_rejected_by_parser() {
        let result =
            Cli::try_parse_from(["netwatch", "watch", "--interval", "60", "--count", "0"]);
        assert!(result.is_err());
    }
}
