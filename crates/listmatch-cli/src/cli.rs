//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use listmatch_model::MatchOptions;

#[derive(Parser)]
#[command(
    name = "listmatch",
    version,
    about = "Match two lists of labels into the best one-to-one pairing",
    long_about = "Match two lists of labels into the best one-to-one pairing.\n\n\
                  Items are scored with a fuzzy similarity strategy and paired so the\n\
                  total score is as high as possible. Locked pairs are always kept."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow item labels to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Match the first columns of two files.
    Match(MatchArgs),

    /// List the demo presets of the configuration.
    Demos(ConfigArgs),

    /// Run a demo preset.
    Demo(DemoArgs),

    /// List the similarity strategies.
    Strategies,
}

#[derive(Args)]
pub struct MatchArgs {
    /// File whose first column holds list A.
    #[arg(long = "list-a", value_name = "PATH")]
    pub list_a: PathBuf,

    /// File whose first column holds list B.
    #[arg(long = "list-b", value_name = "PATH")]
    pub list_b: PathBuf,

    /// Force a pair (repeatable). Both items must be present in their list.
    #[arg(
        long = "lock",
        num_args = 2,
        value_names = ["SOURCE", "TARGET"],
        action = clap::ArgAction::Append
    )]
    pub locks: Vec<String>,

    /// Field delimiter of both files (detected when omitted).
    #[arg(long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl MatchArgs {
    /// `--lock` values as `(source, target)` pairs.
    pub fn lock_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.locks
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }
}

#[derive(Args)]
pub struct DemoArgs {
    /// Position of the preset, as shown by `listmatch demos`.
    #[arg(value_name = "INDEX")]
    pub index: usize,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration document (JSON, or TOML with a .toml extension).
    #[arg(long = "config", value_name = "PATH", default_value = "config.json")]
    pub config: PathBuf,
}

/// Options shared by every command that runs a match.
#[derive(Args)]
pub struct RunArgs {
    /// Similarity strategy (see `listmatch strategies`).
    #[arg(long = "ratio", value_name = "NAME")]
    pub ratio: Option<String>,

    /// Minimum score for automatic matches.
    #[arg(
        long = "threshold",
        value_name = "N",
        conflicts_with = "no_threshold",
        value_parser = parse_threshold
    )]
    pub threshold: Option<f64>,

    /// Keep every automatic match regardless of score.
    #[arg(long = "no-threshold")]
    pub no_threshold: bool,

    /// Result output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

impl RunArgs {
    /// Applies the flags on top of the configured defaults.
    pub fn resolve(&self, defaults: MatchOptions) -> MatchOptions {
        let mut options = defaults;
        if let Some(ratio) = &self.ratio {
            options.ratio.clone_from(ratio);
        }
        if self.no_threshold {
            options.threshold = None;
        } else if let Some(threshold) = self.threshold {
            options.threshold = Some(threshold);
        }
        options
    }
}

fn parse_threshold(raw: &str) -> Result<f64, String> {
    let threshold: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if threshold.is_finite() {
        Ok(threshold)
    } else {
        Err(format!("{raw} is not a finite number"))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_locks() {
        let cli = Cli::try_parse_from([
            "listmatch", "match", "--list-a", "a.csv", "--list-b", "b.csv", "--lock", "X", "Z",
            "--lock", "Y", "W",
        ])
        .unwrap();
        let Command::Match(args) = cli.command else {
            panic!("expected match command");
        };
        assert_eq!(
            args.lock_pairs().collect::<Vec<_>>(),
            vec![("X", "Z"), ("Y", "W")]
        );
        assert_eq!(args.config.config, PathBuf::from("config.json"));
    }

    #[test]
    fn flags_override_configured_defaults() {
        let cli = Cli::try_parse_from([
            "listmatch",
            "demo",
            "0",
            "--ratio",
            "ratio",
            "--no-threshold",
        ])
        .unwrap();
        let Command::Demo(args) = cli.command else {
            panic!("expected demo command");
        };
        let options = args.run.resolve(MatchOptions::default());
        assert_eq!(options, MatchOptions::unfiltered().with_ratio("ratio"));

        let cli = Cli::try_parse_from(["listmatch", "demo", "1", "--threshold", "75"]).unwrap();
        let Command::Demo(args) = cli.command else {
            panic!("expected demo command");
        };
        assert_eq!(args.index, 1);
        let options = args.run.resolve(MatchOptions::unfiltered());
        assert_eq!(options.threshold, Some(75.0));
    }

    #[test]
    fn non_finite_threshold_is_rejected() {
        for raw in ["NaN", "inf", "-inf", "high"] {
            let parsed = Cli::try_parse_from(["listmatch", "demo", "0", "--threshold", raw]);
            assert!(parsed.is_err(), "{raw}");
        }
        let cli = Cli::try_parse_from(["listmatch", "demo", "0", "--threshold", "0.5"]).unwrap();
        let Command::Demo(args) = cli.command else {
            panic!("expected demo command");
        };
        assert_eq!(args.run.threshold, Some(0.5));
    }

    #[test]
    fn threshold_flags_conflict() {
        let parsed = Cli::try_parse_from([
            "listmatch",
            "demo",
            "0",
            "--threshold",
            "5",
            "--no-threshold",
        ]);
        assert!(parsed.is_err());
    }
}
