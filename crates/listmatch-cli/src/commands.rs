use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{info, info_span, trace};

use listmatch_cli::logging::redact_value;
use listmatch_cli::render::{demos_table, print_result, result_json, strategies_table};
use listmatch_ingest::{IngestOptions, load_config_or_default, read_list_file};
use listmatch_map::{MatchEngine, MatchSession};
use listmatch_model::{AppConfig, ListSide, MatchResult, ScoreBands};

use crate::cli::{ConfigArgs, DemoArgs, MatchArgs, OutputFormatArg, RunArgs};

pub fn run_match(args: &MatchArgs) -> Result<()> {
    let config = load_config(&args.config);
    let options = args.run.resolve(config.match_options());
    let ingest = IngestOptions {
        delimiter: args.delimiter.map(delimiter_byte).transpose()?,
    };

    let list_a = read_list(&args.list_a, ListSide::Source, ingest)?;
    let list_b = read_list(&args.list_b, ListSide::Target, ingest)?;

    let mut session = MatchSession::with_lists(list_a, list_b);
    for (source, target) in args.lock_pairs() {
        session
            .add_lock(source, target)
            .context("invalid --lock")?;
    }

    let result = session.run(&MatchEngine::with_defaults(), &options)?;
    emit(&result, &args.run)
}

pub fn run_demos(args: &ConfigArgs) -> Result<()> {
    let config = load_config(args);
    if config.demos.is_empty() {
        println!("No demos configured in {}.", args.config.display());
        return Ok(());
    }
    println!("{}", demos_table(&config.demos));
    Ok(())
}

pub fn run_demo(args: &DemoArgs) -> Result<()> {
    let config = load_config(&args.config);
    let demo = config.demo(args.index).ok_or_else(|| {
        anyhow!(
            "no demo at index {} ({} configured)",
            args.index,
            config.demos.len()
        )
    })?;
    let span = info_span!("demo", index = args.index, title = %demo.title);
    let _guard = span.enter();

    let session = MatchSession::from_demo(demo)
        .with_context(|| format!("demo '{}' has invalid locks", demo.title))?;
    let options = args.run.resolve(config.match_options());
    let result = session.run(&MatchEngine::with_defaults(), &options)?;
    emit(&result, &args.run)
}

pub fn run_strategies() -> Result<()> {
    println!("{}", strategies_table());
    Ok(())
}

fn load_config(args: &ConfigArgs) -> AppConfig {
    load_config_or_default(&args.config)
}

fn read_list(path: &Path, side: ListSide, options: IngestOptions) -> Result<Vec<String>> {
    let items = read_list_file(path, options)
        .with_context(|| format!("read {side} from {}", path.display()))?;
    info!(%side, path = %path.display(), items = items.len(), "loaded list");
    Ok(items)
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character, got '{delimiter}'");
    }
    Ok(delimiter as u8)
}

fn emit(result: &MatchResult, run: &RunArgs) -> Result<()> {
    for m in &result.matches {
        trace!(
            source = redact_value(&m.source),
            target = redact_value(&m.target),
            score = m.score,
            manual = m.is_manual,
            "match"
        );
    }
    match run.format {
        OutputFormatArg::Table => print_result(result, &ScoreBands::default()),
        OutputFormatArg::Json => {
            println!("{}", result_json(result).context("serialize result")?);
        }
    }
    Ok(())
}
