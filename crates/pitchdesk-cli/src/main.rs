//! pitchdesk - command-line harness for the admin dashboard filters.
//!
//! Loads one list (members, teams or matches) from the bundled fallback data
//! or the live backend, applies quick presets and facet selections in the
//! order given, and prints the filtered rows with their facet badge counts.

mod args;
mod render;

use std::io;
use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pitchdesk_core::models::{Domain, Match, Member, Team};
use pitchdesk_core::source::load_from_dir;
use pitchdesk_core::{load_fallback, ApiClient, Config, DataSource, FilterEngine, Filterable};

use args::{CliArgs, Step, USAGE};
use render::ListRow;

/// Directory for a daily rolling log file, in addition to stderr.
const ENV_LOG_DIR: &str = "PITCHDESK_LOG_DIR";

/// Initialize the tracing subscriber for logging
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::env::var(ENV_LOG_DIR) {
        Ok(dir) if !dir.trim().is_empty() => {
            let appender = tracing_appender::rolling::daily(Path::new(&dir), "pitchdesk.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = init_tracing();

    let args = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {:#}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let mut config = Config::load()?;
    if args.init_config {
        config.save()?;
        println!("Wrote {}", Config::config_path()?.display());
        return Ok(());
    }
    if args.live {
        config.use_live_data = true;
    }

    info!(domain = args.domain.as_str(), live = config.use_live_data, "pitchdesk starting");
    match args.domain {
        Domain::Members => run::<Member>(&config, &args).await,
        Domain::Teams => run::<Team>(&config, &args).await,
        Domain::Matches => run::<Match>(&config, &args).await,
    }
}

async fn run<R>(config: &Config, args: &CliArgs) -> Result<()>
where
    R: Filterable + ListRow + DeserializeOwned + Serialize,
{
    if args.list {
        render::print_catalog::<R>();
        return Ok(());
    }

    let fallback = match config.fallback_dir {
        Some(ref dir) => load_from_dir::<R>(dir)?,
        None => load_fallback::<R>()?,
    };
    let mut source = DataSource::new(fallback);

    if config.use_live_data {
        let client = ApiClient::new(config)?;
        source.refresh(&client, 0, config.page_size).await;
        if let Some(reason) = source.last_error() {
            warn!(domain = R::DOMAIN.as_str(), "Showing fallback data");
            eprintln!("Live data unavailable, showing fallback data: {}", reason);
        }
    }

    let mut engine = FilterEngine::<R>::new(config.clock());
    for step in &args.steps {
        apply_step(&mut engine, step)?;
    }

    let records = source.records();
    let output = engine.snapshot(records);

    if args.json {
        let body = serde_json::json!({
            "domain": R::DOMAIN,
            "source": source.kind().as_str(),
            "liveCount": source.live_len(),
            "fallbackCount": source.fallback_len(),
            "fetched": source.fetched_age(Utc::now()),
            "filters": engine.state(),
            "activeFilterCount": engine.active_filter_count(),
            "activePreset": output.active_preset,
            "total": records.len(),
            "filtered": output.filtered,
            "counts": output.counts,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        render::print_result(&output, &source, engine.state());
    }

    Ok(())
}

fn apply_step<R: Filterable>(engine: &mut FilterEngine<R>, step: &Step) -> Result<()> {
    match step {
        Step::Preset(id) => engine.apply_preset(id)?,
        Step::Facet { id, value } => engine.set_facet(id, value)?,
        Step::Search(query) => engine.set_search(query.as_str()),
        Step::Date(range) => engine.set_date_range(*range),
        Step::From(date) => engine.set_date_from(Some(*date)),
        Step::To(date) => engine.set_date_to(Some(*date)),
    }
    Ok(())
}
