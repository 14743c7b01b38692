mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::Instrument;

use commands::groups::GroupBy;
use commands::SourceOverrides;
use gl_core::config::Config;
use gl_core::timeline::MAX_RANGE_DAYS;
use gl_telemetry::logging::{self, LogFormat};
use gl_telemetry::tracing_setup;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// growline -- grow-cycle timelines for vertical farms and greenhouses.
#[derive(Parser)]
#[command(name = "growline", version, about)]
struct Cli {
    /// Config file (default: ~/.growline/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read grows from this JSON file instead of the configured source.
    #[arg(long, global = true, conflicts_with = "api_url")]
    file: Option<PathBuf>,

    /// Fetch grows from this API base URL instead of the configured source.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Only show grows on this farm (exact name).
    #[arg(long, global = true)]
    farm: Option<String>,

    /// Emit logs as JSON on stderr.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show grow counts per status (default when no subcommand is given).
    Status,

    /// Lay out grows on the timeline and print bars and ticks.
    Layout {
        /// Zoom level; >= 4 daily ticks, >= 2 every three days, >= 1 weekly, else bi-weekly.
        #[arg(long, value_parser = commands::layout::parse_zoom)]
        zoom: Option<f64>,
        /// Reference date for the "now" marker (YYYY-MM-DD or RFC 3339).
        #[arg(long)]
        date: Option<String>,
        /// Nominal range in days; padding is 10% of this on each side.
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_RANGE_DAYS)))]
        range_days: Option<u32>,
        /// Only lay out grows with this status ("all" for every status).
        #[arg(long, default_value = "all")]
        status: String,
        /// Print the layout as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Group grows by status or by farm / row / rack.
    Groups {
        #[arg(long, value_enum, default_value_t = GroupBy::Status)]
        by: GroupBy,
        #[arg(long)]
        json: bool,
    },

    /// Search grows by text, optionally filtered by status and sorted.
    Search {
        /// Case-insensitive text to look for.
        term: String,
        /// Field to search (repeatable): species, variety, farm, row, rack, shelf, id.
        #[arg(short, long = "field")]
        fields: Vec<String>,
        /// Status filter ("all" or a status name).
        #[arg(long, default_value = "all")]
        status: String,
        /// Sort key: start, end, progress, species, status.
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending.
        #[arg(long)]
        desc: bool,
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as TOML.
    Config {
        /// Write the default config file instead.
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, load_error) = match &cli.config {
        Some(path) => (
            Config::load_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None,
        ),
        None => commands::config::load_with_fallback(&Config::default_path()),
    };

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::from_name(&config.general.log_format)
    };
    logging::init(format, "growline", &config.general.log_level);
    if let Some(e) = load_error {
        tracing::warn!(
            path = %Config::default_path().display(),
            error = %e,
            "failed to load config, using defaults"
        );
    }

    let command = cli.command.unwrap_or(Commands::Status);
    let overrides = SourceOverrides {
        file: cli.file,
        api_url: cli.api_url,
        farm: cli.farm,
    };

    let output = match command {
        Commands::Config { init } => {
            let path = cli.config.unwrap_or_else(Config::default_path);
            commands::config::run(&config, init, &path)?
        }
        command => {
            let (span, trace_id) =
                tracing_setup::create_operation_span(command.name());
            tracing::debug!(%trace_id, "starting command");
            run_with_snapshot(command, &config, &overrides, &trace_id)
                .instrument(span)
                .await?
        }
    };

    print!("{output}");
    Ok(())
}

/// Fetch one snapshot and render the command against it.
async fn run_with_snapshot(
    command: Commands,
    config: &Config,
    overrides: &SourceOverrides,
    trace_id: &str,
) -> anyhow::Result<String> {
    let source = commands::build_source(config, overrides)?;
    let fetch_span = tracing_setup::create_fetch_span(trace_id, &source.describe());
    let snapshot = commands::fetch(source.as_ref(), overrides.farm.as_deref())
        .instrument(fetch_span.clone())
        .await?;
    tracing_setup::record_fetched_items(&fetch_span, snapshot.len());

    match command {
        Commands::Status => commands::status::run(&snapshot, &source.describe()),
        Commands::Layout {
            zoom,
            date,
            range_days,
            status,
            json,
        } => {
            let mut options = config.timeline.options();
            if let Some(days) = range_days {
                options.nominal_range_days = days;
            }
            let args = commands::layout::LayoutArgs {
                zoom: zoom.unwrap_or(config.timeline.default_zoom),
                reference: commands::reference_date(date.as_deref())?,
                options,
                status: status.parse()?,
                json,
            };
            commands::layout::run(&snapshot, &args)
        }
        Commands::Groups { by, json } => commands::groups::run(&snapshot, by, json),
        Commands::Search {
            term,
            fields,
            status,
            sort,
            desc,
            json,
        } => {
            let args = commands::search::SearchArgs::parse(
                &term,
                &fields,
                &status,
                sort.as_deref(),
                desc,
                json,
            )?;
            commands::search::run(&snapshot, &args)
        }
        Commands::Config { .. } => anyhow::bail!("`config` does not read grows"),
    }
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Status => "status",
            Commands::Layout { .. } => "layout",
            Commands::Groups { .. } => "groups",
            Commands::Search { .. } => "search",
            Commands::Config { .. } => "config",
        }
    }
}
