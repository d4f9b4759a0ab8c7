use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use veloroute_cli::commands::cost::{handle_cost_command, CostArgs};
use veloroute_cli::commands::route::{handle_route_command, RouteArgs};
use veloroute_cli::commands::snap::{handle_snap_command, SnapArgs};
use veloroute_cli::commands::{failure_hint, open_store};
use veloroute_cli::output::{write_failure, LogFormat, OutputFormat};
use veloroute_cli::terminal::ColorPalette;
use veloroute_lib::{Error as LibError, OptimizerConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Preference-weighted bicycle route planning")]
struct Cli {
    /// Road network SQLite database (file or directory containing road_network.db).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Load the road network from a CSV edge list instead of SQLite.
    #[arg(long, global = true, conflicts_with = "db")]
    edges_csv: Option<PathBuf>,

    /// Optimizer configuration file (JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Format of the diagnostic logs written to stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a route between two points.
    Route(RouteArgs),
    /// Show the road node nearest to a point.
    Snap(SnapArgs),
    /// Score a single edge traversal under the given preferences.
    Cost(CostArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report_failure(&error);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = OptimizerConfig::load(cli.config.as_deref())
        .context("failed to load optimizer configuration")?;
    let palette = if cli.format == OutputFormat::Text {
        ColorPalette::detect()
    } else {
        ColorPalette::plain()
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::Route(args) => {
            let store = open_store(cli.db.as_deref(), cli.edges_csv.as_deref())?;
            handle_route_command(store, config, args, cli.format, palette, &mut out)
        }
        Command::Snap(args) => {
            let store = open_store(cli.db.as_deref(), cli.edges_csv.as_deref())?;
            handle_snap_command(store, &config, args, cli.format, palette, &mut out)
        }
        Command::Cost(args) => handle_cost_command(&config, args, cli.format, palette, &mut out),
    }?;
    out.flush().context("failed to flush output")
}

fn report_failure(error: &anyhow::Error) {
    let palette = ColorPalette::detect();
    let (category, hint) = match error.downcast_ref::<LibError>() {
        Some(lib_error) => (lib_error.category(), failure_hint(lib_error)),
        None => ("error", None),
    };

    let stderr = io::stderr();
    let mut err = stderr.lock();
    let _ = write_failure(&mut err, category, &format!("{error:#}"), palette);
    if let Some(hint) = hint {
        let _ = writeln!(err, "{hint}");
    }
}

fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr);

    let _ = match format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };
}
