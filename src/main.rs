use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use fwa_dashboard::config::{parse_baseline, DASHBOARD_FILE};
use fwa_dashboard::{pipeline, DashboardConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fwa-dashboard")]
#[command(author, version, about = "Build the FWA executive tracking dashboard from hit exports")]
struct Args {
    /// Directory holding the CSV exports, Whitepapers/ and visuals/ [env: DATA_DIR]
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Prefix for whitepaper links when hosted under a subpath [env: BASE_PATH]
    #[arg(long)]
    base_path: Option<String>,

    /// Extra directory to receive a copy of the dashboard and assets [env: OUTPUT_DIR]
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Provider-level export file name [env: PROVIDER_HITS_FILE]
    #[arg(long)]
    provider_file: Option<String>,

    /// Leave out the delivery cadence table, line charts and timelines
    #[arg(long)]
    no_extended: bool,

    /// Day zero for cadence offsets, YYYY-MM-DD [env: CADENCE_BASELINE]
    #[arg(long, value_parser = parse_date_arg)]
    baseline: Option<NaiveDate>,

    /// Fixed upper bound of the overpayment-over-time y axis
    #[arg(long)]
    y_ceiling: Option<f64>,

    /// Date printed in the "As of" line, YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse_date_arg)]
    as_of: Option<NaiveDate>,

    /// Open the dashboard in the default browser when done
    #[arg(long)]
    open: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Don't print the written paths
    #[arg(short, long)]
    quiet: bool,
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_baseline(value).map_err(|e| e.to_string())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    info!("Building dashboard from {}", config.data_dir.display());

    let written = pipeline::run(&config).context("dashboard generation failed")?;

    if !args.quiet {
        let paths: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
        println!("Wrote dashboard to: {}", paths.join(", "));
    }

    if args.open {
        let root = config.data_dir.join(DASHBOARD_FILE);
        if let Err(e) = open::that(&root) {
            eprintln!("Failed to open dashboard: {}", e);
        }
    }

    Ok(())
}

/// Environment first, then CLI flags on top.
fn build_config(args: &Args) -> anyhow::Result<DashboardConfig> {
    let mut config = DashboardConfig::from_env().context("invalid environment configuration")?;

    if let Some(ref dir) = args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(ref base) = args.base_path {
        config.set_base_path(base);
    }
    if let Some(ref out) = args.output_dir {
        config.output_dir = Some(out.clone());
    }
    if let Some(ref file) = args.provider_file {
        config.inputs.provider_hits = file.clone();
    }
    if args.no_extended {
        config.extended = false;
    }
    if let Some(baseline) = args.baseline {
        config.baseline = baseline;
    }
    if let Some(ceiling) = args.y_ceiling {
        anyhow::ensure!(ceiling > 0.0, "--y-ceiling must be positive");
        config.charts.y_ceiling = ceiling;
    }
    if let Some(as_of) = args.as_of {
        config.as_of = as_of;
    }

    Ok(config)
}
