use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use wbi_africa::dashboard::{self, MAP_TITLE, chart_title};
use wbi_africa::{Config, DashboardService, roster, storage, trend, viz};

#[derive(Parser, Debug)]
#[command(
    name = "wbi-africa",
    version,
    about = "Africa digital payments dashboard from World Bank indicators"
)]
struct Cli {
    /// JSON config file (any subset of fields; the rest use defaults).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log at debug level (RUST_LOG still takes precedence).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the roster of countries and their ISO-3 codes.
    Countries,
    /// Build the dashboard for one country (and optionally write the map, chart and data).
    Show(ShowArgs),
    /// Print the latest value for every roster country.
    Snapshot(SnapshotArgs),
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Country ISO-3 code or name (e.g., KEN or "South Africa")
    #[arg(short, long)]
    country: String,
    /// Indicator code (default IT.NET.USER.ZS)
    #[arg(short, long)]
    indicator: Option<String>,
    /// Number of projected years.
    #[arg(long)]
    horizon: Option<u32>,
    /// Treat this as the current year when projecting.
    #[arg(long)]
    year: Option<i32>,
    /// Parallel fetches for the map snapshot.
    #[arg(long)]
    workers: Option<usize>,
    /// Write the choropleth map to this .svg path.
    #[arg(long)]
    map: Option<PathBuf>,
    /// Write the line chart to this .svg path.
    #[arg(long)]
    chart: Option<PathBuf>,
    /// Save data: .json (whole dashboard) or .csv (selected country's series).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Rows of the snapshot table to print.
    #[arg(long, default_value_t = 10)]
    top: usize,
    /// Width of the SVG outputs.
    #[arg(long, default_value_t = viz::DEFAULT_WIDTH)]
    width: u32,
    /// Height of the SVG outputs.
    #[arg(long, default_value_t = viz::DEFAULT_HEIGHT)]
    height: u32,
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    /// Indicator code (default IT.NET.USER.ZS)
    #[arg(short, long)]
    indicator: Option<String>,
    /// Parallel fetches.
    #[arg(long)]
    workers: Option<usize>,
    /// Save the snapshot: .csv or .json
    #[arg(long)]
    out: Option<PathBuf>,
    /// Rows to print.
    #[arg(long, default_value_t = 54)]
    top: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.cmd {
        Command::Countries => cmd_countries(),
        Command::Show(args) => cmd_show(cli.config.as_deref(), args),
        Command::Snapshot(args) => cmd_snapshot(cli.config.as_deref(), args),
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn load_config(
    path: Option<&Path>,
    indicator: Option<String>,
    workers: Option<usize>,
) -> Result<Config> {
    let mut cfg = Config::load(path)?;
    if let Some(ind) = indicator {
        cfg.indicator = ind;
    }
    if let Some(w) = workers {
        cfg.workers = w;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_countries() -> Result<()> {
    for c in roster::all() {
        println!("{}  {}", c.iso3, c.display_name);
    }
    Ok(())
}

fn cmd_show(config: Option<&Path>, args: ShowArgs) -> Result<()> {
    let Some(country) = roster::lookup(&args.country) else {
        bail!(
            "unknown country {:?}; run `wbi-africa countries` for valid codes",
            args.country
        );
    };
    let mut cfg = load_config(config, args.indicator, args.workers)?;
    if let Some(h) = args.horizon {
        cfg.horizon_years = h;
    }
    cfg.validate()?;

    let service = DashboardService::from_config(cfg)?;
    let year = args.year.unwrap_or_else(trend::current_year);
    info!("building dashboard for {} (current year {year})", country.iso3);
    let view = service.view(country, year);

    print!("{}", dashboard::render_text(&view, args.top));

    if let Some(path) = args.map.as_ref() {
        let svg = viz::render_choropleth(&view.snapshot, MAP_TITLE, args.width, args.height)?;
        viz::save_svg(path, &svg)?;
        eprintln!("Wrote map to {}", path.display());
    }
    if let Some(path) = args.chart.as_ref() {
        let svg = viz::render_line_chart(
            &view.series,
            &view.forecast,
            &chart_title(country),
            args.width,
            args.height,
        )?;
        viz::save_svg(path, &svg)?;
        eprintln!("Wrote chart to {}", path.display());
    }
    if let Some(path) = args.out.as_ref() {
        match extension(path).as_str() {
            "json" => storage::save_dashboard_json(&view, path)?,
            "csv" => storage::save_series_csv(&view.series, path)?,
            other => bail!("unsupported output format: {:?} (use .json or .csv)", other),
        }
        eprintln!("Saved dashboard data to {}", path.display());
    }
    Ok(())
}

fn cmd_snapshot(config: Option<&Path>, args: SnapshotArgs) -> Result<()> {
    let cfg = load_config(config, args.indicator, args.workers)?;
    let service = DashboardService::from_config(cfg)?;
    let indicator = service.config().indicator.clone();
    let snapshot = service.fleet().aggregate(&indicator);

    if snapshot.is_empty() {
        println!("{}", dashboard::NO_MAP_DATA);
    } else {
        for (iso3, value) in snapshot.ranked().into_iter().take(args.top) {
            let name = roster::by_iso3(iso3).map(|c| c.display_name).unwrap_or(iso3);
            println!("{iso3}  {name:<34}{:>8}", dashboard::format_percent(value));
        }
        eprintln!(
            "{} of {} countries reporting {indicator}",
            snapshot.len(),
            roster::all().len()
        );
    }

    if let Some(path) = args.out.as_ref() {
        match extension(path).as_str() {
            "csv" => storage::save_snapshot_csv(&snapshot, path)?,
            "json" => {
                let s = serde_json::to_string_pretty(snapshot.as_ref())?;
                std::fs::write(path, s)?;
            }
            other => bail!("unsupported output format: {:?} (use .csv or .json)", other),
        }
        eprintln!("Saved snapshot to {}", path.display());
    }
    Ok(())
}
