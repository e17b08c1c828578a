use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use hourstamp::{dimension, logging, scale, timefmt, tooltip, window};

const AFTER_HELP: &str = "\
Slider labels count hours since 1950-01-01T00:00:00Z.

Examples:
  hourstamp convert 0 328728
  hourstamp invert 1987-07-03T00:00:00.000Z
  hourstamp tooltip --document page.json
  hourstamp scale --window 2024 --current 2024-06-01
  hourstamp scale --from 2024-01-01 --to 2024-03-31 --available 2024-01-01/2024-03-31/P1D
  hourstamp times 2024-01-01T00:00:00Z/2024-01-02T00:00:00Z/PT6H --near 2024-01-01T10:00:00Z
  hourstamp times 2024-01-01T00:00:00Z/2024-01-02T00:00:00Z/PT6H --near-hours 648678";

#[derive(Parser)]
#[command(name = "hourstamp", after_help = AFTER_HELP)]
#[command(about = "Slider hour labels to ISO-8601 timestamps", long_about = None)]
struct Cli {
    /// Write logs to <DIR>/hourstamp.log instead of stderr (or set HOURSTAMP_LOG_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert slider labels (hours since 1950) to ISO-8601 timestamps
    Convert {
        #[arg(required = true, allow_hyphen_values = true)]
        labels: Vec<String>,
    },
    /// Convert ISO-8601 instants back to slider hours
    Invert {
        #[arg(required = true)]
        instants: Vec<String>,
    },
    /// Rewrite the tooltip label inside a JSON document (selector -> text)
    Tooltip {
        /// JSON object file mapping selectors to their text
        #[arg(long)]
        document: PathBuf,

        #[arg(long, default_value = tooltip::TOOLTIP_SELECTOR)]
        selector: String,

        /// Where to write the updated document (defaults to rewriting it in place)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the slider scale (range, step, marks) as JSON
    ///
    /// Covers a window key, or --from/--to (default: one month either side of today).
    Scale {
        /// Window key: 2024, 2024-03, 2024-W12 or 2024-03-15
        #[arg(long, conflicts_with_all = ["from", "to"])]
        window: Option<String>,

        /// First day of the range
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day of the range
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Initial slider position (defaults to today, clamped into the range)
        #[arg(long)]
        current: Option<NaiveDate>,

        /// Advertised time values; the initial position snaps to the closest one
        #[arg(long, num_args = 1..)]
        available: Vec<String>,
    },
    /// Expand WMS time dimension values (instants or start/end/period)
    Times {
        #[arg(required = true)]
        values: Vec<String>,

        /// Print only the available time closest to this instant
        #[arg(long, conflicts_with = "near_hours")]
        near: Option<String>,

        /// Print only the available time closest to this slider position (hours since 1950)
        #[arg(long, allow_hyphen_values = true)]
        near_hours: Option<i64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_dir = logging::resolve_log_dir(cli.log_dir);
    logging::init_logging(log_dir.as_deref())?;

    match cli.command {
        Commands::Convert { labels } => {
            for label in labels {
                let formatted = timefmt::convert(&label)
                    .with_context(|| format!("Failed to convert label '{}'", label))?;
                println!("{}", formatted);
            }
        }
        Commands::Invert { instants } => {
            for instant in instants {
                let hours = timefmt::hours_since_epoch(&instant)
                    .with_context(|| format!("Failed to invert '{}'", instant))?;
                println!("{}", hours);
            }
        }
        Commands::Tooltip {
            document,
            selector,
            output,
        } => {
            let mut doc = tooltip::Document::load(&document)?;
            let formatted = tooltip::render_tooltip(&mut doc, &selector)
                .with_context(|| format!("Failed to render tooltip in {}", document.display()))?;

            let output_path = output.unwrap_or(document);
            doc.save(&output_path)?;
            tracing::info!(%formatted, path = %output_path.display(), "tooltip updated");
            println!("{}", formatted);
        }
        Commands::Scale {
            window: key,
            from,
            to,
            current,
            available,
        } => {
            let today = chrono::Utc::now().date_naive();
            let (from, to) = match key {
                Some(key) => {
                    let scope = window::WindowScope::parse(&key)?;
                    (scope.from, scope.to)
                }
                None => scale::date_range_around(today, from, to)?,
            };
            let current = current.unwrap_or(today);
            if current < from || current > to {
                tracing::warn!(%current, %from, %to, "current date outside range, clamping");
            }

            let available = dimension::expand_time_values(&available)?;
            let slider = scale::SliderScale::for_window(from, to, current, &available)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&slider).context("Failed to serialize scale")?
            );
        }
        Commands::Times {
            values,
            near,
            near_hours,
        } => {
            let times = dimension::expand_time_values(&values)?;
            let closest = match (near, near_hours) {
                (Some(target), _) => {
                    let target = dimension::parse_instant(&target)?;
                    Some(dimension::nearest(&times, target))
                }
                (None, Some(hours)) => Some(
                    dimension::snap_hours(&times, hours)
                        .with_context(|| format!("Failed to snap slider position {}", hours))?,
                ),
                (None, None) => None,
            };
            match closest {
                Some(closest) => {
                    let closest = closest.context("No time values to choose from")?;
                    println!("{}", timefmt::format_wms_time(&closest));
                }
                None => {
                    for time in &times {
                        println!("{}", timefmt::format_wms_time(time));
                    }
                }
            }
        }
    }

    Ok(())
}
