use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use epg_engine::{
    bucket_for_view, minutes_to_time, parse_day_key, time_to_minutes, window_for, AdCampaignForm,
    AdCampaignSelection, AdCatalog, AdField, BucketOptions, CalendarView, Campaign, ProgramEntry,
    ScheduleMode, WeekStartDay,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "epg",
    version,
    about = "EPG clock arithmetic, calendar bucketing, and ad-break validation"
)]
struct Cli {
    /// Ad catalog JSON (campaigns, frequencies, ladder); defaults are built in
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an HH:MM clock time to minutes since midnight
    ToMinutes { clock: String },
    /// Convert minutes since midnight to HH:MM (hours are not wrapped)
    ToClock { minutes: u32 },
    /// Compute a program's display window
    Window { start: String, duration: u32 },
    /// Bucket timestamped entries into calendar days
    Bucket {
        /// JSON array of program entries (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,
        /// Anchor day (YYYY-MM-DD)
        #[arg(short, long)]
        anchor: String,
        #[arg(long, value_enum, default_value_t = View::Daily)]
        view: View,
        #[arg(long, value_enum, default_value_t = WeekStart::Monday)]
        week_start: WeekStart,
    },
    /// List configured campaigns
    Campaigns,
    /// Show the duration ladder for a campaign label
    AdDurations {
        #[arg(short, long)]
        campaign: String,
    },
    /// Validate an ad campaign selection
    AdSubmit {
        /// Campaign id or label
        #[arg(long)]
        campaign: Option<String>,
        /// Ladder label, e.g. 01:00m
        #[arg(long)]
        duration: Option<String>,
        #[arg(long)]
        frequency: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    Daily,
    Weekly,
    Monthly,
}

impl From<View> for CalendarView {
    fn from(view: View) -> Self {
        match view {
            View::Daily => CalendarView::Daily,
            View::Weekly => CalendarView::Weekly,
            View::Monthly => CalendarView::Monthly,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum WeekStart {
    Monday,
    Sunday,
}

impl From<WeekStart> for WeekStartDay {
    fn from(start: WeekStart) -> Self {
        match start {
            WeekStart::Monday => WeekStartDay::Monday,
            WeekStart::Sunday => WeekStartDay::Sunday,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = run(cli);
    if let Err(e) = &result {
        tracing::debug!(error = %e, "epg exited with error");
    }
    result
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::ToMinutes { clock } => {
            println!("{}", time_to_minutes(&clock)?);
        }
        Commands::ToClock { minutes } => {
            println!("{}", minutes_to_time(minutes));
        }
        Commands::Window { start, duration } => {
            let window = window_for(&start, duration)?;
            print_json(&window)?;
        }
        Commands::Bucket {
            input,
            anchor,
            view,
            week_start,
        } => {
            let raw = read_input(&input)?;
            let entries: Vec<ProgramEntry> =
                serde_json::from_str(&raw).context("Failed to parse program entries")?;
            if let Some(ScheduleMode::Clock) = ScheduleMode::detect(&entries)? {
                bail!("entries use bare HH:MM times; calendar bucketing needs dated entries");
            }
            let anchor = parse_day_key(&anchor)?;
            let options = BucketOptions {
                week_start: week_start.into(),
            };
            let buckets = bucket_for_view(&entries, anchor, view.into(), &options);
            let keyed: BTreeMap<String, Vec<&ProgramEntry>> = buckets
                .into_iter()
                .map(|(day, entries)| (day.format("%Y-%m-%d").to_string(), entries))
                .collect();
            print_json(&keyed)?;
        }
        Commands::Campaigns => {
            let catalog = load_catalog(cli.config.as_deref())?;
            print_json(&catalog)?;
        }
        Commands::AdDurations { campaign } => {
            let catalog = load_catalog(cli.config.as_deref())?;
            let campaign = catalog
                .find_campaign(&campaign)
                .cloned()
                .unwrap_or_else(|_| Campaign::new(campaign.clone(), campaign));
            let mut form = AdCampaignForm::from_catalog(&catalog)?;
            form.select_campaign(campaign);
            print_json(&form.duration_options())?;
        }
        Commands::AdSubmit {
            campaign,
            duration,
            frequency,
        } => {
            let catalog = load_catalog(cli.config.as_deref())?;
            let mut form = AdCampaignForm::from_catalog(&catalog)?;
            if let Some(key) = campaign {
                form.select_campaign(catalog.find_campaign(&key)?.clone());
            }
            if let Some(duration) = duration {
                form.select_duration(&duration);
            }
            if let Some(frequency) = frequency {
                form.select_frequency(&frequency);
            }

            let mut saved: Option<AdCampaignSelection> = None;
            let outcome = form.submit(&mut |selection: AdCampaignSelection| saved = Some(selection));
            match outcome {
                Ok(()) => {
                    if let Some(selection) = saved {
                        print_json(&selection)?;
                    }
                }
                Err(errors) => {
                    for (field, error) in errors.iter() {
                        eprintln!("{}: {error}", field_name(field));
                    }
                    bail!("ad campaign rejected with {} error(s)", errors.len());
                }
            }
        }
    }
    Ok(())
}

fn field_name(field: AdField) -> &'static str {
    match field {
        AdField::Campaign => "campaign",
        AdField::Duration => "duration",
        AdField::Frequency => "frequency",
    }
}

fn load_catalog(path: Option<&Path>) -> Result<AdCatalog> {
    match path {
        None => Ok(AdCatalog::default()),
        Some(path) => {
            tracing::info!(config_path = ?path, "loading ad catalog");
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Ok(AdCatalog::from_json(&raw)?)
        }
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
