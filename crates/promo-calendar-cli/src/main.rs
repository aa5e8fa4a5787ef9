//! `promocal` CLI — query, bucket and conflict-check promotion calendars.
//!
//! Promotions are read as a JSON array of records (`id`, `teamId`,
//! `channelId`, `startDate`, `endDate`, `status`, ...) and results are written
//! as pretty-printed JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Promotions of team-a running in February, sorted by start date
//! promocal query -i promos.json --team team-a --from 2026-02-01 --to 2026-02-28
//!
//! # The same window as a named period, resolved against a reference day
//! promocal query -i promos.json --team team-a --preset mtd --as-of 2026-02-28
//!
//! # Only Olive Young, only planned or active
//! promocal query -i promos.json --team team-a --from 2026-02-01 --to 2026-02-28 \
//!   --channel oliveyoung --status planned --status active
//!
//! # Day buckets for the current month (today in the configured timezone)
//! promocal view -i promos.json --team team-a --view month
//!
//! # Would a new Coupang promotion collide with anything?
//! promocal conflicts -i promos.json --team team-a --channel coupang \
//!   --from 2026-02-05 --to 2026-02-10
//!
//! # Every overlapping same-channel pair in the calendar
//! promocal audit -i promos.json --team team-a
//!
//! # Preparation deadlines for a 2026-06-01 launch
//! promocal lead-times --start 2026-06-01 --channel oliveyoung --channel kakao
//! ```

mod settings;

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use promo_calendar::{
    CalendarView, ChannelId, ConflictCheck, DateRange, KeyedBuckets, Promotion, PromotionCalendar,
    PromotionStatus, RangeQuery, TeamId, WindowPreset,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::settings::{init_tracing, log_level, Settings};

#[derive(Parser)]
#[command(
    name = "promocal",
    version,
    about = "Promotion calendar queries and conflict checks",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./promocal.toml when present)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Args)]
struct Io {
    /// Promotions JSON file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Args)]
struct Filters {
    /// Only include this channel (repeatable)
    #[arg(long = "channel")]
    channels: Vec<String>,
    /// Only include this status: planned, active, ended, cancelled (repeatable)
    #[arg(long = "status")]
    statuses: Vec<String>,
}

#[derive(Args)]
struct Window {
    /// First day of the window (YYYY-MM-DD)
    #[arg(long, required_unless_present = "preset", requires = "to")]
    from: Option<String>,
    /// Last day of the window, inclusive (YYYY-MM-DD)
    #[arg(long, required_unless_present = "preset", requires = "from")]
    to: Option<String>,
    /// Named period instead of --from/--to: 7d, 30d, q1..q4, ytd, mtd
    #[arg(long, conflicts_with_all = ["from", "to"])]
    preset: Option<String>,
    /// Reference day for --preset (defaults to today)
    #[arg(long, requires = "preset")]
    as_of: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List a team's promotions overlapping a date window
    Query {
        #[command(flatten)]
        io: Io,
        #[arg(long)]
        team: String,
        #[command(flatten)]
        window: Window,
        #[command(flatten)]
        filters: Filters,
    },
    /// Group a team's promotions by the days they cover in a window
    Buckets {
        #[command(flatten)]
        io: Io,
        #[arg(long)]
        team: String,
        #[command(flatten)]
        window: Window,
        #[command(flatten)]
        filters: Filters,
    },
    /// Day buckets for a month, week or day page of the calendar
    View {
        #[command(flatten)]
        io: Io,
        #[arg(long)]
        team: String,
        /// month, week or day
        #[arg(long, default_value = "month")]
        view: String,
        /// Any day on the page (defaults to today)
        #[arg(long)]
        date: Option<String>,
        #[command(flatten)]
        filters: Filters,
    },
    /// Check a candidate schedule against existing promotions on a channel
    Conflicts {
        #[command(flatten)]
        io: Io,
        #[arg(long)]
        team: String,
        #[arg(long)]
        channel: String,
        #[command(flatten)]
        window: Window,
        /// Promotion being edited, ignored when checking
        #[arg(long)]
        exclude: Option<String>,
    },
    /// List every overlapping same-channel pair in a team's calendar
    Audit {
        #[command(flatten)]
        io: Io,
        #[arg(long)]
        team: String,
    },
    /// Preparation deadlines per channel for a promotion start date
    LeadTimes {
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Promotion start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// Channel to plan for (repeatable)
        #[arg(long = "channel", required = true)]
        channels: Vec<String>,
    },
}

/// Day buckets as written by `buckets` and `view`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BucketsOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    view: Option<CalendarView>,
    window: DateRange,
    max_per_day: usize,
    days: KeyedBuckets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?;
    init_tracing(log_level(&settings.log_level, cli.verbose), settings.log_json);

    match cli.command {
        Commands::Query {
            io,
            team,
            window,
            filters,
        } => {
            let calendar = load_calendar(io.input.as_deref())?;
            let query = build_query(&team, parse_window(&window, &settings)?, &filters)?;
            let matched = calendar.range_query(&query);
            info!(team = %team, matched = matched.len(), "range query complete");
            write_json(io.output.as_deref(), &matched)?;
        }
        Commands::Buckets {
            io,
            team,
            window,
            filters,
        } => {
            let calendar = load_calendar(io.input.as_deref())?;
            let query = build_query(&team, parse_window(&window, &settings)?, &filters)?;
            write_json(io.output.as_deref(), &bucket_output(&calendar, &query, None))?;
        }
        Commands::View {
            io,
            team,
            view,
            date,
            filters,
        } => {
            let view: CalendarView = view.parse()?;
            let anchor = match date {
                Some(date) => promo_calendar::parse_date(&date)?,
                None => settings.today()?,
            };
            let window = view.window(anchor, settings.week_start()?);
            debug!(view = %view, anchor = %anchor, window = %window, "resolved view window");

            let calendar = load_calendar(io.input.as_deref())?;
            let query = build_query(&team, window, &filters)?;
            write_json(io.output.as_deref(), &bucket_output(&calendar, &query, Some(view)))?;
        }
        Commands::Conflicts {
            io,
            team,
            channel,
            window,
            exclude,
        } => {
            let calendar = load_calendar(io.input.as_deref())?;
            let mut check = ConflictCheck::new(team, channel, parse_window(&window, &settings)?);
            if let Some(id) = exclude {
                check = check.excluding(id);
            }
            let report = calendar.check_conflicts(&check);
            info!(conflicts = report.conflicts.len(), "conflict check complete");
            write_json(io.output.as_deref(), &report)?;
        }
        Commands::Audit { io, team } => {
            let calendar = load_calendar(io.input.as_deref())?;
            let pairs = calendar.audit_conflicts(&TeamId::from(team));
            info!(pairs = pairs.len(), "conflict audit complete");
            write_json(io.output.as_deref(), &pairs)?;
        }
        Commands::LeadTimes {
            output,
            start,
            channels,
        } => {
            let start = promo_calendar::parse_date(&start)?;
            let channels: Vec<ChannelId> = channels.into_iter().map(ChannelId::from).collect();
            let table = settings.lead_time_table();
            let mut plans = Vec::with_capacity(channels.len());
            for channel in &channels {
                match table.plan(channel, start) {
                    Some(plan) => plans.push(plan),
                    None => {
                        let reason = match table.get(channel) {
                            Some(_) => "deadline before the earliest representable date",
                            None => "no lead-time profile for channel",
                        };
                        warn!(channel = %channel, reason, "skipping lead-time plan");
                    }
                }
            }
            write_json(output.as_deref(), &plans)?;
        }
    }

    Ok(())
}

fn parse_window(window: &Window, settings: &Settings) -> Result<DateRange> {
    if let Some(preset) = &window.preset {
        let preset: WindowPreset = preset.parse()?;
        let reference = match &window.as_of {
            Some(day) => promo_calendar::parse_date(day)?,
            None => settings.today()?,
        };
        let range = preset.window(reference);
        debug!(preset = %preset, reference = %reference, window = %range, "resolved preset window");
        return Ok(range);
    }

    match (&window.from, &window.to) {
        (Some(from), Some(to)) => DateRange::parse(from, to)
            .with_context(|| format!("Invalid window --from {} --to {}", from, to)),
        _ => anyhow::bail!("Either --preset or both --from and --to are required"),
    }
}

/// Build a range query from CLI filters. Unknown statuses are rejected.
fn build_query(team: &str, window: DateRange, filters: &Filters) -> Result<RangeQuery> {
    let statuses = filters
        .statuses
        .iter()
        .map(|s| s.parse::<PromotionStatus>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Invalid --status filter")?;

    Ok(RangeQuery::new(team, window)
        .with_channels(filters.channels.iter().map(String::as_str))
        .with_statuses(statuses))
}

fn bucket_output(
    calendar: &PromotionCalendar,
    query: &RangeQuery,
    view: Option<CalendarView>,
) -> BucketsOutput {
    let buckets = calendar.bucket(query);
    BucketsOutput {
        view,
        window: buckets.window(),
        max_per_day: buckets.max_per_day(),
        days: buckets.to_keyed(),
    }
}

fn load_calendar(path: Option<&str>) -> Result<PromotionCalendar> {
    let json = read_input(path)?;
    let promotions: Vec<Promotion> =
        serde_json::from_str(&json).context("Failed to parse promotions JSON")?;
    let calendar =
        PromotionCalendar::from_promotions(promotions).context("Failed to load promotions")?;
    debug!(promotions = calendar.len(), "loaded promotions");
    Ok(calendar)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize + ?Sized>(path: Option<&str>, value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    match path {
        Some(path) => {
            std::fs::write(path, pretty + "\n")
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", pretty);
        }
    }
    Ok(())
}
