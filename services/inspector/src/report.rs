use clap::{Args, ValueEnum};
use park_rating::config::AppConfig;
use park_rating::error::AppError;
use park_rating::park::ParkState;
use park_rating::rating::{ParkRating, RatingInspector, RatingReport};
use park_rating::telemetry;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Recorded park state (JSON)
    #[arg(long)]
    pub(crate) state: PathBuf,
    /// Output format for the breakdown
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct ReplayArgs {
    /// JSON array of recorded park states, one per sampled tick
    #[arg(long)]
    pub(crate) frames: PathBuf,
    /// Ticks between polls (defaults to APP_POLL_INTERVAL_TICKS)
    #[arg(long)]
    pub(crate) interval: Option<u32>,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let park = ParkState::from_path(&args.state)?;
    let mut rating = ParkRating::new();
    rating.recalculate(&park);
    let report = RatingReport::capture(&rating);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Table => render_table(&mut out, &report)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &report).map_err(io::Error::from)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => report.write_csv(&mut out)?,
    }

    Ok(())
}

pub(crate) fn run_replay(args: ReplayArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let frames = ParkState::frames_from_path(&args.frames)?;
    let interval = args
        .interval
        .unwrap_or(config.inspector.poll_interval_ticks);
    let mut inspector = RatingInspector::new(interval);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let redraws = replay_frames(&mut inspector, &frames, &mut out)?;

    writeln!(
        out,
        "\nReplayed {} frame(s), {} redraw(s)",
        frames.len(),
        redraws
    )?;
    Ok(())
}

/// Polls every frame in order and renders the reports that come back.
pub(crate) fn replay_frames<W: Write>(
    inspector: &mut RatingInspector,
    frames: &[ParkState],
    out: &mut W,
) -> io::Result<usize> {
    inspector.reset();
    let mut redraws = 0;

    for frame in frames {
        match inspector.check(frame) {
            Some(report) => {
                writeln!(out, "\n[tick {}]", frame.ticks_elapsed)?;
                render_table(out, &report)?;
                redraws += 1;
            }
            None => debug!(tick = frame.ticks_elapsed, "no redraw"),
        }
    }

    Ok(redraws)
}

pub(crate) fn render_table<W: Write>(out: &mut W, report: &RatingReport) -> io::Result<()> {
    writeln!(out, "{}", report.rating_label)?;

    if report.effects.is_empty() {
        return writeln!(out, "No active influences");
    }

    writeln!(out, "{:<24} {:>16} {:>7}  Notes", "Name", "Value", "Impact")?;
    for row in &report.effects {
        writeln!(
            out,
            "{:<24} {:>16} {:>7}  {}",
            row.name, row.value, row.impact_label, row.note
        )?;
    }
    Ok(())
}
