use std::{fmt::Display, io::Write, path::PathBuf};

use anyhow::Result;
use chrono::{Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};
use tracing::info;

use crate::{
    analysis::weekly::{analyze_weeks, WeeklyConfig, DEFAULT_ANCHOR},
    export::source::{CsvSessionSource, SessionSource},
    utils::time::{date_to_label, day_start, week_start},
};

use super::{
    output::chart::{ChartRenderer, TerminalChart},
    Args,
};

const DEFAULT_CSV: &str = "Time Tracking 2025-06-29.csv";
const CHART_TITLE: &str = "Weekly study time";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct WeeklyCommand {
    #[arg(default_value = DEFAULT_CSV, help = "Path to the time tracking CSV export")]
    csv_file: PathBuf,
    #[arg(
        long = "end-date",
        short,
        help = "Last day of the summarized week, typically a Saturday. Examples are \"2025-06-28\", \"yesterday\", \"28/06/2025\". Defaults to today"
    )]
    end_date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
    #[arg(long, default_value_t = DEFAULT_ANCHOR, help = "First week shown in the chart. Moved back to its Sunday")]
    anchor: NaiveDate,
    #[arg(long, help = "Only print the summary")]
    no_chart: bool,
}

/// Command to process `weekly` command. Shows hours per week for every study category and how
/// much was studied in the week ending at `end_date`.
pub async fn process_weekly_command(command: WeeklyCommand) -> Result<()> {
    let end_date = parse_end_date(command.end_date.as_deref(), command.date_style)?;
    let source = CsvSessionSource::new(command.csv_file.clone());
    let mut out = std::io::stdout().lock();
    run_weekly(&command, end_date, &source, &TerminalChart::default(), &mut out).await
}

async fn run_weekly(
    command: &WeeklyCommand,
    end_date: NaiveDate,
    source: &impl SessionSource,
    chart: &impl ChartRenderer,
    out: &mut impl Write,
) -> Result<()> {
    let records = source.load().await?;
    let config = WeeklyConfig {
        anchor: week_start(day_start(command.anchor)),
        end_date,
    };
    let report = analyze_weeks(&records, config);
    info!("Weekly table has {} weeks", report.table.weeks.len());

    if !command.no_chart {
        chart.render(CHART_TITLE, &report.table)?;
    }

    writeln!(
        out,
        "This week ({} - {}): {:.1} hours",
        date_to_label(report.week_from),
        date_to_label(report.week_to),
        *report.current_week
    )?;
    writeln!(
        out,
        "Cumulative (until {}): {:.1} hours",
        date_to_label(report.week_to),
        *report.cumulative
    )?;
    Ok(())
}

/// Plain dates are taken as is, anything else goes through natural language parsing.
fn parse_end_date(end_date: Option<&str>, date_style: DateStyle) -> Result<NaiveDate> {
    let now = Local::now();
    let Some(end_date) = end_date else {
        return Ok(now.date_naive());
    };
    if let Ok(date) = NaiveDate::parse_from_str(end_date, "%Y-%m-%d") {
        return Ok(date);
    }
    match parse_date_string(end_date, now, date_style.into()) {
        Ok(v) => Ok(v.date_naive()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate end date {e}"),
            )
            .into()),
    }
}
