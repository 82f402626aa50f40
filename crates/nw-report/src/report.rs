//! Report assembly and text rendering.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Weekday};
use clap::ValueEnum;
use nw_common::{SCHEMA_VERSION, LOG_FIELDS};
use nw_store::LogTable;
use serde::Serialize;
use std::fmt::Write as _;

use crate::stats::{summarize, MetricSummary};

/// Which groupings a report should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// Aggregate summary only.
    Overall,
    /// Aggregate plus by hour of day.
    Hourly,
    /// Aggregate plus by day of week.
    Daily,
    /// Everything.
    #[default]
    All,
}

impl std::fmt::Display for Grouping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overall => write!(f, "overall"),
            Self::Hourly => write!(f, "hourly"),
            Self::Daily => write!(f, "daily"),
            Self::All => write!(f, "all"),
        }
    }
}

/// One metric's summaries.
#[derive(Debug, Clone, Serialize)]
pub struct MetricBlock {
    pub field: &'static str,
    pub overall: MetricSummary,
    /// Hour-of-day groups (0-23), present hours only, ascending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_hour: Option<Vec<HourGroup>>,
    /// Day-of-week groups, Monday first, present days only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_weekday: Option<Vec<WeekdayGroup>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourGroup {
    pub hour: u32,
    pub summary: MetricSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekdayGroup {
    pub weekday: String,
    pub summary: MetricSummary,
}

/// A complete report over one loaded log.
#[derive(Debug, Clone, Serialize)]
pub struct LogReport {
    pub schema_version: &'static str,
    pub records: usize,
    pub first_at: String,
    pub last_at: String,
    pub metrics: Vec<MetricBlock>,
}

impl LogReport {
    /// Assemble a report from a loaded table.
    ///
    /// Grouping keys are derived from the local wall-clock time of each
    /// record: hour-of-day and day-of-week questions are wall-clock
    /// questions.
    pub fn from_table(table: &LogTable, grouping: Grouping) -> Self {
        let times: Vec<DateTime<Local>> = table
            .timestamps()
            .iter()
            .map(|&ts| local_time(ts))
            .collect();

        let metrics = LOG_FIELDS[1..]
            .iter()
            .map(|&field| {
                let values = table.column(field).unwrap_or_default();
                metric_block(field, &values, &times, grouping)
            })
            .collect();

        LogReport {
            schema_version: SCHEMA_VERSION,
            records: table.len(),
            first_at: times
                .first()
                .map(format_time)
                .unwrap_or_default(),
            last_at: times
                .last()
                .map(format_time)
                .unwrap_or_default(),
            metrics,
        }
    }

    /// Render as aligned human-readable text.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} records, {} .. {}",
            self.records, self.first_at, self.last_at
        );

        for block in &self.metrics {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", block.field);
            let _ = writeln!(out, "  overall      {}", render_summary(&block.overall));

            if let Some(hours) = &block.by_hour {
                let _ = writeln!(out, "  by hour of day");
                for g in hours {
                    let _ = writeln!(out, "    {:02}         {}", g.hour, render_summary(&g.summary));
                }
            }
            if let Some(days) = &block.by_weekday {
                let _ = writeln!(out, "  by day of week");
                for g in days {
                    let _ = writeln!(out, "    {:<10} {}", g.weekday, render_summary(&g.summary));
                }
            }
        }
        out
    }
}

fn local_time(ts: i64) -> DateTime<Local> {
    // Out-of-range timestamps clamp to the epoch rather than panicking;
    // such rows are degenerate but must not crash a report.
    Local
        .timestamp_opt(ts, 0)
        .single()
        .unwrap_or_else(|| Local.timestamp_opt(0, 0).single().expect("epoch is valid"))
}

fn format_time(t: &DateTime<Local>) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn metric_block(
    field: &'static str,
    values: &[Option<f64>],
    times: &[DateTime<Local>],
    grouping: Grouping,
) -> MetricBlock {
    let overall = summarize(values);

    let by_hour = matches!(grouping, Grouping::Hourly | Grouping::All).then(|| {
        (0..24)
            .filter_map(|hour| {
                let subset: Vec<Option<f64>> = values
                    .iter()
                    .zip(times)
                    .filter(|(_, t)| t.hour() == hour)
                    .map(|(v, _)| *v)
                    .collect();
                if subset.is_empty() {
                    None
                } else {
                    Some(HourGroup {
                        hour,
                        summary: summarize(&subset),
                    })
                }
            })
            .collect()
    });

    let by_weekday = matches!(grouping, Grouping::Daily | Grouping::All).then(|| {
        WEEK.iter()
            .filter_map(|&day| {
                let subset: Vec<Option<f64>> = values
                    .iter()
                    .zip(times)
                    .filter(|(_, t)| t.weekday() == day)
                    .map(|(v, _)| *v)
                    .collect();
                if subset.is_empty() {
                    None
                } else {
                    Some(WeekdayGroup {
                        weekday: day.to_string(),
                        summary: summarize(&subset),
                    })
                }
            })
            .collect()
    });

    MetricBlock {
        field,
        overall,
        by_hour,
        by_weekday,
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn render_summary(s: &MetricSummary) -> String {
    match (s.mean, s.min, s.max, s.std_dev) {
        (Some(mean), Some(min), Some(max), Some(std)) => format!(
            "known {:>3}/{:<3} mean {:>9.2}  min {:>9.2}  max {:>9.2}  std {:>8.2}",
            s.known, s.total, mean, min, max, std
        ),
        _ => format!("known {:>3}/{:<3} (no usable values)", s.known, s.total),
    }
}
