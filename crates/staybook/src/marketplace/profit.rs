use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::domain::{Booking, BookingStatus};

/// One day of the trailing profit window. `days_ago` counts backward from
/// the reference date, so the series runs oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitPoint {
    pub days_ago: u32,
    pub date: NaiveDate,
    pub profit: f64,
}

/// Per-day profit over a trailing window, plus derived totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitSeries {
    pub points: Vec<ProfitPoint>,
}

impl ProfitSeries {
    /// Sum of the (already rounded) daily buckets, re-rounded to keep float
    /// dust out of the reported figure.
    pub fn total(&self) -> f64 {
        round2(self.points.iter().map(|point| point.profit).sum())
    }

    pub fn formatted_total(&self) -> String {
        format!("{:.2}", self.total())
    }

    /// True when every bucket is zero, i.e. no accepted booking touched the
    /// window.
    pub fn is_flat(&self) -> bool {
        self.points.iter().all(|point| point.profit == 0.0)
    }

    /// Render the series as CSV (`days_ago,date,profit`) for download.
    pub fn to_csv(&self) -> Result<String, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["days_ago", "date", "profit"])?;
        for point in &self.points {
            writer.write_record([
                point.days_ago.to_string(),
                point.date.to_string(),
                format!("{:.2}", point.profit),
            ])?;
        }
        let buffer = writer
            .into_inner()
            .map_err(|err| ExportError::Io(err.into_error()))?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Failures while rendering a profit series for export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode profit series: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv buffer: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv buffer was not valid utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Distribute each accepted booking's total price evenly across its stayed
/// nights and bucket the result into a trailing window of
/// `window_days + 1` days ending at `reference_date`.
///
/// A booking contributes `total_price / nights` to every window day inside
/// its `[start, end)` span. A degenerate booking (`nights <= 0`) puts the
/// whole total on its start day. Buckets round to two decimals only after
/// all bookings have been applied, so intermediate precision is preserved.
pub fn daily_profit(bookings: &[Booking], window_days: u32, reference_date: NaiveDate) -> ProfitSeries {
    let mut points: Vec<ProfitPoint> = (0..=window_days)
        .rev()
        .map(|days_ago| ProfitPoint {
            days_ago,
            date: reference_date - Duration::days(i64::from(days_ago)),
            profit: 0.0,
        })
        .collect();

    for booking in bookings {
        if booking.status != BookingStatus::Accepted {
            continue;
        }

        let start = booking.date_range.start;
        let end = booking.date_range.end;
        let nights = booking.date_range.nights();

        if nights > 0 {
            let per_night = booking.total_price / nights as f64;
            for point in &mut points {
                if point.date >= start && point.date < end {
                    point.profit += per_night;
                }
            }
        } else if let Some(point) = points.iter_mut().find(|point| point.date == start) {
            point.profit += booking.total_price;
        }
    }

    for point in &mut points {
        point.profit = round2(point.profit);
    }

    ProfitSeries { points }
}
