use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::domain::{BookingStatus, BookingWithListing};

/// Aggregate host metrics for the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostStatistics {
    pub booked_days_this_year: u32,
    pub profit_this_year: f64,
    pub oldest_listing_age_days: u32,
}

/// Compute days-booked and profit for `current_year` plus the age of the
/// oldest posted listing.
///
/// A booking whose start year or end year equals `current_year` counts in
/// full; a stay across the year boundary is not prorated, so it contributes
/// its whole length and price to both adjacent years. The posting-date scan
/// runs over every joined entry regardless of booking status, and entries
/// whose listing failed to join are simply skipped there while still
/// counting toward days and profit.
pub fn host_statistics(
    bookings: &[BookingWithListing],
    current_year: i32,
    today: NaiveDate,
) -> HostStatistics {
    let mut booked_days = 0u32;
    let mut profit = 0.0f64;
    let mut oldest_posted: Option<NaiveDate> = None;

    for entry in bookings {
        let booking = &entry.booking;

        if booking.status == BookingStatus::Accepted {
            let start = booking.date_range.start;
            let end = booking.date_range.end;

            if start.year() == current_year || end.year() == current_year {
                booked_days += (end - start).num_days().unsigned_abs() as u32;
                profit += booking.total_price;
            }
        }

        if let Some(posted) = entry.listing.as_ref().and_then(|listing| listing.posted_on) {
            oldest_posted = Some(match oldest_posted {
                Some(current) if current <= posted => current,
                _ => posted,
            });
        }
    }

    let oldest_listing_age_days = oldest_posted
        .map(|posted| (today - posted).num_days().unsigned_abs() as u32)
        .unwrap_or(0);

    HostStatistics {
        booked_days_this_year: booked_days,
        profit_this_year: profit,
        oldest_listing_age_days,
    }
}
