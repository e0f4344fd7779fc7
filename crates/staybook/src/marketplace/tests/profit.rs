use super::common::*;
use crate::marketplace::domain::BookingStatus;
use crate::marketplace::profit::daily_profit;

#[test]
fn window_covers_window_days_plus_one_buckets_oldest_first() {
    let today = date(2025, 6, 30);
    let series = daily_profit(&[], 30, today);

    assert_eq!(series.points.len(), 31);
    assert_eq!(series.points[0].days_ago, 30);
    assert_eq!(series.points[0].date, date(2025, 5, 31));
    assert_eq!(series.points[30].days_ago, 0);
    assert_eq!(series.points[30].date, today);
    assert!(series.is_flat());
    assert_eq!(series.formatted_total(), "0.00");
}

#[test]
fn accepted_booking_spreads_total_across_stayed_nights() {
    let today = date(2025, 6, 30);
    let stay = range(date(2025, 6, 30), date(2025, 7, 3));
    let bookings = vec![booking(1, 1, "guest@example.com", stay, 300.0, BookingStatus::Accepted)];

    let series = daily_profit(&bookings, 30, today);

    // Only the start day falls inside the window; the remaining two stayed
    // nights are in the future.
    let last = series.points.last().expect("bucket for today");
    assert_eq!(last.profit, 100.0);
    assert_eq!(series.total(), 100.0);
}

#[test]
fn booking_inside_window_accounts_for_every_night() {
    let today = date(2025, 6, 30);
    let stay = range(date(2025, 6, 10), date(2025, 6, 13));
    let bookings = vec![booking(1, 1, "guest@example.com", stay, 300.0, BookingStatus::Accepted)];

    let series = daily_profit(&bookings, 30, today);

    let stayed: Vec<_> = series
        .points
        .iter()
        .filter(|point| point.profit > 0.0)
        .collect();
    assert_eq!(stayed.len(), 3);
    assert!(stayed.iter().all(|point| point.profit == 100.0));
    assert_eq!(series.formatted_total(), "300.00");
}

#[test]
fn pending_and_declined_bookings_contribute_nothing() {
    let today = date(2025, 6, 30);
    let stay = range(date(2025, 6, 10), date(2025, 6, 13));
    let bookings = vec![
        booking(1, 1, "guest@example.com", stay, 300.0, BookingStatus::Pending),
        booking(2, 1, "guest@example.com", stay, 900.0, BookingStatus::Declined),
    ];

    let series = daily_profit(&bookings, 30, today);
    assert!(series.is_flat());
}

#[test]
fn booking_outside_window_contributes_nothing() {
    let today = date(2025, 6, 30);
    let stay = range(date(2025, 4, 1), date(2025, 4, 5));
    let bookings = vec![booking(1, 1, "guest@example.com", stay, 400.0, BookingStatus::Accepted)];

    let series = daily_profit(&bookings, 30, today);
    assert!(series.is_flat());
}

#[test]
fn booking_straddling_window_start_counts_overlapping_days_only() {
    let today = date(2025, 6, 30);
    // Five nights, of which two (May 31, Jun 1) fall inside the 30-day window.
    let stay = range(date(2025, 5, 28), date(2025, 6, 2));
    let bookings = vec![booking(1, 1, "guest@example.com", stay, 500.0, BookingStatus::Accepted)];

    let series = daily_profit(&bookings, 30, today);

    let contributing: Vec<_> = series
        .points
        .iter()
        .filter(|point| point.profit > 0.0)
        .collect();
    assert_eq!(contributing.len(), 2);
    assert!(contributing.iter().all(|point| point.profit == 100.0));
    assert_eq!(series.total(), 200.0);
}

#[test]
fn buckets_round_once_at_the_end() {
    let today = date(2025, 6, 30);
    let stay = range(date(2025, 6, 10), date(2025, 6, 13));
    // Two bookings of 50 over 3 nights each land 33.333.. on shared days.
    // Per-addition rounding would produce 33.34; end-of-pass rounding gives
    // 33.33.
    let bookings = vec![
        booking(1, 1, "guest@example.com", stay, 50.0, BookingStatus::Accepted),
        booking(2, 1, "other@example.com", stay, 50.0, BookingStatus::Accepted),
    ];

    let series = daily_profit(&bookings, 30, today);

    let stayed: Vec<_> = series
        .points
        .iter()
        .filter(|point| point.profit > 0.0)
        .collect();
    assert_eq!(stayed.len(), 3);
    assert!(stayed.iter().all(|point| point.profit == 33.33));
    assert_eq!(series.formatted_total(), "99.99");
}

#[test]
fn zero_night_booking_lands_entirely_on_start_day() {
    let today = date(2025, 6, 30);
    let stay = range(date(2025, 6, 15), date(2025, 6, 15));
    let bookings = vec![booking(1, 1, "guest@example.com", stay, 120.0, BookingStatus::Accepted)];

    let series = daily_profit(&bookings, 30, today);

    let bucket = series
        .points
        .iter()
        .find(|point| point.date == date(2025, 6, 15))
        .expect("start day is in the window");
    assert_eq!(bucket.profit, 120.0);
    assert_eq!(series.total(), 120.0);
}

#[test]
fn csv_export_lists_every_bucket_with_two_decimals() {
    let today = date(2025, 6, 30);
    let stay = range(date(2025, 6, 29), date(2025, 6, 30));
    let bookings = vec![booking(1, 1, "guest@example.com", stay, 75.5, BookingStatus::Accepted)];

    let series = daily_profit(&bookings, 2, today);
    let csv = series.to_csv().expect("series renders as csv");

    let lines: Vec<&str> = csv.trim_end().lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "days_ago,date,profit");
    assert_eq!(lines[2], "1,2025-06-29,75.50");
    assert_eq!(lines[3], "0,2025-06-30,0.00");
}
