use std::collections::HashSet;

use serde_json::json;

use super::common::*;
use crate::marketplace::domain::{Booking, BookingStatus, ListingId, ListingSummary, UserId};
use crate::marketplace::notifications::{
    host_listing_ids, reconcile, NotificationFeed, NotificationKind, NotificationPoller,
};

fn host_ids(ids: &[u64]) -> HashSet<ListingId> {
    ids.iter().map(|id| ListingId::from(*id)).collect()
}

fn pending(id: u64, listing: u64, owner: &str) -> Booking {
    booking(
        id,
        listing,
        owner,
        range(date(2025, 7, 1), date(2025, 7, 3)),
        200.0,
        BookingStatus::Pending,
    )
}

fn with_status(mut booking: Booking, status: BookingStatus) -> Booking {
    booking.status = status;
    booking
}

#[test]
fn first_sighting_of_pending_request_notifies_the_host() {
    let me = UserId::from("host@example.com");
    let current = vec![pending(1, 10, "guest@example.com")];

    let outcome = reconcile(&[], &current, &me, &host_ids(&[10]));

    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.events[0].kind, NotificationKind::BookingRequest);
    assert_eq!(outcome.events[0].key(), "booking-request-1");
    assert_eq!(outcome.snapshot, current);
}

#[test]
fn requests_for_other_hosts_listings_are_ignored() {
    let me = UserId::from("host@example.com");
    let current = vec![pending(1, 99, "guest@example.com")];

    let outcome = reconcile(&[], &current, &me, &host_ids(&[10]));
    assert!(outcome.events.is_empty());
}

#[test]
fn request_already_in_snapshot_does_not_reemit() {
    let me = UserId::from("host@example.com");
    let current = vec![pending(1, 10, "guest@example.com")];

    let outcome = reconcile(&current, &current, &me, &host_ids(&[10]));
    assert!(outcome.events.is_empty());
}

#[test]
fn status_transition_notifies_the_requester_exactly_once() {
    let me = UserId::from("guest@example.com");
    let before = vec![pending(1, 10, "guest@example.com")];
    let after = vec![with_status(before[0].clone(), BookingStatus::Accepted)];

    let first = reconcile(&before, &after, &me, &HashSet::new());
    assert_eq!(first.events.len(), 1);
    assert_eq!(first.events[0].kind, NotificationKind::BookingAccepted);

    // The snapshot now carries the accepted status; replaying the same
    // upstream state produces nothing.
    let second = reconcile(&first.snapshot, &after, &me, &HashSet::new());
    assert!(second.events.is_empty());
}

#[test]
fn declined_transition_emits_declined_event() {
    let me = UserId::from("guest@example.com");
    let before = vec![pending(1, 10, "guest@example.com")];
    let after = vec![with_status(before[0].clone(), BookingStatus::Declined)];

    let outcome = reconcile(&before, &after, &me, &HashSet::new());
    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.events[0].kind, NotificationKind::BookingDeclined);
    assert_eq!(outcome.events[0].message(), "Your booking request has been declined");
}

#[test]
fn other_guests_transitions_are_not_mine() {
    let me = UserId::from("guest@example.com");
    let before = vec![pending(1, 10, "stranger@example.com")];
    let after = vec![with_status(before[0].clone(), BookingStatus::Accepted)];

    let outcome = reconcile(&before, &after, &me, &HashSet::new());
    assert!(outcome.events.is_empty());
}

#[test]
fn unseen_booking_with_terminal_status_emits_nothing_for_requester() {
    // Rule 2 requires presence in the previous snapshot; a booking first
    // observed already-accepted is not a transition.
    let me = UserId::from("guest@example.com");
    let current = vec![with_status(
        pending(1, 10, "guest@example.com"),
        BookingStatus::Accepted,
    )];

    let outcome = reconcile(&[], &current, &me, &HashSet::new());
    assert!(outcome.events.is_empty());
}

#[test]
fn deleted_bookings_drop_from_snapshot_silently() {
    let me = UserId::from("host@example.com");
    let before = vec![pending(1, 10, "guest@example.com"), pending(2, 10, "b@example.com")];
    let current = vec![before[0].clone()];

    let outcome = reconcile(&before, &current, &me, &host_ids(&[10]));
    assert!(outcome.events.is_empty());
    assert_eq!(outcome.snapshot, current);
}

#[test]
fn reconcile_is_pure_and_idempotent() {
    let me = UserId::from("guest@example.com");
    let before = vec![pending(1, 10, "guest@example.com")];
    let after = vec![with_status(before[0].clone(), BookingStatus::Accepted)];
    let hosted = host_ids(&[10]);

    let first = reconcile(&before, &after, &me, &hosted);
    let second = reconcile(&before, &after, &me, &hosted);
    assert_eq!(first, second);
}

#[test]
fn host_listing_ids_keeps_only_my_listings() {
    let me = UserId::from("host@example.com");
    let listings = vec![
        summary(1, "host@example.com", 100.0),
        summary(2, "other@example.com", 100.0),
        summary(3, "host@example.com", 100.0),
    ];

    let hosted = host_listing_ids(&me, &listings);
    assert_eq!(hosted, host_ids(&[1, 3]));
}

#[test]
fn numeric_and_string_ids_join_on_canonical_form() {
    // The upstream emits numeric ids in bookings but clients have always
    // joined them against stringly listing ids.
    let booking: Booking = serde_json::from_value(json!({
        "id": 1,
        "listingId": 5,
        "owner": "guest@example.com",
        "dateRange": { "start": "2025-07-01", "end": "2025-07-03" },
        "totalPrice": 200.0,
        "status": "pending",
    }))
    .expect("booking deserializes");

    let summary: ListingSummary = serde_json::from_value(json!({
        "id": "5",
        "title": "Listing 5",
        "owner": "host@example.com",
        "price": 100.0,
    }))
    .expect("summary deserializes");

    let me = UserId::from("host@example.com");
    let hosted = host_listing_ids(&me, &[summary]);
    let outcome = reconcile(&[], &[booking], &me, &hosted);

    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.events[0].kind, NotificationKind::BookingRequest);
}

#[test]
fn feed_dedupes_by_event_key_and_tracks_unread() {
    let me = UserId::from("host@example.com");
    let current = vec![pending(1, 10, "guest@example.com")];
    let outcome = reconcile(&[], &current, &me, &host_ids(&[10]));

    let mut feed = NotificationFeed::new();
    assert_eq!(feed.push(&outcome.events), 1);
    assert_eq!(feed.push(&outcome.events), 0);
    assert_eq!(feed.len(), 1);
    assert_eq!(feed.unread_count(), 1);

    feed.mark_all_read();
    assert_eq!(feed.unread_count(), 0);
}

#[test]
fn feed_prepends_newest_events() {
    let me = UserId::from("host@example.com");
    let first = reconcile(&[], &[pending(1, 10, "guest@example.com")], &me, &host_ids(&[10]));
    let second_current = vec![pending(1, 10, "guest@example.com"), pending(2, 10, "b@example.com")];
    let second = reconcile(&first.snapshot, &second_current, &me, &host_ids(&[10]));

    let mut feed = NotificationFeed::new();
    feed.push(&first.events);
    feed.push(&second.events);

    let recent = feed.recent(10);
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].event.key(), "booking-request-2");
    assert_eq!(recent[1].event.key(), "booking-request-1");

    assert_eq!(feed.recent(1).len(), 1);
}

#[test]
fn poller_commits_snapshot_between_observations() {
    let me = UserId::from("guest@example.com");
    let mut poller = NotificationPoller::new(me);
    let hosted = HashSet::new();

    let pending_booking = pending(1, 10, "guest@example.com");
    let events = poller.observe(vec![pending_booking.clone()], &hosted);
    assert!(events.is_empty());
    assert_eq!(poller.snapshot(), &[pending_booking.clone()]);

    let accepted = with_status(pending_booking, BookingStatus::Accepted);
    let events = poller.observe(vec![accepted.clone()], &hosted);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, NotificationKind::BookingAccepted);

    let events = poller.observe(vec![accepted], &hosted);
    assert!(events.is_empty());
}
