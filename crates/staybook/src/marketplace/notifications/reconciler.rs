use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::super::domain::{Booking, BookingId, BookingStatus, ListingId, ListingSummary, UserId};

/// The noteworthy booking transitions a user can be told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BookingRequest,
    BookingAccepted,
    BookingDeclined,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            NotificationKind::BookingRequest => "booking_request",
            NotificationKind::BookingAccepted => "booking_accepted",
            NotificationKind::BookingDeclined => "booking_declined",
        }
    }

    pub(crate) const fn slug(self) -> &'static str {
        match self {
            NotificationKind::BookingRequest => "booking-request",
            NotificationKind::BookingAccepted => "booking-accepted",
            NotificationKind::BookingDeclined => "booking-declined",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            NotificationKind::BookingRequest => "New booking request for your listing",
            NotificationKind::BookingAccepted => "Your booking request has been accepted!",
            NotificationKind::BookingDeclined => "Your booking request has been declined",
        }
    }
}

/// A derived, ephemeral notification. The composite key of kind and booking
/// id is what guarantees at-most-one emission per transition; events are
/// never persisted past the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    pub booking_id: BookingId,
    pub listing_id: ListingId,
}

impl NotificationEvent {
    pub fn key(&self) -> String {
        format!("{}-{}", self.kind.slug(), self.booking_id)
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

/// Result of one reconcile cycle: the events to surface and the snapshot to
/// carry into the next cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileOutcome {
    pub events: Vec<NotificationEvent>,
    pub snapshot: Vec<Booking>,
}

/// Ids of the listings `identity` hosts, taken from catalog summaries. Ids
/// already live in canonical string form, so this is the string-keyed join
/// the clients have always performed.
pub fn host_listing_ids(identity: &UserId, listings: &[ListingSummary]) -> HashSet<ListingId> {
    listings
        .iter()
        .filter(|listing| listing.owner == *identity)
        .map(|listing| listing.id.clone())
        .collect()
}

/// Diff the current booking list against the previous snapshot and emit the
/// transitions worth telling `identity` about.
///
/// Per booking in `current`:
/// - a pending booking against one of `host_listing_ids` that was absent
///   from the previous snapshot is a new request (host-facing, first
///   sighting only);
/// - a booking requested by `identity` that was present before with a
///   different status and is now accepted or declined emits the matching
///   status event (once per transition, because the snapshot is replaced
///   every cycle);
/// - unchanged bookings emit nothing, and bookings that disappeared are
///   dropped from the snapshot silently.
///
/// The new snapshot is always `current` verbatim; the reconciler replaces,
/// it never merges.
pub fn reconcile(
    previous: &[Booking],
    current: &[Booking],
    identity: &UserId,
    host_listing_ids: &HashSet<ListingId>,
) -> ReconcileOutcome {
    let prior: HashMap<&BookingId, &Booking> =
        previous.iter().map(|booking| (&booking.id, booking)).collect();

    let mut events = Vec::new();

    for booking in current {
        let seen_before = prior.get(&booking.id);

        if host_listing_ids.contains(&booking.listing_id)
            && booking.status == BookingStatus::Pending
            && seen_before.is_none()
        {
            events.push(NotificationEvent {
                kind: NotificationKind::BookingRequest,
                booking_id: booking.id.clone(),
                listing_id: booking.listing_id.clone(),
            });
        }

        if booking.owner == *identity {
            if let Some(prior_booking) = seen_before {
                if prior_booking.status != booking.status {
                    let kind = match booking.status {
                        BookingStatus::Accepted => Some(NotificationKind::BookingAccepted),
                        BookingStatus::Declined => Some(NotificationKind::BookingDeclined),
                        BookingStatus::Pending => None,
                    };
                    if let Some(kind) = kind {
                        events.push(NotificationEvent {
                            kind,
                            booking_id: booking.id.clone(),
                            listing_id: booking.listing_id.clone(),
                        });
                    }
                }
            }
        }
    }

    ReconcileOutcome {
        events,
        snapshot: current.to_vec(),
    }
}
