use std::collections::HashSet;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use super::super::client::{ApiError, AuthToken, MarketplaceApi};
use super::super::domain::{Booking, ListingId, UserId};
use super::feed::NotificationFeed;
use super::reconciler::{host_listing_ids, reconcile, NotificationEvent};

/// Explicit value-passing form of the notification state machine: the poller
/// owns the previous snapshot and nothing else, so every cycle is a plain
/// function of (snapshot, fetched data).
#[derive(Debug)]
pub struct NotificationPoller {
    identity: UserId,
    snapshot: Vec<Booking>,
}

impl NotificationPoller {
    pub fn new(identity: UserId) -> Self {
        Self {
            identity,
            snapshot: Vec::new(),
        }
    }

    pub fn identity(&self) -> &UserId {
        &self.identity
    }

    /// The bookings observed by the last committed cycle.
    pub fn snapshot(&self) -> &[Booking] {
        &self.snapshot
    }

    /// Run one reconcile cycle over already-fetched data and commit the new
    /// snapshot. The commit happens only here, so a failed fetch upstream of
    /// this call leaves the previous snapshot untouched.
    pub fn observe(
        &mut self,
        bookings: Vec<Booking>,
        host_listings: &HashSet<ListingId>,
    ) -> Vec<NotificationEvent> {
        let outcome = reconcile(&self.snapshot, &bookings, &self.identity, host_listings);
        self.snapshot = outcome.snapshot;
        outcome.events
    }

    /// Fetch the current bookings and catalog, then observe. Errors surface
    /// before the snapshot is touched; the caller skips the cycle and keeps
    /// last-good state.
    pub async fn poll_once(
        &mut self,
        api: &dyn MarketplaceApi,
        token: &AuthToken,
    ) -> Result<Vec<NotificationEvent>, ApiError> {
        let bookings = api.fetch_all_bookings(token).await?;
        let listings = api.fetch_all_listings().await?;
        let hosted = host_listing_ids(&self.identity, &listings);
        Ok(self.observe(bookings, &hosted))
    }

    /// Poll on a fixed cadence, pushing each cycle's events into `feed`.
    /// Cycles are serialized: the next tick is not taken until the previous
    /// cycle finishes, so snapshots never interleave. A failed cycle is
    /// logged and skipped. Dropping the returned future stops the poller.
    pub async fn run(
        &mut self,
        api: &dyn MarketplaceApi,
        token: &AuthToken,
        period: Duration,
        feed: &mut NotificationFeed,
    ) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.poll_once(api, token).await {
                Ok(events) => {
                    let added = feed.push(&events);
                    if added > 0 {
                        debug!(identity = %self.identity, added, "new notifications");
                    }
                }
                Err(err) => {
                    warn!(identity = %self.identity, %err, "notification poll failed; keeping previous snapshot");
                }
            }
        }
    }
}
