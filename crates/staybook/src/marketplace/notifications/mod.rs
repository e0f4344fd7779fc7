//! Poll-based notification reconciliation.
//!
//! The upstream has no push channel, so clients poll the booking list and
//! diff consecutive snapshots. [`reconcile`] is the pure diff,
//! [`NotificationPoller`] carries the snapshot between cycles, and
//! [`NotificationFeed`] is the session-local panel state.

mod feed;
mod poller;
mod reconciler;

pub use feed::{FeedEntry, NotificationFeed};
pub use poller::NotificationPoller;
pub use reconciler::{
    host_listing_ids, reconcile, NotificationEvent, NotificationKind, ReconcileOutcome,
};
