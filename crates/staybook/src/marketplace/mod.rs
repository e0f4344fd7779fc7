//! The marketplace computation core.
//!
//! Four components carry the product's decision logic, each a pure function
//! over data fetched from the remote API:
//!
//! - [`search`]: availability containment, catalog filters, sorting;
//! - [`profit`]: per-day profit over a trailing window;
//! - [`statistics`]: aggregate host metrics;
//! - [`notifications`]: snapshot diffing into notification events.
//!
//! [`booking`] validates and prices stay requests, [`catalog`] orchestrates
//! the fetch-and-join pipelines, and [`client`] is the async REST boundary.

pub mod booking;
pub mod catalog;
pub mod client;
pub mod domain;
pub mod notifications;
pub mod profit;
pub mod search;
pub mod statistics;

#[cfg(test)]
mod tests;

pub use booking::{quote_stay, request_stay, BookingError, BookingQuote, BookingValidationError};
pub use catalog::{load_host_bookings, load_host_listings, load_published_catalog};
pub use client::{ApiError, AuthToken, HttpMarketplaceApi, MarketplaceApi};
pub use domain::{
    Booking, BookingId, BookingStatus, BookingWithListing, DateRange, Listing, ListingId,
    ListingMetadata, ListingSummary, Review, UserId,
};
pub use notifications::{
    host_listing_ids, reconcile, NotificationEvent, NotificationFeed, NotificationKind,
    NotificationPoller, ReconcileOutcome,
};
pub use profit::{daily_profit, ExportError, ProfitPoint, ProfitSeries};
pub use search::{
    is_range_available, matches_filters, search_catalog, sort_listings, SearchFilters, SortKey,
};
pub use statistics::{host_statistics, HostStatistics};
