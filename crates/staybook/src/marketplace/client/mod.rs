//! The marketplace REST API boundary.
//!
//! Everything the core needs from the network is expressed through the
//! [`MarketplaceApi`] trait so the computation layer can run against the real
//! upstream, an in-memory fake, or nothing at all. The reqwest-backed
//! implementation lives in [`http`].

mod http;

pub use http::HttpMarketplaceApi;

use async_trait::async_trait;

use super::domain::{Booking, BookingId, DateRange, Listing, ListingId, ListingSummary};

/// Bearer token issued by the upstream auth endpoints. The core never mints
/// or refreshes tokens; it only forwards them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken(pub String);

impl AuthToken {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl From<&str> for AuthToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Failures crossing the API boundary. Distinct from booking validation
/// failures so callers can render the former as outages and the latter
/// inline next to the offending form field.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to the marketplace api failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Upstream { status: u16, message: String },
}

impl ApiError {
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }
}

/// Async client for the remote marketplace API. Every call may fail with a
/// timeout, a non-2xx status, or a malformed body; none of them block.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// `GET /listings`: public catalog summaries (no availability/metadata).
    async fn fetch_all_listings(&self) -> Result<Vec<ListingSummary>, ApiError>;

    /// `GET /listings/{id}`: full detail for one listing.
    async fn fetch_listing_details(&self, id: &ListingId) -> Result<Listing, ApiError>;

    /// `GET /bookings`: every booking visible to the authenticated user.
    async fn fetch_all_bookings(&self, token: &AuthToken) -> Result<Vec<Booking>, ApiError>;

    /// `POST /bookings/new/{listingId}`: submit a stay request.
    async fn create_booking(
        &self,
        token: &AuthToken,
        listing: &ListingId,
        date_range: &DateRange,
        total_price: f64,
    ) -> Result<BookingId, ApiError>;

    /// `PUT /bookings/accept/{id}`: host accepts a pending request.
    async fn accept_booking(&self, token: &AuthToken, booking: &BookingId) -> Result<(), ApiError>;

    /// `PUT /bookings/decline/{id}`: host declines a pending request.
    async fn decline_booking(&self, token: &AuthToken, booking: &BookingId)
        -> Result<(), ApiError>;

    /// `DELETE /bookings/{id}`: requester withdraws a booking.
    async fn delete_booking(&self, token: &AuthToken, booking: &BookingId) -> Result<(), ApiError>;
}
