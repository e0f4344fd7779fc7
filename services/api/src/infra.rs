use async_trait::async_trait;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use staybook::marketplace::{
    ApiError, AuthToken, Booking, BookingId, BookingStatus, DateRange, Listing, ListingId,
    ListingSummary, MarketplaceApi, UserId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Shared handler state. Notification snapshots live here, one per identity,
/// behind an async mutex so poll cycles are serialized end to end.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) marketplace: Arc<dyn MarketplaceApi>,
    pub(crate) snapshots: Arc<tokio::sync::Mutex<HashMap<UserId, Vec<Booking>>>>,
}

impl AppState {
    pub(crate) fn new(marketplace: Arc<dyn MarketplaceApi>, metrics: PrometheusHandle) -> Self {
        Self {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(metrics),
            marketplace,
            snapshots: Arc::new(tokio::sync::Mutex::new(HashMap::new())),
        }
    }
}

static BOOKING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_booking_id() -> BookingId {
    let id = BOOKING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    BookingId(format!("demo-{id:04}"))
}

/// In-memory marketplace used by the demo command and the route tests. The
/// summary endpoint mirrors the real upstream by stripping availability,
/// metadata, and the published flag.
#[derive(Default, Clone)]
pub(crate) struct InMemoryMarketplaceApi {
    listings: Arc<Mutex<Vec<Listing>>>,
    bookings: Arc<Mutex<Vec<Booking>>>,
}

impl InMemoryMarketplaceApi {
    pub(crate) fn seed_listing(&self, listing: Listing) {
        self.listings
            .lock()
            .expect("listings mutex poisoned")
            .push(listing);
    }

    pub(crate) fn seed_booking(&self, booking: Booking) {
        self.bookings
            .lock()
            .expect("bookings mutex poisoned")
            .push(booking);
    }

    fn set_status(&self, booking: &BookingId, status: BookingStatus) -> Result<(), ApiError> {
        let mut bookings = self.bookings.lock().expect("bookings mutex poisoned");
        match bookings.iter_mut().find(|candidate| candidate.id == *booking) {
            Some(found) => {
                found.status = status;
                Ok(())
            }
            None => Err(ApiError::upstream(404, "booking not found")),
        }
    }
}

#[async_trait]
impl MarketplaceApi for InMemoryMarketplaceApi {
    async fn fetch_all_listings(&self) -> Result<Vec<ListingSummary>, ApiError> {
        let listings = self.listings.lock().expect("listings mutex poisoned");
        Ok(listings
            .iter()
            .map(|listing| ListingSummary {
                id: listing.id.clone(),
                title: listing.title.clone(),
                owner: listing.owner.clone(),
                price: listing.price,
                thumbnail: listing.thumbnail.clone(),
                reviews: listing.reviews.clone(),
            })
            .collect())
    }

    async fn fetch_listing_details(&self, id: &ListingId) -> Result<Listing, ApiError> {
        let listings = self.listings.lock().expect("listings mutex poisoned");
        listings
            .iter()
            .find(|listing| listing.id == *id)
            .cloned()
            .ok_or_else(|| ApiError::upstream(404, "listing not found"))
    }

    async fn fetch_all_bookings(&self, _token: &AuthToken) -> Result<Vec<Booking>, ApiError> {
        Ok(self.bookings.lock().expect("bookings mutex poisoned").clone())
    }

    async fn create_booking(
        &self,
        _token: &AuthToken,
        listing: &ListingId,
        date_range: &DateRange,
        total_price: f64,
    ) -> Result<BookingId, ApiError> {
        let id = next_booking_id();
        self.bookings
            .lock()
            .expect("bookings mutex poisoned")
            .push(Booking {
                id: id.clone(),
                listing_id: listing.clone(),
                owner: UserId::from("guest@example.com"),
                date_range: *date_range,
                total_price,
                status: BookingStatus::Pending,
            });
        Ok(id)
    }

    async fn accept_booking(&self, _token: &AuthToken, booking: &BookingId) -> Result<(), ApiError> {
        self.set_status(booking, BookingStatus::Accepted)
    }

    async fn decline_booking(
        &self,
        _token: &AuthToken,
        booking: &BookingId,
    ) -> Result<(), ApiError> {
        self.set_status(booking, BookingStatus::Declined)
    }

    async fn delete_booking(&self, _token: &AuthToken, booking: &BookingId) -> Result<(), ApiError> {
        let mut bookings = self.bookings.lock().expect("bookings mutex poisoned");
        let before = bookings.len();
        bookings.retain(|candidate| candidate.id != *booking);
        if bookings.len() == before {
            return Err(ApiError::upstream(404, "booking not found"));
        }
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
