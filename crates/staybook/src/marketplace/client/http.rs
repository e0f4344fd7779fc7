use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use super::{ApiError, AuthToken, MarketplaceApi};
use crate::marketplace::domain::{Booking, BookingId, DateRange, Listing, ListingId, ListingSummary};

/// Reqwest-backed implementation of [`MarketplaceApi`].
#[derive(Debug, Clone)]
pub struct HttpMarketplaceApi {
    base_url: String,
    client: Client,
}

impl HttpMarketplaceApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent("staybook/0.1")
            .build()
            .map_err(ApiError::Transport)?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[derive(Deserialize)]
struct ListingsEnvelope {
    #[serde(default)]
    listings: Vec<ListingSummary>,
}

#[derive(Deserialize)]
struct ListingEnvelope {
    listing: Listing,
}

#[derive(Deserialize)]
struct BookingsEnvelope {
    #[serde(default)]
    bookings: Vec<Booking>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewBookingEnvelope {
    booking_id: BookingId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewBookingRequest<'a> {
    date_range: &'a DateRange,
    total_price: f64,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<String>,
}

/// Non-2xx responses carry `{"error": message}`; surface that message, or a
/// caller-provided fallback when the body is missing or unreadable.
async fn ensure_success(response: Response, fallback: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorEnvelope>()
        .await
        .ok()
        .and_then(|envelope| envelope.error)
        .unwrap_or_else(|| fallback.to_string());

    Err(ApiError::upstream(status.as_u16(), message))
}

#[async_trait]
impl MarketplaceApi for HttpMarketplaceApi {
    async fn fetch_all_listings(&self) -> Result<Vec<ListingSummary>, ApiError> {
        let response = self.client.get(self.url("/listings")).send().await?;
        let envelope: ListingsEnvelope = ensure_success(response, "failed to fetch listings")
            .await?
            .json()
            .await?;
        Ok(envelope.listings)
    }

    async fn fetch_listing_details(&self, id: &ListingId) -> Result<Listing, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/listings/{id}")))
            .send()
            .await?;
        let envelope: ListingEnvelope = ensure_success(response, "failed to fetch listing details")
            .await?
            .json()
            .await?;
        Ok(envelope.listing)
    }

    async fn fetch_all_bookings(&self, token: &AuthToken) -> Result<Vec<Booking>, ApiError> {
        let response = self
            .client
            .get(self.url("/bookings"))
            .header(reqwest::header::AUTHORIZATION, token.bearer())
            .send()
            .await?;
        let envelope: BookingsEnvelope = ensure_success(response, "failed to fetch bookings")
            .await?
            .json()
            .await?;
        Ok(envelope.bookings)
    }

    async fn create_booking(
        &self,
        token: &AuthToken,
        listing: &ListingId,
        date_range: &DateRange,
        total_price: f64,
    ) -> Result<BookingId, ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/bookings/new/{listing}")))
            .header(reqwest::header::AUTHORIZATION, token.bearer())
            .json(&NewBookingRequest {
                date_range,
                total_price,
            })
            .send()
            .await?;
        let envelope: NewBookingEnvelope = ensure_success(response, "failed to create booking")
            .await?
            .json()
            .await?;
        Ok(envelope.booking_id)
    }

    async fn accept_booking(&self, token: &AuthToken, booking: &BookingId) -> Result<(), ApiError> {
        let response = self
            .client
            .put(self.url(&format!("/bookings/accept/{booking}")))
            .header(reqwest::header::AUTHORIZATION, token.bearer())
            .send()
            .await?;
        ensure_success(response, "failed to accept booking").await?;
        Ok(())
    }

    async fn decline_booking(
        &self,
        token: &AuthToken,
        booking: &BookingId,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .put(self.url(&format!("/bookings/decline/{booking}")))
            .header(reqwest::header::AUTHORIZATION, token.bearer())
            .send()
            .await?;
        ensure_success(response, "failed to decline booking").await?;
        Ok(())
    }

    async fn delete_booking(&self, token: &AuthToken, booking: &BookingId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/bookings/{booking}")))
            .header(reqwest::header::AUTHORIZATION, token.bearer())
            .send()
            .await?;
        ensure_success(response, "failed to delete booking").await?;
        Ok(())
    }
}
