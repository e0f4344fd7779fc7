use serde::Serialize;

use super::client::{ApiError, AuthToken, MarketplaceApi};
use super::domain::{BookingId, DateRange, Listing};
use super::search::is_range_available;

/// User input that fails validation before any network call. Kept separate
/// from [`ApiError`] so the UI can render these inline instead of as an
/// outage toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BookingValidationError {
    #[error("check-out date must be after check-in date")]
    CheckOutNotAfterCheckIn,
    #[error("selected dates are not available")]
    DatesUnavailable,
}

/// Price breakdown for a validated stay request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuote {
    pub nights: i64,
    pub total_price: f64,
}

/// Validate a requested stay against a listing and price it at
/// nights x price-per-night. The range must be strictly ordered and sit
/// wholly inside one availability window.
pub fn quote_stay(
    listing: &Listing,
    requested: &DateRange,
) -> Result<BookingQuote, BookingValidationError> {
    if requested.start >= requested.end {
        return Err(BookingValidationError::CheckOutNotAfterCheckIn);
    }

    if !is_range_available(requested, &listing.availability) {
        return Err(BookingValidationError::DatesUnavailable);
    }

    let nights = requested.nights();
    Ok(BookingQuote {
        nights,
        total_price: nights as f64 * listing.price,
    })
}

/// Either side of a failed stay request.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error(transparent)]
    Validation(#[from] BookingValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Validate, quote, and submit a stay request in one step.
pub async fn request_stay(
    api: &dyn MarketplaceApi,
    token: &AuthToken,
    listing: &Listing,
    requested: DateRange,
) -> Result<BookingId, BookingError> {
    let quote = quote_stay(listing, &requested)?;
    let booking_id = api
        .create_booking(token, &listing.id, &requested, quote.total_price)
        .await?;
    Ok(booking_id)
}
