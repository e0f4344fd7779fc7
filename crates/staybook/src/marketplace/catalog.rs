use tracing::warn;

use super::client::{ApiError, AuthToken, MarketplaceApi};
use super::domain::{Booking, BookingWithListing, Listing, UserId};

/// Load the public catalog with full details, keeping published listings
/// only. The summary endpoint omits availability and the published flag, so
/// each listing is re-fetched individually; a listing whose detail fetch
/// fails is logged and skipped (it could never pass the published check
/// anyway).
pub async fn load_published_catalog(api: &dyn MarketplaceApi) -> Result<Vec<Listing>, ApiError> {
    let summaries = api.fetch_all_listings().await?;

    let mut listings = Vec::with_capacity(summaries.len());
    for summary in summaries {
        match api.fetch_listing_details(&summary.id).await {
            Ok(listing) => listings.push(listing),
            Err(err) => {
                warn!(listing = %summary.id, %err, "skipping listing with unavailable details");
            }
        }
    }

    Ok(listings
        .into_iter()
        .filter(|listing| listing.published)
        .collect())
}

/// Load every listing `owner` hosts, with details. Unlike the public
/// catalog, unpublished listings are included; hosts manage drafts too.
pub async fn load_host_listings(
    api: &dyn MarketplaceApi,
    owner: &UserId,
) -> Result<Vec<Listing>, ApiError> {
    let summaries = api.fetch_all_listings().await?;

    let mut listings = Vec::new();
    for summary in summaries {
        if summary.owner != *owner {
            continue;
        }
        match api.fetch_listing_details(&summary.id).await {
            Ok(listing) => listings.push(listing),
            Err(err) => {
                warn!(listing = %summary.id, %err, "skipping hosted listing with unavailable details");
            }
        }
    }

    Ok(listings)
}

/// The bookings made against `owner`'s listings, ready for statistics.
///
/// Ids join on their canonical string form. Each booking is paired with its
/// listing detail; a failed detail fetch leaves the listing side empty but
/// keeps the booking, since days/profit aggregation does not need it.
pub async fn load_host_bookings(
    api: &dyn MarketplaceApi,
    token: &AuthToken,
    owner: &UserId,
) -> Result<Vec<BookingWithListing>, ApiError> {
    let bookings = api.fetch_all_bookings(token).await?;
    let summaries = api.fetch_all_listings().await?;
    let hosted = super::notifications::host_listing_ids(owner, &summaries);

    let my_bookings: Vec<Booking> = bookings
        .into_iter()
        .filter(|booking| hosted.contains(&booking.listing_id))
        .collect();

    let mut joined = Vec::with_capacity(my_bookings.len());
    for booking in my_bookings {
        let listing = match api.fetch_listing_details(&booking.listing_id).await {
            Ok(listing) => Some(listing),
            Err(err) => {
                warn!(listing = %booking.listing_id, %err, "booking kept without listing detail");
                None
            }
        };
        joined.push(BookingWithListing { booking, listing });
    }

    Ok(joined)
}
