use serde::{Deserialize, Serialize};

use super::domain::{DateRange, Listing};

/// True iff at least one availability window contains the requested range
/// entirely, inclusive on both bounds. A stay spanning two adjacent windows
/// is rejected even when they are contiguous; only a single window can
/// satisfy a request.
pub fn is_range_available(requested: &DateRange, availability: &[DateRange]) -> bool {
    availability.iter().any(|window| window.contains(requested))
}

/// Catalog search criteria. Every populated field must hold for a listing to
/// match; absent or blank fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub min_bedrooms: Option<u32>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
}

impl SearchFilters {
    fn text_needle(&self) -> Option<String> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
            .map(str::to_lowercase)
    }

    /// How many criteria are populated, for "N active" summaries.
    pub fn active_count(&self) -> usize {
        let mut count = 0;
        if self.text_needle().is_some() {
            count += 1;
        }
        if self.min_price.is_some() {
            count += 1;
        }
        if self.max_price.is_some() {
            count += 1;
        }
        if self.min_bedrooms.is_some() {
            count += 1;
        }
        if self.date_range.is_some() {
            count += 1;
        }
        count
    }
}

/// Apply every populated filter to one listing. Missing metadata counts as
/// zero/empty; malformed input never fails the match, it just narrows to the
/// data that is there. Price bounds are inclusive.
pub fn matches_filters(listing: &Listing, filters: &SearchFilters) -> bool {
    if let Some(needle) = filters.text_needle() {
        if !listing.title.to_lowercase().contains(&needle) {
            return false;
        }
    }

    if let Some(min_price) = filters.min_price {
        if listing.price < min_price {
            return false;
        }
    }

    if let Some(max_price) = filters.max_price {
        if listing.price > max_price {
            return false;
        }
    }

    if let Some(min_bedrooms) = filters.min_bedrooms {
        if (listing.metadata.bedroom_count() as u32) < min_bedrooms {
            return false;
        }
    }

    if let Some(requested) = &filters.date_range {
        if !is_range_available(requested, &listing.availability) {
            return false;
        }
    }

    true
}

/// Catalog ordering options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Unsorted,
    PriceAsc,
    PriceDesc,
    RatingDesc,
}

/// Order listings by the requested key. The sort is stable: listings that
/// compare equal keep their relative input order.
pub fn sort_listings(mut listings: Vec<Listing>, key: SortKey) -> Vec<Listing> {
    match key {
        SortKey::Unsorted => {}
        SortKey::PriceAsc => listings.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortKey::PriceDesc => listings.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortKey::RatingDesc => {
            listings.sort_by(|a, b| b.average_rating().total_cmp(&a.average_rating()))
        }
    }
    listings
}

/// The catalog pipeline: unpublished listings are invisible, then filters
/// narrow the set, then the sort key orders it.
pub fn search_catalog(listings: Vec<Listing>, filters: &SearchFilters, sort: SortKey) -> Vec<Listing> {
    let matched = listings
        .into_iter()
        .filter(|listing| listing.published)
        .filter(|listing| matches_filters(listing, filters))
        .collect();
    sort_listings(matched, sort)
}
