use chrono::NaiveDate;
use serde::de::{Deserializer, Error as DeError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The upstream emits listing and booking ids as JSON numbers while clients
/// have always compared them as strings. Both id wrappers canonicalize to the
/// decimal string form on deserialization and compare/hash on it, making the
/// string-coercion join an explicit invariant instead of call-site folklore.
fn canonical_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(value) => Ok(value),
        Value::Number(value) => Ok(value.to_string()),
        other => Err(D::Error::custom(format!(
            "id must be a string or number, got {other}"
        ))),
    }
}

/// Identifier of a published property listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(#[serde(deserialize_with = "canonical_id")] pub String);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ListingId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for ListingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier of a booking request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(#[serde(deserialize_with = "canonical_id")] pub String);

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for BookingId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for BookingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Opaque user identity; the upstream uses the account email.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A pair of calendar dates. Containment is inclusive on both bounds:
/// a requested stay fits a window when `start >= window.start` and
/// `end <= window.end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, other: &DateRange) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Whole days between start and end. Zero for a degenerate range and
    /// negative for an inverted one; callers decide what those mean.
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Guest review attached to a listing. The upstream does not guarantee any
/// field, so everything defaults rather than failing the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Review {
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub author: String,
}

/// Property facts nested under a listing. Bedrooms are a list of per-room
/// bed counts; the bedroom count of a listing is the length of that list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListingMetadata {
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub bedrooms: Vec<u32>,
    #[serde(default)]
    pub bathrooms: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ListingMetadata {
    pub fn bedroom_count(&self) -> usize {
        self.bedrooms.len()
    }
}

/// The shape returned by `GET /listings`: no availability, published flag,
/// or metadata. Those only come back from the per-listing detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub id: ListingId,
    pub title: String,
    pub owner: UserId,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// Full listing detail. Read-only input: the marketplace API owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub owner: UserId,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub availability: Vec<DateRange>,
    #[serde(default)]
    pub metadata: ListingMetadata,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub posted_on: Option<NaiveDate>,
}

impl Listing {
    /// Arithmetic mean of review ratings; 0 when there are none.
    pub fn average_rating(&self) -> f64 {
        if self.reviews.is_empty() {
            return 0.0;
        }
        let total: f64 = self.reviews.iter().map(|review| review.rating).sum();
        total / self.reviews.len() as f64
    }
}

/// Lifecycle of a booking request. Pending transitions to accepted or
/// declined by host action; both outcomes are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Declined,
}

impl BookingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Declined => "declined",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Accepted | BookingStatus::Declined)
    }
}

/// A stay request by a guest against a listing. `owner` is the requester;
/// the listing reference is a foreign id, not ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub listing_id: ListingId,
    pub owner: UserId,
    pub date_range: DateRange,
    #[serde(default)]
    pub total_price: f64,
    pub status: BookingStatus,
}

/// A booking joined with its listing detail. The join can fail per entry,
/// so the listing side is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingWithListing {
    pub booking: Booking,
    pub listing: Option<Listing>,
}
