use chrono::NaiveDate;

use crate::marketplace::domain::{
    Booking, BookingStatus, DateRange, Listing, ListingMetadata, ListingSummary, Review, UserId,
};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange::new(start, end)
}

pub(super) fn review(rating: f64) -> Review {
    Review {
        rating,
        comment: "fine stay".to_string(),
        author: "guest@example.com".to_string(),
    }
}

pub(super) fn listing(id: u64, owner: &str, price: f64) -> Listing {
    Listing {
        id: id.into(),
        title: format!("Listing {id}"),
        owner: UserId::from(owner),
        price,
        thumbnail: None,
        published: true,
        availability: Vec::new(),
        metadata: ListingMetadata::default(),
        reviews: Vec::new(),
        posted_on: None,
    }
}

pub(super) fn summary(id: u64, owner: &str, price: f64) -> ListingSummary {
    ListingSummary {
        id: id.into(),
        title: format!("Listing {id}"),
        owner: UserId::from(owner),
        price,
        thumbnail: None,
        reviews: Vec::new(),
    }
}

pub(super) fn booking(
    id: u64,
    listing_id: u64,
    owner: &str,
    stay: DateRange,
    total_price: f64,
    status: BookingStatus,
) -> Booking {
    Booking {
        id: id.into(),
        listing_id: listing_id.into(),
        owner: UserId::from(owner),
        date_range: stay,
        total_price,
        status,
    }
}
