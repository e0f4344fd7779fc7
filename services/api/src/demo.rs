use crate::infra::InMemoryMarketplaceApi;
use chrono::{Datelike, Duration, Local, NaiveDate};
use clap::Args;
use serde::Deserialize;
use staybook::error::AppError;
use staybook::marketplace::{
    daily_profit, host_statistics, load_host_bookings, load_host_listings, load_published_catalog,
    quote_stay, request_stay, search_catalog, AuthToken, Booking, BookingStatus, DateRange, Listing,
    ListingMetadata, MarketplaceApi, NotificationFeed, NotificationPoller, ProfitSeries, Review,
    SearchFilters, SortKey, UserId,
};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ProfitReportArgs {
    /// Bookings JSON export: either `{"bookings": [...]}` or a bare array
    #[arg(long)]
    pub(crate) bookings: PathBuf,
    /// Trailing window length in days
    #[arg(long, default_value_t = 30)]
    pub(crate) window_days: u32,
    /// Reference date for the window (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Emit CSV instead of the readable table
    #[arg(long)]
    pub(crate) csv: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Anchor date for the demo dataset (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BookingsExport {
    Envelope { bookings: Vec<Booking> },
    Bare(Vec<Booking>),
}

impl BookingsExport {
    fn into_bookings(self) -> Vec<Booking> {
        match self {
            BookingsExport::Envelope { bookings } => bookings,
            BookingsExport::Bare(bookings) => bookings,
        }
    }
}

pub(crate) fn run_profit_report(args: ProfitReportArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.bookings)?;
    let export: BookingsExport = serde_json::from_str(&raw).map_err(|err| {
        AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })?;
    let bookings = export.into_bookings();

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let series = daily_profit(&bookings, args.window_days, today);

    if args.csv {
        print!("{}", series.to_csv()?);
        return Ok(());
    }

    println!(
        "Profit for the {} days ending {} ({} bookings considered)",
        args.window_days + 1,
        today,
        bookings.len()
    );
    render_profit_series(&series);
    Ok(())
}

fn render_profit_series(series: &ProfitSeries) {
    if series.is_flat() {
        println!("- no accepted bookings in the window");
    } else {
        for point in &series.points {
            if point.profit > 0.0 {
                println!(
                    "- {} ({} days ago): ${:.2}",
                    point.date, point.days_ago, point.profit
                );
            }
        }
    }
    println!("Total: ${}", series.formatted_total());
}

fn demo_listing(
    id: u64,
    title: &str,
    owner: &str,
    price: f64,
    bedrooms: Vec<u32>,
    ratings: &[f64],
    availability: Vec<DateRange>,
    posted_on: NaiveDate,
) -> Listing {
    Listing {
        id: id.into(),
        title: title.to_string(),
        owner: UserId::from(owner),
        price,
        thumbnail: None,
        published: true,
        availability,
        metadata: ListingMetadata {
            property_type: Some("apartment".to_string()),
            bedrooms,
            bathrooms: 1,
            amenities: vec!["wifi".to_string()],
            images: Vec::new(),
        },
        reviews: ratings
            .iter()
            .map(|rating| Review {
                rating: *rating,
                comment: "left by a previous guest".to_string(),
                author: "guest@example.com".to_string(),
            })
            .collect(),
        posted_on: Some(posted_on),
    }
}

fn seed_marketplace(api: &InMemoryMarketplaceApi, today: NaiveDate) {
    let season = vec![DateRange::new(today - Duration::days(40), today + Duration::days(60))];

    api.seed_listing(demo_listing(
        1,
        "Harbor View Loft",
        "host@example.com",
        120.0,
        vec![2, 1],
        &[5.0, 4.0],
        season.clone(),
        today - Duration::days(200),
    ));
    api.seed_listing(demo_listing(
        2,
        "Garden Studio",
        "host@example.com",
        75.0,
        vec![1],
        &[3.0],
        season.clone(),
        today - Duration::days(90),
    ));
    api.seed_listing(demo_listing(
        3,
        "Hillside Cabin",
        "cabins@example.com",
        95.0,
        vec![2],
        &[],
        season,
        today - Duration::days(30),
    ));

    api.seed_booking(Booking {
        id: "seed-1".into(),
        listing_id: 1u64.into(),
        owner: UserId::from("returning@example.com"),
        date_range: DateRange::new(today - Duration::days(10), today - Duration::days(7)),
        total_price: 360.0,
        status: BookingStatus::Accepted,
    });
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let token = AuthToken::from("demo-token");
    let host = UserId::from("host@example.com");

    let api = InMemoryMarketplaceApi::default();
    seed_marketplace(&api, today);

    println!("Staybook marketplace demo (anchored at {today})");

    println!("\nCatalog search: price >= 80, sorted by rating");
    let catalog = load_published_catalog(&api).await?;
    let filters = SearchFilters {
        min_price: Some(80.0),
        date_range: Some(DateRange::new(today + Duration::days(7), today + Duration::days(10))),
        ..SearchFilters::default()
    };
    let results = search_catalog(catalog, &filters, SortKey::RatingDesc);
    for listing in &results {
        println!(
            "- {} (${}/night, rating {:.1})",
            listing.title,
            listing.price,
            listing.average_rating()
        );
    }

    let target = match results.first() {
        Some(listing) => listing.clone(),
        None => {
            println!("No listings matched the demo filters; nothing to book");
            return Ok(());
        }
    };

    println!("\nBooking validation against '{}'", target.title);
    let inverted = DateRange::new(today + Duration::days(10), today + Duration::days(7));
    if let Err(err) = quote_stay(&target, &inverted) {
        println!("- inverted range rejected: {err}");
    }
    let far_future = DateRange::new(today + Duration::days(90), today + Duration::days(93));
    if let Err(err) = quote_stay(&target, &far_future) {
        println!("- out-of-availability range rejected: {err}");
    }

    let stay = DateRange::new(today + Duration::days(7), today + Duration::days(10));
    let quote = quote_stay(&target, &stay)?;
    println!(
        "- {} nights from {} quoted at ${:.2}",
        quote.nights, stay.start, quote.total_price
    );

    let booking_id = match request_stay(&api, &token, &target, stay).await {
        Ok(id) => id,
        Err(err) => {
            println!("- booking submission failed: {err}");
            return Ok(());
        }
    };
    println!("- booking {booking_id} submitted");

    println!("\nNotification cycles");
    let mut host_poller = NotificationPoller::new(host.clone());
    let mut guest_poller = NotificationPoller::new(UserId::from("guest@example.com"));
    let mut host_feed = NotificationFeed::new();

    let events = host_poller.poll_once(&api, &token).await?;
    host_feed.push(&events);
    for event in &events {
        println!("- host sees: {} ({})", event.message(), event.key());
    }
    guest_poller.poll_once(&api, &token).await?;

    api.accept_booking(&token, &booking_id).await?;
    let events = guest_poller.poll_once(&api, &token).await?;
    for event in &events {
        println!("- guest sees: {} ({})", event.message(), event.key());
    }

    // Replaying the same cycle adds nothing; the feed dedups by event key.
    let replay = host_poller.poll_once(&api, &token).await?;
    let added = host_feed.push(&replay);
    println!(
        "- replayed host cycle added {added} notifications ({} unread total)",
        host_feed.unread_count()
    );

    println!("\nHosted listings");
    let hosted = load_host_listings(&api, &host).await?;
    for listing in &hosted {
        let state = if listing.published { "published" } else { "draft" };
        println!("- {} (${}/night, {state})", listing.title, listing.price);
    }

    println!("\nHost profit, trailing 30 days");
    let joined = load_host_bookings(&api, &token, &host).await?;
    let bookings: Vec<Booking> = joined.iter().map(|entry| entry.booking.clone()).collect();
    let series = daily_profit(&bookings, 30, today);
    render_profit_series(&series);

    println!("\nHost statistics for {}", today.year());
    let stats = host_statistics(&joined, today.year(), today);
    println!("- days booked this year: {}", stats.booked_days_this_year);
    println!("- profit this year: ${:.2}", stats.profit_this_year);
    println!(
        "- oldest listing online for {} days",
        stats.oldest_listing_age_days
    );

    Ok(())
}
