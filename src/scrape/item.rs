// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Auction detail extraction from the public item page

use chrono::{DateTime, FixedOffset, TimeZone};
use scraper::{ElementRef, Html, Selector};

use super::parse_document;
use crate::api::AuctionStatus;
use crate::error::Result;
use crate::site::SiteProfile;

/// Fields readable off a public item page
///
/// Everything is best-effort: a missing element leaves its field at the
/// default instead of failing, matching how loosely the page is structured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    /// Item title
    pub title: String,
    /// Seller account id
    pub seller_id: String,
    /// Gallery image URLs in page order
    pub images: Vec<String>,
    /// Current price
    pub price: u64,
    /// Tax-inclusive price, falls back to the base price
    pub taxin_price: u64,
    /// Offered quantity as shown on the page
    pub quantity: String,
    /// Auction start, at the site's UTC offset
    pub start_time: Option<DateTime<FixedOffset>>,
    /// Auction end, at the site's UTC offset
    pub end_time: Option<DateTime<FixedOffset>>,
    /// Open unless the closed header carries the ended marker
    pub status: AuctionStatus,
}

/// Extract the auction fields from an item page
pub fn auction_fields(body: &str, profile: &SiteProfile) -> Result<ItemFields> {
    let document = parse_document(body)?;

    let title = first_text(&document, &profile.title_selector);
    let seller_id = first_text(&document, &profile.seller_selector);

    let images: Vec<String> = document
        .select(&profile.image_selector)
        .filter_map(|img| img.value().attr("src"))
        .map(str::to_string)
        .collect();

    let (price, taxin_price) = extract_prices(&document, profile);

    let dt_selector = Selector::parse("dt").unwrap();
    let dd_selector = Selector::parse("dd").unwrap();

    let mut quantity = String::new();
    let mut start_time = None;
    let mut end_time = None;

    for row in document.select(&profile.detail_selector) {
        let term = row.select(&dt_selector).next();
        let definition = row.select(&dd_selector).next();
        let (Some(term), Some(definition)) = (term, definition) else {
            continue;
        };

        let label = term.text().collect::<String>();
        let value = detail_value(&definition, &profile.detail_bullet);

        if label.trim() == profile.quantity_label {
            quantity = value;
        } else if label.trim() == profile.start_label {
            start_time = parse_detail_time(&value, profile);
        } else if label.trim() == profile.end_label {
            end_time = parse_detail_time(&value, profile);
        }
    }

    let mut status = AuctionStatus::Open;
    if let Some(header) = document.select(&profile.closed_header_selector).next() {
        let text = header.text().collect::<String>();
        if text.contains(&profile.auction_ended_marker) {
            status = AuctionStatus::Ended;
        }
    }

    Ok(ItemFields {
        title,
        seller_id,
        images,
        price,
        taxin_price,
        quantity,
        start_time,
        end_time,
        status,
    })
}

fn first_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Base and tax-inclusive amounts from the localized price text
///
/// The text carries one or two digit runs before the currency suffix; the
/// second is the tax-inclusive amount and defaults to the first.
fn extract_prices(document: &Html, profile: &SiteProfile) -> (u64, u64) {
    let text = match document.select(&profile.price_selector).next() {
        Some(el) => el.text().collect::<String>().replace(',', ""),
        None => return (0, 0),
    };

    let mut amounts = profile
        .currency_pattern
        .captures_iter(&text)
        .filter_map(|caps| caps[1].parse::<u64>().ok());

    let price = amounts.next().unwrap_or(0);
    let taxin = amounts.next().filter(|&t| t > 0).unwrap_or(price);
    (price, taxin)
}

/// Definition text with the leading bullet separator stripped
fn detail_value(definition: &ElementRef, bullet: &str) -> String {
    let text = definition.text().collect::<String>();
    let text = text.trim();
    text.strip_prefix(bullet).unwrap_or(text).trim().to_string()
}

/// Parse the fixed `YYYY.MM.DD … HH:MM` pattern at the site's UTC offset
fn parse_detail_time(value: &str, profile: &SiteProfile) -> Option<DateTime<FixedOffset>> {
    let caps = profile.detail_time_pattern.captures(value)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    let (hour, minute) = caps[4].split_once(':')?;
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;

    profile
        .tz_offset
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
}
