// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Structured info lookup parsing
//!
//! The info endpoint answers with a small, flat, fixed-schema XML document.
//! Fields are read with one anchored pattern per tag, compiled once in the
//! parser constructor, and the five standard entities are decoded on
//! capture. Error documents carry a `Code` or a bare `Message`; both are
//! mapped onto the lookup error taxonomy before any record is built.

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::scrape::ItemFields;

/// Lifecycle state of an auction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuctionStatus {
    /// Accepting bids
    Open,
    /// Closed; any status other than "open" counts as ended
    Ended,
}

impl From<&str> for AuctionStatus {
    fn from(text: &str) -> Self {
        if text.trim() == "open" {
            AuctionStatus::Open
        } else {
            AuctionStatus::Ended
        }
    }
}

/// One auction as reported by the info lookup
///
/// Immutable once built; a later lookup supersedes the record instead of
/// mutating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuctionRecord {
    /// Auction id
    pub id: String,
    /// Item title
    pub title: String,
    /// Seller account id
    pub seller_id: String,
    /// Public item page URL
    pub item_url: String,
    /// Image URLs in reported order
    pub images: Vec<String>,
    /// Current price
    pub price: u64,
    /// Tax-inclusive price, falls back to the base price
    pub taxin_price: u64,
    /// Auction start
    pub start_time: Option<DateTime<FixedOffset>>,
    /// Auction end
    pub end_time: Option<DateTime<FixedOffset>>,
    /// Open or ended
    pub status: AuctionStatus,
}

impl AuctionRecord {
    /// Build a record from item page fields; id and URL come from the caller
    /// because the page itself does not repeat them reliably
    pub fn from_page(id: impl Into<String>, url: impl Into<String>, fields: ItemFields) -> Self {
        Self {
            id: id.into(),
            title: fields.title,
            seller_id: fields.seller_id,
            item_url: url.into(),
            images: fields.images,
            price: fields.price,
            taxin_price: fields.taxin_price,
            start_time: fields.start_time,
            end_time: fields.end_time,
            status: fields.status,
        }
    }
}

/// Parser for info lookup responses
pub struct InfoParser {
    code: Regex,
    message: Regex,
    result_marker: Regex,
    auction_id: Regex,
    title: Regex,
    seller_block: Regex,
    seller_id: Regex,
    item_url: Regex,
    image: Regex,
    price: Regex,
    taxin_price: Regex,
    start_time: Regex,
    end_time: Regex,
    status: Regex,
}

impl InfoParser {
    /// Build the parser with all tag patterns compiled
    pub fn new() -> Self {
        Self {
            code: tag_pattern("Code"),
            message: tag_pattern("Message"),
            // Must not match the enclosing ResultSet tag.
            result_marker: Regex::new(r"<Result[\s>]").unwrap(),
            auction_id: tag_pattern("AuctionID"),
            title: tag_pattern("Title"),
            seller_block: Regex::new(r"(?s)<Seller(?:\s[^>]*)?>(.*?)</Seller>").unwrap(),
            seller_id: tag_pattern("Id"),
            item_url: tag_pattern("AuctionItemUrl"),
            image: Regex::new(r"<Image[0-9]+[^>]*>([^<]*)</Image[0-9]+>").unwrap(),
            price: tag_pattern("Price"),
            taxin_price: tag_pattern("TaxinPrice"),
            start_time: tag_pattern("StartTime"),
            end_time: tag_pattern("EndTime"),
            status: tag_pattern("Status"),
        }
    }

    /// Parse a lookup response into a record
    ///
    /// Error documents map to [`Error::ApiLookup`]: code 301 not found, 302
    /// invalid id, any other code passed through, a bare message without a
    /// code to 403. A document with no `Result` record is itself a lookup
    /// failure rather than an empty record.
    pub fn parse(&self, body: &str, auction_id: &str) -> Result<AuctionRecord> {
        if body.trim().is_empty() {
            return Err(Error::EmptyDocument);
        }

        if let Some(code_text) = self.capture(&self.code, body) {
            let code: u32 = code_text.trim().parse().unwrap_or(0);
            return Err(match code {
                301 => Error::api(301, "Auction not found"),
                302 => Error::api(302, "Auction ID is invalid"),
                other => Error::api(other, format!("Lookup failed with code {}", other)),
            });
        }

        if let Some(message) = self.capture(&self.message, body) {
            return Err(Error::api(403, message.trim()));
        }

        if !self.result_marker.is_match(body) {
            return Err(Error::api(
                50,
                format!("Unrecognized lookup response for {}", auction_id),
            ));
        }

        let seller_id = self
            .capture_raw(&self.seller_block, body)
            .and_then(|block| self.capture(&self.seller_id, &block))
            .unwrap_or_default();

        let price = self
            .capture(&self.price, body)
            .map(|text| parse_amount(&text))
            .unwrap_or(0);
        let taxin_price = self
            .capture(&self.taxin_price, body)
            .map(|text| parse_amount(&text))
            .unwrap_or(price);

        Ok(AuctionRecord {
            id: self
                .capture(&self.auction_id, body)
                .unwrap_or_else(|| auction_id.to_string()),
            title: self.capture(&self.title, body).unwrap_or_default(),
            seller_id,
            item_url: self.capture(&self.item_url, body).unwrap_or_default(),
            images: self.image_urls(body),
            price,
            taxin_price,
            start_time: self.capture_time(&self.start_time, body),
            end_time: self.capture_time(&self.end_time, body),
            status: self
                .capture(&self.status, body)
                .map(|s| AuctionStatus::from(s.as_str()))
                .unwrap_or(AuctionStatus::Ended),
        })
    }

    /// Image URLs in tag order
    pub fn image_urls(&self, body: &str) -> Vec<String> {
        self.image
            .captures_iter(body)
            .map(|caps| decode_entities(&caps[1]))
            .collect()
    }

    fn capture_raw(&self, pattern: &Regex, text: &str) -> Option<String> {
        pattern.captures(text).map(|caps| caps[1].to_string())
    }

    fn capture(&self, pattern: &Regex, text: &str) -> Option<String> {
        self.capture_raw(pattern, text)
            .map(|raw| decode_entities(&raw))
    }

    fn capture_time(&self, pattern: &Regex, text: &str) -> Option<DateTime<FixedOffset>> {
        self.capture(pattern, text)
            .and_then(|t| DateTime::parse_from_rfc3339(t.trim()).ok())
    }
}

impl Default for InfoParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Pattern for one flat tag, attributes tolerated
fn tag_pattern(name: &str) -> Regex {
    Regex::new(&format!(r"<{0}(?:\s[^>]*)?>([^<]*)</{0}>", name)).unwrap()
}

/// Leading-number parse the way the site quotes amounts
///
/// Thousands separators are dropped, a decimal tail is ignored, and text
/// without a leading number parses to zero.
pub(crate) fn parse_amount(text: &str) -> u64 {
    let cleaned = text.trim().replace(',', "");
    let integral = cleaned.split('.').next().unwrap_or("");
    let digits: String = integral.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Decode the five standard entities, ampersand last
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN_INFO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ResultSet totalResultsAvailable="1" totalResultsReturned="1">
<Result>
<AuctionID>x000000000</AuctionID>
<CategoryId>2084261642</CategoryId>
<Title>Canon FD 50mm F1.4 &amp; hood</Title>
<Seller>
<Id>seller_one</Id>
<Rating><Point>120</Point></Rating>
</Seller>
<AuctionItemUrl>https://page.auctions.yahoo.co.jp/jp/auction/x000000000</AuctionItemUrl>
<Img>
<Image1 width="600" height="450">https://img.example/x0/1.jpg</Image1>
<Image2 width="600" height="450">https://img.example/x0/2.jpg</Image2>
</Img>
<Initprice>500.00</Initprice>
<Price>500.00</Price>
<TaxinPrice>550.00</TaxinPrice>
<StartTime>2026-08-20T19:00:00+09:00</StartTime>
<EndTime>2026-08-27T21:30:00+09:00</EndTime>
<Status>open</Status>
</Result>
</ResultSet>"#;

    #[test]
    fn test_open_record_parsed() {
        let parser = InfoParser::new();
        let record = parser.parse(OPEN_INFO, "x000000000").unwrap();

        assert_eq!(record.id, "x000000000");
        assert_eq!(record.title, "Canon FD 50mm F1.4 & hood");
        assert_eq!(record.seller_id, "seller_one");
        assert_eq!(
            record.item_url,
            "https://page.auctions.yahoo.co.jp/jp/auction/x000000000"
        );
        assert_eq!(
            record.images,
            vec![
                "https://img.example/x0/1.jpg",
                "https://img.example/x0/2.jpg"
            ]
        );
        assert_eq!(record.price, 500);
        assert_eq!(record.taxin_price, 550);
        assert_eq!(record.status, AuctionStatus::Open);
        assert_eq!(
            record.end_time.unwrap().to_rfc3339(),
            "2026-08-27T21:30:00+09:00"
        );
    }

    #[test]
    fn test_ended_status() {
        let parser = InfoParser::new();
        let body = "<ResultSet><Result><AuctionID>e000000000</AuctionID><Status>closed</Status></Result></ResultSet>";
        let record = parser.parse(body, "e000000000").unwrap();
        assert_eq!(record.status, AuctionStatus::Ended);
    }

    #[test]
    fn test_missing_status_counts_as_ended() {
        let parser = InfoParser::new();
        let body = "<ResultSet><Result><AuctionID>q1</AuctionID></Result></ResultSet>";
        let record = parser.parse(body, "q1").unwrap();
        assert_eq!(record.status, AuctionStatus::Ended);
    }

    #[test]
    fn test_known_error_codes() {
        let parser = InfoParser::new();

        let not_found = "<ResultSet><Code>301</Code></ResultSet>";
        let err = parser.parse(not_found, "z1").unwrap_err();
        assert_eq!(err.code(), Some(301));
        assert!(err.to_string().contains("Auction not found"));

        let invalid = "<ResultSet><Code>302</Code></ResultSet>";
        let err = parser.parse(invalid, "bad id").unwrap_err();
        assert_eq!(err.code(), Some(302));
        assert!(err.to_string().contains("Auction ID is invalid"));
    }

    #[test]
    fn test_unknown_error_code_passed_through() {
        let parser = InfoParser::new();
        let body = "<ResultSet><Code>500</Code></ResultSet>";
        let err = parser.parse(body, "z1").unwrap_err();
        assert_eq!(err.code(), Some(500));
    }

    #[test]
    fn test_message_without_code_is_forbidden() {
        let parser = InfoParser::new();
        let body = "<Error><Message>Your Application ID is invalid</Message></Error>";
        let err = parser.parse(body, "z1").unwrap_err();
        assert_eq!(err.code(), Some(403));
        assert!(err.to_string().contains("Your Application ID is invalid"));
    }

    #[test]
    fn test_response_without_result_is_an_error() {
        let parser = InfoParser::new();
        let body = "<ResultSet totalResultsAvailable=\"0\"></ResultSet>";
        let err = parser.parse(body, "z1").unwrap_err();
        assert_eq!(err.code(), Some(50));
    }

    #[test]
    fn test_empty_body() {
        let parser = InfoParser::new();
        assert!(matches!(
            parser.parse("", "z1"),
            Err(Error::EmptyDocument)
        ));
    }

    #[test]
    fn test_taxin_price_defaults_to_price() {
        let parser = InfoParser::new();
        let body = "<ResultSet><Result><Price>1200</Price><Status>open</Status></Result></ResultSet>";
        let record = parser.parse(body, "q1").unwrap();
        assert_eq!(record.price, 1200);
        assert_eq!(record.taxin_price, 1200);
    }

    #[test]
    fn test_parse_amount_shapes() {
        assert_eq!(parse_amount("1,000"), 1000);
        assert_eq!(parse_amount("500.00"), 500);
        assert_eq!(parse_amount(" 750 "), 750);
        assert_eq!(parse_amount("12abc"), 12);
        assert_eq!(parse_amount("abc"), 0);
        assert_eq!(parse_amount(""), 0);
    }

    #[test]
    fn test_entity_decoding_order() {
        assert_eq!(decode_entities("A &amp; B"), "A & B");
        assert_eq!(decode_entities("&lt;rare&gt;"), "<rare>");
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("it&#39;s &quot;new&quot;"), "it's \"new\"");
    }

    #[test]
    fn test_record_from_page_fields() {
        let fields = ItemFields {
            title: "Tea set".to_string(),
            seller_id: "vendor_d".to_string(),
            images: vec!["https://img.example/t/1.jpg".to_string()],
            price: 980,
            taxin_price: 980,
            quantity: "1".to_string(),
            start_time: None,
            end_time: None,
            status: AuctionStatus::Open,
        };

        let record = AuctionRecord::from_page("w222222222", "https://page.example/w222222222", fields);
        assert_eq!(record.id, "w222222222");
        assert_eq!(record.item_url, "https://page.example/w222222222");
        assert_eq!(record.title, "Tea set");
        assert_eq!(record.status, AuctionStatus::Open);
    }
}
