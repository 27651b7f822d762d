// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Target site profile
//!
//! Endpoints, form field names, result markers, selectors and locale data
//! for the supported auction site, held as plain data so the extraction and
//! workflow code stays mechanical. Patterns and selectors are compiled once
//! in the constructor. The profile mirrors the markup served today; there is
//! no forward-compatibility promise.

use chrono::FixedOffset;
use regex::Regex;
use scraper::Selector;

use crate::scrape::CaptchaChallenge;

/// Endpoint and page-shape knowledge for the supported auction site
#[derive(Debug, Clone)]
pub struct SiteProfile {
    /// Public landing page, also the post-login redirect target
    pub landing_url: String,
    /// Page whose response proves a live login
    pub login_check_url: String,
    /// Login form endpoint, GET for the form and POST to submit
    pub login_url: String,
    /// Closed-lots status page (won listings)
    pub closed_lots_url: String,
    /// Open-lots status page (bidding listings)
    pub open_lots_url: String,
    /// First stage of the bid pipeline
    pub bid_preview_url: String,
    /// Second stage of the bid pipeline
    pub place_bid_url: String,
    /// Structured info endpoint
    pub info_url: String,
    /// Item page prefix, auction id appended
    pub item_page_base: String,
    /// Captcha image prefix, captcha id appended
    pub captcha_image_base: String,

    /// Anti-automation token field, script-assigned on the real page
    pub token_field: String,
    /// Field present only when page scripts did not run; dropped on submit
    pub nojs_field: String,
    /// Primary username field
    pub login_field: String,
    /// Secondary username field, receives the same value
    pub username_field: String,
    /// Password field
    pub password_field: String,
    /// Long-lived session opt-in field
    pub persistent_field: String,
    /// Fixed password-authentication marker pairs appended to the login form
    pub auth_fields: Vec<(String, String)>,

    /// Floor-price field in the bid form
    pub floor_field: String,
    /// Bid amount field
    pub bid_field: String,
    /// Marketing opt-in field, forced off
    pub optin_field: String,
    /// Quantity field, always submitted as "1"
    pub quantity_field: String,

    /// Substring confirming an accepted bid
    pub bid_accepted_marker: String,
    /// Substring confirming a won auction
    pub auction_won_marker: String,
    /// Substring on the item page of a closed auction
    pub auction_ended_marker: String,
    /// Substring shown when the site restricts the account
    pub blocked_marker: String,
    /// Welcome banner text before the username
    pub welcome_prefix: String,
    /// Welcome banner text after the username
    pub welcome_suffix: String,

    /// Captures the script-assigned token value
    pub token_pattern: Regex,
    /// Marks a result page asking for a higher bid
    pub rebid_pattern: Regex,
    /// Captures digit runs preceding the currency suffix
    pub currency_pattern: Regex,
    /// Captures date and time from the item detail rows
    pub detail_time_pattern: Regex,

    /// Captcha id element on the login result page
    pub captcha_selector: Selector,
    /// Item title on the item page
    pub title_selector: Selector,
    /// Seller link on the item page
    pub seller_selector: Selector,
    /// Gallery images on the item page
    pub image_selector: Selector,
    /// Localized price text on the item page
    pub price_selector: Selector,
    /// Detail rows (term/definition pairs) on the item page
    pub detail_selector: Selector,
    /// Header present only on closed item pages
    pub closed_header_selector: Selector,

    /// Detail row label for the quantity
    pub quantity_label: String,
    /// Detail row label for the start time
    pub start_label: String,
    /// Detail row label for the end time
    pub end_label: String,
    /// Leading bullet trimmed off detail values
    pub detail_bullet: String,

    /// Ordered locale token replacements applied to listing cells
    pub unit_tokens: Vec<(String, String)>,
    /// Direct row count identifying a lot table
    pub lot_table_rows: usize,
    /// Lots requested per listing page
    pub page_size: usize,

    /// Fixed UTC offset times on the site are quoted in
    pub tz_offset: FixedOffset,
}

impl SiteProfile {
    /// Build the default profile with all patterns and selectors compiled
    pub fn new() -> Self {
        let token_field = ".albatross";
        // The real login page assigns the token from an inline script.
        let token_pattern = Regex::new(&format!(
            r#"document\.getElementsByName\("{}"\)\[0\]\.value = "(.*?)";"#,
            regex::escape(token_field)
        ))
        .unwrap();

        Self {
            landing_url: "http://auctions.yahoo.co.jp/".to_string(),
            login_check_url: "https://auctions.yahoo.co.jp/".to_string(),
            login_url: "https://login.yahoo.co.jp/config/login".to_string(),
            closed_lots_url: "https://auctions.yahoo.co.jp/closeduser/jp/show/mystatus"
                .to_string(),
            open_lots_url: "https://auctions.yahoo.co.jp/openuser/jp/show/mystatus".to_string(),
            bid_preview_url: "https://auctions.yahoo.co.jp/jp/show/bid_preview".to_string(),
            place_bid_url: "https://auctions.yahoo.co.jp/jp/config/placebid".to_string(),
            info_url: "https://auctions.yahooapis.jp/AuctionWebService/V2/auctionItem"
                .to_string(),
            item_page_base: "https://page.auctions.yahoo.co.jp/jp/auction/".to_string(),
            captcha_image_base: "https://ncaptcha.yahoo.co.jp/v1/img/".to_string(),

            token_field: token_field.to_string(),
            nojs_field: ".nojs".to_string(),
            login_field: "login".to_string(),
            username_field: "user_name".to_string(),
            password_field: "passwd".to_string(),
            persistent_field: ".persistent".to_string(),
            auth_fields: vec![
                ("auth_method".to_string(), "pwd".to_string()),
                ("auth_list".to_string(), "pwd".to_string()),
                ("fido".to_string(), "0".to_string()),
            ],

            floor_field: "setPrice".to_string(),
            bid_field: "Bid".to_string(),
            optin_field: "mnewsoptin".to_string(),
            quantity_field: "Quantity".to_string(),

            bid_accepted_marker: "入札を受け付けました".to_string(),
            auction_won_marker: "あなたが落札しました".to_string(),
            auction_ended_marker: "このオークションは終了しています".to_string(),
            blocked_marker: "In order to prevent unauthorized access, your access to Yahoo! \
                             JAPAN has been restricted."
                .to_string(),
            welcome_prefix: "ようこそ、".to_string(),
            welcome_suffix: "さん".to_string(),

            token_pattern,
            rebid_pattern: Regex::new("再入札").unwrap(),
            currency_pattern: Regex::new(r"([0-9]{1,}).?円").unwrap(),
            detail_time_pattern: Regex::new(
                r"([0-9]{4})\.([0-9]{2})\.([0-9]{2}).+([0-9]{2}:[0-9]{2})",
            )
            .unwrap(),

            captcha_selector: Selector::parse("#captchaId").unwrap(),
            title_selector: Selector::parse(".ProductTitle__text").unwrap(),
            seller_selector: Selector::parse(".Seller__name a").unwrap(),
            image_selector: Selector::parse(".ProductImage__images img").unwrap(),
            price_selector: Selector::parse(".Price__value").unwrap(),
            detail_selector: Selector::parse(".ProductDetail__item").unwrap(),
            closed_header_selector: Selector::parse("#closedHeader").unwrap(),

            quantity_label: "個数".to_string(),
            start_label: "開始日時".to_string(),
            end_label: "終了日時".to_string(),
            detail_bullet: "：".to_string(),

            unit_tokens: vec![
                (",".to_string(), String::new()),
                ("円".to_string(), String::new()),
                ("分".to_string(), "min".to_string()),
                ("時間".to_string(), "hour".to_string()),
                ("日".to_string(), "day".to_string()),
            ],
            lot_table_rows: 8,
            page_size: 50,

            tz_offset: FixedOffset::east_opt(9 * 3600).unwrap(),
        }
    }

    /// Query pairs for the login form GET
    pub fn login_query(&self) -> Vec<(String, String)> {
        vec![
            (".lg".to_string(), "jp".to_string()),
            (".intl".to_string(), "jp".to_string()),
            (".src".to_string(), "auc".to_string()),
            (".done".to_string(), self.landing_url.clone()),
        ]
    }

    /// Fixed form pairs opening the captcha retry branch
    pub fn captcha_retry_fields(&self, captcha_id: &str, answer: &str) -> Vec<(String, String)> {
        vec![
            (".src".to_string(), "auc".to_string()),
            (".done".to_string(), self.landing_url.clone()),
            (".display".to_string(), String::new()),
            ("ckey".to_string(), String::new()),
            ("auth_lv".to_string(), "pw".to_string()),
            ("validate".to_string(), "validate".to_string()),
            ("captchaId".to_string(), captcha_id.to_string()),
            (".sectry".to_string(), "0".to_string()),
            ("captchaAnswer".to_string(), answer.to_string()),
            ("x".to_string(), "115".to_string()),
            ("y".to_string(), "17".to_string()),
        ]
    }

    /// Query pairs for one page of a status listing
    pub fn listing_query(&self, select: &str, page: u32) -> Vec<(String, String)> {
        vec![
            ("select".to_string(), select.to_string()),
            ("picsnum".to_string(), self.page_size.to_string()),
            ("apg".to_string(), page.to_string()),
        ]
    }

    /// Item page URL for an auction id
    pub fn item_page_url(&self, auction_id: &str) -> String {
        format!("{}{}", self.item_page_base, auction_id)
    }

    /// Challenge handed to the caller when login requires a captcha
    pub fn captcha_challenge(&self, id: String) -> CaptchaChallenge {
        let url = format!("{}{}", self.captcha_image_base, id);
        CaptchaChallenge { id, url }
    }
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pattern_captures_value() {
        let profile = SiteProfile::new();
        let body = r#"<script>
            document.getElementsByName(".albatross")[0].value = "tok-42";
        </script>"#;
        let caps = profile.token_pattern.captures(body).unwrap();
        assert_eq!(&caps[1], "tok-42");
    }

    #[test]
    fn test_token_pattern_needs_exact_field() {
        let profile = SiteProfile::new();
        let body = r#"document.getElementsByName("other")[0].value = "tok";"#;
        assert!(profile.token_pattern.captures(body).is_none());
    }

    #[test]
    fn test_captcha_challenge_url() {
        let profile = SiteProfile::new();
        let challenge = profile.captcha_challenge("AbC123".to_string());
        assert_eq!(challenge.id, "AbC123");
        assert_eq!(challenge.url, "https://ncaptcha.yahoo.co.jp/v1/img/AbC123");
    }

    #[test]
    fn test_listing_query_pairs() {
        let profile = SiteProfile::new();
        let query = profile.listing_query("won", 2);
        assert_eq!(
            query,
            vec![
                ("select".to_string(), "won".to_string()),
                ("picsnum".to_string(), "50".to_string()),
                ("apg".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_login_query_returns_to_landing() {
        let profile = SiteProfile::new();
        let query = profile.login_query();
        assert_eq!(query.last().unwrap().1, profile.landing_url);
    }

    #[test]
    fn test_item_page_url() {
        let profile = SiteProfile::new();
        assert_eq!(
            profile.item_page_url("x000000000"),
            "https://page.auctions.yahoo.co.jp/jp/auction/x000000000"
        );
    }
}
