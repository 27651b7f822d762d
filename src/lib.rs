// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Huuto - Auction Site Automation Client
//!
//! A pure Rust client for driving an auction website through its ordinary
//! HTML forms. No browser dependency - pages are fetched, extracted and
//! resubmitted directly over HTTP.
//!
//! ## Features
//!
//! - Form-driven login: anti-automation token handling with a captcha branch
//! - Two-stage bidding: preview then placement, floor validated locally first
//! - Structured info lookups with an item-page scraping fallback
//! - Account listings: won and bidding pages over shape-matched tables
//! - Outcome classification: accepted, won, rebid or raw text for diagnosis
//! - Session persistence: cookie state exported and imported as a blob
//! - Scripted offline sessions: dry-run whole workflows without a network
//!
//! ## Example
//!
//! ```rust,no_run
//! use huuto::{AuctionClient, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("user", "password").app_id("my-app-id");
//!     let mut client = AuctionClient::new(config)?;
//!
//!     client.login().await?;
//!
//!     let record = client.auction_info("x000000000").await?;
//!     println!("{} is at {} JPY", record.title, record.price);
//!
//!     client.bid("x000000000", record.price + 100).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod scrape;
pub mod site;

// Re-exports for convenience

// Client
pub use client::AuctionClient;

// Configuration
pub use config::{ClientConfig, PricePolicy};

// Records and lookups
pub use api::{AuctionRecord, AuctionStatus, InfoParser};

// Errors
pub use error::{Error, Result};

// HTTP sessions
pub use http::{
    Cookie, CookieJar, HttpSession, HttpSessionConfig, RecordedCall, ReplaySession, Session,
};

// Extraction
pub use scrape::{CaptchaChallenge, FormSnapshot, ItemFields, LotListing, Outcome};

// Site profile
pub use site::SiteProfile;

/// Huuto version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
