// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client implementation

use crate::api::{AuctionRecord, InfoParser};
use crate::config::{ClientConfig, MIN_SUBMIT_DELAY};
use crate::error::{Error, Result};
use crate::http::{HttpSession, HttpSessionConfig, Session};
use crate::scrape::{self, LotListing};
use crate::site::SiteProfile;

/// Stateful client for one auction site account
pub struct AuctionClient {
    /// Account and behavior settings
    config: ClientConfig,
    /// Site addresses, form field names and page markers
    profile: SiteProfile,
    /// Transport; swapped for a scripted session in tests
    session: Box<dyn Session>,
    /// Info lookup parser
    info: InfoParser,
    /// Most recent lookup result
    last_record: Option<AuctionRecord>,
}

impl AuctionClient {
    /// Create a client with a live HTTP session
    pub fn new(config: ClientConfig) -> Result<Self> {
        let session_config = HttpSessionConfig {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            ..Default::default()
        };
        let session = HttpSession::with_config(session_config)?;
        Ok(Self::with_session(config, Box::new(session)))
    }

    /// Create a client over a caller-supplied session
    pub fn with_session(config: ClientConfig, session: Box<dyn Session>) -> Self {
        Self::with_profile(config, SiteProfile::new(), session)
    }

    /// Create a client with a custom site profile
    pub fn with_profile(
        config: ClientConfig,
        profile: SiteProfile,
        session: Box<dyn Session>,
    ) -> Self {
        Self {
            config,
            profile,
            session,
            info: InfoParser::new(),
            last_record: None,
        }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the site profile
    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    /// Get the transport session
    pub(crate) fn session(&self) -> &dyn Session {
        self.session.as_ref()
    }

    /// Most recent lookup result, if any
    pub fn last_record(&self) -> Option<&AuctionRecord> {
        self.last_record.as_ref()
    }

    /// Image URLs for an auction
    ///
    /// With an id the record is refreshed through the info query first.
    /// Without one the images of the last stored record are returned; no
    /// stored record yields an empty list.
    pub async fn auction_images(&mut self, auction_id: Option<&str>) -> Result<Vec<String>> {
        if let Some(id) = auction_id {
            self.auction_info(id).await?;
        }
        Ok(self
            .last_record
            .as_ref()
            .map(|record| record.images.clone())
            .unwrap_or_default())
    }

    /// Look up an auction through the structured info endpoint
    pub async fn auction_info(&mut self, auction_id: &str) -> Result<AuctionRecord> {
        let query = [
            ("appid".to_string(), self.config.app_id.clone()),
            ("auctionID".to_string(), auction_id.to_string()),
        ];
        let body = self.session.get(&self.profile.info_url, &query).await?;
        let record = self.info.parse(&body, auction_id)?;
        tracing::debug!(
            auction = %record.id,
            status = ?record.status,
            price = record.price,
            "Info lookup"
        );
        self.last_record = Some(record.clone());
        Ok(record)
    }

    /// Look up an auction by scraping its public item page
    ///
    /// Fallback for when no application id is available; yields the same
    /// record shape as [`AuctionClient::auction_info`].
    pub async fn auction_info_from_page(&mut self, auction_id: &str) -> Result<AuctionRecord> {
        let url = self.profile.item_page_url(auction_id);
        let body = self.session.get(&url, &[]).await?;
        let fields = scrape::auction_fields(&body, &self.profile)?;
        let record = AuctionRecord::from_page(auction_id, url, fields);
        tracing::debug!(auction = %record.id, status = ?record.status, "Page info");
        self.last_record = Some(record.clone());
        Ok(record)
    }

    /// Ask the site whether the session is still signed in
    pub async fn is_logged_in(&self) -> Result<bool> {
        let body = self
            .session
            .get(&self.profile.login_check_url, &[])
            .await?;
        Ok(scrape::confirms_login(
            &body,
            &self.config.username,
            &self.profile,
        ))
    }

    /// Ids of won auctions from one closed-listings page
    ///
    /// `None` when the page carries no recognizable lot table, which is how
    /// the site renders an account with nothing won.
    pub async fn won_ids(&self, page: u32) -> Result<Option<Vec<String>>> {
        self.ensure_logged_in().await?;
        let query = self.profile.listing_query("won", page);
        let body = self
            .session
            .get(&self.profile.closed_lots_url, &query)
            .await?;
        let ids = scrape::won_ids(&body, self.profile.lot_table_rows)?;
        tracing::debug!(
            page,
            found = ids.as_ref().map(|v| v.len()).unwrap_or(0),
            "Won listing"
        );
        Ok(ids)
    }

    /// Lots with an active bid from one open-listings page
    pub async fn bidding_lots(&self, page: u32) -> Result<Vec<LotListing>> {
        self.ensure_logged_in().await?;
        let query = self.profile.listing_query("bidding", page);
        let body = self
            .session
            .get(&self.profile.open_lots_url, &query)
            .await?;
        let lots = scrape::bidding_lots(&body, self.profile.lot_table_rows, &self.profile.unit_tokens)?;
        tracing::debug!(page, found = lots.len(), "Bidding listing");
        Ok(lots)
    }

    /// Serialize session cookies for reuse across runs
    pub fn export_cookies(&self) -> Result<Vec<u8>> {
        self.session.export_cookies()
    }

    /// Restore previously exported session cookies
    pub fn import_cookies(&self, blob: &[u8]) -> Result<()> {
        self.session.import_cookies(blob)
    }

    pub(crate) async fn ensure_logged_in(&self) -> Result<()> {
        if self.is_logged_in().await? {
            Ok(())
        } else {
            Err(Error::LoggedOff)
        }
    }

    /// Wait before the login submit; scripted sessions skip the wait
    pub(crate) async fn pause_before_submit(&self) {
        if self.session.offline() {
            return;
        }
        let delay = self.config.submit_delay.max(MIN_SUBMIT_DELAY);
        tokio::time::sleep(delay).await;
    }
}
