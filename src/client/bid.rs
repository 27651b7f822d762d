// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Two-stage bid pipeline
//!
//! A bid runs through lookup, floor validation, a preview submit and a
//! placement submit. Each stage resubmits the hidden fields the previous
//! response carried, so server-side tokens survive the round trips. The
//! placement response text decides the outcome.

use super::AuctionClient;
use crate::api::{parse_amount, AuctionStatus};
use crate::error::{Error, Result};
use crate::scrape::{self, FormSnapshot, Outcome};

impl AuctionClient {
    /// Place a bid on an auction
    ///
    /// Fails fast without touching the item page when the auction is no
    /// longer open, and before any submit when the requested price does not
    /// clear the floor under the configured [`crate::config::PricePolicy`].
    /// A rebid answer carries the floor seen in the placement form so the
    /// caller can come back with a higher amount.
    pub async fn bid(&mut self, auction_id: &str, price: u64) -> Result<()> {
        match self.run_bid_pipeline(auction_id, price).await? {
            Outcome::Success => {
                tracing::info!(auction = %auction_id, price, "Bid placed");
                Ok(())
            }
            Outcome::RebidRequired { floor } => Err(Error::RebidRequired { floor }),
            Outcome::AuctionEnded => Err(Error::AuctionEnded),
            Outcome::CaptchaRequired(challenge) => Err(Error::CaptchaRequired(challenge)),
            Outcome::Unexpected(page) => Err(Error::UnexpectedOutcome(page)),
        }
    }

    /// Drive one bid attempt to its outcome
    async fn run_bid_pipeline(&mut self, auction_id: &str, price: u64) -> Result<Outcome> {
        let record = self.auction_info(auction_id).await?;
        if record.status != AuctionStatus::Open {
            return Ok(Outcome::AuctionEnded);
        }

        let item_page = self.session().get(&record.item_url, &[]).await?;
        let (preview_form, _) = self.build_bid_form(&item_page, price)?;

        let preview_page = self
            .session()
            .post(&self.profile().bid_preview_url, preview_form.as_pairs())
            .await?;

        let (place_form, floor) = self.build_bid_form(&preview_page, price)?;

        let result_page = self
            .session()
            .post(&self.profile().place_bid_url, place_form.as_pairs())
            .await?;

        Ok(match scrape::classify(&result_page, self.profile()) {
            // The classifier cannot see the floor; it sits in the fields
            // submitted with the placement form.
            Outcome::RebidRequired { .. } => Outcome::RebidRequired { floor },
            other => other,
        })
    }

    /// Build one stage's submit from the previous response
    ///
    /// Named hidden fields are copied in order. The floor field is checked
    /// against the requested price under the configured policy, the
    /// marketing opt-in is forced off, the bid field is overwritten with
    /// the price (appended when the form lacks one), and the quantity is
    /// pinned to a single item.
    fn build_bid_form(&self, body: &str, price: u64) -> Result<(FormSnapshot, Option<u64>)> {
        let profile = self.profile();
        let hidden = scrape::hidden_fields(body)
            .map_err(|err| Error::workflow(err.to_string(), err.code().unwrap_or(0)))?;

        let mut form = FormSnapshot::new();
        let mut floor = None;
        let mut bid_seen = false;
        for (name, value) in hidden.iter() {
            if name.is_empty() {
                continue;
            }
            if *name == profile.floor_field {
                let limit = parse_amount(value);
                if self.config().price_policy.rejects(price, limit) {
                    return Err(Error::PriceBelowFloor { floor: limit });
                }
                floor = Some(limit);
            }
            if *name == profile.optin_field {
                form.set(name.clone(), "0");
                continue;
            }
            if *name == profile.bid_field {
                form.set(name.clone(), price.to_string());
                bid_seen = true;
                continue;
            }
            form.set(name.clone(), value.clone());
        }
        if !bid_seen {
            form.set(profile.bid_field.clone(), price.to_string());
        }
        form.set(profile.quantity_field.clone(), "1");

        Ok((form, floor))
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use async_trait::async_trait;

    use super::*;
    use crate::config::{ClientConfig, PricePolicy};
    use crate::http::{ReplaySession, Session};

    const INFO_OPEN: &str = "<ResultSet><Result>\
<AuctionID>x000000000</AuctionID>\
<Title>Open lot</Title>\
<AuctionItemUrl>https://page.auctions.yahoo.co.jp/jp/auction/x000000000</AuctionItemUrl>\
<Price>500</Price>\
<Status>open</Status>\
</Result></ResultSet>";

    const INFO_ENDED: &str = "<ResultSet><Result>\
<AuctionID>e000000000</AuctionID>\
<Title>Ended lot</Title>\
<AuctionItemUrl>https://page.auctions.yahoo.co.jp/jp/auction/e000000000</AuctionItemUrl>\
<Price>500</Price>\
<Status>closed</Status>\
</Result></ResultSet>";

    const ITEM_BID_PAGE: &str = r#"<html><body>
<form method="post" action="https://auctions.yahoo.co.jp/jp/show/bid_preview">
<input type="hidden" name=".crumb" value="crumb-1">
<input type="hidden" name="aID" value="x000000000">
<input type="hidden" name="setPrice" value="500">
<input type="hidden" name="mnewsoptin" value="1">
<input type="hidden" name="Bid" value="">
<input type="hidden" value="stray">
</form>
</body></html>"#;

    const PREVIEW_PAGE: &str = r#"<html><body>
<form method="post" action="https://auctions.yahoo.co.jp/jp/config/placebid">
<input type="hidden" name=".crumb" value="crumb-2">
<input type="hidden" name="aID" value="x000000000">
<input type="hidden" name="setPrice" value="500">
<input type="hidden" name="Bid" value="1000">
</form>
</body></html>"#;

    const ACCEPTED_PAGE: &str = "<html><body><p>入札を受け付けました。</p></body></html>";
    const REBID_PAGE: &str = "<html><body><p>再入札してください。</p></body></html>";

    fn bidder(session: ReplaySession) -> AuctionClient {
        let config = ClientConfig::new("testuser", "secret").app_id("app-1");
        AuctionClient::with_session(config, Box::new(session))
    }

    fn script_open_auction(session: &ReplaySession) {
        session.on_get("auctionItem", INFO_OPEN);
        session.on_get("/jp/auction/x000000000", ITEM_BID_PAGE);
        session.on_post("bid_preview", PREVIEW_PAGE);
    }

    /// Serves scripted pages while reporting a live connection.
    struct LiveReplay(ReplaySession);

    #[async_trait]
    impl Session for LiveReplay {
        async fn get(&self, url: &str, query: &[(String, String)]) -> Result<String> {
            self.0.get(url, query).await
        }

        async fn post(&self, url: &str, form: &[(String, String)]) -> Result<String> {
            self.0.post(url, form).await
        }

        fn export_cookies(&self) -> Result<Vec<u8>> {
            self.0.export_cookies()
        }

        fn import_cookies(&self, blob: &[u8]) -> Result<()> {
            self.0.import_cookies(blob)
        }
    }

    #[tokio::test]
    async fn test_bid_accepted() {
        let session = ReplaySession::new();
        script_open_auction(&session);
        session.on_post("placebid", ACCEPTED_PAGE);

        let mut client = bidder(session.clone());
        client.bid("x000000000", 1000).await.unwrap();

        let calls = session.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls[2].url.contains("bid_preview"));
        assert!(calls[3].url.contains("placebid"));

        let preview_form = &calls[2].form;
        assert!(preview_form.contains(&(".crumb".to_string(), "crumb-1".to_string())));
        assert!(preview_form.contains(&("setPrice".to_string(), "500".to_string())));
        assert!(preview_form.contains(&("mnewsoptin".to_string(), "0".to_string())));
        assert!(preview_form.contains(&("Bid".to_string(), "1000".to_string())));
        assert!(preview_form.contains(&("Quantity".to_string(), "1".to_string())));
        assert!(!preview_form.iter().any(|(name, _)| name.is_empty()));

        let place_form = &calls[3].form;
        assert!(place_form.contains(&(".crumb".to_string(), "crumb-2".to_string())));
        assert!(place_form.contains(&("Bid".to_string(), "1000".to_string())));
    }

    #[tokio::test]
    async fn test_live_bid_submits_without_waiting() {
        let replay = ReplaySession::new();
        script_open_auction(&replay);
        replay.on_post("placebid", ACCEPTED_PAGE);

        let config = ClientConfig::new("testuser", "secret")
            .app_id("app-1")
            .submit_delay(Duration::from_secs(2));
        let mut client =
            AuctionClient::with_session(config, Box::new(LiveReplay(replay.clone())));

        let start = Instant::now();
        client.bid("x000000000", 1000).await.unwrap();

        // Only the login handshake waits; both bid submits go straight out.
        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(replay.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_bid_below_floor_sends_nothing() {
        let session = ReplaySession::new();
        script_open_auction(&session);

        let mut client = bidder(session.clone());
        let err = client.bid("x000000000", 100).await.unwrap_err();
        assert!(matches!(err, Error::PriceBelowFloor { floor: 500 }));

        // Lookup and item fetch only; neither submit goes out.
        let calls = session.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].method, "GET");
        assert_eq!(calls[1].method, "GET");
    }

    #[tokio::test]
    async fn test_bid_on_ended_auction_stops_at_lookup() {
        let session = ReplaySession::new();
        session.on_get("auctionItem", INFO_ENDED);

        let mut client = bidder(session.clone());
        let err = client.bid("e000000000", 1000).await.unwrap_err();
        assert!(matches!(err, Error::AuctionEnded));
        assert_eq!(session.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_rebid_carries_placement_floor() {
        let session = ReplaySession::new();
        script_open_auction(&session);
        session.on_post("placebid", REBID_PAGE);

        let mut client = bidder(session);
        let err = client.bid("x000000000", 500).await.unwrap_err();
        assert!(matches!(err, Error::RebidRequired { floor: Some(500) }));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_floor_boundary_follows_policy() {
        let session = ReplaySession::new();
        script_open_auction(&session);

        let config = ClientConfig::new("testuser", "secret")
            .app_id("app-1")
            .price_policy(PricePolicy::AboveFloor);
        let mut client = AuctionClient::with_session(config, Box::new(session));

        // At the floor exactly; AboveFloor demands strictly more.
        let err = client.bid("x000000000", 500).await.unwrap_err();
        assert!(matches!(err, Error::PriceBelowFloor { floor: 500 }));
    }

    #[tokio::test]
    async fn test_unclassified_result_page_kept() {
        let session = ReplaySession::new();
        script_open_auction(&session);
        session.on_post("placebid", "<html><body>Service update notice</body></html>");

        let mut client = bidder(session);
        let err = client.bid("x000000000", 1000).await.unwrap_err();
        assert_eq!(err.code(), Some(50));
        if let Error::UnexpectedOutcome(page) = err {
            assert!(page.contains("Service update notice"));
        } else {
            panic!("Expected UnexpectedOutcome");
        }
    }

    #[tokio::test]
    async fn test_item_page_without_form_wraps_as_workflow_error() {
        let session = ReplaySession::new();
        session.on_get("auctionItem", INFO_OPEN);
        session.on_get(
            "/jp/auction/x000000000",
            "<html><body>No form here</body></html>",
        );

        let mut client = bidder(session);
        let err = client.bid("x000000000", 1000).await.unwrap_err();
        assert!(matches!(err, Error::Workflow { .. }));
        assert_eq!(err.code(), Some(20));
    }

    #[tokio::test]
    async fn test_missing_bid_field_is_synthesized_last_before_quantity() {
        let page = r#"<form method="post">
<input type="hidden" name=".crumb" value="c">
<input type="hidden" name="setPrice" value="500">
</form>"#;

        let session = ReplaySession::new();
        session.on_get("auctionItem", INFO_OPEN);
        session.on_get("/jp/auction/x000000000", page);
        session.on_post("bid_preview", PREVIEW_PAGE);
        session.on_post("placebid", ACCEPTED_PAGE);

        let mut client = bidder(session.clone());
        client.bid("x000000000", 750).await.unwrap();

        let preview_form = &session.calls()[2].form;
        let tail: Vec<&str> = preview_form
            .iter()
            .rev()
            .take(2)
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(tail, vec!["Quantity", "Bid"]);
        assert!(preview_form.contains(&("Bid".to_string(), "750".to_string())));
    }
}
