// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Page extraction layer
//!
//! Pure functions from response body text to structured values: form
//! fields, lot listings, item detail, login state, bid outcomes. The parsed
//! tree is built per call and never crosses an await point; extractors take
//! body text so workflows stay free of parser types.
//!
//! The target pages carry no stable ids on the interesting elements, so
//! several extractors locate content by structural shape. Those heuristics
//! accept false positives on same-shaped markup; that trade-off is part of
//! their contract.

mod form;
mod item;
mod listing;
mod login;
mod outcome;

pub use form::{hidden_fields, FormSnapshot};
pub use item::{auction_fields, ItemFields};
pub use listing::{bidding_lots, find_lot_table, won_ids, LotListing};
pub use login::{captcha_id, confirms_login, session_token, CaptchaChallenge};
pub use outcome::{classify, Outcome};

use scraper::Html;

use crate::error::{Error, Result};

/// Parse a response body, rejecting blank pages
///
/// Every extractor working on a full page goes through this guard; a blank
/// body means the conversation with the site broke and no partial result
/// is safe to build.
pub fn parse_document(body: &str) -> Result<Html> {
    if body.trim().is_empty() {
        return Err(Error::EmptyDocument);
    }
    Ok(Html::parse_document(body))
}
