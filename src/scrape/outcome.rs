// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Bid outcome classification

use super::CaptchaChallenge;
use crate::site::SiteProfile;

/// Result of one bid attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Bid accepted, or the auction is already won
    Success,
    /// Floor moved between fetch and submit; resubmit with a higher amount
    RebidRequired {
        /// Floor seen in the placement form, when known
        floor: Option<u64>,
    },
    /// Auction closed before the bid landed
    AuctionEnded,
    /// The site interposed a captcha
    CaptchaRequired(CaptchaChallenge),
    /// Result page matched no known marker; raw text kept for diagnosis
    Unexpected(String),
}

/// Classify a placement response, first match wins
///
/// Marker order is fixed: accepted, won, rebid, then the raw-text fallback.
/// The failure pages are unstructured free text, so the fallback preserves
/// the whole body for an operator to read.
pub fn classify(body: &str, profile: &SiteProfile) -> Outcome {
    if body.contains(&profile.bid_accepted_marker) {
        return Outcome::Success;
    }
    if body.contains(&profile.auction_won_marker) {
        return Outcome::Success;
    }
    if profile.rebid_pattern.is_match(body) {
        return Outcome::RebidRequired { floor: None };
    }
    Outcome::Unexpected(body.to_string())
}
