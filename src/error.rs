// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the auction client
//!
//! One taxonomy for every workflow step: extraction misses, workflow
//! rejections, classification fallbacks and transport failures. Callers
//! branch on the variant; free-text variants keep the raw page so an
//! operator can diagnose markup the taxonomy does not cover.

use thiserror::Error;

use crate::scrape::CaptchaChallenge;

/// Result type alias for auction client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the auction client
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Cookie blob serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session-level failure outside reqwest (redirect loop, bad hop)
    #[error("Network error: {0}")]
    Network(String),

    /// Response body was empty
    #[error("Body of HTML document is empty")]
    EmptyDocument,

    /// No POST form on the page
    #[error("Page POST form not found")]
    FormNotFound,

    /// Anti-automation token missing from the login page script
    #[error("Login token not found on page")]
    TokenNotFound,

    /// Requested bid is under the floor price in the bid form
    #[error("Price must be upper or equal {floor}")]
    PriceBelowFloor { floor: u64 },

    /// Auction has already closed
    #[error("Auction has already ended")]
    AuctionEnded,

    /// Login needs a captcha answer to continue
    #[error("Captcha required: {}", .0.id)]
    CaptchaRequired(CaptchaChallenge),

    /// The site temporarily restricted access for this account
    #[error("Account access restricted by the site")]
    LoginBlocked,

    /// Login handshake did not end in a confirmed session
    #[error("Login failed: {reason}")]
    LoginFailed {
        reason: String,
        /// Raw response page, kept for diagnosis
        body: Option<String>,
    },

    /// Operation needs a live login and the session has none
    #[error("Not logged in")]
    LoggedOff,

    /// Structured info lookup rejected the request
    #[error("Info lookup failed ({code}): {message}")]
    ApiLookup { code: u32, message: String },

    /// Floor moved between fetch and submit; retry with a higher amount
    #[error("Rebid required{}", .floor.map(|f| format!(" over {}", f)).unwrap_or_default())]
    RebidRequired { floor: Option<u64> },

    /// Result page matched no known outcome marker
    #[error("Page says: {0}")]
    UnexpectedOutcome(String),

    /// Extraction failure re-classified inside the bid pipeline
    #[error("{message}")]
    Workflow { message: String, code: u32 },
}

impl Error {
    /// Create a session-level network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Error::Network(msg.into())
    }

    /// Create a login failure without a page body
    pub fn login_failed<S: Into<String>>(reason: S) -> Self {
        Error::LoginFailed {
            reason: reason.into(),
            body: None,
        }
    }

    /// Create a login failure keeping the raw response page
    pub fn login_failed_with_body(reason: impl Into<String>, body: impl Into<String>) -> Self {
        Error::LoginFailed {
            reason: reason.into(),
            body: Some(body.into()),
        }
    }

    /// Create an info lookup error
    pub fn api(code: u32, message: impl Into<String>) -> Self {
        Error::ApiLookup {
            code,
            message: message.into(),
        }
    }

    /// Create a workflow error carrying an original message and code
    pub fn workflow(message: impl Into<String>, code: u32) -> Self {
        Error::Workflow {
            message: message.into(),
            code,
        }
    }

    /// Check if this is a transport-level error
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Network(_))
    }

    /// Check if retrying the whole workflow can succeed
    ///
    /// Rebid means the floor moved, so a fresh attempt with a higher
    /// amount is expected to go through.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::Network(_) | Error::RebidRequired { .. }
        )
    }

    /// Check if this error carries a captcha challenge
    pub fn is_captcha(&self) -> bool {
        matches!(self, Error::CaptchaRequired(_))
    }

    /// Numeric code where the error kind defines one
    ///
    /// Extraction and workflow errors keep the codes the result pages
    /// are reported under: empty document 10, missing form and floor
    /// rejection 20, unclassified result page 50, lookup codes as
    /// returned by the info endpoint.
    pub fn code(&self) -> Option<u32> {
        match self {
            Error::EmptyDocument => Some(10),
            Error::FormNotFound => Some(20),
            Error::PriceBelowFloor { .. } => Some(20),
            Error::UnexpectedOutcome(_) => Some(50),
            Error::ApiLookup { code, .. } => Some(*code),
            Error::Workflow { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::EmptyDocument.code(), Some(10));
        assert_eq!(Error::FormNotFound.code(), Some(20));
        assert_eq!(Error::PriceBelowFloor { floor: 500 }.code(), Some(20));
        assert_eq!(Error::UnexpectedOutcome("oops".into()).code(), Some(50));
        assert_eq!(Error::api(301, "Auction not found").code(), Some(301));
        assert_eq!(Error::workflow("no form", 20).code(), Some(20));
        assert_eq!(Error::LoggedOff.code(), None);
    }

    #[test]
    fn test_floor_message() {
        let err = Error::PriceBelowFloor { floor: 500 };
        assert_eq!(err.to_string(), "Price must be upper or equal 500");
    }

    #[test]
    fn test_recoverable() {
        assert!(Error::RebidRequired { floor: Some(600) }.is_recoverable());
        assert!(Error::network("connection reset").is_recoverable());
        assert!(!Error::AuctionEnded.is_recoverable());
        assert!(!Error::login_failed("bad credentials").is_recoverable());
    }

    #[test]
    fn test_login_failed_keeps_body() {
        let err = Error::login_failed_with_body("unexpected response", "<html>weird</html>");
        if let Error::LoginFailed { body, .. } = &err {
            assert_eq!(body.as_deref(), Some("<html>weird</html>"));
        } else {
            panic!("Expected LoginFailed");
        }
        assert_eq!(err.to_string(), "Login failed: unexpected response");
    }
}
