// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP session layer for the auction client
//!
//! One trait boundary over the wire: workflows speak [`Session`], production
//! code runs [`HttpSession`] over reqwest, tests and dry runs inject
//! [`ReplaySession`] with scripted bodies.

mod client;
mod cookie;
mod replay;

pub use client::{HttpSession, HttpSessionConfig};
pub use cookie::{Cookie, CookieJar};
pub use replay::{RecordedCall, ReplaySession};

use async_trait::async_trait;

use crate::error::Result;

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/6.0 (Windows; U; Windows NT 6.0; ja; rv:1.9.1.1) Gecko/20090715 Firefox/3.5.1 (.NET CLR 3.5.30729)";

/// One authenticated conversation with the site
///
/// Implementations own the cookie state across calls. Callers see body text
/// only; transport details never cross this boundary.
#[async_trait]
pub trait Session: Send + Sync {
    /// Fetch a page and return its body
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<String>;

    /// Submit a form and return the response body
    async fn post(&self, url: &str, form: &[(String, String)]) -> Result<String>;

    /// Export the cookie state as an opaque blob
    fn export_cookies(&self) -> Result<Vec<u8>>;

    /// Restore cookie state from a blob produced by `export_cookies`
    fn import_cookies(&self, blob: &[u8]) -> Result<()>;

    /// True when responses are served without touching the network
    fn offline(&self) -> bool {
        false
    }
}
