// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Live HTTP session over reqwest

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use url::Url;

use super::cookie::CookieJar;
use super::{Session, DEFAULT_USER_AGENT};
use crate::error::{Error, Result};

/// Transport settings for [`HttpSession`]
#[derive(Debug, Clone)]
pub struct HttpSessionConfig {
    /// User agent string
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Redirect hops followed per request
    pub max_redirects: usize,
}

impl Default for HttpSessionConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            max_redirects: 10,
        }
    }
}

/// Live session with an explicit redirect loop
///
/// Redirects are not delegated to reqwest: the login handshake sets session
/// cookies on intermediate hops, and every hop's Set-Cookie must land in the
/// jar before the next request goes out. The form body is sent on the first
/// hop only; every later hop is a plain GET.
#[derive(Clone)]
pub struct HttpSession {
    client: Client,
    config: HttpSessionConfig,
    jar: CookieJar,
}

impl HttpSession {
    /// Create a session with default transport settings
    pub fn new() -> Result<Self> {
        Self::with_config(HttpSessionConfig::default())
    }

    /// Create a session with custom transport settings
    pub fn with_config(config: HttpSessionConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            client,
            config,
            jar: CookieJar::new(),
        })
    }

    /// Access the cookie jar
    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }

    async fn run(
        &self,
        method: Method,
        url: &str,
        query: &[(String, String)],
        form: Option<&[(String, String)]>,
    ) -> Result<String> {
        let mut target = Url::parse(url)?;
        if !query.is_empty() {
            target
                .query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        let mut method = method;
        let mut form = form;

        for _ in 0..=self.config.max_redirects {
            let start = Instant::now();
            let mut builder = self.client.request(method.clone(), target.clone());

            if let Some(header) = self.jar.header_for(&target) {
                builder = builder.header(COOKIE, header);
            }
            if let Some(pairs) = form.take() {
                builder = builder.form(pairs);
            }

            let response = builder.send().await?;
            let status = response.status();

            for value in response.headers().get_all(SET_COOKIE) {
                if let Ok(raw) = value.to_str() {
                    self.jar.store_from_header(raw, &target);
                }
            }

            tracing::debug!(
                method = %method,
                url = %target,
                status = status.as_u16(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Request"
            );

            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .ok_or_else(|| {
                        Error::network(format!("Redirect without location from {}", target))
                    })?;
                target = target.join(location)?;
                method = Method::GET;
                continue;
            }

            return Ok(response.text().await?);
        }

        Err(Error::network(format!(
            "Stopped after {} redirects at {}",
            self.config.max_redirects, target
        )))
    }
}

#[async_trait]
impl Session for HttpSession {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<String> {
        self.run(Method::GET, url, query, None).await
    }

    async fn post(&self, url: &str, form: &[(String, String)]) -> Result<String> {
        self.run(Method::POST, url, &[], Some(form)).await
    }

    fn export_cookies(&self) -> Result<Vec<u8>> {
        Ok(self.jar.to_json()?)
    }

    fn import_cookies(&self, blob: &[u8]) -> Result<()> {
        self.jar.load_json(blob)?;
        Ok(())
    }
}
