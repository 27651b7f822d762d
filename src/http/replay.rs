// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Scripted offline session
//!
//! Serves canned bodies instead of touching the network. Workflows run
//! unchanged against it, which is how the scenario tests and dry runs drive
//! the login and bid pipelines end to end.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::Session;
use crate::error::Result;

type FormPredicate = Box<dyn Fn(&[(String, String)]) -> bool + Send + Sync>;

struct Route {
    method: &'static str,
    url_part: String,
    form_matches: Option<FormPredicate>,
    body: String,
}

/// One request seen by a [`ReplaySession`], in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// HTTP method
    pub method: String,
    /// Requested URL, query pairs appended for GETs
    pub url: String,
    /// Form pairs for POSTs, empty for GETs
    pub form: Vec<(String, String)>,
}

/// Session answering from a script instead of the network
///
/// Routes match on a URL fragment, plus an optional form predicate for
/// POSTs; first match wins. An unmatched request is answered with an empty
/// body, which the extraction layer rejects as an empty document, so a
/// missing script line surfaces as a classified error instead of a hang.
/// URL fragments are matched verbatim, without percent-encoding.
#[derive(Clone, Default)]
pub struct ReplaySession {
    routes: Arc<Mutex<Vec<Route>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    cookies: Arc<Mutex<Vec<u8>>>,
}

impl ReplaySession {
    /// Create a session with no scripted responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a body for GETs whose URL contains the fragment
    pub fn on_get(&self, url_part: impl Into<String>, body: impl Into<String>) -> &Self {
        self.routes.lock().push(Route {
            method: "GET",
            url_part: url_part.into(),
            form_matches: None,
            body: body.into(),
        });
        self
    }

    /// Serve a body for POSTs whose URL contains the fragment
    pub fn on_post(&self, url_part: impl Into<String>, body: impl Into<String>) -> &Self {
        self.routes.lock().push(Route {
            method: "POST",
            url_part: url_part.into(),
            form_matches: None,
            body: body.into(),
        });
        self
    }

    /// Serve a body for POSTs matching the fragment and the form predicate
    pub fn on_post_when<F>(
        &self,
        url_part: impl Into<String>,
        predicate: F,
        body: impl Into<String>,
    ) -> &Self
    where
        F: Fn(&[(String, String)]) -> bool + Send + Sync + 'static,
    {
        self.routes.lock().push(Route {
            method: "POST",
            url_part: url_part.into(),
            form_matches: Some(Box::new(predicate)),
            body: body.into(),
        });
        self
    }

    /// Requests seen so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    fn serve(&self, method: &str, url: &str, form: &[(String, String)]) -> String {
        self.calls.lock().push(RecordedCall {
            method: method.to_string(),
            url: url.to_string(),
            form: form.to_vec(),
        });

        let routes = self.routes.lock();
        for route in routes.iter() {
            if route.method != method || !url.contains(&route.url_part) {
                continue;
            }
            if let Some(ref matches) = route.form_matches {
                if !matches(form) {
                    continue;
                }
            }
            return route.body.clone();
        }

        tracing::warn!(method, url, "No scripted response, serving empty body");
        String::new()
    }
}

#[async_trait]
impl Session for ReplaySession {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<String> {
        let full = append_query(url, query);
        Ok(self.serve("GET", &full, &[]))
    }

    async fn post(&self, url: &str, form: &[(String, String)]) -> Result<String> {
        Ok(self.serve("POST", url, form))
    }

    fn export_cookies(&self) -> Result<Vec<u8>> {
        Ok(self.cookies.lock().clone())
    }

    fn import_cookies(&self, blob: &[u8]) -> Result<()> {
        *self.cookies.lock() = blob.to_vec();
        Ok(())
    }

    fn offline(&self) -> bool {
        true
    }
}

fn append_query(url: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        return url.to_string();
    }

    let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, sep, pairs.join("&"))
}
