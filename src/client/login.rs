// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Login handshake
//!
//! The site gates its login form behind an anti-automation token that page
//! scripts copy into a hidden field before submit. The handshake fetches the
//! form, lifts the token and the server-issued hidden fields, resubmits them
//! with the credentials, and reads the outcome off the response page: a
//! welcome banner, a captcha challenge, a restriction notice or an
//! unclassified page kept for diagnosis.

use super::AuctionClient;
use crate::error::{Error, Result};
use crate::scrape::{self, FormSnapshot};

impl AuctionClient {
    /// Run the password login handshake
    ///
    /// On a captcha challenge the error carries the challenge id and image
    /// URL; solve it out of band and continue with
    /// [`AuctionClient::login_with_captcha`].
    pub async fn login(&self) -> Result<()> {
        // The login endpoint expects the cookies the landing page hands out.
        self.session().get(&self.profile().landing_url, &[]).await?;

        let form_page = self
            .session()
            .get(&self.profile().login_url, &self.profile().login_query())
            .await?;

        let token = scrape::session_token(&form_page, self.profile())
            .ok_or(Error::TokenNotFound)?;
        let hidden = scrape::hidden_fields(&form_page)
            .map_err(|err| Error::login_failed(err.to_string()))?;
        let form = self.credential_form(hidden, &token);

        self.pause_before_submit().await;
        let outcome = self
            .session()
            .post(&self.profile().login_url, form.as_pairs())
            .await?;
        self.classify_login_page(&outcome)
    }

    /// Answer a pending captcha challenge and finish the handshake
    ///
    /// The retry submit reopens the login form with a fresh token and a
    /// fresh set of hidden fields; the credential submit then runs exactly
    /// as in [`AuctionClient::login`].
    pub async fn login_with_captcha(&self, captcha_id: &str, answer: &str) -> Result<()> {
        let retry = self.profile().captcha_retry_fields(captcha_id, answer);
        let form_page = self
            .session()
            .post(&self.profile().login_url, &retry)
            .await?;

        let token = scrape::session_token(&form_page, self.profile())
            .ok_or(Error::TokenNotFound)?;
        let hidden = scrape::hidden_fields(&form_page)?;
        let form = self.credential_form(hidden, &token);

        self.pause_before_submit().await;
        let outcome = self
            .session()
            .post(&self.profile().login_url, form.as_pairs())
            .await?;

        if scrape::confirms_login(&outcome, &self.config().username, self.profile()) {
            tracing::info!(user = %self.config().username, "Logged in after captcha");
            Ok(())
        } else {
            Err(Error::login_failed_with_body(
                "No welcome banner after the captcha retry",
                outcome,
            ))
        }
    }

    /// Build the credential submit from the harvested hidden fields
    ///
    /// The no-JS field is dropped; a page run by real scripts does not
    /// submit it. The token lands in its script-assigned field, and the
    /// username goes into both name fields the way the form scripts fill
    /// them.
    fn credential_form(&self, hidden: FormSnapshot, token: &str) -> FormSnapshot {
        let profile = self.profile();
        let config = self.config();

        let mut form = FormSnapshot::new();
        for (name, value) in hidden.iter() {
            if *name == profile.nojs_field {
                continue;
            }
            form.set(name.clone(), value.clone());
        }
        form.set(profile.token_field.clone(), token);
        form.set(profile.login_field.clone(), config.username.clone());
        form.set(profile.username_field.clone(), config.username.clone());
        form.set(profile.password_field.clone(), config.password.clone());
        form.set(profile.persistent_field.clone(), "y");
        for (name, value) in &profile.auth_fields {
            form.set(name.clone(), value.clone());
        }
        form
    }

    fn classify_login_page(&self, body: &str) -> Result<()> {
        let profile = self.profile();
        if scrape::confirms_login(body, &self.config().username, profile) {
            tracing::info!(user = %self.config().username, "Logged in");
            return Ok(());
        }
        if body.trim().is_empty() {
            return Err(Error::login_failed_with_body(
                "Empty response after submit",
                body,
            ));
        }
        if let Some(id) = scrape::captcha_id(body, profile)? {
            tracing::debug!(captcha = %id, "Login challenged with a captcha");
            return Err(Error::CaptchaRequired(profile.captcha_challenge(id)));
        }
        if body.contains(&profile.blocked_marker) {
            tracing::warn!(user = %self.config().username, "Site restricted the account");
            return Err(Error::LoginBlocked);
        }
        Err(Error::login_failed_with_body(
            "No welcome banner on the response page",
            body,
        ))
    }
}
