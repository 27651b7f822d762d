// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client configuration

use std::time::Duration;

use crate::http::DEFAULT_USER_AGENT;

/// Shortest pause allowed before the login submit in live mode.
/// The site declines logins that arrive too fast after the form was served.
pub const MIN_SUBMIT_DELAY: Duration = Duration::from_secs(1);

/// Floor validation rule applied to bid amounts before any request is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricePolicy {
    /// Accept a bid equal to the floor
    #[default]
    AtLeastFloor,
    /// Require a bid strictly over the floor
    AboveFloor,
}

impl PricePolicy {
    /// Check whether an amount fails this policy against a floor price
    pub fn rejects(&self, price: u64, floor: u64) -> bool {
        match self {
            PricePolicy::AtLeastFloor => price < floor,
            PricePolicy::AboveFloor => price <= floor,
        }
    }
}

/// Configuration for the auction client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Account username
    pub username: String,
    /// Account password
    pub password: String,
    /// Application id for the structured info endpoint
    pub app_id: String,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Pause before the login submit, clamped to [`MIN_SUBMIT_DELAY`] live
    pub submit_delay: Duration,
    /// Floor validation rule for bid amounts
    pub price_policy: PricePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            app_id: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            submit_delay: Duration::from_secs(3),
            price_policy: PricePolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Configuration for the given account with default transport settings
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// Set the application id for the structured info endpoint
    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    /// Set the User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the pause before the login submit
    pub fn submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    /// Set the floor validation rule
    pub fn price_policy(mut self, policy: PricePolicy) -> Self {
        self.price_policy = policy;
        self
    }
}
