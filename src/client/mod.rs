// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Auction site client
//!
//! High-level API for the login handshake, auction info lookups, account
//! listings and the two-stage bid pipeline.

mod bid;
mod client;
mod login;

pub use client::AuctionClient;
