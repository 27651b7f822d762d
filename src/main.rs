// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Huuto CLI - Auction Site Automation Client
//!
//! Example usage and demonstration of the huuto library.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use huuto::{AuctionClient, AuctionRecord, ClientConfig, Error};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("huuto=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "login" => run_login().await,
        "captcha" => {
            if args.len() < 4 {
                eprintln!("Usage: huuto captcha <id> <answer>");
                return ExitCode::from(1);
            }
            answer_captcha(&args[2], &args[3]).await
        }
        "status" => show_status().await,
        "info" => {
            if args.len() < 3 {
                eprintln!("Usage: huuto info <auction_id>");
                return ExitCode::from(1);
            }
            show_info(&args[2]).await
        }
        "page-info" => {
            if args.len() < 3 {
                eprintln!("Usage: huuto page-info <auction_id>");
                return ExitCode::from(1);
            }
            show_page_info(&args[2]).await
        }
        "bid" => {
            if args.len() < 4 {
                eprintln!("Usage: huuto bid <auction_id> <yen>");
                return ExitCode::from(1);
            }
            place_bid(&args[2], &args[3]).await
        }
        "won" => list_won(parse_page(args.get(2))).await,
        "bidding" => list_bidding(parse_page(args.get(2))).await,
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("huuto {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"Huuto - Auction Site Automation Client

USAGE:
    huuto <COMMAND> [ARGS]

COMMANDS:
    login                    Sign in and save the session cookies
    captcha <id> <answer>    Answer a captcha challenge and finish signing in
    status                   Check whether the saved session is still signed in
    info <auction_id>        Look up an auction through the info endpoint
    page-info <auction_id>   Look up an auction by scraping its item page
    bid <auction_id> <yen>   Place a bid, preview then placement
    won [page]               List auctions the account has won
    bidding [page]           List auctions the account is bidding on
    help                     Show this help message
    version                  Show version information

ENVIRONMENT:
    HUUTO_USERNAME    Account login id
    HUUTO_PASSWORD    Account password
    HUUTO_APP_ID      Application id for the info endpoint
    HUUTO_COOKIES     Session cookie file (default: huuto-cookies.json)

EXAMPLES:
    huuto login
    huuto info x000000000
    huuto bid x000000000 1500
    huuto won 2

For more information, see: https://github.com/bountyyfi/huuto
"#
    );
}

fn build_client() -> Option<AuctionClient> {
    let username = env::var("HUUTO_USERNAME").unwrap_or_default();
    let password = env::var("HUUTO_PASSWORD").unwrap_or_default();
    if username.is_empty() || password.is_empty() {
        eprintln!("Set HUUTO_USERNAME and HUUTO_PASSWORD first");
        return None;
    }

    let mut config = ClientConfig::new(username, password);
    if let Ok(app_id) = env::var("HUUTO_APP_ID") {
        config = config.app_id(app_id);
    }

    match AuctionClient::new(config) {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            None
        }
    }
}

fn cookie_path() -> PathBuf {
    env::var("HUUTO_COOKIES")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("huuto-cookies.json"))
}

fn restore_cookies(client: &AuctionClient) {
    let path = cookie_path();
    if let Ok(blob) = fs::read(&path) {
        if let Err(e) = client.import_cookies(&blob) {
            eprintln!("Ignoring unreadable cookie file {}: {}", path.display(), e);
        }
    }
}

fn save_cookies(client: &AuctionClient) {
    let path = cookie_path();
    match client.export_cookies() {
        Ok(blob) => {
            if let Err(e) = fs::write(&path, blob) {
                eprintln!("Failed to write cookie file {}: {}", path.display(), e);
            } else {
                println!("Session saved to {}", path.display());
            }
        }
        Err(e) => eprintln!("Failed to serialize cookies: {}", e),
    }
}

fn parse_page(arg: Option<&String>) -> u32 {
    arg.and_then(|text| text.parse().ok()).unwrap_or(1)
}

fn print_record(record: &AuctionRecord) {
    match serde_json::to_string_pretty(record) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to render record: {}", e),
    }
}

async fn run_login() -> ExitCode {
    let client = match build_client() {
        Some(c) => c,
        None => return ExitCode::from(1),
    };

    match client.login().await {
        Ok(()) => {
            println!("Logged in");
            save_cookies(&client);
            ExitCode::SUCCESS
        }
        Err(Error::CaptchaRequired(challenge)) => {
            // The retry must run over the same session cookies.
            save_cookies(&client);
            eprintln!("Captcha required: {}", challenge.url);
            eprintln!("Solve it and run: huuto captcha {} <answer>", challenge.id);
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Login failed: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn answer_captcha(captcha_id: &str, answer: &str) -> ExitCode {
    let client = match build_client() {
        Some(c) => c,
        None => return ExitCode::from(1),
    };
    restore_cookies(&client);

    match client.login_with_captcha(captcha_id, answer).await {
        Ok(()) => {
            println!("Logged in");
            save_cookies(&client);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Captcha login failed: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn show_status() -> ExitCode {
    let client = match build_client() {
        Some(c) => c,
        None => return ExitCode::from(1),
    };
    restore_cookies(&client);

    match client.is_logged_in().await {
        Ok(true) => {
            println!("Signed in as {}", client.config().username);
            ExitCode::SUCCESS
        }
        Ok(false) => {
            println!("Not signed in");
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("Status check failed: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn show_info(auction_id: &str) -> ExitCode {
    let mut client = match build_client() {
        Some(c) => c,
        None => return ExitCode::from(1),
    };

    match client.auction_info(auction_id).await {
        Ok(record) => {
            print_record(&record);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Lookup failed: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn show_page_info(auction_id: &str) -> ExitCode {
    let mut client = match build_client() {
        Some(c) => c,
        None => return ExitCode::from(1),
    };

    match client.auction_info_from_page(auction_id).await {
        Ok(record) => {
            print_record(&record);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Lookup failed: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn place_bid(auction_id: &str, price_text: &str) -> ExitCode {
    let price: u64 = match price_text.parse() {
        Ok(p) => p,
        Err(_) => {
            eprintln!("Price must be a whole number of yen");
            return ExitCode::from(1);
        }
    };

    let mut client = match build_client() {
        Some(c) => c,
        None => return ExitCode::from(1),
    };
    restore_cookies(&client);

    match client.bid(auction_id, price).await {
        Ok(()) => {
            println!("Bid placed: {} at {} JPY", auction_id, price);
            save_cookies(&client);
            ExitCode::SUCCESS
        }
        Err(Error::RebidRequired { floor }) => {
            match floor {
                Some(f) => eprintln!("Rebid required: floor moved to {}", f),
                None => eprintln!("Rebid required: floor moved"),
            }
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Bid failed: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn list_won(page: u32) -> ExitCode {
    let client = match build_client() {
        Some(c) => c,
        None => return ExitCode::from(1),
    };
    restore_cookies(&client);

    match client.won_ids(page).await {
        Ok(Some(ids)) => {
            println!("=== Won auctions (page {}) ===", page);
            for id in &ids {
                println!("  - {}", id);
            }
            println!("\n{} auctions", ids.len());
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("Nothing won on page {}", page);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Listing failed: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn list_bidding(page: u32) -> ExitCode {
    let client = match build_client() {
        Some(c) => c,
        None => return ExitCode::from(1),
    };
    restore_cookies(&client);

    match client.bidding_lots(page).await {
        Ok(lots) => {
            if lots.is_empty() {
                println!("No active bids on page {}", page);
                return ExitCode::SUCCESS;
            }

            println!("=== Active bids (page {}) ===", page);
            for lot in &lots {
                println!(
                    "  {} | {} | {} JPY | {} bids | ends in {}",
                    lot.id, lot.title, lot.price, lot.bids, lot.end
                );
            }
            println!("\n{} lots", lots.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Listing failed: {}", e);
            ExitCode::from(1)
        }
    }
}
