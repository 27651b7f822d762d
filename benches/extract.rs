// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use huuto::scrape::{bidding_lots, hidden_fields};
use huuto::SiteProfile;

fn form_extraction_benchmark(c: &mut Criterion) {
    let html = r#"
        <!DOCTYPE html>
        <html>
        <body>
            <form method="post" action="/jp/show/bid_preview">
                <input type="hidden" name=".crumb" value="8a61c9f2">
                <input type="hidden" name="aID" value="x000000000">
                <input type="hidden" name="setPrice" value="500">
                <input type="hidden" name="mnewsoptin" value="1">
                <input type="hidden" name="Bid" value="">
                <input type="hidden" name="lastBid" value="480">
                <input type="hidden" name="Duration" value="7">
                <input type="hidden" name="acc" value="jp">
                <input type="text" name="visible" value="ignored">
            </form>
        </body>
        </html>
    "#;

    c.bench_function("hidden_fields", |b| {
        b.iter(|| black_box(hidden_fields(black_box(html))))
    });
}

fn listing_extraction_benchmark(c: &mut Criterion) {
    let profile = SiteProfile::new();
    let html = listing_page();

    c.bench_function("bidding_lots", |b| {
        b.iter(|| {
            black_box(bidding_lots(
                black_box(&html),
                profile.lot_table_rows,
                &profile.unit_tokens,
            ))
        })
    });
}

fn listing_page() -> String {
    let mut rows = String::from(
        "<tr><td>Photo</td><td>Auction</td><td>Price</td><td>Bids</td>\
         <td>Seller</td><td>Bidder</td><td>Ends</td></tr>\n",
    );
    for n in 0..7 {
        rows.push_str(&format!(
            "<tr><td><img src=\"thumb{0}.jpg\"></td>\
             <td><a href=\"https://page.auctions.yahoo.co.jp/jp/auction/b10000000{0}\">Lot {0}</a></td>\
             <td>1,{0}00円</td><td>{0}</td><td>vendor_{0}</td><td>bidder_{0}</td><td>{0}日</td></tr>\n",
            n
        ));
    }

    format!(
        "<html><body><table><tbody>\n{}</tbody></table></body></html>",
        rows
    )
}

criterion_group!(
    benches,
    form_extraction_benchmark,
    listing_extraction_benchmark
);
criterion_main!(benches);
