// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Lot listing extraction from the status pages
//!
//! The listing tables carry no id or class, so they are located by shape:
//! the first table body with the configured number of direct rows is taken
//! to be the lot table. Same-shaped unrelated tables are accepted as false
//! positives; that is the documented contract of the heuristic, not a bug.

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use super::parse_document;
use crate::error::Result;

/// One auction row from a status listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LotListing {
    /// Auction id, taken from the item link
    pub id: String,
    /// Item title
    pub title: String,
    /// Current price, locale units translated
    pub price: String,
    /// Bid count
    pub bids: String,
    /// Selling vendor
    pub vendor: String,
    /// Current highest bidder
    pub bidder: String,
    /// Remaining or closing time, locale units translated
    pub end: String,
}

/// Locate the lot table by shape and return its direct rows
///
/// Scans tables in document order; the first direct table body whose
/// direct row count equals `expected_rows` wins.
pub fn find_lot_table(document: &Html, expected_rows: usize) -> Option<Vec<ElementRef<'_>>> {
    let table_selector = Selector::parse("table").unwrap();

    for table in document.select(&table_selector) {
        for child in table.children().filter_map(ElementRef::wrap) {
            if child.value().name() != "tbody" {
                continue;
            }
            let rows: Vec<ElementRef> = child
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|el| el.value().name() == "tr")
                .collect();
            if rows.len() == expected_rows {
                return Some(rows);
            }
        }
    }

    None
}

/// Auction ids from a won-lots page
///
/// `None` when the page has no shape-matched table, as opposed to a table
/// with zero data rows. Callers need the distinction: a missing table means
/// the page itself was not the expected listing.
pub fn won_ids(body: &str, expected_rows: usize) -> Result<Option<Vec<String>>> {
    let document = parse_document(body)?;
    let rows = match find_lot_table(&document, expected_rows) {
        Some(rows) => rows,
        None => return Ok(None),
    };

    let mut ids = Vec::new();
    let mut header_seen = false;

    for row in rows {
        let cells: Vec<ElementRef> = row.children().filter_map(ElementRef::wrap).collect();
        if cells.is_empty() {
            continue;
        }
        if !header_seen {
            header_seen = true;
            continue;
        }
        if let Some(cell) = cells.get(1) {
            ids.push(cell.text().collect::<String>().trim().to_string());
        }
    }

    Ok(Some(ids))
}

/// Lot rows from a bidding-lots page, empty when no table matches
///
/// Columns are read by fixed index: 1 carries the item link and title, 2
/// the price, 3 the bid count, 4 the vendor, 5 the bidder, 6 the end time.
/// Columns past 6 are ignored. A data row whose link cell has no anchor is
/// skipped with a debug line.
pub fn bidding_lots(
    body: &str,
    expected_rows: usize,
    units: &[(String, String)],
) -> Result<Vec<LotListing>> {
    let document = parse_document(body)?;
    let rows = match find_lot_table(&document, expected_rows) {
        Some(rows) => rows,
        None => return Ok(Vec::new()),
    };

    let anchor_selector = Selector::parse("a").unwrap();
    let mut lots = Vec::new();
    let mut header_seen = false;

    'rows: for row in rows {
        let cells: Vec<ElementRef> = row.children().filter_map(ElementRef::wrap).collect();
        if cells.is_empty() {
            continue;
        }
        if !header_seen {
            header_seen = true;
            continue;
        }

        let mut lot = LotListing::default();
        for (index, cell) in cells.iter().enumerate().take(7) {
            match index {
                1 => {
                    let href = cell
                        .select(&anchor_selector)
                        .next()
                        .and_then(|a| a.value().attr("href"));
                    let Some(href) = href else {
                        tracing::debug!("Listing row without an item link, skipped");
                        continue 'rows;
                    };
                    lot.id = href.rsplit('/').next().unwrap_or_default().to_string();
                    lot.title = cell.text().collect::<String>().trim().to_string();
                }
                2 => lot.price = translate_units(&cell.text().collect::<String>(), units),
                3 => lot.bids = cell.text().collect::<String>().trim().to_string(),
                4 => lot.vendor = cell.text().collect::<String>().trim().to_string(),
                5 => lot.bidder = cell.text().collect::<String>().trim().to_string(),
                6 => lot.end = translate_units(&cell.text().collect::<String>(), units),
                _ => {}
            }
        }

        lots.push(lot);
    }

    Ok(lots)
}

/// Apply the ordered locale token replacements, then trim
fn translate_units(text: &str, units: &[(String, String)]) -> String {
    let mut out = text.to_string();
    for (from, to) in units {
        out = out.replace(from.as_str(), to);
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::SiteProfile;

    fn won_page() -> String {
        let mut rows = String::from("<tr><td>No</td><td>Auction ID</td></tr>");
        for i in 1..=7 {
            rows.push_str(&format!("<tr><td>{}</td><td> x{:0>9} </td></tr>", i, i));
        }
        format!("<html><body><table><tbody>{}</tbody></table></body></html>", rows)
    }

    const BIDDING_PAGE: &str = r#"<html><body>
        <table><tbody><tr><td>nav</td></tr><tr><td>nav</td></tr></tbody></table>
        <table><tbody>
            <tr><td>c</td><td>Item</td><td>Price</td><td>Bids</td><td>Vendor</td><td>Bidder</td><td>End</td></tr>
            <tr>
                <td><input type="checkbox"></td>
                <td><a href="https://page.auctions.yahoo.co.jp/jp/auction/q111111111">Old camera</a></td>
                <td>1,200円</td>
                <td>3</td>
                <td>vendor_a</td>
                <td>bidder_b</td>
                <td>1日</td>
                <td>extra</td>
            </tr>
            <tr>
                <td><input type="checkbox"></td>
                <td>withdrawn item</td>
                <td>500円</td>
                <td>0</td>
                <td>vendor_c</td>
                <td></td>
                <td>3時間</td>
            </tr>
            <tr>
                <td><input type="checkbox"></td>
                <td><a href="/jp/auction/w222222222">Tea set</a></td>
                <td>980円</td>
                <td>1</td>
                <td>vendor_d</td>
                <td>bidder_e</td>
                <td>30分</td>
            </tr>
            <tr></tr>
            <tr></tr>
            <tr></tr>
            <tr></tr>
        </tbody></table>
    </body></html>"#;

    #[test]
    fn test_won_ids_counts_data_rows() {
        let ids = won_ids(&won_page(), 8).unwrap().unwrap();
        assert_eq!(ids.len(), 7);
        assert_eq!(ids[0], "x000000001");
        assert_eq!(ids[6], "x000000007");
    }

    #[test]
    fn test_won_ids_none_without_matching_table() {
        let body = "<html><body><p>no tables here</p></body></html>";
        assert!(won_ids(body, 8).unwrap().is_none());

        // A table of the wrong shape is not the lot table.
        let wrong = "<html><body><table><tbody><tr><td>a</td></tr></tbody></table></body></html>";
        assert!(won_ids(wrong, 8).unwrap().is_none());
    }

    #[test]
    fn test_first_shape_match_wins() {
        // Two same-shaped tables: the first is taken, false positive included.
        let mut rows = String::new();
        for i in 0..8 {
            rows.push_str(&format!("<tr><td>n</td><td>first{}</td></tr>", i));
        }
        let mut rows2 = String::new();
        for i in 0..8 {
            rows2.push_str(&format!("<tr><td>n</td><td>second{}</td></tr>", i));
        }
        let body = format!(
            "<html><body><table><tbody>{}</tbody></table><table><tbody>{}</tbody></table></body></html>",
            rows, rows2
        );

        let ids = won_ids(&body, 8).unwrap().unwrap();
        assert_eq!(ids[0], "first1");
    }

    #[test]
    fn test_bidding_lots_column_mapping() {
        let profile = SiteProfile::new();
        let lots = bidding_lots(BIDDING_PAGE, 8, &profile.unit_tokens).unwrap();

        assert_eq!(lots.len(), 2);

        assert_eq!(lots[0].id, "q111111111");
        assert_eq!(lots[0].title, "Old camera");
        assert_eq!(lots[0].price, "1200");
        assert_eq!(lots[0].bids, "3");
        assert_eq!(lots[0].vendor, "vendor_a");
        assert_eq!(lots[0].bidder, "bidder_b");
        assert_eq!(lots[0].end, "1day");

        assert_eq!(lots[1].id, "w222222222");
        assert_eq!(lots[1].end, "30min");
    }

    #[test]
    fn test_row_without_anchor_skipped() {
        let profile = SiteProfile::new();
        let lots = bidding_lots(BIDDING_PAGE, 8, &profile.unit_tokens).unwrap();
        assert!(lots.iter().all(|lot| lot.title != "withdrawn item"));
    }

    #[test]
    fn test_bidding_lots_empty_without_table() {
        let profile = SiteProfile::new();
        let lots = bidding_lots("<html><body></body></html>", 8, &profile.unit_tokens).unwrap();
        assert!(lots.is_empty());
    }

    #[test]
    fn test_translate_units_order_and_trim() {
        let profile = SiteProfile::new();
        assert_eq!(translate_units(" 12,000円 ", &profile.unit_tokens), "12000");
        assert_eq!(translate_units("2時間", &profile.unit_tokens), "2hour");
        assert_eq!(translate_units("5日", &profile.unit_tokens), "5day");
        assert_eq!(translate_units("45分", &profile.unit_tokens), "45min");
    }
}
