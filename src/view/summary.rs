//! Card-sized summaries of listings and the best-bid reduction

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::config::ClientOptions;
use crate::listings::{Bid, Listing};
use crate::media::Media;

/// Longest description shown on a card before truncation
pub const SUMMARY_DESCRIPTION_CHARS: usize = 90;

/// Most tags shown on a card
pub const SUMMARY_TAGS: usize = 3;

/// Whether a listing still accepts bids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStatus {
    Active,
    Ended,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "Active",
            ListingStatus::Ended => "Ended",
        }
    }
}

/// A listing shaped for a card
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub cover: Media,
    pub seller_name: String,
    pub bid_count: u64,
    pub highest_bid: f64,
    pub ends_at: Option<DateTime<Utc>>,
    pub status: ListingStatus,
}

impl ListingSummary {
    pub fn from_listing(listing: &Listing, now: DateTime<Utc>, options: &ClientOptions) -> Self {
        let title = if listing.title.trim().is_empty() {
            "Untitled listing".to_string()
        } else {
            listing.title.clone()
        };

        let cover = listing
            .media
            .first()
            .cloned()
            .unwrap_or_else(|| Media::new(&options.listing_placeholder, &title));

        let status = if listing.is_ended(now) {
            ListingStatus::Ended
        } else {
            ListingStatus::Active
        };

        Self {
            id: listing.id.clone(),
            description: truncate_description(listing.description.as_deref()),
            tags: listing.tags.iter().take(SUMMARY_TAGS).cloned().collect(),
            cover,
            seller_name: listing
                .seller_name()
                .unwrap_or("Unknown seller")
                .to_string(),
            bid_count: listing.bid_count(),
            highest_bid: listing.highest_bid(),
            ends_at: listing.ends_at,
            status,
            title,
        }
    }
}

fn truncate_description(description: Option<&str>) -> String {
    match description.filter(|d| !d.is_empty()) {
        None => "No description.".to_string(),
        Some(d) if d.chars().count() > SUMMARY_DESCRIPTION_CHARS => {
            let mut short: String = d.chars().take(SUMMARY_DESCRIPTION_CHARS).collect();
            short.push('…');
            short
        }
        Some(d) => d.to_string(),
    }
}

/// Reduce a user's bids to one per listing.
///
/// Each listing keeps its highest bid; on equal amounts the later `created` wins.
/// Bids without an embedded listing are skipped. Output follows the order in which
/// each listing first appears in `bids`.
pub fn best_bid_per_listing(bids: &[Bid]) -> Vec<Bid> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut best: Vec<Bid> = Vec::new();

    for bid in bids {
        let Some(id) = bid.listing_id() else {
            continue;
        };
        match index.get(id) {
            Some(&i) => {
                let current = &best[i];
                let better = bid.amount > current.amount
                    || (bid.amount == current.amount && bid.created > current.created);
                if better {
                    best[i] = bid.clone();
                }
            }
            None => {
                index.insert(id, best.len());
                best.push(bid.clone());
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn bid(listing: &str, amount: f64, created: &str) -> Bid {
        serde_json::from_value(json!({
            "amount": amount,
            "created": created,
            "listing": {"id": listing}
        }))
        .unwrap()
    }

    #[test]
    fn best_bid_keeps_highest_amount_per_listing() {
        let bids = vec![
            bid("a", 10.0, "2026-01-01T00:00:00Z"),
            bid("b", 5.0, "2026-01-01T00:00:00Z"),
            bid("a", 30.0, "2026-01-02T00:00:00Z"),
            bid("a", 20.0, "2026-01-03T00:00:00Z"),
        ];
        let best = best_bid_per_listing(&bids);

        assert_eq!(best.len(), 2);
        assert_eq!(best[0].listing_id(), Some("a"));
        assert_eq!(best[0].amount, 30.0);
        assert_eq!(best[1].listing_id(), Some("b"));
    }

    #[test]
    fn best_bid_prefers_later_bid_on_ties() {
        let bids = vec![
            bid("a", 10.0, "2026-01-02T00:00:00Z"),
            bid("a", 10.0, "2026-01-05T00:00:00Z"),
            bid("a", 10.0, "2026-01-03T00:00:00Z"),
        ];
        let best = best_bid_per_listing(&bids);
        assert_eq!(best.len(), 1);
        assert_eq!(
            best[0].created,
            Some(Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn best_bid_skips_bids_without_listing() {
        let orphan: Bid = serde_json::from_value(json!({"amount": 99})).unwrap();
        let best = best_bid_per_listing(&[orphan, bid("a", 1.0, "2026-01-01T00:00:00Z")]);
        assert_eq!(best.len(), 1);
        assert!(best_bid_per_listing(&[]).is_empty());
    }

    #[test]
    fn summary_applies_fallbacks() {
        let options = ClientOptions::default();
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let listing: Listing = serde_json::from_value(json!({
            "id": "l1",
            "title": "",
            "description": "x".repeat(120),
            "tags": ["a", "b", "c", "d"],
            "endsAt": "2026-05-01T00:00:00Z",
            "_count": {"bids": 4}
        }))
        .unwrap();

        let summary = ListingSummary::from_listing(&listing, now, &options);
        assert_eq!(summary.title, "Untitled listing");
        assert_eq!(summary.description.chars().count(), 91);
        assert!(summary.description.ends_with('…'));
        assert_eq!(summary.tags, vec!["a", "b", "c"]);
        assert_eq!(summary.cover.url, options.listing_placeholder);
        assert_eq!(summary.seller_name, "Unknown seller");
        assert_eq!(summary.bid_count, 4);
        assert_eq!(summary.highest_bid, 0.0);
        assert_eq!(summary.status, ListingStatus::Ended);
    }

    #[test]
    fn summary_of_active_listing_with_bids() {
        let options = ClientOptions::default();
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let listing: Listing = serde_json::from_value(json!({
            "id": "l2",
            "title": "Oak chair",
            "description": "Sturdy",
            "media": [{"url": "https://x.test/chair.jpg", "alt": "chair"}],
            "endsAt": "2026-07-01T00:00:00Z",
            "seller": {"name": "seller_1"},
            "bids": [{"amount": 5}, {"amount": 12}, {"amount": 7}]
        }))
        .unwrap();

        let summary = ListingSummary::from_listing(&listing, now, &options);
        assert_eq!(summary.description, "Sturdy");
        assert_eq!(summary.cover.url, "https://x.test/chair.jpg");
        assert_eq!(summary.seller_name, "seller_1");
        assert_eq!(summary.bid_count, 3);
        assert_eq!(summary.highest_bid, 12.0);
        assert_eq!(summary.status.as_str(), "Active");
    }
}
