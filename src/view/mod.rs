//! View models over fetched listings and bids
//!
//! State is owned by the value and only replaced after a successful fetch; a
//! failed fetch is returned as an error and leaves what was shown before.

mod summary;

use std::collections::HashMap;

use crate::auth::Session;
use crate::config::ClientOptions;
use crate::error::Result;
use crate::listings::{Bid, Listing, Listings};
use crate::profiles::Profiles;

pub use summary::*;

/// Free-text search plus comma-separated tag tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedFilter {
    pub search: String,
    pub tags: String,
}

impl FeedFilter {
    pub fn new(search: &str, tags: &str) -> Self {
        Self {
            search: search.to_string(),
            tags: tags.to_string(),
        }
    }

    /// Case-insensitive substring of the title or the description
    fn matches_search(&self, listing: &Listing) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        listing.title.to_lowercase().contains(&needle)
            || listing
                .description
                .as_deref()
                .map_or(false, |d| d.to_lowercase().contains(&needle))
    }

    /// Every token must substring-match at least one tag of the listing
    fn matches_tags(&self, listing: &Listing) -> bool {
        let tags: Vec<String> = listing.tags.iter().map(|t| t.to_lowercase()).collect();
        self.tags
            .split(',')
            .map(|token| token.trim().to_lowercase())
            .filter(|token| !token.is_empty())
            .all(|token| tags.iter().any(|tag| tag.contains(&token)))
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        self.matches_search(listing) && self.matches_tags(listing)
    }
}

/// The active listings feed with search, tag filter and "show more" paging
#[derive(Debug, Clone)]
pub struct ListingFeed {
    listings: Vec<Listing>,
    filter: FeedFilter,
    visible_count: usize,
    page_size: usize,
    page_increment: usize,
}

impl ListingFeed {
    pub fn new(options: &ClientOptions) -> Self {
        Self {
            listings: Vec::new(),
            filter: FeedFilter::default(),
            visible_count: options.feed_page_size,
            page_size: options.feed_page_size,
            page_increment: options.feed_page_increment,
        }
    }

    /// Fetch the active feed. On success the listings are replaced and the cursor
    /// reset; on failure the previous state is kept.
    pub async fn load(&mut self, listings: &Listings, session: Option<&Session>) -> Result<()> {
        let fetched = listings.active(session).await?;
        log::debug!("feed loaded {} listings", fetched.len());
        self.listings = fetched;
        self.visible_count = self.page_size;
        Ok(())
    }

    /// Everything fetched, unfiltered
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn filter(&self) -> &FeedFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: FeedFilter) {
        self.filter = filter;
    }

    /// Listings passing the search and then the tag filter
    pub fn filtered(&self) -> Vec<&Listing> {
        self.listings
            .iter()
            .filter(|l| self.filter.matches_search(l))
            .filter(|l| self.filter.matches_tags(l))
            .collect()
    }

    /// The filtered listings up to the visible-count cursor
    pub fn visible(&self) -> Vec<&Listing> {
        let mut filtered = self.filtered();
        filtered.truncate(self.visible_count);
        filtered
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn reveal_more(&mut self) {
        self.visible_count += self.page_increment;
    }

    /// Whether filtered listings remain beyond the cursor
    pub fn has_more(&self) -> bool {
        self.visible_count < self.filtered().len()
    }
}

/// Which collection of a profile to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedSectionKind {
    Listings,
    Bids,
    Wins,
}

/// A listing together with the user's best bid on it
#[derive(Debug, Clone, PartialEq)]
pub struct BidEntry {
    pub listing: Listing,
    pub best_bid: Bid,
}

/// One of the profile collections, ready for display
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedSection {
    Listings(Vec<Listing>),
    Bids(Vec<BidEntry>),
    Wins(Vec<Listing>),
}

impl OwnedSection {
    pub fn len(&self) -> usize {
        match self {
            OwnedSection::Listings(items) | OwnedSection::Wins(items) => items.len(),
            OwnedSection::Bids(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Load one collection of `name`.
///
/// For bids the list is reduced to the best bid per listing and each listing is
/// re-fetched with seller and bids embedded. Listings that fail to load are dropped.
pub async fn fetch_owned_section(
    profiles: &Profiles,
    listings: &Listings,
    session: &Session,
    name: &str,
    kind: OwnedSectionKind,
) -> Result<OwnedSection> {
    match kind {
        OwnedSectionKind::Listings => Ok(OwnedSection::Listings(
            profiles.listings(session, name).await?,
        )),
        OwnedSectionKind::Wins => Ok(OwnedSection::Wins(profiles.wins(session, name).await?)),
        OwnedSectionKind::Bids => {
            let bids = profiles.bids(session, name).await?;
            let best = best_bid_per_listing(&bids);

            let ids: Vec<&str> = best.iter().filter_map(Bid::listing_id).collect();
            let mut fetched: HashMap<String, Listing> = listings
                .by_ids(session, ids)
                .await?
                .into_iter()
                .map(|listing| (listing.id.clone(), listing))
                .collect();

            let entries = best
                .into_iter()
                .filter_map(|bid| {
                    let listing = fetched.remove(bid.listing_id()?)?;
                    Some(BidEntry {
                        listing,
                        best_bid: bid,
                    })
                })
                .collect();
            Ok(OwnedSection::Bids(entries))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing(id: &str, title: &str, description: &str, tags: &[&str]) -> Listing {
        serde_json::from_value(json!({
            "id": id,
            "title": title,
            "description": description,
            "tags": tags,
        }))
        .unwrap()
    }

    fn feed_with(listings: Vec<Listing>) -> ListingFeed {
        let mut feed = ListingFeed::new(&ClientOptions::default());
        feed.listings = listings;
        feed
    }

    #[test]
    fn tag_filter_is_conjunctive() {
        let filter = FeedFilter::new("", "wood, antique");
        assert!(filter.matches(&listing("1", "t", "", &["Wood", "antique"])));
        assert!(!filter.matches(&listing("2", "t", "", &["wood", "glass"])));
        assert!(FeedFilter::new("", " , ").matches(&listing("3", "t", "", &[])));
    }

    #[test]
    fn tag_tokens_match_substrings() {
        let filter = FeedFilter::new("", "ant");
        assert!(filter.matches(&listing("1", "t", "", &["Antique"])));
    }

    #[test]
    fn search_covers_title_and_description() {
        let filter = FeedFilter::new("CHAIR", "");
        assert!(filter.matches(&listing("1", "Oak chair", "", &[])));
        assert!(filter.matches(&listing("2", "Seat", "a comfy chair", &[])));
        assert!(!filter.matches(&listing("3", "Table", "oak", &[])));
    }

    #[test]
    fn paging_reveals_four_at_a_time() {
        let items = (0..10)
            .map(|i| listing(&i.to_string(), "item", "", &[]))
            .collect();
        let mut feed = feed_with(items);

        assert_eq!(feed.visible().len(), 4);
        assert!(feed.has_more());
        feed.reveal_more();
        assert_eq!(feed.visible().len(), 8);
        feed.reveal_more();
        assert_eq!(feed.visible().len(), 10);
        assert!(!feed.has_more());
    }

    #[test]
    fn filtering_runs_over_the_full_set() {
        let mut items: Vec<Listing> = (0..6)
            .map(|i| listing(&i.to_string(), "plain", "", &[]))
            .collect();
        items.push(listing("x", "rare lamp", "", &["lamp"]));
        let mut feed = feed_with(items);

        feed.set_filter(FeedFilter::new("lamp", ""));
        let visible = feed.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "x");
        assert!(!feed.has_more());
    }
}
