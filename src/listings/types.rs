//! Types for listings and bids

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lenient;
use crate::media::{lenient_media_list, Media};
use crate::profiles::Profile;

/// Most tags a new listing may carry
pub const MAX_TAGS: usize = 10;

/// Most media entries a new listing may carry
pub const MAX_MEDIA: usize = 8;

/// Alt text given to media entered as bare URLs
pub const DEFAULT_MEDIA_ALT: &str = "Listing image";

/// An auctionable item.
///
/// Which relations are filled depends on the expansion flags of the request:
/// `seller` needs `_seller`, `bids` needs `_bids`. Fields that arrive null or
/// malformed take their default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Listing {
    #[serde(deserialize_with = "lenient::or_default")]
    pub id: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub title: String,
    #[serde(deserialize_with = "lenient::option")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient_media_list")]
    pub media: Vec<Media>,
    #[serde(deserialize_with = "lenient::option")]
    pub created: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::option")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::option")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::option")]
    pub seller: Option<Profile>,
    #[serde(deserialize_with = "lenient::list")]
    pub bids: Vec<Bid>,
    #[serde(rename = "_count", deserialize_with = "lenient::option")]
    pub count: Option<ListingCount>,
}

/// Relation counts embedded in a listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingCount {
    pub bids: u64,
}

/// An amount placed by a bidder against a listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bid {
    #[serde(deserialize_with = "lenient::option")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient::amount")]
    pub amount: f64,
    #[serde(deserialize_with = "lenient::option")]
    pub created: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::option")]
    pub bidder: Option<Profile>,
    /// Only present when fetched with `_listings`
    #[serde(deserialize_with = "lenient::option")]
    pub listing: Option<Box<Listing>>,
}

impl Bid {
    /// Id of the listing this bid belongs to, when it was embedded
    pub fn listing_id(&self) -> Option<&str> {
        self.listing
            .as_deref()
            .map(|listing| listing.id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn bidder_name(&self) -> Option<&str> {
        self.bidder.as_ref().map(|b| b.name.as_str())
    }
}

/// Highest amount among `bids`; zero when there are none.
pub fn highest_bid(bids: &[Bid]) -> f64 {
    bids.iter().map(|bid| bid.amount).fold(0.0, f64::max)
}

impl Listing {
    pub fn highest_bid(&self) -> f64 {
        highest_bid(&self.bids)
    }

    /// Number of bids: the loaded bids, or the server count when none were embedded
    pub fn bid_count(&self) -> u64 {
        if !self.bids.is_empty() {
            return self.bids.len() as u64;
        }
        self.count.as_ref().map(|c| c.bids).unwrap_or(0)
    }

    /// Display-only: the server decides whether bids are still accepted.
    pub fn is_ended(&self, now: DateTime<Utc>) -> bool {
        self.ends_at.map(|ends| ends < now).unwrap_or(false)
    }

    pub fn seller_name(&self) -> Option<&str> {
        self.seller
            .as_ref()
            .map(|s| s.name.as_str())
            .filter(|n| !n.is_empty())
    }

    pub fn is_owned_by(&self, name: &str) -> bool {
        !name.is_empty() && self.seller_name() == Some(name)
    }

    /// Bids newest first; bids without a timestamp go last
    pub fn bid_history(&self) -> Vec<&Bid> {
        let mut bids: Vec<&Bid> = self.bids.iter().collect();
        bids.sort_by(|a, b| b.created.cmp(&a.created));
        bids
    }
}

/// Split comma-separated tags, trimming and dropping blanks; keeps the first [`MAX_TAGS`].
pub fn parse_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .take(MAX_TAGS)
        .map(str::to_string)
        .collect()
}

/// One URL per line, trimming and dropping blanks; keeps the first [`MAX_MEDIA`].
pub fn parse_media_urls(text: &str) -> Vec<Media> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(MAX_MEDIA)
        .map(|url| Media::new(url, DEFAULT_MEDIA_ALT))
        .collect()
}

/// Payload for creating a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<Media>,
    pub ends_at: DateTime<Utc>,
}

impl NewListing {
    pub fn new(title: &str, ends_at: DateTime<Utc>) -> Self {
        Self {
            title: title.trim().to_string(),
            description: None,
            tags: Vec::new(),
            media: Vec::new(),
            ends_at,
        }
    }

    /// Blank descriptions are left out of the payload
    pub fn with_description(mut self, description: &str) -> Self {
        let description = description.trim();
        self.description = (!description.is_empty()).then(|| description.to_string());
        self
    }

    pub fn with_tags_csv(mut self, tags: &str) -> Self {
        self.tags = parse_tags(tags);
        self
    }

    pub fn with_media_lines(mut self, text: &str) -> Self {
        self.media = parse_media_urls(text);
        self
    }

    /// Check the payload against `now` before it is sent.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("Title is required."));
        }
        if self.ends_at <= now {
            return Err(Error::validation("End date must be in the future."));
        }
        if self.tags.len() > MAX_TAGS {
            return Err(Error::validation(format!(
                "A listing can have at most {MAX_TAGS} tags."
            )));
        }
        if self.media.len() > MAX_MEDIA {
            return Err(Error::validation(format!(
                "A listing can have at most {MAX_MEDIA} images."
            )));
        }
        Ok(())
    }
}

/// Payload for editing a listing. `None` fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Vec<Media>>,
}

impl ListingUpdate {
    /// The edit form sends every field; an empty media URL clears the media.
    pub fn from_form(title: &str, description: &str, tags_csv: &str, media_url: &str) -> Self {
        let media_url = media_url.trim();
        Self {
            title: Some(title.trim().to_string()),
            description: Some(description.trim().to_string()),
            tags: Some(parse_tags(tags_csv)),
            media: Some(if media_url.is_empty() {
                Vec::new()
            } else {
                vec![Media::new(media_url, DEFAULT_MEDIA_ALT)]
            }),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(Error::validation("Title is required."));
            }
        }
        if self.tags.as_ref().map(Vec::len).unwrap_or(0) > MAX_TAGS {
            return Err(Error::validation(format!(
                "A listing can have at most {MAX_TAGS} tags."
            )));
        }
        if self.media.as_ref().map(Vec::len).unwrap_or(0) > MAX_MEDIA {
            return Err(Error::validation(format!(
                "A listing can have at most {MAX_MEDIA} images."
            )));
        }
        Ok(())
    }
}

/// Payload for placing a bid
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BidRequest {
    pub amount: f64,
}
