//! Listing and bid operations

mod types;

use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use std::collections::HashSet;

use crate::auth::Session;
use crate::error::{Error, Result};
use crate::fetch::{Envelope, Gateway};
use crate::query::ListQuery;

pub use types::*;

/// Client for the `/auction/listings` resource
#[derive(Clone)]
pub struct Listings {
    gateway: Gateway,
}

impl Listings {
    pub(crate) fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// List listings. Works anonymously; credentials are attached when given.
    pub async fn list(
        &self,
        query: &ListQuery,
        session: Option<&Session>,
    ) -> Result<Envelope<Vec<Listing>>> {
        self.gateway
            .get(&["auction", "listings"])
            .optional_session(session)
            .query(query.to_params())
            .fallback("Failed to load listings.")
            .execute_list::<Listing>()
            .await
    }

    /// The active feed with seller and bids embedded
    pub async fn active(&self, session: Option<&Session>) -> Result<Vec<Listing>> {
        Ok(self
            .list(&ListQuery::active_feed(), session)
            .await?
            .into_vec())
    }

    /// A single listing with seller and bids embedded
    pub async fn get(&self, id: &str, session: Option<&Session>) -> Result<Listing> {
        self.gateway
            .get(&["auction", "listings", id])
            .optional_session(session)
            .query(ListQuery::listing_detail().to_params())
            .fallback("Could not load listing.")
            .execute::<Listing>()
            .await?
            .data
            .ok_or_else(|| Error::malformed("Listing response carried no data."))
    }

    /// Load a listing for editing; only its seller may edit it.
    pub async fn get_owned(&self, id: &str, session: &Session) -> Result<Listing> {
        let listing = self.get(id, Some(session)).await?;
        if !listing.is_owned_by(&session.name) {
            return Err(Error::validation("You do not own this listing."));
        }
        Ok(listing)
    }

    pub async fn create(&self, session: &Session, listing: &NewListing) -> Result<Listing> {
        listing.validate(Utc::now())?;

        let created = self
            .gateway
            .post(&["auction", "listings"])
            .session(session)?
            .json(listing)?
            .fallback("Could not create listing.")
            .execute::<Listing>()
            .await?
            .data
            .unwrap_or_else(|| missing_data("create"));

        log::info!("created listing {:?}", created.id);
        Ok(created)
    }

    pub async fn update(
        &self,
        session: &Session,
        id: &str,
        update: &ListingUpdate,
    ) -> Result<Listing> {
        update.validate()?;

        Ok(self
            .gateway
            .put(&["auction", "listings", id])
            .session(session)?
            .json(update)?
            .fallback("Update failed.")
            .execute::<Listing>()
            .await?
            .data
            .unwrap_or_else(|| missing_data("update")))
    }

    /// Delete a listing. Success is a `204 No Content`.
    pub async fn delete(&self, session: &Session, id: &str) -> Result<()> {
        self.gateway
            .delete(&["auction", "listings", id])
            .session(session)?
            .fallback("Delete failed.")
            .execute_no_content()
            .await?;
        log::info!("deleted listing {:?}", id);
        Ok(())
    }

    /// Place a bid. Not idempotent: each call creates a new bid.
    pub async fn place_bid(&self, session: &Session, id: &str, amount: f64) -> Result<Listing> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::validation("Please enter a valid bid amount."));
        }

        Ok(self
            .gateway
            .post(&["auction", "listings", id, "bids"])
            .session(session)?
            .json(&BidRequest { amount })?
            .fallback("Could not place bid.")
            .execute::<Listing>()
            .await?
            .data
            .unwrap_or_else(|| missing_data("bid")))
    }

    /// Fetch listings by id with seller and bids embedded.
    ///
    /// Ids are de-duplicated and blanks dropped. At most `fan_out_concurrency`
    /// requests are in flight; a failed fetch drops only that listing. Results keep
    /// the order of first appearance in `ids`.
    pub async fn by_ids<I, S>(&self, session: &Session, ids: I) -> Result<Vec<Listing>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !session.is_complete() {
            return Err(Error::auth(
                "Missing auth credentials (accessToken/apiKey/name).",
            ));
        }

        let mut seen = HashSet::new();
        let unique: Vec<String> = ids
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .filter(|id| !id.is_empty() && seen.insert(id.clone()))
            .collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let concurrency = self.gateway.options().fan_out_concurrency.max(1);
        let results: Vec<Option<Listing>> = stream::iter(unique)
            .map(|id| async move {
                match self.get(&id, Some(session)).await {
                    Ok(listing) => Some(listing),
                    Err(e) => {
                        log::warn!("dropping listing {:?} from batch: {}", id, e);
                        None
                    }
                }
            })
            .buffered(concurrency)
            .collect()
            .await;

        Ok(results.into_iter().flatten().collect())
    }
}

/// Stand-in for a success response that carried no listing
fn missing_data(operation: &str) -> Listing {
    log::debug!("{} succeeded without listing data; returning an empty listing", operation);
    Listing::default()
}
