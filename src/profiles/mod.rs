//! Profile operations

mod types;

use crate::auth::Session;
use crate::error::{Error, Result};
use crate::fetch::Gateway;
use crate::listings::{Bid, Listing};
use crate::query::ListQuery;

pub use types::*;

/// Client for the `/auction/profiles` resource
#[derive(Clone)]
pub struct Profiles {
    gateway: Gateway,
}

impl Profiles {
    pub(crate) fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Fetch a profile by name. Credentials are attached when a session is given.
    pub async fn get(&self, name: &str, session: Option<&Session>) -> Result<Profile> {
        self.gateway
            .get(&["auction", "profiles", name])
            .optional_session(session)
            .fallback("Could not load profile.")
            .execute::<Profile>()
            .await?
            .data
            .ok_or_else(|| Error::malformed("Profile response carried no data."))
    }

    /// A profile shaped for display with credits hidden
    pub async fn public(&self, name: &str, session: Option<&Session>) -> Result<PublicProfile> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("No profile name provided."));
        }
        let profile = self.get(name, session).await?;
        Ok(PublicProfile::from_profile(&profile, self.gateway.options()))
    }

    /// Update the signed-in user's profile and return the server's copy
    pub async fn update(&self, session: &Session, update: &ProfileUpdate) -> Result<Profile> {
        self.gateway
            .put(&["auction", "profiles", &session.name])
            .session(session)?
            .json(update)?
            .fallback("Could not update profile.")
            .execute::<Profile>()
            .await?
            .data
            .ok_or_else(|| Error::malformed("Profile update carried no data."))
    }

    /// Listings created by `name`, newest first
    pub async fn listings(&self, session: &Session, name: &str) -> Result<Vec<Listing>> {
        Ok(self
            .gateway
            .get(&["auction", "profiles", name, "listings"])
            .session(session)?
            .query(ListQuery::profile_listings().to_params())
            .fallback("Could not load listings.")
            .execute_list::<Listing>()
            .await?
            .into_vec())
    }

    /// Bids placed by `name`, with their listings embedded
    pub async fn bids(&self, session: &Session, name: &str) -> Result<Vec<Bid>> {
        Ok(self
            .gateway
            .get(&["auction", "profiles", name, "bids"])
            .session(session)?
            .query(ListQuery::profile_bids().to_params())
            .fallback("Could not load bids.")
            .execute_list::<Bid>()
            .await?
            .into_vec())
    }

    /// Listings `name` has won
    pub async fn wins(&self, session: &Session, name: &str) -> Result<Vec<Listing>> {
        Ok(self
            .gateway
            .get(&["auction", "profiles", name, "wins"])
            .session(session)?
            .query(ListQuery::profile_listings().to_params())
            .fallback("Could not load wins.")
            .execute_list::<Listing>()
            .await?
            .into_vec())
    }
}
