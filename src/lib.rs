//! Fortis Auction client library
//!
//! A Rust client for the Noroff auction API: the sign-up / sign-in handshake, a
//! persisted session, listings and bids, profiles, and the view models the auction
//! pages are built from.

pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
mod lenient;
pub mod listings;
pub mod media;
pub mod profiles;
pub mod query;
pub mod store;
pub mod view;

use std::sync::Arc;

use reqwest::Client;

use crate::auth::{Auth, Session};
use crate::config::ClientOptions;
use crate::error::Result;
use crate::fetch::Gateway;
use crate::listings::{Listing, Listings};
use crate::profiles::{ProfileUpdate, Profiles, PublicProfile};
use crate::store::{MemorySessionStore, SessionStore};
use crate::view::{ListingFeed, OwnedSection, OwnedSectionKind};

/// The main entry point for the auction client
#[derive(Clone)]
pub struct FortisAuction {
    gateway: Gateway,
    auth: Auth,
    listings: Listings,
    profiles: Profiles,
    store: Arc<dyn SessionStore>,
}

impl FortisAuction {
    /// Create a client against the default API with the given session store
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use fortis_auction::{FortisAuction, store::FileSessionStore};
    ///
    /// let client = FortisAuction::new(Arc::new(FileSessionStore::in_dir(".fortis")));
    /// ```
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self::new_with_options(ClientOptions::default(), store)
    }

    /// Create a client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use fortis_auction::{FortisAuction, config::ClientOptions, store::MemorySessionStore};
    ///
    /// let options = ClientOptions::default().with_fan_out_concurrency(4);
    /// let client = FortisAuction::new_with_options(options, Arc::new(MemorySessionStore::new()));
    /// ```
    pub fn new_with_options(options: ClientOptions, store: Arc<dyn SessionStore>) -> Self {
        let gateway = Gateway::new(Client::new(), Arc::new(options));

        Self {
            auth: Auth::new(gateway.clone(), store.clone()),
            listings: Listings::new(gateway.clone()),
            profiles: Profiles::new(gateway.clone()),
            gateway,
            store,
        }
    }

    /// A client whose session lives only in memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    pub fn options(&self) -> &ClientOptions {
        self.gateway.options()
    }

    /// Get a reference to the auth client for the handshake and the stored session
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    pub fn listings(&self) -> &Listings {
        &self.listings
    }

    pub fn profiles(&self) -> &Profiles {
        &self.profiles
    }

    /// An empty feed view configured with this client's paging
    pub fn feed(&self) -> ListingFeed {
        ListingFeed::new(self.options())
    }

    /// Re-fetch the signed-in user's profile and merge it into the stored session
    pub async fn refresh_session(&self) -> Result<Session> {
        let session = self.auth.require_session().await?;
        let profile = self.profiles.get(&session.name, Some(&session)).await?;

        let mut latest = self.store.load().await.unwrap_or(session);
        latest.merge_profile(&profile, self.options());
        self.store.save(&latest).await?;

        log::debug!("refreshed session for {:?}", latest.name);
        Ok(latest)
    }

    /// Place a bid as the signed-in user, then refresh the cached credits.
    ///
    /// A failed refresh is logged and does not fail the bid.
    pub async fn place_bid(&self, listing_id: &str, amount: f64) -> Result<Listing> {
        let session = self.auth.require_session().await?;
        let listing = self
            .listings
            .place_bid(&session, listing_id, amount)
            .await?;

        if let Err(e) = self.refresh_session().await {
            log::warn!("could not refresh session after bid: {}", e);
        }
        Ok(listing)
    }

    /// Update the signed-in user's profile and merge the result into the stored session
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Session> {
        let session = self.auth.require_session().await?;
        let profile = self.profiles.update(&session, update).await?;

        let mut latest = self.store.load().await.unwrap_or(session);
        latest.merge_profile(&profile, self.options());
        self.store.save(&latest).await?;
        Ok(latest)
    }

    /// Another user's profile for display; credentials are attached when signed in
    pub async fn public_profile(&self, name: &str) -> Result<PublicProfile> {
        let session = self.auth.current_session().await;
        self.profiles.public(name, session.as_ref()).await
    }

    /// Load one of the listings / bids / wins collections of `name`
    pub async fn owned_section(&self, name: &str, kind: OwnedSectionKind) -> Result<OwnedSection> {
        let session = self.auth.require_session().await?;
        view::fetch_owned_section(&self.profiles, &self.listings, &session, name, kind).await
    }
}

/// Commonly used types
pub mod prelude {
    pub use crate::auth::{Credentials, Session, Welcome};
    pub use crate::config::ClientOptions;
    pub use crate::error::{Error, Result};
    pub use crate::listings::{Bid, Listing, ListingUpdate, NewListing};
    pub use crate::media::Media;
    pub use crate::profiles::{Profile, ProfileUpdate, PublicProfile};
    pub use crate::store::{FileSessionStore, MemorySessionStore, SessionStore};
    pub use crate::view::{
        FeedFilter, ListingFeed, ListingSummary, OwnedSection, OwnedSectionKind,
    };
    pub use crate::FortisAuction;
}
