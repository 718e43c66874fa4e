//! Sign-up / sign-in handshake and session lifecycle
//!
//! [`Auth::authenticate`] runs register (sign-up only), login, API-key issuance and
//! profile hydration in order. Any failing step aborts the flow and nothing is saved.

mod session;
mod types;
mod validate;

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::fetch::Gateway;
use crate::profiles::Profile;
use crate::store::{SessionStore, WelcomeMarker};

pub use session::*;
pub use types::*;
pub use validate::*;

/// Client for the identity endpoints plus the persisted session
#[derive(Clone)]
pub struct Auth {
    gateway: Gateway,
    store: Arc<dyn SessionStore>,
    welcome: Arc<WelcomeMarker>,
}

impl Auth {
    pub(crate) fn new(gateway: Gateway, store: Arc<dyn SessionStore>) -> Self {
        Self {
            gateway,
            store,
            welcome: Arc::new(WelcomeMarker::default()),
        }
    }

    /// The session store this client reads and writes
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Register a new account. A server rejection is a validation error.
    pub async fn register(&self, sign_up: &SignUp) -> Result<()> {
        validate_sign_up(sign_up, self.gateway.options())?;

        self.gateway
            .post(&["auth", "register"])
            .json(sign_up)?
            .fallback("Registration failed.")
            .execute_value()
            .await
            .map_err(|e| match e {
                Error::Remote { message, .. } => Error::Validation(message),
                other => other,
            })?;

        log::info!("registered account {:?}", sign_up.name);
        Ok(())
    }

    /// Log in and return the bearer token and canonical name
    pub async fn login(&self, sign_in: &SignIn) -> Result<LoginData> {
        validate_sign_in(sign_in)?;

        let data = self
            .gateway
            .post(&["auth", "login"])
            .json(sign_in)?
            .fallback("Login failed.")
            .execute::<LoginData>()
            .await
            .map_err(|e| match e {
                Error::Remote { message, .. } => Error::Auth(message),
                other => other,
            })?
            .data
            .unwrap_or_default();

        let complete = data.access_token.as_deref().map_or(false, |t| !t.is_empty())
            && data.name.as_deref().map_or(false, |n| !n.is_empty());
        if !complete {
            return Err(Error::auth("Login failed (missing token/name)."));
        }
        Ok(data)
    }

    /// Issue an API key. Only the bearer token is sent; a rejection is an auth error.
    pub async fn create_api_key(&self, access_token: &str) -> Result<String> {
        let data = self
            .gateway
            .post(&["auth", "create-api-key"])
            .bearer_auth(access_token)
            .json(&serde_json::json!({}))?
            .fallback("Could not create API key.")
            .execute::<ApiKeyData>()
            .await
            .map_err(|e| match e {
                Error::Remote { message, .. } => Error::Auth(message),
                other => other,
            })?
            .data
            .unwrap_or_default();

        data.key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::auth("Could not create API key."))
    }

    /// Fetch the profile of `name` with both credentials
    pub async fn hydrate_profile(
        &self,
        name: &str,
        access_token: &str,
        api_key: &str,
    ) -> Result<Profile> {
        let header = self.gateway.options().api_key_header.clone();
        self.gateway
            .get(&["auction", "profiles", name])
            .bearer_auth(access_token)
            .header(&header, api_key)
            .fallback("Could not load profile.")
            .execute::<Profile>()
            .await?
            .data
            .ok_or_else(|| Error::malformed("Profile response carried no data."))
    }

    /// Run the full handshake, persist the session and set the welcome marker
    pub async fn authenticate(&self, credentials: Credentials) -> Result<Session> {
        let options = self.gateway.options();
        let sign_in = credentials.login();

        if let Credentials::SignUp(sign_up) = &credentials {
            self.register(sign_up).await?;
        }

        let login = self.login(&sign_in).await?;
        let access_token = login.access_token.unwrap_or_default();
        let name = login.name.unwrap_or_default();
        let email = login.email.unwrap_or_else(|| sign_in.email.clone());

        let api_key = self.create_api_key(&access_token).await?;
        let profile = self.hydrate_profile(&name, &access_token, &api_key).await?;

        let session =
            Session::from_profile(&profile, &name, &email, &access_token, &api_key, options);
        self.store.save(&session).await?;
        self.welcome
            .set(Welcome {
                name: session.name.clone(),
                is_new: credentials.is_new_account(),
            })
            .await;

        log::info!("signed in as {:?}", session.name);
        Ok(session)
    }

    /// Forget the stored session
    pub async fn sign_out(&self) -> Result<()> {
        self.store.clear().await?;
        log::info!("signed out");
        Ok(())
    }

    /// The stored session, if a complete one exists
    pub async fn current_session(&self) -> Option<Session> {
        self.store.load().await
    }

    /// The stored session, or an auth error asking the user to log in
    pub async fn require_session(&self) -> Result<Session> {
        self.current_session()
            .await
            .ok_or_else(|| Error::auth("Please log in to continue."))
    }

    /// Return the welcome marker once
    pub async fn take_welcome(&self) -> Option<Welcome> {
        self.welcome.take().await
    }
}
