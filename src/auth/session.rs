//! Session data for an authenticated user

use serde::{Deserialize, Serialize};

use crate::config::ClientOptions;
use crate::media::{normalize_media, Media};
use crate::profiles::Profile;

/// Identity, credentials and the cached profile fields of the signed-in user.
///
/// Serialized with the field names the stored record has always used
/// (`accessToken`, `apiKey`, ...). Every field defaults on read so that partial
/// records can be loaded and then rejected by [`Session::is_complete`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    /// Unique handle; never changes once set
    pub name: String,
    pub email: String,
    pub bio: String,
    /// Cached copy of the server's credit balance; may be stale
    pub credits: i64,
    pub avatar: Media,
    pub banner: Media,
    /// Bearer credential
    pub access_token: String,
    /// Secondary credential required by every authenticated call
    pub api_key: String,
}

impl Session {
    /// Whether the three credentials are all present.
    ///
    /// A session that fails this check is treated as absent.
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.api_key.is_empty() && !self.name.is_empty()
    }

    /// Assemble a session from a hydrated profile and the handshake credentials.
    ///
    /// `login_name` and `login_email` stand in for fields the profile lacks.
    pub fn from_profile(
        profile: &Profile,
        login_name: &str,
        login_email: &str,
        access_token: &str,
        api_key: &str,
        options: &ClientOptions,
    ) -> Self {
        let name = non_empty(&profile.name).unwrap_or(login_name);
        let email = profile
            .email
            .as_deref()
            .and_then(non_empty)
            .unwrap_or(login_email);

        Self {
            name: name.to_string(),
            email: email.to_string(),
            bio: profile.bio.clone().unwrap_or_default(),
            credits: profile.credits.unwrap_or(0),
            avatar: normalize_media(profile.avatar.as_ref(), &options.avatar_placeholder),
            banner: normalize_media(profile.banner.as_ref(), &options.banner_placeholder),
            access_token: access_token.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Merge the server-authoritative subset of `profile` into this session.
    ///
    /// Identity and credentials are left alone. Credits keep their cached value when
    /// the profile does not report any.
    pub fn merge_profile(&mut self, profile: &Profile, options: &ClientOptions) {
        if let Some(credits) = profile.credits {
            self.credits = credits;
        }
        self.bio = profile.bio.clone().unwrap_or_default();
        self.avatar = normalize_media(profile.avatar.as_ref(), &options.avatar_placeholder);
        self.banner = normalize_media(profile.banner.as_ref(), &options.banner_placeholder);
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
