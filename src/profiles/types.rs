//! Types for auction profiles

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ClientOptions;
use crate::lenient;
use crate::media::{normalize_media, Media};

/// A profile as the API returns it.
///
/// Odd scalar fields take their default. `avatar` and `banner` stay raw here;
/// they are normalized with [`normalize_media`] wherever a profile crosses into a
/// session or a view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[serde(deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(deserialize_with = "lenient::option")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient::option")]
    pub bio: Option<String>,
    #[serde(deserialize_with = "lenient::option")]
    pub credits: Option<i64>,
    pub avatar: Option<Value>,
    pub banner: Option<Value>,
    #[serde(rename = "_count", deserialize_with = "lenient::option")]
    pub count: Option<ProfileCount>,
}

/// Relation counts embedded in a profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileCount {
    pub listings: u64,
    pub wins: u64,
}

/// Profile fields a user may edit
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    pub bio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<MediaInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<MediaInput>,
}

/// Media as sent in an update; `alt` is omitted when empty
#[derive(Debug, Clone, Default, Serialize)]
pub struct MediaInput {
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub alt: String,
}

impl ProfileUpdate {
    /// Build an update from form input. Blank URLs leave that image unchanged.
    pub fn new(bio: &str, avatar_url: &str, banner_url: &str) -> Self {
        let media = |url: &str| {
            let url = url.trim();
            (!url.is_empty()).then(|| MediaInput {
                url: url.to_string(),
                alt: String::new(),
            })
        };
        Self {
            bio: bio.to_string(),
            avatar: media(avatar_url),
            banner: media(banner_url),
        }
    }
}

/// Another user's profile, shaped for display. Credits are never shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicProfile {
    pub name: String,
    pub email: String,
    pub bio: String,
    pub avatar: Media,
    pub banner: Media,
    pub listing_count: u64,
    pub win_count: u64,
}

impl PublicProfile {
    pub fn from_profile(profile: &Profile, options: &ClientOptions) -> Self {
        let count = profile.count.clone().unwrap_or_default();
        Self {
            name: profile.name.clone(),
            email: profile.email.clone().unwrap_or_default(),
            bio: profile.bio.clone().unwrap_or_default(),
            avatar: normalize_media(profile.avatar.as_ref(), &options.avatar_placeholder),
            banner: normalize_media(profile.banner.as_ref(), &options.banner_placeholder),
            listing_count: count.listings,
            win_count: count.wins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_omits_blank_media() {
        let update = ProfileUpdate::new("hello", "  ", "https://x.test/b.png");
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(
            value,
            json!({"bio": "hello", "banner": {"url": "https://x.test/b.png"}})
        );
    }

    #[test]
    fn public_profile_normalizes_media() {
        let options = ClientOptions::default();
        let profile: Profile = serde_json::from_value(json!({
            "name": "seller",
            "credits": 1000,
            "avatar": {"url": "", "alt": "x"},
            "banner": "https://x.test/banner.png",
            "_count": {"listings": 3, "wins": 1}
        }))
        .unwrap();

        let public = PublicProfile::from_profile(&profile, &options);
        assert_eq!(public.avatar.url, options.avatar_placeholder);
        assert_eq!(public.banner.url, "https://x.test/banner.png");
        assert_eq!(public.listing_count, 3);
        assert_eq!(public.win_count, 1);
    }

    #[test]
    fn odd_profile_fields_take_defaults() {
        let profile: Profile = serde_json::from_value(json!({
            "name": null,
            "email": 7,
            "credits": "lots",
            "_count": {"listings": "two"}
        }))
        .unwrap();

        assert_eq!(profile.name, "");
        assert!(profile.email.is_none());
        assert!(profile.credits.is_none());
        assert!(profile.count.is_none());
    }
}
