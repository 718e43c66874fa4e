//! Configuration options for the auction client

use std::time::Duration;

use crate::error::{Error, Result};

/// Default base URL of the Noroff v2 API
pub const DEFAULT_API_URL: &str = "https://v2.api.noroff.dev";

/// Default name of the API-key header every authenticated call carries
pub const DEFAULT_API_KEY_HEADER: &str = "X-Noroff-API-Key";

/// Configuration options for the auction client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the remote API
    pub base_url: String,

    /// Header used to send the API key
    pub api_key_header: String,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Email domains accepted at sign-up
    pub allowed_email_domains: Vec<String>,

    /// Minimum password length accepted at sign-up
    pub min_password_length: usize,

    /// Placeholder used when a profile has no usable avatar
    pub avatar_placeholder: String,

    /// Placeholder used when a profile has no usable banner
    pub banner_placeholder: String,

    /// Placeholder used when a listing has no media
    pub listing_placeholder: String,

    /// Number of feed listings visible before the first reveal
    pub feed_page_size: usize,

    /// Number of listings each reveal adds to the feed
    pub feed_page_increment: usize,

    /// Maximum number of concurrent per-listing re-fetches
    pub fan_out_concurrency: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            request_timeout: Some(Duration::from_secs(30)),
            allowed_email_domains: vec!["stud.noroff.no".to_string()],
            min_password_length: 8,
            avatar_placeholder: "/assets/images/avatar-placeholder.png".to_string(),
            banner_placeholder: "/assets/images/banner-placeholder.jpg".to_string(),
            listing_placeholder: "/assets/images/placeholder.jpg".to_string(),
            feed_page_size: 4,
            feed_page_increment: 4,
            fan_out_concurrency: 8,
        }
    }
}

impl ClientOptions {
    /// Build options from the environment, starting from the defaults.
    ///
    /// Reads `FORTIS_API_URL`, `FORTIS_API_KEY_HEADER`, `FORTIS_FAN_OUT` and
    /// `FORTIS_REQUEST_TIMEOUT_SECS`; unset variables keep their default.
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();

        if let Ok(url) = std::env::var("FORTIS_API_URL") {
            url::Url::parse(&url)?;
            options.base_url = url;
        }
        if let Ok(header) = std::env::var("FORTIS_API_KEY_HEADER") {
            options.api_key_header = header;
        }
        if let Ok(value) = std::env::var("FORTIS_FAN_OUT") {
            let n = value.parse::<usize>().map_err(|_| {
                Error::validation(format!("FORTIS_FAN_OUT must be a positive integer, got {value:?}"))
            })?;
            options = options.with_fan_out_concurrency(n);
        }
        if let Ok(value) = std::env::var("FORTIS_REQUEST_TIMEOUT_SECS") {
            let secs = value.parse::<u64>().map_err(|_| {
                Error::validation(format!(
                    "FORTIS_REQUEST_TIMEOUT_SECS must be a number of seconds, got {value:?}"
                ))
            })?;
            options.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(options)
    }

    /// Set the base URL of the remote API
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.to_string();
        self
    }

    /// Set the API-key header name
    pub fn with_api_key_header(mut self, value: &str) -> Self {
        self.api_key_header = value.to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the email domains accepted at sign-up
    pub fn with_allowed_email_domains(mut self, domains: &[&str]) -> Self {
        self.allowed_email_domains = domains.iter().map(|d| d.to_string()).collect();
        self
    }

    /// Set the avatar placeholder URL
    pub fn with_avatar_placeholder(mut self, value: &str) -> Self {
        self.avatar_placeholder = value.to_string();
        self
    }

    /// Set the banner placeholder URL
    pub fn with_banner_placeholder(mut self, value: &str) -> Self {
        self.banner_placeholder = value.to_string();
        self
    }

    /// Set the listing placeholder URL
    pub fn with_listing_placeholder(mut self, value: &str) -> Self {
        self.listing_placeholder = value.to_string();
        self
    }

    /// Set the feed page size and reveal increment
    pub fn with_feed_paging(mut self, page_size: usize, increment: usize) -> Self {
        self.feed_page_size = page_size.max(1);
        self.feed_page_increment = increment.max(1);
        self
    }

    /// Set the fan-out bound; zero is treated as one
    pub fn with_fan_out_concurrency(mut self, value: usize) -> Self {
        self.fan_out_concurrency = value.max(1);
        self
    }
}
