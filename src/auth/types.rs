//! Types for the sign-up / sign-in handshake

use serde::{Deserialize, Serialize};

use crate::media::Media;

/// Sign-in credentials
#[derive(Debug, Clone, Serialize, Default)]
pub struct SignIn {
    pub email: String,
    pub password: String,
}

/// Sign-up payload for the identity provider
#[derive(Debug, Clone, Serialize, Default)]
pub struct SignUp {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Media>,
}

/// Which path the handshake takes
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Login with an existing account
    SignIn(SignIn),
    /// Register, then log in with the same email and password
    SignUp(SignUp),
}

impl Credentials {
    pub fn sign_in(email: &str, password: &str) -> Self {
        Credentials::SignIn(SignIn {
            email: email.trim().to_string(),
            password: password.trim().to_string(),
        })
    }

    pub fn sign_up(name: &str, email: &str, password: &str) -> Self {
        Credentials::SignUp(SignUp {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.trim().to_string(),
            avatar: None,
        })
    }

    pub(crate) fn is_new_account(&self) -> bool {
        matches!(self, Credentials::SignUp(_))
    }

    pub(crate) fn login(&self) -> SignIn {
        match self {
            Credentials::SignIn(sign_in) => sign_in.clone(),
            Credentials::SignUp(sign_up) => SignIn {
                email: sign_up.email.clone(),
                password: sign_up.password.clone(),
            },
        }
    }
}

/// `data` of a login response. Both fields are required; absence is a protocol violation.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginData {
    pub access_token: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// `data` of an API-key issuance response
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ApiKeyData {
    pub key: Option<String>,
    pub name: Option<String>,
}

/// One-shot "just signed in" marker shown once by the landing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Welcome {
    pub name: String,
    pub is_new: bool,
}
