//! Local checks run before any handshake request

use crate::auth::types::{SignIn, SignUp};
use crate::config::ClientOptions;
use crate::error::{Error, Result};

/// Handles are ASCII alphanumerics and underscore.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::validation("Name is required."));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::validation(
            "Name may only contain letters, numbers and underscore.",
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str, options: &ClientOptions) -> Result<()> {
    if email.is_empty() {
        return Err(Error::validation("Email is required."));
    }
    let allowed = options.allowed_email_domains.iter().any(|domain| {
        email
            .rsplit_once('@')
            .map(|(local, host)| !local.is_empty() && host.eq_ignore_ascii_case(domain))
            .unwrap_or(false)
    });
    if !allowed {
        let domains = options
            .allowed_email_domains
            .iter()
            .map(|d| format!("@{d}"))
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(Error::validation(format!("Email must end with {domains}")));
    }
    Ok(())
}

pub fn validate_password(password: &str, options: &ClientOptions) -> Result<()> {
    if password.is_empty() {
        return Err(Error::validation("Password is required."));
    }
    if password.chars().count() < options.min_password_length {
        return Err(Error::validation(format!(
            "Password must be at least {} characters.",
            options.min_password_length
        )));
    }
    Ok(())
}

pub fn validate_sign_up(sign_up: &SignUp, options: &ClientOptions) -> Result<()> {
    if sign_up.name.is_empty() || sign_up.email.is_empty() || sign_up.password.is_empty() {
        return Err(Error::validation("Please fill in all fields."));
    }
    validate_name(&sign_up.name)?;
    validate_email(&sign_up.email, options)?;
    validate_password(&sign_up.password, options)
}

/// Sign-in only requires both fields; the identity provider judges the rest.
pub fn validate_sign_in(sign_in: &SignIn) -> Result<()> {
    if sign_in.email.is_empty() || sign_in.password.is_empty() {
        return Err(Error::validation("Please fill in both fields."));
    }
    Ok(())
}
