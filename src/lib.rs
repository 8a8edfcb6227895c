//! # Buka (admin front-end client toolkit)
//!
//! `buka` collects the client-side pieces an administration front end needs
//! around its JSON API.
//!
//! ## Request gateway
//!
//! Every outbound call goes through [`client::RequestGateway`]. It adds the
//! `ngrok-skip-browser-warning` header, turns `401`/`403` responses outside the
//! public allow-list into a session reset plus a redirect to the login page, and
//! exposes failed responses through an adapter that maps RFC 7807
//! `ProblemDetail` bodies into `{ message, error, fieldErrors }`.
//!
//! Browser facilities are injected capabilities so the gateway runs anywhere:
//!
//! - **Storage:** [`client::SessionStore`] keeps the `AuthSession` keys.
//! - **Notices:** [`client::Notifier`] shows the "session expired" message.
//! - **Navigation:** [`client::NavigationResolver`] picks and opens the login page.
//! - **Object URLs:** [`client::ObjectUrls`] backs the authenticated image loader.
//!
//! ## Widgets
//!
//! [`widgets`] holds the view models: pagination, the password meter, the
//! date-input enhancer, form field-error placement and ticket status maps.

pub mod cli;
pub mod client;
pub mod widgets;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_user_agent() {
        assert!(APP_USER_AGENT.starts_with("buka/"));
    }
}
