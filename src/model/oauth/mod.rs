//! Sign-in through an external OAuth 2.0 identity provider.
//!
//! The server only ever asks the provider two things: where to send the browser to start
//! signing in, and who the user is once the provider sends them back with a code.

use data_encoding::BASE64URL_NOPAD;
use rand::Rng;
use rocket::{
    http::{Cookie, SameSite},
    time::Duration,
};

use crate::error::Result;
use crate::model::identity::Identity;

pub use provider::{OAuthConfig, OAuthProvider};
#[cfg(test)]
pub use stub::StubProvider;

mod provider;
#[cfg(test)]
mod stub;

pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// How long a user has to complete sign-in at the provider.
const STATE_TTL_MINUTES: i64 = 10;

/// An identity provider the server can delegate sign-in to.
#[rocket::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The URL that starts sign-in, carrying the anti-forgery `state`.
    fn authorize_url(&self, state: &str) -> String;

    /// Trade the authorization code from the provider's redirect for the user's identity.
    async fn exchange(&self, code: &str) -> Result<Identity>;
}

/// The identity provider as held in managed state.
pub type Provider = Box<dyn IdentityProvider>;

/// A fresh anti-forgery value for one sign-in attempt.
pub fn random_state() -> String {
    let mut bytes = [0_u8; 16];
    rand::thread_rng().fill(&mut bytes);
    BASE64URL_NOPAD.encode(&bytes)
}

/// Cookie remembering the `state` of the sign-in in progress.
pub fn state_cookie(state: String) -> Cookie<'static> {
    Cookie::build(OAUTH_STATE_COOKIE, state)
        .path("/")
        .max_age(Duration::minutes(STATE_TTL_MINUTES))
        .http_only(true)
        // Must be sent on the provider's cross-site redirect back to us.
        .same_site(SameSite::Lax)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_are_random() {
        let state = random_state();
        assert_eq!(22, state.len());
        assert_ne!(state, random_state());
    }

    #[test]
    fn state_cookie_is_short_lived() {
        let cookie = state_cookie("abc".to_string());
        assert_eq!(OAUTH_STATE_COOKIE, cookie.name());
        assert_eq!("abc", cookie.value());
        assert_eq!(Some(Duration::minutes(10)), cookie.max_age());
        assert_eq!(Some(true), cookie.http_only());
    }
}
