#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{figment::Figment, Build, Rocket};

use crate::config::{ConfigFairing, ElectionFairing, IdentityProviderFairing, SessionFairing};
use crate::logging::LoggerFairing;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

/// Assemble the server from `Rocket.toml` and the environment, signing users in through the
/// configured OAuth provider.
pub fn build() -> Rocket<Build> {
    rocket_for_figment(rocket::Config::figment()).attach(IdentityProviderFairing)
}

/// Assemble the server from `figment`, leaving the identity provider to the caller.
pub fn rocket_for_figment(figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .mount("/", api::routes())
        .register("/", api::catchers())
        .attach(LoggerFairing)
        .attach(ConfigFairing)
        .attach(ElectionFairing)
        .attach(SessionFairing)
}

#[cfg(test)]
pub(crate) mod test_support {
    use rocket::{
        http::Status,
        local::asynchronous::{Client, LocalResponse},
        serde::json::serde_json::Value,
        Build, Rocket,
    };

    use crate::model::{
        auth::SESSION_COOKIE,
        candidate::NewCandidate,
        oauth::{Provider, StubProvider, OAUTH_STATE_COOKIE},
    };

    pub const ADMIN_EMAIL: &str = "admin@example.com";
    pub const VOTER_EMAIL: &str = "voter@example.com";
    pub const OTHER_VOTER_EMAIL: &str = "other@example.com";

    /// The server as configured for tests: one admin, five candidates, a stub provider.
    pub fn test_rocket() -> Rocket<Build> {
        let seed = (1..=5)
            .map(|n| NewCandidate {
                name: format!("Candidate {n}"),
                description: format!("Description {n}"),
            })
            .collect::<Vec<_>>();
        let figment = rocket::Config::figment()
            .merge(("admin_emails", [ADMIN_EMAIL.to_uppercase()]))
            .merge(("candidates", seed));
        let provider: Provider = Box::new(StubProvider);
        crate::rocket_for_figment(figment).manage(provider)
    }

    /// Sign `email` in through the full OAuth redirect dance.
    pub async fn login(client: &Client, email: &str) {
        let response = client.get("/auth/google").dispatch().await;
        assert_eq!(Status::SeeOther, response.status());
        let state = client
            .cookies()
            .get_private(OAUTH_STATE_COOKIE)
            .expect("state cookie is set")
            .value()
            .to_string();

        let response = client
            .get(format!("/auth/google/callback?code={email}&state={state}"))
            .dispatch()
            .await;
        assert_eq!(Status::SeeOther, response.status());
        assert!(client.cookies().get_private(SESSION_COOKIE).is_some());
    }

    pub async fn logout(client: &Client) {
        let response = client.get("/logout").dispatch().await;
        assert_eq!(Status::SeeOther, response.status());
    }

    /// Read a response body as JSON.
    pub async fn body_json(response: LocalResponse<'_>) -> Value {
        response.into_json::<Value>().await.expect("JSON body")
    }
}
