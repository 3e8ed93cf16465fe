use chrono::Duration;
use log::{error, info, warn};
use rocket::{
    fairing::{Fairing, Info, Kind},
    tokio::{self, time::interval},
    Build, Orbit, Rocket,
};
use serde::Deserialize;

use crate::model::{
    admin::AdminPolicy,
    auth::SessionStore,
    candidate::NewCandidate,
    election::{Election, ElectionStore},
    oauth::{OAuthConfig, OAuthProvider, Provider},
};

/// How often expired sessions are swept out of the session table.
const SESSION_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(15 * 60);

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_session_ttl")]
    session_ttl: u32,
    #[serde(default = "default_post_login_redirect")]
    post_login_redirect: String,
    #[serde(default)]
    admin_emails: Vec<String>,
}

fn default_session_ttl() -> u32 {
    24 * 60 * 60
}

fn default_post_login_redirect() -> String {
    "/".to_string()
}

impl Config {
    /// Valid lifetime of a signed-in session, in seconds.
    pub fn session_ttl(&self) -> Duration {
        Duration::seconds(self.session_ttl.into())
    }

    /// Where the browser lands after signing in.
    pub fn post_login_redirect(&self) -> &str {
        &self.post_login_redirect
    }

    /// Emails granted admin rights.
    pub fn admin_emails(&self) -> &[String] {
        &self.admin_emails
    }
}

/// A fairing that loads the application config and puts it, and the admin
/// policy built from it, in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        let policy = AdminPolicy::new(config.admin_emails());
        if policy.is_empty() {
            warn!("No admin emails configured; admin routes will refuse everyone");
        } else {
            info!("Loaded {} admin email(s)", policy.len());
        }

        // Manage the state.
        rocket = rocket.manage(config).manage(policy);
        Ok(rocket)
    }
}

/// Configuration for the election.
#[derive(Deserialize)]
struct ElectionConfig {
    #[serde(default = "NewCandidate::defaults")]
    candidates: Vec<NewCandidate>,
}

/// A fairing that seeds the election with the configured candidates and
/// places the [`ElectionStore`] into managed state.
pub struct ElectionFairing;

#[rocket::async_trait]
impl Fairing for ElectionFairing {
    fn info(&self) -> Info {
        Info {
            name: "Election",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<ElectionConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load election config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        // Seed the candidates.
        let election = match Election::with_candidates(config.candidates) {
            Ok(election) => election,
            Err(e) => {
                error!("Invalid seed candidate: {e}");
                return Err(rocket);
            }
        };
        info!(
            "Election seeded with {} candidates, voting open",
            election.len()
        );

        // Manage the state.
        rocket = rocket.manage(ElectionStore::new(election));
        Ok(rocket)
    }
}

/// A fairing that places an empty [`SessionStore`] into managed state and,
/// once the server is running, periodically sweeps out expired sessions.
pub struct SessionFairing;

#[rocket::async_trait]
impl Fairing for SessionFairing {
    fn info(&self) -> Info {
        Info {
            name: "Sessions",
            kind: Kind::Ignite | Kind::Liftoff,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        Ok(rocket.manage(SessionStore::new()))
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let sessions = match rocket.state::<SessionStore>() {
            Some(sessions) => sessions.clone(),
            None => return,
        };
        tokio::spawn(async move {
            let mut ticks = interval(SESSION_SWEEP_INTERVAL);
            loop {
                ticks.tick().await;
                let purged = sessions.purge_expired().await;
                if purged > 0 {
                    info!("Purged {purged} expired session(s)");
                }
            }
        });
    }
}

/// A fairing that loads the OAuth config and places the identity
/// [`Provider`] into managed state.
pub struct IdentityProviderFairing;

#[rocket::async_trait]
impl Fairing for IdentityProviderFairing {
    fn info(&self) -> Info {
        Info {
            name: "OAuth",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<OAuthConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load OAuth config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        // Construct the client.
        let provider = match OAuthProvider::new(config) {
            Ok(provider) => provider,
            Err(e) => {
                error!("Failed to configure identity provider: {e}");
                return Err(rocket);
            }
        };
        info!("Loaded OAuth config");

        // Manage the state.
        let provider: Provider = Box::new(provider);
        rocket = rocket.manage(provider);
        Ok(rocket)
    }
}
