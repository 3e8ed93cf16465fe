use log::warn;
use rocket::{
    http::Status,
    outcome::try_outcome,
    request::{FromRequest, Outcome},
    Request, State,
};

use crate::error::Error;
use crate::model::{admin::AdminPolicy, identity::Identity};

use super::session::{SessionStore, SessionToken, SESSION_COOKIE};

/// A signed-in user. Routes taking this guard reject anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct Voter {
    pub identity: Identity,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Voter {
    type Error = Error;

    /// Resolve the session cookie to a live session.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        // Unwrap is safe as `SessionStore` is always managed.
        let sessions = req.guard::<&State<SessionStore>>().await.unwrap();

        let token = match req.cookies().get_private(SESSION_COOKIE) {
            Some(cookie) => SessionToken::from(cookie.value()),
            None => return Outcome::Failure((Status::Unauthorized, Error::Unauthenticated)),
        };

        match sessions.identity(&token).await {
            Some(identity) => Outcome::Success(Self { identity }),
            None => Outcome::Failure((Status::Unauthorized, Error::Unauthenticated)),
        }
    }
}

/// A signed-in user on the admin allow-list. Anonymous requests get 401, everyone else 403.
#[derive(Debug, Clone)]
pub struct Admin {
    pub identity: Identity,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Admin {
    type Error = Error;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let voter = try_outcome!(req.guard::<Voter>().await);

        // Unwrap is safe as `AdminPolicy` is always managed.
        let policy = req.guard::<&State<AdminPolicy>>().await.unwrap();
        if policy.is_admin(&voter.identity.email) {
            Outcome::Success(Self {
                identity: voter.identity,
            })
        } else {
            warn!("{} is not an admin", voter.identity.email);
            Outcome::Failure((Status::Forbidden, Error::Forbidden))
        }
    }
}
