use std::fmt::Display;

use log::{error, warn};
use reqwest::Error as HttpError;
use rocket::{
    http::{Status, StatusClass},
    response::{self, Responder},
    serde::json::Json,
    Request,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::candidate::CandidateId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Admin access required")]
    Forbidden,
    #[error("Voting is currently closed")]
    VotingClosed,
    #[error("You have already voted")]
    AlreadyVoted,
    #[error("Unknown candidate: {0}")]
    UnknownCandidate(CandidateId),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Sign-in state is missing or does not match")]
    OAuthState,
    #[error("Sign-in failed: {0}")]
    IdentityProvider(String),
    #[error("Failed to contact identity provider: {0}")]
    Http(#[from] HttpError),
}

impl Error {
    /// Construct a [`Error::NotFound`] for the given resource description.
    pub fn not_found(what: impl Display) -> Self {
        Self::NotFound(what.to_string())
    }

    /// Construct a [`Error::InvalidInput`] with the given reason.
    pub fn invalid_input(reason: impl Display) -> Self {
        Self::InvalidInput(reason.to_string())
    }

    /// The HTTP status this error is reported with.
    pub fn status(&self) -> Status {
        match self {
            Self::Unauthenticated | Self::IdentityProvider(_) => Status::Unauthorized,
            Self::Forbidden => Status::Forbidden,
            Self::VotingClosed
            | Self::AlreadyVoted
            | Self::UnknownCandidate(_)
            | Self::InvalidInput(_)
            | Self::OAuthState => Status::BadRequest,
            Self::NotFound(_) => Status::NotFound,
            Self::Http(_) => Status::BadGateway,
        }
    }
}

/// The JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        match status.class() {
            StatusClass::ServerError => error!("{} {}: {self}", req.method(), req.uri()),
            _ => warn!("{} {}: {self}", req.method(), req.uri()),
        }
        (status, Json(ErrorBody::new(self.to_string()))).respond_to(req)
    }
}
