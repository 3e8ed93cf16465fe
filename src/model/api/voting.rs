use serde::{Deserialize, Serialize};

use crate::model::candidate::CandidateId;

/// Body of a vote. A missing ID is reported as invalid input rather than a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[serde(default)]
    pub candidate_id: Option<CandidateId>,
}

/// Body of an explicit open/close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetVoting {
    pub enabled: bool,
}

/// The voting flag after an admin changed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingState {
    pub success: bool,
    pub voting_enabled: bool,
}

impl VotingState {
    pub fn new(voting_enabled: bool) -> Self {
        Self {
            success: true,
            voting_enabled,
        }
    }
}
