use serde::{Deserialize, Serialize};

use crate::model::{
    candidate::{Candidate, CandidateId},
    election::Election,
};

/// API-friendly representation of a candidate with its current vote count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDesc {
    pub id: CandidateId,
    pub name: String,
    pub desc: String,
    pub votes: u64,
}

impl From<(&Candidate, u64)> for CandidateDesc {
    fn from((candidate, votes): (&Candidate, u64)) -> Self {
        Self {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            desc: candidate.description.clone(),
            votes,
        }
    }
}

/// Every candidate in display order, plus whether votes are currently accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateList {
    pub candidates: Vec<CandidateDesc>,
    pub voting_enabled: bool,
}

impl From<&Election> for CandidateList {
    fn from(election: &Election) -> Self {
        Self {
            candidates: election.candidates().map(CandidateDesc::from).collect(),
            voting_enabled: election.voting_enabled(),
        }
    }
}
