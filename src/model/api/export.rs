use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::election::Election;

use super::{
    candidate::CandidateDesc,
    stats::{voter_roll, VoterEntry},
};

/// A point-in-time copy of the whole election, offered as a file download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionExport {
    pub exported_at: DateTime<Utc>,
    pub total_votes: u64,
    pub voting_enabled: bool,
    pub candidates: Vec<CandidateDesc>,
    pub voters: Vec<VoterEntry>,
}

impl ElectionExport {
    pub fn new(election: &Election, exported_at: DateTime<Utc>) -> Self {
        Self {
            exported_at,
            total_votes: election.total_votes(),
            voting_enabled: election.voting_enabled(),
            candidates: election.candidates().map(CandidateDesc::from).collect(),
            voters: voter_roll(election),
        }
    }

    /// Suggested download name, e.g. `election-results-20240102T030405Z.json`.
    pub fn file_name(&self) -> String {
        format!(
            "election-results-{}.json",
            self.exported_at.format("%Y%m%dT%H%M%SZ")
        )
    }
}
