use serde::{Deserialize, Serialize};

use crate::model::{candidate::CandidateId, election::Election};

/// Aggregated figures for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_votes: u64,
    pub total_voters: usize,
    pub voting_enabled: bool,
    pub candidates: Vec<CandidateStats>,
    pub voters: Vec<VoterEntry>,
}

/// One candidate's share of the vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateStats {
    pub id: CandidateId,
    pub name: String,
    pub desc: String,
    pub votes: u64,
    /// Share of all votes, to one decimal place; 0 when nobody has voted.
    pub percentage: f64,
}

/// Who voted for whom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterEntry {
    pub email: String,
    pub candidate_id: CandidateId,
    /// The candidate's name.
    pub candidate: String,
}

impl From<&Election> for AdminStats {
    fn from(election: &Election) -> Self {
        let total_votes = election.total_votes();
        let candidates = election
            .candidates()
            .map(|(candidate, votes)| CandidateStats {
                id: candidate.id.clone(),
                name: candidate.name.clone(),
                desc: candidate.description.clone(),
                votes,
                percentage: percentage(votes, total_votes),
            })
            .collect();

        Self {
            total_votes,
            total_voters: election.ballot_count(),
            voting_enabled: election.voting_enabled(),
            candidates,
            voters: voter_roll(election),
        }
    }
}

/// Every ballot, ordered by voter email.
pub fn voter_roll(election: &Election) -> Vec<VoterEntry> {
    election
        .ballots()
        .filter_map(|(email, candidate_id)| {
            election.candidate(candidate_id).map(|candidate| VoterEntry {
                email: email.to_string(),
                candidate_id: candidate_id.clone(),
                candidate: candidate.name.clone(),
            })
        })
        .collect()
}

/// `100 * votes / total`, rounded to one decimal place.
pub fn percentage(votes: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (1000.0 * votes as f64 / total as f64).round() / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_to_one_decimal() {
        assert_eq!(0.0, percentage(0, 0));
        assert_eq!(0.0, percentage(0, 7));
        assert_eq!(100.0, percentage(3, 3));
        assert_eq!(33.3, percentage(1, 3));
        assert_eq!(66.7, percentage(2, 3));
        assert_eq!(12.5, percentage(1, 8));
    }

    #[test]
    fn empty_election_has_zero_percentages() {
        let stats = AdminStats::from(&Election::example());
        assert_eq!(0, stats.total_votes);
        assert_eq!(5, stats.candidates.len());
        assert!(stats.candidates.iter().all(|c| c.percentage == 0.0));
        assert!(stats.voters.is_empty());
    }

    #[test]
    fn stats_reflect_ballots() {
        let mut election = Election::example();
        for (email, candidate) in [
            ("zed@example.com", "1"),
            ("amy@example.com", "1"),
            ("kim@example.com", "3"),
        ] {
            election
                .record_vote(email, &CandidateId::from(candidate))
                .unwrap();
        }

        let stats = AdminStats::from(&election);
        assert_eq!(3, stats.total_votes);
        assert_eq!(3, stats.total_voters);
        assert!(stats.voting_enabled);
        assert_eq!(66.7, stats.candidates[0].percentage);
        assert_eq!(0.0, stats.candidates[1].percentage);
        assert_eq!(33.3, stats.candidates[2].percentage);

        let emails: Vec<_> = stats.voters.iter().map(|v| v.email.as_str()).collect();
        assert_eq!(
            vec!["amy@example.com", "kim@example.com", "zed@example.com"],
            emails
        );
        assert_eq!("Candidate 3", stats.voters[1].candidate);
    }
}
