use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::{
    candidate::{Candidate, CandidateId, CandidatePatch, NewCandidate},
    identity::normalize_email,
};

/// A candidate together with its running vote count.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    candidate: Candidate,
    votes: u64,
}

/// The outcome of deleting a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deleted {
    pub candidate: Candidate,
    /// Ballots that pointed at the candidate and were discarded with it.
    pub discarded_ballots: usize,
}

/// The whole election: candidates in display order with their tallies, who voted for what,
/// and whether voting is open.
///
/// Every candidate owns exactly one tally, and every ballot refers to an existing candidate.
/// The sum of all tallies always equals the number of ballots.
#[derive(Debug, Clone)]
pub struct Election {
    entries: Vec<Entry>,
    /// Keyed by normalized voter email.
    ballots: BTreeMap<String, CandidateId>,
    voting_enabled: bool,
    next_id: u64,
}

impl Default for Election {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            ballots: BTreeMap::new(),
            voting_enabled: true,
            next_id: 1,
        }
    }
}

impl Election {
    /// Create an open election seeded with the given candidates, all on zero votes.
    pub fn with_candidates<I>(seed: I) -> Result<Self>
    where
        I: IntoIterator<Item = NewCandidate>,
    {
        let mut election = Self::default();
        for candidate in seed {
            election.add_candidate(candidate)?;
        }
        Ok(election)
    }

    /// Candidates in display order, each with its current tally.
    pub fn candidates(&self) -> impl Iterator<Item = (&Candidate, u64)> + '_ {
        self.entries
            .iter()
            .map(|entry| (&entry.candidate, entry.votes))
    }

    pub fn candidate(&self, id: &CandidateId) -> Option<&Candidate> {
        self.entry(id).map(|entry| &entry.candidate)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vote count per candidate.
    pub fn tally(&self) -> BTreeMap<CandidateId, u64> {
        self.entries
            .iter()
            .map(|entry| (entry.candidate.id.clone(), entry.votes))
            .collect()
    }

    pub fn total_votes(&self) -> u64 {
        self.entries.iter().map(|entry| entry.votes).sum()
    }

    /// All ballots as `(voter email, candidate)`, ordered by email.
    pub fn ballots(&self) -> impl Iterator<Item = (&str, &CandidateId)> + '_ {
        self.ballots
            .iter()
            .map(|(email, candidate)| (email.as_str(), candidate))
    }

    pub fn ballot_count(&self) -> usize {
        self.ballots.len()
    }

    pub fn has_voted(&self, email: &str) -> bool {
        self.ballots.contains_key(&normalize_email(email))
    }

    pub fn voting_enabled(&self) -> bool {
        self.voting_enabled
    }

    /// Record `email`'s one vote for `candidate_id`.
    ///
    /// Checked in order: voting is open, the voter hasn't voted, the candidate exists.
    pub fn record_vote(&mut self, email: &str, candidate_id: &CandidateId) -> Result<&Candidate> {
        if !self.voting_enabled {
            return Err(Error::VotingClosed);
        }
        let voter = normalize_email(email);
        if self.ballots.contains_key(&voter) {
            return Err(Error::AlreadyVoted);
        }
        let index = self
            .position(candidate_id)
            .ok_or_else(|| Error::UnknownCandidate(candidate_id.clone()))?;

        self.ballots.insert(voter, candidate_id.clone());
        let entry = &mut self.entries[index];
        entry.votes += 1;
        Ok(&entry.candidate)
    }

    /// Append a new candidate with a fresh ID and zero votes.
    pub fn add_candidate(&mut self, new: NewCandidate) -> Result<Candidate> {
        let name = required("name", &new.name)?;
        let description = required("desc", &new.description)?;

        let candidate = Candidate {
            id: CandidateId::from_counter(self.next_id),
            name,
            description,
        };
        self.next_id += 1;
        self.entries.push(Entry {
            candidate: candidate.clone(),
            votes: 0,
        });
        Ok(candidate)
    }

    /// Change only the fields present in `patch`.
    pub fn update_candidate(&mut self, id: &CandidateId, patch: CandidatePatch) -> Result<Candidate> {
        let index = self
            .position(id)
            .ok_or_else(|| Error::not_found(format!("Candidate {id}")))?;

        // Validate everything before touching anything.
        let name = patch
            .name
            .as_deref()
            .map(|name| required("name", name))
            .transpose()?;
        let description = patch
            .description
            .as_deref()
            .map(|description| required("desc", description))
            .transpose()?;

        let candidate = &mut self.entries[index].candidate;
        if let Some(name) = name {
            candidate.name = name;
        }
        if let Some(description) = description {
            candidate.description = description;
        }
        Ok(candidate.clone())
    }

    /// Remove a candidate, its tally, and every ballot cast for it.
    pub fn delete_candidate(&mut self, id: &CandidateId) -> Result<Deleted> {
        let index = self
            .position(id)
            .ok_or_else(|| Error::not_found(format!("Candidate {id}")))?;

        let entry = self.entries.remove(index);
        let before = self.ballots.len();
        self.ballots.retain(|_, candidate| candidate != id);

        Ok(Deleted {
            candidate: entry.candidate,
            discarded_ballots: before - self.ballots.len(),
        })
    }

    pub fn set_voting_enabled(&mut self, enabled: bool) {
        self.voting_enabled = enabled;
    }

    /// Flip the voting flag, returning its new value.
    pub fn toggle_voting_enabled(&mut self) -> bool {
        self.voting_enabled = !self.voting_enabled;
        self.voting_enabled
    }

    /// Zero every tally and forget every ballot. Candidates and the voting flag are kept.
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.votes = 0;
        }
        self.ballots.clear();
    }

    fn position(&self, id: &CandidateId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| &entry.candidate.id == id)
    }

    fn entry(&self, id: &CandidateId) -> Option<&Entry> {
        self.entries.iter().find(|entry| &entry.candidate.id == id)
    }
}

/// Trim a required text field, rejecting it if nothing is left.
fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(Error::invalid_input(format!("`{field}` must not be empty")))
    } else {
        Ok(value.to_string())
    }
}
