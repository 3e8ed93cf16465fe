use rocket::tokio::sync::{Mutex, MutexGuard};

use super::Election;

/// The single shared [`Election`], behind one lock.
///
/// Every handler that reads or changes the election does so through [`ElectionStore::lock`], so
/// each check-then-write sequence (e.g. "not voted yet, so count the vote") runs with no other
/// request interleaved.
#[derive(Debug)]
pub struct ElectionStore {
    election: Mutex<Election>,
}

impl ElectionStore {
    pub fn new(election: Election) -> Self {
        Self {
            election: Mutex::new(election),
        }
    }

    /// Wait for exclusive access to the election.
    pub async fn lock(&self) -> MutexGuard<'_, Election> {
        self.election.lock().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rocket::tokio;

    use crate::error::Error;
    use crate::model::candidate::CandidateId;

    use super::*;

    #[rocket::async_test]
    async fn concurrent_votes_from_one_voter_count_once() {
        let store = Arc::new(ElectionStore::new(Election::example()));

        let attempts = (1..=5)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .lock()
                        .await
                        .record_vote("same@example.com", &CandidateId::from_counter(n))
                        .map(|candidate| candidate.id.clone())
                })
            })
            .collect::<Vec<_>>();

        let mut accepted = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(Error::AlreadyVoted) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(1, accepted);
        let election = store.lock().await;
        assert_eq!(1, election.total_votes());
        assert_eq!(1, election.ballot_count());
    }
}
