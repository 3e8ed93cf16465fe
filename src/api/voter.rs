use std::collections::BTreeMap;

use log::info;
use rocket::{serde::json::Json, Route, State};

use crate::error::{Error, Result};
use crate::model::{
    api::{message::Message, voting::VoteRequest},
    auth::Voter,
    candidate::CandidateId,
    election::ElectionStore,
};

pub fn routes() -> Vec<Route> {
    routes![vote, results]
}

#[post("/api/vote", data = "<vote>")]
async fn vote(
    voter: Voter,
    vote: Json<VoteRequest>,
    election: &State<ElectionStore>,
) -> Result<Json<Message>> {
    let candidate_id = vote
        .into_inner()
        .candidate_id
        .ok_or_else(|| Error::invalid_input("`candidateId` is required"))?;

    let mut election = election.lock().await;
    let candidate = election.record_vote(&voter.identity.email, &candidate_id)?;
    info!("{} voted for candidate {}", voter.identity.email, candidate.id);

    Ok(Json(Message::success(format!(
        "Vote recorded for {}",
        candidate.name
    ))))
}

/// Current tallies keyed by candidate ID.
#[get("/api/results")]
async fn results(
    _voter: Voter,
    election: &State<ElectionStore>,
) -> Json<BTreeMap<CandidateId, u64>> {
    Json(election.lock().await.tally())
}
