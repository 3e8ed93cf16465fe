use chrono::Utc;
use log::info;
use rocket::{http::Header, serde::json::Json, Route, State};

use crate::error::Result;
use crate::model::{
    api::{
        export::ElectionExport,
        message::Message,
        stats::AdminStats,
        voting::{SetVoting, VotingState},
    },
    auth::Admin,
    candidate::{Candidate, CandidateId, CandidatePatch, NewCandidate},
    election::ElectionStore,
};

pub fn routes() -> Vec<Route> {
    routes![
        stats,
        toggle_voting,
        set_voting,
        reset_votes,
        add_candidate,
        update_candidate,
        delete_candidate,
        export,
    ]
}

#[get("/api/admin/stats")]
async fn stats(_admin: Admin, election: &State<ElectionStore>) -> Json<AdminStats> {
    Json(AdminStats::from(&*election.lock().await))
}

#[post("/api/admin/toggle-voting")]
async fn toggle_voting(admin: Admin, election: &State<ElectionStore>) -> Json<VotingState> {
    let enabled = election.lock().await.toggle_voting_enabled();
    info!(
        "{} {} voting",
        admin.identity.email,
        if enabled { "opened" } else { "closed" }
    );
    Json(VotingState::new(enabled))
}

#[post("/api/admin/set-voting", data = "<request>")]
async fn set_voting(
    admin: Admin,
    request: Json<SetVoting>,
    election: &State<ElectionStore>,
) -> Json<VotingState> {
    let enabled = request.enabled;
    election.lock().await.set_voting_enabled(enabled);
    info!("{} set voting enabled to {enabled}", admin.identity.email);
    Json(VotingState::new(enabled))
}

#[post("/api/admin/reset-votes")]
async fn reset_votes(admin: Admin, election: &State<ElectionStore>) -> Json<Message> {
    election.lock().await.reset();
    info!("{} reset all votes", admin.identity.email);
    Json(Message::success("All votes have been reset"))
}

#[post("/api/admin/add-candidate", data = "<candidate>")]
async fn add_candidate(
    admin: Admin,
    candidate: Json<NewCandidate>,
    election: &State<ElectionStore>,
) -> Result<Json<Candidate>> {
    let candidate = election.lock().await.add_candidate(candidate.into_inner())?;
    info!(
        "{} added candidate {} ({})",
        admin.identity.email, candidate.id, candidate.name
    );
    Ok(Json(candidate))
}

#[put("/api/admin/update-candidate/<id>", data = "<patch>")]
async fn update_candidate(
    admin: Admin,
    id: CandidateId,
    patch: Json<CandidatePatch>,
    election: &State<ElectionStore>,
) -> Result<Json<Candidate>> {
    let candidate = election
        .lock()
        .await
        .update_candidate(&id, patch.into_inner())?;
    info!("{} updated candidate {id}", admin.identity.email);
    Ok(Json(candidate))
}

#[delete("/api/admin/delete-candidate/<id>")]
async fn delete_candidate(
    admin: Admin,
    id: CandidateId,
    election: &State<ElectionStore>,
) -> Result<Json<Message>> {
    let deleted = election.lock().await.delete_candidate(&id)?;
    info!(
        "{} deleted candidate {id} ({}), discarding {} ballot(s)",
        admin.identity.email, deleted.candidate.name, deleted.discarded_ballots
    );
    Ok(Json(Message::success(format!(
        "Candidate {} deleted",
        deleted.candidate.name
    ))))
}

/// An election snapshot served as a file download.
#[derive(Responder)]
struct ExportDownload {
    inner: Json<ElectionExport>,
    disposition: Header<'static>,
}

#[get("/api/admin/export")]
async fn export(admin: Admin, election: &State<ElectionStore>) -> ExportDownload {
    let snapshot = ElectionExport::new(&*election.lock().await, Utc::now());
    let disposition = Header::new(
        "Content-Disposition",
        format!("attachment; filename=\"{}\"", snapshot.file_name()),
    );
    info!("{} exported the election", admin.identity.email);
    ExportDownload {
        inner: Json(snapshot),
        disposition,
    }
}
