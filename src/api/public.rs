use rocket::{serde::json::Json, Route, State};

use crate::model::{
    admin::AdminPolicy,
    api::{candidate::CandidateList, user::UserStatus},
    auth::Voter,
    election::ElectionStore,
};

pub fn routes() -> Vec<Route> {
    routes![user, candidates]
}

/// Who the caller is. Never fails: anonymous callers are told so.
#[get("/api/user")]
async fn user(
    voter: Option<Voter>,
    election: &State<ElectionStore>,
    policy: &State<AdminPolicy>,
) -> Json<UserStatus> {
    let status = match voter {
        Some(voter) => {
            let has_voted = election.lock().await.has_voted(&voter.identity.email);
            let is_admin = policy.is_admin(&voter.identity.email);
            UserStatus::signed_in(voter.identity, has_voted, is_admin)
        }
        None => UserStatus::anonymous(),
    };
    Json(status)
}

#[get("/api/candidates")]
async fn candidates(election: &State<ElectionStore>) -> Json<CandidateList> {
    Json(CandidateList::from(&*election.lock().await))
}

#[cfg(test)]
mod tests {
    use rocket::{http::Status, local::asynchronous::Client, serde::json::serde_json::json};

    use crate::model::candidate::CandidateId;
    use crate::test_support::{body_json, ADMIN_EMAIL, VOTER_EMAIL};

    use super::*;

    #[backend_test]
    async fn user_anonymous(client: Client) {
        let response = client.get(uri!(user)).dispatch().await;

        assert_eq!(Status::Ok, response.status());
        assert_eq!(json!({ "authenticated": false }), body_json(response).await);
    }

    #[backend_test(voter)]
    async fn user_voter(client: Client) {
        let user = body_json(client.get(uri!(user)).dispatch().await).await;

        assert_eq!(json!(true), user["authenticated"]);
        assert_eq!(json!(VOTER_EMAIL), user["user"]["email"]);
        assert_eq!(json!(false), user["hasVoted"]);
        assert_eq!(json!(false), user["isAdmin"]);
    }

    #[backend_test(admin)]
    async fn user_admin(client: Client) {
        // The allow-list entry is configured in upper case.
        let user = body_json(client.get(uri!(user)).dispatch().await).await;

        assert_eq!(json!(ADMIN_EMAIL), user["user"]["email"]);
        assert_eq!(json!(true), user["isAdmin"]);
    }

    #[backend_test(voter)]
    async fn user_reports_vote(client: Client) {
        let election = client.rocket().state::<ElectionStore>().unwrap();
        election
            .lock()
            .await
            .record_vote(VOTER_EMAIL, &CandidateId::from("2"))
            .unwrap();

        let user = body_json(client.get(uri!(user)).dispatch().await).await;
        assert_eq!(json!(true), user["hasVoted"]);
    }

    #[backend_test]
    async fn candidates_anonymous(client: Client) {
        let response = client.get(uri!(candidates)).dispatch().await;

        assert_eq!(Status::Ok, response.status());
        let list = response.into_json::<CandidateList>().await.unwrap();
        assert!(list.voting_enabled);
        assert_eq!(5, list.candidates.len());
        for (n, candidate) in (1..).zip(&list.candidates) {
            assert_eq!(CandidateId::from_counter(n), candidate.id);
            assert_eq!(format!("Candidate {n}"), candidate.name);
            assert_eq!(format!("Description {n}"), candidate.desc);
            assert_eq!(0, candidate.votes);
        }
    }

    #[backend_test]
    async fn candidates_show_closed_voting(client: Client) {
        let election = client.rocket().state::<ElectionStore>().unwrap();
        election.lock().await.set_voting_enabled(false);

        let list = body_json(client.get(uri!(candidates)).dispatch().await).await;
        assert_eq!(json!(false), list["votingEnabled"]);
    }
}
