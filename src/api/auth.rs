use log::info;
use rocket::{
    http::{Cookie, CookieJar},
    response::Redirect,
    Route, State,
};

use crate::{
    config::Config,
    error::{Error, Result},
    model::{
        auth::{SessionStore, SessionToken, SESSION_COOKIE},
        oauth::{random_state, state_cookie, Provider, OAUTH_STATE_COOKIE},
    },
};

pub fn routes() -> Vec<Route> {
    routes![login, callback, logout]
}

/// Start signing in: remember a fresh `state` and send the browser to the provider.
#[get("/auth/google")]
pub fn login(cookies: &CookieJar<'_>, provider: &State<Provider>) -> Redirect {
    let state = random_state();
    let url = provider.authorize_url(&state);
    cookies.add_private(state_cookie(state));
    Redirect::to(url)
}

/// Finish signing in once the provider sends the browser back.
#[get("/auth/google/callback?<code>&<state>&<error>")]
pub async fn callback(
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    cookies: &CookieJar<'_>,
    provider: &State<Provider>,
    sessions: &State<SessionStore>,
    config: &State<Config>,
) -> Result<Redirect> {
    // The state is single-use whatever happens next.
    let expected = cookies
        .get_private(OAUTH_STATE_COOKIE)
        .map(|cookie| cookie.value().to_string());
    cookies.remove_private(Cookie::named(OAUTH_STATE_COOKIE));
    match (expected, state) {
        (Some(expected), Some(state)) if expected == state => {}
        _ => return Err(Error::OAuthState),
    }

    if let Some(error) = error {
        return Err(Error::IdentityProvider(error));
    }
    let code = code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| Error::IdentityProvider("missing authorization code".to_string()))?;

    let identity = provider.exchange(&code).await?;

    // Replace any session this browser already had.
    if let Some(previous) = cookies.get_private(SESSION_COOKIE) {
        sessions.destroy(&SessionToken::from(previous.value())).await;
    }
    let email = identity.email.clone();
    let token = sessions.create(identity, config.session_ttl()).await;
    cookies.add_private(token.into_cookie(config.session_ttl()));
    info!("{email} signed in");

    Ok(Redirect::to(config.post_login_redirect().to_string()))
}

/// Sign out: forget the server-side session and the cookie pointing at it.
#[get("/logout")]
pub async fn logout(cookies: &CookieJar<'_>, sessions: &State<SessionStore>) -> Redirect {
    if let Some(cookie) = cookies.get_private(SESSION_COOKIE) {
        if let Some(identity) = sessions.destroy(&SessionToken::from(cookie.value())).await {
            info!("{} signed out", identity.email);
        }
    }
    cookies.remove_private(Cookie::named(SESSION_COOKIE));
    Redirect::to(uri!("/"))
}

#[cfg(test)]
mod tests {
    use rocket::{http::Status, local::asynchronous::Client, serde::json::serde_json::json};

    use crate::error::ErrorBody;
    use crate::test_support::{self as support, body_json, ADMIN_EMAIL, VOTER_EMAIL};

    use super::*;

    #[backend_test]
    async fn login_redirects_to_provider(client: Client) {
        let response = client.get(uri!(login)).dispatch().await;

        assert_eq!(Status::SeeOther, response.status());
        let state = client
            .cookies()
            .get_private(OAUTH_STATE_COOKIE)
            .unwrap()
            .value()
            .to_string();
        let location = response.headers().get_one("Location").unwrap();
        assert!(location.starts_with("https://id.example.com/authorize"));
        assert!(location.ends_with(&format!("state={state}")));
    }

    #[backend_test]
    async fn callback_creates_session(client: Client) {
        support::login(&client, VOTER_EMAIL).await;

        let sessions = client.rocket().state::<SessionStore>().unwrap();
        assert_eq!(1, sessions.len().await);
        assert!(client.cookies().get_private(OAUTH_STATE_COOKIE).is_none());

        let user = body_json(client.get("/api/user").dispatch().await).await;
        assert_eq!(json!(true), user["authenticated"]);
        assert_eq!(json!(VOTER_EMAIL), user["user"]["email"]);
    }

    #[backend_test]
    async fn callback_redirects_to_configured_location(client: Client) {
        client.get(uri!(login)).dispatch().await;
        let state = client
            .cookies()
            .get_private(OAUTH_STATE_COOKIE)
            .unwrap()
            .value()
            .to_string();

        let response = client
            .get(format!("/auth/google/callback?code={VOTER_EMAIL}&state={state}"))
            .dispatch()
            .await;

        assert_eq!(Status::SeeOther, response.status());
        assert_eq!(Some("/"), response.headers().get_one("Location"));
    }

    #[backend_test]
    async fn callback_rejects_wrong_state(client: Client) {
        client.get(uri!(login)).dispatch().await;

        let response = client
            .get(format!("/auth/google/callback?code={VOTER_EMAIL}&state=forged"))
            .dispatch()
            .await;

        assert_eq!(Status::BadRequest, response.status());
        assert_eq!(
            Some(ErrorBody::new(Error::OAuthState.to_string())),
            response.into_json::<ErrorBody>().await
        );
        assert!(client.cookies().get_private(SESSION_COOKIE).is_none());
    }

    #[backend_test]
    async fn callback_without_login_is_rejected(client: Client) {
        let response = client
            .get(format!("/auth/google/callback?code={VOTER_EMAIL}&state=anything"))
            .dispatch()
            .await;

        assert_eq!(Status::BadRequest, response.status());
    }

    #[backend_test]
    async fn callback_reports_provider_refusal(client: Client) {
        client.get(uri!(login)).dispatch().await;
        let state = client
            .cookies()
            .get_private(OAUTH_STATE_COOKIE)
            .unwrap()
            .value()
            .to_string();

        let response = client
            .get(format!("/auth/google/callback?error=access_denied&state={state}"))
            .dispatch()
            .await;

        assert_eq!(Status::Unauthorized, response.status());
        assert!(client.cookies().get_private(SESSION_COOKIE).is_none());
    }

    #[backend_test]
    async fn callback_rejects_bad_code(client: Client) {
        client.get(uri!(login)).dispatch().await;
        let state = client
            .cookies()
            .get_private(OAUTH_STATE_COOKIE)
            .unwrap()
            .value()
            .to_string();

        let response = client
            .get(format!("/auth/google/callback?code=garbage&state={state}"))
            .dispatch()
            .await;

        assert_eq!(Status::Unauthorized, response.status());
    }

    #[backend_test]
    async fn relogin_replaces_session(client: Client) {
        support::login(&client, VOTER_EMAIL).await;
        support::login(&client, ADMIN_EMAIL).await;

        let sessions = client.rocket().state::<SessionStore>().unwrap();
        assert_eq!(1, sessions.len().await);

        let user = body_json(client.get("/api/user").dispatch().await).await;
        assert_eq!(json!(ADMIN_EMAIL), user["user"]["email"]);
    }

    #[backend_test(voter)]
    async fn logout_ends_session(client: Client) {
        support::logout(&client).await;

        assert!(client.cookies().get_private(SESSION_COOKIE).is_none());
        let sessions = client.rocket().state::<SessionStore>().unwrap();
        assert_eq!(0, sessions.len().await);

        let user = body_json(client.get("/api/user").dispatch().await).await;
        assert_eq!(json!({ "authenticated": false }), user);
    }

    #[backend_test]
    async fn logout_not_logged_in(client: Client) {
        let response = client.get(uri!(logout)).dispatch().await;

        assert_eq!(Status::SeeOther, response.status());
    }
}
