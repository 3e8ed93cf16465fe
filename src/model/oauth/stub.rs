use crate::error::{Error, Result};
use crate::model::identity::Identity;

use super::IdentityProvider;

/// Stand-in provider for tests: the authorization code *is* the user's email. The authorize URL
/// names a host that is never contacted.
#[derive(Debug, Default)]
pub struct StubProvider;

#[rocket::async_trait]
impl IdentityProvider for StubProvider {
    fn authorize_url(&self, state: &str) -> String {
        format!("https://id.example.com/authorize?state={state}")
    }

    async fn exchange(&self, code: &str) -> Result<Identity> {
        let (local, _) = code
            .split_once('@')
            .ok_or_else(|| Error::IdentityProvider(format!("unknown code {code}")))?;
        Ok(Identity::new(
            format!("stub-{local}"),
            code,
            local,
            format!("https://id.example.com/{local}.png"),
        ))
    }
}
