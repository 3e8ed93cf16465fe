use serde::{Deserialize, Serialize};

use crate::model::identity::Identity;

/// Who the caller is, as far as the frontend needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatus {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Identity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_voted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

impl UserStatus {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            user: None,
            has_voted: None,
            is_admin: None,
        }
    }

    pub fn signed_in(identity: Identity, has_voted: bool, is_admin: bool) -> Self {
        Self {
            authenticated: true,
            user: Some(identity),
            has_voted: Some(has_voted),
            is_admin: Some(is_admin),
        }
    }
}
