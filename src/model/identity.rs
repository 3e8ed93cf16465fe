use serde::{Deserialize, Serialize};

/// A verified user, as reported by the identity provider at sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The provider's stable subject ID.
    pub id: String,
    /// Always lowercase, so it can be compared directly.
    pub email: String,
    pub name: String,
    /// URL of the user's avatar, possibly empty.
    pub photo: String,
}

impl Identity {
    pub fn new(
        id: impl Into<String>,
        email: &str,
        name: impl Into<String>,
        photo: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: normalize_email(email),
            name: name.into(),
            photo: photo.into(),
        }
    }
}

/// Canonical form of an email address for comparisons and ballot keys.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_lowercased() {
        assert_eq!("grace.hopper@example.com", Identity::example().email);
        assert_eq!("a@b.c", normalize_email("  A@B.C "));
    }
}
