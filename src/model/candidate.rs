use std::fmt::{Display, Formatter};

use rocket::request::FromParam;
use serde::{Deserialize, Deserializer, Serialize};

/// Stable, unique identifier of a candidate.
///
/// IDs are decimal strings handed out by a monotonic counter, so they are never reused even
/// after the candidate they named has been deleted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn from_counter(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Display for CandidateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CandidateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Browsers send candidate IDs either as strings or as bare numbers; accept both.
impl<'de> Deserialize<'de> for CandidateId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(id) => Self(id),
            Raw::Number(id) => Self::from_counter(id),
        })
    }
}

impl<'a> FromParam<'a> for CandidateId {
    type Error = &'a str;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        if param.is_empty() {
            Err(param)
        } else {
            Ok(Self::from(param))
        }
    }
}

/// A candidate that can be voted for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    #[serde(rename = "desc")]
    pub description: String,
}

/// The fields needed to create a candidate. Missing fields deserialize as empty and are
/// rejected when the candidate is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCandidate {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "desc")]
    pub description: String,
}

impl NewCandidate {
    /// Placeholder candidates used when none are configured.
    pub fn defaults() -> Vec<Self> {
        ["A", "B", "C", "D", "E"]
            .into_iter()
            .map(|letter| Self {
                name: format!("Candidate {letter}"),
                description: format!("Placeholder candidate {letter}"),
            })
            .collect()
    }
}

/// A partial update to a candidate; only the supplied fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "desc")]
    pub description: Option<String>,
}


#[cfg(test)]
mod tests {
    use rocket::serde::json::serde_json::{self, json};

    use super::*;

    #[test]
    fn candidate_id_accepts_numbers_and_strings() {
        let from_text: CandidateId = serde_json::from_value(json!("12")).unwrap();
        let from_number: CandidateId = serde_json::from_value(json!(12)).unwrap();
        assert_eq!(from_text, from_number);
        assert_eq!(json!("12"), serde_json::to_value(&from_number).unwrap());
    }

    #[test]
    fn candidate_uses_desc_on_the_wire() {
        let candidate = Candidate {
            id: CandidateId::from_counter(1),
            name: "Ada".to_string(),
            description: "Engines".to_string(),
        };
        assert_eq!(
            json!({ "id": "1", "name": "Ada", "desc": "Engines" }),
            serde_json::to_value(&candidate).unwrap()
        );
    }

    #[test]
    fn missing_fields_become_empty() {
        let new: NewCandidate = serde_json::from_value(json!({ "name": "Ada" })).unwrap();
        assert_eq!("", new.description);

        let patch: CandidatePatch = serde_json::from_value(json!({ "desc": "New" })).unwrap();
        assert_eq!(None, patch.name);
        assert_eq!(Some("New".to_string()), patch.description);
    }

    #[test]
    fn five_default_candidates() {
        let defaults = NewCandidate::defaults();
        assert_eq!(5, defaults.len());
        assert!(defaults.iter().all(|c| !c.name.is_empty()));
    }
}
