//! API-compatible types.
//!
//! The types in this module are serialised in an API-friendly way, e.g.:
//!
//! - Field names are camelCase.
//! - Candidate descriptions are called `desc`.
//! - Datetimes are serialised as RFC 3339 strings.

pub mod candidate;
pub mod export;
pub mod message;
pub mod stats;
pub mod user;
pub mod voting;
