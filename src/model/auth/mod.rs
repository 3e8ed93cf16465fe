mod guard;
mod session;

pub use guard::{Admin, Voter};
pub use session::{SessionStore, SessionToken, SESSION_COOKIE};
