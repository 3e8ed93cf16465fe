pub use election_core::{Deleted, Election};
pub use store::ElectionStore;

mod election_core;
mod store;
