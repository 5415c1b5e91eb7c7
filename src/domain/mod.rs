pub mod outcome;
pub mod scope;

pub use outcome::{Failure, Outcome, SkipReason};
pub use scope::{ContactId, ScopeId, ScopeKey, TabId};
