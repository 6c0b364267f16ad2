//! Client-side data synchronization: remote queries, the message composer
//! and the small state holders they are built from.

pub mod composer;
pub mod form;
pub mod pending;
pub mod query;

pub use composer::{
    MessageComposer, MessageSink, SubmissionState, SubmitOutcome, INTERRUPTED_MESSAGE,
    IN_FLIGHT_MESSAGE,
};
pub use form::FormState;
pub use pending::PendingValue;
pub use query::{QuerySource, QueryState, Refetch, RemoteQuery};
