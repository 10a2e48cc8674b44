//! Webhook dispatch: turning one inbound delivery into a [`SyncOutcome`].

pub mod dispatcher;
pub mod notification;
pub mod outcome;

pub use dispatcher::{DispatchSettings, Dispatcher, REQUEST_SEPARATOR};
pub use notification::InboundNotification;
pub use outcome::{Failure, SyncOutcome};
