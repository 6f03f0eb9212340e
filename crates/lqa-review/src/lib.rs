//! # lqa-review
//!
//! The quality review workflow on top of the `lqa-db` entity store.
//!
//! - [`machine`]: role and status guards plus the derived fields of each
//!   report transition. Pure; the persisted write happens in [`workflow`].
//! - [`workflow`]: `ReviewEngine`, which loads a report, plans the transition,
//!   applies it with an optimistic-concurrency guard, and dispatches the
//!   resulting notifications.
//! - [`escalation`]: the two threshold rules evaluated over a freelancer's
//!   eligible reports.
//! - [`sweep`]: auto-acceptance of reports whose review deadline has passed.
//! - [`notify`]: the `NotificationDispatcher` contract and its log, outbox,
//!   and webhook implementations.

pub mod error;
pub mod escalation;
pub mod machine;
pub mod messages;
pub mod notify;
pub mod sweep;
pub mod workflow;

pub use error::ReviewError;
pub use escalation::{EscalationEvent, EscalationOutcome};
pub use notify::{DispatchSummary, NotificationDispatcher, NotificationIntent};
pub use workflow::{ReviewEngine, TransitionOutcome};
