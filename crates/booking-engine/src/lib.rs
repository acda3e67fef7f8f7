//! # booking-engine
//!
//! Deterministic availability verification and draft-consistency repair
//! for guest-message booking assistants.
//!
//! The engine takes the structured signals produced by `guest-intake`
//! (date ranges, intents), reconciles a requested range against a busy
//! calendar, derives verified availability facts, and checks generated
//! prose against those facts — rewriting it from fixed templates when the
//! two disagree. All failure conditions become typed values (rejections,
//! unknown verdicts, validity flags); nothing in here aborts a request.
//!
//! ## Modules
//!
//! - [`event`] — busy events, merged intervals, working-timezone math
//! - [`reconcile`] — merge sweep + half-open overlap queries
//! - [`expand`] — RRULE expansion for recurring feed entries
//! - [`calendar`] — the `CalendarSource` fetch boundary and bundled sources
//! - [`availability`] — the evaluation ladder and verdicts
//! - [`facts`] — verified facts derived from verdicts
//! - [`validate`] — draft/fact consistency checks and template repair
//! - [`pipeline`] — collaborator contracts and per-message orchestration
//! - [`error`] — error types

pub mod availability;
pub mod calendar;
pub mod error;
pub mod event;
pub mod expand;
pub mod facts;
pub mod pipeline;
pub mod reconcile;
pub mod validate;

pub use availability::{evaluate, Availability, AvailabilityVerdict, Rejection};
pub use calendar::{parse_feed, CalendarSource, JsonFeed, StaticCalendar};
pub use error::CalendarError;
pub use event::{BusyEvent, EventStamp, MergedInterval, HOST_TZ};
pub use expand::expand_recurrence;
pub use facts::{FactPolarity, VerifiedFact};
pub use pipeline::{
    respond, ContextRetriever, ContextSnippet, DraftGenerator, DraftPayload, DraftRequest,
    GuestReply,
};
pub use reconcile::{overlapping, reconcile};
pub use validate::{validate_draft, ConsistencyIssue, Validation};
