//! Paged collection and rate-limited bulk mutation primitives.
//!
//! This crate holds the two algorithms everything else in slackup is built
//! around: walking a paginated remote listing to completion
//! ([`collect_cursor`], [`collect_window`]) and applying an irreversible
//! mutation across an ordered batch without letting one item's failure sink
//! the rest ([`apply_all`]).
//!
//! Remote calls are injected as async closures; this crate never talks to
//! the network itself and is generic over the caller's error type.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod bulk;
mod page;
mod window;

pub use crate::bulk::{MutationOutcome, MutationReport, apply_all};
pub use crate::page::{CursorPage, collect_cursor};
pub use crate::window::{History, Timestamped, Walk, WindowBounds, WindowPage, collect_window};

/// Tracing target for collector and mutator operations.
pub const TRACING_TARGET: &str = "slackup_core";
