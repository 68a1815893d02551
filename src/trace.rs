//! Injected tracing of knowledge base activity.
//!
//! The knowledge base never logs on its own; it reports [`TraceEvent`]s to the
//! [`Tracer`] it was built with. [`NoopTracer`] is the default, [`LogTracer`]
//! forwards to the `log` facade.

use crate::store::ItemId;
use crate::term::{Implication, Sentence, Statement};
use std::fmt;
use std::rc::Rc;

/// Something the knowledge base did
#[derive(Debug, Clone, Copy)]
pub enum TraceEvent<'a> {
    /// A sentence is being asserted by the caller
    Asserting(&'a Sentence),
    /// A new item was installed
    Added(ItemId, &'a Sentence),
    /// An existing item absorbed new justifications or was re-asserted
    Merged(ItemId),
    /// A fact is being resolved against a rule
    Inferring {
        /// The fact
        fact: &'a Statement,
        /// The rule
        rule: &'a Implication,
    },
    /// A fact is being retracted by the caller
    Retracting(&'a Statement),
    /// Retraction was requested for a fact that is derived or not stored
    RetractIgnored(&'a Statement),
    /// An item was deleted by the retraction cascade
    Removed(ItemId),
}

impl fmt::Display for TraceEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asserting(sentence) => write!(f, "asserting {sentence}"),
            Self::Added(id, sentence) => write!(f, "added {id} {sentence}"),
            Self::Merged(id) => write!(f, "merged into {id}"),
            Self::Inferring { fact, rule } => {
                write!(f, "attempting to infer from {fact} and {rule}")
            }
            Self::Retracting(statement) => write!(f, "retracting {statement}"),
            Self::RetractIgnored(statement) => {
                write!(f, "ignoring retraction of {statement}")
            }
            Self::Removed(id) => write!(f, "removed {id}"),
        }
    }
}

/// Receiver of [`TraceEvent`]s
pub trait Tracer: fmt::Debug {
    /// Called for every event
    fn trace(&self, event: &TraceEvent<'_>);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl<T: Tracer + ?Sized> Tracer for Rc<T> {
    fn trace(&self, event: &TraceEvent<'_>) {
        (**self).trace(event);
    }
}

impl Tracer for NoopTracer {
    fn trace(&self, _event: &TraceEvent<'_>) {}
}

/// Forwards events to the `log` crate
///
/// Caller-initiated events go out at `debug`, internal steps at `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn trace(&self, event: &TraceEvent<'_>) {
        match event {
            TraceEvent::Asserting(_)
            | TraceEvent::Retracting(_)
            | TraceEvent::RetractIgnored(_) => log::debug!("{event}"),
            _ => log::trace!("{event}"),
        }
    }
}
