//! # tmskb
//!
//! A forward-chaining knowledge base with justification-based truth maintenance.
//!
//! ## Features
//!
//! - Forward chaining: every assertion is closed under the stored rules
//! - Justifications: every derived fact or rule records the fact/rule pair it came from
//! - Retraction: removing a root fact removes everything that depended only on it
//!
//! ## Example
//!
//! ```rust
//! use tmskb::{KnowledgeBase, Statement, Term};
//!
//! let mut kb = KnowledgeBase::new();
//! kb.assert_fact(Statement::new("p", [Term::sym("a")])).unwrap();
//! kb.assert_rule(
//!     [Statement::new("p", [Term::var("x")])],
//!     Statement::new("q", [Term::var("x")]),
//! )
//! .unwrap();
//! assert!(kb.holds(&Statement::new("q", [Term::sym("a")])));
//!
//! kb.retract(&Statement::new("p", [Term::sym("a")]));
//! assert!(!kb.holds(&Statement::new("q", [Term::sym("a")])));
//! ```

/// Knowledge base settings.
pub mod config;
/// Error types.
pub mod error;
/// The inference step.
pub mod infer;
/// The knowledge base.
pub mod kb;
/// Text syntax reader.
#[cfg(feature = "parsing")]
pub mod parse;
/// Fact and rule storage.
pub mod store;
/// Statements, rules and sentences.
pub mod term;
/// Pluggable tracing.
pub mod trace;
/// Matching and instantiation.
pub mod unify;

pub use config::KbConfig;
pub use error::{KbError, Result};
pub use infer::{infer, Derivation};
pub use kb::{Answer, KnowledgeBase};
pub use store::{Fact, FactId, ItemId, Justification, Rule, RuleId};
pub use term::{Implication, Sentence, Statement, Term};
pub use trace::{LogTracer, NoopTracer, TraceEvent, Tracer};
pub use unify::{instantiate, instantiate_all, match_statements, Bindings};
