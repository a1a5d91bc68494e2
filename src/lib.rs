//! Test-case reduction and bug-class generalization for layout fuzzing.
//!
//! A *subject* is a generated document plus two style layers: the baseline
//! styles it starts with and the overrides its style-change script applies.
//! When an oracle (usually a browser harness) reports a layout bug for a
//! subject, this crate
//!
//! 1. shrinks it to a smaller subject that still fails ([`reduce`]),
//! 2. merges several failing subjects into a generalized tree holding only
//!    what they share ([`merge`]), and
//! 3. turns that tree into a rule that recognizes the same bug class in
//!    future subjects so they can be skipped ([`rules`]).
//!
//! ```no_run
//! use layout_reducer::{Outcome, ReduceOptions, RunSubject, api};
//!
//! # fn load() -> RunSubject { unimplemented!() }
//! let subject = load();
//! let mut oracle = |s: &RunSubject| -> layout_reducer::Result<Outcome> {
//!     Ok(if s.overrides().is_empty() { Outcome::Pass } else { Outcome::Crash })
//! };
//! let reduction = api::minimize(subject, &mut oracle, &ReduceOptions::default())?;
//! println!("{} -> {}", reduction.metrics.initial_size, reduction.subject.size());
//! # Ok::<(), layout_reducer::Error>(())
//! ```

#[macro_use]
mod macros;

pub mod api;
pub mod config;
pub mod error;
pub mod materialize;
pub mod merge;
pub mod model;
pub mod reduce;
pub mod rules;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use materialize::{FileMaterializer, Materializer};
pub use merge::{Generalized, SubjectView};
pub use model::{Element, ElementTree, RunSubject, StyleMap};
pub use reduce::{Oracle, Outcome, ReduceOptions, Reducer, Reduction, ReductionStepProvider, ReductionVerdict};
pub use rules::{Rule, RuleMatcher, RuleStore};
