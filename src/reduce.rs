//! Reduction (minimization) engine.
//!
//! Given a subject that reproduces a defect, find a smaller one that still
//! does, using as few oracle calls as possible, and only hand it back after an
//! independent re-verification.
//!
//! ```text
//! provider.next(current) ──► candidate ──► oracle.test ──► bug? accept : discard
//!        ▲                                                      │
//!        └──────────────────────────────────────────────────────┘
//!                     until the provider is exhausted
//!                               │
//!                               ▼
//!               oracle.test(current) ──► classify ──► Reduction
//! ```
//!
//! ## Responsibilities by module
//!
//! - `oracle.rs`: the [`Oracle`] contract and [`Outcome`] values.
//! - `provider.rs`: the [`ReductionStepProvider`] contract and the default
//!   element-then-style [`MinifyStepProvider`].
//! - `driver.rs`: the shrink loop ([`Reducer`]).
//! - `verdict.rs`: false-positive classification of the final result.
//! - `metrics.rs`: per-step trace for reporting and tests.
//! - `command.rs`: an oracle that runs an external program.

#[path = "reduce/command.rs"]
mod command;
#[path = "reduce/driver.rs"]
mod driver;
#[path = "reduce/metrics.rs"]
mod metrics;
#[path = "reduce/oracle.rs"]
mod oracle;
#[path = "reduce/provider.rs"]
mod provider;
#[path = "reduce/verdict.rs"]
mod verdict;

pub use command::CommandOracle;
pub use driver::{ReduceOptions, Reducer, Reduction};
pub use metrics::{ReductionMetrics, StepMetrics};
pub use oracle::{BugKind, Oracle, Outcome};
pub use provider::{MinifyStepProvider, ReductionStep, ReductionStepProvider, plan_steps};
pub use verdict::{ReductionVerdict, classify};
