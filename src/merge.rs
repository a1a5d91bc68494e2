//! Merge / generalization engine.
//!
//! Two failing subjects are turned into [`SubjectView`]s, aligned at their
//! start anchors (the first element carrying an override style) and merged
//! outward:
//!
//! ```text
//!   view A            view B                 generalized
//!   body#Root         body#Root              body#Root
//!    ├ p               ├ p                    ├ p
//!    ├ div* ◄──────────┼ div*        ──►      ├ div*   (shared overrides)
//!    ├ span            └ span                 └ span
//!    └ i
//! ```
//!
//! Where the inputs agree the value is kept; where they disagree it becomes
//! `"diff"`, and a structural mismatch becomes the `Empty` sentinel.
//!
//! ## Responsibilities by module
//!
//! - `tree.rs`: arena [`NodeTree`], node payloads, [`DiffMask`].
//! - `view.rs`: building a [`SubjectView`] from a `RunSubject`.
//! - `build.rs`: [`merge_nodes`], [`build_down`], [`merge_trees`].
//! - `generalize.rs`: N-way fold and canonical input order.

#[path = "merge/build.rs"]
mod build;
#[path = "merge/generalize.rs"]
mod generalize;
#[path = "merge/tree.rs"]
mod tree;
#[path = "merge/view.rs"]
mod view;

pub use build::{Generalized, build_down, merge_declarations, merge_nodes, merge_trees};
pub use generalize::{canonical_order, generalize};
pub use tree::{DIFF, DiffMask, EMPTY, ElementFacts, NodeData, NodeId, NodeTree};
pub use view::{Side, SubjectView, VIEW_ROOT_ID, VIEW_ROOT_TAG};
