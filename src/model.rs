//! Test-subject data model.
//!
//! A [`RunSubject`] owns three structures over one id space:
//!
//! ```text
//! RunSubject
//! ├─ ElementTree        forest of elements / text leaves   (element_tree.rs)
//! ├─ StyleMap baseline  id -> {property: value}             (style_map.rs)
//! └─ StyleMap override  id -> {property: value}             (style_map.rs)
//! ```
//!
//! `signature.rs` holds the fingerprinting rules shared by the subject and
//! anything else that needs to compare bug classes.

#[path = "model/element_tree.rs"]
mod element_tree;
#[path = "model/signature.rs"]
mod signature;
#[path = "model/style_map.rs"]
mod style_map;
#[path = "model/subject.rs"]
mod subject;

pub use element_tree::{Element, ElementNode, ElementTree, Elements, NO_ID, TEXT_TAG, TextLeaf};
pub use signature::{simplify_style_token, styles_signature};
pub use style_map::{Declarations, StyleLayer, StyleMap};
pub use subject::{RunSubject, SubjectSize};
