//! Linkify - turn plain-text URLs and e-mail addresses into links
//!
//! Walks a document subtree, finds text matching the registered handlers and
//! splices link nodes in its place. Excluded elements (anchors, form
//! controls, scripts, ...) are never touched.
//!
//! ```text
//! LinkifyConfig (JSON) → TransformOptions → transform(doc, root) → mutated tree
//!                              ↑
//!                 Linkifier ← DocumentEvent (ready / inserted)
//! ```
//!
//! The tree is anything implementing [`Document`]; `dom::DomArena` works out
//! of the box.
//!
//! ```
//! use dom::{DomArena, DomSerializer};
//! use linkify::{transform, TransformOptions};
//!
//! let mut arena = DomArena::new();
//! let p = arena.create_element("p");
//! let text = arena.create_text("mail me@example.com");
//! arena.append_child(p, text).unwrap();
//!
//! transform(&mut arena, p, &TransformOptions::default()).unwrap();
//!
//! assert_eq!(
//!     DomSerializer::new().to_markup(&arena, p).unwrap(),
//!     "<p>mail <a href=\"mailto:me@example.com\">me@example.com</a></p>"
//! );
//! ```

pub mod error;
pub mod events;
pub mod handler;
pub mod options;
pub mod patterns;
pub mod transform;
pub mod tree;

pub use error::{LinkifyError, Result};
pub use events::{DocumentEvent, Linkifier};
pub use handler::{
    EmailAddressHandler, Handler, PatternHandler, Replacement, Replacements, UrlHandler,
};
pub use options::{ExclusionSet, HandlerConfig, LinkifyConfig, TransformOptions};
pub use transform::{split_text_node, transform, transform_text_node, Fragment, TransformStats};
pub use tree::{Document, NodeKind};
