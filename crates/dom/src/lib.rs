//! Arena-backed document tree
//!
//! Small, mutable DOM model with index-based links.
//!
//! ## Philosophy
//!
//! - **Good taste**: Data structures first, algorithms follow naturally
//! - **No special cases**: One node struct, the node type decides behavior
//! - **Cache friendly**: Arena allocation, sequential access patterns
//!
//! ## Core Design
//!
//! ```text
//! CDP JSON → DomService → DomArena (owned) → edits → DomSerializer → markup
//!                              ↓
//!                        NodeId (u32)
//! ```

pub mod arena;
pub mod error;
pub mod serializer;
pub mod service;
pub mod types;
pub mod utils;

pub use arena::DomArena;
pub use error::{DomError, Result};
pub use serializer::{DomSerializer, SerializerConfig};
pub use service::{DomService, DomServiceConfig};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_serialize() {
        let mut arena = DomArena::new();
        let body = arena.create_element("body");
        let text = arena.create_text("hi");
        arena.append_child(body, text).unwrap();
        arena.set_root(body).unwrap();

        assert_eq!(DomSerializer::new().serialize(&arena).unwrap(), "<body>hi</body>");
    }
}
