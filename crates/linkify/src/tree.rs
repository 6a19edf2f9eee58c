//! The document capabilities the transformer needs
//!
//! Transformation only ever reads child lists, tag names, text payloads and
//! parents, and edits through insert-before/remove-child. Anything that can do
//! that can be linkified; `dom::DomArena` is the in-tree implementation.

use crate::error::Result;
use dom::{DomArena, NodeType};

/// What the transformer sees of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'a> {
    /// Element with its tag name, as the document spells it
    Element(&'a str),
    Text(&'a str),
    /// Document or fragment: holds children, has no tag
    Container,
    /// Comments, doctypes, processing instructions
    Other,
}

/// Tree access used by [`crate::transform`]
pub trait Document {
    type NodeId: Copy + Eq + std::fmt::Debug;

    /// Top of the document, if it has one
    fn root(&self) -> Option<Self::NodeId>;

    fn kind(&self, node: Self::NodeId) -> Result<NodeKind<'_>>;

    /// Child at `index` in document order, `None` past the last child
    fn child_at(&self, node: Self::NodeId, index: usize) -> Result<Option<Self::NodeId>>;

    fn parent(&self, node: Self::NodeId) -> Result<Option<Self::NodeId>>;

    /// New detached text node
    fn create_text(&mut self, text: &str) -> Result<Self::NodeId>;

    /// Whether `node` is a link, the kind of element `create_link` makes
    ///
    /// Links are never descended into, whatever the exclusion set says.
    fn is_link(&self, node: Self::NodeId) -> Result<bool>;

    /// New detached link element whose visible text is `caption`
    fn create_link(&mut self, href: &str, caption: &str) -> Result<Self::NodeId>;

    fn insert_before(
        &mut self,
        parent: Self::NodeId,
        node: Self::NodeId,
        reference: Self::NodeId,
    ) -> Result<()>;

    fn remove_child(&mut self, parent: Self::NodeId, child: Self::NodeId) -> Result<()>;
}

impl Document for DomArena {
    type NodeId = dom::NodeId;

    fn root(&self) -> Option<Self::NodeId> {
        self.root_id()
    }

    fn kind(&self, node: Self::NodeId) -> Result<NodeKind<'_>> {
        let node = self.get(node)?;
        Ok(match node.node_type {
            NodeType::Element => NodeKind::Element(&node.node_name),
            NodeType::Text => NodeKind::Text(&node.node_value),
            t if t.is_container() => NodeKind::Container,
            _ => NodeKind::Other,
        })
    }

    fn child_at(&self, node: Self::NodeId, index: usize) -> Result<Option<Self::NodeId>> {
        Ok(DomArena::child_at(self, node, index)?)
    }

    fn parent(&self, node: Self::NodeId) -> Result<Option<Self::NodeId>> {
        Ok(self.get(node)?.parent_id)
    }

    fn create_text(&mut self, text: &str) -> Result<Self::NodeId> {
        Ok(DomArena::create_text(self, text))
    }

    fn is_link(&self, node: Self::NodeId) -> Result<bool> {
        Ok(self
            .get(node)?
            .tag_name()
            .is_some_and(|tag| tag.eq_ignore_ascii_case("a")))
    }

    fn create_link(&mut self, href: &str, caption: &str) -> Result<Self::NodeId> {
        let anchor = self.create_element("a");
        self.set_attribute(anchor, "href", href)?;
        let text = DomArena::create_text(self, caption);
        self.append_child(anchor, text)?;
        Ok(anchor)
    }

    fn insert_before(
        &mut self,
        parent: Self::NodeId,
        node: Self::NodeId,
        reference: Self::NodeId,
    ) -> Result<()> {
        Ok(DomArena::insert_before(self, parent, node, Some(reference))?)
    }

    fn remove_child(&mut self, parent: Self::NodeId, child: Self::NodeId) -> Result<()> {
        Ok(DomArena::remove_child(self, parent, child)?)
    }
}
