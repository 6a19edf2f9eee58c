//! Arena-based DOM tree storage
//!
//! "Bad programmers worry about the code. Good programmers worry about
//! data structures and their relationships."
//!
//! This arena eliminates:
//! - Rc/RefCell overhead for parent/child links
//! - Recursive function calls (stack overflow risk)
//! - Cache misses (nodes stored sequentially)
//!
//! ## Memory Layout
//!
//! ```text
//! Arena: Vec<DomNode>
//!        [Node0][Node1][Node2]...
//!         ↑ 4-byte index, not 8-byte pointer
//! ```
//!
//! Removing a node only unlinks it. Its slot stays allocated until
//! [`DomArena::clear`], so a `NodeId` never dangles.

use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId, NodeType};
use ahash::AHashMap;

/// Arena allocator for DOM nodes
///
/// Design:
/// - Single Vec<DomNode> for sequential allocation
/// - HashMap for backend_node_id → NodeId lookup (CDP uses backend IDs)
/// - No Rc/Arc: use indices everywhere
#[derive(Debug)]
pub struct DomArena {
    /// All nodes stored sequentially (cache-friendly)
    nodes: Vec<DomNode>,

    /// Backend node ID → NodeId lookup (for CDP integration)
    backend_id_map: AHashMap<u32, NodeId>,

    /// Root node ID (if set)
    root_id: Option<NodeId>,
}

impl DomArena {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(1024), // Pre-allocate for typical page
            backend_id_map: AHashMap::with_capacity(1024),
            root_id: None,
        }
    }

    /// Create arena with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            backend_id_map: AHashMap::with_capacity(capacity),
            root_id: None,
        }
    }

    /// Add a node to the arena, returns its ID
    ///
    /// The node's `node_id` is overwritten with its arena slot. A
    /// `backend_node_id` of 0 means "created locally" and is not indexed.
    pub fn add_node(&mut self, mut node: DomNode) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        node.node_id = node_id;
        if node.backend_node_id != 0 {
            self.backend_id_map.insert(node.backend_node_id, node_id);
        }
        self.nodes.push(node);
        node_id
    }

    /// Create a detached element node
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.add_node(DomNode::new(0, 0, NodeType::Element, tag.to_string()))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        let mut node = DomNode::new(0, 0, NodeType::Text, "#text".to_string());
        node.node_value = text.to_string();
        self.add_node(node)
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let node = self.get_mut(node_id)?;
        if node.node_type != NodeType::Element {
            return Err(DomError::InvalidNodeType {
                expected: "Element".to_string(),
                actual: format!("{:?}", node.node_type),
            });
        }
        node.attributes.insert(name.to_string(), value.to_string());
        Ok(())
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node ID by backend node ID
    pub fn get_node_id_by_backend(&self, backend_id: u32) -> Option<NodeId> {
        self.backend_id_map.get(&backend_id).copied()
    }

    /// Set root node
    pub fn set_root(&mut self, node_id: NodeId) -> Result<()> {
        // Verify node exists
        self.get(node_id)?;
        self.root_id = Some(node_id);
        Ok(())
    }

    /// Get root node ID
    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    /// Total number of nodes (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the child at `index`, `None` past the end
    pub fn child_at(&self, node_id: NodeId, index: usize) -> Result<Option<NodeId>> {
        Ok(self.get(node_id)?.children_ids.get(index).copied())
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) -> Result<()> {
        self.insert_before(parent_id, child_id, None)
    }

    /// Insert `child` before `reference` (or at the end when `None`)
    ///
    /// A child that is already attached somewhere is moved, like the DOM does.
    /// Nothing is detached unless the insertion can go through. Inserting a
    /// node before itself leaves it where it is.
    pub fn insert_before(
        &mut self,
        parent_id: NodeId,
        child_id: NodeId,
        reference_id: Option<NodeId>,
    ) -> Result<()> {
        self.get(child_id)?;
        if self.is_ancestor(child_id, parent_id)? {
            return Err(DomError::HierarchyRequest {
                parent: parent_id,
                child: child_id,
            });
        }

        if let Some(reference_id) = reference_id {
            self.position_of(parent_id, reference_id)?;
            if reference_id == child_id {
                return Ok(());
            }
        }

        self.detach(child_id)?;

        let position = match reference_id {
            Some(reference_id) => self.position_of(parent_id, reference_id)?,
            None => self.get(parent_id)?.children_ids.len(),
        };
        self.get_mut(parent_id)?.children_ids.insert(position, child_id);

        self.get_mut(child_id)?.parent_id = Some(parent_id);
        Ok(())
    }

    /// Unlink `child` from `parent`
    pub fn remove_child(&mut self, parent_id: NodeId, child_id: NodeId) -> Result<()> {
        let position = self.position_of(parent_id, child_id)?;
        self.get_mut(parent_id)?.children_ids.remove(position);

        self.get_mut(child_id)?.parent_id = None;
        Ok(())
    }

    /// Index of `child` among the children of `parent`
    fn position_of(&self, parent_id: NodeId, child_id: NodeId) -> Result<usize> {
        self.get(parent_id)?
            .children_ids
            .iter()
            .position(|&id| id == child_id)
            .ok_or(DomError::NotAChild {
                parent: parent_id,
                child: child_id,
            })
    }

    /// Unlink a node from whatever parent it has
    fn detach(&mut self, node_id: NodeId) -> Result<()> {
        if let Some(parent_id) = self.get(node_id)?.parent_id {
            self.remove_child(parent_id, node_id)?;
        }
        Ok(())
    }

    /// Whether `ancestor_id` is `node_id` or one of its ancestors
    fn is_ancestor(&self, ancestor_id: NodeId, node_id: NodeId) -> Result<bool> {
        let mut current = Some(node_id);
        while let Some(id) = current {
            if id == ancestor_id {
                return Ok(true);
            }
            current = self.get(id)?.parent_id;
        }
        Ok(false)
    }

    /// Traverse tree depth-first (iterative, no recursion)
    ///
    /// This is the "good taste" version - no special cases for leaf nodes
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    /// Clear arena (reuse allocation)
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.backend_id_map.clear();
        self.root_id = None;
    }
}

impl Default for DomArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_basic() {
        let mut arena = DomArena::new();

        let node = DomNode::new(0, 100, NodeType::Element, "div".to_string());

        let id = arena.add_node(node);
        assert_eq!(id, 0);

        let retrieved = arena.get(id).unwrap();
        assert_eq!(retrieved.node_name, "div");
        assert_eq!(retrieved.backend_node_id, 100);
    }

    #[test]
    fn test_backend_lookup() {
        let mut arena = DomArena::new();

        let node = DomNode::new(0, 100, NodeType::Element, "div".to_string());

        arena.add_node(node);

        let found = arena.get_node_id_by_backend(100).unwrap();
        assert_eq!(arena.get(found).unwrap().node_name, "div");
    }

    #[test]
    fn test_local_nodes_not_indexed() {
        let mut arena = DomArena::new();
        arena.create_element("p");
        arena.create_text("hello");

        assert!(arena.get_node_id_by_backend(0).is_none());
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_traverse_df() {
        let mut arena = DomArena::new();

        // Create tree: root -> [child1, child2]
        let root = arena.create_element("div");
        let child1 = arena.create_element("span");
        let child2 = arena.create_element("span");
        arena.append_child(root, child1).unwrap();
        arena.append_child(root, child2).unwrap();

        let mut visited = Vec::new();
        arena
            .traverse_df(root, |node| {
                visited.push(node.node_name.clone());
                Ok(())
            })
            .unwrap();

        assert_eq!(visited, vec!["div", "span", "span"]);
    }

    #[test]
    fn test_insert_before_and_remove() {
        let mut arena = DomArena::new();
        let root = arena.create_element("p");
        let last = arena.create_text("last");
        arena.append_child(root, last).unwrap();

        let first = arena.create_text("first");
        arena.insert_before(root, first, Some(last)).unwrap();
        assert_eq!(arena.child_at(root, 0).unwrap(), Some(first));
        assert_eq!(arena.child_at(root, 1).unwrap(), Some(last));
        assert_eq!(arena.child_at(root, 2).unwrap(), None);
        assert_eq!(arena.get(first).unwrap().parent_id, Some(root));

        arena.remove_child(root, last).unwrap();
        assert_eq!(arena.get(root).unwrap().children_ids.as_slice(), &[first]);
        assert_eq!(arena.get(last).unwrap().parent_id, None);
    }

    #[test]
    fn test_insert_moves_attached_node() {
        let mut arena = DomArena::new();
        let a = arena.create_element("div");
        let b = arena.create_element("div");
        let text = arena.create_text("moving");
        arena.append_child(a, text).unwrap();

        arena.append_child(b, text).unwrap();

        assert!(arena.get(a).unwrap().children_ids.is_empty());
        assert_eq!(arena.get(text).unwrap().parent_id, Some(b));
    }

    #[test]
    fn test_insert_rejects_cycle() {
        let mut arena = DomArena::new();
        let outer = arena.create_element("div");
        let inner = arena.create_element("div");
        arena.append_child(outer, inner).unwrap();

        assert!(matches!(
            arena.append_child(inner, outer),
            Err(DomError::HierarchyRequest { .. })
        ));
        assert!(matches!(
            arena.append_child(outer, outer),
            Err(DomError::HierarchyRequest { .. })
        ));
        assert_eq!(arena.get(inner).unwrap().parent_id, Some(outer));
    }

    #[test]
    fn test_insert_before_unknown_reference() {
        let mut arena = DomArena::new();
        let root = arena.create_element("div");
        let stray = arena.create_text("stray");
        let child = arena.create_text("child");

        let err = arena.insert_before(root, child, Some(stray)).unwrap_err();
        assert!(matches!(err, DomError::NotAChild { .. }));
    }

    #[test]
    fn test_failed_insert_keeps_node_attached() {
        let mut arena = DomArena::new();
        let a = arena.create_element("div");
        let b = arena.create_element("div");
        let stray = arena.create_text("stray");
        let text = arena.create_text("stays");
        arena.append_child(a, text).unwrap();

        assert!(arena.insert_before(b, text, Some(stray)).is_err());

        assert_eq!(arena.get(a).unwrap().children_ids.as_slice(), &[text]);
        assert_eq!(arena.get(text).unwrap().parent_id, Some(a));
        assert!(arena.get(b).unwrap().children_ids.is_empty());
    }

    #[test]
    fn test_insert_before_itself_is_noop() {
        let mut arena = DomArena::new();
        let p = arena.create_element("p");
        let first = arena.create_text("first");
        let second = arena.create_text("second");
        arena.append_child(p, first).unwrap();
        arena.append_child(p, second).unwrap();

        arena.insert_before(p, first, Some(first)).unwrap();

        assert_eq!(arena.get(p).unwrap().children_ids.as_slice(), &[first, second]);
        assert_eq!(arena.get(first).unwrap().parent_id, Some(p));

        // Still has to be a child of the parent it names
        let other = arena.create_element("div");
        assert!(matches!(
            arena.insert_before(other, first, Some(first)),
            Err(DomError::NotAChild { .. })
        ));
        assert_eq!(arena.get(first).unwrap().parent_id, Some(p));
    }

    #[test]
    fn test_remove_non_child() {
        let mut arena = DomArena::new();
        let root = arena.create_element("div");
        let stray = arena.create_text("stray");

        assert!(matches!(
            arena.remove_child(root, stray),
            Err(DomError::NotAChild { .. })
        ));
        assert!(matches!(
            arena.remove_child(root, 99),
            Err(DomError::NotAChild { .. })
        ));
    }

    #[test]
    fn test_set_attribute_on_text_fails() {
        let mut arena = DomArena::new();
        let text = arena.create_text("x");
        let link = arena.create_element("a");

        assert!(arena.set_attribute(text, "href", "#").is_err());
        arena.set_attribute(link, "href", "#").unwrap();
        assert_eq!(arena.get(link).unwrap().attr("href"), Some("#"));
    }
}
