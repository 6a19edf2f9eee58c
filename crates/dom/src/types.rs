//! Core type definitions for the document tree
//!
//! Key design principles:
//! 1. Use u32 for indices (4 bytes vs 8 bytes pointer)
//! 2. Use SmallVec for child lists (most nodes have only a few children)
//! 3. Keep the node flat: one struct for every node type

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Node identifier (index into arena)
/// u32 allows 4 billion nodes, enough for any webpage
pub type NodeId = u32;

/// Node type matching DOM specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Attribute = 2,
    Text = 3,
    CdataSection = 4,
    EntityReference = 5,
    Entity = 6,
    ProcessingInstruction = 7,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
    DocumentFragment = 11,
    Notation = 12,
}

impl NodeType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(NodeType::Element),
            2 => Some(NodeType::Attribute),
            3 => Some(NodeType::Text),
            4 => Some(NodeType::CdataSection),
            5 => Some(NodeType::EntityReference),
            6 => Some(NodeType::Entity),
            7 => Some(NodeType::ProcessingInstruction),
            8 => Some(NodeType::Comment),
            9 => Some(NodeType::Document),
            10 => Some(NodeType::DocumentType),
            11 => Some(NodeType::DocumentFragment),
            12 => Some(NodeType::Notation),
            _ => None,
        }
    }

    /// Document and fragment nodes hold children without being elements
    pub fn is_container(self) -> bool {
        matches!(self, NodeType::Document | NodeType::DocumentFragment)
    }
}

/// The document tree node structure
///
/// Design philosophy:
/// - Small fixed-size fields first (better packing)
/// - Use indices instead of pointers
/// - Detached nodes keep their slot, `parent_id` becomes `None`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomNode {
    // IDs (9 bytes)
    pub node_id: NodeId,
    pub backend_node_id: u32,
    pub node_type: NodeType,

    // Navigation indices
    pub parent_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>,

    pub node_name: String,
    pub node_value: String,
    pub attributes: HashMap<String, String>,
}

impl DomNode {
    /// Create a new node with required fields
    pub fn new(node_id: NodeId, backend_node_id: u32, node_type: NodeType, node_name: String) -> Self {
        Self {
            node_id,
            backend_node_id,
            node_type,
            node_name,
            node_value: String::new(),
            attributes: HashMap::new(),
            parent_id: None,
            children_ids: SmallVec::new(),
        }
    }

    /// Get tag name for element nodes
    pub fn tag_name(&self) -> Option<&str> {
        if self.node_type == NodeType::Element {
            Some(&self.node_name)
        } else {
            None
        }
    }

    /// Get attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Tags that never carry children or a closing tag
    pub fn is_void_element(&self) -> bool {
        self.tag_name()
            .map(|tag| {
                VOID_ELEMENTS
                    .iter()
                    .any(|void| tag.eq_ignore_ascii_case(void))
            })
            .unwrap_or(false)
    }

    /// Tags whose text content is emitted verbatim
    pub fn is_raw_text_element(&self) -> bool {
        self.tag_name()
            .map(|tag| {
                RAW_TEXT_ELEMENTS
                    .iter()
                    .any(|raw| tag.eq_ignore_ascii_case(raw))
            })
            .unwrap_or(false)
    }
}

/// HTML void elements (serialized without a closing tag)
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// HTML raw text elements (text serialized without escaping)
pub const RAW_TEXT_ELEMENTS: &[&str] = &["iframe", "noembed", "noframes", "script", "style", "xmp"];
