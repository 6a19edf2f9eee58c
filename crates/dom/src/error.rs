//! Error types for DOM operations
//!
//! Simple, flat error hierarchy. No over-engineering.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(u32),

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("Node {child} is not a child of node {parent}")]
    NotAChild { parent: u32, child: u32 },

    #[error("Node {child} cannot be inserted into node {parent}: it is the node or one of its ancestors")]
    HierarchyRequest { parent: u32, child: u32 },

    #[error("CDP protocol error: {0}")]
    CdpError(String),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Maximum nesting depth exceeded: {current} > {max}")]
    MaxDepthExceeded { current: usize, max: usize },
}
