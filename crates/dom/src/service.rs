//! DOM Service - builds an arena from CDP data
//!
//! This handles:
//! - Parsing CDP `DOM.getDocument` JSON responses
//! - DOM tree construction with parent/child links
//! - Nesting limits for hostile or broken payloads

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::*;
use serde_json::Value;
use std::collections::HashMap;

/// Configuration for DOM service
#[derive(Debug, Clone)]
pub struct DomServiceConfig {
    /// Deepest nesting accepted while parsing
    pub max_depth: usize,
}

impl Default for DomServiceConfig {
    fn default() -> Self {
        Self { max_depth: 512 }
    }
}

/// Main DOM service
pub struct DomService {
    config: DomServiceConfig,
    arena: DomArena,
}

impl DomService {
    /// Create new DOM service with default config
    pub fn new() -> Self {
        Self::with_config(DomServiceConfig::default())
    }

    /// Create DOM service with custom config
    pub fn with_config(config: DomServiceConfig) -> Self {
        Self {
            config,
            arena: DomArena::new(),
        }
    }

    /// Get reference to internal arena
    pub fn arena(&self) -> &DomArena {
        &self.arena
    }

    /// Give up the service and keep the arena
    pub fn into_arena(self) -> DomArena {
        self.arena
    }

    /// Parse a raw CDP JSON string, see [`DomService::parse_cdp_dom_tree`]
    pub fn parse_cdp_str(&mut self, json: &str) -> Result<NodeId> {
        let value: Value = serde_json::from_str(json)?;
        self.parse_cdp_dom_tree(&value)
    }

    /// Parse CDP DOM tree response and build arena
    ///
    /// Input format matches CDP's DOM.getDocument response:
    /// ```json
    /// {
    ///   "root": {
    ///     "nodeId": 1,
    ///     "backendNodeId": 1,
    ///     "nodeType": 9,
    ///     "nodeName": "#document",
    ///     "children": [...]
    ///   }
    /// }
    /// ```
    pub fn parse_cdp_dom_tree(&mut self, cdp_response: &Value) -> Result<NodeId> {
        let root = cdp_response
            .get("root")
            .ok_or_else(|| DomError::CdpError("Missing 'root' in CDP response".to_string()))?;

        self.arena.clear();
        let root_id = self.parse_node(root, None, 0)?;
        self.arena.set_root(root_id)?;

        Ok(root_id)
    }

    /// Recursively parse a CDP node
    fn parse_node(
        &mut self,
        cdp_node: &Value,
        parent_id: Option<NodeId>,
        depth: usize,
    ) -> Result<NodeId> {
        if depth > self.config.max_depth {
            return Err(DomError::MaxDepthExceeded {
                current: depth,
                max: self.config.max_depth,
            });
        }

        let backend_node_id = cdp_node["backendNodeId"]
            .as_u64()
            .ok_or_else(|| DomError::CdpError("Missing backendNodeId".to_string()))?;
        let backend_node_id = u32::try_from(backend_node_id).map_err(|_| {
            DomError::CdpError(format!("backendNodeId out of range: {}", backend_node_id))
        })?;

        let node_type_val = cdp_node["nodeType"]
            .as_u64()
            .ok_or_else(|| DomError::CdpError("Missing nodeType".to_string()))?;
        let node_type_val = u8::try_from(node_type_val)
            .map_err(|_| DomError::CdpError(format!("nodeType out of range: {}", node_type_val)))?;

        let node_type =
            NodeType::from_u8(node_type_val).ok_or_else(|| DomError::InvalidNodeType {
                expected: "valid NodeType".to_string(),
                actual: format!("{}", node_type_val),
            })?;

        let node_name = cdp_node["nodeName"].as_str().unwrap_or("").to_string();

        let node_value = cdp_node["nodeValue"].as_str().unwrap_or("").to_string();

        // Attributes arrive as a flat [name, value, name, value, ...] list
        let mut attributes = HashMap::new();
        if let Some(attrs) = cdp_node["attributes"].as_array() {
            for pair in attrs.chunks_exact(2) {
                if let (Some(key), Some(value)) = (pair[0].as_str(), pair[1].as_str()) {
                    attributes.insert(key.to_string(), value.to_string());
                }
            }
        }

        let mut node = DomNode::new(0, backend_node_id, node_type, node_name);
        node.node_value = node_value;
        node.attributes = attributes;
        node.parent_id = parent_id;

        let current_node_id = self.arena.add_node(node);

        if let Some(children) = cdp_node["children"].as_array() {
            let mut child_ids = smallvec::SmallVec::new();

            for child in children {
                let child_id = self.parse_node(child, Some(current_node_id), depth + 1)?;
                child_ids.push(child_id);
            }

            self.arena.get_mut(current_node_id)?.children_ids = child_ids;
        }

        Ok(current_node_id)
    }
}

impl Default for DomService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_dom() {
        let cdp_json = serde_json::json!({
            "root": {
                "nodeId": 1,
                "backendNodeId": 1,
                "nodeType": 9,
                "nodeName": "#document",
                "nodeValue": "",
                "children": [{
                    "nodeId": 2,
                    "backendNodeId": 2,
                    "nodeType": 1,
                    "nodeName": "HTML",
                    "nodeValue": "",
                    "attributes": ["lang", "en"],
                    "children": [{
                        "nodeId": 3,
                        "backendNodeId": 3,
                        "nodeType": 3,
                        "nodeName": "#text",
                        "nodeValue": "Hello"
                    }]
                }]
            }
        });

        let mut service = DomService::new();
        let root_id = service.parse_cdp_dom_tree(&cdp_json).unwrap();

        assert_eq!(root_id, 0);
        assert_eq!(service.arena().len(), 3);

        let arena = service.arena();
        let html = arena.get(arena.get_node_id_by_backend(2).unwrap()).unwrap();
        assert_eq!(html.attr("lang"), Some("en"));
        assert_eq!(html.parent_id, Some(root_id));

        let text = arena.get(arena.get_node_id_by_backend(3).unwrap()).unwrap();
        assert_eq!(text.node_type, NodeType::Text);
        assert_eq!(text.node_value, "Hello");
    }

    #[test]
    fn test_parse_missing_root() {
        let mut service = DomService::new();
        let err = service
            .parse_cdp_dom_tree(&serde_json::json!({ "nodes": [] }))
            .unwrap_err();
        assert!(matches!(err, DomError::CdpError(_)));
    }

    #[test]
    fn test_parse_invalid_node_type() {
        let mut service = DomService::new();
        let err = service
            .parse_cdp_dom_tree(&serde_json::json!({
                "root": { "backendNodeId": 1, "nodeType": 42, "nodeName": "?" }
            }))
            .unwrap_err();
        assert!(matches!(err, DomError::InvalidNodeType { .. }));
    }

    #[test]
    fn test_parse_out_of_range_ids() {
        let mut service = DomService::new();

        // 259 would wrap to 3 (Text) as a u8
        let err = service
            .parse_cdp_dom_tree(&serde_json::json!({
                "root": { "backendNodeId": 1, "nodeType": 259, "nodeName": "#text" }
            }))
            .unwrap_err();
        assert!(matches!(err, DomError::CdpError(_)));

        let err = service
            .parse_cdp_dom_tree(&serde_json::json!({
                "root": { "backendNodeId": 4_294_967_297u64, "nodeType": 1, "nodeName": "DIV" }
            }))
            .unwrap_err();
        assert!(matches!(err, DomError::CdpError(_)));
    }

    #[test]
    fn test_parse_str_reports_bad_json() {
        let mut service = DomService::new();
        assert!(matches!(
            service.parse_cdp_str("{ not json"),
            Err(DomError::ParseError(_))
        ));
    }

    #[test]
    fn test_max_depth() {
        let mut nested = serde_json::json!({
            "backendNodeId": 100, "nodeType": 3, "nodeName": "#text", "nodeValue": "deep"
        });
        for id in 1..=5u32 {
            nested = serde_json::json!({
                "backendNodeId": id, "nodeType": 1, "nodeName": "DIV", "children": [nested]
            });
        }

        let mut service = DomService::with_config(DomServiceConfig { max_depth: 3 });
        let err = service
            .parse_cdp_dom_tree(&serde_json::json!({ "root": nested }))
            .unwrap_err();
        assert!(matches!(err, DomError::MaxDepthExceeded { max: 3, .. }));
    }
}
