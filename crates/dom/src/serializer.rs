//! DOM Serializer - Convert DOM tree to HTML markup
//!
//! This module handles:
//! - Rendering elements, text and comments back to markup
//! - Escaping text and attribute values (raw text elements excepted)
//! - Deterministic attribute order (sorted by name)

use crate::arena::DomArena;
use crate::error::Result;
use crate::types::*;

/// Serializer configuration
#[derive(Debug, Clone)]
pub struct SerializerConfig {
    /// CDP reports HTML tag names in upper case
    pub lowercase_tags: bool,
    pub include_comments: bool,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            lowercase_tags: true,
            include_comments: false,
        }
    }
}

/// DOM Tree Serializer
pub struct DomSerializer {
    config: SerializerConfig,
}

impl DomSerializer {
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Serialize the whole tree starting at the arena root
    pub fn serialize(&self, arena: &DomArena) -> Result<String> {
        match arena.root_id() {
            Some(root_id) => self.to_markup(arena, root_id),
            None => Ok(String::new()),
        }
    }

    /// Serialize the subtree rooted at `node_id`
    pub fn to_markup(&self, arena: &DomArena, node_id: NodeId) -> Result<String> {
        let mut output = String::with_capacity(256);
        self.serialize_node(arena, node_id, &mut output)?;
        Ok(output)
    }

    /// Serialize a single node recursively
    fn serialize_node(&self, arena: &DomArena, node_id: NodeId, output: &mut String) -> Result<()> {
        let node = arena.get(node_id)?;

        match node.node_type {
            NodeType::Element => {
                let tag = if self.config.lowercase_tags {
                    node.node_name.to_ascii_lowercase()
                } else {
                    node.node_name.clone()
                };

                output.push('<');
                output.push_str(&tag);

                let mut attributes: Vec<_> = node.attributes.iter().collect();
                attributes.sort_by(|a, b| a.0.cmp(b.0));
                for (name, value) in attributes {
                    output.push(' ');
                    output.push_str(name);
                    output.push_str("=\"");
                    escape_into(value, true, output);
                    output.push('"');
                }

                output.push('>');

                if node.is_void_element() && node.children_ids.is_empty() {
                    return Ok(());
                }

                for &child_id in &node.children_ids {
                    self.serialize_node(arena, child_id, output)?;
                }

                output.push_str("</");
                output.push_str(&tag);
                output.push('>');
            }
            NodeType::Text | NodeType::CdataSection => {
                let raw = match node.parent_id {
                    Some(parent_id) => arena.get(parent_id)?.is_raw_text_element(),
                    None => false,
                };
                if raw {
                    output.push_str(&node.node_value);
                } else {
                    escape_into(&node.node_value, false, output);
                }
            }
            NodeType::Comment if self.config.include_comments => {
                output.push_str("<!--");
                output.push_str(&node.node_value);
                output.push_str("-->");
            }
            NodeType::Document | NodeType::DocumentFragment => {
                for &child_id in &node.children_ids {
                    self.serialize_node(arena, child_id, output)?;
                }
            }
            _ => {}
        }

        Ok(())
    }
}

impl Default for DomSerializer {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_into(text: &str, in_attribute: bool, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' if in_attribute => output.push_str("&quot;"),
            _ => output.push(c),
        }
    }
}
