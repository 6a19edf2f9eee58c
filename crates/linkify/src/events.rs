//! Document events - decides what to linkify when something happens
//!
//! The caller owns listener registration and scheduling. It translates
//! whatever its environment reports into a [`DocumentEvent`] and hands it to
//! [`Linkifier::handle`]. Options are bound once, at construction.

use crate::error::Result;
use crate::options::TransformOptions;
use crate::transform::{transform, transform_text_node, TransformStats};
use crate::tree::{Document, NodeKind};

/// Events that can trigger a transformation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentEvent<N> {
    /// Document became interactive: linkify from the root
    Ready,
    /// A subtree (or a lone text node) was inserted
    NodeInserted { node: N },
}

/// Options bound once, applied per event
#[derive(Debug)]
pub struct Linkifier {
    options: TransformOptions,
}

impl Linkifier {
    pub fn new(options: TransformOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Run the transformation an event calls for
    pub fn handle<D: Document>(
        &self,
        doc: &mut D,
        event: DocumentEvent<D::NodeId>,
    ) -> Result<TransformStats> {
        match event {
            DocumentEvent::Ready => {
                let Some(root) = doc.root() else {
                    tracing::debug!("[Linkifier] Document has no root, nothing to do");
                    return Ok(TransformStats::default());
                };
                let stats = transform(doc, root, &self.options)?;
                tracing::info!(
                    "[Linkifier] Document ready: {} links created",
                    stats.links_created
                );
                Ok(stats)
            }
            DocumentEvent::NodeInserted { node } => self.on_node_inserted(doc, node),
        }
    }

    fn on_node_inserted<D: Document>(&self, doc: &mut D, node: D::NodeId) -> Result<TransformStats> {
        let parent = doc.parent(node)?;

        // Inserted content inherits its ancestors' exclusion
        if let Some(parent) = parent {
            if self.is_within_excluded(doc, parent)? {
                tracing::debug!("[Linkifier] Inserted node {:?} is inside an excluded element", node);
                return Ok(TransformStats::default());
            }
        }

        let is_text = matches!(doc.kind(node)?, NodeKind::Text(_));
        let stats = match (is_text, parent) {
            (true, Some(parent)) => transform_text_node(doc, parent, node, &self.options)?,
            // A detached text node has nowhere to splice into
            (true, None) => TransformStats::default(),
            (false, _) => transform(doc, node, &self.options)?,
        };

        if !stats.is_empty() {
            tracing::info!(
                "[Linkifier] Inserted node {:?}: {} links created",
                node,
                stats.links_created
            );
        }

        Ok(stats)
    }

    /// Whether `node` or any ancestor is an excluded element or a link
    fn is_within_excluded<D: Document>(&self, doc: &D, node: D::NodeId) -> Result<bool> {
        let mut current = Some(node);
        while let Some(id) = current {
            if let NodeKind::Element(tag) = doc.kind(id)? {
                if self.options.is_excluded(tag) || doc.is_link(id)? {
                    return Ok(true);
                }
            }
            current = doc.parent(id)?;
        }
        Ok(false)
    }
}

impl Default for Linkifier {
    fn default() -> Self {
        Self::new(TransformOptions::default())
    }
}
