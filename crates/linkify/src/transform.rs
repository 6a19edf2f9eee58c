//! Text-to-link transformation over a document subtree
//!
//! ```text
//! root ─┬─ element ──→ descend (unless excluded or a link)
//!       ├─ text ─────→ split_text_node ──→ [text, link, text, ...] spliced in place
//!       └─ other ────→ left alone
//! ```
//!
//! One pass, no state kept between calls. Nodes spliced in for a text node are
//! skipped by the walk, and link elements are never descended into, so
//! generated links are never visited again.

use crate::error::Result;
use crate::handler::{Handler, Replacement};
use crate::options::TransformOptions;
use crate::tree::{Document, NodeKind};
use dom::utils::cap_text_length;

/// Piece of a text node while handlers run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Original text, still open to later handlers
    Literal(String),
    /// Produced by a handler, never scanned again
    Generated(Replacement),
}

/// What a `transform` call changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Text nodes replaced by fragments
    pub text_nodes_split: usize,
    /// Link nodes inserted
    pub links_created: usize,
}

impl TransformStats {
    pub fn is_empty(&self) -> bool {
        self.text_nodes_split == 0
    }
}

/// Linkify every non-excluded text node under `root`
///
/// An excluded root is a no-op. Links are skipped even when the exclusion set
/// leaves them out, so running twice changes nothing the second time. Errors
/// only come from node ids the document does not know.
pub fn transform<D: Document>(
    doc: &mut D,
    root: D::NodeId,
    options: &TransformOptions,
) -> Result<TransformStats> {
    let mut stats = TransformStats::default();
    let mut stack = vec![root];

    while let Some(parent) = stack.pop() {
        match doc.kind(parent)? {
            NodeKind::Element(tag) if options.is_excluded(tag) => continue,
            NodeKind::Element(_) if doc.is_link(parent)? => continue,
            NodeKind::Element(_) | NodeKind::Container => {}
            NodeKind::Text(_) | NodeKind::Other => continue,
        }

        let mut descend = Vec::new();
        let mut index = 0;
        while let Some(child) = doc.child_at(parent, index)? {
            let fragments = match doc.kind(child)? {
                NodeKind::Element(_) | NodeKind::Container => {
                    descend.push(child);
                    index += 1;
                    continue;
                }
                NodeKind::Text(text) => split_text_node(text, options),
                NodeKind::Other => Vec::new(),
            };

            if fragments.is_empty() {
                index += 1;
                continue;
            }

            let (inserted, links) = replace_with_fragments(doc, parent, child, &fragments)?;
            stats.text_nodes_split += 1;
            stats.links_created += links;
            index += inserted;
        }

        // Reverse so subtrees are visited in document order
        stack.extend(descend.into_iter().rev());
    }

    tracing::debug!(
        "Linkified {} text nodes, created {} links",
        stats.text_nodes_split,
        stats.links_created
    );

    Ok(stats)
}

/// Linkify one text node in place, given its parent
///
/// Used for text inserted on its own, outside any element walk.
pub fn transform_text_node<D: Document>(
    doc: &mut D,
    parent: D::NodeId,
    text_node: D::NodeId,
    options: &TransformOptions,
) -> Result<TransformStats> {
    let fragments = match doc.kind(text_node)? {
        NodeKind::Text(text) => split_text_node(text, options),
        _ => return Ok(TransformStats::default()),
    };

    if fragments.is_empty() {
        return Ok(TransformStats::default());
    }

    let (_, links) = replace_with_fragments(doc, parent, text_node, &fragments)?;
    Ok(TransformStats {
        text_nodes_split: 1,
        links_created: links,
    })
}

/// Insert a node per fragment before `original`, then remove `original`.
/// Returns (nodes inserted, links among them).
fn replace_with_fragments<D: Document>(
    doc: &mut D,
    parent: D::NodeId,
    original: D::NodeId,
    fragments: &[Fragment],
) -> Result<(usize, usize)> {
    let mut links = 0;

    for fragment in fragments {
        let node = match fragment {
            Fragment::Literal(text) | Fragment::Generated(Replacement::Text(text)) => {
                doc.create_text(text)?
            }
            Fragment::Generated(Replacement::Link { href, caption }) => {
                links += 1;
                doc.create_link(href, caption)?
            }
        };
        doc.insert_before(parent, node, original)?;
    }

    doc.remove_child(parent, original)?;
    Ok((fragments.len(), links))
}

/// Run every handler, in order, over the literal parts of `text`
///
/// Empty result: nothing matched, leave the node alone.
pub fn split_text_node(text: &str, options: &TransformOptions) -> Vec<Fragment> {
    let mut fragments = vec![Fragment::Literal(text.to_string())];
    let mut changed = false;

    for handler in &options.handlers {
        let mut index = 0;
        while index < fragments.len() {
            let split = match &fragments[index] {
                Fragment::Literal(literal) => split_by_handler(literal, handler.as_ref()),
                Fragment::Generated(_) => Vec::new(),
            };

            if split.is_empty() {
                index += 1;
                continue;
            }

            let count = split.len();
            fragments.splice(index..=index, split);
            index += count;
            changed = true;
        }
    }

    if !changed {
        return Vec::new();
    }

    tracing::debug!(
        "Split text node \"{}\" into {} fragments",
        cap_text_length(text, 40),
        fragments.len()
    );

    fragments
}

/// Split one literal by one handler. Empty result: no accepted match.
fn split_by_handler(text: &str, handler: &dyn Handler) -> Vec<Fragment> {
    let pattern = handler.pattern();
    let mut fragments = Vec::new();
    let mut matched = false;
    let mut last_end = 0;
    let mut search_from = 0;

    while search_from <= text.len() {
        let Some(captures) = pattern.captures_at(text, search_from) else {
            break;
        };
        let Some(whole) = captures.get(0) else {
            break;
        };

        if whole.is_empty() || !handler.accepts(text, &captures) {
            if !whole.is_empty() {
                tracing::trace!("[{}] vetoed match \"{}\"", handler.name(), whole.as_str());
            }
            search_from = next_char_boundary(text, whole.start());
            continue;
        }

        if whole.start() > last_end {
            fragments.push(Fragment::Literal(text[last_end..whole.start()].to_string()));
        }
        fragments.extend(handler.replace(&captures).into_iter().map(Fragment::Generated));

        matched = true;
        last_end = whole.end();
        search_from = whole.end();
    }

    if !matched {
        return fragments;
    }

    if last_end < text.len() {
        fragments.push(Fragment::Literal(text[last_end..].to_string()));
    }

    fragments
}

/// Byte index of the character after the one starting at `index`
fn next_char_boundary(text: &str, index: usize) -> usize {
    text[index..]
        .chars()
        .next()
        .map(|c| index + c.len_utf8())
        .unwrap_or(text.len() + 1)
}
