use crate::error::{NodePrintError, Result};
use crate::util::is_blank;
use crate::xml::XmlDocument;
use indextree::NodeId;
use tracing::debug;

/// Removes every whitespace-only text node below `node`, in place.
///
/// Adjacent text siblings are merged first so a run split across several
/// nodes is judged as a whole. The matching nodes are collected before any
/// of them is removed. CDATA sections count as text. Returns how many nodes
/// were removed.
pub fn strip_insignificant_whitespace(doc: &mut XmlDocument, node: NodeId) -> Result<usize> {
    if !doc.contains(node) {
        return Err(NodePrintError::invalid_argument(format!(
            "node {node:?} is not part of the document"
        )));
    }

    doc.normalize(node);

    let matched = select_whitespace_text(doc, node)?;
    for &id in &matched {
        doc.remove(id);
    }

    debug!(removed = matched.len(), "removed whitespace-only text nodes");
    Ok(matched.len())
}

/// Text descendants of `node` whose normalize-space value is empty, in
/// document order. `node` itself is never selected.
pub fn select_whitespace_text(doc: &XmlDocument, node: NodeId) -> Result<Vec<NodeId>> {
    let mut matched = Vec::new();

    for id in doc.descendants(node).skip(1) {
        let data = doc.get(id).ok_or_else(|| {
            NodePrintError::query(format!("node {id:?} is no longer part of the document"))
        })?;
        if data.text_content().is_some_and(is_blank) {
            matched.push(id);
        }
    }

    Ok(matched)
}
