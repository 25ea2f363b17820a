//! Whitespace stripping and rendering of XML subtrees.
//!
//! [`serialize`] is the one-shot entry point: it removes whitespace-only
//! text nodes from the caller's tree and renders the result. The two halves
//! are also exposed separately as [`strip_insignificant_whitespace`] (mutates)
//! and [`render`] (read-only), so a caller can clone the tree first or skip
//! stripping altogether.

pub mod options;
pub mod render;
pub mod whitespace;

pub use options::{FormattingOptions, INDENT_WIDTH};
pub use render::render;
pub use whitespace::{select_whitespace_text, strip_insignificant_whitespace};

use crate::error::{NodePrintError, Result};
use crate::xml::XmlDocument;
use indextree::NodeId;

/// Strips whitespace-only text below a node and renders it with fixed
/// [`FormattingOptions`].
///
/// Holds no state besides its options; build one wherever it is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeSerializer {
    options: FormattingOptions,
}

impl NodeSerializer {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormattingOptions {
        &self.options
    }

    /// Removes whitespace-only text nodes under `node` from `doc`, then
    /// renders `node`.
    ///
    /// The removal is permanent. `None` and nodes that are not part of `doc`
    /// fail with [`NodePrintError::InvalidArgument`] before anything is
    /// touched. If rendering fails the stripped nodes stay removed.
    pub fn serialize(&self, doc: &mut XmlDocument, node: Option<NodeId>) -> Result<String> {
        let node = node.ok_or_else(|| NodePrintError::invalid_argument("node is null."))?;
        strip_insignificant_whitespace(doc, node)?;
        render(doc, node, &self.options)
    }

    /// Renders `node` without modifying the tree.
    pub fn render(&self, doc: &XmlDocument, node: NodeId) -> Result<String> {
        render(doc, node, &self.options)
    }
}

/// One-shot form of [`NodeSerializer::serialize`].
pub fn serialize(
    doc: &mut XmlDocument,
    node: Option<NodeId>,
    omit_declaration: bool,
    pretty_print: bool,
) -> Result<String> {
    NodeSerializer::new(FormattingOptions::new(omit_declaration, pretty_print)).serialize(doc, node)
}
