use super::arena::XmlDocument;
use super::namespaces::XML;
use super::node::XmlNodeData;
use super::xname::{XAttribute, XName};
use crate::error::{NodePrintError, Result};
use indextree::NodeId;
use tracing::debug;

pub fn parse(xml: &str) -> Result<XmlDocument> {
    let doc = roxmltree::Document::parse_with_options(
        xml,
        roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        },
    )
    .map_err(|e| NodePrintError::XmlParse {
        message: e.to_string(),
        location: format!("line {}", e.pos().row),
    })?;

    let mut xml_doc = XmlDocument::new();
    build_tree(doc.root(), &mut xml_doc, None);

    debug!(nodes = doc.descendants().count(), "parsed XML document");
    Ok(xml_doc)
}

pub fn parse_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    let text = std::str::from_utf8(bytes).map_err(|e| NodePrintError::XmlParse {
        message: e.to_string(),
        location: format!("byte {}", e.valid_up_to()),
    })?;
    parse(text)
}

fn build_tree(node: roxmltree::Node, doc: &mut XmlDocument, parent: Option<NodeId>) {
    let node_data = match node.node_type() {
        roxmltree::NodeType::Root => XmlNodeData::Document,
        roxmltree::NodeType::Element => element_data(node),
        roxmltree::NodeType::Text => match node.text() {
            Some(text) => XmlNodeData::Text(text.to_string()),
            None => return,
        },
        roxmltree::NodeType::Comment => match node.text() {
            Some(text) => XmlNodeData::Comment(text.to_string()),
            None => return,
        },
        roxmltree::NodeType::PI => match node.pi() {
            Some(pi) => XmlNodeData::ProcessingInstruction {
                target: pi.target.to_string(),
                data: pi.value.map(str::to_string).unwrap_or_default(),
            },
            None => return,
        },
    };

    let new_id = match parent {
        Some(parent_id) => doc.add_child(parent_id, node_data),
        None => doc.add_root(node_data),
    };

    for child in node.children() {
        build_tree(child, doc, Some(new_id));
    }
}

fn element_data(node: roxmltree::Node) -> XmlNodeData {
    let tag = node.tag_name();
    let mut name = XName::new(tag.namespace().unwrap_or(""), tag.name());
    if let Some(ns) = tag.namespace() {
        name = name.with_prefix(prefix_for(node, ns));
    }

    let mut attributes: Vec<XAttribute> = node
        .attributes()
        .map(|attr| {
            let mut attr_name = XName::new(attr.namespace().unwrap_or(""), attr.name());
            if let Some(ns) = attr.namespace() {
                attr_name = attr_name.with_prefix(prefix_for(node, ns));
            }
            XAttribute::new(attr_name, attr.value())
        })
        .collect();

    // roxmltree reports every in-scope namespace; keep only the ones this
    // element introduces or rebinds.
    let parent_namespaces: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|p| p.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();

    for ns in node.namespaces() {
        if ns.name() == Some("xml") || parent_namespaces.contains(&(ns.name(), ns.uri())) {
            continue;
        }
        attributes.push(XAttribute::new(XName::xmlns(ns.name()), ns.uri()));
    }

    XmlNodeData::element_with_attrs(name, attributes)
}

fn prefix_for<'input>(node: roxmltree::Node<'_, 'input>, namespace: &str) -> &'input str {
    if namespace == XML {
        return "xml";
    }
    node.lookup_prefix(namespace).unwrap_or("")
}
