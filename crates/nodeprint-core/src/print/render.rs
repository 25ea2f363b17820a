use super::options::{FormattingOptions, INDENT_WIDTH};
use crate::error::{NodePrintError, Result};
use crate::xml::namespaces::{XML, XMLNS};
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData};
use indextree::NodeId;
use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use tracing::debug;

/// Renders `node` and everything below it as UTF-8 XML text.
///
/// The tree is not modified. An element rendered on its own carries the
/// namespace declarations it inherits from its ancestors. With
/// `pretty_print`, only element-only content is indented; an element with
/// any text child keeps its content exactly as it is.
pub fn render(doc: &XmlDocument, node: NodeId, options: &FormattingOptions) -> Result<String> {
    let Some(node_data) = doc.get(node) else {
        return Err(NodePrintError::invalid_argument(format!(
            "node {node:?} is not part of the document"
        )));
    };

    let mut writer = Writer::new(Vec::new());
    let layout = Layout {
        pretty: options.pretty_print,
        depth: 0,
    };

    if !options.omit_declaration {
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(NodePrintError::render)?;
    }

    match node_data {
        XmlNodeData::Document => {
            for (i, child_id) in doc.children(node).enumerate() {
                if i > 0 || !options.omit_declaration {
                    line_break(&mut writer, layout)?;
                }
                write_node(doc, child_id, &mut writer, &NamespaceScope::default(), layout)?;
            }
        }
        XmlNodeData::Element { name, attributes } => {
            if !options.omit_declaration {
                line_break(&mut writer, layout)?;
            }

            let mut merged_attrs = attributes.clone();
            let mut declared: HashSet<XName> = merged_attrs
                .iter()
                .filter(|attr| attr.name.is_xmlns())
                .map(|attr| attr.name.clone())
                .collect();

            merged_attrs.extend(collect_ancestor_namespace_attrs(doc, node, &mut declared));

            write_element(
                doc,
                node,
                name,
                &merged_attrs,
                &mut writer,
                &NamespaceScope::default(),
                layout,
            )?;
        }
        _ => {
            if !options.omit_declaration {
                line_break(&mut writer, layout)?;
            }
            write_node(doc, node, &mut writer, &NamespaceScope::default(), layout)?;
        }
    }

    let xml = String::from_utf8(writer.into_inner()).map_err(NodePrintError::render)?;
    debug!(bytes = xml.len(), pretty = options.pretty_print, "rendered XML");
    Ok(xml)
}

/// Indentation state for the node being written.
#[derive(Clone, Copy)]
struct Layout {
    pretty: bool,
    depth: usize,
}

impl Layout {
    fn nested(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }

    fn verbatim(self) -> Self {
        Self {
            pretty: false,
            ..self
        }
    }
}

fn line_break<W: Write>(writer: &mut Writer<W>, layout: Layout) -> Result<()> {
    if !layout.pretty {
        return Ok(());
    }
    let inner = writer.get_mut();
    inner.write_all(b"\n").map_err(NodePrintError::render)?;
    inner
        .write_all(" ".repeat(layout.depth * INDENT_WIDTH).as_bytes())
        .map_err(NodePrintError::render)
}

/// True when `node_id` has children and none of them is text or CDATA, so
/// line breaks between them cannot change any text content.
fn is_element_only(doc: &XmlDocument, node_id: NodeId) -> bool {
    let mut children = doc.children(node_id).peekable();
    children.peek().is_some()
        && children.all(|child| doc.get(child).is_some_and(|data| !data.is_text()))
}

/// Text content escaping: markup characters plus CR, which a parser would
/// otherwise fold into LF.
fn escape_text(text: &str) -> Cow<'_, str> {
    let escaped = partial_escape(text);
    if escaped.contains('\r') {
        Cow::Owned(escaped.replace('\r', "&#13;"))
    } else {
        escaped
    }
}

/// Attribute value escaping: markup characters and quotes plus tab, CR and
/// LF, which attribute-value normalization would otherwise turn into spaces.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if !escaped.contains(|c: char| matches!(c, '\t' | '\n' | '\r')) {
        return escaped;
    }
    Cow::Owned(
        escaped
            .replace('\t', "&#9;")
            .replace('\n', "&#10;")
            .replace('\r', "&#13;"),
    )
}

fn push_attribute(elem: &mut BytesStart<'_>, name: &str, value: &str) {
    elem.push_attribute(Attribute {
        key: QName(name.as_bytes()),
        value: Cow::Owned(escape_attribute(value).into_owned().into_bytes()),
    });
}

/// Namespace bindings visible at the element being written.
#[derive(Clone, Default)]
struct NamespaceScope {
    /// namespace URI -> prefix
    prefixes: HashMap<String, String>,
    default: Option<String>,
}

impl NamespaceScope {
    fn declare(&mut self, attributes: &[XAttribute]) {
        for attr in attributes.iter().filter(|a| a.name.is_xmlns()) {
            if attr.name.namespace.is_none() {
                self.default = Some(attr.value.clone()).filter(|uri| !uri.is_empty());
            } else {
                self.prefixes
                    .insert(attr.value.clone(), attr.name.local_name.clone());
            }
        }
    }

    fn prefix_of(&self, namespace: &str) -> Option<&str> {
        if namespace == XML {
            return Some("xml");
        }
        self.prefixes.get(namespace).map(String::as_str)
    }
}

fn collect_ancestor_namespace_attrs(
    doc: &XmlDocument,
    node_id: NodeId,
    declared: &mut HashSet<XName>,
) -> Vec<XAttribute> {
    let mut collected = Vec::new();
    let mut ancestors = doc.ancestors(node_id);
    ancestors.next(); // skip the node itself

    for ancestor_id in ancestors {
        let Some(attrs) = doc.get(ancestor_id).and_then(XmlNodeData::attributes) else {
            continue;
        };

        for attr in attrs {
            if attr.name.is_xmlns() && !declared.contains(&attr.name) {
                declared.insert(attr.name.clone());
                collected.push(attr.clone());
            }
        }
    }

    collected
}

fn write_node<W: Write>(
    doc: &XmlDocument,
    node_id: NodeId,
    writer: &mut Writer<W>,
    scope: &NamespaceScope,
    layout: Layout,
) -> Result<()> {
    let Some(node_data) = doc.get(node_id) else {
        return Ok(());
    };

    match node_data {
        XmlNodeData::Document => {
            for child_id in doc.children(node_id) {
                write_node(doc, child_id, writer, scope, layout)?;
            }
        }
        XmlNodeData::Element { name, attributes } => {
            write_element(doc, node_id, name, attributes, writer, scope, layout)?;
        }
        XmlNodeData::Text(text) => {
            writer
                .write_event(Event::Text(BytesText::from_escaped(escape_text(text))))
                .map_err(NodePrintError::render)?;
        }
        XmlNodeData::CData(text) if text.contains("]]>") => {
            // Cannot be written as one CDATA section; escaped text is equivalent.
            writer
                .write_event(Event::Text(BytesText::from_escaped(escape_text(text))))
                .map_err(NodePrintError::render)?;
        }
        XmlNodeData::CData(text) => {
            writer
                .write_event(Event::CData(BytesCData::new(text.as_str())))
                .map_err(NodePrintError::render)?;
        }
        XmlNodeData::Comment(text) => {
            writer
                .write_event(Event::Comment(BytesText::from_escaped(text.as_str())))
                .map_err(NodePrintError::render)?;
        }
        XmlNodeData::ProcessingInstruction { target, data } => {
            let pi_content = if data.is_empty() {
                target.clone()
            } else {
                format!("{} {}", target, data)
            };
            writer
                .write_event(Event::PI(BytesPI::new(pi_content.as_str())))
                .map_err(NodePrintError::render)?;
        }
    }

    Ok(())
}

fn write_element<W: Write>(
    doc: &XmlDocument,
    node_id: NodeId,
    name: &XName,
    attributes: &[XAttribute],
    writer: &mut Writer<W>,
    scope: &NamespaceScope,
    layout: Layout,
) -> Result<()> {
    let mut scope = scope.clone();
    scope.declare(attributes);

    let mut extra_decls: Vec<(String, String)> = Vec::new();

    let tag_name = match (&name.prefix, &name.namespace) {
        (Some(_), _) => name.qualified().into_owned(),
        (None, Some(ns)) if scope.default.as_deref() == Some(ns.as_str()) => name.local_name.clone(),
        (None, Some(ns)) => match scope.prefix_of(ns) {
            Some(prefix) => format!("{}:{}", prefix, name.local_name),
            None => {
                extra_decls.push(("xmlns".to_string(), ns.clone()));
                scope.default = Some(ns.clone());
                name.local_name.clone()
            }
        },
        (None, None) => {
            if scope.default.take().is_some() {
                extra_decls.push(("xmlns".to_string(), String::new()));
            }
            name.local_name.clone()
        }
    };

    let mut elem = BytesStart::new(tag_name.as_str());

    for attr in attributes {
        let attr_name = attribute_name(&attr.name, &mut scope, &mut extra_decls);
        push_attribute(&mut elem, &attr_name, &attr.value);
    }
    for (decl_name, uri) in &extra_decls {
        push_attribute(&mut elem, decl_name, uri);
    }

    let children: Vec<_> = doc.children(node_id).collect();

    if children.is_empty() {
        writer
            .write_event(Event::Empty(elem))
            .map_err(NodePrintError::render)?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(elem))
        .map_err(NodePrintError::render)?;

    let indent = layout.pretty && is_element_only(doc, node_id);
    let child_layout = if indent {
        layout.nested()
    } else {
        layout.verbatim()
    };

    for child_id in children {
        if indent {
            line_break(writer, child_layout)?;
        }
        write_node(doc, child_id, writer, &scope, child_layout)?;
    }

    if indent {
        line_break(writer, layout)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(tag_name.as_str())))
        .map_err(NodePrintError::render)?;

    Ok(())
}

/// Qualified attribute name. Unprefixed names in a namespace that has no
/// binding in scope get a generated `nsN` prefix declared on the element.
fn attribute_name(
    name: &XName,
    scope: &mut NamespaceScope,
    extra_decls: &mut Vec<(String, String)>,
) -> String {
    let Some(ns) = name.namespace.as_deref() else {
        return name.local_name.clone();
    };

    if ns == XMLNS {
        return format!("xmlns:{}", name.local_name);
    }
    if name.prefix.is_some() {
        return name.qualified().into_owned();
    }
    if let Some(prefix) = scope.prefix_of(ns).filter(|p| !p.is_empty()) {
        return format!("{}:{}", prefix, name.local_name);
    }

    let mut n = 0;
    let prefix = loop {
        let candidate = format!("ns{}", n);
        if !scope.prefixes.values().any(|p| p == &candidate) {
            break candidate;
        }
        n += 1;
    };
    extra_decls.push((format!("xmlns:{}", prefix), ns.to_string()));
    scope.prefixes.insert(ns.to_string(), prefix.clone());
    format!("{}:{}", prefix, name.local_name)
}
