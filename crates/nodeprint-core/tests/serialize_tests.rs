//! Serializer behaviour tests
//!
//! Parses small documents, runs `serialize` with every flag combination and
//! checks the observable output.

use nodeprint_core::{parse, serialize, NodePrintError, NodeSerializer, FormattingOptions, XmlDocument};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeMap;

const FLAGS: [(bool, bool); 4] = [(false, false), (false, true), (true, false), (true, true)];

/// Parse `xml` and serialize its document node.
fn serialize_str(xml: &str, omit_declaration: bool, pretty_print: bool) -> String {
    let mut doc = parse(xml).unwrap_or_else(|e| panic!("Failed to parse {xml:?}: {e}"));
    let root = doc.root();
    serialize(&mut doc, root, omit_declaration, pretty_print)
        .unwrap_or_else(|e| panic!("Failed to serialize {xml:?}: {e}"))
}

// ============================================================================
// Argument checks
// ============================================================================

#[test]
fn null_node_is_rejected_for_every_flag_combination() {
    for (omit, pretty) in FLAGS {
        let mut doc = parse("<a/>").unwrap();
        let err = serialize(&mut doc, None, omit, pretty).unwrap_err();
        assert!(
            matches!(err, NodePrintError::InvalidArgument { .. }),
            "omit={omit} pretty={pretty}: {err}"
        );
    }
}

#[test]
fn node_from_a_larger_document_is_rejected() {
    let big = parse("<a><b/><c/><d/></a>").unwrap();
    let foreign = big.descendants(big.root().unwrap()).last();

    let mut small = XmlDocument::new();
    let err = serialize(&mut small, foreign, false, false).unwrap_err();
    assert!(matches!(err, NodePrintError::InvalidArgument { .. }));
}

// ============================================================================
// Declaration flag
// ============================================================================

#[test]
fn declaration_is_written_unless_omitted() {
    for pretty in [false, true] {
        let with_decl = serialize_str("<a><b/></a>", false, pretty);
        assert!(with_decl.starts_with("<?xml"), "{with_decl}");
        assert!(with_decl.contains(r#"encoding="UTF-8""#), "{with_decl}");

        let without = serialize_str("<a><b/></a>", true, pretty);
        assert!(!without.contains("<?xml"), "{without}");
    }
}

#[test]
fn declaration_is_written_for_subtrees_too() {
    let mut doc = parse("<a><b>x</b></a>").unwrap();
    let a = doc.root_element().unwrap();
    let b = doc.children(a).next();

    let xml = serialize(&mut doc, b, false, false).unwrap();
    assert_eq!(xml, r#"<?xml version="1.0" encoding="UTF-8"?><b>x</b>"#);
}

// ============================================================================
// Pretty-print flag
// ============================================================================

#[test]
fn compact_output_has_no_formatting_whitespace() {
    assert_eq!(serialize_str("<a>  <b/>  </a>", true, false), "<a><b/></a>");
}

#[test]
fn pretty_output_indents_nesting_levels() {
    assert_eq!(serialize_str("<a>  <b/>  </a>", true, true), "<a>\n    <b/>\n</a>");
    assert_eq!(
        serialize_str("<a>\n\t<b>\n\t\t<c/>\n\t</b>\n</a>", false, true),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a>\n    <b>\n        <c/>\n    </b>\n</a>"
    );
}

#[test]
fn pretty_print_replaces_existing_indentation() {
    let two_space = "<a>\n  <b>\n    <c>1</c>\n  </b>\n</a>";
    let tabs = "<a>\n\t<b>\n\t\t<c>1</c>\n\t</b>\n</a>";

    assert_eq!(serialize_str(two_space, true, true), serialize_str(tabs, true, true));
    assert_eq!(serialize_str(two_space, true, false), "<a><b><c>1</c></b></a>");
}

// ============================================================================
// Data preservation
// ============================================================================

#[test]
fn whitespace_around_data_nodes_is_removed() {
    let xml = "<root>  <child>value</child>  </root>";

    for (omit, pretty) in FLAGS {
        let out = serialize_str(xml, omit, pretty);
        assert_eq!(out.matches("value").count(), 1, "{out}");
        assert!(out.contains("<root>"), "{out}");
        assert!(!out.contains("<root>  "), "{out}");
    }

    assert_eq!(serialize_str(xml, true, false), "<root><child>value</child></root>");
    assert_eq!(
        serialize_str(xml, true, true),
        "<root>\n    <child>value</child>\n</root>"
    );
}

#[test]
fn mixed_content_is_kept_verbatim() {
    let xml = "<p>Hello <b>World</b>!</p>";

    for (omit, pretty) in FLAGS {
        let out = serialize_str(xml, omit, pretty);
        assert!(out.ends_with(xml), "omit={omit} pretty={pretty}: {out}");
    }
}

#[test]
fn pretty_print_does_not_break_mixed_content() {
    assert_eq!(serialize_str("<p><b>x</b>tail</p>", true, true), "<p><b>x</b>tail</p>");
    assert_eq!(
        serialize_str("<r>\n  <p><b>x</b>tail</p>\n</r>", true, true),
        "<r>\n    <p><b>x</b>tail</p>\n</r>"
    );
}

#[test]
fn text_with_surrounding_spaces_is_not_trimmed() {
    assert_eq!(serialize_str("<a>  x  </a>", true, true), "<a>  x  </a>");
}

#[test]
fn nbsp_only_text_is_content() {
    assert_eq!(serialize_str("<a>\u{00A0}<b/></a>", true, false), "<a>\u{00A0}<b/></a>");
}

#[test]
fn comments_and_prolog_survive() {
    let xml = "<!-- head --><r>\n  <!-- inner -->\n  <x/>\n</r>";
    assert_eq!(
        serialize_str(xml, true, false),
        "<!-- head --><r><!-- inner --><x/></r>"
    );
}

#[test]
fn namespaces_round_trip() {
    let xml = r#"<w:doc xmlns:w="urn:w"> <w:p w:id="1"> </w:p> </w:doc>"#;
    assert_eq!(
        serialize_str(xml, true, false),
        r#"<w:doc xmlns:w="urn:w"><w:p w:id="1"/></w:doc>"#
    );
}

// ============================================================================
// Side effects
// ============================================================================

#[test]
fn caller_tree_is_stripped_in_place() {
    let mut doc = parse("<a> <b/> </a>").unwrap();
    let a = doc.root_element().unwrap();

    serialize(&mut doc, Some(a), true, false).unwrap();

    assert_eq!(doc.children(a).count(), 1);
    let rendered = NodeSerializer::new(FormattingOptions::new(true, false))
        .render(&doc, a)
        .unwrap();
    assert_eq!(rendered, "<a><b/></a>");
}

// ============================================================================
// Idempotence
// ============================================================================

type Attributes = BTreeMap<String, String>;

#[derive(Debug, Clone)]
enum Tree {
    Text(String),
    Comment(String),
    Element(String, Attributes, Vec<Tree>),
}

fn name_strategy() -> impl Strategy<Value = String> {
    "(p:)?[abc]"
}

fn attributes_strategy() -> impl Strategy<Value = Attributes> {
    prop::collection::btree_map("(p:)?[xyz]", "[ \t\n\rxy&<\"']{0,4}", 0..3)
}

fn tree_strategy() -> impl Strategy<Value = Tree> {
    let leaf = prop_oneof![
        "[ \t\n\rxy&<]{0,5}".prop_map(Tree::Text),
        "[ xy]{0,4}".prop_map(Tree::Comment),
        (name_strategy(), attributes_strategy())
            .prop_map(|(name, attrs)| Tree::Element(name, attrs, Vec::new())),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            name_strategy(),
            attributes_strategy(),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(name, attrs, children)| Tree::Element(name, attrs, children))
    })
}

fn root_strategy() -> impl Strategy<Value = Tree> {
    (
        "[abc]",
        attributes_strategy(),
        prop::collection::vec(tree_strategy(), 0..4),
    )
        .prop_map(|(name, mut attrs, children)| {
            attrs.insert("xmlns:p".to_string(), "urn:p".to_string());
            Tree::Element(name, attrs, children)
        })
}

fn write_tree(tree: &Tree, out: &mut String) {
    match tree {
        Tree::Text(text) => {
            out.push_str(
                &text
                    .replace('&', "&amp;")
                    .replace('<', "&lt;")
                    .replace('\r', "&#13;"),
            );
        }
        Tree::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        Tree::Element(name, attrs, children) => {
            out.push('<');
            out.push_str(name);
            for (key, value) in attrs {
                let value = value
                    .replace('&', "&amp;")
                    .replace('<', "&lt;")
                    .replace('"', "&quot;")
                    .replace('\t', "&#9;")
                    .replace('\n', "&#10;")
                    .replace('\r', "&#13;");
                out.push_str(&format!(" {key}=\"{value}\""));
            }
            out.push('>');
            for child in children {
                write_tree(child, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
}

#[test]
fn attribute_line_breaks_survive_reserialization() {
    let xml = r#"<a x="1&#10;2" y="&#9;&#13;"/>"#;

    for (omit, pretty) in FLAGS {
        let first = serialize_str(xml, omit, pretty);
        assert!(first.ends_with(xml), "omit={omit} pretty={pretty}: {first}");
        assert_eq!(serialize_str(&first, omit, pretty), first);
    }
}

#[test]
fn carriage_return_in_text_survives_reserialization() {
    let xml = "<a>x&#13;\ny</a>";

    let first = serialize_str(xml, true, false);
    assert_eq!(first, xml);
    assert_eq!(serialize_str(&first, true, false), first);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn serializing_twice_changes_nothing(
        tree in root_strategy(),
        omit in any::<bool>(),
        pretty in any::<bool>(),
    ) {
        let mut xml = String::new();
        write_tree(&tree, &mut xml);

        let first = serialize_str(&xml, omit, pretty);
        let second = serialize_str(&first, omit, pretty);
        prop_assert_eq!(first, second);
    }
}
