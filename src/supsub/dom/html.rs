//! HTML in and out of the tree
//!
//! Parsing goes through html5ever's fragment parser with a `<div>` context, which is what
//! assigning `innerHTML` on the editable element does. Serialization is done by hand so the
//! output matches what a browser reports for `innerHTML`: `&nbsp;` for U+00A0, void elements
//! without a closing tag, attributes in source order.

use super::node::{Element, Node};
use html5ever::serialize::{SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{local_name, ns, parse_fragment as parse_html_fragment, serialize, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use std::io;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

fn parse_to_dom(html: &str) -> RcDom {
    let context = QualName::new(None, ns!(html), local_name!("div"));
    parse_html_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new(), false).one(html)
}

/// The nodes of the fragment root, i.e. the `<html>` element the fragment parser creates.
fn fragment_children(dom: &RcDom) -> Vec<Handle> {
    dom.document
        .children
        .borrow()
        .first()
        .map(|root| root.children.borrow().clone())
        .unwrap_or_default()
}

/// Parse markup into owned nodes. Comments, doctypes and processing instructions are dropped.
pub fn parse_fragment(html: &str) -> Vec<Node> {
    let dom = parse_to_dom(html);
    fragment_children(&dom).iter().filter_map(convert).collect()
}

fn convert(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Text { contents } => Some(Node::Text(contents.borrow().to_string())),
        NodeData::Element { name, attrs, .. } => {
            let mut element = Element::new(&name.local);
            element.attrs = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            element.children = handle.children.borrow().iter().filter_map(convert).collect();
            Some(Node::Element(element))
        }
        _ => None,
    }
}

/// Parse `html` and serialize it straight back with html5ever.
///
/// This is the structural repair step for pasted markup: unbalanced tags get closed or
/// dropped, stray closers disappear and entities come back normalized.
pub fn reserialize(html: &str) -> io::Result<String> {
    let dom = parse_to_dom(html);
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    let mut output = Vec::new();
    for child in fragment_children(&dom) {
        let serializable = SerializableHandle::from(child);
        serialize(&mut output, &serializable, opts.clone())?;
    }
    String::from_utf8(output).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

pub fn serialize_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(text) => escape_text(out, text),
        Node::Element(element) => {
            out.push('<');
            out.push_str(&element.tag);
            for (name, value) in &element.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attribute(out, value);
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                return;
            }
            for child in &element.children {
                write_node(out, child);
            }
            out.push_str("</");
            out.push_str(&element.tag);
            out.push('>');
        }
    }
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{A0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{A0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drops_comments() {
        let nodes = parse_fragment("a<!-- c --><sup>b</sup>");
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].as_mark(), Some(crate::supsub::mark::Mark::Superscript));
    }

    #[test]
    fn test_serialize_escapes() {
        let nodes = parse_fragment("1 &lt; 2&nbsp;&amp; <span title=\"a&quot;b\">x</span><br>");
        assert_eq!(
            serialize_nodes(&nodes),
            "1 &lt; 2&nbsp;&amp; <span title=\"a&quot;b\">x</span><br>"
        );
    }

    #[test]
    fn test_reserialize_repairs_structure() {
        assert_eq!(reserialize("<sup>12</span></sup>").unwrap(), "<sup>12</sup>");
        assert_eq!(reserialize("<sup>12").unwrap(), "<sup>12</sup>");
    }
}
