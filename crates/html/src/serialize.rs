//! HTML serialization of DOM subtrees.
//!
//! Output reparses to the same tree through [`crate::parse_document`]. Form
//! controls are written with their current checkedness, so a page saved after
//! user interaction reopens in the same state.

use dom::node::{NodeData, NodeId};
use dom::Dom;

use crate::tree_builder::{is_void_element, RAWTEXT_ELEMENTS};

/// Serialize `node` itself and everything below it.
pub fn serialize(dom: &Dom, node: NodeId) -> String {
    let mut out = String::new();
    write_node(dom, node, &mut out);
    out
}

/// Serialize only the children of `node` (its "inner HTML").
pub fn serialize_children(dom: &Dom, node: NodeId) -> String {
    let mut out = String::new();
    for child in dom.children(node) {
        write_node(dom, child, &mut out);
    }
    out
}

fn write_node(dom: &Dom, node: NodeId, out: &mut String) {
    let Some(n) = dom.nodes.get(node) else {
        return;
    };
    match &n.data {
        NodeData::Document => {
            for child in dom.children(node) {
                write_node(dom, child, out);
            }
        }
        NodeData::Element(elem) => {
            out.push('<');
            out.push_str(&elem.tag_name);
            let is_input = elem.tag_name == "input";
            for attr in &elem.attrs {
                if is_input && attr.name == "checked" {
                    continue;
                }
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                escape_into(&attr.value, true, out);
                out.push('"');
            }
            if is_input && elem.checked {
                out.push_str(" checked=\"\"");
            }
            out.push('>');

            if is_void_element(&elem.tag_name) {
                return;
            }
            let raw = RAWTEXT_ELEMENTS.contains(&elem.tag_name.as_str());
            for child in dom.children(node) {
                match dom.nodes.get(child).map(|c| &c.data) {
                    Some(NodeData::Text { data }) if raw => out.push_str(data),
                    _ => write_node(dom, child, out),
                }
            }
            out.push_str("</");
            out.push_str(&elem.tag_name);
            out.push('>');
        }
        NodeData::Text { data } => escape_into(data, false, out),
        NodeData::Comment { data } => {
            out.push_str("<!--");
            out.push_str(data);
            out.push_str("-->");
        }
    }
}

fn escape_into(s: &str, attribute: bool, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{A0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
