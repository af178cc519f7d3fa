//! HTML tree builder: constructs a [`Dom`] from a stream of [`HtmlToken`]s.
//!
//! A forgiving, mode-less subset of the WHATWG tree construction algorithm:
//! no implied `<html>`/`<head>`/`<body>`, void elements never take children,
//! an end tag closes the nearest open element of that name and is ignored
//! when none is open. That is enough for authored page fragments and keeps
//! serialization round-trips structure-preserving.

use dom::node::{Attr, NodeData, NodeId};
use dom::Dom;

use crate::token::HtmlToken;
use crate::tokenizer::Tokenizer;

/// Elements that never have children or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is raw text up to the matching end tag.
pub const RAWTEXT_ELEMENTS: &[&str] = &["style", "script"];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

// ---------------------------------------------------------------------------
// Tree builder
// ---------------------------------------------------------------------------

/// Builds DOM nodes under a fixed root from HTML tokens.
pub struct TreeBuilder<'a> {
    dom: &'a mut Dom,
    root: NodeId,
    open_elements: Vec<NodeId>,
}

impl<'a> TreeBuilder<'a> {
    /// Insert everything parsed under `root`.
    pub fn new(dom: &'a mut Dom, root: NodeId) -> Self {
        Self {
            dom,
            root,
            open_elements: Vec::new(),
        }
    }

    // =======================================================================
    // Helpers
    // =======================================================================

    /// Current node = last element on the open elements stack.
    fn current_node(&self) -> NodeId {
        self.open_elements.last().copied().unwrap_or(self.root)
    }

    fn insert_element(&mut self, tag: &str, attrs: Vec<(String, String)>) -> NodeId {
        let attrs = attrs
            .into_iter()
            .map(|(name, value)| Attr { name, value })
            .collect();
        let node = self.dom.create_element(tag, attrs);
        let parent = self.current_node();
        self.dom.append_child(parent, node);
        node
    }

    /// Insert a character, coalescing with a trailing text node.
    fn insert_character(&mut self, c: char) {
        let parent = self.current_node();
        let last = self.dom.nodes.get(parent).and_then(|n| n.last_child);
        if let Some(node) = last.and_then(|l| self.dom.nodes.get_mut(l)) {
            if let NodeData::Text { data } = &mut node.data {
                data.push(c);
                return;
            }
        }
        let text = self.dom.create_text(&c.to_string());
        self.dom.append_child(parent, text);
    }

    fn insert_comment(&mut self, data: &str) {
        let parent = self.current_node();
        let comment = self.dom.create_comment(data);
        self.dom.append_child(parent, comment);
    }

    /// Pop up to and including the nearest open element named `tag`.
    fn close_element(&mut self, tag: &str) {
        let Some(pos) = self
            .open_elements
            .iter()
            .rposition(|&n| self.dom.tag_name(n) == Some(tag))
        else {
            return;
        };
        self.open_elements.truncate(pos);
    }

    // =======================================================================
    // Driver
    // =======================================================================

    /// Consume `html` completely.
    pub fn run(mut self, html: &str) {
        let mut tokenizer = Tokenizer::new(html);
        loop {
            match tokenizer.next_token() {
                HtmlToken::Doctype { .. } => {}
                HtmlToken::StartTag {
                    name,
                    attrs,
                    self_closing,
                } => {
                    let node = self.insert_element(&name, attrs);
                    if RAWTEXT_ELEMENTS.contains(&name.as_str()) && !self_closing {
                        self.open_elements.push(node);
                        tokenizer.switch_to_rawtext(&name);
                    } else if !self_closing && !is_void_element(&name) {
                        self.open_elements.push(node);
                    }
                }
                HtmlToken::EndTag { name } => self.close_element(&name),
                HtmlToken::Comment(data) => self.insert_comment(&data),
                HtmlToken::Character(c) => self.insert_character(c),
                HtmlToken::EOF => break,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience entry points
// ---------------------------------------------------------------------------

/// Parse a complete page into a fresh [`Dom`]; returns it with its
/// Document node.
pub fn parse_document(html: &str) -> (Dom, NodeId) {
    let mut dom = Dom::new();
    let document = dom.create_document();
    TreeBuilder::new(&mut dom, document).run(html);
    (dom, document)
}

/// Parse `html` and append the resulting nodes to `parent`.
pub fn parse_fragment_into(dom: &mut Dom, parent: NodeId, html: &str) {
    TreeBuilder::new(dom, parent).run(html);
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(dom: &Dom, nodes: &[NodeId]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(|&n| dom.tag_name(n).map(String::from))
            .collect()
    }

    #[test]
    fn builds_nested_elements() {
        let (dom, doc) = parse_document("<!DOCTYPE html><div id=\"page\"><p>Hello <b>world</b></p></div>");
        let children = dom.children(doc);
        assert_eq!(tags(&dom, &children), vec!["div"]);
        let div = children[0];
        assert_eq!(dom.attr(div, "id"), Some("page"));
        assert_eq!(dom.text_content(div), "Hello world");
    }

    #[test]
    fn void_elements_take_no_children() {
        let (dom, doc) =
            parse_document("<label><input type=radio name=os value=mac checked>macOS</label>");
        let label = dom.children(doc)[0];
        let kids = dom.children(label);
        assert_eq!(kids.len(), 2);
        assert_eq!(dom.tag_name(kids[0]), Some("input"));
        assert!(dom.element(kids[0]).is_some_and(|e| e.checked));
        assert!(dom.nodes.get(kids[1]).is_some_and(|n| n.is_text()));
    }

    #[test]
    fn style_content_is_raw_text() {
        let (dom, doc) = parse_document("<style>a > b { color: red }</style><p>x</p>");
        let kids = dom.children(doc);
        assert_eq!(tags(&dom, &kids), vec!["style", "p"]);
        assert_eq!(dom.text_content(kids[0]), "a > b { color: red }");
    }

    #[test]
    fn unmatched_end_tag_is_ignored() {
        let (dom, doc) = parse_document("<div>a</span>b</div>");
        let div = dom.children(doc)[0];
        assert_eq!(dom.children(div).len(), 1);
        assert_eq!(dom.text_content(div), "ab");
    }

    #[test]
    fn end_tag_closes_intervening_elements() {
        let (dom, doc) = parse_document("<div><p><b>x</div><i>y</i>");
        assert_eq!(tags(&dom, &dom.children(doc)), vec!["div", "i"]);
    }

    #[test]
    fn unclosed_elements_are_kept() {
        let (dom, doc) = parse_document("<div><p>open");
        let div = dom.children(doc)[0];
        assert_eq!(dom.text_content(div), "open");
    }

    #[test]
    fn comments_are_inserted_in_place() {
        let (dom, doc) = parse_document("<div><!-- c --></div>");
        let div = dom.children(doc)[0];
        let comment = dom.children(div)[0];
        assert!(matches!(
            dom.nodes.get(comment).map(|n| &n.data),
            Some(NodeData::Comment { data }) if data == " c "
        ));
    }

    #[test]
    fn fragment_appends_to_existing_parent() {
        let mut dom = Dom::new();
        let host = dom.create_html_element("section");
        let before = dom.create_text("before");
        dom.append_child(host, before);
        parse_fragment_into(&mut dom, host, "<span>after</span>");
        assert_eq!(dom.children(host).len(), 2);
        assert_eq!(dom.text_content(host), "beforeafter");
    }
}
