//! DOM tree operations.
//!
//! The [`Dom`] struct owns an `Arena<Node>` and provides safe tree-manipulation
//! methods that keep the intrusive parent/child/sibling links consistent.

use arena::Arena;

use crate::node::{Attr, ElementData, Node, NodeData, NodeId};

// ---------------------------------------------------------------------------
// Dom
// ---------------------------------------------------------------------------

/// The complete DOM tree.
pub struct Dom {
    pub nodes: Arena<Node>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// Create an empty DOM (no document node yet).
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
        }
    }

    // =======================================================================
    // Node creation
    // =======================================================================

    /// Create a Document node and return its id.
    pub fn create_document(&mut self) -> NodeId {
        self.nodes.allocate(Node::new(NodeData::Document))
    }

    /// Create an Element node.
    ///
    /// The `id` and `classes` caches are extracted from `attrs` automatically,
    /// and an `<input checked>` starts out checked.
    pub fn create_element(&mut self, tag_name: &str, attrs: Vec<Attr>) -> NodeId {
        let tag_name = tag_name.to_ascii_lowercase();
        let checked = tag_name == "input" && attrs.iter().any(|a| a.name == "checked");
        let mut elem = ElementData {
            tag_name,
            attrs,
            id: None,
            classes: Vec::new(),
            checked,
        };
        elem.refresh_caches();
        self.nodes.allocate(Node::new(NodeData::Element(elem)))
    }

    /// Convenience: create an element with no attributes.
    pub fn create_html_element(&mut self, tag_name: &str) -> NodeId {
        self.create_element(tag_name, Vec::new())
    }

    /// Create a Text node.
    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.nodes.allocate(Node::new(NodeData::Text {
            data: data.to_string(),
        }))
    }

    /// Create a Comment node.
    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.nodes.allocate(Node::new(NodeData::Comment {
            data: data.to_string(),
        }))
    }

    // =======================================================================
    // Tree mutation
    // =======================================================================

    /// Append `child` as the last child of `parent`.
    ///
    /// If `child` already has a parent it is first removed from its current
    /// position.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.nodes.get(child).and_then(|n| n.parent).is_some() {
            self.detach(child);
        }

        let old_last = self.nodes.get(parent).and_then(|n| n.last_child);

        if let Some(old_last_id) = old_last {
            if let Some(old_last_node) = self.nodes.get_mut(old_last_id) {
                old_last_node.next_sibling = Some(child);
            }
        }

        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
            child_node.prev_sibling = old_last;
            child_node.next_sibling = None;
        }

        if let Some(parent_node) = self.nodes.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = Some(child);
            }
            parent_node.last_child = Some(child);
        }
    }

    /// Remove `child` from `parent`'s child list.
    ///
    /// The child becomes a detached root (parent = None). Detached nodes stay
    /// in the arena and may be re-inserted.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let belongs = self
            .nodes
            .get(child)
            .map(|n| n.parent == Some(parent))
            .unwrap_or(false);
        if !belongs {
            return;
        }
        self.detach(child);
    }

    /// Insert `child` into `parent`'s child list immediately before `reference`.
    ///
    /// If `reference` is `None` this behaves like `append_child`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        let reference = match reference {
            Some(r) if r != child => r,
            Some(_) => return,
            None => {
                self.append_child(parent, child);
                return;
            }
        };

        if self.nodes.get(child).and_then(|n| n.parent).is_some() {
            self.detach(child);
        }

        let prev_of_ref = self.nodes.get(reference).and_then(|n| n.prev_sibling);

        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
            child_node.prev_sibling = prev_of_ref;
            child_node.next_sibling = Some(reference);
        }

        if let Some(ref_node) = self.nodes.get_mut(reference) {
            ref_node.prev_sibling = Some(child);
        }

        if let Some(prev_id) = prev_of_ref {
            if let Some(prev_node) = self.nodes.get_mut(prev_id) {
                prev_node.next_sibling = Some(child);
            }
        } else if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.first_child = Some(child);
        }
    }

    /// Insert `child` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        let first = self.nodes.get(parent).and_then(|n| n.first_child);
        self.insert_before(parent, child, first);
    }

    /// Internal: detach a node from its parent without deallocating it.
    fn detach(&mut self, node_id: NodeId) {
        let (parent_id, prev, next) = match self.nodes.get(node_id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if let Some(prev_id) = prev {
            if let Some(prev_node) = self.nodes.get_mut(prev_id) {
                prev_node.next_sibling = next;
            }
        }

        if let Some(next_id) = next {
            if let Some(next_node) = self.nodes.get_mut(next_id) {
                next_node.prev_sibling = prev;
            }
        }

        if let Some(pid) = parent_id {
            if let Some(parent_node) = self.nodes.get_mut(pid) {
                if parent_node.first_child == Some(node_id) {
                    parent_node.first_child = next;
                }
                if parent_node.last_child == Some(node_id) {
                    parent_node.last_child = prev;
                }
            }
        }

        if let Some(node) = self.nodes.get_mut(node_id) {
            node.parent = None;
            node.prev_sibling = None;
            node.next_sibling = None;
        }
    }

    // =======================================================================
    // Traversal
    // =======================================================================

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    /// Return the immediate children of `parent` in document order.
    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.nodes.get(parent).and_then(|n| n.first_child);
        while let Some(id) = cursor {
            out.push(id);
            cursor = self.nodes.get(id).and_then(|n| n.next_sibling);
        }
        out
    }

    /// Return the chain of ancestors from `node` up to (and including) the root.
    /// The first element is the direct parent, the last is the root.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.parent(node);
        while let Some(id) = cursor {
            out.push(id);
            cursor = self.parent(id);
        }
        out
    }

    /// The topmost ancestor of `node`, or `node` itself when detached.
    pub fn root_of(&self, node: NodeId) -> NodeId {
        self.ancestors(node).last().copied().unwrap_or(node)
    }

    /// `true` when `ancestor` is `node` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor == node || self.ancestors(node).contains(&ancestor)
    }

    /// Return all descendants of `node` in pre-order DFS (not including `node` itself).
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node);
        stack.reverse();

        while let Some(id) = stack.pop() {
            out.push(id);
            for &gc in self.children(id).iter().rev() {
                stack.push(gc);
            }
        }
        out
    }

    // =======================================================================
    // Element accessors
    // =======================================================================

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        self.nodes.get(node).and_then(Node::as_element)
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag_name.as_str())
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|e| e.attr(name))
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    /// Set (or add) an attribute. No-op on non-elements.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(elem) = self.nodes.get_mut(node).and_then(Node::as_element_mut) else {
            return;
        };
        match elem
            .attrs
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
        {
            Some(attr) => attr.value = value.to_string(),
            None => elem.attrs.push(Attr::new(name, value)),
        }
        elem.refresh_caches();
    }

    /// Concatenated data of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        if let Some(Node {
            data: NodeData::Text { data },
            ..
        }) = self.nodes.get(node)
        {
            return data.clone();
        }
        let mut out = String::new();
        for id in self.descendants(node) {
            if let Some(Node {
                data: NodeData::Text { data },
                ..
            }) = self.nodes.get(id)
            {
                out.push_str(data);
            }
        }
        out
    }

    /// Replace the children of `node` with a single text node.
    ///
    /// When `node` already holds exactly one text child its data is rewritten
    /// in place, so repeated writes do not grow the arena.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        let children = self.children(node);
        if let [only] = children.as_slice() {
            if let Some(Node {
                data: NodeData::Text { data },
                ..
            }) = self.nodes.get_mut(*only)
            {
                if data != text {
                    *data = text.to_string();
                }
                return;
            }
        }
        for child in children {
            self.detach(child);
        }
        if !text.is_empty() {
            let t = self.create_text(text);
            self.append_child(node, t);
        }
    }

    // =======================================================================
    // Queries
    // =======================================================================

    /// Find the first element with the given `id` attribute in the subtree
    /// rooted at `root` (pre-order DFS, root included).
    pub fn get_element_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        std::iter::once(root)
            .chain(self.descendants(root))
            .find(|&n| self.element(n).and_then(|e| e.id.as_deref()) == Some(id))
    }

    /// Return all elements whose tag name matches `tag`
    /// in the subtree rooted at `root` (pre-order DFS, root included).
    pub fn get_elements_by_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        std::iter::once(root)
            .chain(self.descendants(root))
            .filter(|&n| self.tag_name(n).is_some_and(|t| t.eq_ignore_ascii_case(tag)))
            .collect()
    }

    /// Return all descendant elements of `root` carrying attribute `name`
    /// (pre-order DFS, root excluded).
    pub fn elements_with_attr(&self, root: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&n| self.has_attr(n, name))
            .collect()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: build a small widget-like tree and return the relevant node ids.
    ///
    /// ```text
    /// document
    /// └── div#tabs
    ///     ├── fieldset.group
    ///     │   ├── legend ("OS")
    ///     │   └── input[checked]
    ///     └── pre[snippet-os=mac] ("brew install")
    /// ```
    fn build_sample_tree() -> (Dom, NodeId, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let div = dom.create_element("div", vec![Attr::new("id", "tabs")]);
        let fieldset = dom.create_element("fieldset", vec![Attr::new("class", "group main")]);
        let legend = dom.create_html_element("legend");
        let legend_text = dom.create_text("OS");
        let input = dom.create_element(
            "input",
            vec![Attr::new("type", "radio"), Attr::new("checked", "")],
        );
        let pre = dom.create_element("pre", vec![Attr::new("snippet-os", "mac")]);
        let pre_text = dom.create_text("brew install");

        dom.append_child(doc, div);
        dom.append_child(div, fieldset);
        dom.append_child(fieldset, legend);
        dom.append_child(legend, legend_text);
        dom.append_child(fieldset, input);
        dom.append_child(div, pre);
        dom.append_child(pre, pre_text);

        (dom, doc, div, fieldset, legend, input, pre)
    }

    #[test]
    fn create_element_extracts_id_classes_and_checked() {
        let (dom, _, div, fieldset, _, input, pre) = build_sample_tree();
        assert_eq!(dom.element(div).unwrap().id.as_deref(), Some("tabs"));
        assert_eq!(dom.element(fieldset).unwrap().classes, vec!["group", "main"]);
        assert!(dom.element(input).unwrap().checked);
        assert!(!dom.element(pre).unwrap().checked);
    }

    #[test]
    fn checked_attr_only_seeds_inputs() {
        let mut dom = Dom::new();
        let div = dom.create_element("div", vec![Attr::new("checked", "")]);
        assert!(!dom.element(div).unwrap().checked);
    }

    #[test]
    fn tag_names_are_lowercased() {
        let mut dom = Dom::new();
        let el = dom.create_html_element("FIELDSET");
        assert_eq!(dom.tag_name(el), Some("fieldset"));
    }

    #[test]
    fn append_child_sets_links() {
        let mut dom = Dom::new();
        let parent = dom.create_html_element("div");
        let c1 = dom.create_html_element("span");
        let c2 = dom.create_text("hi");

        dom.append_child(parent, c1);
        dom.append_child(parent, c2);

        let p = dom.nodes.get(parent).unwrap();
        assert_eq!(p.first_child, Some(c1));
        assert_eq!(p.last_child, Some(c2));

        let n1 = dom.nodes.get(c1).unwrap();
        assert_eq!(n1.parent, Some(parent));
        assert_eq!(n1.prev_sibling, None);
        assert_eq!(n1.next_sibling, Some(c2));

        let n2 = dom.nodes.get(c2).unwrap();
        assert_eq!(n2.prev_sibling, Some(c1));
        assert_eq!(n2.next_sibling, None);
    }

    #[test]
    fn append_child_moves_from_old_parent() {
        let mut dom = Dom::new();
        let p1 = dom.create_html_element("div");
        let p2 = dom.create_html_element("section");
        let child = dom.create_html_element("span");

        dom.append_child(p1, child);
        dom.append_child(p2, child);
        assert!(dom.children(p1).is_empty());
        assert_eq!(dom.children(p2), vec![child]);
    }

    #[test]
    fn remove_child_detaches() {
        let mut dom = Dom::new();
        let parent = dom.create_html_element("ul");
        let a = dom.create_html_element("li");
        let b = dom.create_html_element("li");
        let c = dom.create_html_element("li");
        dom.append_child(parent, a);
        dom.append_child(parent, b);
        dom.append_child(parent, c);

        dom.remove_child(parent, b);
        assert_eq!(dom.children(parent), vec![a, c]);
        let nb = dom.nodes.get(b).unwrap();
        assert_eq!(nb.parent, None);
        assert_eq!(nb.prev_sibling, None);
        assert_eq!(nb.next_sibling, None);

        dom.remove_child(parent, a);
        dom.remove_child(parent, c);
        let p = dom.nodes.get(parent).unwrap();
        assert_eq!(p.first_child, None);
        assert_eq!(p.last_child, None);
    }

    #[test]
    fn remove_child_wrong_parent_is_noop() {
        let mut dom = Dom::new();
        let p1 = dom.create_html_element("div");
        let p2 = dom.create_html_element("section");
        let child = dom.create_html_element("span");
        dom.append_child(p1, child);
        dom.remove_child(p2, child);
        assert_eq!(dom.children(p1), vec![child]);
    }

    #[test]
    fn insert_before_middle_and_first() {
        let mut dom = Dom::new();
        let parent = dom.create_html_element("ul");
        let a = dom.create_html_element("li");
        let b = dom.create_html_element("li");
        let c = dom.create_html_element("li");

        dom.append_child(parent, c);
        dom.insert_before(parent, a, Some(c));
        dom.insert_before(parent, b, Some(c));
        assert_eq!(dom.children(parent), vec![a, b, c]);
        assert_eq!(dom.nodes.get(parent).unwrap().first_child, Some(a));
    }

    #[test]
    fn insert_before_none_appends() {
        let mut dom = Dom::new();
        let parent = dom.create_html_element("ul");
        let a = dom.create_html_element("li");
        let b = dom.create_html_element("li");
        dom.append_child(parent, a);
        dom.insert_before(parent, b, None);
        assert_eq!(dom.children(parent), vec![a, b]);
    }

    #[test]
    fn insert_before_itself_is_noop() {
        let mut dom = Dom::new();
        let parent = dom.create_html_element("ul");
        let a = dom.create_html_element("li");
        dom.append_child(parent, a);
        dom.insert_before(parent, a, Some(a));
        assert_eq!(dom.children(parent), vec![a]);
    }

    #[test]
    fn repeated_prepend_reverses_insertion_order() {
        let mut dom = Dom::new();
        let parent = dom.create_html_element("div");
        let tail = dom.create_html_element("section");
        dom.append_child(parent, tail);
        let items: Vec<_> = (0..3).map(|_| dom.create_html_element("fieldset")).collect();
        for &item in items.iter().rev() {
            dom.prepend_child(parent, item);
        }
        assert_eq!(dom.children(parent), vec![items[0], items[1], items[2], tail]);
    }

    #[test]
    fn ancestors_and_root() {
        let (dom, doc, div, fieldset, _, input, _) = build_sample_tree();
        assert_eq!(dom.ancestors(input), vec![fieldset, div, doc]);
        assert!(dom.ancestors(doc).is_empty());
        assert_eq!(dom.root_of(input), doc);
        assert!(dom.is_inclusive_ancestor(div, input));
        assert!(dom.is_inclusive_ancestor(input, input));
        assert!(!dom.is_inclusive_ancestor(input, div));
    }

    #[test]
    fn descendants_preorder() {
        let (dom, _, div, fieldset, legend, input, pre) = build_sample_tree();
        let desc = dom.descendants(div);
        assert_eq!(desc.len(), 6);
        assert_eq!(desc[0], fieldset);
        assert_eq!(desc[1], legend);
        assert!(dom.nodes.get(desc[2]).unwrap().is_text());
        assert_eq!(desc[3], input);
        assert_eq!(desc[4], pre);
    }

    #[test]
    fn queries() {
        let (dom, doc, div, _, _, input, pre) = build_sample_tree();
        assert_eq!(dom.get_element_by_id(doc, "tabs"), Some(div));
        assert_eq!(dom.get_element_by_id(doc, "missing"), None);
        assert_eq!(dom.get_elements_by_tag(doc, "INPUT"), vec![input]);
        assert_eq!(dom.elements_with_attr(doc, "snippet-os"), vec![pre]);
    }

    #[test]
    fn set_attr_updates_caches() {
        let mut dom = Dom::new();
        let el = dom.create_html_element("div");
        dom.set_attr(el, "class", "a b");
        dom.set_attr(el, "id", "x");
        dom.set_attr(el, "ID", "y");
        let e = dom.element(el).unwrap();
        assert_eq!(e.classes, vec!["a", "b"]);
        assert_eq!(e.id.as_deref(), Some("y"));
        assert_eq!(e.attrs.len(), 2);
        assert!(dom.has_attr(el, "Class"));
    }

    #[test]
    fn text_content_collects_descendants() {
        let (dom, _, _, fieldset, legend, _, pre) = build_sample_tree();
        assert_eq!(dom.text_content(legend), "OS");
        assert_eq!(dom.text_content(fieldset), "OS");
        assert_eq!(dom.text_content(pre), "brew install");
    }

    #[test]
    fn set_text_content_rewrites_in_place() {
        let mut dom = Dom::new();
        let style = dom.create_html_element("style");
        dom.set_text_content(style, "a { display: none; }");
        let first = dom.children(style);
        let before = dom.nodes.len();

        dom.set_text_content(style, "b { display: none; }");
        assert_eq!(dom.children(style), first);
        assert_eq!(dom.nodes.len(), before);
        assert_eq!(dom.text_content(style), "b { display: none; }");
    }

    #[test]
    fn set_text_content_replaces_mixed_children() {
        let mut dom = Dom::new();
        let p = dom.create_html_element("p");
        let a = dom.create_html_element("b");
        let t = dom.create_text("x");
        dom.append_child(p, a);
        dom.append_child(p, t);
        dom.set_text_content(p, "plain");
        assert_eq!(dom.children(p).len(), 1);
        assert_eq!(dom.text_content(p), "plain");
        assert_eq!(dom.parent(a), None);
    }
}
