//! Container lookup and normalization.

use dom::{Attr, Dom, NodeId};

use crate::config::AttributeNames;
use crate::error::{Result, WidgetError};

/// Find the container element by `id` anywhere under `root`.
pub fn find_container(dom: &Dom, root: NodeId, id: &str) -> Result<NodeId> {
    dom.get_element_by_id(root, id)
        .ok_or_else(|| WidgetError::ContainerNotFound {
            container: id.to_string(),
        })
}

/// Guarantee the container has a `P-results` element and return it.
///
/// An existing marked descendant is returned untouched. Otherwise a
/// `<div P-results>` is created, every child of the container that is not
/// (and does not hold) widget chrome moves into it in order, and it is
/// appended to the container.
pub fn ensure_results(dom: &mut Dom, container: NodeId, names: &AttributeNames) -> NodeId {
    if let Some(&existing) = dom.elements_with_attr(container, &names.results).first() {
        return existing;
    }

    let chrome: Vec<NodeId> = [&names.group, &names.style, &names.base]
        .into_iter()
        .flat_map(|attr| dom.elements_with_attr(container, attr))
        .collect();

    let results = dom.create_element("div", vec![Attr::new(&names.results, "")]);
    for child in dom.children(container) {
        if chrome.iter().any(|&c| dom.is_inclusive_ancestor(child, c)) {
            continue;
        }
        dom.append_child(results, child);
    }
    dom.append_child(container, results);
    results
}
