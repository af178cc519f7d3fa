//! Markup generation for explicitly configured groups.
//!
//! Each group becomes a `<fieldset>` holding its legend, one labelled input
//! per option and its style slot:
//!
//! ```html
//! <fieldset snippet-group="os" class="snippet-group">
//!   <legend class="snippet-title">OS</legend>
//!   <label class="snippet-option"><input type="radio" name="snippet-os"
//!          id="snippet-os-mac" value="mac" checked>macOS</label>
//!   <style snippet-style="os"></style>
//! </fieldset>
//! ```

use dom::{form, Attr, Dom, NodeId};

use crate::config::AttributeNames;
use crate::group::{Arity, OptionGroup};

/// Default look of generated groups. Hides nothing; visibility is entirely
/// the per-group slots' business.
pub fn base_css(names: &AttributeNames) -> String {
    format!(
        ".{group} {{ border: none; margin: 0 0 0.5em; padding: 0; }}\n\
         .{title} {{ font-weight: bold; }}\n\
         .{option} {{ display: inline-block; margin-right: 1em; cursor: pointer; }}\n",
        group = names.group_class,
        title = names.title_class,
        option = names.option_class,
    )
}

/// Build the fieldset for one group. The element is detached.
pub fn build_group(dom: &mut Dom, group: &OptionGroup, names: &AttributeNames) -> NodeId {
    let fieldset = dom.create_element(
        "fieldset",
        vec![
            Attr::new(&names.group, &group.id),
            Attr::new("class", &names.group_class),
        ],
    );

    let legend = dom.create_element("legend", vec![Attr::new("class", &names.title_class)]);
    let title = dom.create_text(group.label());
    dom.append_child(legend, title);
    dom.append_child(fieldset, legend);

    let input_name = names.input_name(&group.id);
    let mut inputs = Vec::with_capacity(group.options.len());
    for option in &group.options {
        let label = dom.create_element("label", vec![Attr::new("class", &names.option_class)]);
        let input = dom.create_element(
            "input",
            vec![
                Attr::new("type", group.arity.input_type()),
                Attr::new("name", &input_name),
                Attr::new("id", &names.input_id(&group.id, &option.id)),
                Attr::new("value", &option.id),
            ],
        );
        let text = dom.create_text(option.label());
        dom.append_child(label, input);
        dom.append_child(label, text);
        dom.append_child(fieldset, label);
        inputs.push(input);
    }

    // Defaults go through the form layer so radios stay exclusive; with
    // several defaults on a single group the last one wins.
    for (option, &input) in group.options.iter().zip(&inputs) {
        if option.default {
            form::set_checked(dom, input, true);
        }
    }
    if group.arity == Arity::Single && !group.options.iter().any(|o| o.default) {
        if let Some(&first) = inputs.first() {
            form::set_checked(dom, first, true);
        }
    }

    let slot = build_slot(dom, &group.id, names);
    dom.append_child(fieldset, slot);
    fieldset
}

/// An empty `<style P-style="G">`. The element is detached.
pub fn build_slot(dom: &mut Dom, group_id: &str, names: &AttributeNames) -> NodeId {
    dom.create_element("style", vec![Attr::new(&names.style, group_id)])
}

/// Insert generated groups at the front of `container`, in input order.
///
/// Each group is prepended, iterating in reverse, so all of them end up
/// ahead of whatever the container already held.
pub fn insert_groups(
    dom: &mut Dom,
    container: NodeId,
    groups: &[OptionGroup],
    names: &AttributeNames,
) -> Vec<NodeId> {
    let mut elements: Vec<NodeId> = groups
        .iter()
        .rev()
        .map(|group| {
            let el = build_group(dom, group, names);
            dom.prepend_child(container, el);
            el
        })
        .collect();
    elements.reverse();
    elements
}

/// Prepend `<style P-base>` to `container` unless one is already there.
pub fn ensure_base_stylesheet(dom: &mut Dom, container: NodeId, names: &AttributeNames) -> NodeId {
    if let Some(existing) = dom.elements_with_attr(container, &names.base).first() {
        return *existing;
    }
    let style = dom.create_element("style", vec![Attr::new(&names.base, "")]);
    let css = dom.create_text(&base_css(names));
    dom.append_child(style, css);
    dom.prepend_child(container, style);
    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::OptionItem;

    fn names() -> AttributeNames {
        AttributeNames::default()
    }

    fn os_group() -> OptionGroup {
        OptionGroup::single("os")
            .titled("OS")
            .option(OptionItem::new("mac").titled("macOS").selected())
            .option(OptionItem::new("windows"))
    }

    #[test]
    fn generated_group_markup() {
        let mut dom = Dom::new();
        let el = build_group(&mut dom, &os_group(), &names());
        assert_eq!(
            html::serialize(&dom, el),
            concat!(
                r#"<fieldset snippet-group="os" class="snippet-group">"#,
                r#"<legend class="snippet-title">OS</legend>"#,
                r#"<label class="snippet-option"><input type="radio" name="snippet-os" id="snippet-os-mac" value="mac" checked="">macOS</label>"#,
                r#"<label class="snippet-option"><input type="radio" name="snippet-os" id="snippet-os-windows" value="windows">windows</label>"#,
                r#"<style snippet-style="os"></style>"#,
                "</fieldset>",
            )
        );
    }

    fn checked_values(dom: &Dom, el: NodeId) -> Vec<String> {
        dom.get_elements_by_tag(el, "input")
            .into_iter()
            .filter(|&i| form::is_checked(dom, i))
            .filter_map(|i| dom.attr(i, "value").map(String::from))
            .collect()
    }

    #[test]
    fn single_group_without_default_checks_first_option() {
        let mut dom = Dom::new();
        let group = OptionGroup::single("py")
            .option(OptionItem::new("2"))
            .option(OptionItem::new("3"));
        let el = build_group(&mut dom, &group, &names());
        assert_eq!(checked_values(&dom, el), vec!["2"]);
    }

    #[test]
    fn single_group_with_several_defaults_keeps_last() {
        let mut dom = Dom::new();
        let root = dom.create_document();
        let group = OptionGroup::single("py")
            .option(OptionItem::new("2").selected())
            .option(OptionItem::new("3").selected());
        let el = build_group(&mut dom, &group, &names());
        dom.append_child(root, el);
        assert_eq!(checked_values(&dom, el), vec!["3"]);
    }

    #[test]
    fn multiple_group_checks_only_defaults() {
        let mut dom = Dom::new();
        let group = OptionGroup::multiple("config")
            .option(OptionItem::new("venv"))
            .option(OptionItem::new("conda").selected());
        let el = build_group(&mut dom, &group, &names());
        assert_eq!(checked_values(&dom, el), vec!["conda"]);
        assert_eq!(
            dom.get_elements_by_tag(el, "input")
                .iter()
                .filter_map(|&i| dom.attr(i, "type"))
                .collect::<Vec<_>>(),
            vec!["checkbox", "checkbox"]
        );
    }

    #[test]
    fn groups_precede_existing_content_in_input_order() {
        let (mut dom, doc) = html::parse_document(r#"<div id="c"><p id="s">snippet</p></div>"#);
        let container = dom.get_element_by_id(doc, "c").unwrap();
        let groups = vec![os_group(), OptionGroup::multiple("config")];
        let inserted = insert_groups(&mut dom, container, &groups, &names());
        let children = dom.children(container);
        assert_eq!(children.len(), 3);
        assert_eq!(&children[..2], inserted.as_slice());
        assert_eq!(dom.attr(children[0], "snippet-group"), Some("os"));
        assert_eq!(dom.attr(children[1], "snippet-group"), Some("config"));
        assert_eq!(dom.attr(children[2], "id"), Some("s"));
    }

    #[test]
    fn base_stylesheet_inserted_once() {
        let (mut dom, doc) = html::parse_document(r#"<div id="c"></div>"#);
        let container = dom.get_element_by_id(doc, "c").unwrap();
        let first = ensure_base_stylesheet(&mut dom, container, &names());
        let second = ensure_base_stylesheet(&mut dom, container, &names());
        assert_eq!(first, second);
        assert_eq!(dom.children(container), vec![first]);
        assert!(dom.text_content(first).contains(".snippet-option"));
    }

    #[test]
    fn base_css_parses_and_hides_nothing() {
        let sheet = css::parse_stylesheet(&base_css(&names()));
        assert_eq!(sheet.rules.len(), 3);
        assert!(sheet
            .rules
            .iter()
            .flat_map(|r| &r.declarations)
            .all(|d| d.name != "display" || d.value != "none"));
    }
}
