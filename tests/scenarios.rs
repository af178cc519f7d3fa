//! End-to-end behaviour of a mounted widget, checked through the style
//! engine the way a browser would decide what is on screen.

use dom::{Dom, NodeId};
use proptest::prelude::*;
use snippet_switch::{Arity, OptionGroup, OptionItem, Widget, WidgetConfig, WidgetError};

// ─────────────────────────────────────────────────────────────────────────────
// Fixtures
// ─────────────────────────────────────────────────────────────────────────────

fn install_groups() -> Vec<OptionGroup> {
    vec![
        OptionGroup::single("os")
            .titled("Operating system")
            .option(OptionItem::new("mac").selected())
            .option(OptionItem::new("windows"))
            .option(OptionItem::new("linux")),
        OptionGroup::single("python")
            .option(OptionItem::new("2"))
            .option(OptionItem::new("3").selected()),
        OptionGroup::multiple("config").option(OptionItem::new("venv")),
    ]
}

const INSTALL_PAGE: &str = r#"<main>
  <div id="install">
    <pre id="s1" snippet-os="mac" snippet-python="3">brew install python3</pre>
    <pre id="s2" snippet-os="windows">choco install python</pre>
    <pre id="venv" snippet-config="venv">python -m venv .venv</pre>
    <pre id="venv-mac" snippet-config="venv" snippet-os="mac">source .venv/bin/activate</pre>
    <p id="plain">Pick your platform above.</p>
  </div>
</main>"#;

fn mount(src: &str, groups: Option<&[OptionGroup]>) -> (Dom, NodeId, Widget) {
    let (mut dom, doc) = html::parse_document(src);
    let widget = Widget::mount_by_id(&mut dom, doc, "install", groups, WidgetConfig::default())
        .expect("widget mounts");
    (dom, doc, widget)
}

fn shown(dom: &Dom, doc: NodeId, widget: &Widget, id: &str) -> bool {
    let node = dom.get_element_by_id(doc, id).expect("snippet exists");
    widget.is_visible(dom, node)
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenarios
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn os_and_python_scenario() {
    let groups = install_groups();
    let (mut dom, doc, mut widget) = mount(INSTALL_PAGE, Some(&groups));
    assert!(shown(&dom, doc, &widget, "s1"));
    assert!(!shown(&dom, doc, &widget, "s2"));

    widget.select(&mut dom, "os", "windows").unwrap();
    assert!(!shown(&dom, doc, &widget, "s1"));
    assert!(shown(&dom, doc, &widget, "s2"));

    widget.select(&mut dom, "python", "2").unwrap();
    assert!(!shown(&dom, doc, &widget, "s1"));

    // The os condition holds again; python=2 still excludes S1.
    widget.select(&mut dom, "os", "mac").unwrap();
    assert!(!shown(&dom, doc, &widget, "s1"));
    assert!(!shown(&dom, doc, &widget, "s2"));

    widget.select(&mut dom, "python", "3").unwrap();
    assert!(shown(&dom, doc, &widget, "s1"));
    assert!(shown(&dom, doc, &widget, "plain"));
}

#[test]
fn multiple_group_with_nothing_checked_hides_its_snippets() {
    let groups = install_groups();
    let (mut dom, doc, mut widget) = mount(INSTALL_PAGE, Some(&groups));
    assert!(widget.selection(&dom, "config").unwrap().is_empty());
    assert_eq!(
        widget.rule_text(&dom, "config").unwrap(),
        "[snippet-results] [snippet-config] { display: none; }"
    );
    assert!(!shown(&dom, doc, &widget, "venv"));
    assert!(!shown(&dom, doc, &widget, "venv-mac"));

    widget.select(&mut dom, "config", "venv").unwrap();
    assert!(shown(&dom, doc, &widget, "venv"));
    assert!(shown(&dom, doc, &widget, "venv-mac"));

    widget.select(&mut dom, "os", "linux").unwrap();
    assert!(shown(&dom, doc, &widget, "venv"));
    assert!(!shown(&dom, doc, &widget, "venv-mac"));

    widget.deselect(&mut dom, "config", "venv").unwrap();
    assert!(!shown(&dom, doc, &widget, "venv"));
}

#[test]
fn one_change_recomputes_only_its_group() {
    let groups = install_groups();
    let (mut dom, _doc, mut widget) = mount(INSTALL_PAGE, Some(&groups));
    assert_eq!(widget.recompute_count(), 3);
    let python_rule = widget.rule_text(&dom, "python").unwrap();
    let config_rule = widget.rule_text(&dom, "config").unwrap();

    assert_eq!(widget.select(&mut dom, "os", "linux").unwrap(), vec!["os"]);
    assert_eq!(widget.recompute_count(), 4);
    assert_eq!(widget.rule_text(&dom, "python").unwrap(), python_rule);
    assert_eq!(widget.rule_text(&dom, "config").unwrap(), config_rule);

    assert_eq!(widget.toggle(&mut dom, "config", "venv").unwrap(), vec!["config"]);
    assert_eq!(widget.recompute_count(), 5);
}

#[test]
fn recompute_is_idempotent() {
    let groups = install_groups();
    let (mut dom, _doc, mut widget) = mount(INSTALL_PAGE, Some(&groups));
    for group in ["os", "python", "config"] {
        let before = widget.rule_text(&dom, group).unwrap();
        let outcome = widget.recompute(&mut dom, group).unwrap();
        assert!(!outcome.changed);
        assert_eq!(outcome.rule, before);
        assert_eq!(widget.rule_text(&dom, group).unwrap(), before);
    }
}

#[test]
fn snippets_are_moved_not_copied() {
    let groups = install_groups();
    let (dom, doc, widget) = mount(INSTALL_PAGE, Some(&groups));
    let results = widget.results().unwrap();
    for id in ["s1", "s2", "venv", "venv-mac", "plain"] {
        let node = dom.get_element_by_id(doc, id).unwrap();
        assert_eq!(dom.parent(node), Some(results), "{id}");
    }
    assert_eq!(widget.snippets(&dom).len(), 4);
    assert_eq!(dom.get_elements_by_tag(doc, "pre").len(), 4);
}

#[test]
fn reentrant_posts_are_reported() {
    let mut dispatcher = snippet_switch::Dispatcher::new();
    dispatcher.post(snippet_switch::SelectionChanged::new("os")).unwrap();
    let result = dispatcher.drain(|d, _| d.post(snippet_switch::SelectionChanged::new("python")));
    assert!(matches!(result, Err(WidgetError::ReentrantDispatch { group }) if group == "python"));
}

#[test]
fn generated_markup_round_trips_through_scanned_mode() {
    let groups = install_groups();
    let (mut dom, doc, mut generated) = mount(INSTALL_PAGE, Some(&groups));
    let container = generated.container();
    let saved = html::serialize(&dom, container);

    let (mut dom2, doc2) = html::parse_document(&saved);
    let mut scanned =
        Widget::mount_by_id(&mut dom2, doc2, "install", None, WidgetConfig::default()).unwrap();
    let summary: Vec<_> = scanned
        .groups()
        .iter()
        .map(|g| (g.id.as_str(), g.title.as_str(), g.arity))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("os", "Operating system", Arity::Single),
            ("python", "python", Arity::Single),
            ("config", "config", Arity::Multiple),
        ]
    );
    assert_eq!(html::serialize(&dom2, scanned.container()), saved);

    let steps = [
        ("os", "windows"),
        ("python", "2"),
        ("config", "venv"),
        ("os", "mac"),
        ("python", "3"),
    ];
    let ids = ["s1", "s2", "venv", "venv-mac", "plain"];
    for (group, option) in steps {
        let a = generated.toggle(&mut dom, group, option).unwrap();
        let b = scanned.toggle(&mut dom2, group, option).unwrap();
        assert_eq!(a, b);
        for id in ids {
            assert_eq!(
                shown(&dom, doc, &generated, id),
                shown(&dom2, doc2, &scanned, id),
                "{id} after {group}={option}"
            );
        }
        assert_eq!(
            generated.rule_text(&dom, group).unwrap(),
            scanned.rule_text(&dom2, group).unwrap()
        );
    }
}

#[test]
fn bring_your_own_markup() {
    let page = r#"<div id="install">
      <form snippet-group="shell"><legend>Shell</legend>
        <label><input type="radio" name="sh" value="bash">bash</label>
        <label><input type="radio" name="sh" value="fish" checked>fish</label>
      </form>
      <div snippet-results>
        <code id="bash" snippet-shell="bash">export X=1</code>
        <code id="fish" snippet-shell="fish">set -x X 1</code>
      </div>
    </div>"#;
    let (mut dom, doc, mut widget) = mount(page, None);
    assert!(widget.groups()[0].options.is_empty());
    assert!(shown(&dom, doc, &widget, "fish"));
    assert!(!shown(&dom, doc, &widget, "bash"));

    let bash = widget.option_input(&dom, "shell", "bash").unwrap();
    assert_eq!(widget.activate(&mut dom, bash).unwrap(), vec!["shell"]);
    assert!(shown(&dom, doc, &widget, "bash"));
    assert!(!shown(&dom, doc, &widget, "fish"));
}

#[test]
fn page_config_drives_prefix_and_groups() {
    let json = r#"{
        "options": { "attributePrefix": "tab" },
        "groups": [ { "id": "lang", "options": [ { "id": "rust" }, { "id": "go" } ] } ]
    }"#;
    let page = snippet_switch::PageConfig::from_json(json).unwrap();
    let (mut dom, doc) = html::parse_document(
        r#"<div id="install"><p id="r" tab-lang="rust">cargo</p><p id="g" tab-lang="go">go</p></div>"#,
    );
    let mut widget =
        Widget::mount_by_id(&mut dom, doc, "install", Some(&page.groups), page.options).unwrap();
    assert!(shown(&dom, doc, &widget, "r"));
    assert!(!shown(&dom, doc, &widget, "g"));
    widget.select(&mut dom, "lang", "go").unwrap();
    assert!(!shown(&dom, doc, &widget, "r"));
    assert!(shown(&dom, doc, &widget, "g"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────────────

const OS: &[&str] = &["mac", "windows", "linux"];
const PYTHON: &[&str] = &["2", "3"];
const CONFIG: &[&str] = &["venv", "conda"];
const EXTRA: &[&str] = &["a", "b"];

fn property_groups() -> Vec<OptionGroup> {
    let build = |group: OptionGroup, values: &[&str]| {
        values
            .iter()
            .fold(group, |g, v| g.option(OptionItem::new(*v)))
    };
    vec![
        build(OptionGroup::single("os"), OS),
        build(OptionGroup::single("python"), PYTHON),
        build(OptionGroup::multiple("config"), CONFIG),
        build(OptionGroup::multiple("extra"), EXTRA),
    ]
}

/// Every combination of os / python / config conditions, each optional.
fn property_page() -> (String, Vec<(String, Vec<(&'static str, &'static str)>)>) {
    let mut body = String::new();
    let mut snippets = Vec::new();
    let pick = |values: &'static [&'static str]| {
        std::iter::once(None).chain(values.iter().copied().map(Some)).collect::<Vec<_>>()
    };
    for os in pick(OS) {
        for py in pick(PYTHON) {
            for cfg in pick(CONFIG) {
                let conditions: Vec<(&str, &str)> = [("os", os), ("python", py), ("config", cfg)]
                    .into_iter()
                    .filter_map(|(g, v)| v.map(|v| (g, v)))
                    .collect();
                let id = format!("n{}", snippets.len());
                body.push_str(&format!("<p id=\"{id}\""));
                for (g, v) in &conditions {
                    body.push_str(&format!(" snippet-{g}=\"{v}\""));
                }
                body.push_str(">x</p>");
                snippets.push((id, conditions));
            }
        }
    }
    (format!("<div id=\"install\">{body}</div>"), snippets)
}

fn group_values(index: usize) -> (&'static str, &'static [&'static str]) {
    match index % 4 {
        0 => ("os", OS),
        1 => ("python", PYTHON),
        2 => ("config", CONFIG),
        _ => ("extra", EXTRA),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn visibility_is_the_conjunction_of_conditions(
        clicks in proptest::collection::vec((0usize..4, 0usize..3), 0..12),
    ) {
        let groups = property_groups();
        let (src, snippets) = property_page();
        let (mut dom, doc) = html::parse_document(&src);
        let mut widget =
            Widget::mount_by_id(&mut dom, doc, "install", Some(&groups), WidgetConfig::default())
                .unwrap();

        for (g, o) in clicks {
            let (group, values) = group_values(g);
            let before = widget.recompute_count();
            let touched = widget.toggle(&mut dom, group, values[o % values.len()]).unwrap();
            prop_assert!(touched.is_empty() || touched == vec![group.to_string()]);
            prop_assert_eq!(widget.recompute_count(), before + touched.len());
            for single in ["os", "python"] {
                prop_assert_eq!(widget.selection(&dom, single).unwrap().len(), 1);
            }
        }

        for (id, conditions) in &snippets {
            let expected = conditions.iter().all(|(g, v)| {
                widget.selection(&dom, g).unwrap().iter().any(|s| s == v)
            });
            prop_assert_eq!(shown(&dom, doc, &widget, id), expected, "snippet {}", id);
        }
    }

    #[test]
    fn rule_depends_only_on_final_selection(
        clicks in proptest::collection::vec(0usize..2, 0..8),
    ) {
        let groups = property_groups();
        let (src, _) = property_page();
        let (mut dom, doc) = html::parse_document(&src);
        let mut widget =
            Widget::mount_by_id(&mut dom, doc, "install", Some(&groups), WidgetConfig::default())
                .unwrap();
        for o in clicks {
            widget.toggle(&mut dom, "config", CONFIG[o]).unwrap();
        }
        let selection = widget.selection(&dom, "config").unwrap();
        let expected = snippet_switch::rule_text(widget.names(), "config", &selection);
        prop_assert_eq!(widget.rule_text(&dom, "config").unwrap(), expected);
    }
}
