//! The widget facade: mount, initialize, react to activation, query.

use dom::{dispatch_event, form, Dom, Event, EventTargetMap, InputKind, NodeId};
use style::StyleSet;
use tracing::{info, warn};

use crate::config::{AttributeNames, WidgetConfig};
use crate::container::{ensure_results, find_container};
use crate::dispatch::{Dispatcher, SelectionChanged};
use crate::error::{Result, WidgetError};
use crate::group::{find_group_element, resolve_groups, validate_groups, Arity, GroupSource, OptionGroup};
use crate::markup::{ensure_base_stylesheet, insert_groups};
use crate::resolver::{self, ensure_slot, find_slot, init_group, read_selection, Recomputed};

/// A mounted snippet switch.
///
/// The widget does not own the document; every operation borrows the
/// [`Dom`] it was mounted into.
#[derive(Debug)]
pub struct Widget {
    config: WidgetConfig,
    names: AttributeNames,
    container: NodeId,
    results: Option<NodeId>,
    groups: Vec<OptionGroup>,
    source: GroupSource,
    listeners: EventTargetMap<SelectionChanged>,
    dispatcher: Dispatcher,
    initialized: bool,
    recompute_count: usize,
}

impl Widget {
    // ─────────────────────────────────────────────────────────────────────
    // Construction
    // ─────────────────────────────────────────────────────────────────────

    /// Mount on `container`.
    ///
    /// With a non-empty `explicit` list the group markup is generated and
    /// inserted ahead of the snippets. Otherwise groups are scanned from
    /// `P-group` markers already inside the container and only missing
    /// style slots are added. Unless `skip_auto_init` is set, every group
    /// is initialized before this returns.
    pub fn mount(
        dom: &mut Dom,
        container: NodeId,
        explicit: Option<&[OptionGroup]>,
        config: WidgetConfig,
    ) -> Result<Self> {
        let names = config.attribute_names()?;
        if dom.element(container).is_none() {
            return Err(WidgetError::ContainerNotFound {
                container: format!("{container:?}"),
            });
        }

        let (groups, source) = resolve_groups(dom, container, explicit, &names);
        validate_groups(&groups)?;

        let mut widget = Self {
            config,
            names,
            container,
            results: None,
            groups,
            source,
            listeners: EventTargetMap::new(),
            dispatcher: Dispatcher::new(),
            initialized: false,
            recompute_count: 0,
        };

        if widget.groups.is_empty() {
            if !widget.config.degrade_silently {
                return Err(WidgetError::invalid(
                    "no option groups were supplied or found in the container",
                ));
            }
            warn!("no option groups; mounting an empty widget");
            return Ok(widget);
        }

        let results = ensure_results(dom, container, &widget.names);
        widget.results = Some(results);
        match source {
            GroupSource::Explicit => {
                insert_groups(dom, container, &widget.groups, &widget.names);
                ensure_base_stylesheet(dom, container, &widget.names);
            }
            GroupSource::Scanned => {
                for group in &widget.groups {
                    let el = find_group_element(dom, container, &widget.names, &group.id)
                        .ok_or_else(|| WidgetError::unknown_group(&group.id))?;
                    ensure_slot(dom, container, el, &widget.names, &group.id);
                }
            }
        }
        info!(groups = widget.groups.len(), source = %source, "mounted snippet switch");

        if !widget.config.skip_auto_init {
            widget.init(dom)?;
        }
        Ok(widget)
    }

    /// Mount on the element with `id` under `root`.
    pub fn mount_by_id(
        dom: &mut Dom,
        root: NodeId,
        id: &str,
        explicit: Option<&[OptionGroup]>,
        config: WidgetConfig,
    ) -> Result<Self> {
        let container = find_container(dom, root, id)?;
        Self::mount(dom, container, explicit, config)
    }

    /// Subscribe every group and write its first rule.
    ///
    /// A single-arity group with nothing checked gets its first input
    /// checked. Calling this again recomputes without adding listeners.
    pub fn init(&mut self, dom: &mut Dom) -> Result<Vec<Recomputed>> {
        let mut out = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            if group.arity == Arity::Single {
                self.check_first_if_empty(dom, &group.id)?;
            }
            out.push(init_group(
                dom,
                &mut self.listeners,
                self.container,
                &self.names,
                &group.id,
            )?);
            self.recompute_count += 1;
        }
        self.initialized = true;
        Ok(out)
    }

    fn check_first_if_empty(&self, dom: &mut Dom, group_id: &str) -> Result<()> {
        let el = self.group_element(dom, group_id)?;
        if !read_selection(dom, el).is_empty() {
            return Ok(());
        }
        let first = dom
            .descendants(el)
            .into_iter()
            .find(|&n| form::input_kind(dom, n).is_some() && !form::is_disabled(dom, n));
        if let Some(first) = first {
            form::set_checked(dom, first, true);
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Interaction
    // ─────────────────────────────────────────────────────────────────────

    /// Click an input: apply form semantics, fire `change` if the input's
    /// own checkedness changed, and recompute each group the event reached.
    ///
    /// Returns the groups recomputed. Before [`init`](Self::init) nothing
    /// listens, so only the form state changes.
    pub fn activate(&mut self, dom: &mut Dom, input: NodeId) -> Result<Vec<String>> {
        let changed = form::activate(dom, input);
        if !changed.contains(&input) {
            return Ok(Vec::new());
        }

        let mut event = Event::change();
        for message in dispatch_event(dom, &self.listeners, input, &mut event) {
            self.dispatcher.post(message)?;
        }

        let container = self.container;
        let names = &self.names;
        let count = &mut self.recompute_count;
        self.dispatcher.drain(|_, message| {
            resolver::recompute(dom, container, names, &message.group)?;
            *count += 1;
            Ok(())
        })
    }

    /// Make `option_id` selected in `group_id`. A no-op when it already is.
    pub fn select(&mut self, dom: &mut Dom, group_id: &str, option_id: &str) -> Result<Vec<String>> {
        let input = self.option_input(dom, group_id, option_id)?;
        if form::is_checked(dom, input) {
            return Ok(Vec::new());
        }
        self.activate(dom, input)
    }

    /// Clear `option_id` in a multiple-arity group. Single-arity groups
    /// always keep one selection, so there this does nothing.
    pub fn deselect(&mut self, dom: &mut Dom, group_id: &str, option_id: &str) -> Result<Vec<String>> {
        let input = self.option_input(dom, group_id, option_id)?;
        if form::input_kind(dom, input) != Some(InputKind::Checkbox) || !form::is_checked(dom, input) {
            return Ok(Vec::new());
        }
        self.activate(dom, input)
    }

    /// Click the option's input, whatever its state.
    pub fn toggle(&mut self, dom: &mut Dom, group_id: &str, option_id: &str) -> Result<Vec<String>> {
        let input = self.option_input(dom, group_id, option_id)?;
        self.activate(dom, input)
    }

    /// Recompute one group by hand.
    pub fn recompute(&mut self, dom: &mut Dom, group_id: &str) -> Result<Recomputed> {
        self.group(group_id)?;
        let outcome = resolver::recompute(dom, self.container, &self.names, group_id)?;
        self.recompute_count += 1;
        Ok(outcome)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    pub fn group(&self, group_id: &str) -> Result<&OptionGroup> {
        self.groups
            .iter()
            .find(|g| g.id == group_id)
            .ok_or_else(|| WidgetError::unknown_group(group_id))
    }

    pub fn group_element(&self, dom: &Dom, group_id: &str) -> Result<NodeId> {
        self.group(group_id)?;
        find_group_element(dom, self.container, &self.names, group_id)
            .ok_or_else(|| WidgetError::unknown_group(group_id))
    }

    /// The input whose value is `option_id` inside the group element.
    pub fn option_input(&self, dom: &Dom, group_id: &str, option_id: &str) -> Result<NodeId> {
        let unknown = || WidgetError::UnknownOption {
            group: group_id.to_string(),
            option: option_id.to_string(),
        };
        let group = self.group(group_id)?;
        // Scanned groups have no option list; only the markup can answer.
        if !group.options.is_empty() && group.find_option(option_id).is_none() {
            return Err(unknown());
        }
        let el = self.group_element(dom, group_id)?;
        dom.descendants(el)
            .into_iter()
            .find(|&n| {
                form::input_kind(dom, n).is_some()
                    && dom.attr(n, "value").unwrap_or("on") == option_id
            })
            .ok_or_else(unknown)
    }

    /// Checked values of a group, in document order.
    pub fn selection(&self, dom: &Dom, group_id: &str) -> Result<Vec<String>> {
        Ok(read_selection(dom, self.group_element(dom, group_id)?))
    }

    /// Current text of a group's style slot.
    pub fn rule_text(&self, dom: &Dom, group_id: &str) -> Result<String> {
        self.group(group_id)?;
        find_slot(dom, self.container, &self.names, group_id)
            .map(|slot| dom.text_content(slot))
            .ok_or_else(|| WidgetError::GroupSlotMissing {
                group: group_id.to_string(),
            })
    }

    /// Elements under the results container carrying at least one
    /// condition attribute, in document order.
    pub fn snippets(&self, dom: &Dom) -> Vec<NodeId> {
        let Some(results) = self.results else {
            return Vec::new();
        };
        dom.descendants(results)
            .into_iter()
            .filter(|&n| {
                dom.element(n).is_some_and(|e| {
                    e.attrs
                        .iter()
                        .any(|a| self.names.condition_group(&a.name).is_some())
                })
            })
            .collect()
    }

    /// Whether the style engine would render `node`.
    pub fn is_visible(&self, dom: &Dom, node: NodeId) -> bool {
        StyleSet::collect(dom, dom.root_of(self.container)).is_rendered(dom, node)
    }

    pub fn visible_snippets(&self, dom: &Dom) -> Vec<NodeId> {
        let styles = StyleSet::collect(dom, dom.root_of(self.container));
        self.snippets(dom)
            .into_iter()
            .filter(|&n| styles.is_rendered(dom, n))
            .collect()
    }

    pub fn groups(&self) -> &[OptionGroup] {
        &self.groups
    }

    pub fn source(&self) -> GroupSource {
        self.source
    }

    pub fn names(&self) -> &AttributeNames {
        &self.names
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    /// `None` only for an empty widget mounted with `degrade_silently`.
    pub fn results(&self) -> Option<NodeId> {
        self.results
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Recomputes run since mount, including the initial ones.
    pub fn recompute_count(&self) -> usize {
        self.recompute_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::OptionItem;

    const PAGE: &str = r#"<div id="c">
        <p id="mac" snippet-os="mac">brew install</p>
        <p id="win" snippet-os="windows">choco install</p>
        <p id="any">always</p>
      </div>"#;

    fn os_group() -> OptionGroup {
        OptionGroup::single("os")
            .option(OptionItem::new("mac").selected())
            .option(OptionItem::new("windows"))
    }

    fn mount(src: &str, groups: Option<&[OptionGroup]>, config: WidgetConfig) -> (Dom, NodeId, Result<Widget>) {
        let (mut dom, doc) = html::parse_document(src);
        let widget = Widget::mount_by_id(&mut dom, doc, "c", groups, config);
        (dom, doc, widget)
    }

    fn visible(dom: &Dom, doc: NodeId, widget: &Widget, id: &str) -> bool {
        widget.is_visible(dom, dom.get_element_by_id(doc, id).unwrap())
    }

    #[test]
    fn mount_generates_chrome_in_order() {
        let groups = [os_group()];
        let (dom, _doc, widget) = mount(PAGE, Some(&groups), WidgetConfig::default());
        let widget = widget.unwrap();
        let children = dom.children(widget.container());
        let kinds: Vec<_> = children
            .iter()
            .filter(|&&n| dom.element(n).is_some())
            .map(|&n| {
                let names = widget.names();
                if dom.has_attr(n, &names.base) {
                    "base"
                } else if dom.has_attr(n, &names.group) {
                    "group"
                } else if dom.has_attr(n, &names.results) {
                    "results"
                } else {
                    "other"
                }
            })
            .collect();
        assert_eq!(kinds, vec!["base", "group", "results"]);
        assert_eq!(widget.source(), GroupSource::Explicit);
        assert!(widget.is_initialized());
        assert_eq!(widget.recompute_count(), 1);
    }

    #[test]
    fn visibility_follows_selection() {
        let groups = [os_group()];
        let (mut dom, doc, widget) = mount(PAGE, Some(&groups), WidgetConfig::default());
        let mut widget = widget.unwrap();
        assert!(visible(&dom, doc, &widget, "mac"));
        assert!(!visible(&dom, doc, &widget, "win"));
        assert!(visible(&dom, doc, &widget, "any"));

        assert_eq!(widget.select(&mut dom, "os", "windows").unwrap(), vec!["os"]);
        assert!(!visible(&dom, doc, &widget, "mac"));
        assert!(visible(&dom, doc, &widget, "win"));
        assert_eq!(widget.selection(&dom, "os").unwrap(), vec!["windows"]);
    }

    #[test]
    fn reselecting_current_option_does_nothing() {
        let groups = [os_group()];
        let (mut dom, _doc, widget) = mount(PAGE, Some(&groups), WidgetConfig::default());
        let mut widget = widget.unwrap();
        assert!(widget.select(&mut dom, "os", "mac").unwrap().is_empty());
        assert!(widget.toggle(&mut dom, "os", "mac").unwrap().is_empty());
        assert!(widget.deselect(&mut dom, "os", "mac").unwrap().is_empty());
        assert_eq!(widget.recompute_count(), 1);
    }

    #[test]
    fn unknown_names_are_errors() {
        let groups = [os_group()];
        let (mut dom, _doc, widget) = mount(PAGE, Some(&groups), WidgetConfig::default());
        let mut widget = widget.unwrap();
        assert!(matches!(
            widget.select(&mut dom, "lang", "rust"),
            Err(WidgetError::UnknownGroup { .. })
        ));
        assert!(matches!(
            widget.select(&mut dom, "os", "beos"),
            Err(WidgetError::UnknownOption { .. })
        ));
        assert!(matches!(widget.rule_text(&dom, "lang"), Err(WidgetError::UnknownGroup { .. })));
    }

    #[test]
    fn skip_auto_init_defers_rules_and_listeners() {
        let groups = [os_group()];
        let config = WidgetConfig::new().with_skip_auto_init(true);
        let (mut dom, doc, widget) = mount(PAGE, Some(&groups), config);
        let mut widget = widget.unwrap();
        assert!(!widget.is_initialized());
        assert_eq!(widget.rule_text(&dom, "os").unwrap(), "");
        assert!(visible(&dom, doc, &widget, "win"));

        assert!(widget.select(&mut dom, "os", "windows").unwrap().is_empty());
        assert_eq!(widget.recompute_count(), 0);

        widget.init(&mut dom).unwrap();
        assert!(!visible(&dom, doc, &widget, "mac"));
        assert!(visible(&dom, doc, &widget, "win"));
    }

    #[test]
    fn init_twice_does_not_double_subscribe() {
        let groups = [os_group()];
        let (mut dom, _doc, widget) = mount(PAGE, Some(&groups), WidgetConfig::default());
        let mut widget = widget.unwrap();
        widget.init(&mut dom).unwrap();
        assert_eq!(widget.recompute_count(), 2);
        assert_eq!(widget.select(&mut dom, "os", "windows").unwrap(), vec!["os"]);
        assert_eq!(widget.recompute_count(), 3);
    }

    #[test]
    fn no_groups_is_invalid_unless_degrading() {
        let (_dom, _doc, widget) = mount(PAGE, None, WidgetConfig::default());
        assert!(matches!(widget, Err(WidgetError::ConfigurationInvalid { .. })));

        let config = WidgetConfig::new().with_degrade_silently(true);
        let (dom, _doc, widget) = mount(PAGE, None, config);
        let widget = widget.unwrap();
        assert!(widget.groups().is_empty());
        assert_eq!(widget.results(), None);
        assert!(widget.snippets(&dom).is_empty());
    }

    #[test]
    fn missing_container() {
        let (_dom, _doc, widget) = mount("<p></p>", None, WidgetConfig::default());
        assert!(matches!(widget, Err(WidgetError::ContainerNotFound { .. })));
    }

    #[test]
    fn invalid_group_ids_rejected_at_mount() {
        let groups = [OptionGroup::single("base").option(OptionItem::new("x"))];
        let (_dom, _doc, widget) = mount(PAGE, Some(&groups), WidgetConfig::default());
        assert!(matches!(widget, Err(WidgetError::ConfigurationInvalid { .. })));
    }

    #[test]
    fn scanned_single_group_gets_a_selection() {
        let src = r#"<div id="c">
            <div snippet-group="os">
              <input type="radio" name="snippet-os" value="mac">
              <input type="radio" name="snippet-os" value="linux">
            </div>
            <p id="mac" snippet-os="mac">a</p><p id="linux" snippet-os="linux">b</p>
          </div>"#;
        let (dom, doc, widget) = mount(src, None, WidgetConfig::default());
        let widget = widget.unwrap();
        assert_eq!(widget.source(), GroupSource::Scanned);
        assert_eq!(widget.selection(&dom, "os").unwrap(), vec!["mac"]);
        assert!(visible(&dom, doc, &widget, "mac"));
        assert!(!visible(&dom, doc, &widget, "linux"));
        assert_eq!(widget.snippets(&dom).len(), 2);
        assert_eq!(widget.visible_snippets(&dom).len(), 1);
    }

    #[test]
    fn removed_slot_surfaces_on_change() {
        let groups = [os_group()];
        let (mut dom, _doc, widget) = mount(PAGE, Some(&groups), WidgetConfig::default());
        let mut widget = widget.unwrap();
        let container = widget.container();
        let slot = find_slot(&dom, container, widget.names(), "os").unwrap();
        let parent = dom.parent(slot).unwrap();
        dom.remove_child(parent, slot);
        assert!(matches!(
            widget.select(&mut dom, "os", "windows"),
            Err(WidgetError::GroupSlotMissing { .. })
        ));
    }
}
