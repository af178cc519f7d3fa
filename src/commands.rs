use std::fs;

use anyhow::{anyhow, Context, Result};
use dom::{Dom, NodeId};
use snippet_switch::{
    container::find_container, resolve_groups, validate_groups, PageConfig, Widget,
};

use crate::cli::{OutputFormat, PageArgs, RenderArgs};

struct LoadedPage {
    dom: Dom,
    doc: NodeId,
    page: PageConfig,
}

fn load_page(args: &PageArgs) -> Result<LoadedPage> {
    let markup = fs::read_to_string(&args.markup)
        .with_context(|| format!("read markup {}", args.markup.display()))?;
    let mut page = match &args.groups {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("read page file {}", path.display()))?;
            PageConfig::from_json(&json)
                .with_context(|| format!("parse page file {}", path.display()))?
        }
        None => PageConfig::default(),
    };
    if let Some(prefix) = &args.prefix {
        page.options.attribute_prefix = prefix.clone();
    }
    let (dom, doc) = html::parse_document(&markup);
    Ok(LoadedPage { dom, doc, page })
}

/// Split `GROUP=OPTION`.
fn parse_selection(raw: &str) -> Result<(&str, &str)> {
    raw.split_once('=')
        .filter(|(g, o)| !g.is_empty() && !o.is_empty())
        .ok_or_else(|| anyhow!("selection `{raw}` is not GROUP=OPTION"))
}

pub fn run_render(args: &RenderArgs) -> Result<String> {
    let LoadedPage { mut dom, doc, page } = load_page(&args.page)?;
    let mut widget = Widget::mount_by_id(
        &mut dom,
        doc,
        &args.page.container,
        Some(&page.groups),
        page.options,
    )
    .with_context(|| format!("mount widget on #{}", args.page.container))?;

    for raw in &args.select {
        let (group, option) = parse_selection(raw)?;
        widget
            .select(&mut dom, group, option)
            .with_context(|| format!("select {raw}"))?;
    }

    let out = match args.format {
        OutputFormat::Html => html::serialize(&dom, widget.container()),
        OutputFormat::Rules => {
            let mut lines = Vec::new();
            for group in widget.groups() {
                lines.push(widget.rule_text(&dom, &group.id)?);
            }
            lines.join("\n")
        }
        OutputFormat::Visible => widget
            .visible_snippets(&dom)
            .into_iter()
            .map(|n| html::serialize(&dom, n))
            .collect::<Vec<_>>()
            .join("\n"),
    };
    Ok(out)
}

pub fn run_groups(args: &PageArgs) -> Result<String> {
    let LoadedPage { dom, doc, page } = load_page(args)?;
    let names = page
        .options
        .attribute_names()
        .context("derive attribute names")?;
    let container = find_container(&dom, doc, &args.container)?;
    let (groups, _source) = resolve_groups(&dom, container, Some(&page.groups), &names);
    validate_groups(&groups)?;
    serde_json::to_string_pretty(&groups).context("serialize groups")
}
