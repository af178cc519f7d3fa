//! Cascade resolution: collect matching rules, sort, and pick the winning
//! declaration for a property.
//!
//! Implements the CSS cascade: importance → origin → specificity → source order.

use css::{compute_specificity, Declaration, Specificity, Stylesheet};
use dom::{Dom, NodeId};

use crate::matching::matches_selector;

// ─────────────────────────────────────────────────────────────────────────────
// Origin
// ─────────────────────────────────────────────────────────────────────────────

/// The origin of a CSS rule (determines cascade priority).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StyleOrigin {
    UserAgent,
    Author,
}

// ─────────────────────────────────────────────────────────────────────────────
// MatchedRule
// ─────────────────────────────────────────────────────────────────────────────

/// A rule that matched a particular element, annotated with cascade metadata.
#[derive(Debug, Clone)]
pub struct MatchedRule<'a> {
    pub specificity: Specificity,
    pub origin: StyleOrigin,
    pub source_order: usize,
    pub declarations: &'a [Declaration],
}

/// Collect every rule whose selector list matches `node_id`.
///
/// A rule's specificity is that of its most specific matching selector.
/// `source_order` counts rules across all sheets in the order given.
pub fn collect_matching_rules<'a>(
    dom: &Dom,
    node_id: NodeId,
    stylesheets: &'a [(Stylesheet, StyleOrigin)],
) -> Vec<MatchedRule<'a>> {
    let mut matched = Vec::new();
    let mut source_order = 0usize;

    for (stylesheet, origin) in stylesheets {
        for rule in &stylesheet.rules {
            let best_spec = rule
                .selectors
                .iter()
                .filter(|sel| matches_selector(dom, node_id, sel))
                .map(compute_specificity)
                .max();
            if let Some(specificity) = best_spec {
                matched.push(MatchedRule {
                    specificity,
                    origin: *origin,
                    source_order,
                    declarations: &rule.declarations,
                });
            }
            source_order += 1;
        }
    }

    matched
}

/// Rank used to order the cascade, lowest priority first:
///   1. User-agent normal
///   2. Author normal
///   3. Author !important
///   4. User-agent !important
fn cascade_rank(origin: StyleOrigin, important: bool) -> u8 {
    match (important, origin) {
        (false, StyleOrigin::UserAgent) => 0,
        (false, StyleOrigin::Author) => 1,
        (true, StyleOrigin::Author) => 2,
        (true, StyleOrigin::UserAgent) => 3,
    }
}

/// The declaration that wins the cascade for `property` among `matched`.
///
/// Within a rank, higher specificity wins, then later source order, then
/// the later declaration inside the same rule.
pub fn cascaded_declaration<'a>(
    matched: &[MatchedRule<'a>],
    property: &str,
) -> Option<&'a Declaration> {
    matched
        .iter()
        .flat_map(|rule| {
            rule.declarations
                .iter()
                .enumerate()
                .filter(|(_, d)| d.name == property)
                .map(move |(i, d)| {
                    let key = (
                        cascade_rank(rule.origin, d.important),
                        rule.specificity,
                        rule.source_order,
                        i,
                    );
                    (key, d)
                })
        })
        .max_by_key(|(key, _)| *key)
        .map(|(_, d)| d)
}
