//! DOM Event system.
//!
//! Implements the W3C DOM event dispatch path:
//!   1. Build the propagation path from target to root.
//!   2. **Capture phase**: walk root → target.parent, collect capture listeners.
//!   3. **At-target phase**: collect both capture and bubble listeners on target.
//!   4. **Bubble phase**: walk target.parent → root, collect bubble listeners.
//!
//! Listeners do not hold callbacks. Each carries a typed payload (a message
//! for the embedder), and [`dispatch_event`] returns the payloads of every
//! listener reached, in invocation order. The embedder then processes those
//! messages itself, which keeps handlers from re-entering dispatch.

use std::collections::HashMap;

use crate::node::NodeId;
use crate::tree::Dom;

// ---------------------------------------------------------------------------
// Event phase
// ---------------------------------------------------------------------------

/// Which phase of the dispatch algorithm is currently executing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventPhase {
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A DOM event that can be dispatched through the tree.
#[derive(Clone, Debug)]
pub struct Event {
    /// Event type name (e.g. `"change"`, `"click"`).
    pub type_: String,

    /// The node the event was originally dispatched on.
    pub target: Option<NodeId>,

    /// Current dispatch phase.
    pub phase: EventPhase,

    /// Whether this event bubbles up the tree.
    pub bubbles: bool,
}

impl Event {
    pub fn new(type_: &str, bubbles: bool) -> Self {
        Self {
            type_: type_.to_string(),
            target: None,
            phase: EventPhase::None,
            bubbles,
        }
    }

    /// The `change` event a form control fires after user activation.
    pub fn change() -> Self {
        Self::new("change", true)
    }
}

// ---------------------------------------------------------------------------
// Listener
// ---------------------------------------------------------------------------

/// A single event listener attached to a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventListener<P> {
    /// Event type this listener handles.
    pub type_: String,
    /// If `true` this listener fires during the capture phase; otherwise during
    /// the bubble phase.
    pub capture: bool,
    /// Message handed back to the dispatcher's caller.
    pub payload: P,
}

impl<P> EventListener<P> {
    pub fn new(type_: &str, capture: bool, payload: P) -> Self {
        Self {
            type_: type_.to_string(),
            capture,
            payload,
        }
    }
}

// ---------------------------------------------------------------------------
// EventTarget map (lives alongside the Dom)
// ---------------------------------------------------------------------------

/// Stores event listeners for every node that has at least one.
#[derive(Debug)]
pub struct EventTargetMap<P> {
    listeners: HashMap<NodeId, Vec<EventListener<P>>>,
}

impl<P> Default for EventTargetMap<P> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }
}

impl<P: Clone> EventTargetMap<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener on `node`.
    pub fn add_listener(&mut self, node: NodeId, listener: EventListener<P>) {
        self.listeners.entry(node).or_default().push(listener);
    }

    /// Number of listeners registered on `node` for `type_`.
    pub fn listener_count(&self, node: NodeId, type_: &str) -> usize {
        self.listeners
            .get(&node)
            .map(|list| list.iter().filter(|l| l.type_ == type_).count())
            .unwrap_or(0)
    }

    fn matching_listeners(&self, node: NodeId, type_: &str) -> impl Iterator<Item = &EventListener<P>> {
        self.listeners
            .get(&node)
            .into_iter()
            .flatten()
            .filter(move |l| l.type_ == type_)
    }
}

// ---------------------------------------------------------------------------
// Dispatch algorithm
// ---------------------------------------------------------------------------

/// Dispatch `event` at `target` through the DOM tree according to the W3C
/// event model (capture → at-target → bubble).
///
/// Returns the payloads of every listener reached, in invocation order.
pub fn dispatch_event<P: Clone>(
    dom: &Dom,
    targets: &EventTargetMap<P>,
    target: NodeId,
    event: &mut Event,
) -> Vec<P> {
    let mut reached = Vec::new();
    event.target = Some(target);

    // Propagation path: [root, …, parent, target].
    let mut path: Vec<NodeId> = dom.ancestors(target);
    path.reverse();
    path.push(target);
    let target_index = path.len() - 1;

    event.phase = EventPhase::Capturing;
    for &node in &path[..target_index] {
        collect(targets, node, event, Some(true), &mut reached);
    }

    event.phase = EventPhase::AtTarget;
    collect(targets, target, event, None, &mut reached);

    if event.bubbles {
        event.phase = EventPhase::Bubbling;
        for &node in path[..target_index].iter().rev() {
            collect(targets, node, event, Some(false), &mut reached);
        }
    }

    event.phase = EventPhase::None;
    reached
}

/// Collect listeners on `node` matching the event type; `capture` filters by
/// phase, `None` takes both (at-target).
fn collect<P: Clone>(
    targets: &EventTargetMap<P>,
    node: NodeId,
    event: &Event,
    capture: Option<bool>,
    out: &mut Vec<P>,
) {
    for listener in targets.matching_listeners(node, &event.type_) {
        if capture.is_none_or(|c| c == listener.capture) {
            out.push(listener.payload.clone());
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
