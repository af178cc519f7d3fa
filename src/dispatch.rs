//! Single-threaded message queue between event dispatch and recompute.
//!
//! A `change` event reaching a group element yields that group's
//! [`SelectionChanged`] payload. Payloads are posted here and drained one
//! at a time; the handler gets the dispatcher back but may not post while
//! a drain is in progress.

use std::collections::VecDeque;

use tracing::trace;

use crate::error::{Result, WidgetError};

/// "The selection of this group changed."
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectionChanged {
    pub group: String,
}

impl SelectionChanged {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Dispatcher {
    queue: VecDeque<SelectionChanged>,
    draining: bool,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, message: SelectionChanged) -> Result<()> {
        if self.draining {
            return Err(WidgetError::ReentrantDispatch {
                group: message.group,
            });
        }
        self.queue.push_back(message);
        Ok(())
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_draining(&self) -> bool {
        self.draining
    }

    /// Hand every queued message to `handle`, oldest first.
    ///
    /// Returns the groups handled, in order. On the first error the rest of
    /// the queue is discarded and the error returned.
    pub fn drain<F>(&mut self, mut handle: F) -> Result<Vec<String>>
    where
        F: FnMut(&mut Self, &SelectionChanged) -> Result<()>,
    {
        self.draining = true;
        let mut handled = Vec::new();
        while let Some(message) = self.queue.pop_front() {
            trace!(group = %message.group, "dispatching selection change");
            if let Err(err) = handle(self, &message) {
                self.queue.clear();
                self.draining = false;
                return Err(err);
            }
            handled.push(message.group);
        }
        self.draining = false;
        Ok(handled)
    }
}
