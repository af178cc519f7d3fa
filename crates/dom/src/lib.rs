//! DOM crate: Document Object Model
//!
//! Arena-based document tree with form-control state and event dispatch.
//! Uses handles from the `arena` crate instead of Rc/RefCell.

pub mod node;
pub mod tree;
pub mod form;
pub mod event;

pub use node::*;
pub use tree::Dom;
pub use form::InputKind;
pub use event::*;
