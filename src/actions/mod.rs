//! Action catalogue.
//!
//! - [`action_id`]: the closed set of action identifiers
//! - [`descriptor`]: static metadata, dispatch context and handler type
//! - [`catalogue`]: the registry with swappable handlers
//! - [`defaults`]: the built-in action table
//! - [`handlers`]: logging handlers for simulation mode

pub mod action_id;
pub mod catalogue;
pub mod defaults;
pub mod descriptor;
pub mod handlers;

pub use action_id::{ActionId, UnknownAction};
pub use catalogue::ActionCatalogue;
pub use descriptor::{
    action_handler, ActionDescriptor, ActionHandler, DispatchContext, DispatchOutcome,
};
pub use handlers::{attach_logging_handlers, logging_handler};
