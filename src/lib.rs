//! Switchyard library crate: webhook automation across code hosting, issue
//! tracking and team chat.
//!
//! An invocation receives one webhook event (or a manually dispatched
//! trigger), routes it with [`events::route`], and runs the matching handler
//! from [`handlers`]. Handlers read through gateway traits, decide on a list
//! of [`handlers::Effect`]s with pure functions, and execute them through the
//! same gateways, so every platform can be replaced with a fake in tests.

pub mod config;
pub mod credentials;
pub mod error;
pub mod events;
pub mod github;
pub mod handlers;
pub mod jira;
pub mod logging;
pub mod rules;
pub mod settings;
pub mod slack;
pub mod template;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::SwitchyardConfig;
pub use error::AutomationError;
pub use events::{AutomationEvent, route};
pub use handlers::{Collaborators, Effect, HandlerContext, dispatch};
pub use settings::AutomationSettings;
