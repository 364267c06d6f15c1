//! Builds a navigable menu tree out of a directory of executable actions and
//! provides a small event bus those actions use to talk to shared
//! infrastructure.
//!
//! A directory becomes a submenu, an executable file becomes an action, and
//! navigation between nodes is driven by the string tokens the nodes return
//! from `run`. The terminal rendering engine and the menu-loop driver live
//! outside this crate; they are reached only through the [`Console`] trait and
//! the navigation tokens.

pub mod console;
pub mod error;
pub mod events;
pub mod paths;
pub mod registry;
pub mod tree;

pub use console::Console;
pub use error::Error;
pub use events::{EventBus, EventTrigger};
pub use registry::{ActionRegistry, Context, Runnable};
pub use tree::{ActionNode, MenuNode, Node, NodeId, PluginTree};
pub use tree::{ADVANCED, ADV_PREFIX, USAGE};
