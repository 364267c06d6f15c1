pub mod builder;
pub mod node;

pub use builder::PluginTree;
pub use node::{ActionNode, MenuNode, Node, NodeId, ADVANCED, ADV_PREFIX, USAGE};
