use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use walkdir::{DirEntry, WalkDir};

use crate::error::Error;
use crate::registry::{ActionRegistry, Context};

use super::node::{ActionNode, MenuNode, Node, NodeId};

/// The built menu tree: every discovered node, indexed by path, plus the
/// sorted registry of all directory nodes.
///
/// Built in one synchronous pass over the directory subtree; nothing is
/// mutated afterwards and the tree is rebuilt, not patched, when the source
/// directory changes. Any load or init fault aborts the build outright; no
/// partial tree is ever returned.
pub struct PluginTree {
    nodes: Vec<Node>,
    path_map: HashMap<PathBuf, NodeId>,
    menus: Vec<NodeId>,
}

impl PluginTree {
    /// Walks `root`, turning every executable file into an action and every
    /// subdirectory into a submenu, then sorts, runs one-time initializers,
    /// and wires parent/child relationships.
    ///
    /// The ordering mechanism for the whole tree is lexicographic on raw
    /// names, so leading digits act as manually assigned sort keys. Digit
    /// prefixes of different lengths do not sort numerically: `10bar` comes
    /// before `2foo`. Known limitation.
    pub fn build(root: &Path, registry: &ActionRegistry, ctx: &Context) -> Result<Self, Error> {
        if !root.is_dir() {
            return Err(Error::Config(root.to_path_buf()));
        }

        let mut nodes: Vec<Node> = Vec::new();
        let mut path_map: HashMap<PathBuf, NodeId> = HashMap::new();
        let mut menus: Vec<NodeId> = Vec::new();

        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Skipping unreadable entry under {:?}: {}", root, err);
                    continue;
                }
            };

            let path = entry.path().to_path_buf();
            if entry.file_type().is_dir() {
                let id = nodes.len();
                nodes.push(Node::Menu(MenuNode::new(path.clone(), ctx.console.clone())));
                path_map.insert(path, id);
                menus.push(id);
            } else if entry.file_type().is_file() && is_executable(&entry) {
                let action = ActionNode::load(path.clone(), registry)?;
                let id = nodes.len();
                nodes.push(Node::Action(action));
                path_map.insert(path, id);
            }
        }

        menus.sort_by(|&a, &b| {
            segments(nodes[a].path(), root).cmp(&segments(nodes[b].path(), root))
        });

        for node in &nodes {
            if let Node::Action(action) = node {
                action.init_once(ctx)?;
            }
        }

        for &menu_id in &menus {
            let dir_path = nodes[menu_id].path().to_path_buf();
            let child_ids: Vec<NodeId> = (0..nodes.len())
                .filter(|&id| nodes[id].path().parent() == Some(dir_path.as_path()))
                .collect();
            for child_id in child_ids {
                nodes[child_id].set_parent(dir_path.clone());
                if let Node::Menu(menu) = &mut nodes[menu_id] {
                    menu.children.push(child_id);
                }
            }
        }

        log::info!(
            "Built menu tree from {:?}: {} node(s), {} menu(s)",
            root,
            nodes.len(),
            menus.len()
        );

        Ok(Self {
            nodes,
            path_map,
            menus,
        })
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn by_path(&self, path: &Path) -> Option<&Node> {
        self.id_by_path(path).map(|id| &self.nodes[id])
    }

    pub fn id_by_path(&self, path: &Path) -> Option<NodeId> {
        self.path_map.get(path).copied()
    }

    /// Every directory node whose module id equals `name`; zero, one, or many
    /// results. File actions are not part of by-name lookup.
    pub fn by_name(&self, name: &str) -> Vec<&Node> {
        self.menus
            .iter()
            .map(|&id| &self.nodes[id])
            .filter(|node| node.module_id() == name)
            .collect()
    }

    /// Directory nodes in sorted registry order.
    pub fn menus(&self) -> impl Iterator<Item = &Node> + '_ {
        self.menus.iter().map(|&id| &self.nodes[id])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    /// Runs one node and returns its navigation token. Menus drive their
    /// console; actions run their registered implementation, and any failure
    /// inside it propagates to the caller.
    pub fn run(&self, id: NodeId, ctx: &Context) -> Result<String> {
        match &self.nodes[id] {
            Node::Action(action) => action.run(ctx),
            Node::Menu(menu) => Ok(menu.run(self)),
        }
    }
}

fn segments(path: &Path, root: &Path) -> Vec<String> {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect()
}

#[cfg(unix)]
fn is_executable(entry: &DirEntry) -> bool {
    use std::os::unix::fs::PermissionsExt;
    entry
        .metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_entry: &DirEntry) -> bool {
    true
}
