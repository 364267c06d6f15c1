use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Result;

use crate::console::{Console, OK};
use crate::error::Error;
use crate::registry::{ActionRegistry, Context, Runnable};

use super::builder::PluginTree;

/// Index of a node inside the tree's arena.
pub type NodeId = usize;

/// Fallback token for nodes without a recorded parent, and the target of an
/// unparented "Back" selection.
pub const ADVANCED: &str = "advanced";

/// Token returned when the console reports a non-success status.
pub const USAGE: &str = "usage";

/// Prefix marking a selection handed off to the administrative-command
/// interpreter outside this crate.
pub const ADV_PREFIX: &str = "_adv_";

pub enum Node {
    Action(ActionNode),
    Menu(MenuNode),
}

impl Node {
    pub fn path(&self) -> &Path {
        match self {
            Node::Action(a) => &a.path,
            Node::Menu(m) => &m.path,
        }
    }

    /// Final path segment, ordering digits included.
    pub fn raw_name(&self) -> &str {
        match self {
            Node::Action(a) => &a.raw_name,
            Node::Menu(m) => &m.raw_name,
        }
    }

    /// Raw name with the leading ordering digits stripped.
    pub fn display_name(&self) -> &str {
        match self {
            Node::Action(a) => &a.display_name,
            Node::Menu(m) => &m.display_name,
        }
    }

    /// Lookup key for by-name queries. Actions keep their ordering digits
    /// (raw name minus extension); menus use the display name.
    pub fn module_id(&self) -> &str {
        match self {
            Node::Action(a) => &a.module_id,
            Node::Menu(m) => &m.display_name,
        }
    }

    /// Path of the containing menu, if one was wired during the build.
    pub fn parent(&self) -> Option<&Path> {
        match self {
            Node::Action(a) => a.parent.as_deref(),
            Node::Menu(m) => m.parent.as_deref(),
        }
    }

    pub fn is_menu(&self) -> bool {
        matches!(self, Node::Menu(_))
    }

    pub(crate) fn set_parent(&mut self, parent: PathBuf) {
        match self {
            Node::Action(a) => a.parent = Some(parent),
            Node::Menu(m) => m.parent = Some(parent),
        }
    }
}

/// One executable file, bound to its registered [`Runnable`] implementation.
pub struct ActionNode {
    path: PathBuf,
    raw_name: String,
    display_name: String,
    module_id: String,
    runnable: Rc<dyn Runnable>,
    parent: Option<PathBuf>,
}

impl ActionNode {
    pub(crate) fn load(path: PathBuf, registry: &ActionRegistry) -> Result<Self, Error> {
        let raw_name = final_segment(&path);
        let display_name = strip_ordering_digits(&raw_name).to_string();
        let module_id = strip_extension(&raw_name).to_string();

        let runnable = registry.get(&module_id).ok_or_else(|| Error::Load {
            path: path.clone(),
            key: module_id.clone(),
        })?;

        Ok(Self {
            path,
            raw_name,
            display_name,
            module_id,
            runnable,
            parent: None,
        })
    }

    pub fn description(&self) -> &str {
        self.runnable.description()
    }

    /// Runs the action and resolves its return into a navigation token: a
    /// non-empty return is passed through as-is; an empty one falls back to
    /// the parent menu's path, or [`ADVANCED`] for an unparented action.
    pub fn run(&self, ctx: &Context) -> Result<String> {
        match self.runnable.run(ctx)? {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Ok(match &self.parent {
                Some(parent) => parent.to_string_lossy().into_owned(),
                None => ADVANCED.to_string(),
            }),
        }
    }

    pub(crate) fn init_once(&self, ctx: &Context) -> Result<(), Error> {
        self.runnable.init_once(ctx).map_err(|cause| Error::Init {
            path: self.path.clone(),
            cause,
        })
    }
}

/// One directory, presented as a submenu of its children.
pub struct MenuNode {
    path: PathBuf,
    raw_name: String,
    display_name: String,
    console: Rc<dyn Console>,
    pub(crate) children: Vec<NodeId>,
    parent: Option<PathBuf>,
}

impl MenuNode {
    pub(crate) fn new(path: PathBuf, console: Rc<dyn Console>) -> Self {
        let raw_name = final_segment(&path);
        let display_name = strip_ordering_digits(&raw_name).to_string();
        Self {
            path,
            raw_name,
            display_name,
            console,
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Presents the submenu and maps the selection to a navigation token.
    ///
    /// Rows are the children in discovery order plus a trailing "Back". A
    /// non-success status yields [`USAGE`]; "Back" yields the parent path or
    /// [`ADVANCED`]; a known label yields that child's path; anything else is
    /// handed off as `_adv_<lowercased label>`.
    ///
    /// Known quirk: two children whose display names capitalize identically
    /// produce two rows but one lookup entry, with the later child winning.
    /// The earlier child stays listed but cannot be selected.
    pub fn run(&self, tree: &PluginTree) -> String {
        let mut items = Vec::with_capacity(self.children.len() + 1);
        let mut selection: HashMap<String, PathBuf> = HashMap::new();

        for &child_id in &self.children {
            let child = tree.node(child_id);
            let label = capitalize(child.display_name());
            let description = match child {
                Node::Action(action) => action.description().to_string(),
                Node::Menu(_) => String::new(),
            };
            items.push((label.clone(), description));
            selection.insert(label, child.path().to_path_buf());
        }
        items.push(("Back".to_string(), String::new()));

        let title = capitalize(&self.display_name);
        let body = format!("{}\n", title);
        let (status, choice) = self.console.menu(&title, &body, &items, false);

        if status != OK {
            return USAGE.to_string();
        }

        if choice == "Back" {
            return match &self.parent {
                Some(parent) => parent.to_string_lossy().into_owned(),
                None => ADVANCED.to_string(),
            };
        }

        match selection.get(&choice) {
            Some(path) => path.to_string_lossy().into_owned(),
            None => format!("{}{}", ADV_PREFIX, choice.to_lowercase()),
        }
    }
}

fn final_segment(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn strip_ordering_digits(raw: &str) -> &str {
    raw.trim_start_matches(|c: char| c.is_ascii_digit())
}

fn strip_extension(raw: &str) -> &str {
    match raw.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => raw,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}
