use confmenu::{
    ActionRegistry, Console, Context, EventBus, PluginTree, Runnable, ADVANCED, USAGE,
};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

struct ScriptedConsole {
    status: i32,
    choice: String,
    calls: RefCell<Vec<(String, String, Vec<(String, String)>)>>,
}

impl ScriptedConsole {
    fn selecting(choice: &str) -> Rc<Self> {
        Rc::new(Self {
            status: 0,
            choice: choice.to_string(),
            calls: RefCell::new(Vec::new()),
        })
    }

    fn failing(status: i32, choice: &str) -> Rc<Self> {
        Rc::new(Self {
            status,
            choice: choice.to_string(),
            calls: RefCell::new(Vec::new()),
        })
    }
}

impl Console for ScriptedConsole {
    fn menu(
        &self,
        title: &str,
        body: &str,
        items: &[(String, String)],
        _allow_cancel: bool,
    ) -> (i32, String) {
        self.calls
            .borrow_mut()
            .push((title.to_string(), body.to_string(), items.to_vec()));
        (self.status, self.choice.clone())
    }
}

struct Stub {
    description: &'static str,
}

impl Runnable for Stub {
    fn run(&self, _ctx: &Context) -> anyhow::Result<Option<String>> {
        Ok(None)
    }

    fn description(&self) -> &str {
        self.description
    }
}

fn write_action(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, "#!/bin/sh\n").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }
    path
}

fn registry_with(keys: &[&str]) -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    for key in keys {
        registry.register(*key, Stub { description: "" });
    }
    registry
}

#[test]
fn back_without_parent_returns_advanced() {
    // Arrange
    let root = TempDir::new().unwrap();
    let apps = root.path().join("apps");
    fs::create_dir(&apps).unwrap();
    write_action(&apps, "alpha");
    write_action(&apps, "beta");

    let console = ScriptedConsole::selecting("Back");
    let ctx = Context::new(console, EventBus::new());
    let tree = PluginTree::build(root.path(), &registry_with(&["alpha", "beta"]), &ctx).unwrap();

    // Act
    let menu_id = tree.id_by_path(&apps).unwrap();
    let token = tree.run(menu_id, &ctx).unwrap();

    // Assert
    assert_eq!(token, ADVANCED);
}

#[test]
fn back_with_parent_returns_parent_path() {
    // Arrange
    let root = TempDir::new().unwrap();
    let outer = root.path().join("outer");
    let inner = outer.join("inner");
    fs::create_dir_all(&inner).unwrap();

    let console = ScriptedConsole::selecting("Back");
    let ctx = Context::new(console, EventBus::new());
    let tree = PluginTree::build(root.path(), &ActionRegistry::new(), &ctx).unwrap();

    // Act
    let menu_id = tree.id_by_path(&inner).unwrap();
    let token = tree.run(menu_id, &ctx).unwrap();

    // Assert
    assert_eq!(token, outer.to_string_lossy());
}

#[test]
fn nonzero_status_returns_usage_regardless_of_selection() {
    // Arrange
    let root = TempDir::new().unwrap();
    let apps = root.path().join("apps");
    fs::create_dir(&apps).unwrap();
    write_action(&apps, "alpha");

    let console = ScriptedConsole::failing(1, "Alpha");
    let ctx = Context::new(console, EventBus::new());
    let tree = PluginTree::build(root.path(), &registry_with(&["alpha"]), &ctx).unwrap();

    // Act
    let menu_id = tree.id_by_path(&apps).unwrap();
    let token = tree.run(menu_id, &ctx).unwrap();

    // Assert
    assert_eq!(token, USAGE);
}

#[test]
fn selection_matching_a_child_returns_its_path() {
    // Arrange
    let root = TempDir::new().unwrap();
    let network = root.path().join("network");
    fs::create_dir(&network).unwrap();
    let dns = write_action(&network, "20dns");

    let console = ScriptedConsole::selecting("Dns");
    let ctx = Context::new(console, EventBus::new());
    let tree = PluginTree::build(root.path(), &registry_with(&["20dns"]), &ctx).unwrap();

    // Act
    let menu_id = tree.id_by_path(&network).unwrap();
    let token = tree.run(menu_id, &ctx).unwrap();

    // Assert
    assert_eq!(token, dns.to_string_lossy());
}

#[test]
fn unknown_selection_hands_off_to_the_admin_interpreter() {
    // Arrange
    let root = TempDir::new().unwrap();
    let apps = root.path().join("apps");
    fs::create_dir(&apps).unwrap();
    write_action(&apps, "alpha");

    let console = ScriptedConsole::selecting("Zork");
    let ctx = Context::new(console, EventBus::new());
    let tree = PluginTree::build(root.path(), &registry_with(&["alpha"]), &ctx).unwrap();

    // Act
    let menu_id = tree.id_by_path(&apps).unwrap();
    let token = tree.run(menu_id, &ctx).unwrap();

    // Assert
    assert_eq!(token, "_adv_zork");
}

#[test]
fn menu_rows_follow_discovery_order_with_descriptions_and_back() {
    // Arrange
    let root = TempDir::new().unwrap();
    let tools = root.path().join("5tools");
    fs::create_dir(&tools).unwrap();
    write_action(&tools, "2foo");
    write_action(&tools, "10bar");
    fs::create_dir(tools.join("extras")).unwrap();

    let mut registry = ActionRegistry::new();
    registry.register(
        "2foo",
        Stub {
            description: "Frob the foo",
        },
    );
    registry.register(
        "10bar",
        Stub {
            description: "Bump the bar",
        },
    );

    let console = ScriptedConsole::selecting("Back");
    let ctx = Context::new(console.clone(), EventBus::new());
    let tree = PluginTree::build(root.path(), &registry, &ctx).unwrap();

    // Act
    let menu_id = tree.id_by_path(&tools).unwrap();
    tree.run(menu_id, &ctx).unwrap();

    // Assert: lexicographic discovery order puts 10bar before 2foo, the
    // submenu row carries no description, and Back closes the list.
    let calls = console.calls.borrow();
    let (title, body, items) = &calls[0];
    assert_eq!(title, "Tools");
    assert_eq!(body, "Tools\n");
    assert_eq!(
        *items,
        vec![
            ("Bar".to_string(), "Bump the bar".to_string()),
            ("Foo".to_string(), "Frob the foo".to_string()),
            ("Extras".to_string(), String::new()),
            ("Back".to_string(), String::new()),
        ]
    );
}

#[test]
fn duplicate_labels_resolve_to_the_later_child() {
    // Arrange: "1foo" and "foo" both capitalize to "Foo". Discovery order
    // lists "1foo" first, so the later "foo" wins the selection map while
    // both rows stay visible.
    let root = TempDir::new().unwrap();
    let apps = root.path().join("apps");
    fs::create_dir(&apps).unwrap();
    write_action(&apps, "1foo");
    let later = apps.join("foo");
    fs::create_dir(&later).unwrap();

    let console = ScriptedConsole::selecting("Foo");
    let ctx = Context::new(console.clone(), EventBus::new());
    let tree = PluginTree::build(root.path(), &registry_with(&["1foo"]), &ctx).unwrap();

    // Act
    let menu_id = tree.id_by_path(&apps).unwrap();
    let token = tree.run(menu_id, &ctx).unwrap();

    // Assert
    assert_eq!(token, later.to_string_lossy());
    let calls = console.calls.borrow();
    let labels: Vec<&str> = calls[0].2.iter().map(|(label, _)| label.as_str()).collect();
    assert_eq!(labels, vec!["Foo", "Foo", "Back"]);
}

#[test]
fn actions_reach_shared_infrastructure_through_the_context() {
    // Arrange
    struct Notifier;

    impl Runnable for Notifier {
        fn run(&self, ctx: &Context) -> anyhow::Result<Option<String>> {
            ctx.events.fire("network-reconfigured");
            Ok(Some("_adv_networking".to_string()))
        }
    }

    let root = TempDir::new().unwrap();
    write_action(root.path(), "notify");

    let mut registry = ActionRegistry::new();
    registry.register("notify", Notifier);

    let events = EventBus::new();
    let fired = Rc::new(Cell::new(0));
    let seen = fired.clone();
    events.add_handler("network-reconfigured", move || {
        seen.set(seen.get() + 1);
        Ok(())
    });

    let console = ScriptedConsole::selecting("Back");
    let ctx = Context::new(console, events);
    let tree = PluginTree::build(root.path(), &registry, &ctx).unwrap();

    // Act
    let id = tree.id_by_path(&root.path().join("notify")).unwrap();
    let token = tree.run(id, &ctx).unwrap();

    // Assert
    assert_eq!(token, "_adv_networking");
    assert_eq!(fired.get(), 1);
}
