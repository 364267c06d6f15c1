use std::path::PathBuf;
use thiserror::Error;

/// Fault taxonomy for the menu core.
///
/// Build-time faults (`Config`, `Load`, `Init`) abort the whole tree build;
/// there is no partial-tree recovery. `Handler` is the one locally recovered
/// kind: it is reported on the error channel during event dispatch and never
/// propagated.
#[derive(Debug, Error)]
pub enum Error {
    /// The plugin root does not exist or is not a directory.
    #[error("plugin directory {0:?} does not exist")]
    Config(PathBuf),

    /// A discovered action has no implementation registered for its module id.
    #[error("no action registered for {key:?} (discovered at {path:?})")]
    Load { path: PathBuf, key: String },

    /// An action's one-time initializer failed during the build pass.
    #[error("init hook failed for action {path:?}: {cause:#}")]
    Init { path: PathBuf, cause: anyhow::Error },

    /// An event handler failed during dispatch. Reported, never raised.
    #[error("an error occurred within an event handler whilst handling event {event:?}: {cause:#}")]
    Handler { event: String, cause: anyhow::Error },

    /// Reserved for event-API misuse signaling; not raised by any core flow.
    #[error("event api misuse: {0}")]
    EventApi(String),
}
